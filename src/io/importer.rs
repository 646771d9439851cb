// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Serialized tree importer

use crate::ast::Node;
use anyhow::{Context, Result};
use std::fs;

/// Load a JSON-serialized model tree
pub fn import_tree_file(path: &str) -> Result<Node> {
    let source = fs::read_to_string(path).context(format!("Failed to read tree file: {}", path))?;

    import_tree_str(&source).context(format!("Failed to parse tree file: {}", path))
}

pub fn import_tree_str(source: &str) -> Result<Node> {
    Ok(serde_json::from_str(source)?)
}
