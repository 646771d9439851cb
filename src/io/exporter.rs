// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Writers for generated source and serialized trees

use super::render::{RenderOptions, Renderer};
use crate::ast::Node;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

fn prepare_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Write OpenSCAD source to `path`, forcing the `.scad` extension.
///
/// Returns the path actually written.
pub fn export_scad(source: &str, path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut path = path.as_ref().to_path_buf();
    if path.extension().and_then(|e| e.to_str()) != Some("scad") {
        path.set_extension("scad");
    }
    prepare_parent(&path)?;

    fs::write(&path, source).with_context(|| format!("Failed to write SCAD file: {}", path.display()))?;
    info!(path = %path.display(), bytes = source.len(), "wrote scad file");
    Ok(path)
}

/// Render `node` and write it to `path`
pub fn render_to_file(node: &Node, path: impl AsRef<Path>, options: &RenderOptions) -> Result<PathBuf> {
    let source = Renderer::new(options.clone())
        .render(node)
        .context("Failed to render model")?;
    export_scad(&source, path)
}

/// Serialize a tree as pretty JSON
pub fn export_tree_json(node: &Node, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    prepare_parent(path)?;
    let json = serde_json::to_string_pretty(node).context("Failed to serialize model tree")?;
    fs::write(path, json).with_context(|| format!("Failed to write tree file: {}", path.display()))?;
    Ok(())
}
