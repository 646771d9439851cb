// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - rendering, exporting, and importing

mod exporter;
mod importer;
mod render;

pub use exporter::{export_scad, export_tree_json, render_to_file};
pub use importer::{import_tree_file, import_tree_str};
pub use render::{add_comment, indent, render, RenderOptions, Renderer};
