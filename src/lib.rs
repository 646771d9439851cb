// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! polyscad
//!
//! Build solid models as trees of OpenSCAD operations and emit OpenSCAD
//! source. Every node knows its exact axis-aligned bounding box without
//! evaluating a mesh, so parts can be placed against each other's edges.

pub mod ast;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod utils;

pub use ast::{
    Alignment, ExtrudeOptions, Hole, Member, Misc, Modifier, Node, NodeKind, Part, PartDefinition, PartLayout,
    RevolveOptions, TransformOp, Vec3,
};
pub use error::{ModelError, Result};
pub use geometry::{resolve_axis, Axis, AxisSolution, AxisSpec, Bounded, BoundingBox, Edge, Primitive};
pub use io::{render, RenderOptions, Renderer};
