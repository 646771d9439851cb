// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - primitives and exact bounding boxes

mod bbox;
mod primitives;
mod rotation;
mod solver;

pub use bbox::{Axis, Bounded, BoundingBox, Edge, Extents, Side};
pub use primitives::{HAlign, Primitive, TextShape, VAlign};
pub use rotation::QuarterTurn;
pub use solver::{resolve_axis, try_solve, AxisSolution, AxisSpec};
