// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Model tree module
//!
//! Defines the node tree, its construction API and the part aggregate

pub mod value;
mod node;
mod ops;
mod part;
mod roles;
mod transform;

pub use node::{Modifier, Node, NodeKind};
pub use ops::{Alignment, RevolveOptions};
pub use part::{revolve, Part, PartDefinition, PartLayout, PostProcess, Slot, REVOLVE_MASK_MARGIN};
pub use roles::{Hole, Member, Misc};
pub use transform::{ExtrudeOptions, TransformOp, Vec3};
pub use value::{Arguments, Value};
