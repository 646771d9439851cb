// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Small numeric and naming helpers shared across the crate

pub mod math;
pub mod naming;

pub use math::{approx_eq, normalize_angle, round_to, COORD_TOLERANCE};
pub use naming::camel_to_snake;
