// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Single-axis coordinate solver
//!
//! An axis span is described by four quantities: where it starts, its
//! center, where it ends and its length. Any two independent ones determine
//! the other two. [`resolve_axis`] derives the full set and rejects
//! over-constrained inputs that contradict each other.

use crate::error::{ModelError, Result};
use crate::utils::{approx_eq, COORD_TOLERANCE};
use serde::{Deserialize, Serialize};

/// Known quantities on one axis. Unset fields are solved for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub from: Option<f64>,
    pub center: Option<f64>,
    pub to: Option<f64>,
    /// Span length; the sign gives the direction when paired with `from` or `to`
    pub distance: Option<f64>,
}

impl AxisSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(mut self, from: f64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn centered_at(mut self, center: f64) -> Self {
        self.center = Some(center);
        self
    }

    pub fn ending_at(mut self, to: f64) -> Self {
        self.to = Some(to);
        self
    }

    pub fn spanning(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Span between two coordinates, in either order
    pub fn between(from: f64, to: f64) -> Self {
        Self::new().starting_at(from).ending_at(to)
    }

    /// Span of `distance` centered on `center`
    pub fn around(center: f64, distance: f64) -> Self {
        Self::new().centered_at(center).spanning(distance)
    }

    /// Number of quantities supplied
    pub fn signal_count(&self) -> usize {
        [self.from, self.center, self.to, self.distance]
            .iter()
            .filter(|v| v.is_some())
            .count()
    }
}

/// Fully solved axis span. Always satisfies `from <= to` and `distance >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSolution {
    pub from: f64,
    pub center: f64,
    pub to: f64,
    pub distance: f64,
}

impl AxisSolution {
    fn new(from: f64, center: f64, to: f64, distance: f64) -> Self {
        Self {
            from,
            center,
            to,
            distance,
        }
    }

    /// Ordered span through its two ends
    fn ordered(a: f64, b: f64) -> Self {
        let (from, to) = if a < b { (a, b) } else { (b, a) };
        let distance = to - from;
        Self::new(from, from + distance / 2.0, to, distance)
    }
}

/// Solve the axis from whichever pair of inputs is present, without
/// cross-checking the remaining inputs.
///
/// Returns `None` when fewer than two quantities are known. A lone
/// `distance` is taken to be centered on zero.
pub fn try_solve(spec: &AxisSpec) -> Option<AxisSolution> {
    let AxisSpec {
        from,
        mut center,
        to,
        distance,
    } = *spec;

    if distance.is_some() && from.is_none() && to.is_none() && center.is_none() {
        center = Some(0.0);
    }

    if let (Some(from), Some(center)) = (from, center) {
        let distance = (center - from).abs() * 2.0;
        return Some(if from < center {
            AxisSolution::new(from, center, from + distance, distance)
        } else {
            AxisSolution::new(from - distance, center, from, distance)
        });
    }

    if let (Some(from), Some(to)) = (from, to) {
        return Some(AxisSolution::ordered(from, to));
    }

    if let (Some(from), Some(distance)) = (from, distance) {
        return Some(AxisSolution::ordered(from, from + distance));
    }

    if let (Some(center), Some(to)) = (center, to) {
        let distance = (to - center).abs() * 2.0;
        return Some(if center < to {
            AxisSolution::new(to - distance, center, to, distance)
        } else {
            AxisSolution::new(to, center, to + distance, distance)
        });
    }

    if let (Some(center), Some(distance)) = (center, distance) {
        let distance = distance.abs();
        return Some(AxisSolution::new(
            center - distance / 2.0,
            center,
            center + distance / 2.0,
            distance,
        ));
    }

    if let (Some(to), Some(distance)) = (to, distance) {
        return Some(AxisSolution::ordered(to - distance, to));
    }

    None
}

/// Solve an axis and verify every supplied quantity against the solution.
pub fn resolve_axis(spec: &AxisSpec) -> Result<AxisSolution> {
    let solution = try_solve(spec).ok_or(ModelError::InsufficientParameters)?;
    validate(spec, &solution)?;
    Ok(solution)
}

fn check(field: &'static str, specified: f64, calculated: f64) -> Result<()> {
    if approx_eq(specified, calculated, COORD_TOLERANCE) {
        Ok(())
    } else {
        Err(ModelError::InconsistentCoordinate {
            field,
            specified,
            calculated,
        })
    }
}

fn validate(spec: &AxisSpec, solution: &AxisSolution) -> Result<()> {
    if let Some(center) = spec.center {
        check("center", center, solution.center)?;
    }
    if let Some(distance) = spec.distance {
        check("distance", distance.abs(), solution.distance)?;
    }

    // Inputs given in descending order describe the same span with its ends swapped.
    let descending = matches!((spec.from, spec.to), (Some(f), Some(t)) if f > t)
        || matches!((spec.from, spec.center), (Some(f), Some(c)) if f > c)
        || matches!((spec.center, spec.to), (Some(c), Some(t)) if c > t)
        || spec.distance.is_some_and(|d| d < 0.0);
    let (from, to) = if descending {
        (spec.to, spec.from)
    } else {
        (spec.from, spec.to)
    };

    if let Some(from) = from {
        check("from", from, solution.from)?;
    }
    if let Some(to) = to {
        check("to", to, solution.to)?;
    }
    Ok(())
}
