// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Exact rotations by multiples of 90 degrees
//!
//! A quarter-turn rotation maps each axis onto another axis, possibly
//! flipped, so the rotated bounding box can be read straight off the child's
//! extrema without any floating point error. The composite matrix follows the
//! OpenSCAD convention `Rz * Ry * Rx`.

use super::bbox::{Axis, BoundingBox, Edge};
use crate::error::{ModelError, Result};
use crate::utils::normalize_angle;
use nalgebra::{Matrix3, Vector3};

const QUARTER_TOLERANCE: f64 = 1e-9;

/// Signed axis permutation produced by a rotation of quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterTurn {
    matrix: Matrix3<i32>,
}

impl QuarterTurn {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Build the rotation from per-axis angles in degrees.
    ///
    /// Fails with [`ModelError::UnsupportedTransform`] unless every angle is
    /// a multiple of 90 degrees.
    pub fn from_degrees(angles: &Vector3<f64>) -> Result<Self> {
        let qx = quarters(angles.x);
        let qy = quarters(angles.y);
        let qz = quarters(angles.z);
        match (qx, qy, qz) {
            (Some(qx), Some(qy), Some(qz)) => Ok(Self {
                matrix: rot_z(qz) * rot_y(qy) * rot_x(qx),
            }),
            _ => Err(ModelError::UnsupportedTransform(format!(
                "rotate(a=[{}, {}, {}]) is not a multiple of 90 degrees",
                angles.x, angles.y, angles.z
            ))),
        }
    }

    pub fn matrix(&self) -> &Matrix3<i32> {
        &self.matrix
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }

    /// Child edge that lands on `edge` after rotation, and whether its value
    /// is negated on the way.
    pub fn source(&self, edge: Edge) -> (Edge, bool) {
        let row = edge.axis().index();
        let (column, sign) = (0..3)
            .map(|j| (j, self.matrix[(row, j)]))
            .find(|&(_, v)| v != 0)
            .unwrap_or((row, 1));
        let from_axis = Axis::from_index(column);
        if sign > 0 {
            (Edge::new(from_axis, edge.side()), false)
        } else {
            (Edge::new(from_axis, edge.side().opposite()), true)
        }
    }

    /// Rotated value of one extremum, pulling the child's extrema on demand
    pub fn extremum<F>(&self, edge: Edge, child: F) -> Result<f64>
    where
        F: Fn(Edge) -> Result<f64>,
    {
        let (source, negate) = self.source(edge);
        let value = child(source)?;
        Ok(if negate { -value } else { value })
    }

    pub fn rotate_box(&self, bbox: &BoundingBox) -> BoundingBox {
        let mut rotated = BoundingBox::zero();
        for edge in Edge::ALL {
            let (source, negate) = self.source(edge);
            let value = bbox.get(source);
            rotated.set(edge, if negate { -value } else { value });
        }
        rotated
    }
}

impl Default for QuarterTurn {
    fn default() -> Self {
        Self::identity()
    }
}

/// Number of quarter turns in `angle`, if it is a whole number of them
fn quarters(angle: f64) -> Option<usize> {
    let angle = normalize_angle(angle);
    let turns = (angle / 90.0).round();
    if (angle - turns * 90.0).abs() > QUARTER_TOLERANCE {
        return None;
    }
    Some(turns as usize % 4)
}

fn cos_sin(q: usize) -> (i32, i32) {
    const COS: [i32; 4] = [1, 0, -1, 0];
    const SIN: [i32; 4] = [0, 1, 0, -1];
    (COS[q], SIN[q])
}

#[rustfmt::skip]
fn rot_x(q: usize) -> Matrix3<i32> {
    let (c, s) = cos_sin(q);
    Matrix3::new(
        1, 0, 0,
        0, c, -s,
        0, s, c,
    )
}

#[rustfmt::skip]
fn rot_y(q: usize) -> Matrix3<i32> {
    let (c, s) = cos_sin(q);
    Matrix3::new(
        c, 0, s,
        0, 1, 0,
        -s, 0, c,
    )
}

#[rustfmt::skip]
fn rot_z(q: usize) -> Matrix3<i32> {
    let (c, s) = cos_sin(q);
    Matrix3::new(
        c, -s, 0,
        s, c, 0,
        0, 0, 1,
    )
}
