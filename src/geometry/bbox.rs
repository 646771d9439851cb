// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Axis-aligned bounding boxes and the edge vocabulary used to query them

use crate::error::{ModelError, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// One of the three world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn from_index(index: usize) -> Axis {
        match index % 3 {
            0 => Axis::X,
            1 => Axis::Y,
            _ => Axis::Z,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    /// Name of the center accessor on this axis
    pub fn center_name(self) -> &'static str {
        match self {
            Axis::X => "center_x",
            Axis::Y => "center_y",
            Axis::Z => "center_z",
        }
    }
}

/// Lower or upper end of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Min,
    Max,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Min => Side::Max,
            Side::Max => Side::Min,
        }
    }
}

/// One of the six extrema of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Back,
    Front,
    Bottom,
    Top,
}

impl Edge {
    pub const ALL: [Edge; 6] = [
        Edge::Left,
        Edge::Right,
        Edge::Back,
        Edge::Front,
        Edge::Bottom,
        Edge::Top,
    ];

    pub fn new(axis: Axis, side: Side) -> Edge {
        match (axis, side) {
            (Axis::X, Side::Min) => Edge::Left,
            (Axis::X, Side::Max) => Edge::Right,
            (Axis::Y, Side::Min) => Edge::Back,
            (Axis::Y, Side::Max) => Edge::Front,
            (Axis::Z, Side::Min) => Edge::Bottom,
            (Axis::Z, Side::Max) => Edge::Top,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::X,
            Edge::Back | Edge::Front => Axis::Y,
            Edge::Bottom | Edge::Top => Axis::Z,
        }
    }

    pub fn side(self) -> Side {
        match self {
            Edge::Left | Edge::Back | Edge::Bottom => Side::Min,
            Edge::Right | Edge::Front | Edge::Top => Side::Max,
        }
    }

    pub fn opposite(self) -> Edge {
        Edge::new(self.axis(), self.side().opposite())
    }

    /// Position of this edge in [`Edge::ALL`]
    pub fn index(self) -> usize {
        let side = match self.side() {
            Side::Min => 0,
            Side::Max => 1,
        };
        self.axis().index() * 2 + side
    }

    pub fn name(self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Back => "back",
            Edge::Front => "front",
            Edge::Bottom => "bottom",
            Edge::Top => "top",
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Degenerate box at the origin, used for empty unions and parts
    pub fn zero() -> Self {
        Self::new(Point3::origin(), Point3::origin())
    }

    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        let mut bbox = Self::empty();
        for point in points {
            bbox.expand_to_include(point);
        }
        bbox
    }

    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);

        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Value of a single extremum
    pub fn get(&self, edge: Edge) -> f64 {
        let i = edge.axis().index();
        match edge.side() {
            Side::Min => self.min[i],
            Side::Max => self.max[i],
        }
    }

    pub fn set(&mut self, edge: Edge, value: f64) {
        let i = edge.axis().index();
        match edge.side() {
            Side::Min => self.min[i] = value,
            Side::Max => self.max[i] = value,
        }
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn volume(&self) -> f64 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Overlap of both boxes; may be empty
    pub fn intersection(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(self.min.sup(&other.min), self.max.inf(&other.max))
    }

    pub fn translated(&self, offset: &Vector3<f64>) -> BoundingBox {
        BoundingBox::new(self.min + *offset, self.max + *offset)
    }

    /// Check if two bounding boxes are approximately equal within tolerance
    pub fn approx_eq(&self, other: &BoundingBox, tolerance: f64) -> bool {
        Edge::ALL
            .iter()
            .all(|&edge| (self.get(edge) - other.get(edge)).abs() < tolerance)
    }
}

/// Exact extrema of a model element.
///
/// Extrema are queried one edge at a time so that elements whose box is only
/// partially known can still be aligned on the edges they do define.
pub trait Bounded {
    fn extremum(&self, edge: Edge) -> Result<f64>;

    fn left(&self) -> Result<f64> {
        self.extremum(Edge::Left)
    }

    fn right(&self) -> Result<f64> {
        self.extremum(Edge::Right)
    }

    fn back(&self) -> Result<f64> {
        self.extremum(Edge::Back)
    }

    fn front(&self) -> Result<f64> {
        self.extremum(Edge::Front)
    }

    fn bottom(&self) -> Result<f64> {
        self.extremum(Edge::Bottom)
    }

    fn top(&self) -> Result<f64> {
        self.extremum(Edge::Top)
    }

    fn extent(&self, axis: Axis) -> Result<f64> {
        Ok(self.extremum(Edge::new(axis, Side::Max))? - self.extremum(Edge::new(axis, Side::Min))?)
    }

    fn width(&self) -> Result<f64> {
        self.extent(Axis::X)
    }

    fn depth(&self) -> Result<f64> {
        self.extent(Axis::Y)
    }

    fn height(&self) -> Result<f64> {
        self.extent(Axis::Z)
    }

    fn center_on(&self, axis: Axis) -> Result<f64> {
        Ok((self.extremum(Edge::new(axis, Side::Max))? + self.extremum(Edge::new(axis, Side::Min))?) / 2.0)
    }

    fn center_x(&self) -> Result<f64> {
        self.center_on(Axis::X)
    }

    fn center_y(&self) -> Result<f64> {
        self.center_on(Axis::Y)
    }

    fn center_z(&self) -> Result<f64> {
        self.center_on(Axis::Z)
    }

    fn bounding_box(&self) -> Result<BoundingBox> {
        let mut bbox = BoundingBox::zero();
        for edge in Edge::ALL {
            bbox.set(edge, self.extremum(edge)?);
        }
        Ok(bbox)
    }
}

impl Bounded for BoundingBox {
    fn extremum(&self, edge: Edge) -> Result<f64> {
        Ok(self.get(edge))
    }
}

/// All six extrema of an element, each known or failed on its own.
///
/// Trees are measured bottom-up into one table per node, so a query costs a
/// single pass over the subtree however the transforms above it combine
/// their child's edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Extents([Result<f64>; 6]);

impl Extents {
    pub fn from_fn(f: impl FnMut(Edge) -> Result<f64>) -> Self {
        Extents(Edge::ALL.map(f))
    }

    pub fn of(element: &impl Bounded) -> Self {
        Self::from_fn(|edge| element.extremum(edge))
    }

    /// Every edge fails with `error`
    pub fn failed(error: ModelError) -> Self {
        Self::from_fn(|_| Err(error.clone()))
    }

    pub fn get(&self, edge: Edge) -> Result<f64> {
        self.0[edge.index()].clone()
    }

    /// Extents of the union of `items`; an empty set sits at the origin.
    pub fn union<'a>(items: impl IntoIterator<Item = &'a Extents> + Clone) -> Self {
        Self::from_fn(|edge| {
            let mut result: Option<f64> = None;
            for item in items.clone() {
                let value = item.get(edge)?;
                result = Some(match (result, edge.side()) {
                    (None, _) => value,
                    (Some(current), Side::Min) => current.min(value),
                    (Some(current), Side::Max) => current.max(value),
                });
            }
            Ok(result.unwrap_or(0.0))
        })
    }
}

impl Bounded for Extents {
    fn extremum(&self, edge: Edge) -> Result<f64> {
        self.get(edge)
    }
}
