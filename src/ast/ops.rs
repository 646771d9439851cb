// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Construction API
//!
//! Every builder consumes the node and returns the wrapping node, so models
//! are written as method chains. Share a sub-model by cloning it.

use super::node::{Modifier, Node, NodeKind};
use super::roles::{Hole, Misc};
use super::transform::{ExtrudeOptions, TransformOp, Vec3};
use crate::error::{ModelError, Result};
use crate::geometry::{resolve_axis, Axis, AxisSpec, Bounded, BoundingBox, Edge, Primitive, Side};
use crate::utils::normalize_angle;
use tracing::debug;

/// Placement of [`Node::z_rotational_extrude`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RevolveOptions {
    /// Sweep in degrees as a span; a full turn from 0 when left empty
    pub angle: AxisSpec,
    /// Distance from the revolution axis to the profile origin
    pub radius: f64,
    pub center_x: f64,
    pub center_y: f64,
    /// Vertical placement. The span length is the profile depth, so one of
    /// `from`, `center` or `to` is enough; none centers the result on 0.
    pub z: AxisSpec,
    pub convexity: Option<u32>,
    pub segments: Option<u32>,
}

/// Target coordinates for [`Node::align`].
///
/// Each axis takes at most one of its low edge, its center or its high edge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Alignment {
    targets: [[Option<f64>; 3]; 3],
}

impl Alignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edge(mut self, edge: Edge, value: f64) -> Self {
        let slot = match edge.side() {
            Side::Min => 0,
            Side::Max => 2,
        };
        self.targets[edge.axis().index()][slot] = Some(value);
        self
    }

    pub fn center(mut self, axis: Axis, value: f64) -> Self {
        self.targets[axis.index()][1] = Some(value);
        self
    }

    pub fn left(self, value: f64) -> Self {
        self.edge(Edge::Left, value)
    }

    pub fn center_x(self, value: f64) -> Self {
        self.center(Axis::X, value)
    }

    pub fn right(self, value: f64) -> Self {
        self.edge(Edge::Right, value)
    }

    pub fn back(self, value: f64) -> Self {
        self.edge(Edge::Back, value)
    }

    pub fn center_y(self, value: f64) -> Self {
        self.center(Axis::Y, value)
    }

    pub fn front(self, value: f64) -> Self {
        self.edge(Edge::Front, value)
    }

    pub fn bottom(self, value: f64) -> Self {
        self.edge(Edge::Bottom, value)
    }

    pub fn center_z(self, value: f64) -> Self {
        self.center(Axis::Z, value)
    }

    pub fn top(self, value: f64) -> Self {
        self.edge(Edge::Top, value)
    }

    /// Translation needed on `axis` to bring `node` onto its target
    fn offset(&self, node: &Node, axis: Axis) -> Result<f64> {
        match self.targets[axis.index()] {
            [None, None, None] => Ok(0.0),
            [Some(target), None, None] => Ok(target - node.extremum(Edge::new(axis, Side::Min))?),
            [None, Some(target), None] => Ok(target - node.center_on(axis)?),
            [None, None, Some(target)] => Ok(target - node.extremum(Edge::new(axis, Side::Max))?),
            _ => Err(ModelError::InvalidArgument(format!(
                "align takes only one of {}, {} and {}",
                Edge::new(axis, Side::Min).name(),
                axis.center_name(),
                Edge::new(axis, Side::Max).name()
            ))),
        }
    }
}

fn box_node(bbox: &BoundingBox) -> Node {
    let size = bbox.size();
    let center = bbox.center();
    Node::from(Primitive::cube(size.x, size.y, size.z)).translate(center.x, center.y, center.z)
}

impl Node {
    /// Wrap this node in a transformation.
    ///
    /// A plain transformation of the same operator is merged when the merge
    /// keeps the geometry; a plain union hands its children over directly.
    pub fn transform(self, op: TransformOp) -> Node {
        let plain = self.is_plain();
        match self.kind {
            NodeKind::Transform { op: inner, children } if plain && op.same_kind(&inner) => {
                match op.combine(&inner) {
                    Ok(Some(folded)) => {
                        debug!(op = op.name(), "folded nested transformation");
                        Node::new(NodeKind::Transform { op: folded, children })
                    }
                    _ => Node::new(NodeKind::Transform {
                        op,
                        children: vec![Node::new(NodeKind::Transform { op: inner, children })],
                    }),
                }
            }
            NodeKind::Union(children) if plain && !children.is_empty() => {
                Node::new(NodeKind::Transform { op, children })
            }
            kind => Node::new(NodeKind::Transform {
                op,
                children: vec![Node {
                    kind,
                    modifier: self.modifier,
                    comment: self.comment,
                }],
            }),
        }
    }

    // Translation

    pub fn translate(self, x: f64, y: f64, z: f64) -> Node {
        if x == 0.0 && y == 0.0 && z == 0.0 {
            return self;
        }
        self.transform(TransformOp::Translate(Vec3::new(x, y, z)))
    }

    pub fn x_translate(self, x: f64) -> Node {
        self.translate(x, 0.0, 0.0)
    }

    pub fn y_translate(self, y: f64) -> Node {
        self.translate(0.0, y, 0.0)
    }

    pub fn z_translate(self, z: f64) -> Node {
        self.translate(0.0, 0.0, z)
    }

    pub fn rightward(self, distance: f64) -> Node {
        self.x_translate(distance)
    }

    pub fn leftward(self, distance: f64) -> Node {
        self.x_translate(-distance)
    }

    pub fn forward(self, distance: f64) -> Node {
        self.y_translate(distance)
    }

    pub fn backward(self, distance: f64) -> Node {
        self.y_translate(-distance)
    }

    pub fn up(self, distance: f64) -> Node {
        self.z_translate(distance)
    }

    pub fn down(self, distance: f64) -> Node {
        self.z_translate(-distance)
    }

    // Rotation

    /// Rotate by per-axis angles in degrees, applied X first, then Y, then Z
    pub fn rotate(self, x: f64, y: f64, z: f64) -> Node {
        let angles = Vec3::new(normalize_angle(x), normalize_angle(y), normalize_angle(z));
        if angles == Vec3::zeros() {
            return self;
        }
        self.transform(TransformOp::Rotate(angles))
    }

    /// Rotate about a pivot other than the origin
    pub fn rotate_around(self, angles: Vec3, center: Vec3) -> Node {
        let normalized = angles.map(normalize_angle);
        if normalized == Vec3::zeros() {
            return self;
        }
        self.translate(-center.x, -center.y, -center.z)
            .rotate(angles.x, angles.y, angles.z)
            .translate(center.x, center.y, center.z)
    }

    pub fn x_rotate(self, angle: f64) -> Node {
        self.rotate(angle, 0.0, 0.0)
    }

    pub fn y_rotate(self, angle: f64) -> Node {
        self.rotate(0.0, angle, 0.0)
    }

    pub fn z_rotate(self, angle: f64) -> Node {
        self.rotate(0.0, 0.0, angle)
    }

    pub fn left_to_right(self) -> Node {
        self.z_rotate(180.0)
    }

    pub fn left_to_top(self) -> Node {
        self.y_rotate(90.0).z_rotate(90.0)
    }

    pub fn left_to_bottom(self) -> Node {
        self.y_rotate(-90.0).z_rotate(90.0)
    }

    pub fn left_to_front(self) -> Node {
        self.z_rotate(-90.0)
    }

    pub fn left_to_back(self) -> Node {
        self.z_rotate(90.0)
    }

    pub fn right_to_bottom(self) -> Node {
        self.y_rotate(90.0).z_rotate(-90.0)
    }

    pub fn right_to_top(self) -> Node {
        self.y_rotate(-90.0).z_rotate(90.0)
    }

    pub fn right_to_front(self) -> Node {
        self.z_rotate(90.0)
    }

    pub fn right_to_back(self) -> Node {
        self.z_rotate(-90.0)
    }

    pub fn right_to_left(self) -> Node {
        self.z_rotate(180.0)
    }

    pub fn front_to_left(self) -> Node {
        self.z_rotate(90.0)
    }

    pub fn front_to_right(self) -> Node {
        self.z_rotate(-90.0)
    }

    pub fn front_to_top(self) -> Node {
        self.x_rotate(90.0).z_rotate(180.0)
    }

    pub fn front_to_bottom(self) -> Node {
        self.x_rotate(-90.0).z_rotate(180.0)
    }

    pub fn front_to_back(self) -> Node {
        self.z_rotate(180.0)
    }

    pub fn back_to_left(self) -> Node {
        self.z_rotate(-90.0)
    }

    pub fn back_to_right(self) -> Node {
        self.z_rotate(90.0)
    }

    pub fn back_to_front(self) -> Node {
        self.z_rotate(180.0)
    }

    pub fn back_to_top(self) -> Node {
        self.x_rotate(-90.0)
    }

    pub fn back_to_bottom(self) -> Node {
        self.x_rotate(90.0)
    }

    pub fn top_to_bottom(self) -> Node {
        self.x_rotate(180.0)
    }

    pub fn bottom_to_left(self) -> Node {
        self.x_rotate(-90.0).z_rotate(-90.0)
    }

    pub fn bottom_to_right(self) -> Node {
        self.x_rotate(-90.0).z_rotate(90.0)
    }

    pub fn bottom_to_front(self) -> Node {
        self.x_rotate(-90.0).z_rotate(180.0)
    }

    pub fn bottom_to_back(self) -> Node {
        self.x_rotate(-90.0)
    }

    pub fn bottom_to_top(self) -> Node {
        self.x_rotate(180.0)
    }

    pub fn top_to_front(self) -> Node {
        self.x_rotate(-90.0).y_rotate(180.0)
    }

    pub fn top_to_back(self) -> Node {
        self.x_rotate(90.0)
    }

    pub fn top_to_left(self) -> Node {
        self.x_rotate(90.0).z_rotate(-90.0)
    }

    pub fn top_to_right(self) -> Node {
        self.x_rotate(90.0).z_rotate(90.0)
    }

    /// Half turn about Y, or about X when `x_axis` is set
    pub fn upside_down(self, x_axis: bool) -> Node {
        if x_axis {
            self.x_rotate(180.0)
        } else {
            self.y_rotate(180.0)
        }
    }

    // Scaling and mirroring

    pub fn scale(self, x: f64, y: f64, z: f64) -> Node {
        self.transform(TransformOp::Scale(Vec3::new(x, y, z)))
    }

    /// Mirror through the plane normal to `(x, y, z)` passing by the origin
    pub fn mirror(self, x: f64, y: f64, z: f64) -> Node {
        self.transform(TransformOp::Mirror(Vec3::new(x, y, z)))
    }

    /// Mirror through the plane `x = center`
    pub fn x_mirror(self, center: f64) -> Node {
        self.leftward(center).mirror(1.0, 0.0, 0.0).rightward(center)
    }

    pub fn y_mirror(self, center: f64) -> Node {
        self.backward(center).mirror(0.0, 1.0, 0.0).forward(center)
    }

    pub fn z_mirror(self, center: f64) -> Node {
        self.down(center).mirror(0.0, 0.0, 1.0).up(center)
    }

    /// Mirror through the plane `x = center`, keeping the original
    pub fn x_symmetry(self, center: f64) -> Node {
        self.clone().x_mirror(center).union_with(self)
    }

    pub fn y_symmetry(self, center: f64) -> Node {
        self.clone().y_mirror(center).union_with(self)
    }

    pub fn z_symmetry(self, center: f64) -> Node {
        self.clone().z_mirror(center).union_with(self)
    }

    // Extrusions and 2D operators

    pub fn project(self, cut: bool) -> Node {
        self.transform(TransformOp::Projection { cut })
    }

    pub fn linear_extrude(self, height: f64, options: ExtrudeOptions) -> Node {
        self.transform(TransformOp::LinearExtrude { height, options })
    }

    /// Extrude a flat shape along `axis` so that it covers `span`.
    ///
    /// The extrusion grows towards the positive direction of the axis, or the
    /// negative one when `reversed` is set.
    pub fn linear_extrude_along(
        self,
        axis: Axis,
        span: &AxisSpec,
        reversed: bool,
        options: ExtrudeOptions,
    ) -> Result<Node> {
        let solved = resolve_axis(span)?;
        let extrusion = self.linear_extrude(solved.distance, options);
        let (oriented, edge, target) = match (axis, reversed) {
            (Axis::Z, false) => (extrusion, Edge::Top, solved.to),
            (Axis::Z, true) => (extrusion.top_to_bottom(), Edge::Bottom, solved.from),
            (Axis::Y, false) => (extrusion.top_to_front(), Edge::Front, solved.to),
            (Axis::Y, true) => (extrusion.top_to_back(), Edge::Back, solved.from),
            (Axis::X, false) => (extrusion.top_to_right(), Edge::Right, solved.to),
            (Axis::X, true) => (extrusion.top_to_left(), Edge::Left, solved.from),
        };
        oriented.align(Alignment::new().edge(edge, target))
    }

    pub fn rotational_extrude(self, angle: f64, convexity: Option<u32>, segments: Option<u32>) -> Node {
        self.transform(TransformOp::rotate_extrude(angle, convexity, segments))
    }

    /// Revolve a flat profile around a vertical axis.
    ///
    /// The profile is pushed out by `radius`, swept over the solved angle
    /// span starting at its `from` angle, moved onto `(center_x, center_y)`
    /// and placed vertically along `z`.
    pub fn z_rotational_extrude(self, options: &RevolveOptions) -> Result<Node> {
        let z = resolve_axis(&AxisSpec {
            distance: Some(self.depth()?),
            ..options.z
        })?;
        let (start, sweep) = if options.angle == AxisSpec::default() {
            (0.0, 360.0)
        } else {
            let angle = resolve_axis(&options.angle)?;
            (angle.from, angle.distance)
        };
        self.x_translate(options.radius)
            .rotational_extrude(sweep, options.convexity, options.segments)
            .z_rotate(start)
            .translate(options.center_x, options.center_y, 0.0)
            .align(Alignment::new().bottom(z.from))
    }

    /// Round offset of a flat shape by `r`
    pub fn offset(self, r: f64) -> Node {
        self.transform(TransformOp::Offset {
            r: Some(r),
            delta: None,
            chamfer: false,
        })
    }

    /// Straight offset of a flat shape by `delta`
    pub fn offset_delta(self, delta: f64, chamfer: bool) -> Node {
        self.transform(TransformOp::Offset {
            r: None,
            delta: Some(delta),
            chamfer,
        })
    }

    /// The band between the shape and its offset by `r`: the grown rim when
    /// `r` is positive, the peeled skin when it is negative
    pub fn inverted_offset(self, r: f64) -> Node {
        if r < 0.0 {
            self.clone().subtract(self.offset(r))
        } else {
            self.clone().offset(r).subtract(self)
        }
    }

    pub fn hull(self) -> Node {
        self.transform(TransformOp::Hull)
    }

    pub fn color(self, name: impl Into<String>, alpha: Option<f64>) -> Node {
        self.transform(TransformOp::Color {
            name: name.into(),
            alpha,
        })
    }

    /// Sweep along `(x, y, z)`; the box stays the one of the unmoved node
    pub fn slide(self, x: f64, y: f64, z: f64) -> Node {
        self.transform(TransformOp::Slide(Vec3::new(x, y, z)))
    }

    /// Ask the renderer to cache this subtree
    pub fn cache_render(self, convexity: u32) -> Node {
        self.transform(TransformOp::Render { convexity })
    }

    // Boolean combinations

    fn into_operands(self, same: fn(&NodeKind) -> bool) -> Vec<Node> {
        if !(self.is_plain() && same(&self.kind)) {
            return vec![self];
        }
        match self.kind {
            NodeKind::Union(children) | NodeKind::Difference(children) | NodeKind::Intersection(children) => {
                children
            }
            kind => vec![Node::new(kind)],
        }
    }

    pub fn union_with(self, other: impl Into<Node>) -> Node {
        let mut operands = self.into_operands(|kind| matches!(kind, NodeKind::Union(_)));
        operands.push(other.into());
        Node::new(NodeKind::Union(operands))
    }

    pub fn subtract(self, other: impl Into<Node>) -> Node {
        self.subtract_all([other.into()])
    }

    pub fn subtract_all<I, N>(self, others: I) -> Node
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        let mut operands = self.into_operands(|kind| matches!(kind, NodeKind::Difference(_)));
        operands.extend(others.into_iter().map(Into::into));
        Node::new(NodeKind::Difference(operands))
    }

    pub fn intersect_with(self, other: impl Into<Node>) -> Node {
        let mut operands = self.into_operands(|kind| matches!(kind, NodeKind::Intersection(_)));
        operands.push(other.into());
        Node::new(NodeKind::Intersection(operands))
    }

    pub fn union_all<I, N>(nodes: I) -> Node
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Node::new(NodeKind::Union(nodes.into_iter().map(Into::into).collect()))
    }

    /// First node minus all the following ones
    pub fn difference<I, N>(nodes: I) -> Node
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Node::new(NodeKind::Difference(nodes.into_iter().map(Into::into).collect()))
    }

    pub fn intersection<I, N>(nodes: I) -> Node
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Node::new(NodeKind::Intersection(nodes.into_iter().map(Into::into).collect()))
    }

    pub fn hull_of<I, N>(nodes: I) -> Node
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Node::new(NodeKind::Transform {
            op: TransformOp::Hull,
            children: nodes.into_iter().map(Into::into).collect(),
        })
    }

    pub fn minkowski<I, N>(nodes: I) -> Node
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Node::new(NodeKind::Transform {
            op: TransformOp::Minkowski,
            children: nodes.into_iter().map(Into::into).collect(),
        })
    }

    // Positioning

    /// Translate so that the named edges or centers land on their targets.
    /// Axes without a target are left untouched.
    pub fn align(self, alignment: Alignment) -> Result<Node> {
        let x = alignment.offset(&self, Axis::X)?;
        let y = alignment.offset(&self, Axis::Y)?;
        let z = alignment.offset(&self, Axis::Z)?;
        Ok(self.translate(x, y, z))
    }

    /// Cuboid spanning the three solved axes
    pub fn volume(x: &AxisSpec, y: &AxisSpec, z: &AxisSpec) -> Result<Node> {
        let x = resolve_axis(x)?;
        let y = resolve_axis(y)?;
        let z = resolve_axis(z)?;
        Ok(Node::from(Primitive::cube(x.distance, y.distance, z.distance))
            .translate(x.center, y.center, z.center))
    }

    /// Cuboid occupying exactly this node's bounding box
    pub fn bounding_box_node(&self) -> Result<Node> {
        Ok(box_node(&self.bounding_box()?))
    }

    /// Split along the plane `axis = at` into the parts below and above it,
    /// each pulled back by `gap` from the plane.
    pub fn divide(&self, axis: Axis, at: f64, gap: f64) -> Result<(Node, Node)> {
        let bbox = self.bounding_box()?;
        let i = axis.index();
        if !(bbox.min[i] < at && at < bbox.max[i]) {
            return Err(ModelError::InvalidArgument(format!(
                "{} = {} does not divide the object, which spans {} to {}",
                axis.name(),
                at,
                bbox.min[i],
                bbox.max[i]
            )));
        }

        let mut low = bbox;
        low.max[i] = at - gap;
        let mut high = bbox;
        high.min[i] = at + gap;

        Ok((
            self.clone().intersect_with(box_node(&low)),
            self.clone().intersect_with(box_node(&high)),
        ))
    }

    /// Leaves of the tree, each wrapped in the transformations above it
    pub fn walk(&self) -> Vec<Node> {
        match &self.kind {
            NodeKind::Primitive(_) => vec![self.clone()],
            NodeKind::Transform { op, children } => children
                .iter()
                .flat_map(Node::walk)
                .map(|leaf| {
                    Node::new(NodeKind::Transform {
                        op: op.clone(),
                        children: vec![leaf],
                    })
                })
                .collect(),
            NodeKind::Union(children) | NodeKind::Difference(children) | NodeKind::Intersection(children) => {
                children.iter().flat_map(Node::walk).collect()
            }
            NodeKind::Part(part) => part.walk(),
        }
    }

    // Roles

    /// Mark as a hole, subtracted from the part that holds it
    pub fn hole(self) -> Hole {
        Hole::new(self)
    }

    /// Mark as a miscellaneous item, shown but ignored by the part's box
    pub fn misc(self) -> Misc {
        Misc::new(self)
    }

    // Modifiers

    pub fn disable(self) -> Node {
        self.set_modifier(Modifier::Disable)
    }

    pub fn debug(self) -> Node {
        self.set_modifier(Modifier::Debug)
    }

    pub fn background(self) -> Node {
        self.set_modifier(Modifier::Background)
    }

    pub fn root(self) -> Node {
        self.set_modifier(Modifier::Root)
    }

    pub fn remove_modifier(self) -> Node {
        self.set_modifier(Modifier::None)
    }
}
