// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Transformation operators and their effect on extrema

use super::node::Node;
use super::value::Arguments;
use crate::error::{ModelError, Result};
use crate::geometry::{Edge, Extents, QuarterTurn, Side};
use crate::utils::math::segments_for_angle;
use crate::utils::normalize_angle;
use serde::{Deserialize, Serialize};

/// 3D vector type alias
pub type Vec3 = nalgebra::Vector3<f64>;

/// Parameters of a linear extrusion besides its height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrudeOptions {
    pub center: bool,
    pub convexity: u32,
    pub twist: f64,
    pub slices: Option<u32>,
    pub scale: f64,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            center: false,
            convexity: 10,
            twist: 0.0,
            slices: None,
            scale: 1.0,
        }
    }
}

/// Transformation operators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransformOp {
    Translate(Vec3),
    /// Angles in degrees, normalized to `[0, 360)`
    Rotate(Vec3),
    Scale(Vec3),
    Mirror(Vec3),
    LinearExtrude {
        height: f64,
        options: ExtrudeOptions,
    },
    RotateExtrude {
        angle: f64,
        convexity: Option<u32>,
        segments: u32,
    },
    Offset {
        r: Option<f64>,
        delta: Option<f64>,
        chamfer: bool,
    },
    Projection {
        cut: bool,
    },
    Color {
        name: String,
        alpha: Option<f64>,
    },
    /// Sweep the child along a vector, hulling it with its moved copy
    Slide(Vec3),
    Hull,
    Minkowski,
    Render {
        convexity: u32,
    },
}

impl TransformOp {
    pub fn rotate(x: f64, y: f64, z: f64) -> Self {
        TransformOp::Rotate(Vec3::new(normalize_angle(x), normalize_angle(y), normalize_angle(z)))
    }

    pub fn rotate_extrude(angle: f64, convexity: Option<u32>, segments: Option<u32>) -> Self {
        TransformOp::RotateExtrude {
            angle,
            convexity,
            segments: segments.unwrap_or_else(|| segments_for_angle(angle)),
        }
    }

    /// OpenSCAD module name
    pub fn name(&self) -> &'static str {
        match self {
            TransformOp::Translate(_) => "translate",
            TransformOp::Rotate(_) => "rotate",
            TransformOp::Scale(_) => "scale",
            TransformOp::Mirror(_) => "mirror",
            TransformOp::LinearExtrude { .. } => "linear_extrude",
            TransformOp::RotateExtrude { .. } => "rotate_extrude",
            TransformOp::Offset { .. } => "offset",
            TransformOp::Projection { .. } => "projection",
            TransformOp::Color { .. } => "color",
            TransformOp::Slide(_) => "slide",
            TransformOp::Hull => "hull",
            TransformOp::Minkowski => "minkowski",
            TransformOp::Render { .. } => "render",
        }
    }

    pub fn arguments(&self) -> Arguments {
        match self {
            TransformOp::Translate(v) | TransformOp::Scale(v) | TransformOp::Mirror(v) | TransformOp::Slide(v) => {
                Arguments::new().with("v", *v)
            }
            TransformOp::Rotate(a) => Arguments::new().with("a", *a),
            TransformOp::LinearExtrude { height, options } => Arguments::new()
                .with("height", *height)
                .with("center", options.center)
                .with("convexity", options.convexity)
                .with("twist", options.twist)
                .with_opt("slices", options.slices)
                .with("scale", options.scale),
            TransformOp::RotateExtrude {
                angle,
                convexity,
                segments,
            } => Arguments::new()
                .with("angle", *angle)
                .with_opt("convexity", *convexity)
                .with("$fn", *segments),
            TransformOp::Offset { r, delta, chamfer } => Arguments::new()
                .with_opt("r", *r)
                .with_opt("delta", *delta)
                .with("chamfer", *chamfer),
            TransformOp::Projection { cut } => Arguments::new().with("cut", *cut),
            TransformOp::Color { name, alpha } => Arguments::new()
                .positional(name.as_str())
                .with_opt("alpha", *alpha),
            TransformOp::Hull | TransformOp::Minkowski => Arguments::new(),
            TransformOp::Render { convexity } => Arguments::new().with("convexity", *convexity),
        }
    }

    pub fn same_kind(&self, other: &TransformOp) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Merge this operator applied on top of `inner` into a single operator.
    ///
    /// Returns `Ok(None)` when both are the same operator but cannot be merged
    /// without changing the result, and [`ModelError::InvalidOperand`] when the
    /// operators differ.
    pub fn combine(&self, inner: &TransformOp) -> Result<Option<TransformOp>> {
        match (self, inner) {
            (TransformOp::Translate(outer), TransformOp::Translate(inner)) => {
                Ok(Some(TransformOp::Translate(outer + inner)))
            }
            (TransformOp::Rotate(outer), TransformOp::Rotate(inner)) => {
                // Only rotations that commute with the inner Rz*Ry*Rx order can be summed.
                let commutes = (outer.x == 0.0 && outer.y == 0.0)
                    || (inner.z == 0.0 && outer.x == 0.0 && outer.z == 0.0)
                    || (inner.y == 0.0 && inner.z == 0.0 && outer.y == 0.0 && outer.z == 0.0);
                if commutes {
                    let sum = outer + inner;
                    Ok(Some(TransformOp::rotate(sum.x, sum.y, sum.z)))
                } else {
                    Ok(None)
                }
            }
            _ if self.same_kind(inner) => Ok(None),
            _ => Err(ModelError::InvalidOperand(format!(
                "cannot combine {} with {}",
                self.name(),
                inner.name()
            ))),
        }
    }

    /// Extremum of this operator applied to `children`, read as an implicit union.
    pub fn extremum(&self, edge: Edge, children: &[Node]) -> Result<f64> {
        self.extents(children).get(edge)
    }

    /// All extrema of this operator applied to `children`. Each child is
    /// measured once.
    pub fn extents(&self, children: &[Node]) -> Extents {
        if children.is_empty() {
            return Extents::failed(ModelError::EmptyComposite(self.name().to_string()));
        }
        let parts: Vec<Extents> = children.iter().map(Node::extents).collect();
        let child = Extents::union(&parts);
        Extents::from_fn(|edge| self.map_extremum(edge, &child, &parts))
    }

    fn map_extremum(&self, edge: Edge, union: &Extents, parts: &[Extents]) -> Result<f64> {
        let child = |edge: Edge| union.get(edge);
        let axis = edge.axis().index();

        match self {
            TransformOp::Translate(v) => Ok(child(edge)? + v[axis]),
            TransformOp::Rotate(angles) => QuarterTurn::from_degrees(angles)?.extremum(edge, child),
            TransformOp::Scale(v) => {
                let factor = v[axis];
                let low = child(Edge::new(edge.axis(), Side::Min))? * factor;
                let high = child(Edge::new(edge.axis(), Side::Max))? * factor;
                Ok(match edge.side() {
                    Side::Min => low.min(high),
                    Side::Max => low.max(high),
                })
            }
            TransformOp::Mirror(v) => {
                let flipped = (0..3).filter(|&i| v[i] != 0.0).count();
                if flipped > 1 {
                    return Err(ModelError::UnsupportedTransform(format!(
                        "mirror(v=[{}, {}, {}]) spans more than one axis",
                        v.x, v.y, v.z
                    )));
                }
                if v[axis] != 0.0 {
                    Ok(-child(edge.opposite())?)
                } else {
                    child(edge)
                }
            }
            TransformOp::LinearExtrude { height, options } => linear_extrude_extremum(edge, *height, options, child),
            TransformOp::RotateExtrude { angle, .. } => rotate_extrude_extremum(edge, *angle, child),
            TransformOp::Offset { r: Some(r), .. } if *r >= 0.0 => Ok(match edge {
                Edge::Bottom | Edge::Top => child(edge)?,
                _ => match edge.side() {
                    Side::Min => child(edge)? - r,
                    Side::Max => child(edge)? + r,
                },
            }),
            TransformOp::Projection { .. } => match edge {
                Edge::Bottom | Edge::Top => Ok(0.0),
                _ => child(edge),
            },
            TransformOp::Minkowski => parts.iter().map(|p| p.get(edge)).sum::<Result<f64>>(),
            TransformOp::Offset { .. }
            | TransformOp::Color { .. }
            | TransformOp::Slide(_)
            | TransformOp::Hull
            | TransformOp::Render { .. } => child(edge),
        }
    }
}

fn linear_extrude_extremum<F>(edge: Edge, height: f64, options: &ExtrudeOptions, child: F) -> Result<f64>
where
    F: Fn(Edge) -> Result<f64>,
{
    match edge {
        Edge::Bottom if options.center => Ok(child(Edge::Bottom)? - height / 2.0),
        Edge::Top if options.center => Ok(child(Edge::Bottom)? + height / 2.0),
        Edge::Bottom => child(Edge::Bottom),
        Edge::Top => Ok(child(Edge::Bottom)? + height),
        _ if options.twist != 0.0 => Err(ModelError::UnsupportedTransform(format!(
            "linear_extrude with twist={} has no exact extent",
            options.twist
        ))),
        _ => Ok(child(edge)? * options.scale),
    }
}

/// Exact unit vector at a whole number of degrees, free of rounding noise
/// on the quarter turns.
fn unit(degrees: f64) -> (f64, f64) {
    let normalized = normalize_angle(degrees);
    match normalized {
        a if a == 0.0 => (1.0, 0.0),
        a if a == 90.0 => (0.0, 1.0),
        a if a == 180.0 => (-1.0, 0.0),
        a if a == 270.0 => (0.0, -1.0),
        a => {
            let radians = a.to_radians();
            (radians.cos(), radians.sin())
        }
    }
}

fn rotate_extrude_extremum<F>(edge: Edge, angle: f64, child: F) -> Result<f64>
where
    F: Fn(Edge) -> Result<f64>,
{
    let left = child(Edge::Left)?;
    let right = child(Edge::Right)?;
    if left < 0.0 && right > 0.0 {
        return Err(ModelError::UnsupportedTransform(format!(
            "rotate_extrude of a profile crossing the axis (left={}, right={})",
            left, right
        )));
    }

    match edge {
        Edge::Top => return Ok(child(Edge::Front)?.max(0.0)),
        Edge::Bottom => return Ok(child(Edge::Back)?.min(0.0)),
        _ => {}
    }

    if angle.abs() >= 360.0 {
        let radius = right.max(-left);
        return Ok(match edge.side() {
            Side::Min => -radius,
            Side::Max => radius,
        });
    }

    // A profile on the negative side sweeps the same radii half a turn ahead.
    let (inner, outer, phase) = if right <= 0.0 {
        (-right, -left, 180.0)
    } else {
        (left, right, 0.0)
    };
    let (start, end) = if angle >= 0.0 {
        (phase, phase + angle)
    } else {
        (phase + angle, phase)
    };

    let mut angles = vec![start, end];
    let mut cardinal = (start / 90.0).floor() * 90.0 + 90.0;
    while cardinal < end {
        angles.push(cardinal);
        cardinal += 90.0;
    }

    let axis = edge.axis().index();
    let values = angles.iter().flat_map(|&a| {
        let (cos, sin) = unit(a);
        let component = if axis == 0 { cos } else { sin };
        [inner * component, outer * component]
    });
    Ok(match edge.side() {
        Side::Min => values.fold(f64::INFINITY, f64::min),
        Side::Max => values.fold(f64::NEG_INFINITY, f64::max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;

    fn cube(w: f64, d: f64, h: f64) -> Vec<Node> {
        vec![Node::from(Primitive::cube(w, d, h))]
    }

    #[test]
    fn test_translate_and_scale() {
        let children = cube(2.0, 4.0, 6.0);
        let op = TransformOp::Translate(Vec3::new(1.0, 0.0, -3.0));
        assert_eq!(op.extremum(Edge::Left, &children).unwrap(), 0.0);
        assert_eq!(op.extremum(Edge::Top, &children).unwrap(), 0.0);

        let op = TransformOp::Scale(Vec3::new(-2.0, 1.0, 0.5));
        assert_eq!(op.extremum(Edge::Left, &children).unwrap(), -2.0);
        assert_eq!(op.extremum(Edge::Right, &children).unwrap(), 2.0);
        assert_eq!(op.extremum(Edge::Top, &children).unwrap(), 1.5);
    }

    #[test]
    fn test_mirror() {
        let children = vec![Node::from(Primitive::cube(2.0, 2.0, 2.0)).translate(5.0, 0.0, 0.0)];
        let op = TransformOp::Mirror(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(op.extremum(Edge::Left, &children).unwrap(), -6.0);
        assert_eq!(op.extremum(Edge::Right, &children).unwrap(), -4.0);
        assert_eq!(op.extremum(Edge::Top, &children).unwrap(), 1.0);

        let identity = TransformOp::Mirror(Vec3::zeros());
        assert_eq!(identity.extremum(Edge::Left, &children).unwrap(), 4.0);

        let diagonal = TransformOp::Mirror(Vec3::new(1.0, 1.0, 0.0));
        assert!(matches!(
            diagonal.extremum(Edge::Left, &children),
            Err(ModelError::UnsupportedTransform(_))
        ));
    }

    #[test]
    fn test_linear_extrude() {
        let children = vec![Node::from(Primitive::square(4.0, 6.0))];
        let op = TransformOp::LinearExtrude {
            height: 10.0,
            options: ExtrudeOptions::default(),
        };
        assert_eq!(op.extremum(Edge::Bottom, &children).unwrap(), 0.0);
        assert_eq!(op.extremum(Edge::Top, &children).unwrap(), 10.0);

        let centered = TransformOp::LinearExtrude {
            height: 10.0,
            options: ExtrudeOptions {
                center: true,
                scale: 2.0,
                ..ExtrudeOptions::default()
            },
        };
        assert_eq!(centered.extremum(Edge::Bottom, &children).unwrap(), -5.0);
        assert_eq!(centered.extremum(Edge::Top, &children).unwrap(), 5.0);
        assert_eq!(centered.extremum(Edge::Right, &children).unwrap(), 4.0);

        let twisted = TransformOp::LinearExtrude {
            height: 10.0,
            options: ExtrudeOptions {
                twist: 90.0,
                ..ExtrudeOptions::default()
            },
        };
        assert!(twisted.extremum(Edge::Left, &children).is_err());
        assert_eq!(twisted.extremum(Edge::Top, &children).unwrap(), 10.0);
    }

    #[test]
    fn test_full_rotate_extrude() {
        let profile = vec![Node::from(Primitive::square(2.0, 4.0)).translate(5.0, 1.0, 0.0)];
        let op = TransformOp::rotate_extrude(360.0, None, None);
        assert_eq!(op.extremum(Edge::Left, &profile).unwrap(), -6.0);
        assert_eq!(op.extremum(Edge::Front, &profile).unwrap(), 6.0);
        assert_eq!(op.extremum(Edge::Top, &profile).unwrap(), 3.0);
        assert_eq!(op.extremum(Edge::Bottom, &profile).unwrap(), -1.0);

        let crossing = vec![Node::from(Primitive::square(2.0, 4.0))];
        for edge in Edge::ALL {
            assert!(
                matches!(op.extremum(edge, &crossing), Err(ModelError::UnsupportedTransform(_))),
                "edge {}",
                edge.name()
            );
        }
    }

    #[test]
    fn test_partial_rotate_extrude_sector() {
        let profile = vec![Node::from(Primitive::square(2.0, 2.0)).translate(5.0, 0.0, 0.0)];

        let quarter = TransformOp::rotate_extrude(90.0, None, None);
        assert_eq!(quarter.extremum(Edge::Left, &profile).unwrap(), 0.0);
        assert_eq!(quarter.extremum(Edge::Right, &profile).unwrap(), 6.0);
        assert_eq!(quarter.extremum(Edge::Back, &profile).unwrap(), 0.0);
        assert_eq!(quarter.extremum(Edge::Front, &profile).unwrap(), 6.0);

        let half = TransformOp::rotate_extrude(-180.0, None, None);
        assert_eq!(half.extremum(Edge::Left, &profile).unwrap(), -6.0);
        assert_eq!(half.extremum(Edge::Back, &profile).unwrap(), -6.0);
        assert_eq!(half.extremum(Edge::Front, &profile).unwrap(), 0.0);

        let eighth = TransformOp::rotate_extrude(45.0, None, None);
        assert_eq!(eighth.extremum(Edge::Left, &profile).unwrap(), 4.0 * 45f64.to_radians().cos());
        assert_relative_eq!(eighth.extremum(Edge::Front, &profile).unwrap(), 6.0 * 45f64.to_radians().sin());

        let mirrored = vec![Node::from(Primitive::square(2.0, 2.0)).translate(-5.0, 0.0, 0.0)];
        assert_eq!(quarter.extremum(Edge::Left, &mirrored).unwrap(), -6.0);
        assert_eq!(quarter.extremum(Edge::Back, &mirrored).unwrap(), -6.0);
        assert_eq!(quarter.extremum(Edge::Right, &mirrored).unwrap(), 0.0);
    }

    #[test]
    fn test_offset_projection_minkowski() {
        let children = vec![
            Node::from(Primitive::cube(2.0, 2.0, 2.0)),
            Node::from(Primitive::sphere(4.0)),
        ];
        let grow = TransformOp::Offset {
            r: Some(1.5),
            delta: None,
            chamfer: false,
        };
        assert_eq!(grow.extremum(Edge::Left, &children).unwrap(), -3.5);
        assert_eq!(grow.extremum(Edge::Top, &children).unwrap(), 2.0);

        let shrink = TransformOp::Offset {
            r: Some(-1.0),
            delta: None,
            chamfer: false,
        };
        assert_eq!(shrink.extremum(Edge::Left, &children).unwrap(), -2.0);

        let projection = TransformOp::Projection { cut: false };
        assert_eq!(projection.extremum(Edge::Top, &children).unwrap(), 0.0);

        assert_eq!(TransformOp::Minkowski.extremum(Edge::Right, &children).unwrap(), 3.0);
        assert_eq!(TransformOp::Hull.extremum(Edge::Right, &children).unwrap(), 2.0);
        assert!(TransformOp::Hull.extremum(Edge::Right, &[]).is_err());
    }

    #[test]
    fn test_combine() {
        let outer = TransformOp::Translate(Vec3::new(1.0, 2.0, 3.0));
        let inner = TransformOp::Translate(Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(
            outer.combine(&inner).unwrap(),
            Some(TransformOp::Translate(Vec3::new(0.0, 2.0, 4.0)))
        );

        let z = TransformOp::rotate(0.0, 0.0, 270.0);
        let xz = TransformOp::rotate(90.0, 0.0, 180.0);
        assert_eq!(z.combine(&xz).unwrap(), Some(TransformOp::rotate(90.0, 0.0, 90.0)));
        assert_eq!(xz.combine(&z).unwrap(), None);

        let err = outer.combine(&z).unwrap_err();
        assert!(matches!(err, ModelError::InvalidOperand(_)));
        assert_eq!(TransformOp::Hull.combine(&TransformOp::Hull).unwrap(), None);
    }

    #[test]
    fn test_arguments() {
        assert_eq!(TransformOp::rotate(-90.0, 0.0, 0.0).arguments().to_scad(4), "a=[270, 0, 0]");
        let color = TransformOp::Color {
            name: "red".to_string(),
            alpha: Some(0.5),
        };
        assert_eq!(color.arguments().to_scad(4), "\"red\", alpha=0.5");
        let extrude = TransformOp::LinearExtrude {
            height: 3.0,
            options: ExtrudeOptions::default(),
        };
        assert_eq!(
            extrude.arguments().to_scad(4),
            "height=3, center=false, convexity=10, twist=0, scale=1"
        );
        assert_eq!(
            TransformOp::rotate_extrude(360.0, None, None).arguments().to_scad(4),
            "angle=360, $fn=45"
        );
    }
}
