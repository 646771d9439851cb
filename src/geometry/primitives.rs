// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives and their closed-form extrema
//!
//! Every solid primitive is centered on the origin. Flat shapes lie in the
//! XY plane, so their Z extrema are zero.

use super::bbox::{Bounded, BoundingBox, Edge, Side};
use crate::ast::value::{Arguments, Value};
use crate::error::{ModelError, Result};
use crate::utils::math::segments_for_diameter;
use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Horizontal anchor of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical anchor of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Center,
    Baseline,
    Bottom,
}

impl HAlign {
    fn as_str(self) -> &'static str {
        match self {
            HAlign::Left => "left",
            HAlign::Center => "center",
            HAlign::Right => "right",
        }
    }
}

impl VAlign {
    fn as_str(self) -> &'static str {
        match self {
            VAlign::Top => "top",
            VAlign::Center => "center",
            VAlign::Baseline => "baseline",
            VAlign::Bottom => "bottom",
        }
    }
}

/// Text shape parameters. Only the anchored edges of a text are known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub text: String,
    pub size: f64,
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub halign: Option<HAlign>,
    #[serde(default)]
    pub valign: Option<VAlign>,
    #[serde(default)]
    pub spacing: Option<f64>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub segments: Option<u32>,
}

impl TextShape {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: 10.0,
            font: None,
            halign: None,
            valign: None,
            spacing: None,
            direction: None,
            language: None,
            script: None,
            segments: None,
        }
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn halign(mut self, halign: HAlign) -> Self {
        self.halign = Some(halign);
        self
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = Some(valign);
        self
    }

    fn extremum(&self, edge: Edge) -> Result<f64> {
        let anchored = match edge {
            Edge::Left => matches!(self.halign, None | Some(HAlign::Left)),
            Edge::Right => self.halign == Some(HAlign::Right),
            Edge::Back => matches!(self.valign, None | Some(VAlign::Baseline) | Some(VAlign::Bottom)),
            Edge::Front => self.valign == Some(VAlign::Top),
            Edge::Bottom | Edge::Top => true,
        };
        if anchored {
            Ok(0.0)
        } else {
            Err(ModelError::UndefinedExtent(format!(
                "text {} edge depends on glyph metrics; anchor it with halign/valign",
                edge.name()
            )))
        }
    }

    fn arguments(&self) -> Arguments {
        Arguments::new()
            .with("text", self.text.as_str())
            .with("size", self.size)
            .with_opt("font", self.font.clone())
            .with_opt("halign", self.halign.map(HAlign::as_str))
            .with_opt("valign", self.valign.map(VAlign::as_str))
            .with_opt("spacing", self.spacing)
            .with_opt("direction", self.direction.clone())
            .with_opt("language", self.language.clone())
            .with_opt("script", self.script.clone())
            .with_opt("$fn", self.segments)
    }
}

/// Leaf shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Cube {
        size: Vector3<f64>,
    },
    Cylinder {
        height: f64,
        diameter: f64,
        top_diameter: Option<f64>,
        segments: u32,
    },
    Sphere {
        diameter: f64,
        segments: u32,
    },
    Circle {
        diameter: f64,
        segments: u32,
    },
    Square {
        width: f64,
        depth: f64,
    },
    Text(TextShape),
    Polygon {
        points: Vec<Point2<f64>>,
        paths: Option<Vec<Vec<usize>>>,
        convexity: Option<u32>,
    },
    Polyhedron {
        points: Vec<Point3<f64>>,
        faces: Vec<Vec<usize>>,
        convexity: u32,
    },
    /// External mesh; its extent is unknown until rendered
    Import {
        file: String,
        convexity: Option<u32>,
        layer: Option<String>,
    },
}

impl Primitive {
    pub fn cube(width: f64, depth: f64, height: f64) -> Self {
        Self::Cube {
            size: Vector3::new(width, depth, height),
        }
    }

    pub fn cylinder(height: f64, diameter: f64) -> Self {
        Self::Cylinder {
            height,
            diameter,
            top_diameter: None,
            segments: segments_for_diameter(diameter),
        }
    }

    /// Truncated cone from a bottom and a top diameter
    pub fn cone(height: f64, bottom_diameter: f64, top_diameter: f64) -> Self {
        Self::Cylinder {
            height,
            diameter: bottom_diameter,
            top_diameter: Some(top_diameter),
            segments: segments_for_diameter(bottom_diameter),
        }
    }

    pub fn sphere(diameter: f64) -> Self {
        Self::Sphere {
            diameter,
            segments: segments_for_diameter(diameter),
        }
    }

    pub fn circle(diameter: f64) -> Self {
        Self::Circle {
            diameter,
            segments: segments_for_diameter(diameter),
        }
    }

    pub fn square(width: f64, depth: f64) -> Self {
        Self::Square { width, depth }
    }

    pub fn text(shape: TextShape) -> Self {
        Self::Text(shape)
    }

    /// Polygon with a single outline and optional holes.
    ///
    /// When holes are given without an outline path, every point belongs to
    /// the outline.
    pub fn polygon(
        points: Vec<Point2<f64>>,
        path: Option<Vec<usize>>,
        hole_paths: Vec<Vec<usize>>,
        convexity: Option<u32>,
    ) -> Self {
        let path = match path {
            None if !hole_paths.is_empty() => Some((0..points.len()).collect()),
            other => other,
        };
        let paths = path.map(|outline| std::iter::once(outline).chain(hole_paths).collect());
        Self::Polygon {
            points,
            paths,
            convexity,
        }
    }

    pub fn polyhedron(points: Vec<Point3<f64>>, faces: Vec<Vec<usize>>, convexity: u32) -> Self {
        Self::Polyhedron {
            points,
            faces,
            convexity,
        }
    }

    pub fn import(file: impl Into<String>) -> Self {
        Self::Import {
            file: file.into(),
            convexity: None,
            layer: None,
        }
    }

    /// Override the facet count of a round primitive; other shapes are unchanged.
    pub fn with_segments(mut self, count: u32) -> Self {
        match &mut self {
            Self::Cylinder { segments, .. }
            | Self::Sphere { segments, .. }
            | Self::Circle { segments, .. } => *segments = count,
            Self::Text(shape) => shape.segments = Some(count),
            _ => {}
        }
        self
    }

    /// OpenSCAD module name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cube { .. } => "cube",
            Self::Cylinder { .. } => "cylinder",
            Self::Sphere { .. } => "sphere",
            Self::Circle { .. } => "circle",
            Self::Square { .. } => "square",
            Self::Text(_) => "text",
            Self::Polygon { .. } => "polygon",
            Self::Polyhedron { .. } => "polyhedron",
            Self::Import { .. } => "import",
        }
    }

    pub fn arguments(&self) -> Arguments {
        match self {
            Self::Cube { size } => Arguments::new().with("size", *size).with("center", true),
            Self::Cylinder {
                height,
                diameter,
                top_diameter: None,
                segments,
            } => Arguments::new()
                .with("h", *height)
                .with("d", *diameter)
                .with("$fn", *segments)
                .with("center", true),
            Self::Cylinder {
                height,
                diameter,
                top_diameter: Some(top),
                segments,
            } => Arguments::new()
                .with("h", *height)
                .with("d1", *diameter)
                .with("d2", *top)
                .with("$fn", *segments)
                .with("center", true),
            Self::Sphere { diameter, segments } | Self::Circle { diameter, segments } => {
                Arguments::new().with("d", *diameter).with("$fn", *segments)
            }
            Self::Square { width, depth } => Arguments::new()
                .with("size", [*width, *depth])
                .with("center", true),
            Self::Text(shape) => shape.arguments(),
            Self::Polygon {
                points,
                paths,
                convexity,
            } => Arguments::new()
                .with("points", points.iter().map(Value::from).collect::<Vec<_>>())
                .with_opt("paths", paths.clone())
                .with_opt("convexity", *convexity),
            Self::Polyhedron {
                points,
                faces,
                convexity,
            } => Arguments::new()
                .with("points", points.iter().map(Value::from).collect::<Vec<_>>())
                .with("faces", faces.clone())
                .with("convexity", *convexity),
            Self::Import {
                file,
                convexity,
                layer,
            } => Arguments::new()
                .with("file", file.as_str())
                .with_opt("convexity", *convexity)
                .with_opt("layer", layer.clone()),
        }
    }
}

fn symmetric(edge: Edge, extent: f64) -> f64 {
    match edge.side() {
        Side::Min => -extent / 2.0,
        Side::Max => extent / 2.0,
    }
}

fn flat(edge: Edge, width: f64, depth: f64) -> f64 {
    match edge {
        Edge::Left | Edge::Right => symmetric(edge, width),
        Edge::Back | Edge::Front => symmetric(edge, depth),
        Edge::Bottom | Edge::Top => 0.0,
    }
}

impl Bounded for Primitive {
    fn extremum(&self, edge: Edge) -> Result<f64> {
        match self {
            Self::Cube { size } => Ok(symmetric(edge, size[edge.axis().index()])),
            Self::Cylinder {
                height,
                diameter,
                top_diameter,
                ..
            } => {
                let width = diameter.max(top_diameter.unwrap_or(0.0));
                Ok(match edge {
                    Edge::Bottom | Edge::Top => symmetric(edge, *height),
                    _ => symmetric(edge, width),
                })
            }
            Self::Sphere { diameter, .. } => Ok(symmetric(edge, *diameter)),
            Self::Circle { diameter, .. } => Ok(flat(edge, *diameter, *diameter)),
            Self::Square { width, depth } => Ok(flat(edge, *width, *depth)),
            Self::Text(shape) => shape.extremum(edge),
            Self::Polygon { points, .. } => {
                if matches!(edge, Edge::Bottom | Edge::Top) {
                    return Ok(0.0);
                }
                let lifted: Vec<Point3<f64>> = points.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
                point_extremum("polygon", &lifted, edge)
            }
            Self::Polyhedron { points, .. } => point_extremum("polyhedron", points, edge),
            Self::Import { file, .. } => Err(ModelError::UndefinedExtent(format!(
                "imported file {} has no known extent",
                file
            ))),
        }
    }
}

fn point_extremum(kind: &str, points: &[Point3<f64>], edge: Edge) -> Result<f64> {
    if points.is_empty() {
        return Err(ModelError::UndefinedExtent(format!("{} has no points", kind)));
    }
    Ok(BoundingBox::from_points(points).get(edge))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_is_centered() {
        let cube = Primitive::cube(8.0, 10.0, 12.0);
        assert_eq!(cube.left().unwrap(), -4.0);
        assert_eq!(cube.front().unwrap(), 5.0);
        assert_eq!(cube.top().unwrap(), 6.0);
        assert_eq!(cube.arguments().to_scad(4), "size=[8, 10, 12], center=true");
    }

    #[test]
    fn test_cylinder_and_cone() {
        let cylinder = Primitive::cylinder(20.0, 10.0);
        assert_eq!(cylinder.width().unwrap(), 10.0);
        assert_eq!(cylinder.bottom().unwrap(), -10.0);
        assert_eq!(cylinder.arguments().to_scad(4), "h=20, d=10, $fn=78, center=true");

        let cone = Primitive::cone(4.0, 2.0, 6.0).with_segments(12);
        assert_eq!(cone.right().unwrap(), 3.0);
        assert_eq!(cone.arguments().to_scad(4), "h=4, d1=2, d2=6, $fn=12, center=true");
    }

    #[test]
    fn test_flat_shapes() {
        let square = Primitive::square(4.0, 6.0);
        assert_eq!(square.back().unwrap(), -3.0);
        assert_eq!(square.height().unwrap(), 0.0);
        assert_eq!(square.arguments().to_scad(4), "size=[4, 6], center=true");

        let circle = Primitive::circle(4.0);
        assert_eq!(circle.arguments().to_scad(4), "d=4, $fn=31");
        assert_eq!(circle.top().unwrap(), 0.0);
    }

    #[test]
    fn test_polygon_extent_and_paths() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), Point2::new(5.0, 8.0)];
        let polygon = Primitive::polygon(points, None, vec![vec![0, 1]], None);
        assert_eq!(polygon.right().unwrap(), 10.0);
        assert_eq!(polygon.front().unwrap(), 8.0);
        assert_eq!(
            polygon.arguments().to_scad(4),
            "points=[[0, 0], [10, 0], [5, 8]], paths=[[0, 1, 2], [0, 1]]"
        );

        let empty = Primitive::polygon(Vec::new(), None, Vec::new(), None);
        assert!(matches!(empty.left(), Err(ModelError::UndefinedExtent(_))));
    }

    #[test]
    fn test_text_defines_anchored_edges_only() {
        let text = Primitive::text(TextShape::new("42"));
        assert_eq!(text.left().unwrap(), 0.0);
        assert_eq!(text.back().unwrap(), 0.0);
        assert!(matches!(text.right(), Err(ModelError::UndefinedExtent(_))));
        assert!(matches!(text.front(), Err(ModelError::UndefinedExtent(_))));

        let text = Primitive::text(TextShape::new("42").halign(HAlign::Right).valign(VAlign::Top));
        assert_eq!(text.right().unwrap(), 0.0);
        assert_eq!(text.front().unwrap(), 0.0);
        assert!(text.left().is_err());
        assert_eq!(
            text.arguments().to_scad(4),
            "text=\"42\", size=10, halign=\"right\", valign=\"top\""
        );
    }

    #[test]
    fn test_import_has_no_extent() {
        let import = Primitive::import("bracket.stl");
        assert!(matches!(import.top(), Err(ModelError::UndefinedExtent(_))));
        assert_eq!(import.arguments().to_scad(4), "file=\"bracket.stl\"");
    }
}
