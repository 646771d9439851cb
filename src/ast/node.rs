// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Model tree node definitions

use super::part::Part;
use super::transform::TransformOp;
use crate::error::{ModelError, Result};
use crate::geometry::{Bounded, BoundingBox, Edge, Extents, Primitive, Side};
use serde::{Deserialize, Serialize};

/// OpenSCAD debug modifier applied to a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    #[default]
    None,
    /// `*` ignore the subtree
    Disable,
    /// `#` highlight the subtree
    Debug,
    /// `%` show as transparent background
    Background,
    /// `!` render only this subtree
    Root,
}

impl Modifier {
    pub fn prefix(self) -> &'static str {
        match self {
            Modifier::None => "",
            Modifier::Disable => "*",
            Modifier::Debug => "#",
            Modifier::Background => "%",
            Modifier::Root => "!",
        }
    }
}

/// A node of the model tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default)]
    pub modifier: Modifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            modifier: Modifier::None,
            comment: None,
        }
    }

    /// True when the node carries no modifier and no comment
    pub fn is_plain(&self) -> bool {
        self.modifier == Modifier::None && self.comment.is_none()
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn set_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }
}

/// Types of tree nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    Primitive(Primitive),

    /// Operator over its children, read as an implicit union
    Transform {
        op: TransformOp,
        children: Vec<Node>,
    },

    // Boolean operations
    Union(Vec<Node>),
    Difference(Vec<Node>),
    Intersection(Vec<Node>),

    Part(Box<Part>),
}

impl NodeKind {
    /// Direct child nodes
    pub fn children(&self) -> &[Node] {
        match self {
            NodeKind::Union(children)
            | NodeKind::Difference(children)
            | NodeKind::Intersection(children)
            | NodeKind::Transform { children, .. } => children,
            NodeKind::Primitive(_) | NodeKind::Part(_) => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Primitive(p) => p.name(),
            NodeKind::Transform { op, .. } => op.name(),
            NodeKind::Union(_) => "union",
            NodeKind::Difference(_) => "difference",
            NodeKind::Intersection(_) => "intersection",
            NodeKind::Part(_) => "part",
        }
    }
}

impl From<Primitive> for Node {
    fn from(primitive: Primitive) -> Self {
        Node::new(NodeKind::Primitive(primitive))
    }
}

impl From<Part> for Node {
    fn from(part: Part) -> Self {
        Node::new(NodeKind::Part(Box::new(part)))
    }
}

/// Extents of the union of `nodes`; an empty set sits at the origin.
pub(crate) fn union_extents<'a, I>(nodes: I) -> Extents
where
    I: IntoIterator<Item = &'a Node>,
{
    let parts: Vec<Extents> = nodes.into_iter().map(Node::extents).collect();
    Extents::union(&parts)
}

impl Node {
    /// Every extremum of the subtree, measured in one bottom-up pass
    pub fn extents(&self) -> Extents {
        match &self.kind {
            NodeKind::Primitive(primitive) => Extents::of(primitive),
            NodeKind::Transform { op, children } => op.extents(children),
            NodeKind::Union(children) => union_extents(children),
            NodeKind::Intersection(children) => {
                if children.is_empty() {
                    return Extents::failed(ModelError::EmptyComposite("intersection".to_string()));
                }
                let parts: Vec<Extents> = children.iter().map(Node::extents).collect();
                // The overlap keeps the innermost bound on each side.
                Extents::from_fn(|edge| {
                    let values = parts.iter().map(|p| p.get(edge)).collect::<Result<Vec<f64>>>()?;
                    Ok(match edge.side() {
                        Side::Min => values.into_iter().fold(f64::NEG_INFINITY, f64::max),
                        Side::Max => values.into_iter().fold(f64::INFINITY, f64::min),
                    })
                })
            }
            NodeKind::Difference(children) => match children.first() {
                Some(first) => first.extents(),
                None => Extents::failed(ModelError::EmptyComposite("difference".to_string())),
            },
            NodeKind::Part(part) => part.extents(),
        }
    }
}

impl Bounded for Node {
    fn extremum(&self, edge: Edge) -> Result<f64> {
        self.extents().get(edge)
    }

    fn bounding_box(&self) -> Result<BoundingBox> {
        self.extents().bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(w: f64, d: f64, h: f64) -> Node {
        Node::from(Primitive::cube(w, d, h))
    }

    #[test]
    fn test_union_box() {
        let union = Node::new(NodeKind::Union(vec![
            cube(2.0, 2.0, 2.0),
            cube(4.0, 1.0, 1.0).translate(3.0, 0.0, 0.0),
        ]));
        assert_eq!(union.left().unwrap(), -1.0);
        assert_eq!(union.right().unwrap(), 5.0);
        assert_eq!(union.front().unwrap(), 1.0);

        let empty = Node::new(NodeKind::Union(Vec::new()));
        assert_eq!(empty.bounding_box().unwrap(), BoundingBox::zero());
    }

    #[test]
    fn test_intersection_box() {
        let node = Node::new(NodeKind::Intersection(vec![
            cube(4.0, 4.0, 4.0),
            cube(4.0, 4.0, 4.0).translate(1.0, -1.0, 0.0),
        ]));
        assert_eq!(node.left().unwrap(), -1.0);
        assert_eq!(node.right().unwrap(), 2.0);
        assert_eq!(node.back().unwrap(), -2.0);
        assert_eq!(node.front().unwrap(), 1.0);

        let empty = Node::new(NodeKind::Intersection(Vec::new()));
        assert!(matches!(empty.left(), Err(ModelError::EmptyComposite(_))));
    }

    #[test]
    fn test_difference_keeps_first_operand_box() {
        let node = Node::new(NodeKind::Difference(vec![
            cube(4.0, 4.0, 4.0),
            cube(10.0, 10.0, 10.0),
        ]));
        assert_eq!(node.bounding_box().unwrap(), cube(4.0, 4.0, 4.0).bounding_box().unwrap());

        let empty = Node::new(NodeKind::Difference(Vec::new()));
        assert!(matches!(empty.top(), Err(ModelError::EmptyComposite(_))));
    }

    #[test]
    fn test_deep_scale_chain_is_measured_in_one_pass() {
        let mut node = cube(8.0, 10.0, 12.0);
        for _ in 0..200 {
            node = node.scale(1.0, 1.0, 1.0);
        }
        assert!(matches!(node.kind, NodeKind::Transform { .. }));
        assert_eq!(node.bounding_box().unwrap(), cube(8.0, 10.0, 12.0).bounding_box().unwrap());
        assert_eq!(node.left().unwrap(), -4.0);
        assert_eq!(node.height().unwrap(), 12.0);
    }

    #[test]
    fn test_modifier_prefix() {
        assert_eq!(Modifier::None.prefix(), "");
        assert_eq!(Modifier::Disable.prefix(), "*");
        assert_eq!(Modifier::Debug.prefix(), "#");
        assert_eq!(Modifier::Background.prefix(), "%");
        assert_eq!(Modifier::Root.prefix(), "!");
    }
}
