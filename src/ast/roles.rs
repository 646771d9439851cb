// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Role wrappers for part members

use super::node::Node;
use crate::error::Result;
use crate::geometry::{Bounded, Edge, Primitive};
use serde::{Deserialize, Serialize};

/// Geometry subtracted from the structural children of a part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hole(pub Node);

impl Hole {
    pub fn new(node: Node) -> Self {
        Hole(node)
    }

    /// Merge two holes into one
    pub fn union_with(self, other: Hole) -> Hole {
        Hole(self.0.union_with(other.0))
    }

    pub fn into_node(self) -> Node {
        self.0
    }
}

/// Geometry shown with a part but left out of its box and solid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Misc(pub Node);

impl Misc {
    pub fn new(node: Node) -> Self {
        Misc(node)
    }

    pub fn into_hole(self) -> Hole {
        Hole(self.0)
    }

    pub fn into_node(self) -> Node {
        self.0
    }
}

impl Bounded for Hole {
    fn extremum(&self, edge: Edge) -> Result<f64> {
        self.0.extremum(edge)
    }
}

impl Bounded for Misc {
    fn extremum(&self, edge: Edge) -> Result<f64> {
        self.0.extremum(edge)
    }
}

impl From<Hole> for Node {
    fn from(hole: Hole) -> Self {
        hole.0
    }
}

impl From<Misc> for Node {
    fn from(misc: Misc) -> Self {
        misc.0
    }
}

/// A part member tagged with its role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Member {
    Child(Node),
    Hole(Hole),
    Misc(Misc),
}

impl Member {
    pub fn node(&self) -> &Node {
        match self {
            Member::Child(node) | Member::Hole(Hole(node)) | Member::Misc(Misc(node)) => node,
        }
    }

    pub fn into_node(self) -> Node {
        match self {
            Member::Child(node) | Member::Hole(Hole(node)) | Member::Misc(Misc(node)) => node,
        }
    }
}

impl From<Node> for Member {
    fn from(node: Node) -> Self {
        Member::Child(node)
    }
}

impl From<Primitive> for Member {
    fn from(primitive: Primitive) -> Self {
        Member::Child(Node::from(primitive))
    }
}

impl From<Hole> for Member {
    fn from(hole: Hole) -> Self {
        Member::Hole(hole)
    }
}

impl From<Misc> for Member {
    fn from(misc: Misc) -> Self {
        Member::Misc(misc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_forward_the_box() {
        let hole = Node::from(Primitive::cube(2.0, 2.0, 2.0)).up(3.0).hole();
        assert_eq!(hole.top().unwrap(), 4.0);

        let misc = Node::from(Primitive::sphere(4.0)).misc();
        assert_eq!(misc.left().unwrap(), -2.0);
        assert_eq!(misc.into_hole().right().unwrap(), 2.0);
    }

    #[test]
    fn test_hole_union() {
        let a = Node::from(Primitive::cube(2.0, 2.0, 2.0)).hole();
        let b = Node::from(Primitive::cube(2.0, 2.0, 2.0)).rightward(4.0).hole();
        let merged = a.union_with(b);
        assert_eq!(merged.width().unwrap(), 6.0);
        assert_eq!(merged.into_node().kind.children().len(), 2);
    }

    #[test]
    fn test_member_conversions() {
        let node = Node::from(Primitive::circle(3.0));
        assert!(matches!(Member::from(node.clone()), Member::Child(_)));
        assert!(matches!(Member::from(node.clone().hole()), Member::Hole(_)));
        assert!(matches!(Member::from(node.misc()), Member::Misc(_)));
        assert_eq!(Member::from(Primitive::square(1.0, 2.0)).node().kind.name(), "square");
    }
}
