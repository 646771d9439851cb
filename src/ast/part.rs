// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parts: composites whose members are sorted into roles
//!
//! A part type lists its shared members once in [`PartDefinition::declare`].
//! The resulting [`PartLayout`] is cached per type and copied into each new
//! instance before [`PartDefinition::init`] adds the instance members.

use super::node::{union_extents, Modifier, Node};
use super::ops::Alignment;
use super::roles::{Hole, Member, Misc};
use crate::error::{ModelError, Result};
use crate::geometry::{Bounded, Edge, Extents, Primitive};
use crate::utils::camel_to_snake;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Hook applied to the rendered geometry of a part
pub type PostProcess = fn(Node) -> Result<Node>;

/// Overlap of the mask of a revolved part beyond the profile
pub const REVOLVE_MASK_MARGIN: f64 = 0.04;

/// Full turn around the Z axis
pub fn revolve(node: Node) -> Result<Node> {
    Ok(node.rotational_extrude(360.0, None, None))
}

/// Members declared for every instance of a part type
#[derive(Debug, Clone, Default)]
pub struct PartLayout {
    members: Vec<(String, Member)>,
}

fn registry() -> &'static DashMap<TypeId, PartLayout> {
    static REGISTRY: OnceLock<DashMap<TypeId, PartLayout>> = OnceLock::new();
    REGISTRY.get_or_init(DashMap::new)
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl PartLayout {
    /// Layout of `T`, captured on first use
    pub fn of<T: PartDefinition>() -> PartLayout {
        let key = TypeId::of::<T>();
        if let Some(layout) = registry().get(&key) {
            return layout.value().clone();
        }

        let mut layout = PartLayout::default();
        T::declare(&mut layout);
        debug!(
            part = short_type_name::<T>(),
            members = layout.members.len(),
            "captured part layout"
        );
        registry().entry(key).or_insert(layout).value().clone()
    }

    /// Declare `field`, replacing an earlier declaration of the same name
    pub fn add(&mut self, field: &str, member: impl Into<Member>) -> &mut Self {
        let member = member.into();
        match self.members.iter_mut().find(|(name, _)| name == field) {
            Some(entry) => entry.1 = member,
            None => self.members.push((field.to_string(), member)),
        }
        self
    }

    pub fn child(&mut self, field: &str, node: impl Into<Node>) -> &mut Self {
        self.add(field, Member::Child(node.into()))
    }

    pub fn hole(&mut self, field: &str, node: impl Into<Node>) -> &mut Self {
        self.add(field, Hole::new(node.into()))
    }

    pub fn misc(&mut self, field: &str, node: impl Into<Node>) -> &mut Self {
        self.add(field, Misc::new(node.into()))
    }

    pub fn members(&self) -> &[(String, Member)] {
        &self.members
    }
}

/// A reusable part type
pub trait PartDefinition: 'static {
    /// Members shared by every instance
    fn declare(_layout: &mut PartLayout) {}

    /// Members that depend on the instance
    fn init(&self, _part: &mut Part) -> Result<()> {
        Ok(())
    }

    /// Applied to the geometry when rendering; the box ignores it
    fn postprocess(node: Node) -> Result<Node> {
        Ok(node)
    }

    fn build(&self) -> Result<Node>
    where
        Self: Sized,
    {
        Part::from_definition(self).map(Node::from)
    }
}

/// A member stored in a part, with the field that holds it if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub field: Option<String>,
    pub node: Node,
}

fn nodes(slots: &[Slot]) -> Vec<Node> {
    slots.iter().map(|slot| slot.node.clone()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Child,
    Hole,
    Misc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub children: Vec<Slot>,
    pub holes: Vec<Slot>,
    pub miscellaneous: Vec<Slot>,
    #[serde(skip)]
    pub postprocess: Option<PostProcess>,
}

impl Part {
    /// An empty part not tied to a definition type
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_definition<T: PartDefinition>(definition: &T) -> Result<Self> {
        let mut part = Part::named(short_type_name::<T>());
        for (field, member) in PartLayout::of::<T>().members {
            part.set(&field, member);
        }
        part.postprocess = Some(T::postprocess);
        definition.init(&mut part)?;
        Ok(part)
    }

    fn slots_mut(&mut self, role: Role) -> &mut Vec<Slot> {
        match role {
            Role::Child => &mut self.children,
            Role::Hole => &mut self.holes,
            Role::Misc => &mut self.miscellaneous,
        }
    }

    /// Assign `member` to `field`.
    ///
    /// The member goes to the list of its role. A member without a comment
    /// is commented with the field name. A previous member of the same field
    /// is replaced, whatever its role.
    pub fn set(&mut self, field: &str, member: impl Into<Member>) -> &mut Self {
        let member = member.into();
        let role = match member {
            Member::Child(_) => Role::Child,
            Member::Hole(_) => Role::Hole,
            Member::Misc(_) => Role::Misc,
        };
        let mut node = member.into_node();
        if node.comment.is_none() {
            node.comment = Some(field.to_string());
        }
        let slot = Slot {
            field: Some(field.to_string()),
            node,
        };

        if let Some(existing) = self
            .slots_mut(role)
            .iter_mut()
            .find(|s| s.field.as_deref() == Some(field))
        {
            *existing = slot;
            return self;
        }
        for other in [Role::Child, Role::Hole, Role::Misc] {
            self.slots_mut(other).retain(|s| s.field.as_deref() != Some(field));
        }
        self.slots_mut(role).push(slot);
        self
    }

    pub fn add_child(&mut self, node: impl Into<Node>) -> &mut Self {
        self.children.push(Slot {
            field: None,
            node: node.into(),
        });
        self
    }

    pub fn add_hole(&mut self, hole: Hole) -> &mut Self {
        self.holes.push(Slot {
            field: None,
            node: hole.into_node(),
        });
        self
    }

    pub fn add_misc(&mut self, misc: Misc) -> &mut Self {
        self.miscellaneous.push(Slot {
            field: None,
            node: misc.into_node(),
        });
        self
    }

    /// Swap structural children and holes
    pub fn revert(&mut self) -> &mut Self {
        std::mem::swap(&mut self.children, &mut self.holes);
        self
    }

    /// Highlight the structural children
    pub fn debug_children(&mut self) -> &mut Self {
        for slot in &mut self.children {
            slot.node.modifier = Modifier::Debug;
        }
        self
    }

    /// Render this part revolved around the Z axis.
    ///
    /// The profile is drawn flat with its shape on the positive X side. A
    /// mask hole hides everything left of the current center, and [`revolve`]
    /// becomes the postprocess hook. The box stays the one of the profile.
    pub fn revolved(&mut self) -> Result<&mut Self> {
        let mask = Node::from(Primitive::square(
            self.width()? + REVOLVE_MASK_MARGIN,
            self.depth()? + REVOLVE_MASK_MARGIN,
        ))
        .align(Alignment::new().right(self.center_x()?).center_y(self.center_y()?))?;
        self.add_hole(mask.hole());
        self.postprocess = Some(revolve);
        Ok(self)
    }

    /// Default export stem, e.g. `motor_mount` for `MotorMount`
    pub fn file_name(&self) -> String {
        camel_to_snake(&self.name)
    }

    pub(crate) fn walk(&self) -> Vec<Node> {
        self.children
            .iter()
            .chain(&self.miscellaneous)
            .flat_map(|slot| slot.node.walk())
            .collect()
    }

    /// The geometry that is written out for this part
    pub fn renderable(&self) -> Result<Node> {
        let mut children = nodes(&self.children);
        let mut holes = nodes(&self.holes);
        let misc = nodes(&self.miscellaneous);

        if children.is_empty() && misc.is_empty() {
            if holes.is_empty() {
                return Err(ModelError::EmptyComposite(format!("part {}", self.name)));
            }
            warn!(part = %self.name, "part only has holes, rendering them as solids");
            children = std::mem::take(&mut holes);
        }

        let geometry = if children.is_empty() {
            let display = Node::union_all(misc);
            if holes.is_empty() {
                display
            } else {
                display.subtract_all(holes)
            }
        } else {
            let mut solid = Node::union_all(children);
            if !holes.is_empty() {
                solid = solid.subtract_all(holes);
            }
            if misc.is_empty() {
                solid
            } else {
                Node::union_all(std::iter::once(solid).chain(misc))
            }
        };

        match self.postprocess {
            Some(hook) => hook(geometry),
            None => Ok(geometry),
        }
    }
}

impl Part {
    /// Extents of the structural children only
    pub fn extents(&self) -> Extents {
        union_extents(self.children.iter().map(|slot| &slot.node))
    }
}

impl Bounded for Part {
    fn extremum(&self, edge: Edge) -> Result<f64> {
        self.extents().get(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::geometry::Primitive;

    struct MotorMount {
        bore: f64,
    }

    impl PartDefinition for MotorMount {
        fn declare(layout: &mut PartLayout) {
            layout
                .child("plate", Primitive::cube(40.0, 40.0, 4.0))
                .misc("label", Primitive::cube(60.0, 1.0, 1.0));
        }

        fn init(&self, part: &mut Part) -> Result<()> {
            part.set("bore", Node::from(Primitive::cylinder(10.0, self.bore)).hole());
            Ok(())
        }
    }

    struct Turned;

    impl PartDefinition for Turned {
        fn declare(layout: &mut PartLayout) {
            layout.child("profile", Node::from(Primitive::square(2.0, 6.0)).rightward(4.0));
        }

        fn postprocess(node: Node) -> Result<Node> {
            Ok(node.rotational_extrude(360.0, None, None))
        }
    }

    #[test]
    fn test_layout_is_captured_once() {
        let first = PartLayout::of::<MotorMount>();
        let second = PartLayout::of::<MotorMount>();
        assert_eq!(first.members().len(), 2);
        assert_eq!(second.members().len(), 2);
        assert!(registry().contains_key(&TypeId::of::<MotorMount>()));
    }

    #[test]
    fn test_from_definition() {
        let part = Part::from_definition(&MotorMount { bore: 8.0 }).unwrap();
        assert_eq!(part.name, "MotorMount");
        assert_eq!(part.file_name(), "motor_mount");
        assert_eq!(part.children.len(), 1);
        assert_eq!(part.holes.len(), 1);
        assert_eq!(part.miscellaneous.len(), 1);
        assert_eq!(part.children[0].node.comment.as_deref(), Some("plate"));
        assert_eq!(part.holes[0].node.comment.as_deref(), Some("bore"));
    }

    #[test]
    fn test_box_only_counts_children() {
        let part = Part::from_definition(&MotorMount { bore: 80.0 }).unwrap();
        assert_eq!(part.left().unwrap(), -20.0);
        assert_eq!(part.right().unwrap(), 20.0);
        assert_eq!(part.top().unwrap(), 2.0);

        assert_eq!(Part::named("empty").bounding_box().unwrap(), crate::geometry::BoundingBox::zero());
    }

    #[test]
    fn test_set_replaces_across_roles() {
        let mut part = Part::named("Bracket");
        part.set("arm", Primitive::cube(1.0, 1.0, 1.0));
        part.set("arm", Node::from(Primitive::cube(2.0, 2.0, 2.0)).hole());
        assert!(part.children.is_empty());
        assert_eq!(part.holes.len(), 1);

        part.set("arm", Node::from(Primitive::cube(3.0, 3.0, 3.0)).hole());
        assert_eq!(part.holes.len(), 1);
        assert_eq!(part.holes[0].node.top().unwrap(), 1.5);

        part.set("web", Node::from(Primitive::cube(1.0, 1.0, 1.0)).with_comment("kept"));
        assert_eq!(part.children[0].node.comment.as_deref(), Some("kept"));
    }

    #[test]
    fn test_renderable_structure() {
        let part = Part::from_definition(&MotorMount { bore: 8.0 }).unwrap();
        let node = part.renderable().unwrap();
        let NodeKind::Union(items) = &node.kind else {
            panic!("expected a union, got {:?}", node.kind);
        };
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0].kind, NodeKind::Difference(ref c) if c.len() == 2));
        assert_eq!(items[1].comment.as_deref(), Some("label"));
    }

    #[test]
    fn test_holes_only_are_promoted() {
        let mut part = Part::named("Ghost");
        part.add_hole(Node::from(Primitive::cube(1.0, 1.0, 1.0)).hole());
        let node = part.renderable().unwrap();
        assert!(matches!(node.kind, NodeKind::Union(ref c) if c.len() == 1));
    }

    #[test]
    fn test_misc_minus_holes_without_children() {
        let mut part = Part::named("Annotated");
        part.add_misc(Node::from(Primitive::cube(4.0, 4.0, 4.0)).misc());
        part.add_hole(Node::from(Primitive::cube(1.0, 1.0, 1.0)).hole());
        let node = part.renderable().unwrap();
        assert!(matches!(node.kind, NodeKind::Difference(ref c) if c.len() == 2));
    }

    #[test]
    fn test_init_can_replace_postprocess() {
        struct Pulley;

        impl PartDefinition for Pulley {
            fn declare(layout: &mut PartLayout) {
                layout.child("rim", Primitive::square(20.0, 6.0));
            }

            fn init(&self, part: &mut Part) -> Result<()> {
                part.revolved()?;
                Ok(())
            }
        }

        let part = Part::from_definition(&Pulley).unwrap();
        assert_eq!(part.holes.len(), 1);
        assert_eq!(part.holes[0].node.right().unwrap(), 0.0);
        assert_eq!(part.width().unwrap(), 20.0);

        let node = part.renderable().unwrap();
        assert!(matches!(
            node.kind,
            NodeKind::Transform { op: crate::ast::TransformOp::RotateExtrude { .. }, .. }
        ));
    }

    #[test]
    fn test_empty_part_cannot_render() {
        let err = Part::named("Nothing").renderable().unwrap_err();
        assert!(matches!(err, ModelError::EmptyComposite(_)));
    }

    #[test]
    fn test_postprocess_only_at_render() {
        let part = Part::from_definition(&Turned).unwrap();
        assert_eq!(part.left().unwrap(), 3.0);
        let rendered = part.renderable().unwrap();
        assert_eq!(rendered.left().unwrap(), -5.0);
        assert_eq!(rendered.top().unwrap(), 3.0);
    }

    #[test]
    fn test_revert_and_debug_children() {
        let mut part = Part::from_definition(&MotorMount { bore: 8.0 }).unwrap();
        part.revert();
        assert_eq!(part.children[0].node.comment.as_deref(), Some("bore"));
        assert_eq!(part.holes[0].node.comment.as_deref(), Some("plate"));

        part.debug_children();
        assert_eq!(part.children[0].node.modifier, Modifier::Debug);
        assert_eq!(part.holes[0].node.modifier, Modifier::None);
    }

    #[test]
    fn test_build_wraps_in_a_node() {
        let node = MotorMount { bore: 8.0 }.build().unwrap();
        assert!(matches!(node.kind, NodeKind::Part(_)));
        assert_eq!(node.depth().unwrap(), 40.0);
    }
}
