// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! OpenSCAD source generation

use crate::ast::{Modifier, Node, NodeKind, TransformOp, Vec3};
use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Formatting options for generated source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Token prepended once per nesting level
    pub indent: String,
    /// Decimals kept for floating point arguments
    pub precision: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            precision: 4,
        }
    }
}

/// Prefix every line of `code` with `token`
pub fn indent(code: &str, token: &str) -> String {
    format!("{}{}", token, code.replace('\n', &format!("\n{}", token)))
}

/// Precede `code` with one `//` line per comment line
pub fn add_comment(code: &str, comment: Option<&str>) -> String {
    match comment {
        Some(comment) if !comment.is_empty() => {
            let lines: String = comment.split('\n').map(|line| format!("// {}\n", line)).collect();
            format!("{}{}", lines, code)
        }
        _ => code.to_string(),
    }
}

/// Turns a model tree into OpenSCAD source
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render(&self, node: &Node) -> Result<String> {
        self.render_node(node)
    }

    fn render_node(&self, node: &Node) -> Result<String> {
        trace!(kind = node.kind.name(), "rendering node");
        let prefix = node.modifier.prefix();
        let precision = self.options.precision;

        let code = match &node.kind {
            NodeKind::Primitive(primitive) => format!(
                "{}{}({});",
                prefix,
                primitive.name(),
                primitive.arguments().to_scad(precision)
            ),
            NodeKind::Transform {
                op: TransformOp::Slide(offset),
                children,
            } => self.render_slide(node.modifier, offset, children)?,
            NodeKind::Transform { op, children } => format!(
                "{}{}({})\n{}",
                prefix,
                op.name(),
                op.arguments().to_scad(precision),
                self.render_operand(op.name(), children)?
            ),
            NodeKind::Union(children) if children.len() == 1 && node.modifier == Modifier::None => {
                self.render_node(&children[0])?
            }
            NodeKind::Union(children) | NodeKind::Difference(children) | NodeKind::Intersection(children) => {
                if children.is_empty() {
                    return Err(ModelError::EmptyComposite(node.kind.name().to_string()));
                }
                format!("{}{}() {}", prefix, node.kind.name(), self.render_block(children)?)
            }
            NodeKind::Part(part) => {
                let mut geometry = part.renderable()?;
                geometry.modifier = node.modifier;
                self.render_node(&geometry)?
            }
        };

        Ok(add_comment(&code, node.comment.as_deref()))
    }

    /// Children of a transformation: a single statement, or a bare block
    fn render_operand(&self, name: &str, children: &[Node]) -> Result<String> {
        match children {
            [] => Err(ModelError::EmptyComposite(name.to_string())),
            [child] => self.render_node(child),
            _ => self.render_block(children),
        }
    }

    fn render_block(&self, children: &[Node]) -> Result<String> {
        let children = match children {
            [only] if only.is_plain() && matches!(&only.kind, NodeKind::Union(inner) if !inner.is_empty()) => {
                only.kind.children()
            }
            _ => children,
        };

        let mut block = String::from("{");
        for child in children {
            block.push('\n');
            block.push_str(&indent(&self.render_node(child)?, &self.options.indent));
        }
        block.push_str("\n}");
        Ok(block)
    }

    /// A slide is drawn as the hull of each leaf with its moved copy
    fn render_slide(&self, modifier: Modifier, offset: &Vec3, children: &[Node]) -> Result<String> {
        if children.is_empty() {
            return Err(ModelError::EmptyComposite("slide".to_string()));
        }
        let hulls = children.iter().flat_map(Node::walk).map(|leaf| {
            let moved = leaf.clone().translate(offset.x, offset.y, offset.z);
            Node::hull_of([leaf, moved])
        });
        let sweep = Node::union_all(hulls).set_modifier(modifier);
        self.render_node(&sweep)
    }
}

/// Render with the default options
pub fn render(node: &Node) -> Result<String> {
    Renderer::default().render(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Part;
    use crate::geometry::Primitive;

    fn cube(w: f64, d: f64, h: f64) -> Node {
        Node::from(Primitive::cube(w, d, h))
    }

    #[test]
    fn test_indent_and_comment() {
        assert_eq!(indent("a\nb", "  "), "  a\n  b");
        assert_eq!(add_comment("cube();", Some("one\ntwo")), "// one\n// two\ncube();");
        assert_eq!(add_comment("cube();", None), "cube();");
    }

    #[test]
    fn test_primitive() {
        let code = render(&cube(10.0, 20.0, 5.5).debug()).unwrap();
        assert_eq!(code, "#cube(size=[10, 20, 5.5], center=true);");
    }

    #[test]
    fn test_transform_chain() {
        let node = cube(1.0, 1.0, 1.0).translate(1.0, 0.0, 0.0).with_comment("moved").x_rotate(90.0);
        let code = render(&node).unwrap();
        assert_eq!(
            code,
            "rotate(a=[90, 0, 0])\n// moved\ntranslate(v=[1, 0, 0])\ncube(size=[1, 1, 1], center=true);"
        );
    }

    #[test]
    fn test_composites() {
        let node = cube(2.0, 2.0, 2.0).subtract(cube(1.0, 1.0, 1.0).background());
        assert_eq!(
            render(&node).unwrap(),
            "difference() {\n  cube(size=[2, 2, 2], center=true);\n  %cube(size=[1, 1, 1], center=true);\n}"
        );
    }

    #[test]
    fn test_single_child_union_is_inlined() {
        let node = Node::union_all([cube(1.0, 1.0, 1.0)]).with_comment("alone");
        assert_eq!(render(&node).unwrap(), "// alone\ncube(size=[1, 1, 1], center=true);");

        let kept = Node::union_all([cube(1.0, 1.0, 1.0)]).root();
        assert_eq!(render(&kept).unwrap(), "!union() {\n  cube(size=[1, 1, 1], center=true);\n}");
    }

    #[test]
    fn test_nested_union_is_flattened() {
        let inner = cube(1.0, 1.0, 1.0).union_with(cube(2.0, 2.0, 2.0));
        let node = Node::intersection([inner]);
        assert_eq!(
            render(&node).unwrap(),
            "intersection() {\n  cube(size=[1, 1, 1], center=true);\n  cube(size=[2, 2, 2], center=true);\n}"
        );
    }

    #[test]
    fn test_implicit_union_block() {
        let node = cube(1.0, 1.0, 1.0).union_with(cube(2.0, 2.0, 2.0)).up(3.0);
        assert_eq!(
            render(&node).unwrap(),
            "translate(v=[0, 0, 3])\n{\n  cube(size=[1, 1, 1], center=true);\n  cube(size=[2, 2, 2], center=true);\n}"
        );
    }

    #[test]
    fn test_custom_options() {
        let renderer = Renderer::new(RenderOptions {
            indent: "\t".to_string(),
            precision: 2,
        });
        let node = cube(1.0, 1.0, 1.0).subtract(cube(0.12345, 1.0, 1.0));
        assert_eq!(
            renderer.render(&node).unwrap(),
            "difference() {\n\tcube(size=[1, 1, 1], center=true);\n\tcube(size=[0.12, 1, 1], center=true);\n}"
        );
    }

    #[test]
    fn test_slide_renders_hulls() {
        let node = cube(1.0, 1.0, 1.0)
            .union_with(cube(2.0, 2.0, 2.0))
            .slide(5.0, 0.0, 0.0);
        let code = render(&node).unwrap();
        assert!(code.starts_with("union() {\n  hull()\n  {\n    cube(size=[1, 1, 1], center=true);\n"));
        assert_eq!(code.matches("hull()").count(), 2);
        assert_eq!(code.matches("translate(v=[5, 0, 0])").count(), 2);
    }

    #[test]
    fn test_empty_composite_fails() {
        let err = render(&Node::union_all(Vec::<Node>::new())).unwrap_err();
        assert!(matches!(err, ModelError::EmptyComposite(_)));
    }

    #[test]
    fn test_part_carries_node_modifier_and_comment() {
        let mut part = Part::named("Block");
        part.set("body", cube(2.0, 2.0, 2.0));
        part.set("bore", cube(1.0, 1.0, 3.0).hole());
        let node = Node::from(part).with_comment("block").debug();
        assert_eq!(
            render(&node).unwrap(),
            "// block\n#difference() {\n  // body\n  cube(size=[2, 2, 2], center=true);\n  // bore\n  cube(size=[1, 1, 3], center=true);\n}"
        );
    }
}
