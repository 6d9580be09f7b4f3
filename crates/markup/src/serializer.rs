//! Markup serializer - tree to text
//!
//! Pure and deterministic: output depends only on tree shape and content.
//! Nothing is escaped; text and attribute values go out verbatim. Every
//! element gets an open and a close tag, even when empty.
//!
//! ```text
//! Element   <name a="1" b="2">children</name>
//! Text      text
//! Fragment  children
//! ```

use std::fmt::Write;

use crate::arena::DomArena;
use crate::attribute::Attribute;
use crate::error::Result;
use crate::types::{DomNode, Node, NodeId, NodeKind};

/// One unit of pending work in a serializer walk
enum Step<'a, T> {
    Enter(T, usize),
    Exit(&'a str, usize),
}

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    /// One tag or text run per line, indented by depth
    pub pretty: bool,
    /// Spaces per depth level when `pretty`
    pub indent: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
        }
    }
}

impl SerializerConfig {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

/// Markup tree serializer
#[derive(Debug, Clone, Default)]
pub struct MarkupSerializer {
    config: SerializerConfig,
}

impl MarkupSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Serialize the subtree at `node_id`
    pub fn serialize(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        self.write_to(arena, node_id, &mut output)?;
        Ok(output)
    }

    /// Serialize the subtree at `node_id` into any text sink
    pub fn write_to<W: Write>(&self, arena: &DomArena, node_id: NodeId, out: &mut W) -> Result<()> {
        self.serialize_node(arena, node_id, out)
    }

    /// Serialize a detached node value
    pub fn serialize_value(&self, node: &Node) -> Result<String> {
        let mut output = String::with_capacity(256);
        self.write_value(node, &mut output)?;
        Ok(output)
    }

    /// Iterative walk, so tree depth never turns into stack depth
    fn serialize_node<'a, W: Write>(
        &self,
        arena: &'a DomArena,
        node_id: NodeId,
        out: &mut W,
    ) -> Result<()> {
        let mut stack = vec![Step::Enter(node_id, 0)];

        while let Some(step) = stack.pop() {
            let (node_id, depth) = match step {
                Step::Enter(node_id, depth) => (node_id, depth),
                Step::Exit(name, depth) => {
                    self.close_tag(name, depth, out)?;
                    continue;
                }
            };
            let node: &'a DomNode = arena.get(node_id)?;

            match node.kind {
                NodeKind::Element => {
                    self.open_tag(&node.name, &node.attributes, depth, out)?;
                    stack.push(Step::Exit(&node.name, depth));
                    stack.extend(
                        node.children_ids
                            .iter()
                            .rev()
                            .map(|&child_id| Step::Enter(child_id, depth + 1)),
                    );
                }
                NodeKind::Text => self.text(&node.text, depth, out)?,
                // Structural nodes just serialize children
                NodeKind::Fragment => stack.extend(
                    node.children_ids
                        .iter()
                        .rev()
                        .map(|&child_id| Step::Enter(child_id, depth)),
                ),
            }
        }

        Ok(())
    }

    fn write_value<W: Write>(&self, node: &Node, out: &mut W) -> std::fmt::Result {
        let mut stack = vec![Step::Enter(node, 0)];

        while let Some(step) = stack.pop() {
            let (node, depth) = match step {
                Step::Enter(node, depth) => (node, depth),
                Step::Exit(name, depth) => {
                    self.close_tag(name, depth, out)?;
                    continue;
                }
            };

            match node.kind() {
                NodeKind::Element => {
                    self.open_tag(node.name(), node.attributes(), depth, out)?;
                    stack.push(Step::Exit(node.name(), depth));
                    stack.extend(
                        node.children()
                            .iter()
                            .rev()
                            .map(|child| Step::Enter(child, depth + 1)),
                    );
                }
                NodeKind::Text => self.text(node.text_body(), depth, out)?,
                NodeKind::Fragment => stack.extend(
                    node.children()
                        .iter()
                        .rev()
                        .map(|child| Step::Enter(child, depth)),
                ),
            }
        }

        Ok(())
    }

    fn open_tag<W: Write>(
        &self,
        name: &str,
        attributes: &[Attribute],
        depth: usize,
        out: &mut W,
    ) -> std::fmt::Result {
        self.line_start(depth, out)?;
        write!(out, "<{name}")?;
        for attr in attributes {
            write!(out, " {}=\"{}\"", attr.name(), attr.value())?;
        }
        out.write_char('>')?;
        self.line_end(out)
    }

    fn close_tag<W: Write>(&self, name: &str, depth: usize, out: &mut W) -> std::fmt::Result {
        self.line_start(depth, out)?;
        write!(out, "</{name}>")?;
        self.line_end(out)
    }

    fn text<W: Write>(&self, text: &str, depth: usize, out: &mut W) -> std::fmt::Result {
        self.line_start(depth, out)?;
        out.write_str(text)?;
        self.line_end(out)
    }

    fn line_start<W: Write>(&self, depth: usize, out: &mut W) -> std::fmt::Result {
        if self.config.pretty {
            write!(out, "{:width$}", "", width = depth * self.config.indent)?;
        }
        Ok(())
    }

    fn line_end<W: Write>(&self, out: &mut W) -> std::fmt::Result {
        if self.config.pretty {
            out.write_char('\n')?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        MarkupSerializer::new().write_value(self, f)
    }
}
