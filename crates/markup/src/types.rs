//! Core type definitions
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. A parent owns its children through `children_ids`; `parent_id` is a
//!    plain index and never keeps anything alive
//! 3. Use SmallVec for small arrays (avoid heap allocation)
//! 4. Node kinds are an enum, not magic names

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::Not;

use crate::attribute::{Attribute, Attributes};
use crate::error::{MarkupError, Result};

/// Node identifier (index into arena)
pub type NodeId = u32;

/// Index of the structural root every composed tree starts with
pub const ROOT_NODE: NodeId = 0;

/// What a node is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// `<name ...>children</name>`
    Element,
    /// Literal text, rendered verbatim
    Text,
    /// Structural container with no tag of its own
    Fragment,
}

/// Sentinel value, the identity element of composition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Empty;

/// The sentinel every composition chain starts from
pub const EMPTY: Empty = Empty;

/// A detached node value
///
/// This is what constructors return and what the composition operators
/// consume. Once inserted, a node lives in a [`crate::DomArena`] and is
/// reached through a [`crate::Cursor`]; [`crate::Cursor::snapshot`] copies it
/// back out as a `Node` with its children filled in.
///
/// A value is a plain nested structure: dropping it or writing it as JSON
/// recurses once per level. Trees held in an arena have no such limit.
///
/// There is no public `Deserialize`: a value read from JSON has to pass
/// [`crate::Schema::parse_json`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    kind: NodeKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(skip_serializing_if = "SmallVec::is_empty")]
    attributes: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
    #[serde(skip_serializing_if = "String::is_empty")]
    text: String,
    #[serde(skip)]
    closing: bool,
}

impl Node {
    /// Element without attributes. Always legal, whatever the schema says.
    pub fn element(name: impl Into<String>) -> Self {
        Self::with_attributes(name, Attributes::new())
    }

    /// Text leaf
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            name: String::new(),
            attributes: Attributes::new(),
            children: Vec::new(),
            text: text.into(),
            closing: false,
        }
    }

    /// Tagless container; renders as the concatenation of its children
    pub fn fragment(children: Vec<Node>) -> Self {
        Self {
            kind: NodeKind::Fragment,
            name: String::new(),
            attributes: Attributes::new(),
            children,
            text: String::new(),
            closing: false,
        }
    }

    /// Element with attributes, no legality check. Callers go through
    /// [`crate::Schema`] or [`crate::ElementKind`].
    pub(crate) fn with_attributes(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            kind: NodeKind::Element,
            name: name.into(),
            attributes,
            children: Vec::new(),
            text: String::new(),
            closing: false,
        }
    }

    /// Rebuild a value from arena data (used by snapshots)
    pub(crate) fn from_parts(
        kind: NodeKind,
        name: String,
        attributes: Attributes,
        text: String,
        children: Vec<Node>,
    ) -> Self {
        Self {
            kind,
            name,
            attributes,
            children,
            text,
            closing: false,
        }
    }

    /// Closing marker for this node: "return to the enclosing element"
    pub fn closing(mut self) -> Self {
        self.closing = true;
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Tag name, empty for text and fragments
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Text body, empty for elements
    pub fn text_body(&self) -> &str {
        &self.text
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Get first attribute value with this name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.value())
    }

    /// Structural check of the whole value, before any of it is inserted
    pub(crate) fn check_shape(&self) -> Result<()> {
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            if node.closing {
                return Err(MarkupError::UnbalancedClose(node.name.clone()));
            }
            let problem = match node.kind {
                NodeKind::Element if node.name.is_empty() => Some("element without a name"),
                NodeKind::Element if !node.text.is_empty() => Some("element with a text body"),
                NodeKind::Text if !node.children.is_empty() => {
                    return Err(MarkupError::TextHasNoChildren)
                }
                NodeKind::Text if !node.name.is_empty() || !node.attributes.is_empty() => {
                    Some("text with a name or attributes")
                }
                NodeKind::Fragment
                    if !node.name.is_empty()
                        || !node.attributes.is_empty()
                        || !node.text.is_empty() =>
                {
                    Some("fragment with a name, attributes or text")
                }
                _ => None,
            };
            if let Some(problem) = problem {
                return Err(MarkupError::MalformedNode(problem.to_string()));
            }

            stack.extend(node.children.iter());
        }

        Ok(())
    }

    pub(crate) fn into_parts(self) -> (DomNode, Vec<Node>) {
        let dom = DomNode {
            node_id: 0,
            kind: self.kind,
            name: self.name,
            attributes: self.attributes,
            text: self.text,
            parent_id: None,
            children_ids: SmallVec::new(),
        };
        (dom, self.children)
    }
}

impl Not for Node {
    type Output = Node;

    /// `!node` is the closing marker for `node`
    fn not(self) -> Node {
        self.closing()
    }
}

/// Generic closing marker
pub fn close() -> Node {
    Node::element("").closing()
}

/// Wire form of a node. Nothing about it is trusted until it has been
/// converted and checked.
#[derive(Debug, Deserialize)]
pub(crate) struct NodeRecord {
    kind: NodeKind,
    #[serde(default)]
    name: String,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    children: Vec<NodeRecord>,
    #[serde(default)]
    text: String,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        Node::from_parts(
            record.kind,
            record.name,
            record.attributes,
            record.text,
            record.children.into_iter().map(Node::from).collect(),
        )
    }
}

/// Node as stored in the arena
///
/// Design philosophy:
/// - Small fixed-size fields first (better packing)
/// - Use indices instead of pointers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomNode {
    pub node_id: NodeId,
    pub kind: NodeKind,

    // Navigation indices
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>, // Most nodes have <4 children

    pub name: String,
    pub attributes: Attributes,
    pub text: String,
}

impl DomNode {
    /// The tagless node a composed tree hangs off
    pub fn root() -> Self {
        Self {
            node_id: ROOT_NODE,
            kind: NodeKind::Fragment,
            parent_id: None,
            children_ids: SmallVec::new(),
            name: String::new(),
            attributes: Attributes::new(),
            text: String::new(),
        }
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.kind == NodeKind::Element {
            Some(&self.name)
        } else {
            None
        }
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Get first attribute value with this name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.value())
    }
}
