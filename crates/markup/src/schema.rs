//! Attribute legality
//!
//! Which attribute kinds may sit on which element kinds. Nothing is legal
//! unless declared: an element the schema has never heard of accepts no
//! attributes at all, and must be used bare.
//!
//! Two ways to declare:
//! - [`ElementKind`]: a `const` tag declaration carrying its own legal set,
//!   checked whenever it builds a node
//! - [`Schema`]: a runtime table collaborators extend with
//!   [`Schema::define`] without touching this crate

use ahash::{AHashMap, AHashSet};

use crate::attribute::{Attribute, AttributeKind, Attributes};
use crate::error::{MarkupError, Result};
use crate::types::{Node, NodeRecord};

/// Shared check: first attribute `legal` rejects becomes the error
fn check_with<F>(element: &str, attributes: &[Attribute], legal: F) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    match attributes.iter().find(|a| !legal(a.name())) {
        Some(offender) => {
            tracing::debug!(
                element,
                attribute = offender.name(),
                "rejected attribute not declared for element"
            );
            Err(MarkupError::SchemaViolation {
                element: element.to_string(),
                attribute: offender.name().to_string(),
            })
        }
        None => Ok(()),
    }
}

/// Static declaration of one element kind and its legal attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementKind {
    name: &'static str,
    legal: &'static [AttributeKind],
}

impl ElementKind {
    pub const fn new(name: &'static str, legal: &'static [AttributeKind]) -> Self {
        Self { name, legal }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn legal_attributes(&self) -> &'static [AttributeKind] {
        self.legal
    }

    pub fn allows(&self, attribute: &str) -> bool {
        self.legal.iter().any(|kind| kind.name() == attribute)
    }

    /// Bare element of this kind
    pub fn node(&self) -> Node {
        Node::element(self.name)
    }

    /// Element of this kind carrying `attributes`, in order
    pub fn with<I>(&self, attributes: I) -> Result<Node>
    where
        I: IntoIterator<Item = Attribute>,
    {
        let attributes: Attributes = attributes.into_iter().collect();
        check_with(self.name, &attributes, |name| self.allows(name))?;
        Ok(Node::with_attributes(self.name, attributes))
    }
}

/// Runtime legality table: element name -> legal attribute names
#[derive(Debug, Clone, Default)]
pub struct Schema {
    elements: AHashMap<String, AHashSet<String>>,
}

impl Schema {
    /// Empty schema: every element is bare-only
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `element`, or widen its legal set if already declared.
    /// Takes [`AttributeKind`]s or plain names.
    pub fn define<I, S>(&mut self, element: impl Into<String>, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let legal = self.elements.entry(element.into()).or_default();
        legal.extend(attributes.into_iter().map(|name| name.as_ref().to_string()));
        self
    }

    /// Copy an [`ElementKind`] declaration into the table
    pub fn register(&mut self, kind: ElementKind) -> &mut Self {
        self.define(kind.name(), kind.legal_attributes())
    }

    pub fn is_defined(&self, element: &str) -> bool {
        self.elements.contains_key(element)
    }

    pub fn allows(&self, element: &str, attribute: &str) -> bool {
        self.elements
            .get(element)
            .is_some_and(|legal| legal.contains(attribute))
    }

    /// True iff every given attribute kind is legal on `element`
    pub fn allows_all<'a, I>(&self, element: &str, attributes: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        attributes
            .into_iter()
            .all(|attribute| self.allows(element, attribute))
    }

    /// Fails on the first attribute `element` does not accept
    pub fn check(&self, element: &str, attributes: &[Attribute]) -> Result<()> {
        check_with(element, attributes, |name| self.allows(element, name))
    }

    /// Validated element constructor
    pub fn element<I>(&self, name: impl Into<String>, attributes: I) -> Result<Node>
    where
        I: IntoIterator<Item = Attribute>,
    {
        let name = name.into();
        let attributes: Attributes = attributes.into_iter().collect();
        self.check(&name, &attributes)?;
        Ok(Node::with_attributes(name, attributes))
    }

    /// Read a node value back from its JSON form (see
    /// [`crate::Cursor::to_json`]). The shape and every element's attributes
    /// are checked against this schema before the value is handed out.
    pub fn parse_json(&self, json: &str) -> Result<Node> {
        let record: NodeRecord = serde_json::from_str(json)?;
        let node = Node::from(record);
        node.check_shape()?;

        let mut stack = vec![&node];
        while let Some(current) = stack.pop() {
            if current.is_element() {
                self.check(current.name(), current.attributes())?;
            }
            stack.extend(current.children());
        }

        Ok(node)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
