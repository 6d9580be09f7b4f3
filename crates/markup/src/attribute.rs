//! Markup attributes
//!
//! An [`AttributeKind`] is the unset prototype (`href`), an [`Attribute`] is
//! one instance of it (`href="/home"`). Setting a value never mutates the
//! prototype; it produces a new attribute.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Attribute list of a node, in insertion order. Names may repeat.
pub type Attributes = SmallVec<[Attribute; 2]>;

/// Named-but-unset attribute prototype
///
/// Vocabularies declare these as constants and stamp out instances with
/// [`AttributeKind::with_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeKind {
    name: &'static str,
}

impl AttributeKind {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// New attribute of this kind carrying `value`
    pub fn with_value(&self, value: impl Into<String>) -> Attribute {
        Attribute {
            name: self.name.to_string(),
            value: value.into(),
        }
    }
}

impl AsRef<str> for AttributeKind {
    fn as_ref(&self) -> &str {
        self.name
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// One name/value pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Same name, different value. `self` is left untouched.
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            value: value.into(),
        }
    }

    /// True if this attribute is an instance of `kind`
    pub fn is(&self, kind: AttributeKind) -> bool {
        self.name == kind.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE: AttributeKind = AttributeKind::new("title");

    #[test]
    fn test_prototype_is_reusable() {
        let a = TITLE.with_value("first");
        let b = TITLE.with_value("second");

        assert_eq!(a.name(), "title");
        assert_eq!(a.value(), "first");
        assert_eq!(b.value(), "second");
        assert_eq!(TITLE.name(), "title");
    }

    #[test]
    fn test_with_value_leaves_original() {
        let original = Attribute::new("id", "main");
        let changed = original.with_value("side");

        assert_eq!(original.value(), "main");
        assert_eq!(changed.name(), "id");
        assert_eq!(changed.value(), "side");
    }

    #[test]
    fn test_instance_of_kind() {
        let attr = TITLE.with_value("x");
        assert!(attr.is(TITLE));
        assert!(!Attribute::new("lang", "en").is(TITLE));
        assert_eq!(TITLE.to_string(), "title");
    }
}
