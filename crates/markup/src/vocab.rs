//! Demonstration vocabulary
//!
//! Just enough schema to show the shape: one link element and its target
//! attribute. Real vocabularies live with collaborators, declared the same
//! way.

use crate::attribute::AttributeKind;
use crate::schema::{ElementKind, Schema};

/// `href`: link target
pub const HREF: AttributeKind = AttributeKind::new("href");

/// `<a>`: accepts `href`
pub const A: ElementKind = ElementKind::new("a", &[HREF]);

impl Schema {
    /// Schema holding the demonstration vocabulary
    pub fn html() -> Self {
        let mut schema = Schema::new();
        schema.register(A);
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;

    #[test]
    fn test_anchor_takes_href() {
        let link = A.with([HREF.with_value("/docs")]).unwrap();
        assert_eq!(link.attributes(), &[Attribute::new("href", "/docs")]);
    }

    #[test]
    fn test_html_schema() {
        let schema = Schema::html();
        assert!(schema.allows("a", "href"));
        assert!(!schema.allows("div", "href"));
    }
}
