//! Error types for markup composition
//!
//! Simple, flat error hierarchy. Registry faults are not here: those are
//! programming errors and panic instead.

use thiserror::Error;

use crate::types::NodeId;

pub type Result<T> = std::result::Result<T, MarkupError>;

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("Attribute `{attribute}` is not allowed on <{element}>")]
    SchemaViolation { element: String, attribute: String },

    #[error("Unbalanced close: <{0}> has no parent to return to")]
    UnbalancedClose(String),

    #[error("Text nodes cannot have children")]
    TextHasNoChildren,

    #[error("Malformed node: {0}")]
    MalformedNode(String),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MarkupError {
    /// True for errors caused by a malformed composition chain
    pub fn is_composition_error(&self) -> bool {
        matches!(
            self,
            MarkupError::UnbalancedClose(_)
                | MarkupError::TextHasNoChildren
                | MarkupError::MalformedNode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_violation_names_offender() {
        let err = MarkupError::SchemaViolation {
            element: "div".to_string(),
            attribute: "href".to_string(),
        };
        assert_eq!(err.to_string(), "Attribute `href` is not allowed on <div>");
        assert!(!err.is_composition_error());
    }

    #[test]
    fn test_composition_errors() {
        assert!(MarkupError::UnbalancedClose("div".into()).is_composition_error());
        assert!(MarkupError::TextHasNoChildren.is_composition_error());
        assert!(MarkupError::MalformedNode("text with attributes".into()).is_composition_error());
    }
}
