//! Markup Composition Library
//!
//! Build HTML-like trees from a stream of open/close tokens, render them to
//! text.
//!
//! ## Philosophy
//!
//! - **Data structures first**: one arena per tree, indices for links
//! - **No special cases**: the sentinel is an identity, not a branch
//! - **Copy, don't alias**: a node lives in exactly one place
//!
//! ## Core Design
//!
//! ```text
//! EMPTY << Node >> Node ... → Cursor ──→ DomArena (owned, slot 0 = root)
//!                               │              ↓
//!                          Root guard    MarkupSerializer → String
//!                               ↓
//!                         RootRegistry (released on last drop)
//! ```
//!
//! ```
//! use markup::{close, Node, EMPTY};
//!
//! # fn main() -> markup::Result<()> {
//! let page = (EMPTY << Node::element("div") << Node::text("hi") >> close())?;
//! assert_eq!(page.render_document()?, "<div>hi</div>");
//! # Ok(())
//! # }
//! ```

pub mod arena;
pub mod attribute;
pub mod compose;
pub mod cursor;
pub mod error;
pub mod registry;
pub mod schema;
pub mod serializer;
pub mod types;
pub mod vocab;

pub use arena::DomArena;
pub use attribute::{Attribute, AttributeKind, Attributes};
pub use compose::{Compose, Operand};
pub use cursor::Cursor;
pub use error::{MarkupError, Result};
pub use registry::{RootId, RootRegistry};
pub use schema::{ElementKind, Schema};
pub use serializer::{MarkupSerializer, SerializerConfig};
pub use types::*;
