//! Composition algebra
//!
//! Two operators grow a tree from a left-to-right token stream:
//!
//! - `before` (`<<`): open descends into the new node, close pops to the
//!   parent
//! - `after` (`>>`): open appends but keeps the cursor where it was, close
//!   is a no-op
//!
//! ```text
//! EMPTY << div << text("hi") >> close()       <div>hi</div>
//! ```
//!
//! The sentinel [`EMPTY`](crate::EMPTY) is the identity on either side. A
//! node value composed onto the sentinel (or standing on the left of an
//! operator itself) seeds a new registered tree. A cursor on the right is
//! copied, never aliased.

use std::ops::{Shl, Shr};

use crate::cursor::Cursor;
use crate::error::Result;
use crate::types::{Empty, Node};

/// Right-hand side of a composition
#[derive(Debug, Clone)]
pub enum Operand {
    Empty,
    Node(Node),
    /// Already part of some tree: composed as a deep copy
    Cursor(Cursor),
}

impl From<Empty> for Operand {
    fn from(_: Empty) -> Self {
        Operand::Empty
    }
}

impl From<Node> for Operand {
    fn from(node: Node) -> Self {
        Operand::Node(node)
    }
}

impl From<Cursor> for Operand {
    fn from(cursor: Cursor) -> Self {
        Operand::Cursor(cursor)
    }
}

impl From<&Cursor> for Operand {
    fn from(cursor: &Cursor) -> Self {
        Operand::Cursor(cursor.clone())
    }
}

/// The `before`/`after` pair
pub trait Compose<Rhs> {
    type Output;

    /// Compose and move the cursor into what was opened
    fn before(self, rhs: Rhs) -> Self::Output;

    /// Compose and keep the cursor at the current level
    fn after(self, rhs: Rhs) -> Self::Output;
}

/// Closing markers are handled by [`Cursor::open`] (pops) and
/// [`Cursor::push`] (stays)
impl<T: Into<Operand>> Compose<T> for &Cursor {
    type Output = Result<Cursor>;

    fn before(self, rhs: T) -> Result<Cursor> {
        match rhs.into() {
            Operand::Empty => Ok(self.clone()),
            Operand::Node(node) => self.open(node),
            Operand::Cursor(other) => self.open_copy(&other),
        }
    }

    fn after(self, rhs: T) -> Result<Cursor> {
        match rhs.into() {
            Operand::Empty => Ok(self.clone()),
            Operand::Node(node) => self.push(node),
            Operand::Cursor(other) => self.push_copy(&other),
        }
    }
}

impl<T: Into<Operand>> Compose<T> for Cursor {
    type Output = Result<Cursor>;

    fn before(self, rhs: T) -> Result<Cursor> {
        (&self).before(rhs)
    }

    fn after(self, rhs: T) -> Result<Cursor> {
        (&self).after(rhs)
    }
}

impl<T: Into<Operand>> Compose<T> for Result<Cursor> {
    type Output = Result<Cursor>;

    fn before(self, rhs: T) -> Result<Cursor> {
        self.and_then(|cursor| cursor.before(rhs))
    }

    fn after(self, rhs: T) -> Result<Cursor> {
        self.and_then(|cursor| cursor.after(rhs))
    }
}

impl Compose<Empty> for Empty {
    type Output = Empty;

    fn before(self, _: Empty) -> Empty {
        Empty
    }

    fn after(self, _: Empty) -> Empty {
        Empty
    }
}

impl Compose<Node> for Empty {
    type Output = Result<Cursor>;

    /// Seeds a registered tree, cursor at `node`
    fn before(self, node: Node) -> Result<Cursor> {
        Cursor::seed(node)
    }

    /// Same as `before`: there is no level to stay at yet
    fn after(self, node: Node) -> Result<Cursor> {
        Cursor::seed(node)
    }
}

impl Compose<Cursor> for Empty {
    type Output = Cursor;

    fn before(self, cursor: Cursor) -> Cursor {
        cursor
    }

    fn after(self, cursor: Cursor) -> Cursor {
        cursor
    }
}

impl Compose<&Cursor> for Empty {
    type Output = Cursor;

    fn before(self, cursor: &Cursor) -> Cursor {
        cursor.clone()
    }

    fn after(self, cursor: &Cursor) -> Cursor {
        cursor.clone()
    }
}

impl Compose<Empty> for Node {
    type Output = Node;

    fn before(self, _: Empty) -> Node {
        self
    }

    fn after(self, _: Empty) -> Node {
        self
    }
}

macro_rules! seeded_lhs {
    ($($rhs:ty),*) => {$(
        impl Compose<$rhs> for Node {
            type Output = Result<Cursor>;

            fn before(self, rhs: $rhs) -> Result<Cursor> {
                Cursor::seed(self)?.before(rhs)
            }

            fn after(self, rhs: $rhs) -> Result<Cursor> {
                Cursor::seed(self)?.after(rhs)
            }
        }
    )*};
}

seeded_lhs!(Node, Cursor, &Cursor);

// Operator sugar. `<`/`>` cannot return values in Rust, so the shifts
// stand in: same left associativity, same precedence as each other.

impl<T: Into<Operand>> Shl<T> for Cursor {
    type Output = Result<Cursor>;

    fn shl(self, rhs: T) -> Result<Cursor> {
        self.before(rhs)
    }
}

impl<T: Into<Operand>> Shr<T> for Cursor {
    type Output = Result<Cursor>;

    fn shr(self, rhs: T) -> Result<Cursor> {
        self.after(rhs)
    }
}

impl<T: Into<Operand>> Shl<T> for &Cursor {
    type Output = Result<Cursor>;

    fn shl(self, rhs: T) -> Result<Cursor> {
        self.before(rhs)
    }
}

impl<T: Into<Operand>> Shr<T> for &Cursor {
    type Output = Result<Cursor>;

    fn shr(self, rhs: T) -> Result<Cursor> {
        self.after(rhs)
    }
}

macro_rules! operators {
    ($lhs:ty => $($rhs:ty : $out:ty),*) => {$(
        impl Shl<$rhs> for $lhs {
            type Output = $out;

            fn shl(self, rhs: $rhs) -> $out {
                Compose::before(self, rhs)
            }
        }

        impl Shr<$rhs> for $lhs {
            type Output = $out;

            fn shr(self, rhs: $rhs) -> $out {
                Compose::after(self, rhs)
            }
        }
    )*};
}

operators!(Empty => Empty: Empty, Node: Result<Cursor>, Cursor: Cursor, &Cursor: Cursor);
operators!(Node => Empty: Node, Node: Result<Cursor>, Cursor: Result<Cursor>, &Cursor: Result<Cursor>);
operators!(Result<Cursor> =>
    Empty: Result<Cursor>,
    Node: Result<Cursor>,
    Cursor: Result<Cursor>,
    &Cursor: Result<Cursor>
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarkupError;
    use crate::types::{close, EMPTY};

    #[test]
    fn test_scenario_text_in_div() {
        let cursor = (EMPTY << Node::element("div") << Node::text("hi") >> close()).unwrap();
        assert_eq!(cursor.render_document().unwrap(), "<div>hi</div>");
    }

    #[test]
    fn test_scenario_nested() {
        let cursor = (Node::element("div")
            << Node::element("span")
            << Node::text("x")
            >> close()
            >> close())
        .unwrap();
        assert_eq!(
            cursor.render_document().unwrap(),
            "<div><span>x</span></div>"
        );
    }

    #[test]
    fn test_identity_with_empty() {
        let node = Node::element("section");

        let seeded = (EMPTY << node.clone()).unwrap();
        assert_eq!(seeded.snapshot().unwrap(), node);
        let seeded_after = (EMPTY >> node.clone()).unwrap();
        assert_eq!(seeded_after.snapshot().unwrap(), node);

        assert_eq!(node.clone() << EMPTY, node);
        assert_eq!(EMPTY << EMPTY, EMPTY);
        assert_eq!(EMPTY << &seeded, seeded);
        assert_eq!((&seeded << EMPTY).unwrap(), seeded);
        assert_eq!((&seeded >> EMPTY).unwrap(), seeded);
    }

    #[test]
    fn test_before_close_pops_after_close_stays() {
        let div = (EMPTY << Node::element("div")).unwrap();
        let span = (&div << Node::element("span")).unwrap();

        assert_eq!((&span << close()).unwrap(), div);
        assert_eq!((&span >> close()).unwrap(), span);
    }

    #[test]
    fn test_after_keeps_level() {
        let ul = (EMPTY << Node::element("ul")).unwrap();
        let same = (&ul >> Node::element("li") >> Node::element("li")).unwrap();

        assert_eq!(same, ul);
        assert_eq!(ul.render().unwrap(), "<ul><li></li><li></li></ul>");
    }

    #[test]
    fn test_unbalanced_close_surfaces() {
        let result = EMPTY << Node::element("p") << close() << close();
        assert!(matches!(result, Err(MarkupError::UnbalancedClose(_))));
    }

    #[test]
    fn test_error_short_circuits_chain() {
        let result = EMPTY << Node::text("t") << Node::element("b") << Node::text("never");
        assert!(matches!(result, Err(MarkupError::TextHasNoChildren)));
    }

    #[test]
    fn test_named_closing_marker() {
        let div = Node::element("div");
        let cursor = (EMPTY << div.clone() << Node::text("a") << !div.clone() >> div).unwrap();

        assert_eq!(cursor.name().unwrap(), "div");
        assert_eq!(cursor.render().unwrap(), "<div>a<div></div></div>");
    }

    #[test]
    fn test_cursor_on_right_is_copied() {
        let item = (EMPTY << Node::element("li") >> Node::text("x")).unwrap();
        let list = (EMPTY << Node::element("ul") >> &item >> &item).unwrap();

        assert_eq!(list.render().unwrap(), "<ul><li>x</li><li>x</li></ul>");
        assert_ne!(list.root_id(), item.root_id());
    }
}
