//! Cursors: handles into a composed tree
//!
//! A cursor is "where the next composition lands". Every cursor of a tree
//! shares one `Root` guard; when the last cursor goes away the guard
//! releases the tree from its [`RootRegistry`], exactly once.
//!
//! Building one tree from several threads at once is the caller's problem:
//! the storage lock keeps it memory-safe, but the resulting shape is
//! whatever the interleaving made it.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::arena::DomArena;
use crate::attribute::Attribute;
use crate::error::{MarkupError, Result};
use crate::registry::{RootId, RootRegistry, SharedArena};
use crate::serializer::{MarkupSerializer, SerializerConfig};
use crate::types::{DomNode, Node, NodeId, NodeKind, ROOT_NODE};

/// Scoped registration of one tree. Dropping it is the release.
struct Root {
    id: RootId,
    arena: SharedArena,
    registry: &'static RootRegistry,
}

impl Root {
    fn lock(&self) -> MutexGuard<'_, DomArena> {
        // A panic mid-insert cannot leave dangling indices behind, so a
        // poisoned tree is still a valid tree.
        self.arena.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Root {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

/// Handle to one node of a registered tree
#[derive(Clone)]
pub struct Cursor {
    root: Arc<Root>,
    node_id: NodeId,
}

impl Cursor {
    /// Start a new tree in the global registry with `node` as its first
    /// child, returns a cursor at `node`
    pub fn seed(node: Node) -> Result<Self> {
        Self::seed_in(RootRegistry::global(), node)
    }

    /// Same as [`Cursor::seed`], registering in `registry`
    pub fn seed_in(registry: &'static RootRegistry, node: Node) -> Result<Self> {
        if node.is_closing() {
            return Err(MarkupError::UnbalancedClose(node.name().to_string()));
        }

        let mut arena = DomArena::new();
        let node_id = arena.insert(ROOT_NODE, node)?;

        let arena = Arc::new(Mutex::new(arena));
        let id = registry.register(Arc::clone(&arena));

        Ok(Self {
            root: Arc::new(Root {
                id,
                arena,
                registry,
            }),
            node_id,
        })
    }

    fn at(&self, node_id: NodeId) -> Self {
        Self {
            root: Arc::clone(&self.root),
            node_id,
        }
    }

    /// Runs `f` with the tree locked; `f` must not touch the tree again
    fn with_node<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&DomNode) -> R,
    {
        let arena = self.root.lock();
        arena.get(self.node_id).map(f)
    }

    /// Run `f` against a copy of the node under the cursor. The tree is not
    /// locked while `f` runs, so `f` may use any cursor.
    pub fn inspect<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&DomNode) -> R,
    {
        let node = self.with_node(DomNode::clone)?;
        Ok(f(&node))
    }

    /// Append `node` under the cursor and move into it. A closing marker is
    /// never inserted: it closes instead.
    pub fn open(&self, node: Node) -> Result<Self> {
        if node.is_closing() {
            return self.close();
        }
        let child_id = self.root.lock().insert(self.node_id, node)?;
        Ok(self.at(child_id))
    }

    /// Append `node` under the cursor and stay put. A closing marker is a
    /// no-op here.
    pub fn push(&self, node: Node) -> Result<Self> {
        if node.is_closing() {
            return Ok(self.clone());
        }
        self.root.lock().insert(self.node_id, node)?;
        Ok(self.clone())
    }

    /// Append a text leaf and stay put
    pub fn text(&self, text: impl Into<String>) -> Result<Self> {
        self.push(Node::text(text))
    }

    /// Move to the enclosing node
    pub fn close(&self) -> Result<Self> {
        let (parent_id, name) = self.with_node(|node| (node.parent_id, node.name.clone()))?;
        match parent_id {
            Some(parent_id) => Ok(self.at(parent_id)),
            None => Err(MarkupError::UnbalancedClose(name)),
        }
    }

    /// Append a deep copy of the subtree at `other` and move into the copy
    pub fn open_copy(&self, other: &Cursor) -> Result<Self> {
        let copy = other.snapshot()?;
        self.open(copy)
    }

    /// Append a deep copy of the subtree at `other` and stay put
    pub fn push_copy(&self, other: &Cursor) -> Result<Self> {
        let copy = other.snapshot()?;
        self.push(copy)
    }

    pub fn parent(&self) -> Result<Option<Self>> {
        let parent_id = self.with_node(|node| node.parent_id)?;
        Ok(parent_id.map(|id| self.at(id)))
    }

    /// Cursor at the tagless root of this tree
    pub fn root(&self) -> Self {
        self.at(ROOT_NODE)
    }

    pub fn children(&self) -> Result<Vec<Self>> {
        let ids = self.with_node(|node| node.children_ids.clone())?;
        Ok(ids.into_iter().map(|id| self.at(id)).collect())
    }

    pub fn kind(&self) -> Result<NodeKind> {
        self.with_node(|node| node.kind)
    }

    pub fn name(&self) -> Result<String> {
        self.with_node(|node| node.name.clone())
    }

    pub fn attributes(&self) -> Result<Vec<Attribute>> {
        self.with_node(|node| node.attributes.to_vec())
    }

    pub fn text_body(&self) -> Result<String> {
        self.with_node(|node| node.text.clone())
    }

    /// All text under the cursor, in document order
    pub fn text_content(&self) -> Result<String> {
        self.root.lock().text_content(self.node_id)
    }

    /// Elements named `tag` under the cursor (itself included)
    pub fn find_by_tag(&self, tag: &str) -> Result<Vec<Self>> {
        let ids = self.root.lock().find_by_tag(self.node_id, tag)?;
        Ok(ids.into_iter().map(|id| self.at(id)).collect())
    }

    /// Deep copy of the subtree under the cursor
    pub fn snapshot(&self) -> Result<Node> {
        self.root.lock().snapshot(self.node_id)
    }

    /// Markup for the subtree under the cursor
    pub fn render(&self) -> Result<String> {
        self.render_with(&SerializerConfig::default())
    }

    /// Markup for the subtree under the cursor, with explicit settings
    pub fn render_with(&self, config: &SerializerConfig) -> Result<String> {
        let serializer = MarkupSerializer::with_config(config.clone());
        let arena = self.root.lock();
        serializer.serialize(&arena, self.node_id)
    }

    /// Markup for the whole tree this cursor belongs to
    pub fn render_document(&self) -> Result<String> {
        self.root().render()
    }

    /// JSON form of the subtree under the cursor
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot()?)?)
    }

    pub fn root_id(&self) -> RootId {
        self.root.id
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Node count of the whole tree, tagless root included
    pub fn tree_len(&self) -> usize {
        self.root.lock().len()
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        self.root.id == other.root.id && self.node_id == other.node_id
    }
}

impl Eq for Cursor {}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("root", &self.root.id)
            .field("node_id", &self.node_id)
            .finish()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let markup = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&markup)
    }
}
