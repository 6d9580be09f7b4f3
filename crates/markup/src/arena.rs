//! Arena-based tree storage
//!
//! "Bad programmers worry about the code. Good programmers worry about
//! data structures and their relationships."
//!
//! One arena per composed tree. Slot 0 is the tagless root; every other
//! node is reachable from it through `children_ids`. Parents are plain
//! indices, so there is nothing for a cycle to be made of.
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Root][Node1][Node2]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```

use ahash::AHashMap;

use crate::error::{MarkupError, Result};
use crate::types::{DomNode, Node, NodeId, ROOT_NODE};

/// Arena allocator for one markup tree
#[derive(Debug, Clone)]
pub struct DomArena {
    /// All nodes stored sequentially; index == NodeId
    nodes: Vec<DomNode>,
}

impl DomArena {
    /// Arena holding only the structural root
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(DomNode::root());
        Self { nodes }
    }

    /// Add a detached node, returns its ID. Links are the caller's job.
    fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        self.nodes.push(node);
        node_id
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(MarkupError::NodeNotFound(node_id))
    }

    fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(MarkupError::NodeNotFound(node_id))
    }

    /// Root node
    pub fn root(&self) -> Result<&DomNode> {
        self.get(ROOT_NODE)
    }

    /// Total number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True while nothing has been inserted under the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Insert `node` (and any children it carries) as the last child of
    /// `parent_id`. Returns the ID of the inserted top node.
    ///
    /// The value is validated first, so a failed insert leaves the arena
    /// untouched. Closing markers are never stored, at any depth.
    pub fn insert(&mut self, parent_id: NodeId, node: Node) -> Result<NodeId> {
        if self.get(parent_id)?.is_text() {
            return Err(MarkupError::TextHasNoChildren);
        }
        node.check_shape()?;

        let mut top = None;
        let mut stack = vec![(parent_id, node)];

        while let Some((parent_id, node)) = stack.pop() {
            let (mut dom, children) = node.into_parts();
            dom.parent_id = Some(parent_id);

            let node_id = self.add_node(dom);
            self.get_mut(parent_id)?.children_ids.push(node_id);
            if top.is_none() {
                top = Some(node_id);
            }

            tracing::trace!(parent_id, node_id, "inserted node");

            // Reverse so siblings are attached left-to-right
            for child in children.into_iter().rev() {
                stack.push((node_id, child));
            }
        }

        top.ok_or(MarkupError::NodeNotFound(parent_id))
    }

    /// Deep copy of the subtree at `node_id` as a detached value
    pub fn snapshot(&self, node_id: NodeId) -> Result<Node> {
        let mut order = Vec::new();
        self.traverse_df(node_id, |node| {
            order.push(node.node_id);
            Ok(())
        })?;

        // Reverse pre-order: every child is built before its parent
        let mut built: AHashMap<NodeId, Node> = AHashMap::with_capacity(order.len());
        for &id in order.iter().rev() {
            let node = self.get(id)?;
            let children = node
                .children_ids
                .iter()
                .map(|&child_id| {
                    built
                        .remove(&child_id)
                        .ok_or(MarkupError::NodeNotFound(child_id))
                })
                .collect::<Result<Vec<_>>>()?;

            built.insert(
                id,
                Node::from_parts(
                    node.kind,
                    node.name.clone(),
                    node.attributes.clone(),
                    node.text.clone(),
                    children,
                ),
            );
        }

        built
            .remove(&node_id)
            .ok_or(MarkupError::NodeNotFound(node_id))
    }

    /// Traverse tree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Nodes under `start_id` (inclusive) matching `predicate`, in
    /// document order
    pub fn find<F>(&self, start_id: NodeId, predicate: F) -> Result<Vec<NodeId>>
    where
        F: Fn(&DomNode) -> bool,
    {
        let mut found = Vec::new();
        self.traverse_df(start_id, |node| {
            if predicate(node) {
                found.push(node.node_id);
            }
            Ok(())
        })?;
        Ok(found)
    }

    /// Elements named `tag` under `start_id`
    pub fn find_by_tag(&self, start_id: NodeId, tag: &str) -> Result<Vec<NodeId>> {
        self.find(start_id, |node| node.is_element() && node.name == tag)
    }

    /// All text under `node_id`, concatenated in document order
    pub fn text_content(&self, node_id: NodeId) -> Result<String> {
        let mut text = String::new();

        self.traverse_df(node_id, |node| {
            if node.is_text() {
                text.push_str(&node.text);
            }
            Ok(())
        })?;

        Ok(text)
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{close, NodeKind};

    #[test]
    fn test_arena_starts_with_root() {
        let arena = DomArena::new();

        assert_eq!(arena.len(), 1);
        assert!(arena.is_empty());

        let root = arena.root().unwrap();
        assert_eq!(root.kind, NodeKind::Fragment);
        assert_eq!(root.parent_id, None);
    }

    #[test]
    fn test_insert_links_both_ways() {
        let mut arena = DomArena::new();

        let div = arena.insert(ROOT_NODE, Node::element("div")).unwrap();
        let span = arena.insert(div, Node::element("span")).unwrap();

        assert_eq!(arena.get(span).unwrap().parent_id, Some(div));
        assert_eq!(arena.get(div).unwrap().children_ids.as_slice(), &[span]);

    }

    #[test]
    fn test_insert_under_text_fails_untouched() {
        let mut arena = DomArena::new();
        let text = arena.insert(ROOT_NODE, Node::text("hi")).unwrap();

        let err = arena.insert(text, Node::element("b")).unwrap_err();
        assert!(matches!(err, MarkupError::TextHasNoChildren));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_insert_subtree_keeps_order() {
        let mut arena = DomArena::new();
        let list = Node::fragment(vec![
            Node::text("a"),
            Node::fragment(vec![Node::text("b"), Node::text("c")]),
            Node::text("d"),
        ]);

        let top = arena.insert(ROOT_NODE, list).unwrap();
        assert_eq!(arena.text_content(top).unwrap(), "abcd");
        assert_eq!(arena.len(), 7);
    }

    #[test]
    fn test_snapshot_matches_inserted_value() {
        let mut arena = DomArena::new();
        let value = Node::fragment(vec![Node::element("p"), Node::text("x")]);

        let id = arena.insert(ROOT_NODE, value.clone()).unwrap();
        assert_eq!(arena.snapshot(id).unwrap(), value);
    }

    #[test]
    fn test_traverse_df() {
        let mut arena = DomArena::new();

        let div = arena.insert(ROOT_NODE, Node::element("div")).unwrap();
        arena.insert(div, Node::element("span")).unwrap();
        arena.insert(div, Node::element("em")).unwrap();

        let mut visited = Vec::new();
        arena
            .traverse_df(div, |node| {
                visited.push(node.name.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(visited, vec!["div", "span", "em"]);
        assert_eq!(arena.find_by_tag(div, "em").unwrap().len(), 1);
        assert_eq!(arena.find_by_tag(ROOT_NODE, "div").unwrap(), vec![div]);
    }

    #[test]
    fn test_nested_closing_marker_never_stored() {
        let mut arena = DomArena::new();
        let div = arena.insert(ROOT_NODE, Node::element("div")).unwrap();

        let value = Node::fragment(vec![Node::text("a"), close()]);
        let err = arena.insert(div, value).unwrap_err();

        assert!(matches!(err, MarkupError::UnbalancedClose(_)));
        assert_eq!(arena.len(), 2);
        assert!(arena.get(div).unwrap().children_ids.is_empty());

        assert!(arena.insert(div, !Node::element("p")).is_err());
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_insert_rejects_nameless_element() {
        let mut arena = DomArena::new();

        let err = arena
            .insert(ROOT_NODE, Node::fragment(vec![Node::element("")]))
            .unwrap_err();
        assert!(matches!(err, MarkupError::MalformedNode(_)));
        assert!(arena.is_empty());
    }

    #[test]
    fn test_deep_tree_traversal() {
        let mut arena = DomArena::new();
        let mut parent = ROOT_NODE;
        for _ in 0..100_000 {
            parent = arena.insert(parent, Node::element("b")).unwrap();
        }
        arena.insert(parent, Node::text("deep")).unwrap();

        assert_eq!(arena.text_content(ROOT_NODE).unwrap(), "deep");
        assert_eq!(arena.find_by_tag(ROOT_NODE, "b").unwrap().len(), 100_000);

        let copy = arena.snapshot(parent).unwrap();
        assert_eq!(copy.children()[0].text_body(), "deep");
    }
}
