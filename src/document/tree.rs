//! Arena-backed text tree.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeId`]. The
//! parent link is a plain index, so it never keeps a node alive: removing a
//! subtree frees its slots and any id still held by a caller simply stops
//! resolving.

use std::fmt;

use super::types::{ContainerKind, TreeError};

/// Index of a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw arena index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Literal text, no children.
    Leaf(String),
    /// Ordered children, no text of its own.
    Container(ContainerKind),
}

/// A single tree node.
#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

impl Node {
    /// Parent node, `None` for the root.
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in document order (always empty for leaves).
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }
}

/// A document tree of containers and text leaves.
///
/// # Example
///
/// ```
/// use snapcard::document::{ContainerKind, Tree};
///
/// let mut tree = Tree::new(ContainerKind::Document);
/// let para = tree.append_container(tree.root(), ContainerKind::Paragraph).unwrap();
/// tree.append_leaf(para, "Hello ").unwrap();
/// tree.append_leaf(para, "world").unwrap();
/// assert_eq!(tree.text_content(para).as_deref(), Some("Hello world"));
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
}

impl Tree {
    /// Create a tree holding a single root container.
    pub fn new(root_kind: ContainerKind) -> Self {
        Self {
            nodes: vec![Some(Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Container(root_kind),
            })],
            root: NodeId(0),
        }
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a node; `None` once it has been removed.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or_default()
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_leaf)
    }

    /// Text of a leaf, `None` for containers and removed nodes.
    pub fn leaf_text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.kind {
            NodeKind::Leaf(text) => Some(text),
            NodeKind::Container(_) => None,
        }
    }

    /// Length of a leaf's text in chars.
    pub fn leaf_len(&self, id: NodeId) -> Option<usize> {
        self.leaf_text(id).map(|text| text.chars().count())
    }

    pub fn container_kind(&self, id: NodeId) -> Option<ContainerKind> {
        match self.get(id)?.kind {
            NodeKind::Container(kind) => Some(kind),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Append a container as the last child of `parent`.
    ///
    /// # Errors
    /// Fails if `parent` is gone or is a leaf.
    pub fn append_container(
        &mut self,
        parent: NodeId,
        kind: ContainerKind,
    ) -> Result<NodeId, TreeError> {
        self.append(parent, NodeKind::Container(kind))
    }

    /// Append a text leaf as the last child of `parent`.
    ///
    /// # Errors
    /// Fails if `parent` is gone or is a leaf.
    pub fn append_leaf(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        self.append(parent, NodeKind::Leaf(text.into()))
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, TreeError> {
        match self.get(parent).map(Node::kind) {
            None => return Err(TreeError::UnknownNode(parent)),
            Some(NodeKind::Leaf(_)) => return Err(TreeError::LeafParent(parent)),
            Some(NodeKind::Container(_)) => {}
        }
        let raw = u32::try_from(self.nodes.len()).map_err(|_| TreeError::Full)?;
        let id = NodeId(raw);
        self.nodes.push(Some(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        }));
        if let Some(Some(node)) = self.nodes.get_mut(parent.index()) {
            node.children.push(id);
        }
        Ok(id)
    }

    /// Replace the text of a leaf.
    ///
    /// # Errors
    /// Fails if `id` is gone or is a container.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), TreeError> {
        match self.nodes.get_mut(id.index()).and_then(Option::as_mut) {
            None => Err(TreeError::UnknownNode(id)),
            Some(node) => match &mut node.kind {
                NodeKind::Leaf(current) => {
                    *current = text.into();
                    Ok(())
                }
                NodeKind::Container(_) => Err(TreeError::NotALeaf(id)),
            },
        }
    }

    /// Detach `id` from its parent and free its whole subtree.
    ///
    /// # Errors
    /// Fails if `id` is gone or is the root.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RemoveRoot);
        }
        let parent = self
            .get(id)
            .ok_or(TreeError::UnknownNode(id))?
            .parent;
        if let Some(parent) = parent
            && let Some(Some(node)) = self.nodes.get_mut(parent.index())
        {
            node.children.retain(|child| *child != id);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.index()).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    /// Iterate `id` and its ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.contains_node(id).then_some(id),
        }
    }

    /// True if `node` is `ancestor` or lies in its subtree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// Lowest node that is an ancestor-or-self of both `a` and `b`.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let chain: Vec<NodeId> = self.ancestors(a).collect();
        self.ancestors(b).find(|id| chain.contains(id))
    }

    /// Lowest container enclosing both `a` and `b`.
    ///
    /// When both ids name the same leaf this is the leaf's parent.
    pub fn common_container(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let common = self.common_ancestor(a, b)?;
        self.ancestors(common)
            .find(|id| self.container_kind(*id).is_some())
    }

    /// Nearest block-level container at or above `id`.
    pub fn nearest_block(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|node| self.container_kind(*node).is_some_and(ContainerKind::is_block))
    }

    /// Leaves under `id` in document order.
    pub fn leaves(&self, id: NodeId) -> Leaves<'_> {
        Leaves {
            tree: self,
            stack: if self.contains_node(id) { vec![id] } else { Vec::new() },
        }
    }

    /// Concatenated leaf text under `id`, exactly as absolute offsets see it.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        if !self.contains_node(id) {
            return None;
        }
        let mut text = String::new();
        for leaf in self.leaves(id) {
            text.push_str(self.leaf_text(leaf).unwrap_or_default());
        }
        Some(text)
    }

    /// Rendered text under `id`: block children are separated and runs of
    /// whitespace collapse to a single space.
    pub fn normalized_text(&self, id: NodeId) -> Option<String> {
        if !self.contains_node(id) {
            return None;
        }
        let mut raw = String::new();
        self.collect_rendered(id, &mut raw);
        Some(collapse_whitespace(&raw))
    }

    fn collect_rendered(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Leaf(text) => out.push_str(text),
            NodeKind::Container(kind) => {
                for child in &node.children {
                    self.collect_rendered(*child, out);
                }
                if kind.is_block() {
                    out.push('\n');
                }
            }
        }
    }
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Iterator over a node and its ancestors.
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over the leaves of a subtree.
#[derive(Debug)]
pub struct Leaves<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Leaves<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if node.is_leaf() {
                return Some(id);
            }
            self.stack.extend(node.children.iter().rev().copied());
        }
        None
    }
}
