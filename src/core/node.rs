//! Arena storage for the state tree.
//!
//! Nodes are addressed by [`NodeId`] handles. Parent and initial-child links
//! are stored as handles, never as owning references, so the tree has no
//! ownership cycles. Index 0 is always the synthetic root.

use super::state::StateId;
use super::topology::Topology;
use std::collections::HashMap;

/// Stable handle of a node inside one [`StateTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The synthetic root every top-level state hangs from.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }

    /// Check if this handle addresses the synthetic root.
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

/// Structural data of one state: identity and links.
#[derive(Clone, Debug)]
pub struct Node<S: StateId> {
    id: Option<S>,
    name: String,
    parent: Option<NodeId>,
    initial: Option<NodeId>,
    depth: usize,
}

impl<S: StateId> Node<S> {
    /// Identity of the state, `None` for the synthetic root.
    pub fn id(&self) -> Option<S> {
        self.id
    }

    /// Display name used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent handle, `None` only for the synthetic root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Initial child to drill into; `None` marks a leaf.
    pub fn initial(&self) -> Option<NodeId> {
        self.initial
    }

    /// Distance from the synthetic root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Check if this state has no initial child.
    pub fn is_leaf(&self) -> bool {
        self.initial.is_none()
    }
}

/// Arena of nodes plus the identity index.
///
/// Structure is append-only while a machine is being configured and
/// read-only afterwards.
#[derive(Clone, Debug)]
pub struct StateTree<S: StateId> {
    nodes: Vec<Node<S>>,
    index: HashMap<S, NodeId>,
}

impl<S: StateId> Default for StateTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId> StateTree<S> {
    /// Create a tree holding only the synthetic root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                id: None,
                name: "Root".to_string(),
                parent: None,
                initial: None,
                depth: 0,
            }],
            index: HashMap::new(),
        }
    }

    /// Append a state under `parent`.
    ///
    /// Returns `None` if `id` is already registered.
    pub(crate) fn insert(&mut self, id: S, parent: NodeId) -> Option<NodeId> {
        if self.index.contains_key(&id) {
            return None;
        }
        let node = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        self.nodes.push(Node {
            id: Some(id),
            name: id.name().to_string(),
            parent: Some(parent),
            initial: None,
            depth,
        });
        self.index.insert(id, node);
        Some(node)
    }

    pub(crate) fn set_name(&mut self, node: NodeId, name: String) {
        self.nodes[node.0].name = name;
    }

    pub(crate) fn set_initial(&mut self, node: NodeId, initial: NodeId) {
        self.nodes[node.0].initial = Some(initial);
    }

    /// Look up the handle of a registered identity.
    pub fn lookup(&self, id: S) -> Option<NodeId> {
        self.index.get(&id).copied()
    }

    /// Check if an identity is registered.
    pub fn contains(&self, id: S) -> bool {
        self.index.contains_key(&id)
    }

    /// Access a node by handle.
    ///
    /// Handles are only ever produced by this tree, so they are always in
    /// bounds.
    pub fn node(&self, node: NodeId) -> &Node<S> {
        &self.nodes[node.0]
    }

    /// Identity of `node`, `None` for the root or no node at all.
    pub fn id_of(&self, node: Option<NodeId>) -> Option<S> {
        node.and_then(|node| self.node(node).id())
    }

    /// Number of registered states, excluding the synthetic root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Check if no state has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all handles, root first, in registration order.
    pub fn handles(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Follow initial-child links down to a leaf.
    ///
    /// Stops after `max_depth` steps; validated trees never reach it.
    pub fn resolve_leaf(&self, mut node: NodeId, max_depth: usize) -> NodeId {
        let mut steps = 0;
        while let Some(next) = self.nodes[node.0].initial {
            if steps == max_depth {
                break;
            }
            node = next;
            steps += 1;
        }
        node
    }
}

impl<S: StateId> Topology for StateTree<S> {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn depth(&self, node: NodeId) -> usize {
        self.nodes[node.0].depth
    }
}

#[cfg(test)]
pub(crate) fn test_handle(index: usize) -> NodeId {
    NodeId(index)
}
