//! Tree topology utilities.
//!
//! Pure functions over the parent graph: ancestor tests, lowest common
//! ancestor and entry path construction. They only need parent and depth
//! lookups, expressed by the [`Topology`] trait.
//!
//! Convention: [`is_descendant`] is reflexive, so a node is its own
//! descendant at distance 0, and the LCA of a node with itself is the node.

use super::node::NodeId;

/// Parent and depth lookups over a forest of finite trees.
pub trait Topology {
    /// Parent of `node`, `None` for a tree root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Distance of `node` from its tree root.
    fn depth(&self, node: NodeId) -> usize;
}

/// Iterator walking from a node up to its tree root, node first.
pub struct Ancestors<'a, T: Topology + ?Sized> {
    topology: &'a T,
    next: Option<NodeId>,
}

impl<T: Topology + ?Sized> Iterator for Ancestors<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.topology.parent(current);
        Some(current)
    }
}

/// Walk from `node` (inclusive) up to its root.
pub fn ancestors<T: Topology + ?Sized>(topology: &T, node: NodeId) -> Ancestors<'_, T> {
    Ancestors {
        topology,
        next: Some(node),
    }
}

/// Check if `ancestor` appears on `candidate`'s parent chain, `candidate`
/// included.
pub fn is_descendant<T: Topology + ?Sized>(
    topology: &T,
    candidate: NodeId,
    ancestor: NodeId,
) -> bool {
    ancestors(topology, candidate).any(|node| node == ancestor)
}

/// Deepest node that is an ancestor of (or equal to) both `a` and `b`.
///
/// Returns `None` when the two nodes live in disjoint trees.
pub fn lowest_common_ancestor<T: Topology + ?Sized>(
    topology: &T,
    a: NodeId,
    b: NodeId,
) -> Option<NodeId> {
    let mut a = Some(a);
    let mut b = Some(b);

    while let (Some(x), Some(y)) = (a, b) {
        let (dx, dy) = (topology.depth(x), topology.depth(y));
        if dx > dy {
            a = topology.parent(x);
        } else if dy > dx {
            b = topology.parent(y);
        } else if x == y {
            return Some(x);
        } else {
            a = topology.parent(x);
            b = topology.parent(y);
        }
    }
    None
}

/// Node on the path from `descendant` up to `ancestor` whose parent is
/// `ancestor`.
///
/// Returns `None` if `descendant` is not a strict descendant of `ancestor`.
pub fn direct_child_under<T: Topology + ?Sized>(
    topology: &T,
    descendant: NodeId,
    ancestor: NodeId,
) -> Option<NodeId> {
    ancestors(topology, descendant).find(|&node| topology.parent(node) == Some(ancestor))
}

/// Ordered entry path from `common`'s direct child down to `destination`.
///
/// The path is parent-to-child and excludes `common`. It is empty when
/// `destination == common`, and `None` when `common` is not an ancestor of
/// `destination`.
pub fn entry_path<T: Topology + ?Sized>(
    topology: &T,
    common: NodeId,
    destination: NodeId,
) -> Option<Vec<NodeId>> {
    let mut path = Vec::with_capacity(
        topology
            .depth(destination)
            .saturating_sub(topology.depth(common)),
    );
    for node in ancestors(topology, destination) {
        if node == common {
            path.reverse();
            return Some(path);
        }
        path.push(node);
    }
    None
}

/// Depth recomputed from the parent chain.
///
/// The stored depth is a cache; this is the authoritative value.
pub fn chain_depth<T: Topology + ?Sized>(topology: &T, node: NodeId) -> usize {
    ancestors(topology, node).count() - 1
}
