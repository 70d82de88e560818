//! The AST node: a sum type per syntactic category plus shared location and
//! child-ownership fields.

use cc_diagnostics::SourceLocation;

use crate::kind::NodeKind;

/// A node in the AST. Owns its children and any payload strings exclusively;
/// destroying a node destroys the whole subtree exactly once, enforced here
/// by ordinary Rust move/drop semantics rather than a runtime destroyed-flag
/// (see [`destroy`] for the explicit-destruction entry point).
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub location: SourceLocation,
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a bare node with no children.
    pub fn new(kind: NodeKind, location: SourceLocation) -> Self {
        Self {
            kind,
            location,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: NodeKind, location: SourceLocation, children: Vec<Node>) -> Self {
        Self {
            kind,
            location,
            children,
        }
    }

    /// Appends `child`, transferring ownership of its subtree to `self`.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }
}

/// Recursively destroys `node`. Just `drop`, named explicitly so
/// error-recovery unwinding sites read as intentional cleanup rather than
/// an incidental scope exit. Calling it twice on the same subtree is
/// impossible: `node` is consumed by value.
pub fn destroy(node: Node) {
    drop(node);
}

#[cfg(test)]
mod node_tests {
    use super::*;
    use crate::kind::NodeKind;

    fn loc() -> SourceLocation {
        SourceLocation::new("t.c", 1, 0, 0)
    }

    #[test]
    fn add_child_transfers_ownership() {
        let mut parent = Node::new(NodeKind::Compound, loc());
        let child = Node::new(NodeKind::Empty, loc());
        parent.add_child(child);
        assert_eq!(parent.children.len(), 1);
    }

    #[test]
    fn each_node_is_child_of_at_most_one_parent_by_construction() {
        // Rust's ownership model makes sharing a child between two parents a
        // compile error (the child is moved into the first `add_child`), so
        // this invariant is structural rather than checked at runtime.
        let mut a = Node::new(NodeKind::Compound, loc());
        let mut b = Node::new(NodeKind::Compound, loc());
        let shared = Node::new(NodeKind::Empty, loc());
        a.add_child(shared);
        b.add_child(Node::new(NodeKind::Empty, loc()));
        assert_eq!(a.children.len(), 1);
        assert_eq!(b.children.len(), 1);
    }

    #[test]
    fn destroy_consumes_the_node() {
        let node = Node::new(NodeKind::Empty, loc());
        destroy(node);
    }
}
