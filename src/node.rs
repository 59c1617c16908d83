use crate::edge::Edge;
use crate::types::Var;

/// A decision node: a variable test with one outgoing edge per domain value.
///
/// # Invariants
///
/// - `children.len()` equals the domain size of `var`
/// - the minimum child weight is 0 (normalization)
/// - every non-terminal child tests a variable strictly after `var`
///
/// The terminal is stored in the arena as a node without children.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Node {
    /// Variable tested at this node.
    pub var: Var,
    /// Outgoing edges, indexed by domain value.
    pub children: Box<[Edge]>,
}

impl Node {
    pub fn new(var: Var, children: impl Into<Box<[Edge]>>) -> Self {
        Self {
            var,
            children: children.into(),
        }
    }

    pub(crate) fn terminal() -> Self {
        Self {
            var: Var::new(u32::MAX),
            children: Box::new([]),
        }
    }

    /// Returns true if this is the terminal.
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    /// The edge taken for `value`.
    pub fn child(&self, value: usize) -> Edge {
        self.children[value]
    }

    /// Number of outgoing edges.
    pub fn arity(&self) -> usize {
        self.children.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::NodeId;
    use crate::types::ManagerId;

    #[test]
    fn test_node_creation() {
        let m = ManagerId::fresh();
        let children = vec![Edge::new(0, NodeId::TERMINAL, m), Edge::new(1, NodeId::TERMINAL, m)];
        let node = Node::new(Var::new(0), children);
        assert_eq!(node.arity(), 2);
        assert_eq!(node.child(1).weight, 1);
        assert!(!node.is_terminal());
        assert!(Node::terminal().is_terminal());
    }
}
