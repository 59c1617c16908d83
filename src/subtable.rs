//! Per-variable unique subtables for EVMDD nodes.
//!
//! The manager keeps every node in a plain `Vec<Node>` arena (indexed by
//! [`NodeId`]) and one subtable per variable for hash consing:
//!
//! ```text
//! subtables[0] → Subtable for the first variable of the ordering
//! subtables[1] → Subtable for the second variable
//! ...
//! ```
//!
//! Each subtable maps the (normalized) children tuple of a node to its index.
//! All nodes in a subtable test the same variable, so the variable is not part
//! of the key.
//!
//! Subtables only grow: there is no garbage collection, so an entry lives as
//! long as its manager.

use std::collections::HashMap;

use crate::edge::Edge;
use crate::reference::NodeId;
use crate::types::Var;

/// A subtable storing the nodes of a single variable.
#[derive(Debug, Clone)]
pub struct Subtable {
    /// Variable tested by every node of the subtable.
    pub variable: Var,

    /// Normalized children tuple to arena index.
    nodes: HashMap<Box<[Edge]>, NodeId>,
}

impl Subtable {
    pub fn new(variable: Var) -> Self {
        Self {
            variable,
            nodes: HashMap::new(),
        }
    }

    /// Finds the node with exactly these children.
    pub fn find(&self, children: &[Edge]) -> Option<NodeId> {
        self.nodes.get(children).copied()
    }

    /// Registers a freshly allocated node. Each children tuple is inserted once.
    pub fn insert(&mut self, children: Box<[Edge]>, id: NodeId) {
        let old = self.nodes.insert(children, id);
        debug_assert!(old.is_none(), "node for {} inserted twice", self.variable);
    }

    /// Number of nodes testing this variable.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ManagerId;

    #[test]
    fn test_find_after_insert() {
        let m = ManagerId::fresh();
        let mut st = Subtable::new(Var::new(0));

        let children = [Edge::new(0, NodeId::TERMINAL, m), Edge::new(1, NodeId::TERMINAL, m)];
        assert!(st.find(&children).is_none());

        st.insert(Box::new(children), NodeId::new(1));
        assert_eq!(st.find(&children), Some(NodeId::new(1)));
        assert_eq!(st.len(), 1);
        assert!(!st.is_empty());
    }

    #[test]
    fn test_children_tuples_are_distinct_keys() {
        let m = ManagerId::fresh();
        let mut st = Subtable::new(Var::new(0));

        let a = [Edge::new(0, NodeId::TERMINAL, m), Edge::new(1, NodeId::TERMINAL, m)];
        let b = [Edge::new(0, NodeId::TERMINAL, m), Edge::new(2, NodeId::TERMINAL, m)];
        let c = [Edge::new(0, NodeId::new(1), m), Edge::new(0, NodeId::new(2), m)];
        st.insert(Box::new(a), NodeId::new(1));
        st.insert(Box::new(b), NodeId::new(2));
        st.insert(Box::new(c), NodeId::new(3));

        assert_eq!(st.len(), 3);
        assert_eq!(st.find(&a), Some(NodeId::new(1)));
        assert_eq!(st.find(&b), Some(NodeId::new(2)));
        assert_eq!(st.find(&c), Some(NodeId::new(3)));
    }
}
