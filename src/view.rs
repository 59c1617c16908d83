//! Read-only structural view of an EVMDD, for inspection and rendering.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use crate::edge::Edge;
use crate::error::Result;
use crate::manager::EvmddManager;
use crate::reference::NodeId;
use crate::types::{Var, Weight};

/// One decision node of a [`DiagramView`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub var: Var,
    /// Name of the tested variable.
    pub name: String,
    /// `(weight, target)` per domain value.
    pub children: Vec<(Weight, NodeId)>,
}

impl Display for NodeView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}:", self.id, self.name)?;
        for (value, (weight, target)) in self.children.iter().enumerate() {
            write!(f, " {}->({:+}, {})", value, weight, target)?;
        }
        Ok(())
    }
}

/// All nodes reachable from a root edge, each listed once.
///
/// Nodes are ordered by variable position, then by id, so the view reads
/// top-down. The terminal is implicit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DiagramView {
    pub weight: Weight,
    pub root: NodeId,
    pub nodes: Vec<NodeView>,
}

impl DiagramView {
    /// Nodes testing `var`.
    pub fn level(&self, var: Var) -> impl Iterator<Item = &NodeView> + '_ {
        self.nodes.iter().filter(move |n| n.var == var)
    }
}

impl Display for DiagramView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "EVMDD ({:+}, {}), {} nodes:", self.weight, self.root, self.nodes.len())?;
        for node in &self.nodes {
            writeln!(f, "  {}", node)?;
        }
        Ok(())
    }
}

impl EvmddManager {
    /// Builds the structural view of the diagram rooted at `edge`.
    pub fn view(&self, edge: Edge) -> Result<DiagramView> {
        self.check_edge(edge)?;

        let mut visited = HashSet::new();
        let mut stack = vec![edge.target];
        let mut nodes = Vec::new();

        while let Some(id) = stack.pop() {
            if id.is_terminal() || !visited.insert(id) {
                continue;
            }
            let node = self.node(id)?;
            stack.extend(node.children.iter().map(|c| c.target));
            nodes.push(NodeView {
                id,
                var: node.var,
                name: self.var_name(node.var)?.to_string(),
                children: node.children.iter().map(|c| (c.weight, c.target)).collect(),
            });
        }

        nodes.sort_by_key(|n| (n.var, n.id));

        Ok(DiagramView {
            weight: edge.weight,
            root: edge.target,
            nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_constant() {
        let mgr = EvmddManager::new([("A", 2)]).unwrap();
        let view = mgr.view(mgr.make_constant(3)).unwrap();
        assert_eq!(view.weight, 3);
        assert!(view.root.is_terminal());
        assert!(view.nodes.is_empty());
    }

    #[test]
    fn test_view_shared_nodes_listed_once() {
        let mgr = EvmddManager::new([("A", 2), ("B", 3)]).unwrap();
        let a = mgr.make_variable("A").unwrap();
        let b = mgr.make_variable("B").unwrap();
        let f = mgr.add(a, b).unwrap();
        let view = mgr.view(f).unwrap();

        // A+B: one A node, both branches share the B node.
        assert_eq!(view.nodes.len(), 2);
        assert_eq!(view.nodes[0].name, "A");
        assert_eq!(view.nodes[1].name, "B");
        assert_eq!(view.nodes[0].children, vec![(0, b.target), (1, b.target)]);
        assert_eq!(view.nodes[1].children, vec![(0, NodeId::TERMINAL), (1, NodeId::TERMINAL), (2, NodeId::TERMINAL)]);
        assert_eq!(view.level(Var::new(1)).count(), 1);
    }

    #[test]
    fn test_view_display() {
        let mgr = EvmddManager::new([("A", 2)]).unwrap();
        let a = mgr.make_variable("A").unwrap();
        let text = mgr.view(a).unwrap().to_string();
        assert!(text.starts_with("EVMDD (+0, @1), 1 nodes:"));
        assert!(text.contains("@1 A: 0->(+0, T) 1->(+1, T)"));
    }

    #[test]
    fn test_view_foreign_edge() {
        let m1 = EvmddManager::new([("A", 2)]).unwrap();
        let m2 = EvmddManager::new([("A", 2)]).unwrap();
        let a = m2.make_variable("A").unwrap();
        assert!(m1.view(a).is_err());
    }
}
