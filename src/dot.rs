//! EVMDD to DOT (Graphviz) conversion.
//!
//! # DOT Format
//!
//! The generated DOT output follows these conventions:
//! - The **terminal** is a box labelled `0` at the bottom (sink rank)
//! - **Decision nodes** are filled ellipses labelled with the variable name,
//!   grouped by variable (same rank)
//! - **Edges** are labelled with the domain value they are taken for
//! - **Weights** are drawn as small boxes in the middle of each edge, or
//!   inlined into the edge label when [`DotConfig::weight_boxes`] is off
//! - The **root edge** starts from an invisible node at the top (source rank)
//!
//! # Examples
//!
//! ```
//! use evmdd_rs::manager::EvmddManager;
//!
//! let mgr = EvmddManager::new([("A", 2), ("B", 3)]).unwrap();
//! let a = mgr.make_variable("A").unwrap();
//! let b = mgr.make_variable("B").unwrap();
//! let f = mgr.mul(a, b).unwrap();
//!
//! let dot = mgr.to_dot(&[f]).unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::edge::Edge;
use crate::error::Result;
use crate::manager::EvmddManager;
use crate::reference::NodeId;
use crate::types::Weight;

/// Configuration options for DOT output generation.
///
/// ```
/// use evmdd_rs::dot::DotConfig;
///
/// let config = DotConfig {
///     weight_boxes: false,
///     ..DotConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for decision nodes (default: "ellipse")
    pub node_shape: &'static str,
    /// Fill color for decision nodes (default: "lightgrey")
    pub node_color: &'static str,
    /// Shape for the terminal (default: "box")
    pub terminal_shape: &'static str,
    /// Shape for weight nodes (default: "box")
    pub weight_shape: &'static str,
    /// Draw weights as separate nodes (default: true)
    pub weight_boxes: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "ellipse",
            node_color: "lightgrey",
            terminal_shape: "box",
            weight_shape: "box",
            weight_boxes: true,
        }
    }
}

fn node_name(id: NodeId) -> String {
    if id.is_terminal() {
        "T".to_string()
    } else {
        format!("n{}", id.raw())
    }
}

impl EvmddManager {
    /// Converts EVMDDs to DOT (Graphviz) format.
    ///
    /// All nodes reachable from `roots` are included; shared nodes are
    /// rendered once. Fails with [`IncompatibleManager`][crate::error::Error::IncompatibleManager]
    /// if a root was built by another manager.
    pub fn to_dot(&self, roots: &[Edge]) -> Result<String> {
        self.to_dot_with_config(roots, &DotConfig::default())
    }

    /// Converts EVMDDs to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, roots: &[Edge], config: &DotConfig) -> Result<String> {
        for &root in roots {
            self.check_edge(root)?;
        }

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(
            dot,
            "node [shape={}, style=filled, fillcolor={}];",
            config.node_shape, config.node_color
        )?;

        writeln!(dot, "{{ rank=sink")?;
        writeln!(dot, "T [shape={}, style=solid, label=\"0\"];", config.terminal_shape)?;
        writeln!(dot, "}}")?;

        let all_nodes = self.descendants(roots.iter().copied());

        // Group by variable, ordered by position.
        let mut levels = BTreeMap::<_, Vec<NodeId>>::new();
        for &id in all_nodes.iter() {
            if let Some(var) = self.variable_of(id) {
                levels.entry(var).or_default().push(id);
            }
        }

        for (&var, ids) in levels.iter_mut() {
            ids.sort();
            writeln!(dot, "{{ rank=same")?;
            for &id in ids.iter() {
                writeln!(dot, "{} [label=\"{}\"];", node_name(id), self.var_name(var)?)?;
            }
            writeln!(dot, "}}")?;
        }

        for ids in levels.values() {
            for &id in ids {
                for (value, child) in self.children(id)?.into_iter().enumerate() {
                    let from = node_name(id);
                    let weight_node = format!("w{}_{}", id.raw(), value);
                    self.write_edge(&mut dot, config, &from, &weight_node, value.to_string(), child)?;
                }
            }
        }

        writeln!(dot, "{{ rank=source")?;
        for i in 0..roots.len() {
            writeln!(dot, "r{} [style=invis, label=\"\"];", i)?;
        }
        writeln!(dot, "}}")?;
        for (i, &root) in roots.iter().enumerate() {
            self.write_edge(&mut dot, config, &format!("r{}", i), &format!("rw{}", i), String::new(), root)?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }

    fn write_edge(
        &self,
        dot: &mut String,
        config: &DotConfig,
        from: &str,
        weight_node: &str,
        label: String,
        edge: Edge,
    ) -> std::fmt::Result {
        let to = node_name(edge.target);
        if config.weight_boxes {
            writeln!(
                dot,
                "{} [shape={}, style=solid, label=\"{}\"];",
                weight_node,
                config.weight_shape,
                weight_label(edge.weight)
            )?;
            writeln!(dot, "{} -> {} [label=\"{}\", arrowhead=none];", from, weight_node, label)?;
            writeln!(dot, "{} -> {};", weight_node, to)?;
        } else if label.is_empty() {
            writeln!(dot, "{} -> {} [label=\"{}\"];", from, to, weight_label(edge.weight))?;
        } else {
            writeln!(dot, "{} -> {} [label=\"{}: {}\"];", from, to, label, weight_label(edge.weight))?;
        }
        Ok(())
    }
}

fn weight_label(weight: Weight) -> String {
    format!("{:+}", weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_to_dot_basic() {
        let mgr = EvmddManager::new([("A", 2), ("B", 2)]).unwrap();
        let a = mgr.make_variable("A").unwrap();
        let b = mgr.make_variable("B").unwrap();
        let f = mgr.add_constant(mgr.mul(a, b).unwrap(), 2).unwrap();

        let dot = mgr.to_dot(&[f]).unwrap();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("T [shape=box, style=solid, label=\"0\"];"));
        assert!(dot.contains("[label=\"A\"];"));
        assert!(dot.contains("[label=\"B\"];"));
        assert!(dot.contains("rw0 [shape=box, style=solid, label=\"+2\"];"));
    }

    #[test]
    fn test_to_dot_constant() {
        let mgr = EvmddManager::new([("A", 2)]).unwrap();
        let dot = mgr.to_dot(&[mgr.make_constant(-3)]).unwrap();
        assert!(dot.contains("label=\"-3\""));
        assert!(dot.contains("rw0 -> T;"));
        assert!(!dot.contains("rank=same"));
    }

    #[test]
    fn test_to_dot_edge_labels() {
        let mgr = EvmddManager::new([("A", 3)]).unwrap();
        let a = mgr.make_variable("A").unwrap();
        let config = DotConfig {
            weight_boxes: false,
            ..DotConfig::default()
        };
        let dot = mgr.to_dot_with_config(&[a], &config).unwrap();
        let id = a.target.raw();
        assert!(dot.contains(&format!("n{} -> T [label=\"2: +2\"];", id)));
        assert!(dot.contains(&format!("r0 -> n{} [label=\"+0\"];", id)));
    }

    #[test]
    fn test_to_dot_multiple_roots() {
        let mgr = EvmddManager::new([("A", 2), ("B", 2)]).unwrap();
        let a = mgr.make_variable("A").unwrap();
        let b = mgr.make_variable("B").unwrap();
        let f = mgr.add(a, b).unwrap();
        let dot = mgr.to_dot(&[a, b, f]).unwrap();
        assert!(dot.contains("r0 "));
        assert!(dot.contains("r2 "));
        // The B node is shared between `b` and `f`.
        assert_eq!(dot.matches("[label=\"B\"];").count(), 1);
    }

    #[test]
    fn test_to_dot_foreign_edge() {
        let m1 = EvmddManager::new([("A", 2)]).unwrap();
        let m2 = EvmddManager::new([("A", 2)]).unwrap();
        let a = m2.make_variable("A").unwrap();
        let res = m1.to_dot(&[m1.make_constant(0), a]);
        assert_eq!(
            res,
            Err(Error::IncompatibleManager {
                expected: m1.manager_id(),
                found: m2.manager_id()
            })
        );
    }
}
