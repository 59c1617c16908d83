//! The EVMDD manager: variable ordering, unique table and canonical construction.
//!
//! # Overview
//!
//! An EVMDD represents a function `f: D₁ × … × Dₙ → ℤ` over finite-domain
//! variables. Function values live on the *edges*: the value of `f` under a
//! valuation is the sum of the edge weights along the unique path selected by
//! that valuation, starting with the weight of the dangling root edge.
//!
//! All diagrams are built through an [`EvmddManager`], which owns:
//!
//! - the variable ordering and domain sizes (fixed at construction),
//! - the node arena and per-variable unique subtables (hash consing),
//! - the single terminal node,
//! - the apply memo caches.
//!
//! Every node is created by [`EvmddManager::make_node`], which normalizes the
//! children weights (the minimum becomes 0 and is pulled up into the incoming
//! edge), applies the configured [`Reduction`], and looks the node up in the
//! unique table. Hence every diagram is canonical: two diagrams represent the
//! same function iff their root [`Edge`]s are equal.
//!
//! # Quick Start
//!
//! ```
//! use evmdd_rs::manager::EvmddManager;
//!
//! let mgr = EvmddManager::new([("A", 2), ("B", 3)]).unwrap();
//! let a = mgr.make_variable("A").unwrap();
//! let b = mgr.make_variable("B").unwrap();
//! let f = mgr.add(a, b).unwrap();
//! let g = mgr.add(b, a).unwrap();
//! assert_eq!(f, g);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::apply::OpKey;
use crate::cache::{Cache, CacheStats};
use crate::edge::Edge;
use crate::error::{checked, Error, Result};
use crate::node::Node;
use crate::reference::NodeId;
use crate::subtable::Subtable;
use crate::types::{ManagerId, Var, Weight};

/// Upper bound on the initial size of each memo cache, as in `2^bits` entries.
const MAX_CACHE_BITS: usize = 16;

/// Reduction mode of a manager.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum Reduction {
    /// Nodes whose children are all equal are skipped (Shannon reduction).
    #[default]
    Full,
    /// Every variable is tested along a path until the remaining function is
    /// constant, including locally redundant ones.
    Quasi,
}

/// Configuration for [`EvmddManager`].
#[derive(Debug, Copy, Clone)]
pub struct ManagerConfig {
    /// Reduction mode of all diagrams built by the manager.
    pub reduction: Reduction,
    /// Initial capacity of each memo cache, as `2^cache_bits` entries.
    /// Values above 16 are clamped to 16.
    pub cache_bits: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            reduction: Reduction::Full,
            cache_bits: 14,
        }
    }
}

impl ManagerConfig {
    pub fn with_reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }

    pub fn with_cache_bits(mut self, cache_bits: usize) -> Self {
        self.cache_bits = cache_bits;
        self
    }
}

#[derive(Debug, Clone)]
struct VarInfo {
    name: String,
    domain: u32,
}

/// The EVMDD manager: owns all nodes and handles operations.
pub struct EvmddManager {
    id: ManagerId,
    config: ManagerConfig,

    /// Variables in ordering position.
    vars: Vec<VarInfo>,
    by_name: HashMap<String, Var>,

    /// Node storage. Index 0 is the terminal.
    nodes: RefCell<Vec<Node>>,

    /// Per-variable subtables for unique table lookup.
    subtables: RefCell<Vec<Subtable>>,

    /// Binary operation cache, keyed by the weight-0 operands.
    pub(crate) cache: RefCell<Cache<OpKey, Edge>>,

    /// Scaling cache: `(factor, node)` to the scaled diagram.
    pub(crate) scale_cache: RefCell<Cache<(Weight, NodeId), Edge>>,
}

impl EvmddManager {
    /// Creates a fully reducing manager for the given `(name, domain size)`
    /// pairs, listed in the desired variable order.
    pub fn new<S: Into<String>>(vars: impl IntoIterator<Item = (S, u64)>) -> Result<Self> {
        Self::with_config(vars, ManagerConfig::default())
    }

    /// Creates a manager with the given configuration.
    pub fn with_config<S: Into<String>>(
        vars: impl IntoIterator<Item = (S, u64)>,
        config: ManagerConfig,
    ) -> Result<Self> {
        let mut infos = Vec::new();
        let mut by_name = HashMap::new();
        for (name, domain) in vars {
            let name = name.into();
            let domain = match u32::try_from(domain) {
                Ok(d) if d > 0 => d,
                _ => return Err(Error::InvalidDomain { name, size: domain }),
            };
            let var = Var::new(infos.len() as u32);
            if by_name.insert(name.clone(), var).is_some() {
                return Err(Error::DuplicateVariable(name));
            }
            infos.push(VarInfo { name, domain });
        }

        let subtables = (0..infos.len() as u32).map(|i| Subtable::new(Var::new(i))).collect();

        let cache_bits = config.cache_bits.min(MAX_CACHE_BITS);
        let id = ManagerId::fresh();
        debug!("new manager {} with {} variables, {:?}", id, infos.len(), config);

        Ok(Self {
            id,
            config,
            vars: infos,
            by_name,
            nodes: RefCell::new(vec![Node::terminal()]),
            subtables: RefCell::new(subtables),
            cache: RefCell::new(Cache::new(cache_bits)),
            scale_cache: RefCell::new(Cache::new(cache_bits)),
        })
    }
}

impl Debug for EvmddManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmddManager")
            .field("id", &self.id)
            .field("reduction", &self.config.reduction)
            .field("vars", &self.vars.iter().map(|v| (&v.name, v.domain)).collect::<Vec<_>>())
            .field("nodes", &self.num_nodes())
            .finish()
    }
}

impl EvmddManager {
    // ========================================================================
    // Variables
    // ========================================================================

    pub fn manager_id(&self) -> ManagerId {
        self.id
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn reduction(&self) -> Reduction {
        self.config.reduction
    }

    /// Returns the number of variables.
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    /// Iterates over the variables in ordering position.
    pub fn vars(&self) -> impl Iterator<Item = Var> + '_ {
        (0..self.vars.len() as u32).map(Var::new)
    }

    /// Looks up a variable by name.
    pub fn var_by_name(&self, name: &str) -> Result<Var> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownVariable(name.to_string()))
    }

    fn info(&self, var: Var) -> Result<&VarInfo> {
        self.vars
            .get(var.index())
            .ok_or_else(|| Error::UnknownVariable(var.to_string()))
    }

    /// Name of a registered variable.
    pub fn var_name(&self, var: Var) -> Result<&str> {
        Ok(&self.info(var)?.name)
    }

    /// Domain size of a registered variable.
    pub fn domain_size(&self, var: Var) -> Result<u32> {
        Ok(self.info(var)?.domain)
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// The terminal node.
    pub fn terminal(&self) -> NodeId {
        NodeId::TERMINAL
    }

    /// Returns true if `id` is the terminal.
    #[inline(always)]
    pub fn is_terminal(&self, id: NodeId) -> bool {
        id.is_terminal()
    }

    /// Access node data.
    pub fn node(&self, id: NodeId) -> Result<Node> {
        self.nodes.borrow().get(id.index()).cloned().ok_or(Error::UnknownNode(id))
    }

    /// Variable tested at `id`, or `None` for the terminal and for ids this
    /// manager never issued.
    pub fn variable_of(&self, id: NodeId) -> Option<Var> {
        if id.is_terminal() {
            None
        } else {
            self.nodes.borrow().get(id.index()).map(|n| n.var)
        }
    }

    /// Outgoing edges of `id` (empty for the terminal).
    pub fn children(&self, id: NodeId) -> Result<Vec<Edge>> {
        self.nodes
            .borrow()
            .get(id.index())
            .map(|n| n.children.to_vec())
            .ok_or(Error::UnknownNode(id))
    }

    /// The edge taken at node `id` for `value`, for ids and values known to be
    /// valid.
    pub(crate) fn child_edge(&self, id: NodeId, value: usize) -> Edge {
        self.nodes.borrow()[id.index()].children[value]
    }

    /// Domain size of a variable known to be registered.
    pub(crate) fn arity(&self, var: Var) -> usize {
        self.vars[var.index()].domain as usize
    }

    /// Number of decision nodes ever created by this manager.
    pub fn num_nodes(&self) -> usize {
        self.nodes.borrow().len() - 1
    }

    /// Number of decision nodes testing `var`, or 0 if `var` is not
    /// registered.
    pub fn num_nodes_at(&self, var: Var) -> usize {
        self.subtables.borrow().get(var.index()).map_or(0, Subtable::len)
    }

    /// Checks that `edge` was built by this manager and leads to one of its
    /// nodes.
    pub fn check_edge(&self, edge: Edge) -> Result<()> {
        if edge.manager() != self.id {
            return Err(Error::IncompatibleManager {
                expected: self.id,
                found: edge.manager(),
            });
        }
        if edge.target.index() >= self.nodes.borrow().len() {
            return Err(Error::UnknownNode(edge.target));
        }
        Ok(())
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Returns the diagram of the constant function `value`: an edge with
    /// weight `value` leading directly to the terminal.
    pub fn make_constant(&self, value: Weight) -> Edge {
        Edge::new(value, NodeId::TERMINAL, self.id)
    }

    /// Returns the diagram of the function "value of variable `name`".
    ///
    /// The result tests `name` with edge `i` of weight `i` leading to the
    /// terminal. In quasi-reduced mode, pass-through nodes are added for every
    /// variable preceding `name` in the ordering.
    pub fn make_variable(&self, name: &str) -> Result<Edge> {
        let var = self.var_by_name(name)?;
        let info = self.info(var)?;
        if info.domain == 0 {
            return Err(Error::InvalidDomain {
                name: info.name.clone(),
                size: 0,
            });
        }
        debug!("make_variable({} = {}, domain = {})", name, var, info.domain);

        let children = (0..info.domain as Weight)
            .map(|i| self.make_constant(i))
            .collect::<Vec<_>>();
        let result = self.mk_node(var, children)?;
        self.lift(result)
    }

    /// In quasi mode, wraps a diagram whose root tests a later variable into
    /// pass-through nodes for every variable above it, so that its root tests
    /// the first variable. Constants and fully reduced diagrams are returned
    /// as they are.
    pub(crate) fn lift(&self, edge: Edge) -> Result<Edge> {
        if self.config.reduction != Reduction::Quasi {
            return Ok(edge);
        }
        let Some(var) = self.variable_of(edge.target) else {
            return Ok(edge);
        };

        let mut result = edge;
        for position in (0..var.id()).rev() {
            let above = Var::new(position);
            let children = vec![result.remainder(); self.arity(above)];
            let offset = result.weight;
            result = self.mk_node(above, children)?;
            result = result.with_weight(checked(result.weight.checked_add(offset))?);
        }
        if result != edge {
            debug!("lift({}) => {}", edge, result);
        }

        Ok(result)
    }

    /// Creates or retrieves the canonical node testing `var` with the given
    /// children, returning the edge leading to it.
    ///
    /// The children are validated first: there must be exactly one per domain
    /// value, all built by this manager, and each non-terminal child must test
    /// a variable after `var` (in quasi mode, the very next one). Then the
    /// minimum weight is pulled up into the returned edge and the configured
    /// reduction is applied.
    pub fn make_node(&self, var: Var, children: Vec<Edge>) -> Result<Edge> {
        let info = self.info(var)?;
        if children.len() != info.domain as usize {
            return Err(Error::ArityMismatch {
                name: info.name.clone(),
                expected: info.domain as usize,
                found: children.len(),
            });
        }
        for &child in &children {
            self.check_edge(child)?;
            if let Some(child_var) = self.variable_of(child.target) {
                let skips = self.config.reduction == Reduction::Quasi && child_var != var.next();
                if child_var <= var || skips {
                    return Err(Error::OrderViolation {
                        parent: info.name.clone(),
                        child: self.info(child_var)?.name.clone(),
                    });
                }
            }
        }
        self.mk_node(var, children)
    }

    /// Canonicalizing constructor for already validated children.
    pub(crate) fn mk_node(&self, var: Var, mut children: Vec<Edge>) -> Result<Edge> {
        debug_assert_eq!(children.len(), self.arity(var));

        // Normalization: the minimum child weight becomes 0.
        let m = children.iter().map(|c| c.weight).min().unwrap_or(0);
        for child in children.iter_mut() {
            child.weight = checked(child.weight.checked_sub(m))?;
        }

        // Shannon reduction. In quasi mode only constant sub-functions are
        // collapsed, so that constants are always terminal edges.
        let first = children[0];
        if children.iter().all(|&c| c == first)
            && (self.config.reduction == Reduction::Full || first.target.is_terminal())
        {
            debug!("mk({}): redundant node, children all {}", var, first);
            return Ok(Edge::new(m, first.target, self.id));
        }

        if let Some(id) = self.subtables.borrow()[var.index()].find(&children) {
            return Ok(Edge::new(m, id, self.id));
        }

        let children = children.into_boxed_slice();
        let id = {
            let mut nodes = self.nodes.borrow_mut();
            let id = NodeId::new(nodes.len() as u32);
            nodes.push(Node::new(var, children.clone()));
            id
        };
        self.subtables.borrow_mut()[var.index()].insert(children, id);
        debug!("mk({}): new node {}, incoming weight {}", var, id, m);

        Ok(Edge::new(m, id, self.id))
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// All decision nodes reachable from the given edges.
    pub fn descendants(&self, edges: impl IntoIterator<Item = Edge>) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from_iter(edges.into_iter().map(|e| e.target));

        while let Some(id) = queue.pop_front() {
            if id.is_terminal() || visited.contains(&id) {
                continue;
            }
            // Ids from other managers are skipped.
            if let Some(node) = self.nodes.borrow().get(id.index()) {
                visited.insert(id);
                queue.extend(node.children.iter().map(|c| c.target));
            }
        }

        visited
    }

    /// Number of decision nodes of the diagram rooted at `edge`.
    pub fn size(&self, edge: Edge) -> usize {
        self.descendants([edge]).len()
    }

    /// Number of edges of the diagram rooted at `edge`, including the root edge.
    pub fn num_edges(&self, edge: Edge) -> usize {
        let nodes = self.nodes.borrow();
        self.descendants([edge])
            .iter()
            .filter_map(|id| nodes.get(id.index()).map(Node::arity))
            .sum::<usize>()
            + 1
    }

    /// Combined statistics of the memo caches.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.borrow().stats() + self.scale_cache.borrow().stats()
    }

    /// Drops all memoized apply results. Nodes are kept.
    pub fn clear_caches(&self) {
        debug!("clearing memo caches: {}", self.cache_stats());
        self.cache.borrow_mut().clear();
        self.scale_cache.borrow_mut().clear();
    }
}
