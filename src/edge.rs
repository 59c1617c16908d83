use std::fmt::{Display, Formatter};

use crate::reference::NodeId;
use crate::types::{ManagerId, Weight};

/// A weighted edge: the unit of composition of EVMDDs.
///
/// The root of a diagram (the "dangling incoming edge") and every branch of
/// every node are edges. Since nodes are hash-consed, two diagrams represent
/// the same function iff their root edges are equal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Edge {
    /// Contribution of this edge to the function value.
    pub weight: Weight,
    /// Node reached by this edge (possibly the terminal).
    pub target: NodeId,
    manager: ManagerId,
}

impl Edge {
    pub(crate) const fn new(weight: Weight, target: NodeId, manager: ManagerId) -> Self {
        Self {
            weight,
            target,
            manager,
        }
    }

    /// The manager this edge was built by.
    pub const fn manager(&self) -> ManagerId {
        self.manager
    }

    /// Returns true if the edge leads directly to the terminal, i.e. it
    /// represents the constant function `weight`.
    pub const fn is_constant(&self) -> bool {
        self.target.is_terminal()
    }

    /// The same target with a different weight.
    pub(crate) const fn with_weight(self, weight: Weight) -> Self {
        Self { weight, ..self }
    }

    /// The remainder of this edge: the same target with weight 0.
    pub(crate) const fn remainder(self) -> Self {
        self.with_weight(0)
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{:+}, {}>", self.weight, self.target)
    }
}
