use std::fmt::{Display, Formatter};

/// A handle to a node in a manager's arena.
///
/// EVMDDs have a single terminal, stored at index 0. Decision nodes start at
/// index 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// The terminal node: "no further contribution".
    pub const TERMINAL: NodeId = NodeId(0);

    /// Creates a handle from a raw index.
    pub(crate) const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Returns the raw index value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the index for arena access.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if this is the terminal.
    pub const fn is_terminal(self) -> bool {
        self.0 == 0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_terminal() {
            write!(f, "T")
        } else {
            write!(f, "@{}", self.0)
        }
    }
}
