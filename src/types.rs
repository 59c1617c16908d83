//! Type-safe wrappers for EVMDD variables, weights and managers.
//!
//! Variables are identified by name at the API boundary, but internally a
//! variable is just its position in the manager's global ordering.
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Edge weight. All arithmetic on weights is checked.
pub type Weight = i64;

/// A variable, represented by its position in the global ordering (0 = top).
///
/// # Invariants
///
/// - Positions are dense: a manager with `n` variables uses `0..n`
/// - Positions strictly increase along every root-to-terminal path
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a variable at the given position.
    pub const fn new(position: u32) -> Self {
        Var(position)
    }

    /// Returns the raw position as a `u32`.
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the position for indexing.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the next variable in the ordering.
    pub const fn next(self) -> Self {
        Var(self.0 + 1)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

impl From<u32> for Var {
    fn from(position: u32) -> Self {
        Var(position)
    }
}

static NEXT_MANAGER_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of the manager an edge was built by.
///
/// Every manager draws a fresh id, so edges from two managers never compare
/// equal and can be told apart cheaply.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ManagerId(u32);

impl ManagerId {
    pub(crate) fn fresh() -> Self {
        ManagerId(NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}
