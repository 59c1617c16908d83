//! Error type for diagram construction, apply and evaluation.
//!
//! Every error is reported at the operation that violates a precondition,
//! before anything is inserted into the unique table or the memo caches.
//! [`Error::WeightOverflow`] is the exception: it may surface in the middle of
//! an apply, after some sub-results were already built. Those nodes and cache
//! entries are canonical and stay valid, but the manager is not rolled back.

use thiserror::Error;

use crate::reference::NodeId;
use crate::types::{ManagerId, Weight};

/// Errors emitted by the EVMDD manager.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Error {
    /// The variable name is not registered with the manager.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// The variable's domain size is not a positive integer.
    #[error("invalid domain size {size} for variable `{name}`")]
    InvalidDomain { name: String, size: u64 },

    /// The same variable name was registered twice.
    #[error("variable `{0}` is registered more than once")]
    DuplicateVariable(String),

    /// The node id was never issued by the manager.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// An operand was built by a different manager.
    #[error("edge belongs to manager {found}, expected {expected}")]
    IncompatibleManager { expected: ManagerId, found: ManagerId },

    /// The operation tag is not one of `+`, `-`, `*`.
    #[error("unsupported operation `{0}`")]
    UnsupportedOperation(String),

    /// The valuation does not assign a variable tested along the path.
    #[error("valuation does not assign variable `{0}`")]
    MissingVariable(String),

    /// The valuation assigns a value outside the variable's domain.
    #[error("value {value} of variable `{name}` is outside its domain 0..{size}")]
    Domain { name: String, value: i64, size: u32 },

    /// A node was given the wrong number of children.
    #[error("variable `{name}` has domain size {expected}, but {found} children were given")]
    ArityMismatch { name: String, expected: usize, found: usize },

    /// A child tests a variable that does not come after its parent.
    #[error("child variable `{child}` does not follow parent variable `{parent}` in the ordering")]
    OrderViolation { parent: String, child: String },

    /// Weight arithmetic left the range of [`Weight`].
    #[error("edge weight overflow")]
    WeightOverflow,

    /// The input term could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Writing DOT output failed.
    #[error("formatting error")]
    Format(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn checked(value: Option<Weight>) -> Result<Weight> {
    value.ok_or(Error::WeightOverflow)
}
