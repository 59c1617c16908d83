//! Evaluation of EVMDDs under a valuation.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::edge::Edge;
use crate::error::{checked, Error, Result};
use crate::manager::EvmddManager;
use crate::types::Weight;

/// An assignment of domain values to variable names.
///
/// Only the variables tested along the evaluated path are looked up, so a
/// valuation may be partial.
pub trait Valuation {
    fn value_of(&self, name: &str) -> Option<i64>;
}

impl<S: Borrow<str> + Hash + Eq> Valuation for HashMap<S, i64> {
    fn value_of(&self, name: &str) -> Option<i64> {
        self.get(name).copied()
    }
}

impl<S: Borrow<str> + Ord> Valuation for BTreeMap<S, i64> {
    fn value_of(&self, name: &str) -> Option<i64> {
        self.get(name).copied()
    }
}

impl<S: Borrow<str>> Valuation for [(S, i64)] {
    fn value_of(&self, name: &str) -> Option<i64> {
        self.iter().find(|(n, _)| n.borrow() == name).map(|&(_, v)| v)
    }
}

impl<S: Borrow<str>, const N: usize> Valuation for [(S, i64); N] {
    fn value_of(&self, name: &str) -> Option<i64> {
        self.as_slice().value_of(name)
    }
}

impl<V: Valuation + ?Sized> Valuation for &V {
    fn value_of(&self, name: &str) -> Option<i64> {
        (**self).value_of(name)
    }
}

impl EvmddManager {
    /// Evaluates the function represented by `edge` under `valuation`.
    ///
    /// Follows the path selected by the valuation from the root to the
    /// terminal and sums the weights of all traversed edges, including the
    /// root edge.
    pub fn evaluate(&self, edge: Edge, valuation: &(impl Valuation + ?Sized)) -> Result<Weight> {
        self.check_edge(edge)?;

        let mut total = edge.weight;
        let mut current = edge.target;
        while let Some(var) = self.variable_of(current) {
            let name = self.var_name(var)?;
            let value = valuation
                .value_of(name)
                .ok_or_else(|| Error::MissingVariable(name.to_string()))?;
            let size = self.domain_size(var)?;
            if value < 0 || value >= size as i64 {
                return Err(Error::Domain {
                    name: name.to_string(),
                    value,
                    size,
                });
            }
            let next = self.child_edge(current, value as usize);
            total = checked(total.checked_add(next.weight))?;
            current = next.target;
        }

        Ok(total)
    }
}
