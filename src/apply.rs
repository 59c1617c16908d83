//! Arithmetic on EVMDDs: the memoized apply engine.
//!
//! Every binary operation is computed on the *remainders* of its operands.
//! An edge `(w, N)` represents `w + F` where `F` is the function of node `N`
//! (with `F` normalized, its minimum is 0). Weights are peeled off first:
//!
//! ```text
//! (wa + F) + (wb + G) = (wa + wb) + (F + G)
//! (wa + F) - (wb + G) = (wa - wb) + (F - G)
//! (wa + F) * (wb + G) = wa·wb + wa·G + wb·F + F·G
//! ```
//!
//! so the recursive calls only ever see pairs of nodes, and are memoized on
//! `(op, F, G)`. Results are assembled through [`EvmddManager::mk_node`], hence
//! they are canonical in the manager's reduction mode.
//!
//! When the operands test different variables, the operand whose top variable
//! comes later does not depend on the earlier one, so it is passed unchanged to
//! every branch. In quasi mode operands are first lifted to the first variable,
//! so both always test the same one.
//!
//! A [`WeightOverflow`][Error::WeightOverflow] aborts the operation, but the
//! sub-results computed before it stay in the unique table and the caches.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::debug;

use crate::edge::Edge;
use crate::error::{checked, Error, Result};
use crate::manager::EvmddManager;
use crate::reference::NodeId;
use crate::types::{Var, Weight};

/// Binary arithmetic operation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
}

impl Op {
    /// The operator symbol: `+`, `-` or `*`.
    pub const fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
        }
    }

    pub const fn is_commutative(self) -> bool {
        matches!(self, Op::Add | Op::Mul)
    }

    /// Applies the operation to two plain integers.
    pub fn eval(self, a: Weight, b: Weight) -> Result<Weight> {
        checked(match self {
            Op::Add => a.checked_add(b),
            Op::Sub => a.checked_sub(b),
            Op::Mul => a.checked_mul(b),
        })
    }
}

impl FromStr for Op {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" => Ok(Op::Add),
            "-" => Ok(Op::Sub),
            "*" => Ok(Op::Mul),
            _ => Err(Error::UnsupportedOperation(s.to_string())),
        }
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Cache key for binary operations on remainders.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) struct OpKey {
    op: Op,
    f: NodeId,
    g: NodeId,
}

impl OpKey {
    /// Operands of commutative operations are stored in a fixed order.
    fn new(op: Op, f: NodeId, g: NodeId) -> Self {
        let (f, g) = if op.is_commutative() && g < f { (g, f) } else { (f, g) };
        Self { op, f, g }
    }
}

impl EvmddManager {
    /// Applies `op` to two diagrams of this manager.
    ///
    /// The result is the canonical diagram of `x ↦ op(f(x), g(x))`.
    pub fn apply(&self, op: Op, f: Edge, g: Edge) -> Result<Edge> {
        self.check_edge(f)?;
        self.check_edge(g)?;
        let f = self.lift(f)?;
        let g = self.lift(g)?;
        debug!("apply({}, f = {}, g = {})", op, f, g);
        match op {
            Op::Add => self.add_edges(f, g),
            Op::Sub => self.sub_edges(f, g),
            Op::Mul => self.mul_edges(f, g),
        }
    }

    /// Sum: `f + g`.
    pub fn add(&self, f: Edge, g: Edge) -> Result<Edge> {
        self.apply(Op::Add, f, g)
    }

    /// Difference: `f - g`.
    pub fn sub(&self, f: Edge, g: Edge) -> Result<Edge> {
        self.apply(Op::Sub, f, g)
    }

    /// Product: `f * g`.
    pub fn mul(&self, f: Edge, g: Edge) -> Result<Edge> {
        self.apply(Op::Mul, f, g)
    }

    /// Negation: `-f`.
    pub fn neg(&self, f: Edge) -> Result<Edge> {
        self.scale(f, -1)
    }

    /// Multiplication by a constant: `k * f`.
    pub fn scale(&self, f: Edge, k: Weight) -> Result<Edge> {
        self.check_edge(f)?;
        let f = self.lift(f)?;
        self.scale_edge(f, k)
    }

    /// Addition of a constant: `f + k`. Only the root weight changes.
    pub fn add_constant(&self, f: Edge, k: Weight) -> Result<Edge> {
        self.check_edge(f)?;
        let f = self.lift(f)?;
        shift(f, k)
    }

    /// Power: `f^n`, by repeated squaring. `f^0` is the constant 1.
    pub fn pow(&self, f: Edge, n: u32) -> Result<Edge> {
        self.check_edge(f)?;
        let mut result = self.make_constant(1);
        let mut base = self.lift(f)?;
        let mut n = n;
        while n > 0 {
            if n & 1 == 1 {
                result = self.mul_edges(result, base)?;
            }
            n >>= 1;
            if n > 0 {
                base = self.mul_edges(base, base)?;
            }
        }
        Ok(result)
    }

    // ========================================================================
    // Recursion on edges
    // ========================================================================

    fn add_edges(&self, f: Edge, g: Edge) -> Result<Edge> {
        let offset = checked(f.weight.checked_add(g.weight))?;
        let rest = self.add_rec(f.target, g.target)?;
        shift(rest, offset)
    }

    fn sub_edges(&self, f: Edge, g: Edge) -> Result<Edge> {
        let offset = checked(f.weight.checked_sub(g.weight))?;
        let rest = self.sub_rec(f.target, g.target)?;
        shift(rest, offset)
    }

    fn mul_edges(&self, f: Edge, g: Edge) -> Result<Edge> {
        let offset = checked(f.weight.checked_mul(g.weight))?;
        let f_scaled = self.scale_rec(f.target, g.weight)?;
        let g_scaled = self.scale_rec(g.target, f.weight)?;
        let cross = self.mul_rec(f.target, g.target)?;
        let sum = self.add_edges(f_scaled, g_scaled)?;
        let sum = self.add_edges(sum, cross)?;
        shift(sum, offset)
    }

    fn scale_edge(&self, f: Edge, k: Weight) -> Result<Edge> {
        let offset = checked(f.weight.checked_mul(k))?;
        let rest = self.scale_rec(f.target, k)?;
        shift(rest, offset)
    }

    // ========================================================================
    // Recursion on remainders
    // ========================================================================

    /// Top variable of two nodes, at least one of them non-terminal.
    fn top_var(&self, f: NodeId, g: NodeId) -> Var {
        match (self.variable_of(f), self.variable_of(g)) {
            (Some(v), Some(w)) => v.min(w),
            (Some(v), None) | (None, Some(v)) => v,
            (None, None) => unreachable!("both operands are terminal"),
        }
    }

    /// Branch `value` of the remainder at `f` for variable `var`. A node
    /// testing a later variable does not depend on `var`: it is its own
    /// cofactor.
    fn cofactor(&self, f: NodeId, var: Var, value: usize) -> Edge {
        if self.variable_of(f) == Some(var) {
            self.child_edge(f, value)
        } else {
            Edge::new(0, f, self.manager_id())
        }
    }

    fn binary_rec(
        &self,
        op: Op,
        f: NodeId,
        g: NodeId,
        combine: impl Fn(&Self, Edge, Edge) -> Result<Edge>,
    ) -> Result<Edge> {
        let key = OpKey::new(op, f, g);
        if let Some(result) = self.cache.borrow_mut().get(&key) {
            debug!("cache hit: {} {} {} => {}", f, op, g, result);
            return Ok(result);
        }

        let var = self.top_var(f, g);
        let children = (0..self.arity(var))
            .map(|i| combine(self, self.cofactor(f, var, i), self.cofactor(g, var, i)))
            .collect::<Result<Vec<_>>>()?;
        let result = self.mk_node(var, children)?;

        debug!("{} {} {} => {}", f, op, g, result);
        self.cache.borrow_mut().insert(key, result);
        Ok(result)
    }

    fn add_rec(&self, f: NodeId, g: NodeId) -> Result<Edge> {
        if f.is_terminal() {
            return Ok(Edge::new(0, g, self.manager_id()));
        }
        if g.is_terminal() {
            return Ok(Edge::new(0, f, self.manager_id()));
        }
        self.binary_rec(Op::Add, f, g, Self::add_edges)
    }

    fn sub_rec(&self, f: NodeId, g: NodeId) -> Result<Edge> {
        if f == g {
            return Ok(self.make_constant(0));
        }
        if g.is_terminal() {
            return Ok(Edge::new(0, f, self.manager_id()));
        }
        if f.is_terminal() {
            return self.scale_rec(g, -1);
        }
        self.binary_rec(Op::Sub, f, g, Self::sub_edges)
    }

    fn mul_rec(&self, f: NodeId, g: NodeId) -> Result<Edge> {
        // The terminal remainder is the constant 0.
        if f.is_terminal() || g.is_terminal() {
            return Ok(self.make_constant(0));
        }
        self.binary_rec(Op::Mul, f, g, Self::mul_edges)
    }

    fn scale_rec(&self, f: NodeId, k: Weight) -> Result<Edge> {
        let Some(var) = self.variable_of(f) else {
            return Ok(self.make_constant(0));
        };
        if k == 0 {
            return Ok(self.make_constant(0));
        }
        if k == 1 {
            return Ok(Edge::new(0, f, self.manager_id()));
        }

        let key = (k, f);
        if let Some(result) = self.scale_cache.borrow_mut().get(&key) {
            return Ok(result);
        }

        let children = (0..self.arity(var))
            .map(|i| self.scale_edge(self.child_edge(f, i), k))
            .collect::<Result<Vec<_>>>()?;
        let result = self.mk_node(var, children)?;

        debug!("{} * {} => {}", k, f, result);
        self.scale_cache.borrow_mut().insert(key, result);
        Ok(result)
    }
}

fn shift(edge: Edge, k: Weight) -> Result<Edge> {
    Ok(edge.with_weight(checked(edge.weight.checked_add(k))?))
}
