//! Arithmetic expressions over finite-domain variables.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

use crate::edge::Edge;
use crate::error::{Error, Result};
use crate::eval::Valuation;
use crate::manager::EvmddManager;
use crate::types::Weight;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Expr {
    Const(Weight),
    Var(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, u32),
}

impl Expr {
    pub fn constant(value: Weight) -> Self {
        Expr::Const(value)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn pow(base: Self, exponent: u32) -> Self {
        Expr::Pow(Box::new(base), exponent)
    }

    /// Names of all variables occurring in the expression, sorted.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(name) => {
                names.insert(name.clone());
            }
            Expr::Neg(e) | Expr::Pow(e, _) => e.collect_variables(names),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) => {
                a.collect_variables(names);
                b.collect_variables(names);
            }
        }
    }

    /// Evaluates the expression directly, without building a diagram.
    pub fn eval(&self, valuation: &(impl Valuation + ?Sized)) -> Result<Weight> {
        let overflow = |v: Option<Weight>| v.ok_or(Error::WeightOverflow);
        match self {
            Expr::Const(c) => Ok(*c),
            Expr::Var(name) => valuation
                .value_of(name)
                .ok_or_else(|| Error::MissingVariable(name.clone())),
            Expr::Neg(e) => overflow(e.eval(valuation)?.checked_neg()),
            Expr::Add(a, b) => overflow(a.eval(valuation)?.checked_add(b.eval(valuation)?)),
            Expr::Sub(a, b) => overflow(a.eval(valuation)?.checked_sub(b.eval(valuation)?)),
            Expr::Mul(a, b) => overflow(a.eval(valuation)?.checked_mul(b.eval(valuation)?)),
            Expr::Pow(e, n) => overflow(e.eval(valuation)?.checked_pow(*n)),
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        Expr::Neg(Box::new(self))
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Const(c) if *c < 0 => write!(f, "({})", c),
            Expr::Const(c) => write!(f, "{}", c),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Neg(e) => write!(f, "-{}", e),
            Expr::Add(a, b) => write!(f, "({} + {})", a, b),
            Expr::Sub(a, b) => write!(f, "({} - {})", a, b),
            Expr::Mul(a, b) => write!(f, "({} * {})", a, b),
            Expr::Pow(e, n) => write!(f, "{}**{}", e, n),
        }
    }
}

impl EvmddManager {
    /// Builds the diagram of an expression bottom-up.
    ///
    /// Multiplications by a constant are turned into scaling, and additions of
    /// a constant only change the root weight.
    pub fn build(&self, expr: &Expr) -> Result<Edge> {
        match expr {
            Expr::Const(c) => Ok(self.make_constant(*c)),
            Expr::Var(name) => self.make_variable(name),
            Expr::Neg(e) => self.neg(self.build(e)?),
            Expr::Add(a, b) => match (a.as_ref(), b.as_ref()) {
                (Expr::Const(k), e) | (e, Expr::Const(k)) => self.add_constant(self.build(e)?, *k),
                _ => self.add(self.build(a)?, self.build(b)?),
            },
            Expr::Sub(a, b) => self.sub(self.build(a)?, self.build(b)?),
            Expr::Mul(a, b) => match (a.as_ref(), b.as_ref()) {
                (Expr::Const(k), e) | (e, Expr::Const(k)) => self.scale(self.build(e)?, *k),
                _ => self.mul(self.build(a)?, self.build(b)?),
            },
            Expr::Pow(e, n) => self.pow(self.build(e)?, *n),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use test_log::test;

    use super::*;

    fn sample() -> Expr {
        // A*B*B + C + 2
        Expr::var("A") * Expr::var("B") * Expr::var("B") + Expr::var("C") + Expr::constant(2)
    }

    #[test]
    fn test_variables() {
        let vars: Vec<_> = sample().variables().into_iter().collect();
        assert_eq!(vars, vec!["A", "B", "C"]);
        assert!(Expr::constant(4).variables().is_empty());
    }

    #[test]
    fn test_eval() {
        let valuation = HashMap::from([("A", 1i64), ("B", 2), ("C", 3)]);
        assert_eq!(sample().eval(&valuation), Ok(9));
        assert_eq!(Expr::pow(Expr::var("B"), 3).eval(&valuation), Ok(8));
        assert_eq!(
            Expr::var("D").eval(&valuation),
            Err(Error::MissingVariable("D".to_string()))
        );
    }

    #[test]
    fn test_display() {
        let e = -(Expr::var("A") - Expr::constant(-1));
        assert_eq!(e.to_string(), "-(A - (-1))");
        assert_eq!(Expr::pow(Expr::var("A"), 2).to_string(), "A**2");
    }

    #[test]
    fn test_build_matches_eval() {
        let mgr = EvmddManager::new([("A", 3), ("B", 3), ("C", 3)]).unwrap();
        let expr = sample() - Expr::constant(3) * Expr::var("A");
        let f = mgr.build(&expr).unwrap();
        for a in 0..3i64 {
            for b in 0..3 {
                for c in 0..3 {
                    let valuation = [("A", a), ("B", b), ("C", c)];
                    assert_eq!(mgr.evaluate(f, &valuation), expr.eval(&valuation));
                }
            }
        }
    }

    #[test]
    fn test_build_shortcuts_agree() {
        let mgr = EvmddManager::new([("A", 3), ("B", 2)]).unwrap();
        let a = mgr.make_variable("A").unwrap();
        let scaled = mgr.build(&(Expr::constant(4) * Expr::var("A"))).unwrap();
        assert_eq!(Ok(scaled), mgr.mul(mgr.make_constant(4), a));
        let shifted = mgr.build(&(Expr::var("A") + Expr::constant(4))).unwrap();
        assert_eq!(Ok(shifted), mgr.add(a, mgr.make_constant(4)));
    }

    #[test]
    fn test_build_unknown_variable() {
        let mgr = EvmddManager::new([("A", 2)]).unwrap();
        assert_eq!(
            mgr.build(&Expr::var("Z")),
            Err(Error::UnknownVariable("Z".to_string()))
        );
    }
}
