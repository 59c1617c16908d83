//! Parsing of arithmetic terms and their translation to EVMDDs.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr  := term (("+" | "-") term)*
//! term  := unary ("*" unary)*
//! unary := "-" unary | power
//! power := atom ("**" integer)*        right-associative
//! atom  := integer | identifier | "(" expr ")"
//! ```
//!
//! Exponents are non-negative integer literals. Whitespace is allowed between
//! all tokens.

use std::collections::HashMap;

use log::debug;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, one_of};
use nom::combinator::{all_consuming, map, map_res, not, recognize};
use nom::error::{ErrorKind, ParseError};
use nom::multi::{many0, many0_count};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;

use crate::ast::Expr;
use crate::edge::Edge;
use crate::error::{Error, Result};
use crate::manager::{EvmddManager, ManagerConfig, Reduction};

/// Whitespace-insensitive wrapper.
fn ws<'a, F, O, E: ParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn atom(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        map_res(digit1, |s: &str| s.parse::<i64>().map(Expr::Const)),
        map(identifier, |s: &str| Expr::var(s)),
        delimited(char('('), expr, char(')')),
    )))(input)
}

fn power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = atom(input)?;
    let (rest, exponents) = many0(preceded(ws(tag("**")), ws(nom::character::complete::u32)))(input)?;

    let mut exponents = exponents.into_iter().rev();
    let Some(last) = exponents.next() else {
        return Ok((rest, base));
    };
    let mut exponent = last;
    for e in exponents {
        exponent = match e.checked_pow(exponent) {
            Some(x) => x,
            None => return Err(nom::Err::Failure(ParseError::from_error_kind(input, ErrorKind::TooLarge))),
        };
    }
    Ok((rest, Expr::pow(base, exponent)))
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((map(preceded(ws(char('-')), unary), |e: Expr| -e), power))(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(preceded(ws(terminated(char('*'), not(char('*')))), unary))(input)?;
    Ok((input, rest.into_iter().fold(first, |acc, e| acc * e)))
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(ws(one_of("+-")), term))(input)?;
    let result = rest
        .into_iter()
        .fold(first, |acc, (op, e)| if op == '+' { acc + e } else { acc - e });
    Ok((input, result))
}

/// Parses an arithmetic term over `+`, `-`, `*`, `**`, integer literals and
/// variable names.
pub fn parse_term(input: &str) -> Result<Expr> {
    match all_consuming(ws(expr))(input) {
        Ok((_, e)) => Ok(e),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            let position = input.len() - e.input.len();
            if e.input.is_empty() {
                Err(Error::Parse(format!("unexpected end of input in `{}`", input)))
            } else {
                Err(Error::Parse(format!(
                    "unexpected input at position {}: `{}`",
                    position, e.input
                )))
            }
        }
        Err(nom::Err::Incomplete(_)) => Err(Error::Parse(format!("incomplete input `{}`", input))),
    }
}

/// Options for [`term_to_evmdd`].
#[derive(Debug, Clone)]
pub struct TermOptions {
    /// Variable ordering. Defaults to the sorted variables of the term.
    pub order: Option<Vec<String>>,
    /// Domain sizes by variable name.
    pub domains: HashMap<String, u64>,
    /// Domain size of variables missing from `domains`.
    pub default_domain: u64,
    pub reduction: Reduction,
}

impl Default for TermOptions {
    fn default() -> Self {
        Self {
            order: None,
            domains: HashMap::new(),
            default_domain: 2,
            reduction: Reduction::Full,
        }
    }
}

impl TermOptions {
    pub fn with_order<S: Into<String>>(mut self, order: impl IntoIterator<Item = S>) -> Self {
        self.order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_domain(mut self, name: impl Into<String>, size: u64) -> Self {
        self.domains.insert(name.into(), size);
        self
    }

    pub fn with_reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }
}

/// Parses `term` and builds its diagram in a fresh manager.
///
/// The manager registers exactly the variables of the ordering, which may
/// include variables not occurring in the term.
pub fn term_to_evmdd(term: &str, options: &TermOptions) -> Result<(EvmddManager, Edge)> {
    let expr = parse_term(term)?;
    let order = match &options.order {
        Some(order) => order.clone(),
        None => expr.variables().into_iter().collect(),
    };
    let vars = order.into_iter().map(|name| {
        let size = options.domains.get(&name).copied().unwrap_or(options.default_domain);
        (name, size)
    });

    let config = ManagerConfig::default().with_reduction(options.reduction);
    let manager = EvmddManager::with_config(vars, config)?;
    let edge = manager.build(&expr)?;
    debug!("term_to_evmdd({}) => {}, {} nodes", expr, edge, manager.size(edge));

    Ok((manager, edge))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn var(name: &str) -> Expr {
        Expr::var(name)
    }

    #[test]
    fn test_parse_atoms() {
        assert_eq!(parse_term("42"), Ok(Expr::constant(42)));
        assert_eq!(parse_term("  x_1 "), Ok(var("x_1")));
        assert_eq!(parse_term("(A)"), Ok(var("A")));
    }

    #[test]
    fn test_parse_precedence() {
        assert_eq!(parse_term("A + B * C"), Ok(var("A") + var("B") * var("C")));
        assert_eq!(parse_term("(A + B) * C"), Ok((var("A") + var("B")) * var("C")));
        assert_eq!(parse_term("A - B - C"), Ok(var("A") - var("B") - var("C")));
        assert_eq!(parse_term("-A * B"), Ok(-var("A") * var("B")));
        assert_eq!(parse_term("-A**2"), Ok(-Expr::pow(var("A"), 2)));
        assert_eq!(parse_term("2*-A"), Ok(Expr::constant(2) * -var("A")));
    }

    #[test]
    fn test_parse_power() {
        assert_eq!(parse_term("A**3"), Ok(Expr::pow(var("A"), 3)));
        assert_eq!(parse_term("A ** 2 ** 3"), Ok(Expr::pow(var("A"), 8)));
        assert_eq!(parse_term("A*B**2"), Ok(var("A") * Expr::pow(var("B"), 2)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_term(""), Err(Error::Parse(_))));
        assert!(matches!(parse_term("A +"), Err(Error::Parse(_))));
        assert!(matches!(parse_term("A / B"), Err(Error::Parse(_))));
        assert!(matches!(parse_term("(A"), Err(Error::Parse(_))));
        assert!(matches!(parse_term("A ** -1"), Err(Error::Parse(_))));
        assert!(matches!(parse_term("A * * B"), Err(Error::Parse(_))));
        assert!(matches!(parse_term("99999999999999999999"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_term_to_evmdd_defaults() {
        let (mgr, f) = term_to_evmdd("B*A + 1", &TermOptions::default()).unwrap();
        assert_eq!(mgr.num_vars(), 2);
        assert_eq!(mgr.var_by_name("A"), Ok(crate::types::Var::new(0)));
        assert_eq!(mgr.domain_size(crate::types::Var::new(1)), Ok(2));
        assert_eq!(mgr.evaluate(f, &[("A", 1i64), ("B", 1)]), Ok(2));
    }

    #[test]
    fn test_term_to_evmdd_example() {
        let options = TermOptions::default()
            .with_order(["A", "B", "C"])
            .with_domain("A", 2)
            .with_domain("B", 3)
            .with_domain("C", 2);
        let (mgr, f) = term_to_evmdd("A*B*B + C + 2", &options).unwrap();
        assert_eq!(mgr.evaluate(f, &[("A", 1i64), ("B", 2), ("C", 0)]), Ok(6));
    }

    #[test]
    fn test_term_to_evmdd_unregistered_variable() {
        let options = TermOptions::default().with_order(["A"]);
        let res = term_to_evmdd("A + B", &options);
        assert_eq!(res.unwrap_err(), Error::UnknownVariable("B".to_string()));
    }

    #[test]
    fn test_term_to_evmdd_constant() {
        let (mgr, f) = term_to_evmdd("3 - 5", &TermOptions::default()).unwrap();
        assert_eq!(mgr.num_vars(), 0);
        assert_eq!(f, mgr.make_constant(-2));
    }
}
