//! Exhaustive agreement between diagrams and direct evaluation.
//!
//! Every term is translated under every variable ordering, in both reduction
//! modes, with domain size 4 for all variables, and evaluated under every
//! valuation.

use evmdd_rs::ast::Expr;
use evmdd_rs::manager::Reduction;
use evmdd_rs::parser::{parse_term, term_to_evmdd, TermOptions};

const TERMS: &[&str] = &[
    "0",
    "1",
    "A",
    "B",
    "0*A",
    "2*A",
    "0*B",
    "2*B",
    "A+B",
    "B+A",
    "1-A",
    "1-B",
    "-A",
    "A-B",
    "B-A",
    "-(A+B)",
    "A*B + B",
    "B + A*B",
    "A*B*B + C + 2",
    "A*B - 17",
    "A*B - A*B",
    "A-A",
];

const DOMAIN: u64 = 4;

fn permutations(items: &[String]) -> Vec<Vec<String>> {
    if items.is_empty() {
        return vec![vec![]];
    }
    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let first = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, first.clone());
            result.push(tail);
        }
    }
    result
}

fn valuations(names: &[String]) -> Vec<Vec<(String, i64)>> {
    let mut result = vec![vec![]];
    for name in names {
        result = result
            .into_iter()
            .flat_map(|partial| {
                (0..DOMAIN as i64).map(move |value| {
                    let mut extended = partial.clone();
                    extended.push((name.clone(), value));
                    extended
                })
            })
            .collect();
    }
    result
}

fn check_term(term: &str, reduction: Reduction) {
    let expr: Expr = parse_term(term).unwrap();
    let names: Vec<String> = expr.variables().into_iter().collect();
    let all = valuations(&names);

    for order in permutations(&names) {
        let mut options = TermOptions::default().with_order(order.clone()).with_reduction(reduction);
        options.default_domain = DOMAIN;
        let (mgr, f) = term_to_evmdd(term, &options).unwrap();

        for valuation in &all {
            let expected = expr.eval(valuation.as_slice()).unwrap();
            let actual = mgr.evaluate(f, valuation.as_slice()).unwrap();
            assert_eq!(
                actual, expected,
                "term `{}`, order {:?}, {:?}, valuation {:?}",
                term, order, reduction, valuation
            );
        }
    }
}

#[test]
fn fully_reduced_diagrams_agree_with_terms() {
    for term in TERMS {
        check_term(term, Reduction::Full);
    }
}

#[test]
fn quasi_reduced_diagrams_agree_with_terms() {
    for term in TERMS {
        check_term(term, Reduction::Quasi);
    }
}

#[test]
fn vanishing_terms_are_constant() {
    for term in ["0*A", "0*B", "A*B - A*B", "A-A"] {
        for reduction in [Reduction::Full, Reduction::Quasi] {
            let options = TermOptions::default().with_reduction(reduction);
            let (mgr, f) = term_to_evmdd(term, &options).unwrap();
            assert_eq!(f, mgr.make_constant(0), "term `{}`", term);
        }
    }
}
