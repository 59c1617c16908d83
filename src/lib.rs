//! # evmdd-rs: Edge-Valued Multi-valued Decision Diagrams in Rust
//!
//! **`evmdd-rs`** is a manager-centric library for representing and manipulating
//! integer-valued functions over finite-domain variables as **EVMDDs**.
//!
//! ## What is an EVMDD?
//!
//! An Edge-Valued Multi-valued Decision Diagram represents a function
//! `f: D₁ × … × Dₙ → ℤ` as a directed acyclic graph. Each decision node tests one
//! variable and has one outgoing edge per domain value; every edge carries an
//! integer weight. The value of `f` under a valuation is the sum of the weights
//! along the path the valuation selects, starting with the weight of the root edge.
//!
//! Diagrams are **canonical**: for a fixed variable ordering and reduction mode,
//! every function has exactly one representation, so equality of functions is
//! equality of root edges.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All diagrams are built through an [`EvmddManager`][crate::manager::EvmddManager], which owns the nodes, the unique table and the memo caches.
//! - **Normalized Weights**: The minimum outgoing weight of every node is 0; offsets live on incoming edges.
//! - **Full or Quasi Reduction**: Redundant nodes are either skipped, or kept so that every variable is tested along every path.
//! - **Memoized Arithmetic**: Addition, subtraction, negation, multiplication and powers, with checked weight arithmetic.
//! - **Term Parser**: Build diagrams directly from terms like `"A*B*B + C + 2"`.
//!
//! ## Basic Usage
//!
//! ```rust
//! use evmdd_rs::manager::EvmddManager;
//!
//! // 1. Initialize the manager with the variable ordering and domain sizes
//! let mgr = EvmddManager::new([("A", 2), ("B", 3), ("C", 2)]).unwrap();
//!
//! // 2. Create variables
//! let a = mgr.make_variable("A").unwrap();
//! let b = mgr.make_variable("B").unwrap();
//! let c = mgr.make_variable("C").unwrap();
//!
//! // 3. Build f = A*B*B + C + 2
//! let ab = mgr.mul(a, b).unwrap();
//! let abb = mgr.mul(ab, b).unwrap();
//! let f = mgr.add(abb, c).unwrap();
//! let f = mgr.add_constant(f, 2).unwrap();
//!
//! // 4. Evaluate under A=1, B=2, C=0
//! let value = mgr.evaluate(f, &[("A", 1i64), ("B", 2), ("C", 0)]).unwrap();
//! assert_eq!(value, 6);
//! ```
//!
//! The same diagram can be obtained from a term:
//!
//! ```rust
//! use evmdd_rs::parser::{term_to_evmdd, TermOptions};
//!
//! let options = TermOptions::default()
//!     .with_order(["A", "B", "C"])
//!     .with_domain("B", 3);
//! let (mgr, f) = term_to_evmdd("A*B*B + C + 2", &options).unwrap();
//! assert_eq!(mgr.evaluate(f, &[("A", 1i64), ("B", 2), ("C", 0)]).unwrap(), 6);
//! ```
//!
//! ## Core Components
//!
//! - **[`manager`]**: The [`EvmddManager`][crate::manager::EvmddManager], the canonicalizing node constructor and configuration.
//! - **[`apply`]**: The memoized arithmetic engine.
//! - **[`eval`]**: Evaluation under a valuation.
//! - **[`parser`]** and **[`ast`]**: Terms and their translation to diagrams.
//! - **[`view`]** and **[`dot`]**: Inspection and Graphviz export.

pub mod apply;
pub mod ast;
pub mod cache;
pub mod dot;
pub mod edge;
pub mod error;
pub mod eval;
pub mod manager;
pub mod node;
pub mod parser;
pub mod reference;
pub mod subtable;
pub mod types;
pub mod view;
