//! # robdd-sat: two decision procedures for propositional logic
//!
//! **`robdd-sat`** decides satisfiability and equivalence of propositional formulas with two
//! independent engines that can be checked against each other:
//!
//! - a **Reduced Ordered Binary Decision Diagram** builder: formulas are lowered into a shared,
//!   hash-consed node graph owned by the [`Bdd`][crate::bdd::Bdd] manager, where equivalence is
//!   a handle comparison;
//! - a **backtracking CNF search**: formulas are brought into negation normal form, encoded into
//!   clauses with the Tseitin transformation, and decided by the [`Solver`][crate::cdcl::Solver].
//!
//! ## Basic Usage
//!
//! ```rust
//! use robdd_sat::ast::Expr;
//! use robdd_sat::bdd::Bdd;
//! use robdd_sat::cdcl::{SolveResult, Solver};
//! use robdd_sat::tseitin::{nnf, transform_tseitin};
//!
//! let a = Expr::var("a");
//! let b = Expr::var("b");
//! let e = Expr::iff(a.clone(), b.clone()) & (a ^ b);
//!
//! // 1. Through the BDD manager
//! let bdd = Bdd::default();
//! let f = bdd.from_expr(&e)?;
//! assert!(bdd.is_unsat(f));
//!
//! // 2. Through the CNF search
//! let mut solver = Solver::new(transform_tseitin(&nnf(&e)));
//! assert_eq!(solver.solve(), SolveResult::Unsat);
//! # Ok::<(), robdd_sat::error::Error>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`ast`]**: Formulas and connectives.
//! - **[`clause`]**: Literals, clauses and CNF.
//! - **[`bdd`]**: The manager, Apply and reduction.
//! - **[`sat`]**: Queries on BDDs: equivalence, model search, model counting.
//! - **[`tseitin`]**: NNF and the Tseitin encoding.
//! - **[`cdcl`]**: The backtracking search.
//!
//! Long-running operations accept an [`Interrupt`][crate::interrupt::Interrupt] token.

pub mod ast;
pub mod bdd;
pub mod cache;
pub mod cdcl;
pub mod clause;
pub mod error;
pub mod interrupt;
pub mod model;
pub mod node;
pub mod reference;
pub mod sat;
pub mod table;
pub mod tseitin;
pub mod types;
pub mod utils;
