//! Rewrites that bring a formula into clause form: negation normal form and
//! the Tseitin encoding.
//!
//! ```
//! use robdd_sat::ast::Expr;
//! use robdd_sat::tseitin::{nnf, transform_tseitin};
//!
//! let e = Expr::iff(Expr::var("a"), Expr::var("b"));
//! let cnf = transform_tseitin(&nnf(&e));
//! assert!(cnf.variables().len() > 2);
//! ```
use std::collections::VecDeque;

use log::{debug, info};

use crate::ast::{BinOp, Expr};
use crate::clause::{Clause, Cnf, Lit};
use crate::types::{Var, VarGen};

/// Removes double negations and folds negated constants, everywhere in the
/// tree. Binary connectives are kept as they are.
pub fn prune_unary(e: &Expr) -> Expr {
    match e {
        Expr::Const(_) | Expr::Var(_) => e.clone(),
        Expr::Not(a) => match prune_unary(a) {
            Expr::Const(c) => Expr::Const(!c),
            Expr::Not(inner) => *inner,
            a => Expr::Not(Box::new(a)),
        },
        Expr::Op(op, a, b) => op.join(prune_unary(a), prune_unary(b)),
    }
}

/// Negation normal form: only `∧` and `∨` remain, and negations sit
/// directly on variables.
///
/// Constants are kept; negated constants are folded.
pub fn nnf(e: &Expr) -> Expr {
    push_negations(&e.normalize())
}

fn push_negations(e: &Expr) -> Expr {
    match e {
        Expr::Const(_) | Expr::Var(_) => e.clone(),
        Expr::Op(op @ (BinOp::And | BinOp::Or), a, b) => op.join(push_negations(a), push_negations(b)),
        Expr::Op(op, _, _) => panic!("Connective {} must be normalized before NNF", op),
        Expr::Not(inner) => match &**inner {
            Expr::Var(_) => e.clone(),
            Expr::Const(c) => Expr::Const(!c),
            Expr::Not(a) => push_negations(a),
            Expr::Op(BinOp::And, a, b) => Expr::or(
                push_negations(&Expr::not((**a).clone())),
                push_negations(&Expr::not((**b).clone())),
            ),
            Expr::Op(BinOp::Or, a, b) => Expr::and(
                push_negations(&Expr::not((**a).clone())),
                push_negations(&Expr::not((**b).clone())),
            ),
            Expr::Op(op, _, _) => panic!("Connective {} under a negation must be normalized before NNF", op),
        },
    }
}

fn lit(e: &Expr) -> Lit {
    match Lit::try_from(e) {
        Ok(lit) => lit,
        Err(()) => panic!("Expected a literal, got {}", e),
    }
}

/// Clauses of `v ⟷ shape`.
///
/// `shape` must be a constant, a literal, or a `∧`/`∨` of two literals.
///
/// ```text
/// v ⟷ w        (¬v ∨ w) (v ∨ ¬w)
/// v ⟷ ¬w       (¬v ∨ ¬w) (v ∨ w)
/// v ⟷ l ∨ r    (¬v ∨ l ∨ r) (v ∨ ¬l) (v ∨ ¬r)
/// v ⟷ l ∧ r    (¬v ∨ l) (¬v ∨ r) (v ∨ ¬l ∨ ¬r)
/// v ⟷ c        (v) or (¬v)
/// ```
///
/// # Panics
///
/// Panics on any other shape.
pub fn biimplies_cnf(v: &Var, shape: &Expr) -> Cnf {
    let pos = Lit::Pos(v.clone());
    let neg = Lit::Neg(v.clone());

    let mut cnf = Cnf::new();
    match shape {
        Expr::Const(true) => cnf.push(pos),
        Expr::Const(false) => cnf.push(neg),
        Expr::Var(_) | Expr::Not(_) => {
            let w = lit(shape);
            cnf.push(Clause::new([neg, w.clone()]));
            cnf.push(Clause::new([pos, -w]));
        }
        Expr::Op(BinOp::Or, l, r) => {
            let l = lit(l);
            let r = lit(r);
            cnf.push(Clause::new([neg, l.clone(), r.clone()]));
            cnf.push(Clause::new([pos.clone(), -l]));
            cnf.push(Clause::new([pos, -r]));
        }
        Expr::Op(BinOp::And, l, r) => {
            let l = lit(l);
            let r = lit(r);
            cnf.push(Clause::new([neg.clone(), l.clone()]));
            cnf.push(Clause::new([neg, r.clone()]));
            cnf.push(Clause::new([pos, -l, -r]));
        }
        Expr::Op(op, _, _) => panic!("Cannot encode {} ⟷ {}: unsupported connective {}", v, shape, op),
    }
    cnf
}

/// Tseitin encoder.
///
/// Owns the generator of auxiliary variables, so encodings produced by the
/// same encoder never share an auxiliary variable.
#[derive(Debug, Default)]
pub struct Tseitin {
    gen: VarGen,
}

impl Tseitin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gen(gen: VarGen) -> Self {
        Self { gen }
    }

    pub fn gen(&self) -> &VarGen {
        &self.gen
    }

    /// Equisatisfiable CNF of a formula in negation normal form.
    ///
    /// A fresh variable stands for the whole formula and is asserted by the
    /// first clause. Every `∧`/`∨` node is then defined through fresh
    /// variables for its operands, breadth first, so the result grows
    /// linearly with the formula.
    ///
    /// # Panics
    ///
    /// Panics if `e` is not in negation normal form (see [`nnf`]).
    pub fn transform(&mut self, e: &Expr) -> Cnf {
        let start = self.gen.count();
        let top = self.gen.fresh();

        let mut cnf = Cnf::new();
        cnf.push(Lit::Pos(top.clone()));

        let mut queue = VecDeque::new();
        queue.push_back((top, e.clone()));

        while let Some((label, sub)) = queue.pop_front() {
            let shape = match sub {
                Expr::Op(op @ (BinOp::And | BinOp::Or), a, b) => {
                    let l = self.gen.fresh();
                    let r = self.gen.fresh();
                    queue.push_back((l.clone(), *a));
                    queue.push_back((r.clone(), *b));
                    op.join(Expr::Var(l), Expr::Var(r))
                }
                atom => atom,
            };
            let clauses = biimplies_cnf(&label, &shape);
            debug!("tseitin: {} ⟷ {} gives {}", label, shape, clauses);
            cnf = cnf.join(clauses);
        }

        info!(
            "tseitin: {} clauses, {} auxiliary variables",
            cnf.len(),
            self.gen.count() - start
        );
        cnf
    }
}

/// Encodes a formula in negation normal form with a fresh [`Tseitin`] encoder.
pub fn transform_tseitin(e: &Expr) -> Cnf {
    Tseitin::new().transform(e)
}
