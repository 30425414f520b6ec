//! Propositional formulas.
//!
//! An [`Expr`] is an immutable tree over constants, variables, negation and
//! the binary connectives of [`BinOp`]. Build formulas with the smart
//! constructors ([`Expr::not`], [`Expr::and`], [`Expr::and_all`], ...) or with
//! the overloaded operators `!`, `&`, `|` and `^`:
//!
//! ```
//! use robdd_sat::ast::Expr;
//!
//! let p = Expr::var("p");
//! let q = Expr::var("q");
//! let f = (p.clone() & !q.clone()) | Expr::imply(q, p);
//! assert_eq!(f.to_string(), "((p ∧ ¬q) ∨ (q → p))");
//! ```
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::model::Model;
use crate::types::Var;

/// Binary connectives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinOp {
    And,
    Or,
    Imply,
    Iff,
    Xor,
}

impl BinOp {
    pub const ALL: [BinOp; 5] = [BinOp::And, BinOp::Or, BinOp::Imply, BinOp::Iff, BinOp::Xor];

    /// Truth table of the connective.
    pub fn eval(self, a: bool, b: bool) -> bool {
        match self {
            BinOp::And => a && b,
            BinOp::Or => a || b,
            BinOp::Imply => !a || b,
            BinOp::Iff => a == b,
            BinOp::Xor => a != b,
        }
    }

    /// Rebuilds this connective around new operands.
    pub fn join(self, a: Expr, b: Expr) -> Expr {
        Expr::Op(self, Box::new(a), Box::new(b))
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::And => "∧",
            BinOp::Or => "∨",
            BinOp::Imply => "→",
            BinOp::Iff => "⟷",
            BinOp::Xor => "⊗",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A propositional formula.
///
/// A negative literal is `Not(Var(v))`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Expr {
    Const(bool),
    Var(Var),
    Not(Box<Expr>),
    Op(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn constant(value: bool) -> Self {
        Expr::Const(value)
    }

    pub fn var(name: impl AsRef<str>) -> Self {
        Expr::Var(Var::named(name))
    }

    /// Negation.
    ///
    /// Terms are negated directly: `not(Const(c))` is `Const(!c)` and the
    /// negation of a negative literal is the bare variable. Any other formula
    /// is wrapped in a `Not` node.
    pub fn not(value: Self) -> Self {
        match value {
            Expr::Const(c) => Expr::Const(!c),
            Expr::Not(inner) if matches!(*inner, Expr::Var(_)) => *inner,
            _ => Expr::Not(Box::new(value)),
        }
    }

    pub fn and(lhs: Self, rhs: Self) -> Self {
        BinOp::And.join(lhs, rhs)
    }

    pub fn or(lhs: Self, rhs: Self) -> Self {
        BinOp::Or.join(lhs, rhs)
    }

    pub fn xor(lhs: Self, rhs: Self) -> Self {
        BinOp::Xor.join(lhs, rhs)
    }

    pub fn imply(lhs: Self, rhs: Self) -> Self {
        BinOp::Imply.join(lhs, rhs)
    }

    pub fn iff(lhs: Self, rhs: Self) -> Self {
        BinOp::Iff.join(lhs, rhs)
    }

    /// Right fold of `op` over the operands: `[a, b, c]` becomes `a op (b op c)`.
    ///
    /// A single operand is returned as is; no operands give `neutral`.
    fn fold(op: BinOp, neutral: bool, exprs: impl IntoIterator<Item = Expr>) -> Self {
        let mut exprs = exprs.into_iter().collect::<Vec<_>>();
        let Some(mut acc) = exprs.pop() else {
            return Expr::Const(neutral);
        };
        while let Some(e) = exprs.pop() {
            acc = op.join(e, acc);
        }
        acc
    }

    pub fn and_all(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self::fold(BinOp::And, true, exprs)
    }

    pub fn or_all(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self::fold(BinOp::Or, false, exprs)
    }

    pub fn xor_all(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self::fold(BinOp::Xor, false, exprs)
    }
}

impl Expr {
    /// Left operand of a binary connective.
    pub fn left(&self) -> Option<&Expr> {
        match self {
            Expr::Op(_, a, _) => Some(a),
            _ => None,
        }
    }

    /// Right operand of a binary connective, or the operand of a negation.
    pub fn right(&self) -> Option<&Expr> {
        match self {
            Expr::Op(_, _, b) => Some(b),
            Expr::Not(a) => Some(a),
            _ => None,
        }
    }

    /// Label of the root node alone.
    pub fn label(&self) -> String {
        match self {
            Expr::Const(c) => c.to_string(),
            Expr::Var(v) => v.to_string(),
            Expr::Not(_) => "¬".to_string(),
            Expr::Op(op, _, _) => op.symbol().to_string(),
        }
    }

    /// Compares the root nodes only, ignoring the operands of connectives.
    ///
    /// Negations compare their operands the same way.
    pub fn same_kind(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::Const(a), Expr::Const(b)) => a == b,
            (Expr::Var(a), Expr::Var(b)) => a == b,
            (Expr::Not(a), Expr::Not(b)) => a.same_kind(b),
            (Expr::Op(a, _, _), Expr::Op(b, _, _)) => a == b,
            _ => false,
        }
    }

    /// Constants, variables and negated variables.
    pub fn is_literal(&self) -> bool {
        match self {
            Expr::Const(_) | Expr::Var(_) => true,
            Expr::Not(inner) => matches!(**inner, Expr::Var(_)),
            Expr::Op(..) => false,
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Expr::Const(_) | Expr::Var(_) => 1,
            Expr::Not(a) => 1 + a.size(),
            Expr::Op(_, a, b) => 1 + a.size() + b.size(),
        }
    }

    /// Distinct variables in left-to-right order of first occurrence.
    pub fn variables(&self) -> Vec<Var> {
        fn go(e: &Expr, out: &mut Vec<Var>) {
            match e {
                Expr::Const(_) => {}
                Expr::Var(v) => {
                    if !out.contains(v) {
                        out.push(v.clone());
                    }
                }
                Expr::Not(a) => go(a, out),
                Expr::Op(_, a, b) => {
                    go(a, out);
                    go(b, out);
                }
            }
        }
        let mut out = Vec::new();
        go(self, &mut out);
        out
    }

    /// Evaluates the formula under `model`.
    ///
    /// Returns `None` if the value depends on a variable the model does not assign.
    pub fn eval(&self, model: &Model) -> Option<bool> {
        match self {
            Expr::Const(c) => Some(*c),
            Expr::Var(v) => model.get(v),
            Expr::Not(a) => a.eval(model).map(|x| !x),
            Expr::Op(op, a, b) => {
                let a = a.eval(model);
                let b = b.eval(model);
                match (op, a, b) {
                    (_, Some(a), Some(b)) => Some(op.eval(a, b)),
                    (BinOp::And, Some(false), _) | (BinOp::And, _, Some(false)) => Some(false),
                    (BinOp::Or, Some(true), _) | (BinOp::Or, _, Some(true)) => Some(true),
                    (BinOp::Imply, Some(false), _) | (BinOp::Imply, _, Some(true)) => Some(true),
                    _ => None,
                }
            }
        }
    }

    /// Rewrites every connective into the `{∧, ∨, ¬}` basis.
    ///
    /// ```text
    /// a → b  =>  ¬a ∨ b
    /// a ⟷ b  =>  (¬a ∨ b) ∧ (¬b ∨ a)
    /// a ⊗ b  =>  (a ∨ b) ∧ ¬(a ∧ b)
    /// ```
    ///
    /// Negations are kept where they are; pushing them to the leaves is the
    /// job of [`nnf`][crate::tseitin::nnf].
    pub fn normalize(&self) -> Expr {
        match self {
            Expr::Const(_) | Expr::Var(_) => self.clone(),
            Expr::Not(a) => Expr::not(a.normalize()),
            Expr::Op(op, a, b) => {
                let a = a.normalize();
                let b = b.normalize();
                match op {
                    BinOp::And => Expr::and(a, b),
                    BinOp::Or => Expr::or(a, b),
                    BinOp::Imply => Expr::or(Expr::not(a), b),
                    BinOp::Iff => Expr::and(
                        Expr::or(Expr::not(a.clone()), b.clone()),
                        Expr::or(Expr::not(b), a),
                    ),
                    BinOp::Xor => Expr::and(
                        Expr::or(a.clone(), b.clone()),
                        Expr::not(Expr::and(a, b)),
                    ),
                }
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(c) => write!(f, "{}", c),
            Expr::Var(v) => write!(f, "{}", v),
            Expr::Not(a) => write!(f, "¬{}", a),
            Expr::Op(op, a, b) => write!(f, "({} {} {})", a, op, b),
        }
    }
}

impl From<Var> for Expr {
    fn from(v: Var) -> Self {
        Expr::Var(v)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Const(value)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        Expr::not(self)
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Self) -> Self::Output {
        Expr::and(self, rhs)
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Self) -> Self::Output {
        Expr::or(self, rhs)
    }
}

impl BitXor for Expr {
    type Output = Expr;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Expr::xor(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> Expr {
        Expr::var("p")
    }
    fn q() -> Expr {
        Expr::var("q")
    }
    fn r() -> Expr {
        Expr::var("r")
    }

    fn all_models(vars: &[Var]) -> Vec<Model> {
        (0..1u32 << vars.len())
            .map(|bits| {
                vars.iter()
                    .enumerate()
                    .map(|(i, v)| (v.clone(), bits & (1 << i) != 0))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_not_cancels_on_terms() {
        assert_eq!(Expr::not(Expr::not(p())), p());
        assert_eq!(Expr::not(Expr::Const(true)), Expr::Const(false));
        assert!(matches!(Expr::not(p()), Expr::Not(_)));

        // Compound formulas are wrapped, twice if needed.
        let f = Expr::not(Expr::not(p() & q()));
        assert!(matches!(&f, Expr::Not(inner) if matches!(**inner, Expr::Not(_))));
    }

    #[test]
    fn test_variadic_right_fold() {
        let f = Expr::and_all([p(), q(), r()]);
        assert_eq!(f, Expr::and(p(), Expr::and(q(), r())));
        assert_eq!(Expr::or_all([p()]), p());
        assert_eq!(Expr::and_all([]), Expr::Const(true));
        assert_eq!(Expr::or_all([]), Expr::Const(false));
        assert_eq!(Expr::xor_all([p(), q(), r()]), Expr::xor(p(), Expr::xor(q(), r())));
    }

    #[test]
    fn test_children() {
        let f = Expr::imply(p(), q());
        assert_eq!(f.left(), Some(&p()));
        assert_eq!(f.right(), Some(&q()));
        let g = Expr::not(p() | q());
        assert_eq!(g.left(), None);
        assert_eq!(g.right(), Some(&(p() | q())));
        assert_eq!(p().left(), None);
        assert_eq!(p().right(), None);
    }

    #[test]
    fn test_same_kind() {
        assert!((p() & q()).same_kind(&(r() & r())));
        assert!(!(p() & q()).same_kind(&(p() | q())));
        assert!(p().same_kind(&p()));
        assert!(!p().same_kind(&q()));
        assert!(Expr::not(p()).same_kind(&Expr::not(p())));
        assert!(!Expr::not(p()).same_kind(&Expr::not(q())));
        assert_eq!((p() & q()).label(), "∧");
    }

    #[test]
    fn test_truth_tables() {
        let rows = [(false, false), (false, true), (true, false), (true, true)];
        let expect = |op: BinOp| rows.map(|(a, b)| op.eval(a, b));
        assert_eq!(expect(BinOp::And), [false, false, false, true]);
        assert_eq!(expect(BinOp::Or), [false, true, true, true]);
        assert_eq!(expect(BinOp::Imply), [true, true, false, true]);
        assert_eq!(expect(BinOp::Iff), [true, false, false, true]);
        assert_eq!(expect(BinOp::Xor), [false, true, true, false]);
    }

    #[test]
    fn test_normalize_basis() {
        fn basis_only(e: &Expr) -> bool {
            match e {
                Expr::Const(_) | Expr::Var(_) => true,
                Expr::Not(a) => basis_only(a),
                Expr::Op(op, a, b) => {
                    matches!(op, BinOp::And | BinOp::Or) && basis_only(a) && basis_only(b)
                }
            }
        }

        for op in BinOp::ALL {
            let f = op.join(p(), Expr::iff(q(), r()));
            let g = f.normalize();
            assert!(basis_only(&g), "{} normalized to {}", f, g);

            for model in all_models(&[Var::named("p"), Var::named("q"), Var::named("r")]) {
                assert_eq!(f.eval(&model), g.eval(&model), "{} vs {} under {}", f, g, model);
            }
        }
    }

    #[test]
    fn test_eval_partial() {
        let model: Model = [(Var::named("p"), false)].into_iter().collect();
        assert_eq!((p() & q()).eval(&model), Some(false));
        assert_eq!((p() | q()).eval(&model), None);
        assert_eq!(Expr::imply(p(), q()).eval(&model), Some(true));
        assert_eq!((p() ^ q()).eval(&model), None);
    }

    #[test]
    fn test_size_and_variables() {
        let f = Expr::and_all([p(), q(), Expr::or_all([p(), q(), r()])]);
        assert_eq!(f.size(), 9);
        assert_eq!(f.variables(), vec![Var::named("p"), Var::named("q"), Var::named("r")]);
    }

    #[test]
    fn test_display() {
        let f = Expr::iff(!p(), Expr::Const(true) ^ q());
        assert_eq!(f.to_string(), "(¬p ⟷ (true ⊗ q))");
    }
}
