//! Literals, clauses and formulas in conjunctive normal form.
use std::collections::HashSet;
use std::fmt;
use std::ops::Neg;

use crate::ast::Expr;
use crate::types::Var;

/// A literal: a variable, a negated variable, or a constant.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Lit {
    Pos(Var),
    Neg(Var),
    Const(bool),
}

impl Lit {
    /// Negation. Double negation cancels: `Neg(v).negate() == Pos(v)`.
    pub fn negate(&self) -> Lit {
        match self {
            Lit::Pos(v) => Lit::Neg(v.clone()),
            Lit::Neg(v) => Lit::Pos(v.clone()),
            Lit::Const(b) => Lit::Const(!b),
        }
    }

    /// Underlying variable, with the polarity stripped.
    pub fn var(&self) -> Option<&Var> {
        match self {
            Lit::Pos(v) | Lit::Neg(v) => Some(v),
            Lit::Const(_) => None,
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Lit::Neg(_))
    }

    pub fn to_expr(&self) -> Expr {
        match self {
            Lit::Pos(v) => Expr::Var(v.clone()),
            Lit::Neg(v) => Expr::not(Expr::Var(v.clone())),
            Lit::Const(b) => Expr::Const(*b),
        }
    }
}

impl Neg for &Lit {
    type Output = Lit;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Neg for Lit {
    type Output = Lit;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl From<Var> for Lit {
    fn from(v: Var) -> Self {
        Lit::Pos(v)
    }
}

impl TryFrom<&Expr> for Lit {
    type Error = ();

    /// Accepts constants, variables and negated variables.
    fn try_from(e: &Expr) -> Result<Self, Self::Error> {
        match e {
            Expr::Const(b) => Ok(Lit::Const(*b)),
            Expr::Var(v) => Ok(Lit::Pos(v.clone())),
            Expr::Not(inner) => match &**inner {
                Expr::Var(v) => Ok(Lit::Neg(v.clone())),
                _ => Err(()),
            },
            Expr::Op(..) => Err(()),
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lit::Pos(v) => write!(f, "{}", v),
            Lit::Neg(v) => write!(f, "¬{}", v),
            Lit::Const(b) => write!(f, "{}", b),
        }
    }
}

/// A disjunction of literals.
///
/// The order of literals is the order of insertion.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    pub fn new(lits: impl IntoIterator<Item = Lit>) -> Self {
        Self {
            lits: lits.into_iter().collect(),
        }
    }

    /// One-literal clause.
    pub fn unit(lit: Lit) -> Self {
        Self { lits: vec![lit] }
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.lits.len() == 1
    }

    pub fn contains(&self, lit: &Lit) -> bool {
        self.lits.contains(lit)
    }

    /// Removes every occurrence of `lit`.
    ///
    /// Returns `None` if nothing is left, i.e. the clause is falsified once
    /// `lit` is false. A clause without `lit` is returned unchanged.
    pub fn exclude(&self, lit: &Lit) -> Option<Clause> {
        if !self.contains(lit) {
            return Some(self.clone());
        }
        let rest: Vec<Lit> = self.lits.iter().filter(|&l| l != lit).cloned().collect();
        if rest.is_empty() {
            None
        } else {
            Some(Clause { lits: rest })
        }
    }

    pub fn to_expr(&self) -> Expr {
        Expr::or_all(self.lits.iter().map(Lit::to_expr))
    }
}

impl From<Lit> for Clause {
    fn from(lit: Lit) -> Self {
        Clause::unit(lit)
    }
}

impl FromIterator<Lit> for Clause {
    fn from_iter<I: IntoIterator<Item = Lit>>(iter: I) -> Self {
        Clause::new(iter)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.lits.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{}", lit)?;
        }
        write!(f, ")")
    }
}

/// A conjunction of clauses.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Cnf {
    clauses: Vec<Clause>,
}

impl Cnf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn push(&mut self, clause: impl Into<Clause>) {
        self.clauses.push(clause.into());
    }

    /// Appends all clauses of `other`.
    pub fn join(mut self, other: Cnf) -> Cnf {
        self.clauses.extend(other.clauses);
        self
    }

    /// Distinct variables, in order of first occurrence.
    pub fn variables(&self) -> Vec<Var> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for lit in self.clauses.iter().flat_map(|c| c.lits()) {
            if let Some(v) = lit.var() {
                if seen.insert(v) {
                    result.push(v.clone());
                }
            }
        }
        result
    }

    /// The formula as an expression: a conjunction of disjunctions.
    pub fn to_expr(&self) -> Expr {
        Expr::and_all(self.clauses.iter().map(Clause::to_expr))
    }

    pub fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }
}

impl Extend<Clause> for Cnf {
    fn extend<I: IntoIterator<Item = Clause>>(&mut self, iter: I) {
        self.clauses.extend(iter);
    }
}

impl FromIterator<Clause> for Cnf {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Cnf {
    type Item = Clause;
    type IntoIter = std::vec::IntoIter<Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str) -> Lit {
        Lit::Pos(Var::named(name))
    }

    #[test]
    fn test_double_negation_cancels() {
        let a = pos("a");
        assert_eq!(a.negate().negate(), a);
        assert_eq!(-(-a.clone()), a);
        assert_ne!(a.negate(), a);
        assert_eq!(Lit::Const(true).negate(), Lit::Const(false));
        assert_eq!(a.negate().var(), a.var());
    }

    #[test]
    fn test_lit_from_expr() {
        let p = Expr::var("p");
        assert_eq!(Lit::try_from(&p), Ok(pos("p")));
        assert_eq!(Lit::try_from(&!p.clone()), Ok(pos("p").negate()));
        assert_eq!(Lit::try_from(&Expr::Const(false)), Ok(Lit::Const(false)));
        assert_eq!(Lit::try_from(&(p.clone() & p)), Err(()));
    }

    #[test]
    fn test_exclude() {
        let a = pos("a");
        let b = pos("b");
        let clause = Clause::new([a.clone(), b.negate(), a.clone()]);

        // Every occurrence is removed.
        assert_eq!(clause.exclude(&a), Some(Clause::unit(b.negate())));
        // Polarity matters.
        assert_eq!(clause.exclude(&b), Some(clause.clone()));
        // Removing the last literal falsifies the clause.
        assert_eq!(Clause::unit(a.clone()).exclude(&a), None);
        assert_eq!(Clause::new([a.clone(), a.clone()]).exclude(&a), None);
    }

    #[test]
    fn test_literal_as_unit_clause() {
        let a = pos("a");
        let clause = Clause::from(a.clone());
        assert_eq!(clause.len(), 1);
        assert!(clause.is_unit());
        assert!(clause.contains(&a));
        assert!(!clause.contains(&a.negate()));
    }

    #[test]
    fn test_variables_in_encounter_order() {
        let cnf: Cnf = [
            Clause::new([pos("c"), pos("a").negate()]),
            Clause::new([Lit::Const(true), pos("a"), pos("b")]),
            Clause::unit(pos("c").negate()),
        ]
        .into_iter()
        .collect();
        assert_eq!(cnf.variables(), vec![Var::named("c"), Var::named("a"), Var::named("b")]);
    }

    #[test]
    fn test_to_expr_and_display() {
        let mut cnf = Cnf::new();
        cnf.push(Clause::new([pos("a"), pos("b").negate()]));
        cnf.push(pos("c"));
        assert_eq!(cnf.to_string(), "(a ∨ ¬b) ∧ (c)");
        assert_eq!(cnf.to_expr().to_string(), "((a ∨ ¬b) ∧ c)");

        let joined = cnf.clone().join(cnf);
        assert_eq!(joined.len(), 4);
    }
}
