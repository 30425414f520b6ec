//! Propositional variables and the generator for fresh auxiliary ones.
//!
//! Two kinds of variables exist side by side:
//!
//! - **named** variables, created by the user from a string and ordered
//!   lexicographically,
//! - **generated** variables, handed out by a [`VarGen`] (for example by the
//!   Tseitin transformation) and ordered numerically.
//!
//! The order is total: every named variable sorts before every generated one.
//! It is the order in which a BDD tests variables from the root downwards.
use std::fmt;
use std::sync::Arc;

/// A propositional variable.
///
/// Cloning is cheap: named variables share their string.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Var {
    /// A user variable, identified by its name.
    Named(Arc<str>),
    /// An auxiliary variable produced by a [`VarGen`].
    Generated(u32),
}

impl Var {
    /// Creates a named variable.
    pub fn named(name: impl AsRef<str>) -> Self {
        Var::Named(Arc::from(name.as_ref()))
    }

    /// Creates a generated variable with the given id.
    ///
    /// Prefer [`VarGen::fresh`], which guarantees the id is unused.
    pub fn generated(id: u32) -> Self {
        Var::Generated(id)
    }

    /// Returns the name of a named variable.
    pub fn name(&self) -> Option<&str> {
        match self {
            Var::Named(name) => Some(name),
            Var::Generated(_) => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Var::Generated(_))
    }

    /// `self <= other` in the variable order.
    pub fn leq(&self, other: &Var) -> bool {
        self <= other
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Named(name) => write!(f, "{}", name),
            Var::Generated(id) => write!(f, "_g{}", id),
        }
    }
}

impl From<&str> for Var {
    fn from(name: &str) -> Self {
        Var::named(name)
    }
}

impl From<String> for Var {
    fn from(name: String) -> Self {
        Var::Named(Arc::from(name))
    }
}

/// Source of fresh [`Var::Generated`] variables.
///
/// Ids start at zero and strictly increase. A generator is an ordinary value:
/// two transformations that must not share auxiliary variables should share
/// one generator.
#[derive(Debug, Default, Clone)]
pub struct VarGen {
    next: u32,
}

impl VarGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts handing out ids at `start`.
    pub fn starting_at(start: u32) -> Self {
        Self { next: start }
    }

    /// Returns a variable that this generator has never returned before.
    ///
    /// # Panics
    ///
    /// Panics if the id space is exhausted.
    pub fn fresh(&mut self) -> Var {
        let id = self.next;
        self.next = id.checked_add(1).expect("Generated variable ids exhausted");
        Var::Generated(id)
    }

    /// Returns `n` fresh variables.
    pub fn fresh_many(&mut self, n: usize) -> Vec<Var> {
        (0..n).map(|_| self.fresh()).collect()
    }

    /// Number of variables handed out so far (when starting at zero).
    pub fn count(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_order() {
        let a = Var::named("a");
        let b = Var::named("b");
        assert!(a < b);
        assert!(a.leq(&b));
        assert!(a.leq(&a));
        assert!(!b.leq(&a));
        assert_eq!(Var::named("p_1"), Var::from("p_1"));
    }

    #[test]
    fn test_generated_order() {
        assert!(Var::generated(2) < Var::generated(10));
        // Numeric, not lexicographic.
        assert!(!Var::generated(10).leq(&Var::generated(2)));
    }

    #[test]
    fn test_named_before_generated() {
        assert!(Var::named("zzz") < Var::generated(0));
    }

    #[test]
    fn test_var_gen() {
        let mut gen = VarGen::new();
        let x = gen.fresh();
        let y = gen.fresh();
        assert_ne!(x, y);
        assert!(x < y);
        assert_eq!(gen.count(), 2);

        let many = gen.fresh_many(3);
        assert_eq!(many, vec![Var::generated(2), Var::generated(3), Var::generated(4)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Var::named("p").to_string(), "p");
        assert_eq!(Var::generated(7).to_string(), "_g7");
        assert_eq!(Var::named("p").name(), Some("p"));
        assert!(Var::generated(7).is_generated());
    }
}
