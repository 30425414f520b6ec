use std::fmt::{Display, Formatter};

/// Handle to a node owned by a [`Bdd`][crate::bdd::Bdd] manager.
///
/// Handles are only meaningful for the manager that created them. Two
/// handles from the same manager are equal iff they denote the same
/// boolean function.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ref(u32);

impl Ref {
    /// The constant false leaf.
    pub const ZERO: Ref = Ref(0);
    /// The constant true leaf.
    pub const ONE: Ref = Ref(1);

    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Leaf for the given boolean.
    pub const fn constant(value: bool) -> Self {
        if value {
            Self::ONE
        } else {
            Self::ZERO
        }
    }

    /// Position of the node in the manager's storage.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_terminal(self) -> bool {
        self.0 <= 1
    }

    /// Value of a leaf, `None` for decision nodes.
    pub const fn as_constant(self) -> Option<bool> {
        match self.0 {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.as_constant() {
            Some(b) => write!(f, "{}", b as u8),
            None => write!(f, "@{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminals() {
        assert!(Ref::ZERO.is_terminal());
        assert!(Ref::ONE.is_terminal());
        assert!(!Ref::new(2).is_terminal());
        assert_eq!(Ref::constant(true), Ref::ONE);
        assert_eq!(Ref::constant(false), Ref::ZERO);
        assert_eq!(Ref::ONE.as_constant(), Some(true));
        assert_eq!(Ref::new(5).as_constant(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Ref::ZERO.to_string(), "0");
        assert_eq!(Ref::ONE.to_string(), "1");
        assert_eq!(Ref::new(42).to_string(), "@42");
    }
}
