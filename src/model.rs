use std::collections::BTreeMap;
use std::fmt;

use crate::types::Var;

/// An assignment of truth values to variables.
///
/// Produced by the BDD model search and by the CDCL solver. It only covers
/// the variables the search had to decide on.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Model {
    values: BTreeMap<Var, bool>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: &Var) -> Option<bool> {
        self.values.get(var).copied()
    }

    pub fn insert(&mut self, var: Var, value: bool) -> Option<bool> {
        self.values.insert(var, value)
    }

    pub fn remove(&mut self, var: &Var) -> Option<bool> {
        self.values.remove(var)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Var, bool)> + '_ {
        self.values.iter().map(|(v, &b)| (v, b))
    }

    /// Variables assigned the given value, in variable order.
    pub fn variables(&self, value: bool) -> Vec<Var> {
        self.iter()
            .filter(|&(_, b)| b == value)
            .map(|(v, _)| v.clone())
            .collect()
    }

    /// Drops the auxiliary variables introduced by encodings.
    pub fn without_generated(&self) -> Model {
        self.iter()
            .filter(|(v, _)| !v.is_generated())
            .map(|(v, b)| (v.clone(), b))
            .collect()
    }
}

impl FromIterator<(Var, bool)> for Model {
    fn from_iter<I: IntoIterator<Item = (Var, bool)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", var, value as u8)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_by_value() {
        let mut model = Model::new();
        model.insert(Var::named("b"), true);
        model.insert(Var::named("a"), true);
        model.insert(Var::named("c"), false);
        model.insert(Var::generated(0), true);

        assert_eq!(
            model.variables(true),
            vec![Var::named("a"), Var::named("b"), Var::generated(0)]
        );
        assert_eq!(model.variables(false), vec![Var::named("c")]);
        assert_eq!(model.without_generated().len(), 3);
        assert_eq!(model.to_string(), "{a=1, b=1, c=0, _g0=1}");
    }

    #[test]
    fn test_insert_overwrites() {
        let mut model = Model::new();
        assert_eq!(model.insert(Var::named("p"), true), None);
        assert_eq!(model.insert(Var::named("p"), false), Some(true));
        assert_eq!(model.get(&Var::named("p")), Some(false));
        assert_eq!(model.remove(&Var::named("p")), Some(false));
        assert!(model.is_empty());
    }
}
