//! The definition context
//!
//! A set of active identifiers, owned by the caller and lent to the
//! interpreter as `&mut Definitions`. `@define` and `@undef` mutate it in
//! place while the file is walked, so its contents after a run are part of
//! the run's result. Seeding does not validate identifier syntax.

use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    names: FxHashSet<String>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Insert `name`. Returns `false` if it was already defined.
    pub fn define(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Remove `name`. Returns `false` if it was not defined.
    pub fn undef(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Names in lexical order, for stable display
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.iter().collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for Definitions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut defs = Definitions::new();
        defs.extend(iter);
        defs
    }
}

impl<S: Into<String>> Extend<S> for Definitions {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_is_idempotent() {
        let mut defs = Definitions::new();
        assert!(defs.define("A"));
        assert!(!defs.define("A"));
        assert_eq!(defs.len(), 1);
    }

    #[test]
    fn undef_of_missing_name_is_a_no_op() {
        let mut defs: Definitions = ["A"].into_iter().collect();
        assert!(!defs.undef("B"));
        assert!(defs.undef("A"));
        assert!(defs.is_empty());
    }

    #[test]
    fn seeding_accepts_any_string() {
        let defs: Definitions = vec!["not an ident".to_string(), "B".to_string()]
            .into_iter()
            .collect();
        assert!(defs.contains("not an ident"));
        assert_eq!(defs.sorted(), vec!["B", "not an ident"]);
    }
}
