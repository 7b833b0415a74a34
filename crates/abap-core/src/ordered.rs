//! Insertion-ordered, duplicate-free string collection.

use std::collections::HashSet;

/// A sequence that keeps the first occurrence of each value and drops repeats.
///
/// Every extractor reports names through this type: method names, tables,
/// function modules, class references and interfaces. Case normalization is the
/// caller's decision; use [`OrderedUnique::push_upper`] for the upper-cased
/// variants.
#[derive(Debug, Clone, Default)]
pub struct OrderedUnique {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedUnique {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` unless already present. Returns true when it was new.
    pub fn push(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn push_upper(&mut self, value: &str) -> bool {
        self.push(value.to_uppercase())
    }

    pub fn push_lower(&mut self, value: &str) -> bool {
        self.push(value.to_lowercase())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl<S: Into<String>> Extend<S> for OrderedUnique {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedUnique {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}
