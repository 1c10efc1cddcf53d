//! Issue label set passed between pipeline stages

use std::collections::BTreeSet;

/// Sorted, deduplicated set of issue labels.
///
/// Each pipeline stage takes a set by value and returns the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueSet(BTreeSet<String>);

impl IssueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the set with `label` added
    pub fn with(mut self, label: impl Into<String>) -> Self {
        self.0.insert(label.into());
        self
    }

    /// Return the set with `label` removed
    pub fn without(mut self, label: &str) -> Self {
        self.0.remove(label);
        self
    }

    /// Return the union of both sets
    pub fn union(mut self, other: IssueSet) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Labels in lexicographic order
    pub fn into_sorted_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for IssueSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for IssueSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
