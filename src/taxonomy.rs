//! Category taxonomy: external labels to canonical slugs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Exact-match mapping from a free-text category label to its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    slugs: BTreeMap<String, String>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self {
            slugs: BTreeMap::new(),
        }
    }

    /// Add or replace a label.
    pub fn with(mut self, label: impl Into<String>, slug: impl Into<String>) -> Self {
        self.slugs.insert(label.into(), slug.into());
        self
    }

    /// The slug for `label`, if the taxonomy knows it. No trimming or case
    /// folding is applied.
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.slugs.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slugs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The blog's category set.
impl Default for Taxonomy {
    fn default() -> Self {
        Taxonomy::new()
            .with("General", "general")
            .with("How to", "how-to")
            .with("New Feature", "new-feature")
            .with("Uncategorized", "uncategorized")
            .with("Userstory", "userstory")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Taxonomy {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Taxonomy::new(), |t, (label, slug)| t.with(label, slug))
    }
}
