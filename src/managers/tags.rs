use std::collections::BTreeMap;

use crate::models::{Excerpt, walk};

/// Tags found on a parsed forest.
///
/// Excerpts are identified by their position in a depth-first, pre-order walk
/// of the forest (the order of [`crate::models::walk`]).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagIndex {
    tag_index: BTreeMap<String, Vec<usize>>,
}

impl TagIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every excerpt of the forest, children included
    #[must_use]
    pub fn from_excerpts(excerpts: &[Excerpt]) -> Self {
        let mut index = Self::new();
        for (position, excerpt) in walk(excerpts).enumerate() {
            index.index_excerpt(position, excerpt);
        }
        index
    }

    /// Record the tags of the excerpt at `position`; repeated tags on one
    /// excerpt are counted once
    pub fn index_excerpt(&mut self, position: usize, excerpt: &Excerpt) {
        for tag in &excerpt.tags {
            let positions = self.tag_index.entry(tag.clone()).or_default();
            if positions.last() != Some(&position) {
                positions.push(position);
            }
        }
    }

    /// All tags, sorted
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        self.tag_index.keys().map(String::as_str).collect()
    }

    /// Pre-order positions of the excerpts carrying `tag`
    #[must_use]
    pub fn excerpts_with_tag(&self, tag: &str) -> &[usize] {
        self.tag_index
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of excerpts carrying `tag`
    #[must_use]
    pub fn count(&self, tag: &str) -> usize {
        self.excerpts_with_tag(tag).len()
    }

    /// Tags not present in `known`, sorted
    #[must_use]
    pub fn new_tags<S: AsRef<str>>(&self, known: &[S]) -> Vec<&str> {
        self.tags()
            .into_iter()
            .filter(|tag| !known.iter().any(|k| k.as_ref() == *tag))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tag_index.is_empty()
    }
}
