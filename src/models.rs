use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{SerializationError, SerializationResult};

pub type Excerpts = Vec<Excerpt>;

/// Free-form key-value metadata attached to an excerpt; values are any JSON
pub type Metadata = Map<String, Value>;

/// Metadata key under which structured-document parsing records provenance
pub const ORIGIN_KEY: &str = "origin";

/// Metadata key holding the id of the structured document an excerpt came from
pub const DOCUMENT_ID_KEY: &str = "document_id";

/// A unit of extracted text with its tags and position in the excerpt tree.
///
/// The serialized form is the plain record exchanged with the import preview
/// and persistence layers. `content` is also accepted under the older
/// `excerpt` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excerpt {
    #[serde(alias = "excerpt")]
    pub content: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub children: Excerpts,
    #[serde(default)]
    pub indent_level: usize,
    #[serde(default)]
    pub is_duplicate: bool,
    /// Indent measured before list-item normalisation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_indent_level: Option<usize>,
}

impl Excerpt {
    /// Create an excerpt with no tags, metadata or children
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_indent_level(mut self, indent_level: usize) -> Self {
        self.indent_level = indent_level;
        self
    }

    #[must_use]
    pub const fn with_original_indent_level(mut self, indent_level: usize) -> Self {
        self.original_indent_level = Some(indent_level);
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set a single metadata entry, creating the map if needed
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
    }

    /// Look up a metadata value
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.as_ref()?.get(key)
    }

    /// The `origin` metadata entry, if any
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.metadata_value(ORIGIN_KEY)?.as_str()
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Number of excerpts in this subtree, including this one
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }

    /// Depth-first, pre-order traversal of this subtree
    pub fn iter(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        core::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Visit every node of this subtree mutably, parents before children
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Self)) {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }

    /// Convert to the plain record form
    ///
    /// # Errors
    ///
    /// Returns an error if the excerpt cannot be represented as JSON
    pub fn to_record(&self) -> SerializationResult<serde_json::Value> {
        serde_json::to_value(self)
            .map_err(|e| SerializationError::serialization_failed(e.to_string()))
    }

    /// Rebuild an excerpt tree from its plain record form
    ///
    /// # Errors
    ///
    /// Returns an error if the record is missing `content` or has wrongly typed fields
    pub fn from_record(record: serde_json::Value) -> SerializationResult<Self> {
        serde_json::from_value(record)
            .map_err(|e| SerializationError::deserialization_failed(e.to_string()))
    }
}

impl fmt::Display for Excerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Total number of excerpts in a forest
#[must_use]
pub fn forest_len(excerpts: &[Excerpt]) -> usize {
    excerpts.iter().map(Excerpt::subtree_len).sum()
}

/// Depth-first traversal over every excerpt in a forest
pub fn walk(excerpts: &[Excerpt]) -> impl Iterator<Item = &Excerpt> {
    excerpts.iter().flat_map(Excerpt::iter)
}
