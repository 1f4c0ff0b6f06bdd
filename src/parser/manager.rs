//! Import manager for combining several sources into one excerpt batch

use std::collections::HashSet;

use regex::Regex;
use uuid::Uuid;

use crate::config::ImportConfig;
use crate::error::{ImportError, ImportResult, ParseError};
use crate::managers::tags::TagIndex;
use crate::models::{Excerpt, Excerpts};

use super::{ParserRegistry, SourceKind, detect_source};

/// Source name recorded for pasted text
pub const PASTED_TEXT_SOURCE: &str = "pasted text";

/// Source name recorded for a structured document passed as JSON
pub const DOCUMENT_JSON_SOURCE: &str = "document json";

/// Derives tags from file names with a regex
#[derive(Debug, Clone)]
pub struct FilenameTagger {
    pattern: Regex,
    separator: Option<String>,
}

impl FilenameTagger {
    /// Create a tagger from a regex and an optional separator
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidPattern`] if the pattern does not compile
    pub fn new(pattern: &str, separator: Option<String>) -> ImportResult<Self> {
        let compiled =
            Regex::new(pattern).map_err(|e| ImportError::invalid_pattern(pattern, &e))?;
        Ok(Self {
            pattern: compiled,
            separator: separator.filter(|s| !s.is_empty()),
        })
    }

    /// Build a tagger from import settings, if a pattern is configured
    ///
    /// # Errors
    ///
    /// Returns an error if the configured pattern does not compile
    pub fn from_config(config: &ImportConfig) -> ImportResult<Option<Self>> {
        config
            .filename_tag_pattern
            .as_deref()
            .map(|pattern| Self::new(pattern, config.filename_tag_separator.clone()))
            .transpose()
    }

    /// Tags found in `file_name`.
    ///
    /// Each match contributes its first capture group, or the whole match when
    /// the pattern has no groups. With a separator, every match is split and
    /// the blank pieces are dropped.
    #[must_use]
    pub fn tags(&self, file_name: &str) -> Vec<String> {
        self.pattern
            .captures_iter(file_name)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .flat_map(|m| self.split(m.as_str()))
            .collect()
    }

    fn split(&self, matched: &str) -> Vec<String> {
        match &self.separator {
            Some(separator) => matched
                .split(separator.as_str())
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(ToString::to_string)
                .collect(),
            None => vec![matched.to_string()],
        }
    }
}

/// Runs the parser registry over several sources and collects the results
pub struct ImportManager {
    registry: ParserRegistry,
    config: ImportConfig,
    tagger: Option<FilenameTagger>,
    excerpts: Excerpts,
    sources: Vec<String>,
}

impl ImportManager {
    /// Create a new import manager
    ///
    /// # Errors
    ///
    /// Returns an error if the configured filename pattern does not compile
    pub fn new(registry: ParserRegistry, config: ImportConfig) -> ImportResult<Self> {
        let tagger = FilenameTagger::from_config(&config)?;
        Ok(Self {
            registry,
            config,
            tagger,
            excerpts: Vec::new(),
            sources: Vec::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Excerpts collected so far
    #[must_use]
    pub fn excerpts(&self) -> &[Excerpt] {
        &self.excerpts
    }

    /// Import pasted Markdown text with the default tags
    ///
    /// # Errors
    ///
    /// Returns an error if no Markdown parser is registered
    pub fn import_text(&mut self, text: &str) -> ImportResult<usize> {
        let tags = self.config.default_tags.clone();
        self.import(PASTED_TEXT_SOURCE, SourceKind::Markdown, text, &tags)
    }

    /// Import a structured document given as JSON, with the default tags
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed
    pub fn import_document_json(&mut self, json: &str) -> ImportResult<usize> {
        let tags = self.config.default_tags.clone();
        self.import(DOCUMENT_JSON_SOURCE, SourceKind::GoogleDoc, json, &tags)
    }

    /// Import an uploaded file, choosing the parser from its extension.
    ///
    /// Files with an unrecognised extension are parsed as Markdown. Excerpts
    /// are tagged with the default tags followed by any tags the filename
    /// pattern finds in `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not UTF-8 or parsing fails
    pub fn import_file(&mut self, name: &str, bytes: &[u8]) -> ImportResult<usize> {
        let kind = detect_source(name).unwrap_or_else(|| {
            tracing::debug!(source = name, "unrecognised extension, parsing as Markdown");
            SourceKind::Markdown
        });
        let text =
            std::str::from_utf8(bytes).map_err(|_| ImportError::InvalidUtf8(name.to_string()))?;

        let mut tags = self.config.default_tags.clone();
        if let Some(tagger) = &self.tagger {
            tags.extend(tagger.tags(name));
        }

        self.import(name, kind, text, &tags)
    }

    fn import(
        &mut self,
        name: &str,
        kind: SourceKind,
        raw: &str,
        tags: &[String],
    ) -> ImportResult<usize> {
        let parser = self.registry.get_mut(kind).ok_or_else(|| {
            ImportError::parse_failed(name, &ParseError::unsupported_source(kind.name()))
        })?;

        let parsed = parser
            .parse(raw, tags)
            .map_err(|e| ImportError::parse_failed(name, &e))?;

        tracing::debug!(source = name, kind = %kind, roots = parsed.len(), "imported source");

        let count = parsed.len();
        self.excerpts.extend(parsed);
        self.sources.push(name.to_string());
        Ok(count)
    }

    /// Hand over everything imported so far as one batch
    pub fn finish(&mut self) -> ImportBatch {
        let batch = ImportBatch::new(
            std::mem::take(&mut self.sources),
            std::mem::take(&mut self.excerpts),
        );
        tracing::info!(
            batch = %batch.id,
            sources = batch.sources.len(),
            excerpts = batch.excerpts.len(),
            "import batch ready"
        );
        batch
    }
}

/// The excerpts produced by one import, ready for preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    pub id: String,
    pub sources: Vec<String>,
    pub excerpts: Excerpts,
}

impl ImportBatch {
    #[must_use]
    pub fn new(sources: Vec<String>, excerpts: Excerpts) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sources,
            excerpts,
        }
    }

    /// Flag every excerpt whose content `is_duplicate` reports as already
    /// known. Returns the number of excerpts flagged.
    pub fn mark_duplicates(&mut self, mut is_duplicate: impl FnMut(&str) -> bool) -> usize {
        let mut marked = 0;
        for root in &mut self.excerpts {
            root.for_each_mut(&mut |excerpt: &mut Excerpt| {
                if is_duplicate(&excerpt.content) {
                    excerpt.is_duplicate = true;
                    marked += 1;
                }
            });
        }
        marked
    }

    /// Flag repeated contents within this batch, keeping the first occurrence
    pub fn mark_repeated(&mut self) -> usize {
        let mut seen = HashSet::new();
        self.mark_duplicates(|content| !seen.insert(content.to_string()))
    }

    /// Number of root excerpts not flagged as duplicates
    #[must_use]
    pub fn non_duplicate_count(&self) -> usize {
        self.excerpts.iter().filter(|e| !e.is_duplicate).count()
    }

    #[must_use]
    pub fn tag_index(&self) -> TagIndex {
        TagIndex::from_excerpts(&self.excerpts)
    }
}
