//! `UniFFI` bindings for the excerpt parsers
//!
//! This module provides a FFI interface to use the parsers and the import
//! manager from different platforms (iOS, Android, Python, etc.). Excerpt
//! trees are flattened into pre-order lists where each entry points at its
//! parent by index.
#![allow(clippy::cast_possible_truncation, clippy::needless_pass_by_value)]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::config::{ImportConfig, ParserConfig};
use crate::error::{ImportError, ParseError};
use crate::models::Excerpt;
use crate::parser::parsers::gdocs::document_id_from_url;
use crate::parser::{
    GoogleDocParser, ImportBatch, ImportManager, MarkdownParser, ParserRegistry, SourceKind,
    detect_source,
};

/// A flattened excerpt representation for FFI
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiExcerpt {
    /// Position in the pre-order list
    pub index: u32,
    /// Index of the parent entry, `None` for roots
    pub parent: Option<u32>,
    /// Tree depth, 0 for roots
    pub depth: u32,
    pub content: String,
    pub tags: Vec<String>,
    /// Metadata values; non-string values are given as JSON text
    pub metadata: HashMap<String, String>,
    pub indent_level: u32,
    pub is_duplicate: bool,
}

/// Flatten a forest into pre-order FFI records
#[must_use]
pub fn flatten(excerpts: &[Excerpt]) -> Vec<FfiExcerpt> {
    let mut out = Vec::new();
    for root in excerpts {
        push_flat(root, None, 0, &mut out);
    }
    out
}

fn push_flat(excerpt: &Excerpt, parent: Option<u32>, depth: u32, out: &mut Vec<FfiExcerpt>) {
    let index = out.len() as u32;
    out.push(FfiExcerpt {
        index,
        parent,
        depth,
        content: excerpt.content.clone(),
        tags: excerpt.tags.clone(),
        metadata: excerpt
            .metadata
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), metadata_text(v)))
            .collect(),
        indent_level: excerpt.indent_level as u32,
        is_duplicate: excerpt.is_duplicate,
    });
    for child in &excerpt.children {
        push_flat(child, Some(index), depth + 1, out);
    }
}

/// String values pass through; other JSON values are rendered as JSON text
fn metadata_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// A finished import, flattened for FFI
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiImportBatch {
    pub id: String,
    pub sources: Vec<String>,
    pub excerpts: Vec<FfiExcerpt>,
    /// Every tag in the batch, sorted
    pub tags: Vec<String>,
    pub non_duplicate_count: u32,
}

impl FfiImportBatch {
    fn from_batch(batch: &ImportBatch) -> Self {
        Self {
            id: batch.id.clone(),
            sources: batch.sources.clone(),
            excerpts: flatten(&batch.excerpts),
            tags: batch
                .tag_index()
                .tags()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            non_duplicate_count: batch.non_duplicate_count() as u32,
        }
    }
}

/// Parse Markdown text into flattened excerpts
#[uniffi::export]
#[must_use]
pub fn parse_markdown(
    text: &str,
    default_tags: Vec<String>,
    config: Option<ParserConfig>,
) -> Vec<FfiExcerpt> {
    let mut parser = MarkdownParser::with_config(config.unwrap_or_default());
    flatten(&parser.parse_text(text, &default_tags))
}

/// Parse a Google Docs document JSON into flattened excerpts
///
/// # Errors
///
/// Returns an error if the document is malformed
#[uniffi::export]
pub fn parse_google_doc(
    json: &str,
    default_tags: Vec<String>,
) -> Result<Vec<FfiExcerpt>, ParseError> {
    let mut parser = GoogleDocParser::new();
    Ok(flatten(&parser.parse_json(json, &default_tags)?))
}

/// Extract the document id from a Google Docs URL
#[uniffi::export]
#[must_use]
pub fn google_doc_id(url: &str) -> Option<String> {
    document_id_from_url(url)
}

/// Detect the source kind from a file name
#[uniffi::export]
#[must_use]
pub fn source_kind_for(name: &str) -> Option<SourceKind> {
    detect_source(name)
}

/// Collects excerpts from several sources into one batch
#[derive(uniffi::Object)]
pub struct ExcerptImporter {
    manager: Mutex<ImportManager>,
}

impl ExcerptImporter {
    fn manager(&self) -> MutexGuard<'_, ImportManager> {
        self.manager.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[uniffi::export]
impl ExcerptImporter {
    /// Create an importer with the default parsers
    ///
    /// # Errors
    ///
    /// Returns an error if the filename tag pattern does not compile
    #[uniffi::constructor]
    pub fn new(parser: ParserConfig, import: ImportConfig) -> Result<Self, ImportError> {
        let manager = ImportManager::new(ParserRegistry::with_defaults(&parser), import)?;
        Ok(Self {
            manager: Mutex::new(manager),
        })
    }

    /// Import pasted Markdown text, returning the number of root excerpts added
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails
    pub fn import_text(&self, text: &str) -> Result<u32, ImportError> {
        Ok(self.manager().import_text(text)? as u32)
    }

    /// Import an uploaded file, returning the number of root excerpts added.
    /// Unrecognised file types are parsed as Markdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not UTF-8 or parsing fails
    pub fn import_file(&self, name: &str, bytes: Vec<u8>) -> Result<u32, ImportError> {
        Ok(self.manager().import_file(name, &bytes)? as u32)
    }

    /// Import a Google Docs document JSON, returning the number of root
    /// excerpts added
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed
    pub fn import_document_json(&self, json: &str) -> Result<u32, ImportError> {
        Ok(self.manager().import_document_json(json)? as u32)
    }

    /// Excerpts imported so far, flattened
    pub fn excerpts(&self) -> Vec<FfiExcerpt> {
        flatten(self.manager().excerpts())
    }

    /// Close the current batch and start a new one
    pub fn finish(&self) -> FfiImportBatch {
        let mut batch = self.manager().finish();
        batch.mark_repeated();
        FfiImportBatch::from_batch(&batch)
    }

    /// Close the current batch, flagging excerpts whose content is in `known`
    pub fn finish_with_known(&self, known: Vec<String>) -> FfiImportBatch {
        let mut batch = self.manager().finish();
        batch.mark_duplicates(|content| known.iter().any(|k| k == content));
        FfiImportBatch::from_batch(&batch)
    }
}
