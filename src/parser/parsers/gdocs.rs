//! Google Docs parser implementation
//!
//! Works on the JSON returned by the Docs API (fetching and caching that JSON
//! is the caller's job). Only paragraphs carry excerpts: `HEADING_n` styles
//! drive the heading hierarchy, `NORMAL_TEXT` paragraphs become excerpts
//! nested by bullet depth, and everything else is skipped.

pub mod model;

use std::{fs, path::Path};

use regex::Regex;

use crate::error::{ParseError, ParseResult};
use crate::models::{DOCUMENT_ID_KEY, Excerpt, Excerpts, ORIGIN_KEY};
use crate::parser::{ExcerptParser, SourceKind, TreeBuilder};

use model::{Component, Document, NamedStyle, Paragraph};

/// Prefix of the `origin` metadata written on every excerpt
pub const ORIGIN_PREFIX: &str = "gdocs";

/// Parser for Google Docs documents
#[derive(Debug, Clone, Default)]
pub struct GoogleDocParser {
    builder: TreeBuilder,
    document_id: Option<String>,
}

impl ExcerptParser for GoogleDocParser {
    fn source_kind(&self) -> SourceKind {
        SourceKind::GoogleDoc
    }

    fn parse(&mut self, raw: &str, default_tags: &[String]) -> ParseResult<Excerpts> {
        self.parse_json(raw, default_tags)
    }
}

impl GoogleDocParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a document from JSON and parse it
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedDocument`] if required fields are
    /// missing or a heading or bullet level is deeper than
    /// [`model::MAX_LEVEL`]
    pub fn parse_json(&mut self, json: &str, default_tags: &[String]) -> ParseResult<Excerpts> {
        let document: Document = serde_json::from_str(json)?;
        Ok(self.parse_document(&document, default_tags))
    }

    /// Read a cached document JSON file and parse it
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid document
    pub fn parse_file(
        &mut self,
        path: impl AsRef<Path>,
        default_tags: &[String],
    ) -> ParseResult<Excerpts> {
        let path = path.as_ref();
        let json =
            fs::read_to_string(path).map_err(|e| ParseError::io(path.display().to_string(), &e))?;
        self.parse_json(&json, default_tags)
    }

    /// Parse a decoded document into a forest of excerpts.
    ///
    /// Every excerpt carries the default tags, its active headings and the
    /// document title, plus an `origin` breadcrumb in its metadata. When the
    /// document has an id it is recorded under `document_id` as well.
    pub fn parse_document(&mut self, document: &Document, default_tags: &[String]) -> Excerpts {
        self.builder.set_default_tags(default_tags);
        self.builder.reset_state();
        self.builder.set_document_title(document.title.as_str());
        self.document_id.clone_from(&document.document_id);

        tracing::debug!(title = %document.title, "parsing document");

        for component in &document.body.content {
            match component {
                Component::Paragraph(paragraph) => self.parse_paragraph(paragraph),
                other => tracing::debug!(component = other.kind_name(), "ignoring component"),
            }
        }

        self.builder.close_heading();
        self.builder.take_excerpts()
    }

    /// Set a heading using the document's 1-based heading level
    pub fn update_heading(&mut self, heading: impl Into<String>, level: usize) {
        self.builder.update_heading(heading, level.saturating_sub(1));
    }

    #[must_use]
    pub fn heading_hierarchy(&self) -> &[String] {
        self.builder.heading_hierarchy()
    }

    fn parse_paragraph(&mut self, paragraph: &Paragraph) {
        let text = paragraph.text();

        match paragraph.paragraph_style.named_style() {
            NamedStyle::Heading(level) => self.update_heading(text, level),
            NamedStyle::NormalText => {
                if !text.is_empty() {
                    self.add_text(text, paragraph.nesting_level());
                }
            }
            NamedStyle::Other(style) if style.starts_with("HEADING_") => {
                tracing::warn!(style, "skipping heading with unreadable level");
            }
            NamedStyle::Other(style) => {
                tracing::debug!(style, "skipping paragraph with unhandled style");
            }
        }
    }

    fn add_text(&mut self, text: String, nesting_level: usize) {
        let title = self.builder.document_title().unwrap_or_default().to_string();
        let origin = format!("{ORIGIN_PREFIX} >> {title} >> {}", self.builder.breadcrumb());

        let excerpt = self.builder.add_excerpt(
            Excerpt::new(text).with_indent_level(nesting_level),
            nesting_level,
        );
        if !title.is_empty() {
            excerpt.tags.push(title);
        }
        excerpt.set_metadata(ORIGIN_KEY, origin);
        if let Some(id) = &self.document_id {
            excerpt.set_metadata(DOCUMENT_ID_KEY, id.as_str());
        }
    }
}

/// Extract the document id from a Google Docs URL
#[must_use]
pub fn document_id_from_url(url: &str) -> Option<String> {
    let re = Regex::new(r"/document/d/([a-zA-Z0-9-_]+)").ok()?;
    let caps = re.captures(url)?;
    Some(caps.get(1)?.as_str().to_string())
}
