//! Parser interface and traits for extensibility

use std::collections::HashMap;

use crate::config::ParserConfig;
use crate::error::ParseResult;
use crate::models::Excerpts;

use super::{GoogleDocParser, MarkdownParser, SourceKind};

/// Trait for implementing parsers for different source formats
pub trait ExcerptParser: Send {
    /// Get the source kind this parser handles
    fn source_kind(&self) -> SourceKind;

    /// Parse raw source text into a forest of excerpts, tagging every
    /// excerpt with `default_tags`
    ///
    /// # Errors
    ///
    /// Returns a parsing error if the source is structurally invalid
    fn parse(&mut self, raw: &str, default_tags: &[String]) -> ParseResult<Excerpts>;

    /// Check if this parser can handle a source with the given file name
    fn can_handle(&self, name: &str) -> bool {
        detect_source(name) == Some(self.source_kind())
    }
}

/// Detect the source kind from a file name's extension
#[must_use]
pub fn detect_source(name: &str) -> Option<SourceKind> {
    let lower = name.to_lowercase();
    let (_, extension) = lower.rsplit_once('.')?;
    match extension {
        "md" | "markdown" | "txt" | "text" => Some(SourceKind::Markdown),
        "json" => Some(SourceKind::GoogleDoc),
        _ => None,
    }
}

/// Registry for managing available parsers
pub struct ParserRegistry {
    parsers: HashMap<SourceKind, Box<dyn ExcerptParser>>,
}

impl ParserRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Create a registry with the Markdown and Google Docs parsers
    #[must_use]
    pub fn with_defaults(config: &ParserConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MarkdownParser::with_config(config.clone())));
        registry.register(Box::new(GoogleDocParser::new()));
        registry
    }

    /// Register a parser, replacing any parser for the same source kind
    pub fn register(&mut self, parser: Box<dyn ExcerptParser>) {
        self.parsers.insert(parser.source_kind(), parser);
    }

    /// Get a parser for the given source kind
    pub fn get_mut(&mut self, kind: SourceKind) -> Option<&mut (dyn ExcerptParser + 'static)> {
        self.parsers.get_mut(&kind).map(|parser| &mut **parser)
    }

    #[must_use]
    pub fn contains(&self, kind: SourceKind) -> bool {
        self.parsers.contains_key(&kind)
    }

    /// List all registered source kinds
    #[must_use]
    pub fn available_kinds(&self) -> Vec<SourceKind> {
        self.parsers.keys().copied().collect()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults(&ParserConfig::default())
    }
}
