//! Excerpt parser framework
//!
//! This module turns structured text into a forest of excerpts. A shared
//! [`TreeBuilder`] tracks the heading hierarchy and nests excerpts by level,
//! while one adapter per source format feeds it headings and text.
//!
//! Key design principles:
//! - Headings become tags on every excerpt beneath them
//! - Indentation (or bullet depth) decides parent and child
//! - Parsers are pluggable through [`ExcerptParser`]

pub mod builder;
pub mod interface;
pub mod manager;
pub mod parsers;

pub use builder::{ExcerptPath, ParserState, TreeBuilder};
pub use interface::{ExcerptParser, ParserRegistry, detect_source};
pub use manager::{FilenameTagger, ImportBatch, ImportManager};
pub use parsers::{GoogleDocParser, MarkdownParser};

use serde::{Deserialize, Serialize};

/// Source format identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum SourceKind {
    /// Markdown or plain-text outline
    Markdown,
    /// Google Docs API document JSON
    GoogleDoc,
}

impl SourceKind {
    /// Get a human-readable name for this source
    #[must_use]
    pub const fn name(&self) -> &str {
        match self {
            Self::Markdown => "Markdown",
            Self::GoogleDoc => "Google Doc",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
