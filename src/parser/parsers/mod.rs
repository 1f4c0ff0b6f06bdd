//! Parsers for the supported source formats

pub mod gdocs;
pub mod markdown;

pub use gdocs::GoogleDocParser;
pub use markdown::MarkdownParser;
