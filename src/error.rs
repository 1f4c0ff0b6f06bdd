//! Error types for the excerpts library
//!
//! This module provides centralized error handling using `thiserror` across all components

use thiserror::Error;

/// Parse-related errors
#[derive(Debug, Clone, Error, uniffi::Error)]
pub enum ParseError {
    /// Structured input is missing a required field or has an invalid shape
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// No parser is registered for the requested source
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// Source file could not be read
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl ParseError {
    /// Create a malformed document error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument(reason.into())
    }

    /// Create an unsupported source error
    pub fn unsupported_source(source: impl Into<String>) -> Self {
        Self::UnsupportedSource(source.into())
    }

    /// Create an I/O error for the given path
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization-related errors
#[derive(Debug, Error, uniffi::Error)]
pub enum SerializationError {
    /// Invalid UTF-8 encoding
    #[error("Invalid UTF-8 encoding")]
    InvalidUtf8,

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Serialization failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),
}

impl SerializationError {
    /// Create an unsupported format error
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat(format.into())
    }

    /// Create a serialization failed error
    pub fn serialization_failed(reason: impl Into<String>) -> Self {
        Self::SerializationFailed(reason.into())
    }

    /// Create a deserialization failed error
    pub fn deserialization_failed(reason: impl Into<String>) -> Self {
        Self::DeserializationFailed(reason.into())
    }
}

/// Result type for serialization operations
pub type SerializationResult<T> = Result<T, SerializationError>;

/// Import-related errors
#[derive(Debug, Error, uniffi::Error)]
pub enum ImportError {
    /// Filename tag pattern is not a valid regex
    #[error("Invalid filename tag pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// File contents are not valid UTF-8
    #[error("File is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Parsing a source failed
    #[error("Failed to import {source_name}: {message}")]
    ParseFailed {
        source_name: String,
        message: String,
    },
}

impl ImportError {
    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, err: &regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: err.to_string(),
        }
    }

    /// Wrap a parse error with the name of the source being imported
    pub fn parse_failed(source_name: impl Into<String>, error: &ParseError) -> Self {
        Self::ParseFailed {
            source_name: source_name.into(),
            message: error.to_string(),
        }
    }
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;

/// Configuration errors
#[derive(Debug, Error, uniffi::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {message}")]
    Io { path: String, message: String },

    /// Config file is not valid TOML for the expected shape
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main unified error type that can represent any excerpts error
#[derive(Debug, Error, uniffi::Error)]
pub enum ExcerptsError {
    /// Parsing error
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Serialization error
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// Import error
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl ExcerptsError {
    /// Create a generic error
    pub fn other(reason: impl Into<String>) -> Self {
        Self::Other(reason.into())
    }
}

/// Result type for excerpts operations
pub type ExcerptsResult<T> = Result<T, ExcerptsError>;
