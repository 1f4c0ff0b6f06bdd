#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

uniffi::setup_scaffolding!();

pub mod config;
pub mod error;
pub mod ffi;
pub mod formats;
pub mod managers;
pub mod models;
pub mod parser;

// Re-export common error types for convenience
pub use error::{
    ConfigError, ConfigResult, ExcerptsError, ExcerptsResult, ImportError, ImportResult,
    ParseError, ParseResult, SerializationError, SerializationResult,
};
pub use models::{Excerpt, Excerpts};
