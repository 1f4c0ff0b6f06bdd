use std::fmt::Debug;

use crate::error::SerializationResult;
use crate::models::{Excerpt, Excerpts};

pub mod cbor;
pub mod json;

pub use cbor::CborFormat;
pub use json::JsonFormat;

/// Encoding of an excerpt forest as bytes, for previews held between the
/// parse and the confirmation of an import
pub trait ExcerptFormat: Send + Sync + Debug {
    /// Short name of the format, such as `json`
    fn name(&self) -> &'static str;

    /// Serialize a forest into bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the forest cannot be encoded
    fn encode(&self, excerpts: &[Excerpt]) -> SerializationResult<Vec<u8>>;

    /// Deserialize bytes into a forest
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid encoded forest
    fn decode(&self, data: &[u8]) -> SerializationResult<Excerpts>;
}

/// Look up a format by name
///
/// # Errors
///
/// Returns [`crate::error::SerializationError::UnsupportedFormat`] for unknown names
pub fn format_by_name(name: &str) -> SerializationResult<Box<dyn ExcerptFormat>> {
    match name.to_ascii_lowercase().as_str() {
        "json" => Ok(Box::new(JsonFormat::pretty())),
        "cbor" => Ok(Box::new(CborFormat)),
        _ => Err(crate::error::SerializationError::unsupported_format(name)),
    }
}
