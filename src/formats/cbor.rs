use crate::{
    error::{SerializationError, SerializationResult},
    formats::ExcerptFormat,
    models::{Excerpt, Excerpts},
};

/// Excerpt forests as CBOR
#[derive(Debug, Clone, Copy, Default)]
pub struct CborFormat;

impl ExcerptFormat for CborFormat {
    fn name(&self) -> &'static str {
        "cbor"
    }

    fn encode(&self, excerpts: &[Excerpt]) -> SerializationResult<Vec<u8>> {
        serde_cbor::to_vec(&excerpts)
            .map_err(|e| SerializationError::serialization_failed(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> SerializationResult<Excerpts> {
        serde_cbor::from_slice(data)
            .map_err(|e| SerializationError::deserialization_failed(e.to_string()))
    }
}
