use crate::{
    error::{SerializationError, SerializationResult},
    formats::ExcerptFormat,
    models::{Excerpt, Excerpts},
};

/// Excerpt forests as a JSON array of records
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat {
    pretty: bool,
}

impl JsonFormat {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ExcerptFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, excerpts: &[Excerpt]) -> SerializationResult<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(excerpts)
        } else {
            serde_json::to_vec(excerpts)
        };
        encoded.map_err(|e| SerializationError::serialization_failed(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> SerializationResult<Excerpts> {
        let text = core::str::from_utf8(data).map_err(|_| SerializationError::InvalidUtf8)?;
        serde_json::from_str(text)
            .map_err(|e| SerializationError::deserialization_failed(e.to_string()))
    }
}
