//! Column codecs for the list-valued fields of a tasting note.
//!
//! Each complex field has one explicit encode/decode pair. The encoding is
//! JSON text, order-preserving, and must round-trip exactly.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::models::{AromaTag, CharacterAxis};

/// Errors raised while encoding or decoding a list-valued column.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Stored text in a column could not be parsed back.
    #[error("malformed `{column}` column: {source}")]
    Decode {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be turned into column text.
    #[error("cannot encode `{column}` column: {source}")]
    Encode {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn encode<T: Serialize>(column: &'static str, value: &T) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(|source| CodecError::Encode { column, source })
}

fn decode<T: DeserializeOwned>(column: &'static str, text: &str) -> Result<T, CodecError> {
    serde_json::from_str(text).map_err(|source| CodecError::Decode { column, source })
}

pub fn encode_aroma_tags(column: &'static str, tags: &[AromaTag]) -> Result<String, CodecError> {
    encode(column, &tags)
}

pub fn decode_aroma_tags(column: &'static str, text: &str) -> Result<Vec<AromaTag>, CodecError> {
    decode(column, text)
}

pub fn encode_characters(axes: &[CharacterAxis]) -> Result<String, CodecError> {
    encode("characters", &axes)
}

pub fn decode_characters(text: &str) -> Result<Vec<CharacterAxis>, CodecError> {
    decode("characters", text)
}
