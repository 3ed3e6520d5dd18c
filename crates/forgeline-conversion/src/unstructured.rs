//! Projection between typed values and their schema-less form.
//!
//! The unstructured form is a nested mapping from string keys to scalars,
//! sequences and further mappings. It is the neutral interchange
//! representation both schema generations of a resource can be projected
//! into and reconstructed from: [`encode`] places every typed field under
//! its stable serde key, and [`decode`] is the strict inverse for any
//! value [`encode`] produced from a compatible schema.
//!
//! Both functions are pure. They never panic and never leave behind a
//! half-populated value: the output only exists once the whole projection
//! succeeded.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use snafu::Snafu;

/// The schema-less form of a versioned API object.
pub type UnstructuredObject = serde_json::Map<String, Value>;

/// A result type alias with the [`CodecError`] type as the default error
/// type.
pub type Result<T, E = CodecError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum CodecError {
    #[snafu(display("failed to encode the typed value at \"{path}\""))]
    Encode {
        source: serde_json::Error,
        path: String,
    },

    #[snafu(display("failed to decode the unstructured value at \"{path}\""))]
    Decode {
        source: serde_json::Error,
        path: String,
    },

    #[snafu(display("expected the encoded value to be a mapping, got {unexpected}"))]
    NotAMapping { unexpected: &'static str },
}

/// Encodes a typed value into its unstructured form.
///
/// The typed value must serialize to a mapping at the top level, which
/// every resource envelope does.
pub fn encode<T>(typed: &T) -> Result<UnstructuredObject>
where
    T: Serialize,
{
    let value = serde_path_to_error::serialize(typed, serde_json::value::Serializer).map_err(
        |err| CodecError::Encode {
            path: err.path().to_string(),
            source: err.into_inner(),
        },
    )?;

    match value {
        Value::Object(object) => Ok(object),
        other => NotAMappingSnafu {
            unexpected: value_kind(&other),
        }
        .fail(),
    }
}

/// Decodes an unstructured object back into a typed value.
///
/// Fails if a mandatory field of the typed schema is missing, a value has
/// the wrong shape (for example a mapping where a scalar is expected) or a
/// scalar encoding is malformed. The error names the offending key path.
pub fn decode<T>(object: &UnstructuredObject) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_path_to_error::deserialize(Value::Object(object.clone())).map_err(|err| {
        CodecError::Decode {
            path: err.path().to_string(),
            source: err.into_inner(),
        }
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
