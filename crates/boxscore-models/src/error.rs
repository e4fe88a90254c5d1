//! Payload decoding error types.

use thiserror::Error;

/// Result type for payload decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors that can occur while normalizing a raw detection payload.
///
/// Every variant carries the offending payload text so failures can be
/// debugged without re-running the scoring call.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload schema violation: {detail}; payload: {payload}")]
    Schema { detail: String, payload: String },

    #[error("no label map entry for class id {class_id}; payload: {payload}")]
    UnknownLabel { class_id: i64, payload: String },

    #[error("detection failed validation: {detail}; payload: {payload}")]
    Validation { detail: String, payload: String },
}

impl DecodeError {
    pub fn schema(detail: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::Schema {
            detail: detail.into(),
            payload: payload.into(),
        }
    }

    pub fn validation(detail: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::Validation {
            detail: detail.into(),
            payload: payload.into(),
        }
    }
}
