//! Request and response envelopes for the scoring wire contract.
//!
//! Both shapes are bit-exact external interfaces and must not be
//! "corrected" here: the request is a one-element JSON array, and the
//! response is a one-element JSON array whose single element is a string
//! containing the actual detection payload (double-encoded JSON).

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Additional request parameters (e.g. target resize dimensions).
pub type Parameters = HashMap<String, serde_json::Value>;

/// The single object inside the request body array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequestItem {
    /// Standard-alphabet base64 of the raw image bytes
    pub image_in_base64: String,
    /// Extra service parameters, `{}` when none are given
    #[serde(default)]
    pub parameters: Parameters,
}

impl ScoreRequestItem {
    /// Build a request item from raw image bytes.
    pub fn from_image_bytes(image: &[u8], parameters: Parameters) -> Self {
        Self {
            image_in_base64: BASE64.encode(image),
            parameters,
        }
    }

    /// Recover the raw image bytes from the encoded field.
    pub fn image_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.image_in_base64)
    }
}

/// Unwrap the double-encoded response envelope, returning the inner
/// payload text.
///
/// The body must be a JSON array with exactly one string element, and that
/// string must itself be valid JSON. Anything else is a
/// [`ClientError::MalformedResponse`] carrying the raw body.
pub fn decode_envelope(body: &str) -> ClientResult<String> {
    let outer: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| ClientError::malformed(format!("body is not a JSON array: {e}"), body))?;

    if outer.len() != 1 {
        return Err(ClientError::malformed(
            format!("expected exactly 1 element, got {}", outer.len()),
            body,
        ));
    }

    let inner = match &outer[0] {
        serde_json::Value::String(s) => s.clone(),
        other => {
            return Err(ClientError::malformed(
                format!("single element is not a string (got {other})"),
                body,
            ))
        }
    };

    serde_json::from_str::<serde_json::Value>(&inner).map_err(|e| {
        ClientError::malformed(format!("inner element is not valid JSON: {e}"), body)
    })?;

    Ok(inner)
}
