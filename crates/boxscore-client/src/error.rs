//! Scoring client error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for scoring operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur during a scoring call.
///
/// Variants that involve a response always carry the raw body text; it is
/// the only evidence left once the call has failed.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("scoring endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("image fetch from {url} returned {status}")]
    ImageFetch {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed response envelope: {detail}; body: {body}")]
    MalformedResponse { detail: String, body: String },

    #[error("invalid endpoint URL {url:?}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to read image file {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] boxscore_models::DecodeError),
}

impl ClientError {
    pub fn malformed(detail: impl Into<String>, body: impl Into<String>) -> Self {
        Self::MalformedResponse {
            detail: detail.into(),
            body: body.into(),
        }
    }
}
