//! Client for the remote image-scoring service.
//!
//! The service accepts a base64-encoded image wrapped in a one-element JSON
//! array and answers with a double-encoded detection payload (a one-element
//! JSON array whose single string element is itself JSON). This crate owns
//! that wire contract end to end: image acquisition, request construction,
//! and response envelope decoding. Payload normalization lives in
//! `boxscore-models`.
//!
//! One scoring call is one HTTP round trip: no retries, no backoff, no
//! shared state. Callers own any retry policy.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;

pub use client::ScoringClient;
pub use config::ScoringConfig;
pub use envelope::{decode_envelope, Parameters, ScoreRequestItem};
pub use error::{ClientError, ClientResult};
