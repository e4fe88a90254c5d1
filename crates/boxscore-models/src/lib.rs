//! Shared data model for detection scoring.
//!
//! This crate provides Serde-serializable types for:
//! - Detections, bounding boxes and per-image detection sets
//! - The raw scoring-service payload and its codec
//! - Label maps (class id to class name)
//!
//! It performs no I/O; the scoring transport and rendering live in
//! `boxscore-client` and `boxscore-render`.

pub mod detection;
pub mod error;
pub mod label_map;
pub mod payload;

// Re-export common types
pub use detection::{BoundingBox, Detection, DetectionSet};
pub use error::{DecodeError, DecodeResult};
pub use label_map::{LabelMap, LabelMapError};
pub use payload::RawDetections;
