//! Bounding-box rendering for detection sets.
//!
//! Split into a pure transform and an explicit persistence step:
//! [`annotate`] turns an image plus a [`DetectionSet`] into an annotated
//! pixel buffer without touching the filesystem, and [`save_annotated`]
//! writes a buffer out atomically. [`render_to_file`] chains the two for
//! callers that just want the file.
//!
//! [`DetectionSet`]: boxscore_models::DetectionSet

pub mod error;
pub mod persist;
pub mod render;

pub use error::{RenderError, RenderResult};
pub use persist::save_annotated;
pub use render::{annotate, render_to_file, LabelFont, RenderOptions};
