//! Detections, bounding boxes and per-image detection sets.

use serde::{Deserialize, Serialize};

/// A normalized bounding box (0.0 to 1.0) in `(top, left, bottom, right)`
/// order, as produced by the scoring backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top edge (0.0 = top of image, 1.0 = bottom)
    pub top: f64,
    /// Left edge (0.0 = left of image, 1.0 = right)
    pub left: f64,
    /// Bottom edge, must be strictly greater than `top`
    pub bottom: f64,
    /// Right edge, must be strictly greater than `left`
    pub right: f64,
}

impl BoundingBox {
    /// Create a new bounding box. Does not validate; see [`is_valid`].
    ///
    /// [`is_valid`]: BoundingBox::is_valid
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Check the box invariants: all edges within 0.0-1.0, `top < bottom`
    /// and `left < right`.
    pub fn is_valid(&self) -> bool {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        in_range(self.top)
            && in_range(self.left)
            && in_range(self.bottom)
            && in_range(self.right)
            && self.top < self.bottom
            && self.left < self.right
    }

    /// Normalized width of the box.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Normalized height of the box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Denormalize to pixel coordinates `(x_min, y_min, x_max, y_max)` for
    /// an image of the given dimensions, clamped to the image bounds.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
        let clamp = |v: f64, max: u32| -> u32 {
            (v.max(0.0) * max as f64).min(max.saturating_sub(1) as f64) as u32
        };
        (
            clamp(self.left, image_width),
            clamp(self.top, image_height),
            clamp(self.right, image_width),
            clamp(self.bottom, image_height),
        )
    }
}

/// One predicted object instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Human-readable class name, resolved through the label map
    pub label: String,
    /// Confidence score in 0.0-1.0
    pub score: f64,
    /// Normalized bounding box
    pub bounds: BoundingBox,
}

/// The ordered result of scoring one image.
///
/// Order is as returned by the scoring backend, which is not guaranteed to
/// be sorted by score. A set is immutable once constructed; filtering
/// produces a new set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSet {
    detections: Vec<Detection>,
    image_reference: String,
}

impl DetectionSet {
    /// Create a detection set for the given image reference.
    pub fn new(image_reference: impl Into<String>, detections: Vec<Detection>) -> Self {
        Self {
            detections,
            image_reference: image_reference.into(),
        }
    }

    /// Path or URL of the scored image.
    pub fn image_reference(&self) -> &str {
        &self.image_reference
    }

    /// Detections in backend order.
    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }

    /// Keep only detections with `score` strictly above `threshold`.
    ///
    /// Pure and idempotent: filtering twice at the same threshold yields
    /// the same set as filtering once. Order is preserved.
    pub fn filter_by_score(&self, threshold: f64) -> DetectionSet {
        DetectionSet {
            detections: self
                .detections
                .iter()
                .filter(|d| d.score > threshold)
                .cloned()
                .collect(),
            image_reference: self.image_reference.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.iter()
    }
}

impl std::ops::Index<usize> for DetectionSet {
    type Output = Detection;

    fn index(&self, index: usize) -> &Detection {
        &self.detections[index]
    }
}
