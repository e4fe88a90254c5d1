//! Raw scoring payload and its codec.
//!
//! The scoring backend (local model call or remote service) produces a
//! payload of parallel arrays keyed by detection index. This module holds
//! the typed schema for that payload and the decode step that turns it into
//! a validated [`DetectionSet`].

use serde::{Deserialize, Serialize};

use crate::detection::{BoundingBox, Detection, DetectionSet};
use crate::error::{DecodeError, DecodeResult};
use crate::label_map::LabelMap;

/// Raw detection payload as returned by the scoring backend.
///
/// `detection_boxes` entries are `(top, left, bottom, right)` normalized
/// coordinates. The arrays may be longer than `num_detections` (backends
/// commonly pad to a fixed tensor size); only the first `num_detections`
/// entries are meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDetections {
    /// Number of valid detections
    pub num_detections: usize,
    /// One `(top, left, bottom, right)` tuple per detection
    pub detection_boxes: Vec<[f64; 4]>,
    /// One confidence score per detection
    pub detection_scores: Vec<f64>,
    /// One integer class id per detection
    pub detection_classes: Vec<i64>,
}

impl RawDetections {
    /// Parse a payload from JSON text.
    ///
    /// Missing keys and type mismatches surface as [`DecodeError::Schema`]
    /// with the raw text attached.
    pub fn from_json(payload: &str) -> DecodeResult<Self> {
        serde_json::from_str(payload).map_err(|e| DecodeError::schema(e.to_string(), payload))
    }

    /// Normalize into a [`DetectionSet`] for the given image.
    ///
    /// Consumes the first `num_detections` entries of each array, resolves
    /// class ids through `labels`, and enforces the label, score and box
    /// invariants. Backend order is preserved.
    pub fn decode(
        &self,
        labels: &LabelMap,
        image_reference: impl Into<String>,
    ) -> DecodeResult<DetectionSet> {
        let n = self.num_detections;

        self.check_len("detection_boxes", self.detection_boxes.len(), n)?;
        self.check_len("detection_scores", self.detection_scores.len(), n)?;
        self.check_len("detection_classes", self.detection_classes.len(), n)?;

        let mut detections = Vec::with_capacity(n);
        for i in 0..n {
            let class_id = self.detection_classes[i];
            let label = labels
                .get(class_id)
                .ok_or_else(|| DecodeError::UnknownLabel {
                    class_id,
                    payload: self.payload_text(),
                })?;
            if label.is_empty() {
                return Err(DecodeError::validation(
                    format!("detection {i}: label map entry for class id {class_id} is empty"),
                    self.payload_text(),
                ));
            }

            let score = self.detection_scores[i];
            if !(0.0..=1.0).contains(&score) {
                return Err(DecodeError::validation(
                    format!("detection {i}: score {score} outside 0.0-1.0"),
                    self.payload_text(),
                ));
            }

            let [top, left, bottom, right] = self.detection_boxes[i];
            let bounds = BoundingBox::new(top, left, bottom, right);
            if !bounds.is_valid() {
                return Err(DecodeError::validation(
                    format!(
                        "detection {i}: box ({top}, {left}, {bottom}, {right}) violates \
                         normalized-coordinate invariants"
                    ),
                    self.payload_text(),
                ));
            }

            detections.push(Detection {
                label: label.to_string(),
                score,
                bounds,
            });
        }

        Ok(DetectionSet::new(image_reference, detections))
    }

    fn check_len(&self, field: &str, actual: usize, expected: usize) -> DecodeResult<()> {
        if actual < expected {
            return Err(DecodeError::schema(
                format!("{field} has {actual} entries, expected at least {expected}"),
                self.payload_text(),
            ));
        }
        Ok(())
    }

    fn payload_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "<unserializable payload>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORANGE_PAYLOAD: &str = r#"{
        "num_detections": 1,
        "detection_boxes": [[0.1, 0.2, 0.5, 0.6]],
        "detection_scores": [0.93],
        "detection_classes": [3]
    }"#;

    fn orange_labels() -> LabelMap {
        LabelMap::from([(3, "orange")])
    }

    #[test]
    fn test_decode_single_detection() {
        let raw = RawDetections::from_json(ORANGE_PAYLOAD).unwrap();
        let set = raw.decode(&orange_labels(), "fruit.jpg").unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.image_reference(), "fruit.jpg");
        let det = &set[0];
        assert_eq!(det.label, "orange");
        assert_eq!(det.score, 0.93);
        assert_eq!(det.bounds, BoundingBox::new(0.1, 0.2, 0.5, 0.6));
    }

    #[test]
    fn test_decode_preserves_backend_order() {
        let raw = RawDetections {
            num_detections: 3,
            detection_boxes: vec![
                [0.0, 0.0, 0.1, 0.1],
                [0.2, 0.2, 0.4, 0.4],
                [0.5, 0.5, 0.9, 0.9],
            ],
            detection_scores: vec![0.2, 0.9, 0.5],
            detection_classes: vec![1, 2, 1],
        };
        let labels = LabelMap::from([(1, "cat"), (2, "dog")]);
        let set = raw.decode(&labels, "pets.png").unwrap();

        assert_eq!(set.len(), 3);
        // backend order, not score order
        let scores: Vec<f64> = set.iter().map(|d| d.score).collect();
        assert_eq!(scores, vec![0.2, 0.9, 0.5]);
    }

    #[test]
    fn test_decode_ignores_padding_past_num_detections() {
        let raw = RawDetections {
            num_detections: 1,
            detection_boxes: vec![[0.1, 0.2, 0.5, 0.6], [0.0, 0.0, 0.0, 0.0]],
            detection_scores: vec![0.93, 0.0],
            detection_classes: vec![3, 999],
        };
        // class id 999 is unmapped but padded, so decode must not touch it
        let set = raw.decode(&orange_labels(), "fruit.jpg").unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_unknown_class_id_fails() {
        let raw = RawDetections::from_json(ORANGE_PAYLOAD).unwrap();
        let labels = LabelMap::from([(4, "orange")]);
        let err = raw.decode(&labels, "fruit.jpg").unwrap_err();
        match err {
            DecodeError::UnknownLabel { class_id, payload } => {
                assert_eq!(class_id, 3);
                assert!(payload.contains("detection_boxes"));
            }
            other => panic!("expected UnknownLabel, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_key_is_schema_error() {
        let err = RawDetections::from_json(r#"{"num_detections": 1}"#).unwrap_err();
        match err {
            DecodeError::Schema { payload, .. } => {
                assert!(payload.contains("num_detections"));
            }
            other => panic!("expected Schema, got {other:?}"),
        }
    }

    #[test]
    fn test_short_sequence_is_schema_error() {
        let raw = RawDetections {
            num_detections: 2,
            detection_boxes: vec![[0.1, 0.2, 0.5, 0.6]],
            detection_scores: vec![0.93, 0.5],
            detection_classes: vec![3, 3],
        };
        let err = raw.decode(&orange_labels(), "fruit.jpg").unwrap_err();
        assert!(matches!(err, DecodeError::Schema { .. }));
    }

    #[test]
    fn test_inverted_box_fails_validation() {
        let raw = RawDetections {
            num_detections: 1,
            detection_boxes: vec![[0.5, 0.2, 0.1, 0.6]],
            detection_scores: vec![0.93],
            detection_classes: vec![3],
        };
        let err = raw.decode(&orange_labels(), "fruit.jpg").unwrap_err();
        assert!(matches!(err, DecodeError::Validation { .. }));
    }

    #[test]
    fn test_empty_label_fails_validation() {
        let raw = RawDetections::from_json(ORANGE_PAYLOAD).unwrap();
        let labels = LabelMap::from([(3, "")]);
        let err = raw.decode(&labels, "fruit.jpg").unwrap_err();
        assert!(matches!(err, DecodeError::Validation { .. }));
    }

    #[test]
    fn test_out_of_range_score_fails_validation() {
        let raw = RawDetections {
            num_detections: 1,
            detection_boxes: vec![[0.1, 0.2, 0.5, 0.6]],
            detection_scores: vec![1.7],
            detection_classes: vec![3],
        };
        let err = raw.decode(&orange_labels(), "fruit.jpg").unwrap_err();
        assert!(matches!(err, DecodeError::Validation { .. }));
    }

    #[test]
    fn test_decode_then_filter_scenarios() {
        let raw = RawDetections::from_json(ORANGE_PAYLOAD).unwrap();
        let set = raw.decode(&orange_labels(), "fruit.jpg").unwrap();

        assert!(set.filter_by_score(0.95).is_empty());
        assert_eq!(set.filter_by_score(0.9), set);
    }
}
