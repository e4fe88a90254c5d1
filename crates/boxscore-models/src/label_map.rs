//! Class id to class name mapping.

use std::collections::HashMap;

use thiserror::Error;

/// Errors raised while loading a label map.
#[derive(Debug, Error)]
pub enum LabelMapError {
    #[error("label map is not a JSON object of id -> name: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("label map key {0:?} is not an integer class id")]
    InvalidKey(String),
}

/// Mapping from integer class id to human-readable class name.
///
/// Supplied by the (out-of-scope) model/training component; the codec only
/// reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelMap {
    labels: HashMap<i64, String>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of the form `{"3": "orange", "4": "apple"}`.
    ///
    /// JSON object keys are always strings, so ids arrive string-encoded.
    pub fn from_json_str(json: &str) -> Result<Self, LabelMapError> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let mut labels = HashMap::with_capacity(raw.len());
        for (key, name) in raw {
            let id = key
                .parse::<i64>()
                .map_err(|_| LabelMapError::InvalidKey(key))?;
            labels.insert(id, name);
        }
        Ok(Self { labels })
    }

    pub fn insert(&mut self, class_id: i64, label: impl Into<String>) {
        self.labels.insert(class_id, label.into());
    }

    pub fn get(&self, class_id: i64) -> Option<&str> {
        self.labels.get(&class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl FromIterator<(i64, String)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(i64, &str); N]> for LabelMap {
    fn from(pairs: [(i64, &str); N]) -> Self {
        pairs
            .into_iter()
            .map(|(id, name)| (id, name.to_string()))
            .collect()
    }
}
