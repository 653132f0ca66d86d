use serde::{Deserialize, Serialize};

/// Preset identifiers are issued by the preset store.
pub type PresetId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A reference to an uploaded image, as accepted by the generation backend
/// (a data URL or a storage URL). The core never inspects the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
