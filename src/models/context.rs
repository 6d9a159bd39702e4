use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::iteration::IterationStatus;

/// Where the store lives and which iteration is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub project_root: String,
    pub plan_directory: String,
    pub active_iteration: Option<String>,
}

/// Contents of `active_iteration.json`.
///
/// Serialized as `{"version": "1.0.0"}` when an iteration is active and `{}`
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePointer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ActivePointer {
    pub fn to(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
        }
    }

    pub fn is(&self, version: &str) -> bool {
        self.version.as_deref() == Some(version)
    }
}

/// One row of `iterations_index.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub status: IterationStatus,
    pub updated_at: DateTime<Utc>,
}
