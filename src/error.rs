//! Errors raised by the iteration store.

use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds surfaced to store callers.
///
/// Structural problems (bad version, unknown id, missing active iteration,
/// duplicate version) are kept apart from file-system and document failures so
/// callers can tell "you asked for something invalid" from "the disk broke".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid version '{version}': {reason}. Use a semantic version such as 1.0.0")]
    Validation { version: String, reason: String },

    #[error("version {0} already exists, choose a different version")]
    Conflict(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("no active iteration, start a new iteration first")]
    NoActiveIteration,

    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error is caused by the request rather than the environment.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Io { .. } | Self::Json { .. })
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
