//! Error types for the I/O edges of the engine.
//!
//! In-game failures (bumping a wall, swinging at air, unknown commands) are not
//! errors; they come back as narrative. Only reading, writing, and decoding
//! state or configuration can fail.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or save one session's state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state for session {session_id}: {source}")]
    Read {
        session_id: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write state for session {session_id}: {source}")]
    Write {
        session_id: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode state for session {session_id}: {source}")]
    Decode {
        session_id: String,
        #[source]
        source: DecodeError,
    },

    #[error("failed to encode state for session {session_id}: {source}")]
    Encode {
        session_id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StateError {
    pub fn session_id(&self) -> &str {
        match self {
            StateError::Read { session_id, .. }
            | StateError::Write { session_id, .. }
            | StateError::Decode { session_id, .. }
            | StateError::Encode { session_id, .. } => session_id,
        }
    }
}

/// A persisted state blob that could not be turned into a `WorldState`.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Migration(#[from] MigrationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    #[error("state is not a JSON object")]
    NotAnObject,

    #[error("state version {found} is newer than the supported version {supported}")]
    FutureVersion { found: u64, supported: u64 },

    #[error("field `{0}` has an unexpected shape")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
