//! # Engine Error Types
//!
//! Error types for the orchestration tier.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Engine Error Flow                                 │
//! │                                                                         │
//! │  storesync-core ──► CoreError ────┐                                     │
//! │                                   ├──► EngineError ──► caller           │
//! │  storesync-remote ─► RemoteError ─┘                                     │
//! │                                                                         │
//! │  Retryability is inherited from the remote tier: an engine error is    │
//! │  retryable exactly when its remote cause is.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storesync_core::error::{CoreError, ValidationError};
use storesync_remote::RemoteError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Top-level error for subscription, workflow, and reporting operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Business-rule violation from the pure tier.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Field-level validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote document-store failure.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Configuration file could not be read or written.
    #[error("Config I/O failed: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Config parse failed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("Config serialize failed: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Invalid configuration value.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// An operation was issued against a workflow in the wrong state.
    #[error("Invalid workflow state: {0}")]
    InvalidState(String),
}

impl EngineError {
    /// Returns true if re-issuing the same operation may succeed.
    ///
    /// Only remote connectivity failures are retryable; validation and
    /// state errors need different input, not a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::Remote(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Remote(RemoteError::Serialization(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability_follows_remote_cause() {
        let offline: EngineError = RemoteError::Unavailable("down".into()).into();
        assert!(offline.is_retryable());

        let bad_state = EngineError::InvalidState("no decoded barcode".into());
        assert!(!bad_state.is_retryable());

        let validation: EngineError = ValidationError::Required {
            field: "customer name".into(),
        }
        .into();
        assert!(!validation.is_retryable());
    }
}
