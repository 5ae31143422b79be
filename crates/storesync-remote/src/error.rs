//! # Remote Error Types
//!
//! Error types for document-store operations.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Remote Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Connectivity   │  │    Documents    │  │     Streams             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Unavailable    │  │  NotFound       │  │  SubscriptionClosed     │ │
//! │  │  (retryable)    │  │  Serialization  │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Raw transport errors never cross this boundary; the engine sees       │
//! │  only these categorized variants.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storesync_core::Collection;
use thiserror::Error;

/// Result type alias for remote-store operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote document-store error.
///
/// ## Design Principles
/// - Each variant includes enough context for debugging
/// - Errors are categorized for different handling strategies
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The store is unreachable (network loss, backend outage).
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    /// A referenced document does not exist.
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: Collection, id: String },

    /// A document could not be serialized for the wire.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The subscription stream was closed by the store.
    #[error("Subscription closed for collection {0}")]
    SubscriptionClosed(Collection),
}

impl RemoteError {
    /// Returns true if re-issuing the same operation may succeed.
    ///
    /// ## Retryable
    /// - Connectivity loss
    ///
    /// ## Non-Retryable
    /// - Missing documents (retry returns the same miss)
    /// - Serialization failures (the payload is the problem)
    pub fn is_retryable(&self) -> bool {
        matches!(self, RemoteError::Unavailable(_))
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(RemoteError::Unavailable("offline".into()).is_retryable());
        assert!(!RemoteError::NotFound {
            collection: Collection::Products,
            id: "p1".into()
        }
        .is_retryable());
        assert!(!RemoteError::Serialization("bad".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = RemoteError::NotFound {
            collection: Collection::Inventory,
            id: "abc-123".into(),
        };
        assert_eq!(err.to_string(), "Document not found: inventory/abc-123");
    }
}
