//! Error types for the store layer.

/// Errors that can occur while persisting the session record.
///
/// Load failures never surface as errors (a missing or corrupt record
/// is "no session"), so every variant here is a write-side failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying storage operation failed (create, write, delete).
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The session record could not be serialized.
    #[error("session record could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}
