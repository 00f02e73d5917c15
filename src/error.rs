//! Error types for daylist.

/// Errors raised by the task store and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Title was empty or whitespace-only.
    #[error("task title must not be empty")]
    Validation,

    /// Reading or writing the key-value file failed.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The device notification scheduler rejected a request.
    #[error("notification scheduling error: {0}")]
    NotificationScheduling(String),

    /// A reorder index fell outside the current view.
    #[error("index {index} out of range for {len} tasks")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, StoreError>;
