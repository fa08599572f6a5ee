#[derive(Debug, thiserror::Error)]
pub enum BinderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A card-search or vision collaborator was unreachable or returned an
    /// error status. Surfaced to the user as a status message, never fatal.
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// A persistence backend could not be read or written. Callers log and
    /// continue; in-memory state remains the source of truth.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, BinderError>;
