use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend rejected the request ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("permission denied")]
    PermissionDenied,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("no platform data directory available")]
    NoDataDir,

    #[error("feedback record not found: {0}")]
    NotFound(String),
}
