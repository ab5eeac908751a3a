use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend reached a provider and the provider failed. Carries the
    /// provider name so the UI can say which one; recorded audio and typed
    /// text are untouched by this failure.
    #[error("{provider} transcription failed: {message}")]
    Provider { provider: String, message: String },

    #[error("malformed audio data uri")]
    BadDataUri,

    #[error(transparent)]
    Decode(#[from] base64::DecodeError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
