use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid Persian date: {0}")]
    InvalidDate(String),
}
