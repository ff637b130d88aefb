use thiserror::Error as ThisError;

/// Failure kinds for match and chat operations. The HTTP layer maps each
/// kind to its own status code; no operation retries internally.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
