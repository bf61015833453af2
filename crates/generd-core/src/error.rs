use thiserror::Error;

/// Core error type shared across generd crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing input supplied by the user.
    #[error("invalid input: {0}")]
    UserInput(String),
    /// Connection or catalog query failure reported by the driver.
    #[error("database error: {0}")]
    Db(String),
    /// Synthesized metadata violates internal invariants.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),
    /// A requested engine or feature is not available in this build.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Catch-all error for unexpected failures.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification used to pick an exit code and a reporting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UserInput,
    Database,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UserInput(_) => ErrorKind::UserInput,
            Error::Db(_) => ErrorKind::Database,
            Error::InvalidMetadata(_) | Error::Unsupported(_) | Error::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// Convenience alias for results returned by generd crates.
pub type Result<T> = std::result::Result<T, Error>;
