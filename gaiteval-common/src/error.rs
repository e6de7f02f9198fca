//! Common error types for the gait evaluation service

use thiserror::Error;

/// Common result type for gaiteval operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the gaiteval crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A collaborator's tabular payload could not be parsed
    #[error("Malformed result set: {0}")]
    MalformedResultSet(String),

    /// An external collaborator (session API, result-set storage)
    /// failed or returned an unusable response
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
