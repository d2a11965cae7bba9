use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum PantryError {
    /// The item or user does not exist, or is not owned by the caller.
    #[error("Not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Failure reported by the backing store.
    #[error("Store error: {0}")]
    Store(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Session is missing or expired")]
    SessionExpired,

    #[error("Malformed password hash")]
    MalformedHash,
}

pub type Result<T> = std::result::Result<T, PantryError>;
