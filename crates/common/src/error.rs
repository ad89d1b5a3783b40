//! Application-wide error types shared across crates.

use thiserror::Error;

/// Convenient result alias for fallible operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type covering all failure modes surfaced by the
/// relationship engine.
///
/// Expected relationship outcomes (already following, request already
/// pending, blocked) are not errors. They are modelled as enum variants
/// on the operation results so callers never have to string-match.
#[derive(Debug, Error)]
pub enum AppError {
    /// The caller supplied input that failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller is not allowed to act on the referenced entity.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A uniqueness guarantee rejected the write.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// The backing store failed in a way the caller cannot fix.
    #[error("store failure during {operation}: {message}")]
    Store {
        /// The operation that was being performed.
        operation: &'static str,
        /// Driver-level description of the failure.
        message: String,
    },

    /// Configuration loading or validation failed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Builds a [`AppError::Store`] from any displayable driver error.
    pub fn store(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Store {
            operation,
            message: err.to_string(),
        }
    }

    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Duplicate(_) => "DUPLICATE",
            Self::Store { .. } => "STORE_FAILURE",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether this error indicates a fault in the service rather than
    /// in the request.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Store { .. } | Self::Config(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
