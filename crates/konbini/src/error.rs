//! Error types for the Konbini client.

use konbini_auth::AuthError;
use konbini_core::CoreError;
use konbini_perms::PermsError;
use thiserror::Error;

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
pub enum KonbiniError {
    /// Key, cipher, proof, or ingredient error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Permission error.
    #[error("permission error: {0}")]
    Permission(#[from] PermsError),

    /// Credential error.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// One ingredient of a bundle could not be opened.
    #[error("cannot open ingredient '{name}': {source}")]
    Ingredient {
        name: String,
        #[source]
        source: CoreError,
    },

    /// The operation needs a bundle id and none is configured.
    #[error("no bundle id configured")]
    MissingBundleId,

    /// Configuration could not be read or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// The service replied with something unexpected.
    #[error("unexpected response: {0}")]
    Response(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KonbiniError {
    /// The stored session is unusable; the caller must sign in again.
    pub fn is_session_fatal(&self) -> bool {
        match self {
            KonbiniError::Auth(e) => e.requires_reauthentication(),
            _ => false,
        }
    }

    /// The same call may succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            KonbiniError::Auth(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, KonbiniError>;
