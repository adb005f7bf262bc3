//! Error types for the credential lifecycle.

use std::fmt;

use thiserror::Error;

/// Why stored credentials can no longer be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReauthReason {
    /// Both the access and the refresh token are past their expiry.
    BothExpired,
    /// The renewal endpoint refused the refresh token.
    RefreshRejected,
}

impl fmt::Display for ReauthReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReauthReason::BothExpired => f.write_str("access and refresh tokens expired"),
            ReauthReason::RefreshRejected => f.write_str("refresh token rejected"),
        }
    }
}

/// Errors that can occur during credential operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is not a decodable JWT or carries no usable `exp` claim.
    #[error("cannot decode token claims: {0}")]
    ClaimDecode(String),

    /// Stored credentials must be discarded and the user must sign in again.
    #[error("re-authentication required: {0}")]
    ReauthenticationRequired(ReauthReason),

    /// Renewal failed for a reason worth retrying later.
    #[error("credential renewal failed: {0}")]
    TransientRefresh(String),

    /// No credentials are stored.
    #[error("not signed in")]
    NotAuthenticated,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored credentials could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AuthError {
    /// The session is over; the caller must drop stored credentials.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::ReauthenticationRequired(_) | AuthError::NotAuthenticated
        )
    }

    /// The same call may succeed if tried again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::TransientRefresh(_))
    }
}

/// Result type for credential operations.
pub type Result<T> = std::result::Result<T, AuthError>;
