//! Access/refresh credential state machine.
//!
//! ```text
//!   Valid ──access expires──▶ AccessExpired ──refresh ok──▶ Valid
//!                                  │
//!                                  ├─refresh rejected──▶ re-authenticate
//!                                  └─refresh token expired──▶ BothExpired
//! ```
//!
//! Renewal I/O is injected by the caller. This module never persists
//! anything; a [`Renewal::Renewed`] result tells the caller to.

use std::fmt;

use jsonwebtoken::get_current_timestamp;
use thiserror::Error;

use crate::claims::is_expired_at;
use crate::error::{AuthError, ReauthReason, Result};

/// Where a credential pair stands at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    Valid,
    /// The access token must be renewed before use.
    AccessExpired,
    /// Nothing left to renew with.
    BothExpired,
}

/// An access token and the refresh token that renews it.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPair {
    access_token: String,
    refresh_token: String,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Classify the pair at `now` (seconds since the epoch). Unreadable
    /// tokens count as expired.
    pub fn state_at(&self, now: u64) -> CredentialState {
        if !is_expired_at(&self.access_token, now) {
            CredentialState::Valid
        } else if !is_expired_at(&self.refresh_token, now) {
            CredentialState::AccessExpired
        } else {
            CredentialState::BothExpired
        }
    }

    pub fn state(&self) -> CredentialState {
        self.state_at(get_current_timestamp())
    }

    fn with_access_token(&self, access_token: String) -> Self {
        Self {
            access_token,
            refresh_token: self.refresh_token.clone(),
        }
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Failure reported by the injected renewal call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The service refused the refresh token.
    #[error("refresh token rejected: {0}")]
    Rejected(String),

    /// Anything else: network trouble, a 5xx, an unreadable response.
    #[error("renewal failed: {0}")]
    Transient(String),
}

/// Result of [`ensure_valid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renewal {
    /// The access token was still good.
    Current(CredentialPair),
    /// A new access token was obtained and must be persisted.
    Renewed(CredentialPair),
}

impl Renewal {
    pub fn needs_persist(&self) -> bool {
        matches!(self, Renewal::Renewed(_))
    }

    pub fn pair(&self) -> &CredentialPair {
        match self {
            Renewal::Current(pair) | Renewal::Renewed(pair) => pair,
        }
    }

    pub fn into_pair(self) -> CredentialPair {
        match self {
            Renewal::Current(pair) | Renewal::Renewed(pair) => pair,
        }
    }
}

/// Make sure the pair carries a usable access token, renewing it through
/// `refresh` if needed.
///
/// `refresh` is called at most once, and only when the access token is
/// expired but the refresh token is not. On a transient failure the input
/// pair is untouched and the caller may retry.
pub fn ensure_valid<F>(pair: &CredentialPair, refresh: F) -> Result<Renewal>
where
    F: FnOnce(&str) -> std::result::Result<String, RefreshError>,
{
    ensure_valid_at(pair, get_current_timestamp(), refresh)
}

/// [`ensure_valid`] at a fixed instant.
pub fn ensure_valid_at<F>(pair: &CredentialPair, now: u64, refresh: F) -> Result<Renewal>
where
    F: FnOnce(&str) -> std::result::Result<String, RefreshError>,
{
    match pair.state_at(now) {
        CredentialState::Valid => Ok(Renewal::Current(pair.clone())),
        CredentialState::BothExpired => Err(AuthError::ReauthenticationRequired(
            ReauthReason::BothExpired,
        )),
        CredentialState::AccessExpired => complete_renewal(pair, refresh(pair.refresh_token())),
    }
}

/// Apply the outcome of a renewal call to `pair`.
///
/// Split out so async callers can await the renewal themselves.
pub fn complete_renewal(
    pair: &CredentialPair,
    outcome: std::result::Result<String, RefreshError>,
) -> Result<Renewal> {
    match outcome {
        Ok(access_token) => Ok(Renewal::Renewed(pair.with_access_token(access_token))),
        Err(RefreshError::Rejected(_)) => Err(AuthError::ReauthenticationRequired(
            ReauthReason::RefreshRejected,
        )),
        Err(RefreshError::Transient(reason)) => Err(AuthError::TransientRefresh(reason)),
    }
}
