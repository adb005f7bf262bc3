//! # Konbini Auth
//!
//! Access/refresh credential lifecycle and local credential storage.
//!
//! Access tokens are short-lived JWTs. When one expires, the refresh token
//! buys a new one; when that is gone too, the user has to sign in again.
//! This crate decides which of those applies and leaves the network call
//! to the caller:
//!
//! ```rust,no_run
//! use konbini_auth::{ensure_valid, CredentialPair, RefreshError};
//!
//! let pair = CredentialPair::new("<access jwt>", "<refresh jwt>");
//! let _renewal = ensure_valid(&pair, |_refresh_token| {
//!     // PATCH /auth/refresh with the refresh token as bearer
//!     Err(RefreshError::Transient("offline".into()))
//! });
//! ```
//!
//! Claim decoding and the state machine never log. The file store emits
//! `tracing` debug events with the file path only.

pub mod claims;
pub mod error;
pub mod lifecycle;
pub mod store;

pub use claims::{check_expiry, check_expiry_at, expiry_of, is_expired, is_expired_at};
pub use error::{AuthError, ReauthReason, Result};
pub use lifecycle::{
    complete_renewal, ensure_valid, ensure_valid_at, CredentialPair, CredentialState,
    RefreshError, Renewal,
};
pub use store::{
    CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore, CREDENTIALS_FILE,
};
