//! Test fixtures and helpers.
//!
//! Common setup code for unit and integration tests. RSA key generation is
//! slow, so most tests should use [`vector_keys`] or [`shared_keys`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
use konbini_auth::{CredentialPair, Credentials};
use konbini_core::KeyPair;
use serde::Serialize;

use crate::vectors::PRIVATE_KEY_PEM;

/// Secret the fixture tokens are signed with. Nothing verifies it.
const TOKEN_SECRET: &[u8] = b"konbini-testkit";

static TOKEN_SERIAL: AtomicU64 = AtomicU64::new(0);

/// The fixed golden-vector key pair.
///
/// # Panics
///
/// Panics if the bundled PEM does not import, which means the key code is broken.
pub fn vector_keys() -> KeyPair {
    KeyPair::import_private(PRIVATE_KEY_PEM.as_bytes()).expect("bundled vector key must import")
}

/// A freshly generated key pair, created once per test binary.
pub fn shared_keys() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| KeyPair::generate().expect("key generation"))
}

#[derive(Serialize)]
struct TokenClaims<'a> {
    sub: &'a str,
    exp: u64,
    /// Makes every minted token distinct.
    jti: u64,
}

/// Mint a token expiring at `exp` (seconds since the epoch).
pub fn token_expiring_at(exp: u64) -> String {
    let claims = TokenClaims {
        sub: "testkit-user",
        exp,
        jti: TOKEN_SERIAL.fetch_add(1, Ordering::Relaxed),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TOKEN_SECRET))
        .expect("token encoding")
}

/// A token that expires an hour from now.
pub fn fresh_token() -> String {
    token_expiring_at(get_current_timestamp() + 3600)
}

/// A token that expired a second ago.
pub fn expired_token() -> String {
    token_expiring_at(get_current_timestamp() - 1)
}

/// A pair whose access token has expired but whose refresh token has not.
pub fn stale_pair() -> CredentialPair {
    CredentialPair::new(expired_token(), fresh_token())
}

/// Credentials with both tokens valid.
pub fn fresh_credentials() -> Credentials {
    Credentials::new(fresh_token(), fresh_token()).with_email("dev@example.com")
}
