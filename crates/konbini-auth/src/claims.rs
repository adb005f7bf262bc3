//! Expiry checks on bearer tokens.
//!
//! Tokens are JWTs issued by the remote service. Only the `exp` claim is
//! read here; the signature is the service's business and is not checked.

use std::collections::HashSet;

use jsonwebtoken::{decode, get_current_timestamp, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::{AuthError, Result};

/// `exp` is a NumericDate, which may carry a fractional part.
#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: f64,
}

fn unverified() -> Validation {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::from(["exp".to_string()]);
    validation
}

/// Read the `exp` claim (whole seconds since the epoch) without verifying
/// the signature. Fractional seconds are dropped.
pub fn expiry_of(token: &str) -> Result<u64> {
    let data = decode::<ExpiryClaim>(token, &DecodingKey::from_secret(&[]), &unverified())
        .map_err(|e| AuthError::ClaimDecode(e.to_string()))?;

    let exp = data.claims.exp;
    if !exp.is_finite() || exp < 0.0 {
        return Err(AuthError::ClaimDecode(format!("exp out of range: {exp}")));
    }
    Ok(exp.floor() as u64)
}

/// Whether `token` is expired at `now` (seconds since the epoch).
///
/// A token is expired once `now` is strictly past its `exp`.
pub fn check_expiry_at(token: &str, now: u64) -> Result<bool> {
    Ok(now > expiry_of(token)?)
}

/// Whether `token` is expired right now.
///
/// Fails with [`AuthError::ClaimDecode`] when the token cannot be read;
/// callers must treat that as expired. [`is_expired`] does so.
pub fn check_expiry(token: &str) -> Result<bool> {
    check_expiry_at(token, get_current_timestamp())
}

/// Fail-closed expiry check: an unreadable token counts as expired.
pub fn is_expired_at(token: &str, now: u64) -> bool {
    check_expiry_at(token, now).unwrap_or(true)
}

/// [`is_expired_at`] against the current time.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, get_current_timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{token_expiring_at, token_with_claims};
    use proptest::prelude::*;

    #[test]
    fn test_expired_one_second_ago() {
        let now = get_current_timestamp();
        let token = token_expiring_at(now - 1);
        assert!(check_expiry(&token).unwrap());
        assert!(is_expired(&token));
    }

    #[test]
    fn test_future_expiry_is_valid() {
        let token = token_expiring_at(get_current_timestamp() + 3600);
        assert!(!check_expiry(&token).unwrap());
        assert!(!is_expired(&token));
    }

    #[test]
    fn test_boundary_is_not_expired() {
        let token = token_expiring_at(1_000);
        assert!(!check_expiry_at(&token, 1_000).unwrap());
        assert!(check_expiry_at(&token, 1_001).unwrap());
    }

    #[test]
    fn test_fractional_exp() {
        let token = token_with_claims(&serde_json::json!({ "exp": 1.7e9 }));
        assert_eq!(expiry_of(&token).unwrap(), 1_700_000_000);

        let now = get_current_timestamp();
        let token = token_with_claims(&serde_json::json!({ "exp": now as f64 + 3600.5 }));
        assert!(!check_expiry(&token).unwrap());
        assert!(check_expiry_at(&token, now + 3601).unwrap());
    }

    #[test]
    fn test_missing_exp_fails_closed() {
        let token = token_with_claims(&serde_json::json!({ "sub": "user-1" }));
        assert!(matches!(check_expiry(&token), Err(AuthError::ClaimDecode(_))));
        assert!(is_expired(&token));
    }

    #[test]
    fn test_non_numeric_exp_fails_closed() {
        let token = token_with_claims(&serde_json::json!({ "exp": "tomorrow" }));
        assert!(is_expired(&token));
    }

    #[test]
    fn test_signature_not_checked() {
        let token = token_expiring_at(get_current_timestamp() + 60);
        let (unsigned, _) = token.rsplit_once('.').unwrap();
        let forged = format!("{unsigned}.AAAA");
        assert!(!is_expired(&forged));
    }

    #[test]
    fn test_audience_is_ignored() {
        let exp = get_current_timestamp() + 60;
        let token = token_with_claims(&serde_json::json!({ "exp": exp, "aud": "konbini" }));
        assert_eq!(expiry_of(&token).unwrap(), exp);
    }

    proptest! {
        #[test]
        fn prop_garbage_is_expired(token in ".{0,80}") {
            prop_assert!(is_expired(&token));
        }
    }
}
