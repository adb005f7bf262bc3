//! Challenge-response proofs of private-key possession.
//!
//! A proof is a random 32-byte challenge plus an RSASSA-PKCS1-v1_5
//! signature over its SHA-256 digest, both hex encoded. The verifier owns
//! freshness and replay protection; a proof here only shows the key was
//! held at the instant of signing.

use std::fmt;

use rand::RngCore;
use rsa::Pkcs1v15Sign;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CoreError, Result};
use crate::keys::{KeyPair, PublicKey};

/// Length of a challenge in bytes.
pub const CHALLENGE_LEN: usize = 32;

/// A random nonce to be signed once.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Challenge([u8; CHALLENGE_LEN]);

impl Challenge {
    /// Draw a fresh challenge from the OS entropy source.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; CHALLENGE_LEN];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CoreError::Entropy(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; CHALLENGE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; CHALLENGE_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidHex(e.to_string()))?;
        let arr: [u8; CHALLENGE_LEN] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidHex(format!("challenge must be {CHALLENGE_LEN} bytes")))?;
        Ok(Self(arr))
    }

    /// SHA-256 of the challenge bytes. This is what gets signed.
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(self.0).into()
    }
}

impl fmt::Debug for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Challenge({}...)", &self.to_hex()[..16])
    }
}

/// A signed challenge, ready to attach to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Hex-encoded challenge bytes.
    pub challenge: String,
    /// Hex-encoded signature over SHA-256(challenge).
    pub signature: String,
}

impl Proof {
    /// Check the proof against a public key.
    ///
    /// The remote verifier does this for real; it lives here so callers and
    /// tests can confirm a proof before sending it.
    pub fn verify(&self, key: &PublicKey) -> Result<()> {
        let challenge = Challenge::from_hex(&self.challenge)?;
        let signature = hex::decode(&self.signature).map_err(|_| CoreError::InvalidSignature)?;
        key.as_rsa()
            .verify(Pkcs1v15Sign::new::<Sha256>(), &challenge.digest(), &signature)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

/// Draw a fresh challenge.
pub fn create_challenge() -> Result<Challenge> {
    Challenge::generate()
}

/// Sign `challenge` with the private key in `keys`.
pub fn sign(keys: &KeyPair, challenge: &Challenge) -> Result<Proof> {
    let signature = keys
        .private_key()
        .sign(Pkcs1v15Sign::new::<Sha256>(), &challenge.digest())
        .map_err(|e| CoreError::Signing(e.to_string()))?;

    Ok(Proof {
        challenge: challenge.to_hex(),
        signature: hex::encode(signature),
    })
}

/// Create a fresh challenge and sign it.
pub fn prove(keys: &KeyPair) -> Result<Proof> {
    sign(keys, &create_challenge()?)
}
