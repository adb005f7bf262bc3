//! Golden test vectors produced outside this codebase with OpenSSL.
//!
//! A fixed 2048-bit key, a signature over a fixed challenge, and values
//! sealed by OpenSSL that our cipher must open byte for byte. Any change
//! to padding, digest, or envelope handling breaks these.

use konbini_core::{Padding, CHALLENGE_LEN};

/// The vector key as PKCS#8 `PRIVATE KEY` PEM.
pub const PRIVATE_KEY_PEM: &str = include_str!("../data/private_pkcs8.pem");

/// The same key as PKCS#1 `RSA PRIVATE KEY` PEM. Import must refuse it.
pub const PKCS1_PRIVATE_KEY_PEM: &str = include_str!("../data/private_pkcs1.pem");

/// The vector public key as SPKI `PUBLIC KEY` PEM.
pub const PUBLIC_KEY_PEM: &str = include_str!("../data/public_spki.pem");

/// SHA-256 of the public key's SPKI DER, hex.
pub const PUBLIC_KEY_FINGERPRINT: &str =
    "2da5fde9595aaf77d500d9be70b6c4cec154589254e9d2f171aadbca5f364a05";

const CHALLENGE_SIGNATURE_HEX: &str = include_str!("../data/challenge_signature.hex");

/// The fixed challenge: bytes `0, 1, ..., 31`.
pub fn challenge() -> [u8; CHALLENGE_LEN] {
    let mut bytes = [0u8; CHALLENGE_LEN];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = i as u8;
    }
    bytes
}

/// Expected PKCS#1 v1.5 / SHA-256 signature over [`challenge`], hex.
pub fn challenge_signature() -> &'static str {
    CHALLENGE_SIGNATURE_HEX.trim()
}

/// A value sealed by OpenSSL under the vector key.
#[derive(Debug, Clone)]
pub struct SealedVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub padding: Padding,
    /// Expected plaintext.
    pub plaintext: Vec<u8>,
    /// Sealed value, hex.
    pub sealed_hex: &'static str,
}

impl SealedVector {
    /// Number of 256-byte blocks in the sealed value.
    pub fn blocks(&self) -> usize {
        self.sealed_hex.len() / 512
    }
}

/// The 300-byte plaintext of the two-block vector.
pub fn two_block_plaintext() -> Vec<u8> {
    (0..300u32).map(|i| ((i * 7 + 3) % 256) as u8).collect()
}

/// Get all sealed vectors.
pub fn sealed_vectors() -> Vec<SealedVector> {
    vec![
        SealedVector {
            name: "single block, PKCS#1 v1.5",
            padding: Padding::Pkcs1v15,
            plaintext: b"DB_PASSWORD=s3cr3t".to_vec(),
            sealed_hex: include_str!("../data/sealed_pkcs1_single.hex").trim(),
        },
        SealedVector {
            name: "empty plaintext, PKCS#1 v1.5",
            padding: Padding::Pkcs1v15,
            plaintext: Vec::new(),
            sealed_hex: include_str!("../data/sealed_pkcs1_empty.hex").trim(),
        },
        SealedVector {
            // 245 + 55 bytes
            name: "two blocks, PKCS#1 v1.5",
            padding: Padding::Pkcs1v15,
            plaintext: two_block_plaintext(),
            sealed_hex: include_str!("../data/sealed_pkcs1_two_blocks.hex").trim(),
        },
        SealedVector {
            name: "single block, OAEP SHA-256",
            padding: Padding::OaepSha256,
            plaintext: b"s3cr3t".to_vec(),
            sealed_hex: include_str!("../data/sealed_oaep_sha256.hex").trim(),
        },
    ]
}
