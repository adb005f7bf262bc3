//! Error types for Konbini Core.

use thiserror::Error;

/// Errors that can occur during key, cipher, proof, or ingredient operations.
///
/// Every variant is fatal to the call that produced it. None of them are
/// retried internally.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("unexpected key envelope: expected '{expected}', found '{found}'")]
    KeyFormat { expected: &'static str, found: String },

    #[error("key parse error: {0}")]
    KeyParse(String),

    #[error("key encoding error: {0}")]
    KeyEncoding(String),

    #[error("malformed ciphertext: {len} bytes is not a positive multiple of {block_size}")]
    MalformedCiphertext { len: usize, block_size: usize },

    #[error("ciphertext is not valid hex: {0}")]
    InvalidHex(String),

    #[error("encryption failed on block {block}: {reason}")]
    Encryption { block: usize, reason: String },

    #[error("decryption failed on block {block}")]
    Decryption { block: usize },

    #[error("entropy source unavailable: {0}")]
    Entropy(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed entry on line {line}: {reason}")]
    MalformedEntry { line: usize, reason: &'static str },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
