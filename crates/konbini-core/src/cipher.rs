//! Chunked RSA sealing.
//!
//! One RSA operation can only carry `key_size - overhead` plaintext bytes.
//! Longer values are split into consecutive chunks, each sealed on its own,
//! and the output blocks are concatenated in order. A sealed value is
//! therefore always a whole number of `key_size` blocks, and the empty
//! plaintext still produces exactly one block.

use std::fmt;

use rand::rngs::ThreadRng;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{CoreError, Result};
use crate::keys::{KeyPair, PublicKey};

const SHA256_LEN: usize = 32;

/// RSA encryption padding.
///
/// Sender and receiver must agree on this out of band: the two schemes are
/// not mutually decryptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    /// PKCS#1 v1.5, 11 bytes of overhead per block.
    Pkcs1v15,
    /// OAEP with SHA-256 and MGF1-SHA-256, empty label.
    OaepSha256,
}

impl Padding {
    /// Bytes of each block consumed by the padding.
    pub const fn overhead(self) -> usize {
        match self {
            Padding::Pkcs1v15 => 11,
            Padding::OaepSha256 => 2 * SHA256_LEN + 2,
        }
    }
}

/// The padding every Konbini deployment seals with.
pub const DEPLOYMENT_PADDING: Padding = Padding::Pkcs1v15;

/// Seals and opens values of any length under a fixed padding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkedCipher {
    padding: Padding,
}

impl ChunkedCipher {
    /// Create a cipher bound to one padding scheme.
    pub const fn new(padding: Padding) -> Self {
        Self { padding }
    }

    /// The padding this cipher uses.
    pub const fn padding(&self) -> Padding {
        self.padding
    }

    /// Maximum plaintext bytes carried by one block under `key`.
    pub fn capacity(&self, key: &PublicKey) -> usize {
        key.size_bytes().saturating_sub(self.padding.overhead())
    }

    /// Exact length of `seal(key, p)` for a plaintext of `plaintext_len` bytes.
    pub fn sealed_len(&self, key: &PublicKey, plaintext_len: usize) -> usize {
        let step = self.capacity(key).max(1);
        plaintext_len.max(1).div_ceil(step) * key.size_bytes()
    }

    /// Seal `plaintext` under `key`.
    pub fn seal(&self, key: &PublicKey, plaintext: &[u8]) -> Result<SealedValue> {
        let step = self.capacity(key);
        if step == 0 {
            return Err(CoreError::Encryption {
                block: 0,
                reason: format!("{}-byte key leaves no room for {:?}", key.size_bytes(), self.padding),
            });
        }

        let mut rng = rand::thread_rng();
        let mut bytes = Vec::with_capacity(self.sealed_len(key, plaintext.len()));

        if plaintext.is_empty() {
            bytes.extend(self.encrypt_block(key, &[], &mut rng, 0)?);
        }
        for (block, chunk) in plaintext.chunks(step).enumerate() {
            bytes.extend(self.encrypt_block(key, chunk, &mut rng, block)?);
        }

        Ok(SealedValue {
            bytes,
            block_size: key.size_bytes(),
        })
    }

    /// Open a sealed value with the matching private key.
    ///
    /// Fails without returning any plaintext if a single block is rejected.
    pub fn open(&self, keys: &KeyPair, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let block_size = keys.public_key().size_bytes();
        if ciphertext.is_empty() || ciphertext.len() % block_size != 0 {
            return Err(CoreError::MalformedCiphertext {
                len: ciphertext.len(),
                block_size,
            });
        }

        let mut plaintext = Zeroizing::new(Vec::with_capacity(ciphertext.len()));
        for (block, chunk) in ciphertext.chunks(block_size).enumerate() {
            let opened = Zeroizing::new(
                self.decrypt_block(keys.private_key(), chunk)
                    .map_err(|_| CoreError::Decryption { block })?,
            );
            plaintext.extend_from_slice(&opened);
        }
        Ok(plaintext)
    }

    /// Open a hex-encoded sealed value.
    pub fn open_hex(&self, keys: &KeyPair, ciphertext: &str) -> Result<Zeroizing<Vec<u8>>> {
        let sealed = SealedValue::from_hex(ciphertext, keys.public_key().size_bytes())?;
        self.open(keys, sealed.as_bytes())
    }

    fn encrypt_block(
        &self,
        key: &PublicKey,
        chunk: &[u8],
        rng: &mut ThreadRng,
        block: usize,
    ) -> Result<Vec<u8>> {
        let sealed = match self.padding {
            Padding::Pkcs1v15 => key.as_rsa().encrypt(rng, Pkcs1v15Encrypt, chunk),
            Padding::OaepSha256 => key.as_rsa().encrypt(rng, Oaep::new::<Sha256>(), chunk),
        };
        sealed.map_err(|e| CoreError::Encryption {
            block,
            reason: e.to_string(),
        })
    }

    fn decrypt_block(&self, key: &RsaPrivateKey, block: &[u8]) -> rsa::Result<Vec<u8>> {
        match self.padding {
            Padding::Pkcs1v15 => key.decrypt(Pkcs1v15Encrypt, block),
            Padding::OaepSha256 => key.decrypt(Oaep::new::<Sha256>(), block),
        }
    }
}

impl Default for ChunkedCipher {
    fn default() -> Self {
        Self::new(DEPLOYMENT_PADDING)
    }
}

/// An ordered concatenation of fixed-size sealed blocks.
#[derive(Clone, PartialEq, Eq)]
pub struct SealedValue {
    bytes: Vec<u8>,
    block_size: usize,
}

impl SealedValue {
    /// Wrap raw ciphertext, checking it is a positive multiple of `block_size`.
    pub fn from_bytes(bytes: Vec<u8>, block_size: usize) -> Result<Self> {
        if block_size == 0 || bytes.is_empty() || bytes.len() % block_size != 0 {
            return Err(CoreError::MalformedCiphertext {
                len: bytes.len(),
                block_size,
            });
        }
        Ok(Self { bytes, block_size })
    }

    /// Parse hex-encoded ciphertext.
    pub fn from_hex(s: &str, block_size: usize) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidHex(e.to_string()))?;
        Self::from_bytes(bytes, block_size)
    }

    /// Lowercase hex, the transport encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn block_count(&self) -> usize {
        self.bytes.len() / self.block_size
    }
}

impl fmt::Debug for SealedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SealedValue({} x {} bytes)", self.block_count(), self.block_size)
    }
}

impl AsRef<[u8]> for SealedValue {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
