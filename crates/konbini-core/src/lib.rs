//! # Konbini Core
//!
//! Pure primitives for Konbini: RSA key pairs, chunked sealing of secret
//! values, challenge proofs, and the ingredient file format.
//!
//! This crate contains no file I/O, no networking, and no logging. Callers
//! own key files and transport; everything here works on values passed in.
//!
//! ## Key Types
//!
//! - [`KeyPair`] / [`PublicKey`] - 2048-bit RSA keys with PKCS#8/SPKI PEM envelopes
//! - [`ChunkedCipher`] - seals values of any length as fixed-size RSA blocks
//! - [`Proof`] - a hex-encoded challenge and its signature
//! - [`SecretEntry`] - one `NAME=value` ingredient
//!
//! ## Usage
//!
//! ```rust,no_run
//! use konbini_core::{ingredient, prove, ChunkedCipher, KeyPair};
//!
//! let keys = KeyPair::generate().unwrap();
//! let cipher = ChunkedCipher::default();
//!
//! for entry in ingredient::parse(b"DB_PASSWORD=s3cr3t\n").unwrap() {
//!     let sealed = cipher.seal(keys.public_key(), entry.value()).unwrap();
//!     println!("{}={}", entry.name(), sealed.to_hex());
//! }
//!
//! let proof = prove(&keys).unwrap();
//! proof.verify(keys.public_key()).unwrap();
//! ```

pub mod challenge;
pub mod cipher;
pub mod error;
pub mod ingredient;
pub mod keys;

pub use challenge::{create_challenge, prove, sign, Challenge, Proof, CHALLENGE_LEN};
pub use cipher::{ChunkedCipher, Padding, SealedValue, DEPLOYMENT_PADDING};
pub use error::{CoreError, Result};
pub use ingredient::{parse, render, SecretEntry};
pub use keys::{KeyPair, PublicKey, DEFAULT_KEY_BITS, PRIVATE_KEY_LABEL, PUBLIC_KEY_LABEL};
