//! # Konbini Testkit
//!
//! Testing utilities for Konbini.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: a fixed key, signature, and OpenSSL-sealed values for interop checks
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: keys and bearer tokens for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use konbini_core::ChunkedCipher;
//! use konbini_testkit::{fixtures::vector_keys, vectors::sealed_vectors};
//!
//! let keys = vector_keys();
//! for vector in sealed_vectors() {
//!     let opened = ChunkedCipher::new(vector.padding)
//!         .open_hex(&keys, vector.sealed_hex)
//!         .unwrap();
//!     assert_eq!(opened.as_slice(), vector.plaintext.as_slice());
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use konbini_testkit::generators::entries;
//!
//! proptest! {
//!     #[test]
//!     fn render_parse_roundtrip(entries in entries(8)) {
//!         let text = konbini_core::render(&entries);
//!         prop_assert_eq!(konbini_core::parse(&text).unwrap(), entries);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{expired_token, fresh_token, shared_keys, vector_keys};
