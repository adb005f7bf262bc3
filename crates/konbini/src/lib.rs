//! # Konbini
//!
//! Client-side secret protection for Konbini bundles.
//!
//! ## Overview
//!
//! Secrets ("ingredients") are stored by a remote service but sealed on the
//! client under a key that never leaves it. This crate ties the pieces
//! together:
//!
//! - **Keys and sealing**: 2048-bit RSA, values of any length sealed as fixed-size blocks
//! - **Proofs**: a signed random challenge shows the service we hold the key
//! - **Sessions**: access/refresh credentials renewed silently, one renewal at a time
//! - **Permissions**: delegable capability tags on shared bundles
//!
//! ## Usage
//!
//! ```rust,no_run
//! use konbini::{Bento, ChunkedCipher, KeyPair};
//!
//! let keys = KeyPair::generate().unwrap();
//! let bento = Bento::new(keys, ChunkedCipher::default());
//!
//! // POST {service}/bento/prepare with this body
//! let request = bento.prepare("my-app", b"DB_PASSWORD=s3cr3t\n").unwrap();
//! println!("{}", serde_json::to_string(&request).unwrap());
//! ```
//!
//! ## Re-exports
//!
//! - `konbini::core` - keys, chunked cipher, proofs, ingredient files
//! - `konbini::perms` - permission tags, grants, bundle access
//! - `konbini::auth` - credential lifecycle and storage

pub mod api;
pub mod bento;
pub mod config;
pub mod error;
pub mod session;
pub mod transport;

// Re-export component crates
pub use konbini_auth as auth;
pub use konbini_core as core;
pub use konbini_perms as perms;

// Re-export main types for convenience
pub use bento::{load_private_key, write_private_key, Bento};
pub use config::{Environment, ProjectConfig, ServiceConfig};
pub use error::{KonbiniError, Result};
pub use session::Session;
pub use transport::AuthTransport;

// Re-export commonly used component types
pub use konbini_auth::{
    CredentialState, CredentialStore, Credentials, FileCredentialStore, RefreshError,
};
pub use konbini_core::{ChunkedCipher, KeyPair, Padding, Proof, PublicKey, SecretEntry};
pub use konbini_perms::{Permission, PermissionSet};
