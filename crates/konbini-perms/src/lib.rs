//! # Konbini Permissions
//!
//! Delegable capability tags for shared bundles.
//!
//! ## Overview
//!
//! Access to a bundle is a [`PermissionSet`] drawn from a fixed universe of
//! tags. The `all` tag stands for every other tag at once. A member can
//! grant only what they hold themselves, and revoking something that is not
//! held does nothing.
//!
//! ## Key Concepts
//!
//! - **Grant**: intersect a request with the grantor's set and report the rest
//! - **Revoke**: set difference, never an error
//! - **BundleAccess**: the owner plus each collaborator's current set
//!
//! ## Usage
//!
//! ```rust
//! use konbini_perms::{grant, Permission, PermissionSet};
//!
//! let held = PermissionSet::from([Permission::Write, Permission::Share]);
//! let requested = PermissionSet::from([Permission::Write, Permission::Delete]);
//!
//! let outcome = grant(&held, &requested).unwrap();
//! assert_eq!(outcome.granted, PermissionSet::from([Permission::Write]));
//! assert!(outcome.rejected.contains(Permission::Delete));
//! ```

pub mod error;
pub mod grant;
pub mod permission;
pub mod state;

pub use error::{PermsError, Result};
pub use grant::{grant, grant_exact, revoke, Grant, RevokeSharePayload, SharePayload};
pub use permission::{Permission, PermissionSet};
pub use state::BundleAccess;
