//! Error types for the permissions module.

use thiserror::Error;

use crate::permission::PermissionSet;

/// Errors that can occur during permission operations.
///
/// All of these are fatal to the single grant or revoke request, never to
/// the session.
#[derive(Debug, Error)]
pub enum PermsError {
    /// Nothing (or, for strict callers, not everything) requested could be granted.
    #[error("insufficient permission: requested {requested}, grantor holds {held}")]
    InsufficientPermission {
        requested: PermissionSet,
        held: PermissionSet,
        /// The requested tags the grantor does not hold.
        rejected: PermissionSet,
    },

    /// The acting member lacks the tag the operation itself requires.
    #[error("permission denied: {member} lacks '{required}'")]
    PermissionDenied { member: String, required: String },

    /// The member is not part of the bundle.
    #[error("member not found: {0}")]
    MemberNotFound(String),

    /// The bundle owner's access cannot be changed.
    #[error("cannot change the owner's access: {0}")]
    OwnerImmutable(String),

    /// An unknown permission tag.
    #[error("unknown permission tag: {0}")]
    UnknownTag(String),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
