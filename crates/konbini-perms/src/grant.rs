//! Granting and revoking permission tags.
//!
//! A grantor can hand out at most what they hold. [`grant`] returns the
//! grantable part of a request together with the part that was refused, so
//! callers decide whether a partial grant is acceptable.

use serde::{Deserialize, Serialize};

use crate::error::{PermsError, Result};
use crate::permission::PermissionSet;

/// Outcome of a grant request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Requested tags the grantor holds.
    pub granted: PermissionSet,
    /// Requested tags the grantor does not hold.
    pub rejected: PermissionSet,
}

impl Grant {
    /// True when everything requested was granted.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Intersect `requested` with what the grantor holds.
///
/// Fails with [`PermsError::InsufficientPermission`] when the request is
/// non-empty and nothing in it can be granted. An empty request grants
/// nothing and succeeds.
pub fn grant(grantor: &PermissionSet, requested: &PermissionSet) -> Result<Grant> {
    let granted = requested.intersection(grantor);
    let rejected = requested.difference(grantor);

    if !requested.is_empty() && granted.is_empty() {
        return Err(PermsError::InsufficientPermission {
            requested: requested.clone(),
            held: grantor.clone(),
            rejected,
        });
    }

    Ok(Grant { granted, rejected })
}

/// Like [`grant`], but any non-grantable tag fails the whole request.
pub fn grant_exact(grantor: &PermissionSet, requested: &PermissionSet) -> Result<PermissionSet> {
    let outcome = grant(grantor, requested)?;
    if !outcome.is_complete() {
        return Err(PermsError::InsufficientPermission {
            requested: requested.clone(),
            held: grantor.clone(),
            rejected: outcome.rejected,
        });
    }
    Ok(outcome.granted)
}

/// Remove `to_revoke` from `current`. Revoking a tag that is not held is a no-op.
pub fn revoke(current: &PermissionSet, to_revoke: &PermissionSet) -> PermissionSet {
    current.difference(to_revoke)
}

/// Request body for sharing a bundle with a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub bento_id: String,
    /// Email of the collaborator.
    pub email: String,
    pub permissions: PermissionSet,
}

impl SharePayload {
    pub fn new(
        bento_id: impl Into<String>,
        email: impl Into<String>,
        permissions: PermissionSet,
    ) -> Self {
        Self {
            bento_id: bento_id.into(),
            email: email.into(),
            permissions,
        }
    }
}

/// Request body for taking tags back from a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeSharePayload {
    pub bento_id: String,
    pub email: String,
    /// Tags to remove. `all` removes the collaborator entirely.
    pub permissions: PermissionSet,
}

impl RevokeSharePayload {
    pub fn new(
        bento_id: impl Into<String>,
        email: impl Into<String>,
        permissions: PermissionSet,
    ) -> Self {
        Self {
            bento_id: bento_id.into(),
            email: email.into(),
            permissions,
        }
    }
}
