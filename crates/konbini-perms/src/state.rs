//! Collaborator access to a single bundle.
//!
//! The owner implicitly holds every tag and cannot be edited. Other members
//! hold whatever was granted to them, and only what their grantor held at
//! the time.

use std::collections::BTreeMap;

use crate::error::{PermsError, Result};
use crate::grant::{grant, revoke, Grant};
use crate::permission::{Permission, PermissionSet};

/// Access table for one bundle, keyed by member email.
#[derive(Debug, Clone)]
pub struct BundleAccess {
    owner: String,
    members: BTreeMap<String, PermissionSet>,
}

impl BundleAccess {
    /// Create a table with only the owner.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            members: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// What `member` currently holds. Unknown members hold nothing.
    pub fn permissions_of(&self, member: &str) -> PermissionSet {
        if member == self.owner {
            return PermissionSet::all();
        }
        self.members.get(member).cloned().unwrap_or_default()
    }

    /// Check a single tag.
    pub fn can(&self, member: &str, permission: Permission) -> bool {
        self.permissions_of(member).contains(permission)
    }

    /// Share tags with `member` on behalf of `grantor`.
    ///
    /// The grantor needs `share`. Granted tags are added to whatever the
    /// member already holds; the returned [`Grant`] carries the refused part.
    pub fn share(
        &mut self,
        grantor: &str,
        member: &str,
        requested: &PermissionSet,
    ) -> Result<Grant> {
        if member == self.owner {
            return Err(PermsError::OwnerImmutable(member.to_string()));
        }

        let held = self.permissions_of(grantor);
        if !held.contains(Permission::Share) {
            return Err(PermsError::PermissionDenied {
                member: grantor.to_string(),
                required: Permission::Share.to_string(),
            });
        }

        let outcome = grant(&held, requested)?;
        if !outcome.granted.is_empty() {
            self.members
                .entry(member.to_string())
                .or_default()
                .extend(outcome.granted.iter());
        }

        Ok(outcome)
    }

    /// Take tags back from `member` on behalf of `revoker`.
    ///
    /// The revoker needs `revoke_share`. A member left with nothing is removed.
    /// Returns what the member still holds.
    pub fn revoke_share(
        &mut self,
        revoker: &str,
        member: &str,
        to_revoke: &PermissionSet,
    ) -> Result<PermissionSet> {
        if member == self.owner {
            return Err(PermsError::OwnerImmutable(member.to_string()));
        }
        if !self.can(revoker, Permission::RevokeShare) {
            return Err(PermsError::PermissionDenied {
                member: revoker.to_string(),
                required: Permission::RevokeShare.to_string(),
            });
        }

        let current = self
            .members
            .get(member)
            .ok_or_else(|| PermsError::MemberNotFound(member.to_string()))?;

        let remaining = revoke(current, to_revoke);
        if remaining.is_empty() {
            self.members.remove(member);
        } else {
            self.members.insert(member.to_string(), remaining.clone());
        }

        Ok(remaining)
    }

    /// Members other than the owner, in email order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &PermissionSet)> {
        self.members.iter().map(|(email, set)| (email.as_str(), set))
    }
}
