//! Permission tags and sets of them.
//!
//! The universe is fixed: eight concrete capability tags plus `all`.
//! A [`PermissionSet`] stores only concrete tags; inserting `all` inserts
//! every one of them, so "holds all" and "holds every tag" are the same
//! state and need no special casing in comparisons.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PermsError;

/// A delegable capability on a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Write,
    Delete,
    Share,
    RenameBundle,
    RenameEntry,
    WriteEntry,
    DeleteEntry,
    RevokeShare,
    /// Shorthand for every other tag.
    All,
}

impl Permission {
    /// Every tag except [`Permission::All`].
    pub const CONCRETE: [Permission; 8] = [
        Permission::Write,
        Permission::Delete,
        Permission::Share,
        Permission::RenameBundle,
        Permission::RenameEntry,
        Permission::WriteEntry,
        Permission::DeleteEntry,
        Permission::RevokeShare,
    ];

    /// The wire tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Permission::Write => "write",
            Permission::Delete => "delete",
            Permission::Share => "share",
            Permission::RenameBundle => "rename_bundle",
            Permission::RenameEntry => "rename_entry",
            Permission::WriteEntry => "write_entry",
            Permission::DeleteEntry => "delete_entry",
            Permission::RevokeShare => "revoke_share",
            Permission::All => "all",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = PermsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::CONCRETE
            .into_iter()
            .chain([Permission::All])
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PermsError::UnknownTag(s.to_string()))
    }
}

/// A set of permission tags.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Permission>", into = "Vec<Permission>")]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every tag.
    pub fn all() -> Self {
        Self(Permission::CONCRETE.into_iter().collect())
    }

    /// Add a tag. Adding `All` adds every concrete tag.
    pub fn insert(&mut self, permission: Permission) {
        match permission {
            Permission::All => self.0.extend(Permission::CONCRETE),
            p => {
                self.0.insert(p);
            }
        }
    }

    /// Remove a tag. Removing `All` empties the set.
    pub fn remove(&mut self, permission: Permission) {
        match permission {
            Permission::All => self.0.clear(),
            p => {
                self.0.remove(&p);
            }
        }
    }

    /// Whether the tag is held. `All` is held only when every tag is.
    pub fn contains(&self, permission: Permission) -> bool {
        match permission {
            Permission::All => self.is_all(),
            p => self.0.contains(&p),
        }
    }

    pub fn is_all(&self) -> bool {
        self.0.len() == Permission::CONCRETE.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of concrete tags held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate the concrete tags in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    pub fn intersection(&self, other: &PermissionSet) -> PermissionSet {
        Self(self.0.intersection(&other.0).copied().collect())
    }

    /// Tags in `self` that are not in `other`.
    pub fn difference(&self, other: &PermissionSet) -> PermissionSet {
        Self(self.0.difference(&other.0).copied().collect())
    }

    pub fn is_subset(&self, other: &PermissionSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn is_disjoint(&self, other: &PermissionSet) -> bool {
        self.0.is_disjoint(&other.0)
    }

    /// The compact tag list: `[all]` for a full set, the concrete tags otherwise.
    pub fn tags(&self) -> Vec<Permission> {
        if self.is_all() {
            vec![Permission::All]
        } else {
            self.iter().collect()
        }
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Permission> for PermissionSet {
    fn extend<I: IntoIterator<Item = Permission>>(&mut self, iter: I) {
        for permission in iter {
            self.insert(permission);
        }
    }
}

impl<const N: usize> From<[Permission; N]> for PermissionSet {
    fn from(tags: [Permission; N]) -> Self {
        tags.into_iter().collect()
    }
}

impl From<Vec<Permission>> for PermissionSet {
    fn from(tags: Vec<Permission>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<PermissionSet> for Vec<Permission> {
    fn from(set: PermissionSet) -> Self {
        set.tags()
    }
}

impl FromStr for PermissionSet {
    type Err = PermsError;

    /// Parse a comma separated tag list such as `write,share`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(Permission::from_str)
            .collect()
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.tags().into_iter().map(Permission::as_str).collect();
        write!(f, "{{{}}}", tags.join(", "))
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PermissionSet({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Permission::*;

    #[test]
    fn test_tag_roundtrip() {
        for p in Permission::CONCRETE.into_iter().chain([All]) {
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
        }
        assert!("admin".parse::<Permission>().is_err());
    }

    #[test]
    fn test_all_expands_and_collapses() {
        let set = PermissionSet::from([All]);
        assert_eq!(set.len(), 8);
        assert!(set.contains(All));
        assert!(set.contains(RenameEntry));
        assert_eq!(set.tags(), vec![All]);
        assert_eq!(set, PermissionSet::all());
    }

    #[test]
    fn test_every_tag_is_all() {
        let set: PermissionSet = Permission::CONCRETE.into_iter().collect();
        assert!(set.contains(All));
    }

    #[test]
    fn test_remove_from_all() {
        let mut set = PermissionSet::all();
        set.remove(Share);
        assert!(!set.contains(All));
        assert!(!set.contains(Share));
        assert_eq!(set.len(), 7);

        set.remove(All);
        assert!(set.is_empty());
    }

    #[test]
    fn test_parse_comma_list() {
        let set: PermissionSet = "write, share,,delete".parse().unwrap();
        assert_eq!(set, PermissionSet::from([Write, Share, Delete]));
        assert!("write,nope".parse::<PermissionSet>().is_err());
        assert!("".parse::<PermissionSet>().unwrap().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(PermissionSet::from([Share, Write]).to_string(), "{write, share}");
        assert_eq!(PermissionSet::all().to_string(), "{all}");
        assert_eq!(PermissionSet::new().to_string(), "{}");
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&PermissionSet::from([Write, RenameBundle])).unwrap();
        assert_eq!(json, r#"["write","rename_bundle"]"#);

        let json = serde_json::to_string(&PermissionSet::all()).unwrap();
        assert_eq!(json, r#"["all"]"#);

        let set: PermissionSet = serde_json::from_str(r#"["all","write"]"#).unwrap();
        assert!(set.is_all());
    }
}
