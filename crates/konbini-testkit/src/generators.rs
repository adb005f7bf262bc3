//! Proptest generators for property-based testing.

use proptest::prelude::*;

use konbini_core::SecretEntry;
use konbini_perms::{Permission, PermissionSet};

/// Generate plaintext of at most `max_len` bytes, empty included.
pub fn plaintext(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate an ingredient name.
pub fn entry_name() -> impl Strategy<Value = String> {
    "[A-Z_][A-Z0-9_]{0,23}"
}

/// Generate a single-line printable value.
pub fn entry_value() -> impl Strategy<Value = String> {
    "[ -~]{0,64}"
}

/// Generate a list of entries that survives a render/parse round trip.
pub fn entries(max: usize) -> impl Strategy<Value = Vec<SecretEntry>> {
    prop::collection::vec((entry_name(), entry_value()), 0..=max).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(name, value)| SecretEntry::new(name, value.into_bytes()))
            .collect()
    })
}

/// Generate any permission tag, `all` included.
pub fn permission() -> impl Strategy<Value = Permission> {
    prop_oneof![
        Just(Permission::Write),
        Just(Permission::Delete),
        Just(Permission::Share),
        Just(Permission::RenameBundle),
        Just(Permission::RenameEntry),
        Just(Permission::WriteEntry),
        Just(Permission::DeleteEntry),
        Just(Permission::RevokeShare),
        Just(Permission::All),
    ]
}

/// Generate a permission set.
pub fn permission_set() -> impl Strategy<Value = PermissionSet> {
    prop::collection::vec(permission(), 0..6).prop_map(PermissionSet::from)
}
