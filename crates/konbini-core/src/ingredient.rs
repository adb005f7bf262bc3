//! Ingredient files: one `NAME=value` secret per line.
//!
//! Blank lines and lines starting with `#` are skipped. Everything after
//! the first `=` is the value, byte for byte. Order is preserved and
//! duplicate names are passed through untouched.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{CoreError, Result};

/// Lines whose first non-whitespace byte is this are comments.
pub const COMMENT_MARKER: u8 = b'#';

/// A single named secret.
///
/// The value is wiped from memory when the entry is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretEntry {
    name: String,
    value: Zeroizing<Vec<u8>>,
}

impl SecretEntry {
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: Zeroizing::new(value.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Replace the whole value. Entries are never edited in place.
    pub fn replace_value(&mut self, value: impl Into<Vec<u8>>) {
        self.value = Zeroizing::new(value.into());
    }
}

impl fmt::Debug for SecretEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretEntry")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Parse an ingredient file.
///
/// A line without `=` fails the whole call and no partial result is returned.
pub fn parse(text: &[u8]) -> Result<Vec<SecretEntry>> {
    let mut entries = Vec::new();

    for (index, raw) in text.split(|&b| b == b'\n').enumerate() {
        let line_no = index + 1;
        let line = raw.strip_suffix(b"\r").unwrap_or(raw);
        let start = line
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(line.len());
        let line = &line[start..];

        if line.is_empty() || line[0] == COMMENT_MARKER {
            continue;
        }

        let eq = line
            .iter()
            .position(|&b| b == b'=')
            .ok_or(CoreError::MalformedEntry {
                line: line_no,
                reason: "missing '='",
            })?;

        let name = std::str::from_utf8(&line[..eq])
            .map_err(|_| CoreError::MalformedEntry {
                line: line_no,
                reason: "name is not valid UTF-8",
            })?
            .trim_end();
        if name.is_empty() {
            return Err(CoreError::MalformedEntry {
                line: line_no,
                reason: "empty name",
            });
        }

        entries.push(SecretEntry::new(name, &line[eq + 1..]));
    }

    Ok(entries)
}

/// Render entries back to `NAME=value\n` lines, in order.
///
/// Values are written raw. A value containing a newline will not survive a
/// second [`parse`].
pub fn render(entries: &[SecretEntry]) -> Zeroizing<Vec<u8>> {
    let size = entries
        .iter()
        .map(|e| e.name.len() + e.value.len() + 2)
        .sum();
    let mut out = Zeroizing::new(Vec::with_capacity(size));
    for entry in entries {
        out.extend_from_slice(entry.name.as_bytes());
        out.push(b'=');
        out.extend_from_slice(&entry.value);
        out.push(b'\n');
    }
    out
}
