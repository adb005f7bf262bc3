//! Local credential storage.
//!
//! Credentials live in a small JSON file readable only by the owner. A
//! missing file means the user never signed in (or signed out) and is
//! reported as [`AuthError::NotAuthenticated`], not as an I/O error.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, Result};
use crate::lifecycle::CredentialPair;

/// File name used inside the credentials directory.
pub const CREDENTIALS_FILE: &str = "creds.json";

/// What gets persisted after sign-in.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            email: None,
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn pair(&self) -> CredentialPair {
        CredentialPair::new(self.access_token.clone(), self.refresh_token.clone())
    }

    /// Take the tokens from `pair`, keeping the email.
    pub fn update_from(&mut self, pair: &CredentialPair) {
        self.access_token = pair.access_token().to_string();
        self.refresh_token = pair.refresh_token().to_string();
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Somewhere to keep credentials between runs.
pub trait CredentialStore: Send + Sync {
    /// Fails with [`AuthError::NotAuthenticated`] when nothing is stored.
    fn load(&self) -> Result<Credentials>;

    /// Replace whatever is stored.
    fn save(&self, credentials: &Credentials) -> Result<()>;

    /// Forget stored credentials. Removing nothing is not an error.
    fn remove(&self) -> Result<()>;
}

/// Credentials in a JSON file with owner-only permissions.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `dir/creds.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CREDENTIALS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Credentials> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AuthError::NotAuthenticated)
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map_err(|e| AuthError::Serialization(e.to_string()))
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_private_dir(dir)?;
        }
        let json = serde_json::to_vec_pretty(credentials)
            .map_err(|e| AuthError::Serialization(e.to_string()))?;
        write_owner_only(&self.path, &json)?;
        debug!(path = %self.path.display(), "saved credentials");
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed credentials");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory credential store.
///
/// Primarily for tests. Counts saves so renewals can be observed.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    credentials: Option<Credentials>,
    saves: usize,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `credentials`.
    pub fn with(credentials: Credentials) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                credentials: Some(credentials),
                saves: 0,
            }),
        }
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).saves
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Credentials> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.credentials.clone().ok_or(AuthError::NotAuthenticated)
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.credentials = Some(credentials.clone());
        inner.saves += 1;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.credentials = None;
        Ok(())
    }
}

/// Create `dir` and its parents; the leaf is owner-only on Unix.
pub fn create_private_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}

/// Replace `path` with `bytes`, mode 0600 on Unix.
///
/// The bytes go to a sibling `<name>.tmp` first and are renamed over `path`
/// once synced, so a crash mid-write never leaves a truncated file behind.
/// The result is owner-only even when the file it replaces was not.
pub fn write_owner_only(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp_path = sibling_tmp_path(path)?;
    let written = write_synced(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

fn sibling_tmp_path(path: &Path) -> io::Result<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(bytes)?;
    file.sync_all()
}
