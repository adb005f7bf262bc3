//! Service and project configuration.
//!
//! The service URL is decided once, when a [`ServiceConfig`] is built, and
//! handed to whatever transport talks to the service. Project settings
//! live in a small TOML file next to the secrets they describe.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KonbiniError, Result};

/// Environment variable that selects the service.
pub const ENV_VAR: &str = "APP_ENV";

/// Service used for local development.
pub const LOCAL_SERVICE_URL: &str = "http://127.0.0.1:3000";

/// Hosted service.
pub const PRODUCTION_SERVICE_URL: &str = "https://konbini.juancwu.dev";

/// Default project configuration file name.
pub const PROJECT_CONFIG_FILE: &str = ".konbini.toml";

/// Which service deployment to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Local,
    Production,
}

impl Environment {
    /// `production` selects [`Environment::Production`]; anything else,
    /// including nothing, is local.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Environment::Production,
            _ => Environment::Local,
        }
    }

    /// Read [`ENV_VAR`].
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(ENV_VAR).ok().as_deref())
    }

    pub const fn service_url(self) -> &'static str {
        match self {
            Environment::Local => LOCAL_SERVICE_URL,
            Environment::Production => PRODUCTION_SERVICE_URL,
        }
    }
}

/// Where the remote service lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL, without a trailing slash.
    pub service_url: String,
}

impl ServiceConfig {
    pub fn new(service_url: impl Into<String>) -> Self {
        let mut service_url = service_url.into();
        while service_url.ends_with('/') {
            service_url.pop();
        }
        Self { service_url }
    }

    pub fn for_environment(environment: Environment) -> Self {
        Self::new(environment.service_url())
    }

    /// Pick the service from the process environment.
    pub fn from_env() -> Self {
        Self::for_environment(Environment::from_env())
    }

    /// Full URL for an endpoint path such as `auth/refresh`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.service_url, path.trim_start_matches('/'))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

/// Per-project bundle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Set once the bundle has been prepared remotely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bento_id: Option<String>,
    /// Path to the PEM private key for the bundle.
    pub private_key_path: PathBuf,
}

impl ProjectConfig {
    pub fn new(private_key_path: impl Into<PathBuf>) -> Self {
        Self {
            bento_id: None,
            private_key_path: private_key_path.into(),
        }
    }

    pub fn with_bento_id(mut self, bento_id: impl Into<String>) -> Self {
        self.bento_id = Some(bento_id.into());
        self
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| KonbiniError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| KonbiniError::Config(e.to_string()))
    }

    /// Load from an explicit path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// Write to an explicit path, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
