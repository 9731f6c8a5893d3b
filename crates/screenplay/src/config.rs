//! Scenario configuration.
//!
//! Loaded from YAML, then optionally overridden from the environment:
//!
//! ```yaml
//! base_url: http://localhost:3003
//! headless: true
//! credentials:
//!   nurse:
//!     email: ana.garcia@healthtech.com
//!     password: password123
//! timeouts:
//!   standard_ms: 15000
//! ```

use crate::result::{ScreenplayError, ScreenplayResult};
use crate::wait::WaitOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "SCREENPLAY_BASE_URL";

/// Environment variable overriding headless mode
pub const HEADLESS_ENV: &str = "SCREENPLAY_HEADLESS";

/// Login details for one role
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login email
    pub email: String,
    /// Login password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Default per-operation timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Quick checks such as toasts and modals (ms)
    pub short_ms: u64,
    /// Element waits inside tasks (ms)
    pub standard_ms: u64,
    /// Page loads and dashboards (ms)
    pub page_ms: u64,
    /// Poll interval for every wait (ms)
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            short_ms: 10_000,
            standard_ms: 15_000,
            page_ms: 30_000,
            poll_interval_ms: 100,
        }
    }
}

impl Timeouts {
    fn options(&self, timeout_ms: u64) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_poll_interval(self.poll_interval_ms)
    }

    /// Wait options for quick checks
    #[must_use]
    pub fn short(&self) -> WaitOptions {
        self.options(self.short_ms)
    }

    /// Wait options for element waits
    #[must_use]
    pub fn standard(&self) -> WaitOptions {
        self.options(self.standard_ms)
    }

    /// Wait options for page loads
    #[must_use]
    pub fn page(&self) -> WaitOptions {
        self.options(self.page_ms)
    }
}

/// Everything a scenario needs to know about its environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Application root, without trailing slash
    pub base_url: String,
    /// Credentials per role name
    pub credentials: BTreeMap<String, Credentials>,
    /// Default timeouts
    pub timeouts: Timeouts,
    /// Run browsers without a window
    pub headless: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3003".to_string(),
            credentials: BTreeMap::new(),
            timeouts: Timeouts::default(),
            headless: true,
        }
    }
}

impl ScenarioConfig {
    /// Create default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Add credentials for a role
    #[must_use]
    pub fn with_credentials(mut self, role: impl Into<String>, credentials: Credentials) -> Self {
        self.credentials.insert(role.into(), credentials);
        self
    }

    /// Set the timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Parse YAML
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is malformed or the result is invalid.
    pub fn from_yaml_str(yaml: &str) -> ScreenplayResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> ScreenplayResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Apply `SCREENPLAY_BASE_URL` and `SCREENPLAY_HEADLESS`
    ///
    /// # Errors
    ///
    /// Returns error if an override is invalid.
    pub fn with_env_overrides(self) -> ScreenplayResult<Self> {
        self.with_overrides(
            std::env::var(BASE_URL_ENV).ok(),
            std::env::var(HEADLESS_ENV).ok(),
        )
    }

    fn with_overrides(
        mut self,
        base_url: Option<String>,
        headless: Option<String>,
    ) -> ScreenplayResult<Self> {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(flag) = headless {
            self.headless = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(ScreenplayError::config(format!(
                        "{HEADLESS_ENV} must be true or false, got {other:?}"
                    )))
                }
            };
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns `Config` if the base URL is not http(s) or a poll interval is zero.
    pub fn validate(&self) -> ScreenplayResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ScreenplayError::config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeouts.poll_interval_ms == 0 {
            return Err(ScreenplayError::config("poll_interval_ms must be positive"));
        }
        Ok(())
    }

    /// Absolute URL of an application path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Credentials of a role
    ///
    /// # Errors
    ///
    /// Returns `Config` if the role has none.
    pub fn credentials_for(&self, role: &str) -> ScreenplayResult<&Credentials> {
        self.credentials
            .get(role)
            .ok_or_else(|| ScreenplayError::config(format!("no credentials for role {role:?}")))
    }
}
