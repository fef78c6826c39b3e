//! Configuration system (layered: code > env > config file > defaults).

pub mod file;

pub use file::ConfigFile;

use std::path::{Path, PathBuf};
use std::time::Duration;

use bon::Builder;

use crate::error::ClientError;
use crate::util::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_APP_NAME: &str = "trip-planner";
pub const DEFAULT_USER_ID: &str = "test-user";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub const ENV_BASE_URL: &str = "TRIP_PLANNER_BASE_URL";
pub const ENV_APP_NAME: &str = "TRIP_PLANNER_APP_NAME";
pub const ENV_USER_ID: &str = "TRIP_PLANNER_USER_ID";
pub const ENV_TIMEOUT_SECS: &str = "TRIP_PLANNER_TIMEOUT_SECS";
pub const ENV_MAX_ATTEMPTS: &str = "TRIP_PLANNER_MAX_ATTEMPTS";

/// Everything the client needs to talk to one agent server.
///
/// Passed into [`SessionClient::new`](crate::client::SessionClient::new);
/// nothing here is process-global.
///
/// ```
/// use trip_planner::config::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://agents.internal:9000")
///     .user_id("alice")
///     .build();
/// assert_eq!(config.app_name, "trip-planner");
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ClientConfig {
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(into, default = DEFAULT_APP_NAME.to_string())]
    pub app_name: String,
    #[builder(into, default = DEFAULT_USER_ID.to_string())]
    pub user_id: String,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub request_timeout: Duration,
    /// Sent as `description` when creating sessions.
    #[builder(into)]
    pub session_description: Option<String>,
    #[builder(default)]
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientConfig {
    /// Defaults, then the default config file (if present), then env.
    pub fn load() -> Result<Self, ClientError> {
        Self::load_from(None)
    }

    /// Like [`load`](Self::load) but reading an explicit config file.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ClientError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();

        match path {
            Some(path) => config.apply_file(&ConfigFile::read(path)?)?,
            None => {
                if let Some(default_path) = default_config_path() {
                    if let Some(file) = ConfigFile::read_optional(&default_path)? {
                        tracing::debug!(path = %default_path.display(), "Loaded config file");
                        config.apply_file(&file)?;
                    }
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from a parsed config file.
    pub fn apply_file(&mut self, file: &ConfigFile) -> Result<(), ClientError> {
        if let Some(ref url) = file.base_url {
            self.base_url = url.clone();
        }
        if let Some(ref app) = file.app_name {
            self.app_name = app.clone();
        }
        if let Some(ref user) = file.user_id {
            self.user_id = user.clone();
        }
        if let Some(secs) = file.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = file.max_attempts {
            self.retry = RetryPolicy::with_attempts(attempts);
        }
        if let Some(ref description) = file.description {
            self.session_description = Some(description.clone());
        }
        Ok(())
    }

    /// Overlay values from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(app) = lookup(ENV_APP_NAME) {
            self.app_name = app;
        }
        if let Some(user) = lookup(ENV_USER_ID) {
            self.user_id = user;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = parse_number::<u64>(ENV_TIMEOUT_SECS, &raw)?;
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            let attempts = parse_number::<u32>(ENV_MAX_ATTEMPTS, &raw)?;
            self.retry = RetryPolicy::with_attempts(attempts);
        }
        Ok(())
    }

    /// Check invariants that the builder cannot express.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            ClientError::Configuration(format!("invalid base URL '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.app_name.trim().is_empty() {
            return Err(ClientError::Configuration("app name is empty".into()));
        }
        if self.user_id.trim().is_empty() {
            return Err(ClientError::Configuration("user id is empty".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(ClientError::Configuration(
                "request timeout must be positive".into(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ClientError::Configuration(
                "max attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// `config.toml` in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "trip-planner")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ClientError> {
    raw.trim()
        .parse()
        .map_err(|_| ClientError::Configuration(format!("{key} must be a number, got '{raw}'")))
}
