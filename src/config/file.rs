//! TOML config file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// On-disk configuration. Every key is optional.
///
/// ```toml
/// base_url = "http://localhost:8080"
/// app_name = "trip-planner"
/// user_id = "test-user"
/// timeout_secs = 60
/// max_attempts = 1
/// description = "Session created by trip-planner"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub app_name: Option<String>,
    pub user_id: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub description: Option<String>,
}

impl ConfigFile {
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        toml::from_str(raw)
            .map_err(|e| ClientError::Configuration(format!("invalid config file: {e}")))
    }

    /// Read a file that must exist.
    pub fn read(path: &Path) -> Result<Self, ClientError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ClientError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&raw)
    }

    /// Read a file that may be absent.
    pub fn read_optional(path: &Path) -> Result<Option<Self>, ClientError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ClientError::Configuration(format!(
                "cannot read {}: {err}",
                path.display()
            ))),
        }
    }
}
