use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::InstallError;

/// Where releases are published and how they are fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReleaseConfig {
    pub host: String,
    pub org: String,
    pub repo: String,
    /// Redirect hops followed before giving up
    pub max_redirects: usize,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            host: "https://github.com".to_string(),
            org: "flexstack".to_string(),
            repo: "new-dockerfile".to_string(),
            max_redirects: 10,
            connect_timeout_secs: 30,
            user_agent: concat!("new-dockerfile-install/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ReleaseConfig {
    /// Load a TOML config file; fields it omits keep their defaults.
    pub fn load(path: &Path) -> Result<Self, InstallError> {
        let config_error = |reason: String| InstallError::Config {
            path: path.to_path_buf(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        toml::from_str(&raw).map_err(|e| config_error(e.to_string()))
    }
}
