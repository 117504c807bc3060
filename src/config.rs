//! Layered configuration: defaults, then a TOML file, then environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::RollbackPolicy;
use crate::error::ConfigError;
use crate::models::ClientType;

pub const ENV_API_URL: &str = "DEAL_BOARD_API_URL";
pub const ENV_OWNER: &str = "DEAL_BOARD_OWNER";
pub const ENV_TOKEN: &str = "DEAL_BOARD_TOKEN";
pub const ENV_CLIENT_TYPE: &str = "DEAL_BOARD_CLIENT_TYPE";

const CONFIG_DIR_NAME: &str = "deal-board";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Base URL of the CRM backend, e.g. `https://crm.example.com/api`.
    pub api_url: String,
    /// Owner whose deals are shown.
    pub owner: String,
    /// Bearer token issued by the identity provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Pipeline shown on start.
    pub client_type: ClientType,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub rollback: RollbackPolicy,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            owner: String::new(),
            token: None,
            client_type: ClientType::Buyer,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            rollback: RollbackPolicy::Snapshot,
        }
    }
}

impl BoardConfig {
    /// Default config file location, `{config_dir}/deal-board/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load and validate configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present and silently skipped otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "reading config file");
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `DEAL_BOARD_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(url) = env_value(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(owner) = env_value(ENV_OWNER) {
            self.owner = owner;
        }
        if let Some(token) = env_value(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(raw) = env_value(ENV_CLIENT_TYPE) {
            self.client_type = raw
                .parse()
                .map_err(|message| ConfigError::InvalidValue {
                    key: ENV_CLIENT_TYPE,
                    message,
                })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Missing("api_url"));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "api_url",
                message: format!("{} is not an http(s) URL", self.api_url),
            });
        }
        if self.owner.trim().is_empty() {
            return Err(ConfigError::Missing("owner"));
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeouts",
                message: "timeouts must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    /// Copy safe to print.
    pub fn redacted(&self) -> Self {
        Self {
            token: self.token.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
