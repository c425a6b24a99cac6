//! Configuration for the armscale CLI.
//!
//! Layered with figment: built-in defaults, then the TOML file, then the
//! service-principal environment variables (`CLIENT_ID`, `CLIENT_SECRET`,
//! `TENANT_ID`, `SUBSCRIPTION_ID`), then `ARMSCALE_`-prefixed overrides
//! (`ARMSCALE_CLOUD__TIMEOUT=60`). The result translates into
//! `armscale_core::ManagementConfig` for connecting.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use armscale_core::{
    DEFAULT_AUTHORITY, DEFAULT_RESOURCE_MANAGER, ManagementConfig, PolicyConfig, PollingSettings,
    ScenarioOptions, ServicePrincipal,
};

/// Environment variables read verbatim (no prefix).
pub const CREDENTIAL_VARS: [&str; 4] = ["CLIENT_ID", "CLIENT_SECRET", "TENANT_ID", "SUBSCRIPTION_ID"];

/// Prefix for every other environment override.
pub const ENV_PREFIX: &str = "ARMSCALE_";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing service principal credentials: {missing}")]
    NoCredentials { missing: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub client_id: Option<String>,
    /// Plaintext in the file is allowed; prefer the environment.
    pub client_secret: Option<String>,
    pub tenant_id: Option<String>,
    /// Falls back to the principal's default subscription when unset.
    pub subscription_id: Option<String>,

    #[serde(default)]
    pub cloud: CloudConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub scenario: ScenarioOptions,

    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Endpoints and transport tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CloudConfig {
    pub authority_host: String,
    pub resource_manager: String,
    /// Per-request timeout, seconds.
    pub timeout: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            authority_host: DEFAULT_AUTHORITY.into(),
            resource_manager: DEFAULT_RESOURCE_MANAGER.into(),
            timeout: 30,
        }
    }
}

/// Long-running operation polling, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval: u64,
    pub max_interval: u64,
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        let defaults = PollingSettings::default();
        Self {
            interval: defaults.interval.as_secs(),
            max_interval: defaults.max_interval.as_secs(),
            max_attempts: defaults.max_attempts,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "armscale", "armscale").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("armscale");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults plus the TOML file at `path`, without any environment.
pub fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

/// The full provider stack: defaults, file, credentials, prefixed overrides.
pub fn figment(path: &Path) -> Figment {
    file_figment(path)
        .merge(Env::raw().only(&CREDENTIAL_VARS))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load config from `path` (or the platform default) and the environment.
/// A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let config: Config = figment(&path).extract()?;
    Ok(config)
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// A copy with the client secret masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            client_secret: self.client_secret.as_ref().map(|_| REDACTED.into()),
            ..self.clone()
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolve the service principal, naming every missing variable.
    pub fn service_principal(&self) -> Result<ServicePrincipal, ConfigError> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

        let missing: Vec<&str> = [
            ("CLIENT_ID", &self.client_id),
            ("CLIENT_SECRET", &self.client_secret),
            ("TENANT_ID", &self.tenant_id),
        ]
        .into_iter()
        .filter(|(_, v)| !present(v))
        .map(|(name, _)| name)
        .collect();

        match (&self.tenant_id, &self.client_id, &self.client_secret) {
            (Some(tenant_id), Some(client_id), Some(secret)) if missing.is_empty() => {
                Ok(ServicePrincipal {
                    tenant_id: tenant_id.trim().to_owned(),
                    client_id: client_id.trim().to_owned(),
                    client_secret: SecretString::from(secret.clone()),
                })
            }
            _ => Err(ConfigError::NoCredentials {
                missing: missing.join(", "),
            }),
        }
    }

    /// Build the runtime connection config.
    pub fn management_config(&self) -> Result<ManagementConfig, ConfigError> {
        let credentials = self.service_principal()?;

        if self.cloud.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "cloud.timeout".into(),
                reason: "must be at least one second".into(),
            });
        }
        if self.polling.max_attempts == 0 {
            return Err(ConfigError::Validation {
                field: "polling.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(ManagementConfig {
            resource_manager_url: parse_url("cloud.resource_manager", &self.cloud.resource_manager)?,
            authority_url: parse_url("cloud.authority_host", &self.cloud.authority_host)?,
            credentials,
            subscription_id: self
                .subscription_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            timeout: Duration::from_secs(self.cloud.timeout),
            polling: PollingSettings {
                interval: Duration::from_secs(self.polling.interval),
                max_interval: Duration::from_secs(self.polling.max_interval),
                max_attempts: self.polling.max_attempts,
            },
        })
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}
