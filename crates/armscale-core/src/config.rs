// ── Runtime connection configuration ──
//
// These types describe *how* to reach the management plane. They carry
// credential data and transport tuning, but never touch disk; the CLI
// builds a `ManagementConfig` and hands it to `plane::connect`.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Service principal authenticating with a client secret.
#[derive(Debug, Clone)]
pub struct ServicePrincipal {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: SecretString,
}

/// Long-running operation polling knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingSettings {
    /// Delay between polls when the service sends no `Retry-After`.
    pub interval: Duration,
    /// Cap applied to server-sent `Retry-After`.
    pub max_interval: Duration,
    /// Polls before an operation is reported as failed.
    pub max_attempts: u32,
}

impl Default for PollingSettings {
    fn default() -> Self {
        armscale_api::PollingConfig::default().into()
    }
}

impl From<armscale_api::PollingConfig> for PollingSettings {
    fn from(p: armscale_api::PollingConfig) -> Self {
        Self {
            interval: p.interval,
            max_interval: p.max_interval,
            max_attempts: p.max_attempts,
        }
    }
}

impl From<PollingSettings> for armscale_api::PollingConfig {
    fn from(p: PollingSettings) -> Self {
        Self {
            interval: p.interval,
            max_interval: p.max_interval,
            max_attempts: p.max_attempts,
        }
    }
}

/// Everything needed to open an authenticated session.
#[derive(Debug, Clone)]
pub struct ManagementConfig {
    /// Resource Manager root, e.g. `https://management.azure.com/`.
    pub resource_manager_url: Url,
    /// Identity authority root, e.g. `https://login.microsoftonline.com/`.
    pub authority_url: Url,
    pub credentials: ServicePrincipal,
    /// Subscription to work in. `None` picks the principal's default.
    pub subscription_id: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    pub polling: PollingSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polling_defaults_follow_the_client() {
        let settings = PollingSettings::default();
        let client = armscale_api::PollingConfig::default();
        assert_eq!(settings.interval, client.interval);
        assert_eq!(settings.max_interval, client.max_interval);
        assert_eq!(settings.max_attempts, client.max_attempts);

        let back: armscale_api::PollingConfig = settings.into();
        assert_eq!(back.interval, Duration::from_secs(5));
    }
}
