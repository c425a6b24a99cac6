//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use armscale_config::ConfigError;
use armscale_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach {url}")]
    #[diagnostic(
        code(armscale::connection_failed),
        help(
            "Check network access to Azure Resource Manager.\n\
             Endpoints can be changed under [cloud] in the config file."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(armscale::auth_failed),
        help(
            "Verify the service principal's CLIENT_ID, CLIENT_SECRET and TENANT_ID,\n\
             and that it has Contributor access to the subscription."
        )
    )]
    AuthFailed { message: String },

    #[error("Missing service principal credentials: {missing}")]
    #[diagnostic(
        code(armscale::no_credentials),
        help(
            "Set CLIENT_ID, CLIENT_SECRET and TENANT_ID (SUBSCRIPTION_ID is optional),\n\
             or add client_id / client_secret / tenant_id to the config file.\n\
             Run: armscale config path"
        )
    )]
    NoCredentials { missing: String },

    // ── Remote API ───────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(code(armscale::not_found))]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    #[diagnostic(
        code(armscale::conflict),
        help("Resource names get a random suffix; re-running normally resolves this.")
    )]
    Conflict { message: String },

    #[error("Operation {state}: {message}")]
    #[diagnostic(code(armscale::operation_failed))]
    OperationFailed { state: String, message: String },

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(armscale::api_error))]
    ApiError { code: String, message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(armscale::timeout),
        help("Increase the timeout with --timeout or [cloud] timeout in the config file.")
    )]
    Timeout,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(armscale::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(armscale::config),
        help("Check the config file. Run: armscale config path")
    )]
    Config { message: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(armscale::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(armscale::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(armscale::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArgument { field, reason } => CliError::Validation { field, reason },
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout => CliError::Timeout,
            CoreError::NotFound { message } => CliError::NotFound { message },
            CoreError::Conflict { message } => CliError::Conflict { message },
            CoreError::OperationFailed { state, message, .. } => {
                CliError::OperationFailed { state, message }
            }
            CoreError::Api { message, code, status } => CliError::ApiError {
                code: code
                    .or_else(|| status.map(|s| format!("HTTP {s}")))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { missing } => CliError::NoCredentials { missing },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_their_exit_codes() {
        let err = CliError::from(CoreError::AuthenticationFailed {
            message: "invalid_client".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);

        let err = CliError::from(CoreError::Api {
            message: "quota".into(),
            code: None,
            status: Some(400),
        });
        assert!(err.to_string().contains("HTTP 400"));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn missing_credentials_are_auth_errors() {
        let err = CliError::from(ConfigError::NoCredentials {
            missing: "CLIENT_ID".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert!(err.help().is_some());
    }
}
