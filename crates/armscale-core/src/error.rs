// ── Core error types ──
//
// Domain-level errors from armscale-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<armscale_api::Error>`
// impl translates transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the management plane at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── Remote API errors ────────────────────────────────────────────
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    #[error("Resource conflict: {message}")]
    Conflict { message: String },

    #[error("Operation {state}: {message}")]
    OperationFailed {
        state: String,
        message: String,
        code: Option<String>,
    },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// The ARM error code (e.g. "QuotaExceeded").
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<armscale_api::Error> for CoreError {
    fn from(err: armscale_api::Error) -> Self {
        match err {
            armscale_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            armscale_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e.url().map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            armscale_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            armscale_api::Error::ClientBuild(reason) => CoreError::Config {
                message: format!("Cannot build HTTP client: {reason}"),
            },
            armscale_api::Error::Arm {
                status: 404,
                message,
                ..
            } => CoreError::NotFound { message },
            armscale_api::Error::Arm {
                status: 409,
                message,
                ..
            } => CoreError::Conflict { message },
            armscale_api::Error::Arm {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            armscale_api::Error::OperationFailed {
                state,
                message,
                code,
            } => CoreError::OperationFailed {
                state,
                message,
                code,
            },
            armscale_api::Error::PollingExhausted { attempts } => CoreError::OperationFailed {
                state: "Running".into(),
                message: format!("gave up waiting after {attempts} polls"),
                code: None,
            },
            armscale_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
