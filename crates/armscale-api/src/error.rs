use thiserror::Error;

/// Top-level error type for the `armscale-api` crate.
///
/// Covers every failure mode of the management-plane client:
/// token acquisition, transport, the ARM error envelope, and
/// long-running operation polling. `armscale-core` maps these into
/// domain-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token request rejected (bad client secret, unknown tenant, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to build the underlying HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Resource Manager ────────────────────────────────────────────
    /// Structured error from ARM (`{ "error": { "code", "message" } }`).
    #[error("ARM error (HTTP {status}): {message}")]
    Arm {
        message: String,
        code: Option<String>,
        status: u16,
    },

    /// A long-running operation reached a terminal non-success state.
    #[error("Operation {state}: {message}")]
    OperationFailed {
        state: String,
        message: String,
        code: Option<String>,
    },

    /// A long-running operation was still running after the poll budget.
    #[error("Operation still running after {attempts} polls")]
    PollingExhausted { attempts: u32 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Arm { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if ARM rejected the request because the name is taken.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Arm { status: 409, .. })
    }

    /// Extract the ARM error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Arm { code, .. } | Self::OperationFailed { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_and_code_accessors() {
        let err = Error::Arm {
            message: "Website name already in use".into(),
            code: Some("Conflict".into()),
            status: 409,
        };
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
        assert_eq!(err.api_error_code(), Some("Conflict"));
    }
}
