// ── Core error types ──
//
// Errors surfaced by a reconciliation run. Transport details (status codes,
// raw bodies) are folded into these variants by the `From<cfgsync_api::Error>`
// impl; every variant that comes from a controller call keeps the name of the
// operation that failed.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("{operation} timed out")]
    Timeout { operation: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} '{identifier}' not found")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("{operation} failed: {message}")]
    Api {
        operation: String,
        message: String,
        /// The controller's `errorCode`, if it sent one.
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

// ── Conversion from transport-layer errors ───────────────────────────

impl From<cfgsync_api::Error> for CoreError {
    fn from(err: cfgsync_api::Error) -> Self {
        match err {
            cfgsync_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            cfgsync_api::Error::Transport { operation, source } => {
                if source.is_timeout() {
                    CoreError::Timeout {
                        operation: operation.into(),
                    }
                } else if source.is_connect() {
                    CoreError::ConnectionFailed {
                        url: source
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: source.to_string(),
                    }
                } else {
                    CoreError::Api {
                        operation: operation.into(),
                        message: source.to_string(),
                        code: None,
                        status: source.status().map(|s| s.as_u16()),
                    }
                }
            }
            cfgsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            cfgsync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            cfgsync_api::Error::Status {
                operation,
                status,
                body,
            } => CoreError::Api {
                operation: operation.into(),
                message: format!("wrong status code {status} received: {body}"),
                code: None,
                status: Some(status),
            },
            cfgsync_api::Error::Api {
                operation,
                code,
                message,
            } => CoreError::Api {
                operation: operation.into(),
                message: format!("error code {code}: {message}"),
                code: Some(code),
                status: None,
            },
            cfgsync_api::Error::Deserialization {
                operation,
                message,
                body: _,
            } => CoreError::Api {
                operation: operation.into(),
                message: format!("could not decode response: {message}"),
                code: None,
                status: None,
            },
        }
    }
}

impl CoreError {
    /// The failed step, when the error came from a controller call.
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::Timeout { operation } | Self::Api { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_code_survives_conversion() {
        let err: CoreError = cfgsync_api::Error::Api {
            operation: "Saving topology",
            code: "202".into(),
            message: "Topology busy".into(),
        }
        .into();

        assert_eq!(err.operation(), Some("Saving topology"));
        assert_eq!(
            err.to_string(),
            "Saving topology failed: error code 202: Topology busy"
        );
        assert!(matches!(err, CoreError::Api { code: Some(ref c), .. } if c == "202"));
    }

    #[test]
    fn wrong_status_keeps_status_code() {
        let err: CoreError = cfgsync_api::Error::Status {
            operation: "Deleting configlets",
            status: 500,
            body: "boom".into(),
        }
        .into();

        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
        assert!(err.to_string().starts_with("Deleting configlets failed"));
    }
}
