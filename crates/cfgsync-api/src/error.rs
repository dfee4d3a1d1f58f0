use thiserror::Error;

/// Top-level error type for the `cfgsync-api` crate.
///
/// Every variant that originates from a REST call carries the `operation`
/// that was in flight (e.g. "Collecting device inventory"), so the abort
/// message printed by the CLI says which step of the run failed.
/// `cfgsync-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, or the session cookie is no longer accepted.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("{operation} failed: HTTP transport error: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake, certificate or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller responses ────────────────────────────────────────
    /// The controller answered with a non-success HTTP status.
    #[error("{operation} failed: wrong status code {status} received: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The controller answered 2xx but the body carries an `errorCode`.
    #[error("{operation} failed: error code {code}: {message}")]
    Api {
        operation: &'static str,
        code: String,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("{operation} failed: could not decode response: {message}")]
    Deserialization {
        operation: &'static str,
        message: String,
        body: String,
    },
}

impl Error {
    /// The operation that was in flight when this error occurred, if any.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::Api { operation, .. }
            | Self::Deserialization { operation, .. } => Some(operation),
            Self::Authentication { .. } | Self::InvalidUrl(_) | Self::Tls(_) => None,
        }
    }

    /// Returns `true` if the request never completed because of a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }

    /// Returns `true` if the controller could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_connect())
    }

    /// Returns `true` if the controller answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Extract the controller's error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}
