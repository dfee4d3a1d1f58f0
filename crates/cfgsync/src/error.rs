//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable help
//! text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use cfgsync_config::ConfigError;
use cfgsync_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(cfgsync::connection_failed),
        help(
            "Check that the controller is reachable: {reason}\n\
             Self-signed certificate? Try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("{operation} timed out")]
    #[diagnostic(
        code(cfgsync::timeout),
        help("Increase the timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { operation: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(cfgsync::auth_failed),
        help(
            "Verify the username and password.\n\
             Stored a wrong password? Run: cfgsync config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No password available for profile '{profile}'")]
    #[diagnostic(
        code(cfgsync::no_credentials),
        help(
            "Set CFGSYNC_PASSWORD, store one with `cfgsync config set-password`,\n\
             or run from an interactive terminal to be prompted."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(cfgsync::not_found),
        help("Run `cfgsync inventory` to see the builders and containers in use.")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{operation} failed: {message}")]
    #[diagnostic(code(cfgsync::api_error))]
    ApiError { operation: String, message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(cfgsync::internal))]
    Internal(String),

    // ── Configuration ────────────────────────────────────────────────
    #[error("No {field} given")]
    #[diagnostic(
        code(cfgsync::missing_setting),
        help("Pass {flag} or set `{field}` in a profile of {path}")
    )]
    MissingSetting {
        field: String,
        flag: String,
        path: String,
    },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(cfgsync::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cfgsync::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(cfgsync::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(cfgsync::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(cfgsync::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    #[diagnostic(code(cfgsync::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::MissingSetting { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to authentication failures.
    pub fn with_profile(self, profile: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                profile: profile.into(),
                message,
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "default".into(),
                message,
            },
            CoreError::Timeout { operation } => CliError::Timeout { operation },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type,
                identifier,
            },
            CoreError::Api {
                operation, message, ..
            } => CliError::ApiError { operation, message },
            CoreError::Config { message } => CliError::Validation {
                field: "controller".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
