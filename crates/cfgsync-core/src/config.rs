// ── Runtime connection and run configuration ──
//
// These types describe how to reach the controller and how a reconciliation
// run behaves. They carry credential data and tuning, but never touch disk.
// The CLI constructs them and hands them in.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed controllers).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://cvp.example.net`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

/// Parse a controller address: a bare host (`cvp01`, `10.0.0.5:8443`) is
/// reached over HTTPS, a full URL is kept as given.
pub fn controller_url(raw: &str) -> Result<Url, CoreError> {
    Ok(cfgsync_api::CvpClient::base_url_from(raw)?)
}

/// What to do with a generated configlet that has no freshly generated
/// counterpart.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Leave it assigned, in place.
    #[default]
    Keep,
    /// Unassign it and queue it for deletion.
    Remove,
}

/// Knobs for a single `Reconciler::run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Compute and report plans without writing anything.
    pub dry_run: bool,
    /// Restrict to builders with these names. Empty means all.
    pub builders: Vec<String>,
    /// Restrict to devices under the container with this name.
    pub container: Option<String>,
    pub unmatched: UnmatchedPolicy,
    /// Re-submit the assignment of non-compliant devices that show no drift.
    pub check_compliance: bool,
    /// Execute the pending tasks of changed devices after cleanup.
    pub execute_tasks: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_policy_parses_lowercase() {
        assert_eq!(
            "remove".parse::<UnmatchedPolicy>().unwrap(),
            UnmatchedPolicy::Remove
        );
        assert_eq!(UnmatchedPolicy::Keep.to_string(), "keep");
        assert!("drop".parse::<UnmatchedPolicy>().is_err());
    }

    #[test]
    fn bare_controller_host_gets_https() {
        assert_eq!(
            controller_url("cvp01.lab").unwrap().as_str(),
            "https://cvp01.lab/"
        );
        assert!(controller_url("http://[::1").is_err());
    }

    #[test]
    fn defaults_are_conservative() {
        let opts = RunOptions::default();
        assert!(!opts.dry_run);
        assert_eq!(opts.unmatched, UnmatchedPolicy::Keep);
        assert_eq!(TlsVerification::default(), TlsVerification::SystemDefaults);
    }
}
