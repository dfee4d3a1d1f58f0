//! Configuration for the cfgsync CLI.
//!
//! TOML profiles, password resolution (env + keyring), and translation to
//! `cfgsync_core::ControllerConfig`. The CLI layers flag overrides and the
//! interactive prompt on top.

use std::collections::BTreeMap;
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

use cfgsync_core::{ControllerConfig, TlsVerification, UnmatchedPolicy};

/// Keyring service name; entries are `<profile>/password`.
pub const KEYRING_SERVICE: &str = "cfgsync";

/// Environment variable checked first for the controller password.
pub const PASSWORD_ENV: &str = "CFGSYNC_PASSWORD";

/// Request timeout when neither profile nor flag sets one (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {field} configured for profile '{profile}'")]
    Missing { field: String, profile: String },

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

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit choice, then `default_profile`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(ToOwned::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub unmatched: UnmatchedPolicy,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            unmatched: UnmatchedPolicy::default(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// A named controller profile.
///
/// There is deliberately no password field: passwords come from the
/// environment, the OS keyring, or a prompt.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller host or URL (e.g., "cvp01.lab" or "https://10.0.0.5").
    pub controller: Option<String>,

    pub username: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept self-signed certificates.
    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Policy for generated configlets without a fresh counterpart.
    pub unmatched: Option<UnmatchedPolicy>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "cfgsync", "cfgsync").map_or_else(
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
    p.push("cfgsync");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// `CFGSYNC_` variables override file values; nested keys use `__`, e.g.
/// `CFGSYNC_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CFGSYNC_").ignore(&["PASSWORD"]).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credential resolution (without prompting) ───────────────────────

/// Look up the password: `CFGSYNC_PASSWORD`, then the OS keyring.
///
/// `None` means the caller has to prompt.
pub fn resolve_password(profile_name: &str) -> Option<SecretString> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Some(SecretString::from(pw));
        }
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Some(SecretString::from(pw));
        }
    }

    None
}

/// Store a password in the OS keyring for a profile.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })?;
    entry
        .set_password(password)
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── Profile → ControllerConfig ──────────────────────────────────────

/// Build a `ControllerConfig` from a fully merged profile.
///
/// Profile values win over `defaults`; `password` is already resolved.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    password: SecretString,
) -> Result<ControllerConfig, ConfigError> {
    let raw = profile
        .controller
        .as_deref()
        .ok_or_else(|| ConfigError::Missing {
            field: "controller".into(),
            profile: profile_name.into(),
        })?;
    let url = cfgsync_core::controller_url(raw).map_err(|_| ConfigError::Validation {
        field: "controller".into(),
        reason: format!("invalid address: {raw}"),
    })?;

    let username = profile
        .username
        .clone()
        .ok_or_else(|| ConfigError::Missing {
            field: "username".into(),
            profile: profile_name.into(),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(ControllerConfig {
        url,
        username,
        password,
        tls,
        timeout,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile() -> Profile {
        Profile {
            controller: Some("cvp01.lab".into()),
            username: Some("cvpadmin".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, DEFAULT_TIMEOUT_SECS);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "lab"

[defaults]
timeout = 60

[profiles.lab]
controller = "https://cvp.lab"
username = "cvpadmin"
insecure = true
unmatched = "remove"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.active_profile_name(None), "lab");
        assert_eq!(cfg.active_profile_name(Some("prod")), "prod");
        assert_eq!(cfg.defaults.timeout, 60);
        let lab = &cfg.profiles["lab"];
        assert_eq!(lab.unmatched, Some(UnmatchedPolicy::Remove));
        assert_eq!(lab.insecure, Some(true));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert("lab".into(), profile());

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profiles["lab"].controller.as_deref(),
            Some("cvp01.lab")
        );
    }

    #[test]
    fn controller_config_from_profile() {
        let config = profile_to_controller_config(
            &profile(),
            "lab",
            &Defaults::default(),
            SecretString::from("pw"),
        )
        .unwrap();

        assert_eq!(config.url.as_str(), "https://cvp01.lab/");
        assert_eq!(config.username, "cvpadmin");
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let p = Profile {
            insecure: Some(true),
            ca_cert: Some("/etc/ssl/cvp.pem".into()),
            timeout: Some(5),
            ..profile()
        };
        let config =
            profile_to_controller_config(&p, "lab", &Defaults::default(), SecretString::from("pw"))
                .unwrap();
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn ca_cert_is_used_when_verifying() {
        let p = Profile {
            ca_cert: Some("/etc/ssl/cvp.pem".into()),
            ..profile()
        };
        let config =
            profile_to_controller_config(&p, "lab", &Defaults::default(), SecretString::from("pw"))
                .unwrap();
        assert_eq!(
            config.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/cvp.pem"))
        );
    }

    #[test]
    fn missing_controller_is_reported() {
        let p = Profile {
            controller: None,
            ..profile()
        };
        let err =
            profile_to_controller_config(&p, "lab", &Defaults::default(), SecretString::from("pw"))
                .unwrap_err();
        assert_eq!(err.to_string(), "no controller configured for profile 'lab'");
    }
}
