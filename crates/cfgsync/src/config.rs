//! Flag-aware configuration resolution.
//!
//! Layers `GlobalOpts` over the loaded profile, then resolves the password
//! (env, keyring, interactive prompt) and builds the core `ControllerConfig`.

use std::io::IsTerminal;

use secrecy::SecretString;

use cfgsync_config::{Config, Profile};
use cfgsync_core::{ControllerConfig, UnmatchedPolicy};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a controller-bound command needs.
pub struct Resolved {
    pub profile_name: String,
    pub controller: ControllerConfig,
    /// Profile default for `reconcile --unmatched`.
    pub unmatched: UnmatchedPolicy,
}

/// The profile selected by `--profile` (or `default_profile`), with flag
/// overrides applied.
///
/// An explicitly requested profile must exist; the implicit default may be
/// absent, in which case flags alone have to be enough.
pub fn effective_profile(cfg: &Config, global: &GlobalOpts) -> Result<(String, Profile), CliError> {
    let name = cfg.active_profile_name(global.profile.as_deref());

    let mut profile = match cfg.profiles.get(&name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            let available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    if let Some(ref cvp) = global.cvp {
        profile.controller = Some(cvp.clone());
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    Ok((name, profile))
}

/// Resolve a complete controller configuration, prompting for the password
/// when neither the environment nor the keyring has one.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = cfgsync_config::load_config()?;
    let (profile_name, profile) = effective_profile(&cfg, global)?;
    let path = cfgsync_config::config_path().display().to_string();

    let Some(controller) = profile.controller.as_deref() else {
        return Err(CliError::MissingSetting {
            field: "controller".into(),
            flag: "--cvp".into(),
            path,
        });
    };
    let Some(username) = profile.username.as_deref() else {
        return Err(CliError::MissingSetting {
            field: "username".into(),
            flag: "--username".into(),
            path,
        });
    };

    let password = match cfgsync_config::resolve_password(&profile_name) {
        Some(pw) => pw,
        None => prompt_password(username, controller, &profile_name)?,
    };

    let unmatched = profile.unmatched.unwrap_or(cfg.defaults.unmatched);
    let controller = cfgsync_config::profile_to_controller_config(
        &profile,
        &profile_name,
        &cfg.defaults,
        password,
    )?;

    Ok(Resolved {
        profile_name,
        controller,
        unmatched,
    })
}

/// Ask for the password on the terminal without echo.
fn prompt_password(
    username: &str,
    controller: &str,
    profile_name: &str,
) -> Result<SecretString, CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    }
    let pw = rpassword::prompt_password(format!("Password for {username}@{controller}: "))?;
    if pw.is_empty() {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    }
    Ok(SecretString::from(pw))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["cfgsync"];
        argv.extend_from_slice(args);
        argv.push("inventory");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_lab() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                controller: Some("cvp.lab".into()),
                username: Some("cvpadmin".into()),
                timeout: Some(60),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with_lab();
        let (name, profile) = effective_profile(
            &cfg,
            &global(&["-p", "lab", "--cvp", "10.0.0.5", "-k", "--timeout", "5"]),
        )
        .unwrap();

        assert_eq!(name, "lab");
        assert_eq!(profile.controller.as_deref(), Some("10.0.0.5"));
        assert_eq!(profile.username.as_deref(), Some("cvpadmin"));
        assert_eq!(profile.insecure, Some(true));
        assert_eq!(profile.timeout, Some(5));
    }

    #[test]
    fn unknown_explicit_profile_is_an_error() {
        let err = effective_profile(&config_with_lab(), &global(&["-p", "prod"])).unwrap_err();
        assert!(
            matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "lab")
        );
    }

    #[test]
    fn missing_default_profile_falls_back_to_flags() {
        let (name, profile) =
            effective_profile(&Config::default(), &global(&["--cvp", "cvp01", "-u", "ops"]))
                .unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.controller.as_deref(), Some("cvp01"));
        assert_eq!(profile.username.as_deref(), Some("ops"));
        assert_eq!(profile.insecure, None);
    }
}
