//! Config subcommand handlers.

use cfgsync_config::{Config, PASSWORD_ENV};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

fn show(cfg: &Config, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(toml::to_string_pretty(cfg)?),
        other => output::render_single(other, cfg, |_| String::new()),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(
                &cfgsync_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = cfgsync_config::load_config()?;
            output::print_output(&show(&cfg, global.output)?, global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = cfgsync_config::load_config()?;
            let (profile_name, profile) = config::effective_profile(&cfg, global)?;
            let who = profile.username.as_deref().unwrap_or("controller user");

            let pw = rpassword::prompt_password(format!(
                "Password for {who} (profile '{profile_name}'): "
            ))?;
            if pw.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            cfgsync_config::store_password(&profile_name, &pw)?;

            eprintln!("Password stored in the OS keyring for profile '{profile_name}'.");
            if std::env::var_os(PASSWORD_ENV).is_some() {
                eprintln!("Note: {PASSWORD_ENV} is set and takes precedence over the keyring.");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cfgsync_config::Profile;

    use super::*;

    #[test]
    fn show_renders_toml_for_tables() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                controller: Some("cvp.lab".into()),
                ..Profile::default()
            },
        );
        let out = show(&cfg, OutputFormat::Table).unwrap();
        assert!(out.contains("[profiles.lab]"));
        assert!(out.contains("controller = \"cvp.lab\""));
        assert!(!out.contains("password"));
    }
}
