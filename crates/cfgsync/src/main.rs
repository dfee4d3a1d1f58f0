mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cfgsync_core::Session;

use crate::cli::{Cli, Command, LogFormat};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.quiet, cli.global.log_format);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Default level is `info`; `RUST_LOG` overrides the verbosity flags.
/// Logs go to stderr; stdout carries only rendered results.
fn init_tracing(verbosity: u8, quiet: bool, format: LogFormat) {
    let filter = match (quiet, verbosity) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "info,cfgsync_core=debug",
        (false, 2) => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a controller connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "cfgsync", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let resolved = config::resolve(&cli.global)?;
            let session = Session::connect(&resolved.controller)
                .await
                .map_err(|e| CliError::from(e).with_profile(&resolved.profile_name))?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, session.client(), &resolved, &cli.global).await;
            session.disconnect().await;
            result
        }
    }
}
