//! Clap derive structures for the `cfgsync` CLI.
//!
//! Also compiled by `build.rs` for man pages, so this file may only depend
//! on clap and clap_complete.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cfgsync -- keep builder-generated configlets in sync
#[derive(Debug, Parser)]
#[command(
    name = "cfgsync",
    version,
    about = "Reconcile builder-generated configlets on a provisioning controller",
    long_about = "Regenerates configlets from every configlet builder assigned to a \
        device,\nreplaces the ones whose configuration changed, restores generated \
        configlets\nthat were removed by mistake, and deletes the superseded ones.\n\n\
        The password is read from CFGSYNC_PASSWORD, the OS keyring, or an\n\
        interactive prompt. It is never accepted on the command line.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller hostname, IP, or URL (overrides profile)
    #[arg(long = "cvp", short = 'c', env = "CFGSYNC_CONTROLLER", global = true)]
    pub cvp: Option<String>,

    /// Controller username (overrides profile)
    #[arg(long, short = 'u', env = "CFGSYNC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Configuration profile to use
    #[arg(long, short = 'p', env = "CFGSYNC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CFGSYNC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 180]
    #[arg(long, env = "CFGSYNC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CFGSYNC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Log line format on stderr
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors, print no results
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Regenerate configlets and re-assign the ones that changed
    #[command(alias = "sync")]
    Reconcile(ReconcileArgs),

    /// Show devices, their assigned configlets, and builders
    #[command(alias = "inv")]
    Inventory,

    /// Inspect CLI configuration and store credentials
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Reconcile ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Compute and show the plan without changing anything
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Only reconcile configlets of this builder (repeatable)
    #[arg(long = "builder", short = 'b', value_name = "NAME")]
    pub builders: Vec<String>,

    /// Only reconcile devices in this container
    #[arg(long, value_name = "NAME")]
    pub container: Option<String>,

    /// What to do with generated configlets that have no fresh counterpart
    #[arg(long, value_name = "POLICY")]
    pub unmatched: Option<UnmatchedArg>,

    /// Re-submit devices without drift that report non-compliant
    #[arg(long)]
    pub check_compliance: bool,

    /// Execute pending tasks of changed devices after cleanup
    #[arg(long)]
    pub execute: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnmatchedArg {
    /// Leave the configlet assigned
    Keep,
    /// Unassign and delete the configlet
    Remove,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration file path
    Path,

    /// Show the effective configuration
    Show,

    /// Prompt for a password and store it in the OS keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
