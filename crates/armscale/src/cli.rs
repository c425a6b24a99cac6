//! Clap derive structures for the `armscale` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// armscale -- App Service autoscale provisioning sample
#[derive(Debug, Parser)]
#[command(
    name = "armscale",
    version,
    about = "Provision an App Service plan with request- and schedule-based autoscale",
    long_about = "Creates a resource group, a web app, an app service plan and an autoscale\n\
        setting through Azure Resource Manager, then deletes the resource group.\n\n\
        Credentials come from CLIENT_ID, CLIENT_SECRET, TENANT_ID and (optionally)\n\
        SUBSCRIPTION_ID. With no subcommand, `run` is assumed.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "ARMSCALE_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Provision everything, attach the autoscale setting, then clean up
    Run,

    /// Print the autoscale setting the builder produces, without contacting Azure
    Policy(PolicyArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct PolicyArgs {
    /// Resource to scale (normally an app service plan id)
    #[arg(long, value_name = "ID")]
    pub target: String,

    /// Resource whose metrics drive the rules (normally a web app id)
    #[arg(long, value_name = "ID")]
    pub metric_source: String,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the effective configuration with secrets masked
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
