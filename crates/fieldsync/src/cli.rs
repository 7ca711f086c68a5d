//! Clap derive structures for the `fieldsync` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

use fieldsync_core::AlertSeverity;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fieldsync -- query and watch a field-sensor monitoring service
#[derive(Debug, Parser)]
#[command(
    name = "fieldsync",
    version,
    about = "Query and watch field-sensor monitoring services",
    long_about = "Fetches sensors, realtime readings, alerts and reports from a\n\
        monitoring service, keeps them in a local store, and can poll the\n\
        service continuously with `fieldsync watch`.",
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
    /// Deployment profile to use
    #[arg(long, short = 'p', env = "FIELDSYNC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service base URL (overrides the profile)
    #[arg(long, env = "FIELDSYNC_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FIELDSYNC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityFilter {
    Info,
    Warning,
    Critical,
}

impl From<SeverityFilter> for AlertSeverity {
    fn from(filter: SeverityFilter) -> Self {
        match filter {
            SeverityFilter::Info => Self::Info,
            SeverityFilter::Warning => Self::Warning,
            SeverityFilter::Critical => Self::Critical,
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List sensors
    #[command(alias = "ls")]
    Sensors,

    /// Show one sensor in detail
    Sensor {
        /// Sensor id or alias
        id: String,
    },

    /// Latest readings from the realtime feed
    #[command(alias = "rt")]
    Realtime,

    /// List active alerts
    Alerts {
        /// Only show alerts of this severity
        #[arg(long, short = 's')]
        severity: Option<SeverityFilter>,
    },

    /// Resolve an active alert
    Resolve {
        /// Alert id
        id: String,
    },

    /// List reports
    Reports,

    /// Refresh everything and print aggregate statistics
    Stats,

    /// Poll the service and print a line per update until Ctrl-C
    Watch(WatchArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Polling interval in seconds (defaults to the profile's)
    #[arg(long, short = 'i', value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with a profile
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
