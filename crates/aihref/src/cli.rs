//! Clap derive structures for the `aihref` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only clap types live here: `build.rs` compiles this file on its own.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aihref -- portfolio analytics from the command line
#[derive(Debug, Parser)]
#[command(
    name = "aihref",
    version,
    about = "Web analytics for every AIHref site from the command line",
    long_about = "Query per-site and combined visitor analytics from the AIHref\n\
        analytics backend, trigger aggregation, and ask for AI insights.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "AIHREF_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Analytics backend URL (overrides profile)
    #[arg(long, short = 'b', env = "AIHREF_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "AIHREF_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "AIHREF_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "AIHREF_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Reporting window.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RangeArg {
    /// Last 7 days
    #[default]
    #[value(name = "7d")]
    Week,
    /// Last calendar month
    #[value(name = "1m")]
    Month,
    /// Last 30 days
    #[value(name = "30d")]
    ThirtyDays,
    /// Last year
    #[value(name = "1y")]
    Year,
    /// Last 5 years
    #[value(name = "5y")]
    FiveYears,
    /// Everything on record
    #[value(name = "all")]
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CombineModeArg {
    /// Fetch every site and combine locally
    Client,
    /// Use the backend's own combined endpoint
    Backend,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the configured sites
    #[command(alias = "ls")]
    Sites,

    /// Show one site's analytics
    #[command(alias = "s")]
    Site(SiteArgs),

    /// Show analytics combined across every site
    #[command(alias = "c")]
    Combined(CombinedArgs),

    /// Show daily visitor trends
    Trends(TrendsArgs),

    /// Trigger backend aggregation now
    Aggregate,

    /// Ask the AI service about your traffic
    #[command(alias = "ai")]
    Insights(InsightsArgs),

    /// Check backend service health
    Health,

    /// Refresh the combined view periodically
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ANALYTICS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SiteArgs {
    /// Site ID (see `aihref sites`)
    pub site_id: String,

    /// Reporting window
    #[arg(long, short = 'r', default_value = "7d")]
    pub range: RangeArg,

    /// Show only the lightweight summary
    #[arg(long)]
    pub summary: bool,
}

#[derive(Debug, Args)]
pub struct CombinedArgs {
    /// Reporting window
    #[arg(long, short = 'r', default_value = "7d")]
    pub range: RangeArg,

    /// Where to combine (overrides profile)
    #[arg(long, short = 'm')]
    pub mode: Option<CombineModeArg>,
}

#[derive(Debug, Args)]
pub struct TrendsArgs {
    /// Site ID; omit for the combined series
    pub site_id: Option<String>,

    /// Reporting window
    #[arg(long, short = 'r', default_value = "7d")]
    pub range: RangeArg,

    /// Estimate each site's share of the combined series
    #[arg(long, conflicts_with = "site_id")]
    pub by_site: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Reporting window
    #[arg(long, short = 'r', default_value = "7d")]
    pub range: RangeArg,

    /// Refresh interval (e.g. "30s", "5m")
    #[arg(long, short = 'i', default_value = "30s")]
    pub interval: String,

    /// Stop after this many refreshes
    #[arg(long, short = 'n')]
    pub count: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INSIGHTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InsightsArgs {
    #[command(subcommand)]
    pub command: InsightsCommand,
}

#[derive(Debug, Subcommand)]
pub enum InsightsCommand {
    /// Ask a free-form question
    Ask {
        /// The question, e.g. "Why did traffic drop last week?"
        query: String,

        /// Site ID; omit to ask about every site
        #[arg(long, short = 's')]
        site: Option<String>,

        /// Reporting window
        #[arg(long, short = 'r', default_value = "7d")]
        range: RangeArg,

        /// Include trend analysis
        #[arg(long)]
        trends: bool,

        /// Include predictions
        #[arg(long)]
        predictions: bool,
    },

    /// Canned overview without a question
    Quick {
        /// Site ID; omit for every site
        #[arg(long, short = 's')]
        site: Option<String>,

        /// Reporting window
        #[arg(long, short = 'r', default_value = "7d")]
        range: RangeArg,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
