//! Clap derive structures for the `edgesite` CLI.
//!
//! Only clap types live here so `build.rs` can include this file to render
//! man pages and completions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// edgesite -- converge edge-site LAN interfaces from declared files
#[derive(Debug, Parser)]
#[command(
    name = "edgesite",
    version,
    about = "Converge edge-site LAN interface and native range configuration",
    long_about = "Reads a declared site file (YAML or JSON), moves the native range to \
        the requested interface slot when needed, updates the range and the interface, \
        and records the observed state in a state file.",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "EDGESITE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Control-plane endpoint (overrides profile)
    #[arg(long, short = 'e', env = "EDGESITE_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Account id (overrides profile)
    #[arg(long, env = "EDGESITE_ACCOUNT", global = true)]
    pub account: Option<String>,

    /// Control-plane API key
    #[arg(long, env = "EDGESITE_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EDGESITE_OUTPUT",
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

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "EDGESITE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "EDGESITE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

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

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a declared site file without contacting the control-plane
    Validate(DeclaredArgs),

    /// Show the resolved default slot and whether a reassignment would run
    Plan(PlanArgs),

    /// Converge a site to its declared configuration
    Apply(ApplyArgs),

    /// Re-read a tracked site and rewrite its state file
    Refresh(RefreshArgs),

    /// List the interface slots of a site
    Slots(SlotsArgs),

    /// Remove a site from the control-plane
    Destroy(DestroyArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Site lifecycle ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeclaredArgs {
    /// Declared site file (.yaml, .yml or .json)
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub declared: DeclaredArgs,

    /// State file from a previous apply
    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub declared: DeclaredArgs,

    /// State file: converged against when present, written after success
    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// State file to refresh
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(Debug, Args)]
pub struct SlotsArgs {
    /// Site id
    #[arg(long)]
    pub site: String,

    /// Connection type (e.g. SOCKET_X1600)
    #[arg(long = "connection-type", short = 't')]
    pub connection_type: String,
}

#[derive(Debug, Args)]
pub struct DestroyArgs {
    /// Site id
    #[arg(long)]
    pub site: String,

    /// State file to delete once the site is gone
    #[arg(long)]
    pub state: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the loaded configuration (secrets redacted)
    Show,

    /// List profiles
    Profiles,

    /// Create or update a profile
    SetProfile {
        /// Profile name
        name: String,

        /// Control-plane endpoint
        #[arg(long)]
        endpoint: String,

        /// Account id
        #[arg(long)]
        account: String,

        /// Environment variable holding the API key
        #[arg(long)]
        api_key_env: Option<String>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Store a profile's API key in the system keyring
    SetKey {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
