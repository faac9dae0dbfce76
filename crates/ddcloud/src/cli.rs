//! Clap derive structures for the `ddcloud` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ddcloud -- drive CloudControl firewall rules from declarative files
#[derive(Debug, Parser)]
#[command(
    name = "ddcloud",
    version,
    about = "Manage CloudControl firewall rules from the command line",
    long_about = "Creates, refreshes, updates and deletes CloudControl firewall rules\n\
        declared in TOML files. Remote identity is tracked in a JSON state file.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "DDCLOUD_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API endpoint URL (overrides profile)
    #[arg(long, env = "DDCLOUD_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Region short name, e.g. "au" (overrides profile)
    #[arg(long, env = "DDCLOUD_REGION", global = true)]
    pub region: Option<String>,

    /// Organization ID (overrides profile)
    #[arg(long, env = "DDCLOUD_ORGANIZATION", global = true)]
    pub organization: Option<String>,

    /// API username (overrides profile)
    #[arg(long, short = 'u', env = "DDCLOUD_USERNAME", global = true)]
    pub username: Option<String>,

    /// API password
    #[arg(long, env = "DDCLOUD_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DDCLOUD_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "DDCLOUD_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "DDCLOUD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Deployment poll interval in seconds
    #[arg(long, env = "DDCLOUD_POLL_INTERVAL", global = true)]
    pub poll_interval: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage a firewall rule declared in a TOML file
    #[command(alias = "fw")]
    Rule(RuleArgs),

    /// Show the firewall rule field schema
    Schema,
}

// ── Rule ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RuleArgs {
    #[command(subcommand)]
    pub command: RuleCommand,
}

#[derive(Debug, Subcommand)]
pub enum RuleCommand {
    /// Check a rule file and print the request it would send
    Validate {
        /// Rule declaration (TOML)
        file: PathBuf,
    },

    #[command(flatten)]
    Lifecycle(LifecycleCommand),
}

/// Rule commands that talk to the API.
#[derive(Debug, Subcommand)]
pub enum LifecycleCommand {
    /// Create the rule and wait for it to deploy
    Create {
        /// Rule declaration (TOML)
        file: PathBuf,

        /// State file to write
        #[arg(long, short = 's')]
        state: PathBuf,
    },

    /// Refresh the rule's state from the API
    Read {
        /// State file to refresh
        #[arg(long, short = 's')]
        state: PathBuf,
    },

    /// Apply in-place changes (only `enabled`)
    Update {
        /// Rule declaration (TOML)
        file: PathBuf,

        /// State file to update
        #[arg(long, short = 's')]
        state: PathBuf,
    },

    /// Delete the rule and wait for it to disappear
    #[command(alias = "rm")]
    Delete {
        /// State file of the rule to delete
        #[arg(long, short = 's')]
        state: PathBuf,
    },
}
