// CLI - command line interface for the Meridian node
// Principle: clear mapping between user input and internal configuration

pub mod config;
pub mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Meridian node - permissioned blockchain with telemetry-weighted elections
#[derive(Parser, Debug)]
#[command(name = "meridian-node")]
#[command(author = "Meridian Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Meridian blockchain node")]
#[command(long_about = r#"
Meridian is a permissioned blockchain node. Each round it scores the
connected peers on transaction throughput, bandwidth and account balance,
then nominates a primary and a backup candidate for block production.

Run a node:
  meridian-node run

Run a standalone node against a synthetic peer set:
  meridian-node run --dev
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", env = "MERIDIAN_LOG")]
    pub log_level: String,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the node
    Run(RunCmd),

    /// Key management
    Key(KeyCmd),
}

/// Run the node
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Node name for telemetry
    #[arg(long, env = "MERIDIAN_NAME")]
    pub name: Option<String>,

    /// Seconds between election rounds
    #[arg(long, default_value = "6", env = "MERIDIAN_ROUND_INTERVAL")]
    pub round_interval: u64,

    /// Active validator-set size; pools up to this size rotate uniformly
    #[arg(long, default_value = "21")]
    pub validator_set_size: usize,

    /// Size of the ranked slice the primary winner is drawn from
    #[arg(long, default_value = "31")]
    pub ranking_window: usize,

    /// Weight of the transaction-throughput signal
    #[arg(long, default_value = "0.6")]
    pub tx_rate_weight: f64,

    /// Weight of the bandwidth signal
    #[arg(long, default_value = "0.3")]
    pub bandwidth_weight: f64,

    /// Weight of the account-balance signal
    #[arg(long, default_value = "0.1")]
    pub balance_weight: f64,

    /// Seed a synthetic peer set and funded ledger (standalone testing)
    #[arg(long)]
    pub dev: bool,

    /// Number of synthetic peers in dev mode
    #[arg(long, default_value = "32", requires = "dev")]
    pub dev_peers: usize,

    /// Node identity key file (generated with `key generate`)
    #[arg(long, env = "MERIDIAN_NODE_KEY")]
    pub node_key: Option<PathBuf>,
}

/// Key management
#[derive(Parser, Debug)]
pub struct KeyCmd {
    #[command(subcommand)]
    pub subcommand: KeySubcommand,
}

/// Key subcommands
#[derive(Subcommand, Debug)]
pub enum KeySubcommand {
    /// Generate a new Ed25519 node identity
    Generate {
        /// Write the key to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (json, hex)
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Inspect a key and show the derived node identity
    Inspect {
        /// Secret key as hex (with or without 0x prefix)
        key: String,
    },
}
