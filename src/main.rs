// Meridian node - entry point

#![allow(dead_code)]

mod cli;
mod election;
mod ledger;
mod network;
mod node;
mod types;
mod util;

#[cfg(test)]
mod tests;

use clap::Parser;
use cli::config::NodeConfig;
use cli::runner::run_node;
use cli::{Cli, Commands, KeySubcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_filter = if cli.verbose { "debug" } else { &cli.log_level };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter)),
        )
        .init();

    print_banner();

    match cli.command {
        Commands::Run(cmd) => {
            let config = NodeConfig::from_run_cmd(&cmd).map_err(|e| {
                error!("Configuration error: {}", e);
                anyhow::anyhow!("Configuration error: {}", e)
            })?;

            if let Err(e) = run_node(config).await {
                error!("Node error: {}", e);
                return Err(anyhow::anyhow!("Node error: {}", e));
            }
        }

        Commands::Key(cmd) => match cmd.subcommand {
            KeySubcommand::Generate { output, format } => {
                generate_key(output.as_ref(), &format)?;
            }
            KeySubcommand::Inspect { key } => {
                inspect_key(&key)?;
            }
        },
    }

    Ok(())
}

/// Print the Meridian banner
fn print_banner() {
    println!(
        r#"
    ╔═══════════════════════════════════════════╗
    ║              M E R I D I A N              ║
    ║   permissioned chain · weighted election  ║
    ╚═══════════════════════════════════════════╝
    "#
    );
    println!("    Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
}

/// Generate a new Ed25519 node identity
fn generate_key(output: Option<&std::path::PathBuf>, format: &str) -> anyhow::Result<()> {
    use crate::types::NodeId;
    use ed25519_dalek::{SigningKey, VerifyingKey};
    use rand::rngs::OsRng;

    info!("Generating ed25519 node identity");

    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key: VerifyingKey = (&signing_key).into();
    let node_id = NodeId::from_public_key(&verifying_key);

    let secret_hex = hex::encode(signing_key.to_bytes());
    let public_hex = hex::encode(verifying_key.to_bytes());

    match format {
        "json" => {
            let json = serde_json::json!({
                "scheme": "ed25519",
                "secretKey": format!("0x{}", secret_hex),
                "publicKey": format!("0x{}", public_hex),
                "nodeId": format!("0x{}", public_hex),
            });

            let output_str = serde_json::to_string_pretty(&json)?;

            if let Some(path) = output {
                std::fs::write(path, &output_str)?;
                info!("Key saved to: {}", path.display());
            } else {
                println!("{}", output_str);
            }
        }
        "hex" => {
            println!("Secret Key: 0x{}", secret_hex);
            println!("Public Key: 0x{}", public_hex);
            println!("Node ID:    {}", node_id);
        }
        _ => {
            return Err(anyhow::anyhow!("Unknown format: {}", format));
        }
    }

    Ok(())
}

/// Inspect a secret key and show the derived node identity
fn inspect_key(key: &str) -> anyhow::Result<()> {
    use crate::types::NodeId;
    use ed25519_dalek::{SigningKey, VerifyingKey};

    let key_hex = key.strip_prefix("0x").unwrap_or(key);
    let key_bytes = hex::decode(key_hex)?;

    let secret_bytes: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("key must be exactly 32 bytes"))?;

    let signing_key = SigningKey::from_bytes(&secret_bytes);
    let verifying_key: VerifyingKey = (&signing_key).into();
    let node_id = NodeId::from_public_key(&verifying_key);

    println!("Public Key: 0x{}", hex::encode(verifying_key.to_bytes()));
    println!("Node ID:    {}", node_id);

    Ok(())
}
