//! Copayer credentials CLI
//!
//! Generates, migrates and converts copayer credentials between the full
//! JSON form and the compact export.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use copayer_credentials::{Credentials, CredentialsConfig, LegacyWallet, MnemonicStrength, Network};

#[derive(Parser)]
#[command(name = "credentials_cli")]
#[command(about = "Manage copayer credentials for multisig HD wallets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate new credentials and print the full form
    Generate {
        /// livenet or testnet; defaults to CREDENTIALS_NETWORK
        #[arg(short, long)]
        network: Option<Network>,
        /// Derive from this BIP39 mnemonic instead of random entropy
        #[arg(short, long, conflicts_with = "words")]
        mnemonic: Option<String>,
        /// Generate a new mnemonic of 12 or 24 words and print it with the credentials
        #[arg(short, long)]
        words: Option<MnemonicStrength>,
        /// Mnemonic passphrase
        #[arg(long)]
        passphrase: Option<String>,
    },
    /// Print the compact export of stored credentials
    Export {
        /// Full-form JSON file
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Import a compact export and print the full form
    Import {
        #[arg(short, long)]
        compact: String,
    },
    /// Convert a legacy wallet export and print the full form
    Migrate {
        /// Legacy wallet JSON file
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Summarize stored credentials
    Inspect {
        /// Full-form JSON file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn load(path: &PathBuf) -> Result<Credentials> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Credentials::from_json(&json)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CredentialsConfig::from_env();

    match cli.command {
        Commands::Generate { network, mnemonic, words, passphrase } => {
            let network = network.unwrap_or(config.network);
            match (mnemonic, words) {
                (_, Some(strength)) => {
                    let (credentials, phrase) =
                        Credentials::generate_with_mnemonic(network, strength, passphrase.as_deref())?;
                    info!(copayer_id = %credentials.copayer_id(), words = strength.words(), "Generated credentials");
                    let output = json!({ "mnemonic": phrase, "credentials": credentials.to_record() });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                (Some(phrase), None) => {
                    let credentials = Credentials::from_mnemonic(network, &phrase, passphrase.as_deref())?;
                    info!(copayer_id = %credentials.copayer_id(), "Generated credentials");
                    println!("{}", credentials.to_json()?);
                }
                (None, None) => {
                    if passphrase.is_some() {
                        bail!("--passphrase needs --mnemonic or --words");
                    }
                    let credentials = Credentials::create(network)?;
                    info!(copayer_id = %credentials.copayer_id(), "Generated credentials");
                    println!("{}", credentials.to_json()?);
                }
            }
        }
        Commands::Export { input } => {
            let credentials = load(&input)?;
            println!("{}", credentials.export_compact()?);
        }
        Commands::Import { compact } => {
            let credentials = Credentials::import_compact_with(&compact, &config)?;
            println!("{}", credentials.to_json()?);
        }
        Commands::Migrate { input } => {
            let json = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
            let credentials = Credentials::from_legacy(&LegacyWallet::from_json(&json)?)?;
            println!("{}", credentials.to_json()?);
        }
        Commands::Inspect { input } => {
            let credentials = load(&input)?;
            let summary = json!({
                "copayerId": credentials.copayer_id(),
                "network": credentials.network(),
                "canSign": credentials.can_sign(),
                "hasWalletInfo": credentials.has_wallet_info(),
                "m": credentials.m(),
                "n": credentials.n(),
                "copayers": credentials.public_key_ring().len(),
                "isComplete": credentials.is_complete(),
                "hasTemporaryRequestKeys": credentials.has_temporary_request_keys(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
