//! TON to Stellar bridge command line.
//!
//! Stands in for the Mini App UI: derives the Stellar address of a TON key,
//! reads balances, funds testnet accounts and sends XLM. The TON wallet is
//! simulated by a local Ed25519 key (`--ton-secret` / `TON_SECRET_KEY`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use ton_stellar_bridge::{
    Bridge, BridgeConfig, Memo, Network, NoWallet, PaymentIntent, SignedEnvelope, WalletConnector,
};
use ton_stellar_bridge::transaction::{Asset, OperationBody};
use ton_stellar_bridge::wallet::LocalTonWallet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ton-stellar", version, about = "Use a TON wallet key with the Stellar network")]
struct Cli {
    /// JSON bridge configuration (Horizon URLs, friendbot, fees).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive the placeholder Stellar address of a TON public key.
    Derive {
        /// TON public key, hex.
        ton_public_key: String,

        /// Also print the derived S... secret.
        #[arg(long)]
        show_secret: bool,
    },

    /// Generate a random Stellar keypair unrelated to any TON key.
    Generate,

    /// Show native XLM balances on testnet and mainnet.
    Balances { address: String },

    /// Fund a testnet account through friendbot.
    Fund { address: String },

    /// Build, sign and (unless --sign-only) submit an XLM payment.
    Send {
        /// TON wallet secret key, 32 bytes hex.
        #[arg(long, env = "TON_SECRET_KEY", hide_env_values = true)]
        ton_secret: String,

        /// TON wallet address (defaults to the raw 0:<pubkey> form).
        #[arg(long)]
        ton_address: Option<String>,

        /// Source account (defaults to the address derived from the wallet).
        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: String,

        /// Amount in XLM, up to 7 decimals.
        #[arg(long)]
        amount: String,

        #[arg(long, default_value = "testnet")]
        network: Network,

        #[arg(long)]
        memo: Option<String>,

        /// Print the signed envelope instead of submitting it.
        #[arg(long)]
        sign_only: bool,
    },

    /// Submit a base64 signed envelope.
    Submit {
        envelope: String,

        #[arg(long, default_value = "testnet")]
        network: Network,
    },

    /// Decode a base64 signed envelope.
    Inspect {
        envelope: String,

        /// Network whose passphrase the hash is computed under.
        #[arg(long, default_value = "testnet")]
        network: Network,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ton_stellar_bridge=info,ton_stellar=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BridgeConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => BridgeConfig::default(),
    }
    .with_env_overrides();

    match cli.command {
        Command::Derive { ton_public_key, show_secret } => {
            let keypair = ton_stellar_bridge::derive_stellar_keypair(&ton_public_key)
                .context("Failed to derive Stellar address")?;
            let secret = show_secret.then(|| keypair.secret_seed());

            if cli.json {
                println!("{}", json!({ "address": keypair.public_key(), "secret": secret }));
            } else {
                println!("{}", keypair.public_key());
                if let Some(secret) = secret {
                    println!("secret: {}", secret);
                }
            }
        }

        Command::Generate => {
            let keypair = ton_stellar_bridge::generate_random_keypair();
            if cli.json {
                println!(
                    "{}",
                    json!({ "address": keypair.public_key(), "secret": keypair.secret_seed() })
                );
            } else {
                println!("address: {}", keypair.public_key());
                println!("secret:  {}", keypair.secret_seed());
            }
        }

        Command::Balances { address } => {
            let bridge = connect(config, Arc::new(NoWallet))?;
            let balances = bridge.check_balances(&address).await;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&balances)?);
            } else {
                println!("testnet: {} XLM", balances.testnet.native_balance);
                println!("mainnet: {} XLM", balances.mainnet.native_balance);
            }
        }

        Command::Fund { address } => {
            let bridge = connect(config, Arc::new(NoWallet))?;
            let balances = bridge
                .fund_testnet(&address)
                .await
                .context("Friendbot funding failed")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&balances)?);
            } else {
                println!("funded {}", address);
                println!("testnet: {} XLM", balances.testnet.native_balance);
                println!("{}", bridge.config().testnet.explorer_account_url(&address));
            }
        }

        Command::Send {
            ton_secret,
            ton_address,
            from,
            to,
            amount,
            network,
            memo,
            sign_only,
        } => {
            let wallet = LocalTonWallet::from_secret_hex(&ton_secret, ton_address.as_deref())
                .context("Invalid TON wallet key")?;
            let bridge = connect(config, Arc::new(wallet))?;

            let from = match from {
                Some(from) => from,
                None => bridge.wallet_address()?,
            };

            let mut intent = PaymentIntent::new(from, to, amount, network);
            if let Some(memo) = memo {
                intent = intent.with_memo(memo);
            }

            if sign_only {
                let envelope = bridge
                    .sign_payment(&intent)
                    .await
                    .context("Failed to sign payment")?;
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                } else {
                    println!("{}", envelope);
                }
                return Ok(());
            }

            let receipt = bridge
                .send_payment(&intent)
                .await
                .context("Payment failed")?;
            let explorer = bridge.config().network(network).explorer_tx_url(&receipt.submission.hash);

            if cli.json {
                println!("{}", json!({ "receipt": receipt, "explorer": explorer }));
            } else {
                println!("hash: {}", receipt.submission.hash);
                if let Some(ledger) = receipt.submission.ledger {
                    println!("ledger: {}", ledger);
                }
                println!("{}", explorer);
            }
        }

        Command::Submit { envelope, network } => {
            let bridge = connect(config, Arc::new(NoWallet))?;
            let result = bridge
                .submit_signed(&SignedEnvelope::from_wire(envelope), network)
                .await
                .context("Submission failed")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("hash: {}", result.hash);
                println!(
                    "{}",
                    bridge.config().network(network).explorer_tx_url(&result.hash)
                );
            }
        }

        Command::Inspect { envelope, network } => {
            let passphrase = &config.network(network).network_passphrase;
            let decoded = SignedEnvelope::from_wire(envelope)
                .decode(passphrase)
                .context("Not a valid transaction envelope")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&decoded)?);
                return Ok(());
            }

            let tx = &decoded.envelope.tx;
            println!("hash:       {}", decoded.hash);
            println!("source:     {}", tx.source_account);
            println!("sequence:   {}", tx.sequence);
            println!("fee:        {} stroops", tx.fee);
            if let Some(bounds) = tx.time_bounds {
                println!("valid:      {}..{}", bounds.min_time, bounds.max_time);
            }
            match &tx.memo {
                Memo::None => {}
                Memo::Text(text) => println!("memo:       {}", text),
                Memo::Id(id) => println!("memo id:    {}", id),
                Memo::Hash(hash) | Memo::Return(hash) => println!("memo hash:  {}", hex::encode(hash)),
            }
            for op in &tx.operations {
                let OperationBody::Payment(payment) = &op.body;
                let asset = match &payment.asset {
                    Asset::Native => "XLM".to_string(),
                    Asset::CreditAlphaNum4 { code, issuer }
                    | Asset::CreditAlphaNum12 { code, issuer } => format!("{}:{}", code, issuer),
                };
                println!("payment:    {} {} -> {}", payment.amount, asset, payment.destination);
            }
            println!("signatures: {}", decoded.envelope.signatures.len());
        }
    }

    Ok(())
}

fn connect(config: BridgeConfig, wallet: Arc<dyn WalletConnector>) -> Result<Bridge> {
    tracing::debug!(
        "Horizon testnet: {}, mainnet: {}, friendbot: {}",
        config.testnet.horizon_url,
        config.mainnet.horizon_url,
        config.friendbot_url
    );
    Bridge::from_config(config, wallet).context("Failed to set up bridge")
}
