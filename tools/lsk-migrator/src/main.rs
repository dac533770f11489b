use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lsk_migrator::{
    config::{self, DEFAULT_KEYS_FILE},
    contract::EthersClaimContract,
    report::{render_summary, write_report},
    JsonRpcOracle, Migrator,
};

/// Claim Lisk legacy balances on the L2 claim contract.
///
/// Every key in the keys file is migrated to the same destination address. Transactions are
/// paid for by the sender key and submitted strictly one after another.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Network name, looked up in the networks file.
    #[arg(long, env = "NETWORK")]
    network: String,

    /// JSON file describing the known networks (claim API url, rpc url, contract address).
    #[arg(long, env = "NETWORKS_FILE", default_value = "networks.json")]
    networks_file: PathBuf,

    /// File with one Lisk private key (hex, 64 bytes) per line.
    #[arg(long, env = "KEYS_FILE", default_value = DEFAULT_KEYS_FILE)]
    keys_file: PathBuf,

    /// Destination address on the L2 (0x...).
    #[arg(long, env = "TARGET_ADDRESS", conflicts_with = "target_address_file")]
    target_address: Option<String>,

    /// File containing the destination address. Defaults to `target_address.txt`.
    #[arg(long, conflicts_with = "target_address")]
    target_address_file: Option<PathBuf>,

    /// Private key of the L2 account paying for the claim transactions (hex, 0x...).
    #[arg(long, env = "SENDER_PRIVATE_KEY", hide_env_values = true, conflicts_with = "sender_key_file")]
    sender_key: Option<String>,

    /// File containing the sender private key. Defaults to `eth_sender_private_key.txt`.
    #[arg(long, conflicts_with = "sender_key")]
    sender_key_file: Option<PathBuf>,

    /// How long to wait for each claim transaction to be mined.
    #[arg(long, default_value_t = 120)]
    confirmation_timeout_secs: u64,

    /// Timeout for single HTTP requests to the claim API and the rpc endpoint.
    #[arg(long, default_value_t = 30)]
    http_timeout_secs: u64,

    /// Write a JSON report of every account's outcome here.
    #[arg(long)]
    report_path: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    // Misconfiguration aborts here, before any account is touched.
    let network = config::resolve_network(&cli.networks_file, &cli.network)?;
    let keys = config::read_private_keys(&cli.keys_file)?;
    let destination = config::resolve_destination(
        cli.target_address.as_deref(),
        cli.target_address_file.as_deref(),
    )?;
    let sender_key =
        config::resolve_sender_key(cli.sender_key.as_deref(), cli.sender_key_file.as_deref())?;

    let http_timeout = Duration::from_secs(cli.http_timeout_secs);
    let oracle = JsonRpcOracle::new(network.claim_api_url.clone(), http_timeout)?;
    let contract = EthersClaimContract::connect(&network, &sender_key, http_timeout).await?;
    info!(
        network = %network.name,
        claim_api = oracle.endpoint(),
        contract = %network.contract_address,
        "network resolved"
    );

    let migrator = Migrator::new(
        network.name.clone(),
        oracle,
        contract,
        destination,
        Duration::from_secs(cli.confirmation_timeout_secs),
    );
    let summary = migrator.run(&keys).await;

    print!("{}", render_summary(&summary));
    if let Some(path) = &cli.report_path {
        write_report(path, &summary)?;
        println!("Report written to {}", path.display());
    }

    Ok(if summary.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
