//! Token deployment binary
//!
//! Creates the ledger from configuration, starts the submission actor and
//! prints a deployment report as JSON.

use anyhow::Context;
use serde::Serialize;
use token_ledger::{
    spawn_ledger_actor, units::format_units, Config, KeyPair, Signer, TokenLedger,
};

#[derive(Serialize)]
struct DeploymentReport {
    deployer: String,
    owner: String,
    token_name: String,
    token_symbol: String,
    decimals: u8,
    initial_supply: u64,
    max_supply: u64,
    owner_balance: String,
    deployed_at: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting token deployment");

    // Load configuration
    let config = match std::env::var("TOKEN_LEDGER_CONFIG") {
        Ok(path) => Config::from_file(&path).with_context(|| format!("loading {}", path))?,
        Err(_) => Config::from_env().context("loading config from environment")?,
    };

    let deployer = KeyPair::generate();
    tracing::info!(deployer = %deployer.address(), "Deploying with account");

    let params = config.token.deploy_params(deployer.address())?;
    tracing::info!(
        name = %params.name,
        symbol = %params.symbol,
        decimals = params.decimals,
        initial_supply = %params.initial_supply,
        max_supply = %params.max_supply,
        owner = %params.owner,
        "Token parameters"
    );

    let (ledger, events) = TokenLedger::deploy(params).context("deploying token")?;
    for event in &events {
        tracing::info!(%event, "deployment event");
    }

    let handle = spawn_ledger_actor(
        ledger,
        config.submission.mailbox_capacity,
        config.submission.event_capacity,
    )?;

    // Verify deployment
    let info = handle.token_info().await?;
    let owner = handle.owner().await?;
    let owner_balance = handle.balance_of(owner).await?;
    tracing::info!(
        total_supply = %format_units(info.total_supply, info.decimals),
        max_supply = %format_units(info.max_supply, info.decimals),
        "Deployment verified"
    );

    let report = DeploymentReport {
        deployer: deployer.address().to_string(),
        owner: owner.to_string(),
        token_name: info.name,
        token_symbol: info.symbol,
        decimals: info.decimals,
        initial_supply: config.token.initial_supply,
        max_supply: config.token.max_supply,
        owner_balance: format_units(owner_balance, info.decimals),
        deployed_at: chrono::Utc::now().to_rfc3339(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    handle.shutdown().await?;
    tracing::info!("Deployment complete");
    Ok(())
}
