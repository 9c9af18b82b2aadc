//! Connects the local wallet, renders its account state, and triggers one
//! deploy-and-install run.

use alloy::{
    signers::local::PrivateKeySigner, transports::http::reqwest::Url,
};
use eyre::{Context, Result};
use proxy_installer::{
    AlloyChain, InstallConfig, LocalWallet, Orchestrator, Status,
    WalletConnection, OP_SEPOLIA_CHAIN_ID, RPC_URL_ENV_VAR,
};
use tracing_subscriber::EnvFilter;

const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// Load the `name` environment variable.
fn env(name: &str) -> Result<String> {
    std::env::var(name).wrap_err(format!("failed to load {name}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rpc_url: Url = env(RPC_URL_ENV_VAR)?
        .parse()
        .wrap_err("RPC_URL is not a valid URL")?;
    let signer: PrivateKeySigner = env(PRIVATE_KEY_ENV_VAR)?
        .parse()
        .wrap_err("PRIVATE_KEY is not a valid private key")?;

    let mut wallet = LocalWallet::new(signer.clone(), OP_SEPOLIA_CHAIN_ID);
    for connector in wallet.connectors() {
        println!("connector: {} ({})", connector.name, connector.id);
    }

    let account = wallet.connect(LocalWallet::CONNECTOR_ID).await?;
    println!("status: {}", account.status);
    println!("addresses: {:?}", account.addresses);
    println!(
        "chain id: {}",
        account
            .chain_id
            .map_or_else(|| "-".to_owned(), |id| id.to_string())
    );

    let chain = AlloyChain::connect(rpc_url, signer);
    let orchestrator = Orchestrator::new(chain, InstallConfig::default());

    let result = orchestrator.run().await;
    println!("final status: {}", Status::of(&result));

    let outcome = result?;
    println!("proxy deployed at {}", outcome.proxy);
    println!("deploy tx: {}", outcome.deploy.tx_hash);
    println!("install tx: {}", outcome.install.tx_hash);

    wallet.disconnect();
    Ok(())
}
