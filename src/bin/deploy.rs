use ethers::signers::Signer;
use tracing::{error, info};

use multisig_sdk::infrastructure::contracts::addresses;
use multisig_sdk::infrastructure::contracts::config::SdkConfig;
use multisig_sdk::infrastructure::contracts::connection;
use multisig_sdk::infrastructure::contracts::deployer;
use multisig_sdk::infrastructure::contracts::types::ContractAddresses;
use multisig_sdk::{ContractError, MultiSigSdk};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    if let Err(e) = run().await {
        error!("Error deploying contracts: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ContractError> {
    let config = SdkConfig::from_env()?;

    let provider = connection::connect_provider(&config.rpc_url)?;
    let chain_id = match config.chain_id {
        Some(chain_id) => chain_id,
        None => connection::fetch_chain_id(provider.as_ref()).await?,
    };
    let network = config.network(chain_id);
    let deployer_client = connection::signer_client(&provider, config.require_private_key()?, chain_id)?;

    info!("Deploying contracts with the account: {:?}", deployer_client.signer().address());
    info!("Network: {} (chain {})", network.name, network.chain_id);

    let artifact = deployer::load_contract_artifact(&config.factory_artifact)?;
    let deployed = deployer::deploy_factory(
        artifact,
        deployer_client.clone(),
        config.tx_settings.confirmations,
    )
    .await?;
    let factory_address = deployed.factory_address;
    info!(
        "MultiSigApprovalFactory deployed at: {:?} by {:?} (tx {})",
        factory_address, deployed.deployer, deployed.transaction_hash
    );

    addresses::save_deployed_addresses(
        &config.deployments_dir,
        &network.name,
        &ContractAddresses {
            factory: Some(factory_address),
            multisig: None,
        },
    )?;

    info!("Creating MultiSigApproval through factory...");
    let sdk = MultiSigSdk::new(provider.clone(), factory_address, None)?.with_tx_settings(config.tx_settings);
    let created = sdk
        .create_multisig(config.approvers.clone(), deployer_client.clone())
        .await?;
    info!("MultiSigApproval deployed at: {:?}", created.multisig_address);

    let file = addresses::save_deployed_addresses(
        &config.deployments_dir,
        &network.name,
        &ContractAddresses {
            factory: Some(factory_address),
            multisig: Some(created.multisig_address),
        },
    )?;
    info!("Addresses saved to: {}", file.display());

    Ok(())
}
