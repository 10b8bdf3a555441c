use ethers::{
    abi::Abi,
    contract::ContractFactory,
    providers::Middleware,
    types::{Address, Bytes, TransactionReceipt},
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::domain::models::{DeployFactoryResponse, TransactionOutcome};
use crate::domain::services::ContractError;
use crate::infrastructure::contracts::utils::ensure_receipt;

/// Compiled contract: ABI plus creation bytecode
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: Option<String>,
    pub abi: Abi,
    pub bytecode: Bytes,
}

pub fn load_contract_artifact(path: impl AsRef<Path>) -> Result<ContractArtifact, ContractError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        ContractError::DeploymentError(format!("Failed to read artifact {}: {}", path.display(), e))
    })?;

    parse_contract_artifact(&content, &path.display().to_string())
}

/// Accepts Hardhat (`"bytecode": "0x.."`) and Foundry (`"bytecode": {"object": "0x.."}`) layouts.
pub fn parse_contract_artifact(content: &str, source: &str) -> Result<ContractArtifact, ContractError> {
    let json: Value = serde_json::from_str(content)
        .map_err(|e| ContractError::DeploymentError(format!("Failed to parse artifact {}: {}", source, e)))?;

    let abi_json = json
        .get("abi")
        .cloned()
        .ok_or_else(|| ContractError::DeploymentError(format!("Artifact {} has no abi", source)))?;
    let abi: Abi = serde_json::from_value(abi_json)
        .map_err(|e| ContractError::AbiError(format!("Invalid abi in artifact {}: {}", source, e)))?;

    let bytecode_hex = match json.get("bytecode") {
        Some(Value::String(hex)) => hex.as_str(),
        Some(Value::Object(object)) => object
            .get("object")
            .and_then(Value::as_str)
            .unwrap_or_default(),
        _ => "",
    };

    let bytecode = hex::decode(bytecode_hex.trim_start_matches("0x"))
        .map_err(|e| ContractError::DeploymentError(format!("Invalid bytecode in artifact {}: {}", source, e)))?;
    if bytecode.is_empty() {
        return Err(ContractError::DeploymentError(format!(
            "Artifact {} has no creation bytecode",
            source
        )));
    }

    Ok(ContractArtifact {
        contract_name: json.get("contractName").and_then(Value::as_str).map(str::to_string),
        abi,
        bytecode: Bytes::from(bytecode),
    })
}

/// Deploy the factory contract and wait for its receipt.
pub async fn deploy_factory<M: Middleware + 'static>(
    artifact: ContractArtifact,
    client: Arc<M>,
    confirmations: usize,
) -> Result<DeployFactoryResponse, ContractError> {
    let factory = ContractFactory::new(artifact.abi, artifact.bytecode, client);

    let deployer = factory
        .deploy(())
        .map_err(|e| ContractError::DeploymentError(e.to_string()))?
        .confirmations(confirmations);

    info!("Sending MultiSigApprovalFactory deployment transaction...");
    let (contract, receipt) = deployer
        .send_with_receipt()
        .await
        .map_err(|e| ContractError::DeploymentError(e.to_string()))?;
    let receipt = ensure_receipt(receipt.transaction_hash, Some(receipt))?;

    let response = deploy_response(contract.address(), &receipt);
    info!(
        "MultiSigApprovalFactory deployed at: {:?} (tx {}, block {})",
        response.factory_address, response.transaction_hash, response.block_number
    );
    Ok(response)
}

fn deploy_response(factory_address: Address, receipt: &TransactionReceipt) -> DeployFactoryResponse {
    let outcome = TransactionOutcome::from(receipt);
    DeployFactoryResponse {
        factory_address,
        deployer: receipt.from,
        transaction_hash: outcome.transaction_hash,
        block_number: outcome.block_number,
    }
}
