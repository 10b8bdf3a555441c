use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::services::ContractError;
use crate::infrastructure::contracts::types::{contract_names, ContractAddresses};
use crate::utils::address::parse_address;

pub const DEFAULT_DEPLOYMENTS_DIR: &str = "deployments";

/// `<dir>/deployed_addresses_<network>.json`
pub fn deployment_file(deployments_dir: &Path, network_name: &str) -> PathBuf {
    deployments_dir.join(format!("deployed_addresses_{}.json", network_name))
}

// Load addresses from JSON file
fn load_addresses_from_file(file_path: &Path) -> Result<HashMap<String, String>, ContractError> {
    let content = fs::read_to_string(file_path).map_err(|e| {
        ContractError::ConfigError(format!("Failed to read addresses file {}: {}", file_path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        ContractError::ConfigError(format!("Failed to parse addresses JSON from {}: {}", file_path.display(), e))
    })
}

// Convert JSON addresses to ContractAddresses struct
fn convert_json_to_addresses(addresses: &HashMap<String, String>) -> Result<ContractAddresses, ContractError> {
    let get_address = |key: &str| {
        addresses
            .get(key)
            .map(|addr_str| parse_address(addr_str))
            .transpose()
    };

    Ok(ContractAddresses {
        factory: get_address(contract_names::FACTORY)?,
        multisig: get_address(contract_names::MULTISIG)?,
    })
}

/// Addresses recorded by a previous deployment to `network_name`.
pub fn load_deployed_addresses(deployments_dir: &Path, network_name: &str) -> Result<ContractAddresses, ContractError> {
    let addresses = load_addresses_from_file(&deployment_file(deployments_dir, network_name))?;
    convert_json_to_addresses(&addresses)
}

/// Write the known addresses for `network_name`, keeping entries already on disk.
pub fn save_deployed_addresses(
    deployments_dir: &Path,
    network_name: &str,
    contract_addresses: &ContractAddresses,
) -> Result<PathBuf, ContractError> {
    fs::create_dir_all(deployments_dir).map_err(|e| {
        ContractError::ConfigError(format!("Failed to create {}: {}", deployments_dir.display(), e))
    })?;

    let file_path = deployment_file(deployments_dir, network_name);
    let mut addresses: BTreeMap<String, String> = if file_path.exists() {
        load_addresses_from_file(&file_path)?.into_iter().collect()
    } else {
        BTreeMap::new()
    };

    if let Some(factory) = contract_addresses.factory {
        addresses.insert(contract_names::FACTORY.to_string(), ethers::utils::to_checksum(&factory, None));
    }
    if let Some(multisig) = contract_addresses.multisig {
        addresses.insert(contract_names::MULTISIG.to_string(), ethers::utils::to_checksum(&multisig, None));
    }

    let json = serde_json::to_string_pretty(&addresses)
        .map_err(|e| ContractError::ConfigError(e.to_string()))?;
    fs::write(&file_path, json).map_err(|e| {
        ContractError::ConfigError(format!("Failed to write {}: {}", file_path.display(), e))
    })?;

    info!("Saved {} address(es) for {} to {}", addresses.len(), network_name, file_path.display());
    Ok(file_path)
}
