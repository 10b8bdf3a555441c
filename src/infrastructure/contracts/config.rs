use ethers::types::Address;
use std::path::PathBuf;

use crate::domain::services::ContractError;
use crate::infrastructure::contracts::addresses::{self, DEFAULT_DEPLOYMENTS_DIR};
use crate::infrastructure::contracts::types::{ContractAddresses, NativeCurrency, NetworkConfig, TxSettings};
use crate::utils::address::parse_address;

pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

pub const DEFAULT_FACTORY_ARTIFACT: &str =
    "artifacts/contracts/MultiSigApprovalFactory.sol/MultiSigApprovalFactory.json";

/// Approvers used by the deployment program when `APPROVERS` is unset.
pub const DEFAULT_APPROVERS: [&str; 3] = [
    "0x1234567890abcdef1234567890abcdef12345678",
    "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd",
    "0x9876543210fedcba9876543210fedcba98765432",
];

fn ether() -> NativeCurrency {
    NativeCurrency {
        name: "Ether".to_string(),
        symbol: "ETH".to_string(),
        decimals: 18,
    }
}

// Get network configuration for local development (Hardhat / Anvil)
pub fn get_local_network_config() -> NetworkConfig {
    NetworkConfig {
        chain_id: 31337,
        name: "local".to_string(),
        rpc_url: DEFAULT_RPC_URL.to_string(),
        explorer_url: "".to_string(),
        native_currency: ether(),
    }
}

pub fn get_sepolia_network_config() -> NetworkConfig {
    NetworkConfig {
        chain_id: 11155111,
        name: "sepolia".to_string(),
        rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
        explorer_url: "https://sepolia.etherscan.io".to_string(),
        native_currency: ether(),
    }
}

pub fn get_base_sepolia_network_config() -> NetworkConfig {
    NetworkConfig {
        chain_id: 84532,
        name: "base_sepolia".to_string(),
        rpc_url: "https://sepolia.base.org".to_string(),
        explorer_url: "https://sepolia.basescan.org".to_string(),
        native_currency: ether(),
    }
}

pub fn get_mainnet_network_config() -> NetworkConfig {
    NetworkConfig {
        chain_id: 1,
        name: "mainnet".to_string(),
        rpc_url: "https://ethereum-rpc.publicnode.com".to_string(),
        explorer_url: "https://etherscan.io".to_string(),
        native_currency: ether(),
    }
}

// Get network configuration by chain ID
pub fn get_network_config_by_chain_id(chain_id: u64) -> Result<NetworkConfig, ContractError> {
    match chain_id {
        31337 => Ok(get_local_network_config()),
        11155111 => Ok(get_sepolia_network_config()),
        84532 => Ok(get_base_sepolia_network_config()),
        1 => Ok(get_mainnet_network_config()),
        _ => Err(ContractError::ConfigError(format!("Unsupported chain ID: {}", chain_id))),
    }
}

/// Settings for the SDK programs, read from the environment.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub rpc_url: String,
    pub private_key: Option<String>,
    pub chain_id: Option<u64>,
    /// Addresses given explicitly; these win over deployment files.
    pub contract_addresses: ContractAddresses,
    pub approvers: Vec<Address>,
    pub tx_settings: TxSettings,
    pub factory_artifact: PathBuf,
    pub deployments_dir: PathBuf,
}

impl SdkConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ContractError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ContractError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let parse_u64 = |key: &str| -> Result<Option<u64>, ContractError> {
            var(key)
                .map(|v| {
                    v.parse::<u64>()
                        .map_err(|e| ContractError::ConfigError(format!("Invalid {}: {}", key, e)))
                })
                .transpose()
        };

        let approvers = match var("APPROVERS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(parse_address)
                .collect::<Result<Vec<_>, _>>()?,
            None => DEFAULT_APPROVERS
                .iter()
                .map(|a| parse_address(a))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let confirmations = parse_u64("CONFIRMATIONS")?.unwrap_or(1) as usize;

        Ok(Self {
            rpc_url: var("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            private_key: var("PRIVATE_KEY"),
            chain_id: parse_u64("CHAIN_ID")?,
            contract_addresses: ContractAddresses {
                factory: var("FACTORY_ADDRESS").map(|a| parse_address(&a)).transpose()?,
                multisig: var("MULTISIG_ADDRESS").map(|a| parse_address(&a)).transpose()?,
            },
            approvers,
            tx_settings: TxSettings {
                confirmations,
                gas_limit: parse_u64("GAS_LIMIT")?,
            },
            factory_artifact: PathBuf::from(
                var("FACTORY_ARTIFACT").unwrap_or_else(|| DEFAULT_FACTORY_ARTIFACT.to_string()),
            ),
            deployments_dir: PathBuf::from(
                var("DEPLOYMENTS_DIR").unwrap_or_else(|| DEFAULT_DEPLOYMENTS_DIR.to_string()),
            ),
        })
    }

    pub fn require_private_key(&self) -> Result<&str, ContractError> {
        self.private_key
            .as_deref()
            .ok_or_else(|| ContractError::ConfigError("PRIVATE_KEY must be set".to_string()))
    }

    /// Network for `chain_id`, falling back to an ad-hoc entry for chains without a preset.
    pub fn network(&self, chain_id: u64) -> NetworkConfig {
        let mut network = get_network_config_by_chain_id(chain_id).unwrap_or_else(|_| NetworkConfig {
            chain_id,
            name: format!("chain_{}", chain_id),
            rpc_url: self.rpc_url.clone(),
            explorer_url: "".to_string(),
            native_currency: ether(),
        });
        network.rpc_url = self.rpc_url.clone();
        network
    }

    /// Explicit addresses first, then whatever the last deployment recorded.
    ///
    /// A network with no deployment file resolves to the explicit addresses alone;
    /// a file that exists but cannot be read or parsed is an error.
    pub fn resolve_addresses(&self, network: &NetworkConfig) -> Result<ContractAddresses, ContractError> {
        let deployed = if addresses::deployment_file(&self.deployments_dir, &network.name).exists() {
            addresses::load_deployed_addresses(&self.deployments_dir, &network.name)?
        } else {
            ContractAddresses::default()
        };

        Ok(ContractAddresses {
            factory: self.contract_addresses.factory.or(deployed.factory),
            multisig: self.contract_addresses.multisig.or(deployed.multisig),
        })
    }
}
