use ethers::types::Address;
use serde::{Deserialize, Serialize};

// ============ CONTRACT CONFIGURATION TYPES ============

/// Network configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_id: u64,
    /// Short name used for deployment files, e.g. `local` or `sepolia`.
    pub name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub native_currency: NativeCurrency,
}

/// Native currency information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Contract addresses for a network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub factory: Option<Address>,
    pub multisig: Option<Address>,
}

/// Transaction submission settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxSettings {
    pub confirmations: usize,
    pub gas_limit: Option<u64>,
}

impl Default for TxSettings {
    fn default() -> Self {
        Self {
            confirmations: 1,
            gas_limit: None,
        }
    }
}

/// Contract names as they appear in artifacts and deployment files.
pub mod contract_names {
    pub const MULTISIG: &str = "MultiSigApproval";
    pub const FACTORY: &str = "MultiSigApprovalFactory";
}
