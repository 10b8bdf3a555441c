use thiserror::Error;

/// Errors raised while talking to the multisig contracts.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("RPC error: {0}")]
    RpcError(String),
    #[error("Transaction error: {0}")]
    TransactionError(String),
    #[error("Contract call error: {0}")]
    ContractCallError(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: String },
    #[error("MultiSig contract not connected.")]
    NotConnected,
    #[error("Transaction receipt is null for {tx_hash}")]
    MissingReceipt { tx_hash: String },
    #[error("Transaction reverted: {tx_hash}")]
    TransactionReverted { tx_hash: String },
    #[error("{event} event not found")]
    EventNotFound { event: String },
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("ABI error: {0}")]
    AbiError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Deployment error: {0}")]
    DeploymentError(String),
}

impl From<ethers::contract::AbiError> for ContractError {
    fn from(err: ethers::contract::AbiError) -> Self {
        ContractError::AbiError(err.to_string())
    }
}

impl From<ethers::abi::Error> for ContractError {
    fn from(err: ethers::abi::Error) -> Self {
        ContractError::DecodeError(err.to_string())
    }
}
