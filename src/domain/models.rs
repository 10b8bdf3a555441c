use ethers::types::{Address, TransactionReceipt, U256};
use serde::{Deserialize, Serialize};

// ============ FACTORY ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMultiSigResponse {
    pub multisig_address: Address,
    pub creator: Address,
    pub transaction_hash: String,
    pub block_number: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployFactoryResponse {
    pub factory_address: Address,
    pub deployer: Address,
    pub transaction_hash: String,
    pub block_number: u64,
}

// ============ PROPOSALS ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProposalResponse {
    pub proposal_id: u64,
    pub required_approvals: U256,
    pub transaction_hash: String,
    pub block_number: u64,
}

/// Snapshot of a proposal's approval state as read from the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDetails {
    pub proposal_id: u64,
    pub approvals: U256,
    pub required: U256,
    /// Whether the approval count has reached the requirement.
    pub status: bool,
}

impl ProposalDetails {
    pub fn new(proposal_id: u64, approvals: U256, required: U256) -> Self {
        Self {
            proposal_id,
            approvals,
            required,
            status: approvals >= required,
        }
    }
}

/// Result of a state-changing call that emits nothing we decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub transaction_hash: String,
    pub block_number: u64,
}

impl From<&TransactionReceipt> for TransactionOutcome {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_hash: format!("0x{:x}", receipt.transaction_hash),
            block_number: receipt.block_number.unwrap_or_default().as_u64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{H256, U64};

    #[test]
    fn test_proposal_details_status() {
        let met = ProposalDetails::new(1, U256::from(3), U256::from(2));
        assert!(met.status);

        let exact = ProposalDetails::new(2, U256::from(2), U256::from(2));
        assert!(exact.status);

        let pending = ProposalDetails::new(3, U256::from(1), U256::from(2));
        assert!(!pending.status);
    }

    #[test]
    fn test_outcome_from_receipt() {
        let receipt = TransactionReceipt {
            transaction_hash: H256::from_low_u64_be(0xabc),
            block_number: Some(U64::from(42)),
            ..Default::default()
        };

        let outcome = TransactionOutcome::from(&receipt);
        assert_eq!(outcome.block_number, 42);
        assert!(outcome.transaction_hash.starts_with("0x"));
        assert!(outcome.transaction_hash.ends_with("abc"));
        assert_eq!(outcome.transaction_hash.len(), 66);
    }
}
