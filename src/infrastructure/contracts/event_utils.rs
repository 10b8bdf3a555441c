use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, Log, TransactionReceipt, H256, U256};
use sha3::{Digest, Keccak256};
use tracing::debug;

use crate::domain::services::ContractError;

/// Calculate the keccak256 hash of an event signature
pub fn calculate_event_signature(event_signature: &str) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(event_signature.as_bytes());
    H256::from_slice(&hasher.finalize())
}

/// Event signatures emitted by the multisig contracts
pub mod event_signatures {
    use super::*;

    /// Emitted by the factory for each new instance: (contractAddress, creator)
    pub const MULTISIG_CREATED: &str = "MultiSigCreated(address,address)";

    /// (proposalId, requiredApprovals)
    pub const PROPOSAL_CREATED: &str = "ProposalCreated(uint256,uint256)";

    pub const PROPOSAL_APPROVED: &str = "ProposalApproved(uint256,address)";

    pub const APPROVAL_REVOKED: &str = "ApprovalRevoked(uint256,address)";

    pub const PROPOSAL_EXECUTED: &str = "ProposalExecuted(uint256)";

    pub fn multisig_created() -> H256 {
        calculate_event_signature(MULTISIG_CREATED)
    }

    pub fn proposal_created() -> H256 {
        calculate_event_signature(PROPOSAL_CREATED)
    }

    /// Get all known event signatures
    pub fn all_signatures() -> Vec<(H256, &'static str)> {
        [
            MULTISIG_CREATED,
            PROPOSAL_CREATED,
            PROPOSAL_APPROVED,
            APPROVAL_REVOKED,
            PROPOSAL_EXECUTED,
        ]
        .into_iter()
        .map(|signature| (calculate_event_signature(signature), signature))
        .collect()
    }
}

/// Maps a log's first topic back to the event that produced it
pub struct EventMatcher {
    known_signatures: Vec<(H256, String)>, // (topic0, event signature)
}

impl EventMatcher {
    pub fn new() -> Self {
        let known_signatures = event_signatures::all_signatures()
            .into_iter()
            .map(|(topic, signature)| (topic, signature.to_string()))
            .collect();

        Self { known_signatures }
    }

    /// Add a custom event signature
    pub fn add_signature(&mut self, event_signature: &str) {
        let topic = calculate_event_signature(event_signature);
        self.known_signatures.push((topic, event_signature.to_string()));
    }

    /// Match a topic to its event signature
    pub fn match_signature(&self, topic: &H256) -> Option<&str> {
        self.known_signatures
            .iter()
            .find(|(known, _)| known == topic)
            .map(|(_, signature)| signature.as_str())
    }

    /// Name of the event that produced `log`, if known
    pub fn match_log(&self, log: &Log) -> Option<&str> {
        log.topics.first().and_then(|topic| self.match_signature(topic))
    }

    pub fn is_known_signature(&self, topic: &H256) -> bool {
        self.match_signature(topic).is_some()
    }
}

impl Default for EventMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// First log in `receipt` emitted by `emitter` whose topic0 matches `event_signature`
pub fn find_event_log<'a>(
    receipt: &'a TransactionReceipt,
    emitter: Address,
    event_signature: &str,
) -> Option<&'a Log> {
    let topic = calculate_event_signature(event_signature);
    receipt
        .logs
        .iter()
        .find(|log| log.address == emitter && log.topics.first() == Some(&topic))
}

fn event_name(event_signature: &str) -> String {
    event_signature
        .split('(')
        .next()
        .unwrap_or(event_signature)
        .to_string()
}

fn decode_event_data(
    receipt: &TransactionReceipt,
    emitter: Address,
    event_signature: &str,
    params: &[ParamType],
) -> Result<Vec<Token>, ContractError> {
    let log = find_event_log(receipt, emitter, event_signature).ok_or_else(|| {
        ContractError::EventNotFound {
            event: event_name(event_signature),
        }
    })?;

    let tokens = abi::decode(params, &log.data)?;
    debug!("Decoded {} from tx 0x{:x}: {:?}", event_signature, receipt.transaction_hash, tokens);
    Ok(tokens)
}

/// Decode `MultiSigCreated` into (new contract address, creator)
pub fn decode_multisig_created(
    receipt: &TransactionReceipt,
    factory: Address,
) -> Result<(Address, Address), ContractError> {
    let tokens = decode_event_data(
        receipt,
        factory,
        event_signatures::MULTISIG_CREATED,
        &[ParamType::Address, ParamType::Address],
    )?;

    let mut tokens = tokens.into_iter();
    let contract_address = tokens
        .next()
        .and_then(Token::into_address)
        .ok_or_else(|| ContractError::DecodeError("MultiSigCreated: missing contract address".to_string()))?;
    let creator = tokens
        .next()
        .and_then(Token::into_address)
        .ok_or_else(|| ContractError::DecodeError("MultiSigCreated: missing creator".to_string()))?;

    Ok((contract_address, creator))
}

/// Decode `ProposalCreated` into (proposal id, required approvals)
pub fn decode_proposal_created(
    receipt: &TransactionReceipt,
    multisig: Address,
) -> Result<(U256, U256), ContractError> {
    let tokens = decode_event_data(
        receipt,
        multisig,
        event_signatures::PROPOSAL_CREATED,
        &[ParamType::Uint(256), ParamType::Uint(256)],
    )?;

    let mut tokens = tokens.into_iter();
    let proposal_id = tokens
        .next()
        .and_then(Token::into_uint)
        .ok_or_else(|| ContractError::DecodeError("ProposalCreated: missing proposal id".to_string()))?;
    let required_approvals = tokens
        .next()
        .and_then(Token::into_uint)
        .ok_or_else(|| ContractError::DecodeError("ProposalCreated: missing required approvals".to_string()))?;

    Ok((proposal_id, required_approvals))
}
