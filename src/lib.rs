pub mod domain;
pub mod infrastructure;
pub mod utils;

// Main exports for external use
pub use domain::{
    ContractError, CreateMultiSigResponse, CreateProposalResponse, ProposalDetails, TransactionOutcome,
};
pub use infrastructure::contracts::config::SdkConfig;
pub use infrastructure::contracts::MultiSigSdk;
pub use utils::{to_checksum_address, validate_address};
