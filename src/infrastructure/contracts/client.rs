use ethers::{
    abi::Detokenize,
    contract::{Contract, ContractCall},
    providers::Middleware,
    types::{Address, TransactionReceipt, U256},
};
use std::sync::Arc;
use tracing::info;

use crate::domain::models::{
    CreateMultiSigResponse, CreateProposalResponse, ProposalDetails, TransactionOutcome,
};
use crate::domain::services::ContractError;
use crate::infrastructure::contracts::abis;
use crate::infrastructure::contracts::event_utils::{decode_multisig_created, decode_proposal_created};
use crate::infrastructure::contracts::types::{ContractAddresses, TxSettings};
use crate::infrastructure::contracts::utils::{u256_to_u64, wait_for_transaction};

/// Client for the MultiSigApproval factory and one connected instance.
///
/// Reads go through the provider the SDK was built with. State-changing calls
/// take the signing middleware per call, so one SDK can act for several
/// approvers.
#[derive(Clone)]
pub struct MultiSigSdk<M> {
    provider: Arc<M>,
    factory_contract: Contract<M>,
    multisig_contract: Option<Contract<M>>,
    tx_settings: TxSettings,
}

impl<M: Middleware + 'static> MultiSigSdk<M> {
    pub fn new(
        provider: Arc<M>,
        factory_address: Address,
        contract_address: Option<Address>,
    ) -> Result<Self, ContractError> {
        let factory_abi = abis::load_factory_abi()?;
        let factory_contract = Contract::new(factory_address, factory_abi, provider.clone());

        let multisig_contract = match contract_address {
            Some(address) => Some(Self::multisig_instance(address, provider.clone())?),
            None => None,
        };

        Ok(Self {
            provider,
            factory_contract,
            multisig_contract,
            tx_settings: TxSettings::default(),
        })
    }

    /// Build from a set of deployed addresses; the factory address is required.
    pub fn from_addresses(provider: Arc<M>, addresses: &ContractAddresses) -> Result<Self, ContractError> {
        let factory = addresses
            .factory
            .ok_or_else(|| ContractError::ConfigError("Factory address not configured".to_string()))?;
        Self::new(provider, factory, addresses.multisig)
    }

    pub fn with_tx_settings(mut self, tx_settings: TxSettings) -> Self {
        self.tx_settings = tx_settings;
        self
    }

    pub fn with_confirmations(mut self, confirmations: usize) -> Self {
        self.tx_settings.confirmations = confirmations;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.tx_settings.gas_limit = Some(gas_limit);
        self
    }

    fn multisig_instance(address: Address, provider: Arc<M>) -> Result<Contract<M>, ContractError> {
        let multisig_abi = abis::load_multisig_abi()?;
        Ok(Contract::new(address, multisig_abi, provider))
    }

    /// Point the SDK at a (different) multisig instance.
    pub fn connect_to_multisig(&mut self, contract_address: Address) -> Result<(), ContractError> {
        self.multisig_contract = Some(Self::multisig_instance(contract_address, self.provider.clone())?);
        info!("Connected to multisig at {:?}", contract_address);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.multisig_contract.is_some()
    }

    pub fn factory_address(&self) -> Address {
        self.factory_contract.address()
    }

    pub fn multisig_address(&self) -> Option<Address> {
        self.multisig_contract.as_ref().map(|contract| contract.address())
    }

    pub fn tx_settings(&self) -> TxSettings {
        self.tx_settings
    }

    fn connected(&self) -> Result<&Contract<M>, ContractError> {
        self.multisig_contract.as_ref().ok_or(ContractError::NotConnected)
    }

    async fn send_call<S, D>(&self, call: ContractCall<S, D>, method: &str) -> Result<TransactionReceipt, ContractError>
    where
        S: Middleware + 'static,
        D: Detokenize,
    {
        let call = match self.tx_settings.gas_limit {
            Some(gas_limit) => call.gas(gas_limit),
            None => call,
        };

        let pending_tx = call
            .send()
            .await
            .map_err(|e| ContractError::TransactionError(format!("{}: {}", method, e)))?;
        info!("{} sent: 0x{:x}", method, *pending_tx);

        wait_for_transaction(pending_tx, self.tx_settings.confirmations).await
    }

    // ============ FACTORY OPERATIONS ============

    /// Deploy a new multisig instance through the factory and return its address.
    pub async fn create_multisig<S: Middleware + 'static>(
        &self,
        approvers: Vec<Address>,
        signer: Arc<S>,
    ) -> Result<CreateMultiSigResponse, ContractError> {
        info!("Creating multisig with {} approver(s)", approvers.len());

        let call = self
            .factory_contract
            .connect(signer)
            .method::<_, Address>("createMultiSig", (approvers,))?;
        let receipt = self.send_call(call, "createMultiSig").await?;

        let (multisig_address, creator) = decode_multisig_created(&receipt, self.factory_address())?;
        info!("MultiSigApproval created at {:?} by {:?}", multisig_address, creator);

        let outcome = TransactionOutcome::from(&receipt);
        Ok(CreateMultiSigResponse {
            multisig_address,
            creator,
            transaction_hash: outcome.transaction_hash,
            block_number: outcome.block_number,
        })
    }

    /// Registry of every instance the factory has deployed.
    pub async fn deployed_multisigs(&self) -> Result<Vec<Address>, ContractError> {
        self.factory_contract
            .method::<_, Vec<Address>>("getDeployedMultiSigs", ())?
            .call()
            .await
            .map_err(|e| ContractError::ContractCallError(e.to_string()))
    }

    // ============ PROPOSAL OPERATIONS ============

    pub async fn create_proposal<S: Middleware + 'static>(
        &self,
        required_approvals: u64,
        signer: Arc<S>,
    ) -> Result<CreateProposalResponse, ContractError> {
        let contract = self.connected()?;

        let call = contract
            .connect(signer)
            .method::<_, ()>("createProposal", (U256::from(required_approvals),))?;
        let receipt = self.send_call(call, "createProposal").await?;

        let (proposal_id, required_approvals) = decode_proposal_created(&receipt, contract.address())?;
        let proposal_id = u256_to_u64(proposal_id, "proposal id")?;
        info!("Proposal {} created, {} approval(s) required", proposal_id, required_approvals);

        let outcome = TransactionOutcome::from(&receipt);
        Ok(CreateProposalResponse {
            proposal_id,
            required_approvals,
            transaction_hash: outcome.transaction_hash,
            block_number: outcome.block_number,
        })
    }

    pub async fn approve_proposal<S: Middleware + 'static>(
        &self,
        proposal_id: u64,
        signer: Arc<S>,
    ) -> Result<TransactionOutcome, ContractError> {
        self.send_proposal_call("approveProposal", proposal_id, signer).await
    }

    pub async fn revoke_approval<S: Middleware + 'static>(
        &self,
        proposal_id: u64,
        signer: Arc<S>,
    ) -> Result<TransactionOutcome, ContractError> {
        self.send_proposal_call("revokeApproval", proposal_id, signer).await
    }

    pub async fn execute_proposal<S: Middleware + 'static>(
        &self,
        proposal_id: u64,
        signer: Arc<S>,
    ) -> Result<TransactionOutcome, ContractError> {
        self.send_proposal_call("executeProposal", proposal_id, signer).await
    }

    async fn send_proposal_call<S: Middleware + 'static>(
        &self,
        method: &str,
        proposal_id: u64,
        signer: Arc<S>,
    ) -> Result<TransactionOutcome, ContractError> {
        let contract = self.connected()?;

        let call = contract
            .connect(signer)
            .method::<_, ()>(method, (U256::from(proposal_id),))?;
        let receipt = self.send_call(call, method).await?;

        Ok(TransactionOutcome::from(&receipt))
    }

    /// Ask the contract whether the proposal has met its approval requirement.
    pub async fn check_proposal(&self, proposal_id: u64) -> Result<bool, ContractError> {
        self.read_proposal::<bool>("checkProposal", proposal_id).await
    }

    pub async fn get_approvals(&self, proposal_id: u64) -> Result<U256, ContractError> {
        self.read_proposal::<U256>("getApprovals", proposal_id).await
    }

    pub async fn get_required_approvals(&self, proposal_id: u64) -> Result<U256, ContractError> {
        self.read_proposal::<U256>("getRequiredApprovals", proposal_id).await
    }

    async fn read_proposal<D: Detokenize>(&self, method: &str, proposal_id: u64) -> Result<D, ContractError> {
        let contract = self.connected()?;

        contract
            .method::<_, D>(method, (U256::from(proposal_id),))?
            .call()
            .await
            .map_err(|e| ContractError::ContractCallError(format!("{}: {}", method, e)))
    }

    pub async fn get_proposal_details(&self, proposal_id: u64) -> Result<ProposalDetails, ContractError> {
        self.connected()?;

        let (approvals, required) = tokio::try_join!(
            self.get_approvals(proposal_id),
            self.get_required_approvals(proposal_id),
        )?;

        Ok(ProposalDetails::new(proposal_id, approvals, required))
    }

    /// Approve each proposal in order, one confirmed transaction at a time.
    ///
    /// Stops at the first failure; approvals already mined stay mined.
    pub async fn batch_approve<S: Middleware + 'static>(
        &self,
        proposal_ids: &[u64],
        signer: Arc<S>,
    ) -> Result<Vec<TransactionOutcome>, ContractError> {
        self.connected()?;

        let mut outcomes = Vec::with_capacity(proposal_ids.len());
        for &proposal_id in proposal_ids {
            outcomes.push(self.approve_proposal(proposal_id, signer.clone()).await?);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{self, Token};
    use ethers::providers::{JsonRpcError, MockProvider, MockResponse, Provider};
    use ethers::types::{Bytes, U64};

    fn factory() -> Address {
        Address::from_low_u64_be(0xfac)
    }

    fn multisig() -> Address {
        Address::from_low_u64_be(0x5151)
    }

    fn mocked_sdk(contract_address: Option<Address>) -> (MultiSigSdk<Provider<MockProvider>>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        let sdk = MultiSigSdk::new(Arc::new(provider), factory(), contract_address).unwrap();
        (sdk, mock)
    }

    fn push_return(mock: &MockProvider, tokens: &[Token]) {
        mock.push::<Bytes, _>(Bytes::from(abi::encode(tokens))).unwrap();
    }

    #[tokio::test]
    async fn test_operations_require_connection() {
        let (sdk, _mock) = mocked_sdk(None);
        let (signer, _signer_mock) = Provider::mocked();
        let signer = Arc::new(signer);

        assert!(!sdk.is_connected());
        assert!(matches!(sdk.check_proposal(1).await, Err(ContractError::NotConnected)));
        assert!(matches!(sdk.get_proposal_details(1).await, Err(ContractError::NotConnected)));
        assert!(matches!(sdk.create_proposal(2, signer.clone()).await, Err(ContractError::NotConnected)));
        assert!(matches!(sdk.approve_proposal(1, signer.clone()).await, Err(ContractError::NotConnected)));
        assert!(matches!(sdk.revoke_approval(1, signer.clone()).await, Err(ContractError::NotConnected)));
        assert!(matches!(sdk.execute_proposal(1, signer.clone()).await, Err(ContractError::NotConnected)));

        // The connection check happens before the loop
        let err = sdk.batch_approve(&[], signer).await.unwrap_err();
        assert_eq!(err.to_string(), "MultiSig contract not connected.");
    }

    #[tokio::test]
    async fn test_connect_to_multisig() {
        let (mut sdk, _mock) = mocked_sdk(None);
        assert_eq!(sdk.multisig_address(), None);

        sdk.connect_to_multisig(multisig()).unwrap();
        assert!(sdk.is_connected());
        assert_eq!(sdk.multisig_address(), Some(multisig()));
        assert_eq!(sdk.factory_address(), factory());

        let other = Address::from_low_u64_be(0x6262);
        sdk.connect_to_multisig(other).unwrap();
        assert_eq!(sdk.multisig_address(), Some(other));
    }

    #[tokio::test]
    async fn test_from_addresses_requires_factory() {
        let (provider, _mock) = Provider::mocked();
        let provider = Arc::new(provider);

        let missing = MultiSigSdk::from_addresses(provider.clone(), &ContractAddresses::default());
        assert!(matches!(missing, Err(ContractError::ConfigError(_))));

        let addresses = ContractAddresses {
            factory: Some(factory()),
            multisig: Some(multisig()),
        };
        let sdk = MultiSigSdk::from_addresses(provider, &addresses).unwrap();
        assert_eq!(sdk.multisig_address(), Some(multisig()));
    }

    #[tokio::test]
    async fn test_check_proposal() {
        let (sdk, mock) = mocked_sdk(Some(multisig()));
        push_return(&mock, &[Token::Bool(true)]);

        assert!(sdk.check_proposal(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_proposal_details() {
        let (sdk, mock) = mocked_sdk(Some(multisig()));
        // Responses are popped newest first: approvals, then required
        push_return(&mock, &[Token::Uint(U256::from(3))]);
        push_return(&mock, &[Token::Uint(U256::from(1))]);

        let details = sdk.get_proposal_details(9).await.unwrap();
        assert_eq!(details.proposal_id, 9);
        assert_eq!(details.approvals, U256::from(1));
        assert_eq!(details.required, U256::from(3));
        assert!(!details.status);
    }

    #[tokio::test]
    async fn test_get_proposal_details_requirement_met() {
        let (sdk, mock) = mocked_sdk(Some(multisig()));
        push_return(&mock, &[Token::Uint(U256::from(2))]);
        push_return(&mock, &[Token::Uint(U256::from(2))]);

        let details = sdk.get_proposal_details(4).await.unwrap();
        assert_eq!(details, ProposalDetails::new(4, U256::from(2), U256::from(2)));
        assert!(details.status);
    }

    #[tokio::test]
    async fn test_read_failure_is_reported() {
        let (sdk, _mock) = mocked_sdk(Some(multisig()));

        // No queued responses: the node call fails
        let err = sdk.check_proposal(1).await.unwrap_err();
        assert!(matches!(err, ContractError::ContractCallError(ref msg) if msg.starts_with("checkProposal")));
    }

    #[tokio::test]
    async fn test_deployed_multisigs() {
        let (sdk, mock) = mocked_sdk(None);
        let deployed = vec![multisig(), Address::from_low_u64_be(0x6262)];
        push_return(
            &mock,
            &[Token::Array(deployed.iter().copied().map(Token::Address).collect())],
        );

        assert_eq!(sdk.deployed_multisigs().await.unwrap(), deployed);
    }

    #[tokio::test]
    async fn test_batch_approve_empty() {
        let (sdk, _mock) = mocked_sdk(Some(multisig()));
        let (signer, _signer_mock) = Provider::mocked();

        let outcomes = sdk.batch_approve(&[], Arc::new(signer)).await.unwrap();
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_batch_approve_stops_at_first_failure() {
        let (sdk, _mock) = mocked_sdk(Some(multisig()));
        let (signer, signer_mock) = Provider::mocked();
        let signer = Arc::new(signer);

        // Bottom of the stack: only reachable if a second approval is attempted
        signer_mock.push::<U64, _>(U64::from(42)).unwrap();
        signer_mock.push_response(MockResponse::Error(JsonRpcError {
            code: -32000,
            message: "execution reverted: already approved".to_string(),
            data: None,
        }));

        let err = sdk.batch_approve(&[1, 2, 3], signer.clone()).await.unwrap_err();
        assert!(matches!(err, ContractError::TransactionError(ref msg) if msg.starts_with("approveProposal")));

        // The queued value is still there, so nothing after proposal 1 reached the node
        assert_eq!(signer.get_block_number().await.unwrap(), U64::from(42));
    }

    #[tokio::test]
    async fn test_send_failure_is_reported() {
        let (sdk, _mock) = mocked_sdk(Some(multisig()));
        let (signer, _signer_mock) = Provider::mocked();

        let err = sdk.approve_proposal(1, Arc::new(signer)).await.unwrap_err();
        assert!(matches!(err, ContractError::TransactionError(ref msg) if msg.starts_with("approveProposal")));
    }

    #[test]
    fn test_tx_settings() {
        let (provider, _mock) = Provider::mocked();
        let sdk = MultiSigSdk::new(Arc::new(provider), factory(), None)
            .unwrap()
            .with_confirmations(3)
            .with_gas_limit(500_000);

        assert_eq!(sdk.tx_settings(), TxSettings { confirmations: 3, gas_limit: Some(500_000) });
    }
}
