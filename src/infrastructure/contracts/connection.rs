use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
};
use std::sync::Arc;

use crate::domain::services::ContractError;

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

pub fn connect_provider(rpc_url: &str) -> Result<Arc<Provider<Http>>, ContractError> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ContractError::RpcError(format!("{}: {}", rpc_url, e)))?;
    Ok(Arc::new(provider))
}

pub fn parse_wallet(private_key: &str) -> Result<LocalWallet, ContractError> {
    private_key
        .trim()
        .parse::<LocalWallet>()
        .map_err(|e| ContractError::InvalidSignature { reason: e.to_string() })
}

/// Ask the node which chain it serves.
pub async fn fetch_chain_id<M: Middleware>(provider: &M) -> Result<u64, ContractError> {
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ContractError::RpcError(e.to_string()))?;
    Ok(chain_id.as_u64())
}

/// Signing client bound to `chain_id`, for passing to state-changing SDK calls.
pub fn signer_client(
    provider: &Provider<Http>,
    private_key: &str,
    chain_id: u64,
) -> Result<Arc<SignerClient>, ContractError> {
    let wallet = parse_wallet(private_key)?.with_chain_id(chain_id);
    Ok(Arc::new(SignerMiddleware::new(provider.clone(), wallet)))
}
