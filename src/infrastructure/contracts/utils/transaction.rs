use ethers::providers::{JsonRpcClient, PendingTransaction};
use ethers::types::{TransactionReceipt, TxHash, U256};
use tracing::info;

use crate::domain::services::ContractError;

/// Await inclusion of a submitted transaction.
///
/// Fails if the node hands back no receipt or if the transaction reverted.
pub async fn wait_for_transaction<P: JsonRpcClient>(
    pending_tx: PendingTransaction<'_, P>,
    confirmations: usize,
) -> Result<TransactionReceipt, ContractError> {
    let tx_hash: TxHash = *pending_tx;
    info!("Waiting for transaction 0x{:x} ({} confirmation(s))", tx_hash, confirmations);

    let receipt = pending_tx
        .confirmations(confirmations)
        .await
        .map_err(|e| ContractError::TransactionError(e.to_string()))?;

    ensure_receipt(tx_hash, receipt)
}

pub fn ensure_receipt(
    tx_hash: TxHash,
    receipt: Option<TransactionReceipt>,
) -> Result<TransactionReceipt, ContractError> {
    let receipt = receipt.ok_or_else(|| ContractError::MissingReceipt {
        tx_hash: format!("0x{:x}", tx_hash),
    })?;

    // Pre-byzantium receipts carry no status
    if let Some(status) = receipt.status {
        if status == 0.into() {
            return Err(ContractError::TransactionReverted {
                tx_hash: format!("0x{:x}", receipt.transaction_hash),
            });
        }
    }

    info!(
        "Transaction 0x{:x} included in block {}",
        receipt.transaction_hash,
        receipt.block_number.unwrap_or_default()
    );
    Ok(receipt)
}

pub fn u256_to_u64(value: U256, field: &str) -> Result<u64, ContractError> {
    if value > U256::from(u64::MAX) {
        return Err(ContractError::DecodeError(format!("{} {} does not fit in u64", field, value)));
    }
    Ok(value.as_u64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{H256, U64};

    fn receipt(status: Option<u64>) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: H256::from_low_u64_be(1),
            block_number: Some(U64::from(10)),
            status: status.map(U64::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_receipt() {
        let err = ensure_receipt(H256::from_low_u64_be(1), None).unwrap_err();
        assert!(matches!(err, ContractError::MissingReceipt { .. }));
        assert!(err.to_string().starts_with("Transaction receipt is null"));
    }

    #[test]
    fn test_reverted_receipt() {
        let err = ensure_receipt(H256::from_low_u64_be(1), Some(receipt(Some(0)))).unwrap_err();
        assert!(matches!(err, ContractError::TransactionReverted { .. }));
    }

    #[test]
    fn test_successful_receipt() {
        let ok = ensure_receipt(H256::from_low_u64_be(1), Some(receipt(Some(1)))).unwrap();
        assert_eq!(ok.block_number, Some(U64::from(10)));

        // No status field
        assert!(ensure_receipt(H256::from_low_u64_be(1), Some(receipt(None))).is_ok());
    }

    #[test]
    fn test_u256_to_u64() {
        assert_eq!(u256_to_u64(U256::from(42), "proposal id").unwrap(), 42);
        assert_eq!(u256_to_u64(U256::from(u64::MAX), "proposal id").unwrap(), u64::MAX);

        let err = u256_to_u64(U256::from(u64::MAX) + 1, "proposal id").unwrap_err();
        assert!(matches!(err, ContractError::DecodeError(_)));
    }
}
