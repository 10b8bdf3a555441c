pub mod transaction;

pub use transaction::{ensure_receipt, u256_to_u64, wait_for_transaction};
