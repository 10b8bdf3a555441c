pub mod address;

pub use address::{parse_address, to_checksum_address, validate_address};
