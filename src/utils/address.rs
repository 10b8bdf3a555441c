use ethers::types::Address;
use ethers::utils::to_checksum;

use crate::domain::services::ContractError;

/// Parse a hex address, enforcing the EIP-55 checksum when the input is mixed-case.
///
/// The `0x` prefix is optional. All-lowercase and all-uppercase inputs carry no
/// checksum information and are accepted as-is.
pub fn parse_address(address: &str) -> Result<Address, ContractError> {
    let clean_address = address.strip_prefix("0x").unwrap_or(address);

    if clean_address.len() != 40 {
        return Err(ContractError::InvalidAddress(format!(
            "{}: expected 40 hex characters, got {}",
            address,
            clean_address.len()
        )));
    }

    if !clean_address.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ContractError::InvalidAddress(format!(
            "{}: contains non-hexadecimal characters",
            address
        )));
    }

    let parsed = clean_address
        .parse::<Address>()
        .map_err(|e| ContractError::InvalidAddress(format!("{}: {}", address, e)))?;

    let has_lower = clean_address.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = clean_address.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        let checksummed = to_checksum(&parsed, None);
        if checksummed[2..] != *clean_address {
            return Err(ContractError::InvalidAddress(format!(
                "{}: bad address checksum",
                address
            )));
        }
    }

    Ok(parsed)
}

/// True if `address` is a usable address string.
pub fn validate_address(address: &str) -> bool {
    parse_address(address).is_ok()
}

/// Normalize an address to its `0x`-prefixed EIP-55 checksummed form.
pub fn to_checksum_address(address: &str) -> Result<String, ContractError> {
    let parsed = parse_address(address)?;
    Ok(to_checksum(&parsed, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_validate_address() {
        // Correct checksum
        assert!(validate_address(CHECKSUMMED));

        // No checksum information
        assert!(validate_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"));
        assert!(validate_address("0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266"));

        // Prefix is optional
        assert!(validate_address("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"));

        // Broken checksum
        assert!(!validate_address("0xF39fd6e51aad88F6F4ce6aB8827279cffFb92266"));

        // Only a lower-case prefix is recognised
        assert!(!validate_address("0Xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"));

        // Malformed
        assert!(!validate_address(""));
        assert!(!validate_address("0x123"));
        assert!(!validate_address("invalid"));
        assert!(!validate_address("0xg39fd6e51aad88f6f4ce6ab8827279cfffb92266"));
    }

    #[test]
    fn test_to_checksum_address() {
        let checksummed = to_checksum_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();
        assert_eq!(checksummed, CHECKSUMMED);

        let unprefixed = to_checksum_address("f39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();
        assert_eq!(unprefixed, CHECKSUMMED);

        // Already checksummed input is returned unchanged
        assert_eq!(to_checksum_address(CHECKSUMMED).unwrap(), CHECKSUMMED);
    }

    #[test]
    fn test_to_checksum_address_rejects_invalid() {
        let err = to_checksum_address("0xF39fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap_err();
        assert!(matches!(err, ContractError::InvalidAddress(_)));

        assert!(to_checksum_address("0x1234").is_err());
    }

    #[test]
    fn test_demo_approvers_are_valid() {
        for approver in [
            "0x1234567890abcdef1234567890abcdef12345678",
            "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd",
            "0x9876543210fedcba9876543210fedcba98765432",
        ] {
            assert!(validate_address(approver), "{} should be valid", approver);
        }
    }
}
