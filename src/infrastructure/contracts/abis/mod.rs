use std::fs;
use std::path::Path;
use ethers::abi::Abi;
use crate::domain::services::ContractError;
use crate::infrastructure::contracts::types::contract_names;

const MULTISIG_ABI: &str = include_str!("../../../../abis/MultiSigApproval.json");
const FACTORY_ABI: &str = include_str!("../../../../abis/MultiSigApprovalFactory.json");

/// Directory override for ABI files; when unset the bundled ABIs are used.
pub const ABI_DIR_ENV: &str = "MULTISIG_ABI_DIR";

pub fn load_multisig_abi() -> Result<Abi, ContractError> {
    load_abi(contract_names::MULTISIG, MULTISIG_ABI)
}

pub fn load_factory_abi() -> Result<Abi, ContractError> {
    load_abi(contract_names::FACTORY, FACTORY_ABI)
}

fn load_abi(contract: &str, bundled: &str) -> Result<Abi, ContractError> {
    match std::env::var(ABI_DIR_ENV) {
        Ok(dir) => load_abi_file(Path::new(&dir).join(format!("{}.json", contract))),
        Err(_) => parse_abi(contract, bundled),
    }
}

pub fn load_abi_file(path: impl AsRef<Path>) -> Result<Abi, ContractError> {
    let path = path.as_ref();
    let abi_content = fs::read_to_string(path)
        .map_err(|e| ContractError::AbiError(format!("Failed to read ABI file {}: {}", path.display(), e)))?;

    parse_abi(&path.display().to_string(), &abi_content)
}

fn parse_abi(source: &str, content: &str) -> Result<Abi, ContractError> {
    serde_json::from_str(content)
        .map_err(|e| ContractError::AbiError(format!("Failed to parse ABI {}: {}", source, e)))
}
