use std::fs;
use std::path::Path;

use ethers::abi::Abi;
use serde_json::Value;

use multisig_sdk::infrastructure::contracts::types::contract_names;

/// Copy the `abi` section of each compiled contract into `abis/`.
///
/// Usage: extract_abis [artifacts_dir] [abi_dir]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let artifacts_dir = args.get(1).map(String::as_str).unwrap_or("artifacts/contracts");
    let abi_dir = args.get(2).map(String::as_str).unwrap_or("abis");

    tracing::info!("Extracting contract ABIs from {}...", artifacts_dir);
    fs::create_dir_all(abi_dir)?;

    let mut extracted = 0;
    for contract in [contract_names::MULTISIG, contract_names::FACTORY] {
        let artifact_path = Path::new(artifacts_dir)
            .join(format!("{}.sol", contract))
            .join(format!("{}.json", contract));

        if !artifact_path.exists() {
            tracing::warn!("No artifact for {} at {}", contract, artifact_path.display());
            continue;
        }

        let artifact: Value = serde_json::from_str(&fs::read_to_string(&artifact_path)?)?;
        let abi = artifact
            .get("abi")
            .ok_or_else(|| format!("{} has no abi", artifact_path.display()))?;

        // Refuse to write something the SDK could not load back
        serde_json::from_value::<Abi>(abi.clone())?;

        let out_path = Path::new(abi_dir).join(format!("{}.json", contract));
        fs::write(&out_path, serde_json::to_string_pretty(abi)?)?;
        tracing::info!("Extracted ABI: {} -> {}", contract, out_path.display());
        extracted += 1;
    }

    if extracted == 0 {
        return Err(format!("no artifacts found under {}; compile the contracts first", artifacts_dir).into());
    }

    tracing::info!("Contract extraction complete! ABIs saved to: {}", abi_dir);
    Ok(())
}
