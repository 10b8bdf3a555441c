use multisig_sdk::tests::multisig_tests::{
    test_batch_approve, test_connection, test_create_multisig, test_not_connected,
    test_proposal_lifecycle, test_revoke_approval,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("MultiSig SDK Contract Test Runner");
    println!("=================================\n");

    // Get command line arguments
    let args: Vec<String> = std::env::args().collect();
    let test_name = args.get(1).map(|s| s.as_str()).unwrap_or("all");

    match test_name {
        "connection" => test_connection().await?,
        "create_multisig" => test_create_multisig().await?,
        "lifecycle" => test_proposal_lifecycle().await?,
        "revoke" => test_revoke_approval().await?,
        "batch_approve" => test_batch_approve().await?,
        "not_connected" => test_not_connected().await?,
        "all" => {
            println!("Running all tests...\n");

            test_connection().await?;
            println!();
            test_create_multisig().await?;
            println!();
            test_not_connected().await?;
            println!();
            test_proposal_lifecycle().await?;
            println!();
            test_revoke_approval().await?;
            println!();
            test_batch_approve().await?;

            println!("\nAll tests passed!");
        }
        _ => {
            println!("Unknown test: {}", test_name);
            println!("Available tests: connection, create_multisig, not_connected, lifecycle, revoke, batch_approve, all");
            std::process::exit(1);
        }
    }

    Ok(())
}
