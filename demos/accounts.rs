//! Example: Accounts, contracts and open positions.
//!
//! Run with: cargo run --example accounts

use topstepx_api_client::rest::TopstepClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = match TopstepClient::from_env() {
        Ok(client) => client,
        Err(_) => {
            println!("Set TOPSTEPX_USERNAME and TOPSTEPX_API_KEY to run this example.");
            return Ok(());
        }
    };

    let accounts = client.get_active_accounts().await?;
    for account in &accounts {
        println!(
            "Account {} ({}): balance {}, can trade: {}",
            account.id, account.name, account.balance, account.can_trade
        );

        let positions = client.get_open_positions(account.id).await?;
        for position in positions {
            println!(
                "  {} {:?} x{} @ {}",
                position.contract_id,
                position.direction(),
                position.size,
                position.average_price
            );
        }
    }

    if let Some(contract) = client.find_contract("NQ").await? {
        println!(
            "NQ front contract: {} tick {} = {}",
            contract.id, contract.tick_size, contract.tick_value
        );
    }

    println!("Session: {:?}", client.session());
    Ok(())
}
