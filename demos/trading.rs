//! Example: Placing, modifying and cancelling an order.
//!
//! Run with: cargo run --example trading
//!
//! This submits real orders. Use a practice account.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};
use topstepx_api_client::rest::TopstepClient;
use topstepx_api_client::{ModifyOrderRequest, OrderSide, PlaceOrderRequest};
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

    let account_id: i64 = match env::var("TOPSTEPX_ACCOUNT_ID") {
        Ok(id) => id.parse()?,
        Err(_) => {
            println!("Set TOPSTEPX_ACCOUNT_ID to choose the account to trade.");
            return Ok(());
        }
    };

    let Some(contract) = client.find_contract("MES").await? else {
        println!("No MES contract available.");
        return Ok(());
    };

    // A limit far below the market so it rests.
    let request = PlaceOrderRequest::limit(
        account_id,
        &contract.id,
        OrderSide::Buy,
        1,
        Decimal::from_str("1000")?,
    )
    .with_custom_tag("demo-order");
    let placed = client.place_order(&request).await?;
    let Some(order_id) = placed.payload.order_id else {
        println!("Order accepted without an ID.");
        return Ok(());
    };
    println!("Placed order {}", order_id);

    let modify = ModifyOrderRequest::new(account_id, order_id).limit_price(Decimal::from_str("1001")?);
    client.modify_order(&modify).await?;
    println!("Modified order {}", order_id);

    for order in client.get_open_orders(account_id).await? {
        println!(
            "Open: {} {:?} {:?} x{} limit {:?}",
            order.id,
            order.order_side(),
            order.kind(),
            order.size,
            order.limit_price
        );
    }

    client.cancel_order(account_id, order_id).await?;
    println!("Cancelled order {}", order_id);

    let since = OffsetDateTime::now_utc() - Duration::days(1);
    let trades = client.search_trades(account_id, since, None).await?;
    let realized: Decimal = trades.iter().filter_map(|t| t.profit_and_loss).sum();
    println!("{} trades today, realized P&L {}", trades.len(), realized);

    Ok(())
}
