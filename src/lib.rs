//! # TopstepX API Client
//!
//! An async Rust client library for the TopstepX (ProjectX Gateway) trading REST API.
//!
//! ## Features
//!
//! - API key login with automatic token refresh
//! - Single-flight login shared by every clone of a client
//! - Strong typing for order, position and trade requests
//! - Financial precision with `rust_decimal`
//! - Envelope failures mapped to domain-specific errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use topstepx_api_client::rest::TopstepClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TopstepClient::from_env()?;
//!     let accounts = client.get_active_accounts().await?;
//!     println!("Accounts: {:?}", accounts);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rest;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ApiError, ErrorKind, TopstepError};
pub use rest::{
    ModifyOrderRequest, PlaceOrderRequest, TopstepApi, TopstepClient, TopstepClientBuilder,
};
pub use types::common::{OrderSide, OrderStatus, OrderType, PositionType};

/// Result type alias using TopstepError
pub type Result<T> = std::result::Result<T, TopstepError>;
