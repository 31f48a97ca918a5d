//! Trait definition for the TopstepX REST API client.
//!
//! [`TopstepApi`] abstracts the domain operations so strategies can be written
//! against a mock or a wrapping implementation instead of the HTTP client.
//!
//! # Example
//!
//! ```rust,ignore
//! use topstepx_api_client::rest::{TopstepApi, TopstepClient};
//!
//! async fn flatten_all<C: TopstepApi>(client: &C, account_id: i64) -> Result<(), topstepx_api_client::TopstepError> {
//!     for position in client.get_open_positions(account_id).await? {
//!         client.close_position(account_id, &position.contract_id).await?;
//!     }
//!     Ok(())
//! }
//! ```

use std::future::Future;

use time::OffsetDateTime;

use crate::error::TopstepError;
use crate::rest::envelope::{Envelope, ResponseFields};
use crate::rest::types::{
    Account, Contract, ModifyOrderRequest, Order, PlaceOrderRequest, PlacedOrder, Position, Trade,
};

/// Trait defining all TopstepX REST API operations.
///
/// All methods are async and return `Result<T, TopstepError>`.
pub trait TopstepApi: Send + Sync {
    // ========== Accounts ==========

    /// Search accounts, optionally restricted to active ones.
    fn search_accounts(
        &self,
        only_active: bool,
    ) -> impl Future<Output = Result<Vec<Account>, TopstepError>> + Send;

    /// Get active accounts.
    fn get_active_accounts(&self) -> impl Future<Output = Result<Vec<Account>, TopstepError>> + Send;

    // ========== Contracts ==========

    /// Get live or demo contracts.
    fn get_available_contracts(
        &self,
        live: bool,
    ) -> impl Future<Output = Result<Vec<Contract>, TopstepError>> + Send;

    /// Find a live contract by symbol prefix.
    fn find_contract(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<Option<Contract>, TopstepError>> + Send;

    // ========== Orders ==========

    /// Place an order.
    fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> impl Future<Output = Result<Envelope<PlacedOrder>, TopstepError>> + Send;

    /// Search orders in a time range.
    fn search_orders(
        &self,
        account_id: i64,
        start: OffsetDateTime,
        end: Option<OffsetDateTime>,
    ) -> impl Future<Output = Result<Vec<Order>, TopstepError>> + Send;

    /// Get open orders.
    fn get_open_orders(
        &self,
        account_id: i64,
    ) -> impl Future<Output = Result<Vec<Order>, TopstepError>> + Send;

    /// Cancel an order.
    fn cancel_order(
        &self,
        account_id: i64,
        order_id: i64,
    ) -> impl Future<Output = Result<Envelope<ResponseFields>, TopstepError>> + Send;

    /// Modify an open order.
    fn modify_order(
        &self,
        request: &ModifyOrderRequest,
    ) -> impl Future<Output = Result<Envelope<ResponseFields>, TopstepError>> + Send;

    // ========== Positions ==========

    /// Get open positions.
    fn get_open_positions(
        &self,
        account_id: i64,
    ) -> impl Future<Output = Result<Vec<Position>, TopstepError>> + Send;

    /// Close a whole position.
    fn close_position(
        &self,
        account_id: i64,
        contract_id: &str,
    ) -> impl Future<Output = Result<Envelope<ResponseFields>, TopstepError>> + Send;

    /// Close part of a position.
    fn partial_close_position(
        &self,
        account_id: i64,
        contract_id: &str,
        size: i32,
    ) -> impl Future<Output = Result<Envelope<ResponseFields>, TopstepError>> + Send;

    // ========== Trades ==========

    /// Search trades in a time range.
    fn search_trades(
        &self,
        account_id: i64,
        start: OffsetDateTime,
        end: Option<OffsetDateTime>,
    ) -> impl Future<Output = Result<Vec<Trade>, TopstepError>> + Send;
}
