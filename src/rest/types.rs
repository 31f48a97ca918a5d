//! Request and response types for the TopstepX REST API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::common::{OrderSide, OrderStatus, OrderType, PositionType};
use crate::types::serde_helpers::null_as_default;

// Requests

/// Request for the account search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAccountsRequest {
    /// Only return active accounts
    pub only_active_accounts: bool,
}

/// Request for the available contracts endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvailableContractsRequest {
    /// Live contracts when true, otherwise demo
    pub live: bool,
}

/// Request scoped to a single account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    /// The account ID
    pub account_id: i64,
}

/// Request for order and trade history searches.
///
/// `endTimestamp` is left out of the body entirely when not set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeRequest {
    /// The account ID
    pub account_id: i64,
    /// Start of the range
    #[serde(with = "time::serde::rfc3339")]
    pub start_timestamp: OffsetDateTime,
    /// End of the range
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub end_timestamp: Option<OffsetDateTime>,
}

impl TimeRangeRequest {
    /// Create a search starting at `start` with an open end.
    pub fn new(account_id: i64, start: OffsetDateTime) -> Self {
        Self {
            account_id,
            start_timestamp: start,
            end_timestamp: None,
        }
    }

    /// Bound the search at `end`.
    pub fn until(mut self, end: OffsetDateTime) -> Self {
        self.end_timestamp = Some(end);
        self
    }
}

/// An order to place.
///
/// Which price fields are required depends on the order type; nothing is
/// checked locally and unset fields are sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// The account ID
    pub account_id: i64,
    /// Contract ID (e.g., "CON.F.US.EP.M25")
    pub contract_id: String,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Buy or sell
    pub side: OrderSide,
    /// Number of contracts
    pub size: i32,
    /// Limit price for limit orders
    #[serde(with = "rust_decimal::serde::float_option")]
    pub limit_price: Option<Decimal>,
    /// Stop price for stop orders
    #[serde(with = "rust_decimal::serde::float_option")]
    pub stop_price: Option<Decimal>,
    /// Trail distance for trailing stops
    #[serde(with = "rust_decimal::serde::float_option")]
    pub trail_price: Option<Decimal>,
    /// Caller-supplied tag
    pub custom_tag: Option<String>,
    /// Linked order (OCO)
    pub linked_order_id: Option<i64>,
}

impl PlaceOrderRequest {
    /// Create an order with no prices set.
    pub fn new(
        account_id: i64,
        contract_id: impl Into<String>,
        order_type: OrderType,
        side: OrderSide,
        size: i32,
    ) -> Self {
        Self {
            account_id,
            contract_id: contract_id.into(),
            order_type,
            side,
            size,
            limit_price: None,
            stop_price: None,
            trail_price: None,
            custom_tag: None,
            linked_order_id: None,
        }
    }

    /// A market order.
    pub fn market(account_id: i64, contract_id: impl Into<String>, side: OrderSide, size: i32) -> Self {
        Self::new(account_id, contract_id, OrderType::Market, side, size)
    }

    /// A limit order at `price`.
    pub fn limit(
        account_id: i64,
        contract_id: impl Into<String>,
        side: OrderSide,
        size: i32,
        price: Decimal,
    ) -> Self {
        let mut order = Self::new(account_id, contract_id, OrderType::Limit, side, size);
        order.limit_price = Some(price);
        order
    }

    /// A stop order triggered at `stop_price`.
    pub fn stop(
        account_id: i64,
        contract_id: impl Into<String>,
        side: OrderSide,
        size: i32,
        stop_price: Decimal,
    ) -> Self {
        let mut order = Self::new(account_id, contract_id, OrderType::Stop, side, size);
        order.stop_price = Some(stop_price);
        order
    }

    /// A trailing stop trailing by `trail_price`.
    pub fn trailing_stop(
        account_id: i64,
        contract_id: impl Into<String>,
        side: OrderSide,
        size: i32,
        trail_price: Decimal,
    ) -> Self {
        let mut order = Self::new(account_id, contract_id, OrderType::TrailingStop, side, size);
        order.trail_price = Some(trail_price);
        order
    }

    /// Attach a custom tag.
    pub fn with_custom_tag(mut self, tag: impl Into<String>) -> Self {
        self.custom_tag = Some(tag.into());
        self
    }

    /// Link to another order.
    pub fn with_linked_order(mut self, order_id: i64) -> Self {
        self.linked_order_id = Some(order_id);
        self
    }
}

/// Request to cancel an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    /// The account ID
    pub account_id: i64,
    /// The order to cancel
    pub order_id: i64,
}

/// Request to modify an open order.
///
/// Every unset field is sent as `null`, which the server reads as "no change".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyOrderRequest {
    /// The account ID
    pub account_id: i64,
    /// The order to modify
    pub order_id: i64,
    /// New size
    pub size: Option<i32>,
    /// New limit price
    #[serde(with = "rust_decimal::serde::float_option")]
    pub limit_price: Option<Decimal>,
    /// New stop price
    #[serde(with = "rust_decimal::serde::float_option")]
    pub stop_price: Option<Decimal>,
    /// New trail price
    #[serde(with = "rust_decimal::serde::float_option")]
    pub trail_price: Option<Decimal>,
}

impl ModifyOrderRequest {
    /// A modification that changes nothing yet.
    pub fn new(account_id: i64, order_id: i64) -> Self {
        Self {
            account_id,
            order_id,
            size: None,
            limit_price: None,
            stop_price: None,
            trail_price: None,
        }
    }

    /// Change the size.
    pub fn size(mut self, size: i32) -> Self {
        self.size = Some(size);
        self
    }

    /// Change the limit price.
    pub fn limit_price(mut self, price: Decimal) -> Self {
        self.limit_price = Some(price);
        self
    }

    /// Change the stop price.
    pub fn stop_price(mut self, price: Decimal) -> Self {
        self.stop_price = Some(price);
        self
    }

    /// Change the trail price.
    pub fn trail_price(mut self, price: Decimal) -> Self {
        self.trail_price = Some(price);
        self
    }
}

/// Request to close a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePositionRequest {
    /// The account ID
    pub account_id: i64,
    /// Contract whose position is closed
    pub contract_id: String,
}

/// Request to close part of a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialClosePositionRequest {
    /// The account ID
    pub account_id: i64,
    /// Contract whose position is reduced
    pub contract_id: String,
    /// Number of contracts to close
    pub size: i32,
}

// Resource records

/// A trading account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account ID
    pub id: i64,
    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Current balance
    #[serde(default, deserialize_with = "null_as_default")]
    pub balance: Decimal,
    /// Whether trading is allowed
    #[serde(default, deserialize_with = "null_as_default")]
    pub can_trade: bool,
    /// Whether the account is visible
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_visible: bool,
    /// Whether the account is simulated
    #[serde(default)]
    pub simulated: Option<bool>,
}

/// A tradable contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Contract ID (e.g., "CON.F.US.ENQ.H25")
    pub id: String,
    /// Contract name (e.g., "NQH5")
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Human-readable description
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Minimum price increment
    #[serde(default, deserialize_with = "null_as_default")]
    pub tick_size: Decimal,
    /// Currency value of one tick
    #[serde(default, deserialize_with = "null_as_default")]
    pub tick_value: Decimal,
    /// Whether this is the active (front) contract
    #[serde(default, deserialize_with = "null_as_default")]
    pub active_contract: bool,
    /// Underlying symbol
    #[serde(default)]
    pub symbol_id: Option<String>,
}

/// An order as reported by the order search endpoints.
///
/// Enum fields are kept as raw codes; use the accessors for typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID
    pub id: i64,
    /// Owning account
    pub account_id: i64,
    /// Contract ID
    pub contract_id: String,
    /// Creation time
    #[serde(default)]
    pub creation_timestamp: Option<String>,
    /// Last update time
    #[serde(default)]
    pub update_timestamp: Option<String>,
    /// Raw status code
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: i32,
    /// Raw order type code
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub order_type: i32,
    /// Raw side code
    #[serde(default, deserialize_with = "null_as_default")]
    pub side: i32,
    /// Order size
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: i32,
    /// Limit price
    #[serde(default)]
    pub limit_price: Option<Decimal>,
    /// Stop price
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    /// Filled quantity
    #[serde(default, deserialize_with = "null_as_default")]
    pub fill_volume: i32,
    /// Average fill price
    #[serde(default)]
    pub filled_price: Option<Decimal>,
    /// Caller-supplied tag
    #[serde(default)]
    pub custom_tag: Option<String>,
}

impl Order {
    /// Typed status, if the code is known.
    pub fn order_status(&self) -> Option<OrderStatus> {
        OrderStatus::try_from(self.status).ok()
    }

    /// Typed order type, if the code is known.
    pub fn kind(&self) -> Option<OrderType> {
        OrderType::try_from(self.order_type).ok()
    }

    /// Typed side, if the code is known.
    pub fn order_side(&self) -> Option<OrderSide> {
        OrderSide::try_from(self.side).ok()
    }
}

/// An open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Position ID
    pub id: i64,
    /// Owning account
    pub account_id: i64,
    /// Contract ID
    pub contract_id: String,
    /// Opening time
    #[serde(default)]
    pub creation_timestamp: Option<String>,
    /// Raw position type code
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub position_type: i32,
    /// Number of contracts
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: i32,
    /// Average entry price
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_price: Decimal,
}

impl Position {
    /// Typed direction, if the code is known.
    pub fn direction(&self) -> Option<PositionType> {
        PositionType::try_from(self.position_type).ok()
    }
}

/// An executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Trade ID
    pub id: i64,
    /// Owning account
    pub account_id: i64,
    /// Contract ID
    pub contract_id: String,
    /// Execution time
    #[serde(default)]
    pub creation_timestamp: Option<String>,
    /// Execution price
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Decimal,
    /// Realized profit and loss; `None` for half-turn (opening) trades
    #[serde(default)]
    pub profit_and_loss: Option<Decimal>,
    /// Fees charged
    #[serde(default, deserialize_with = "null_as_default")]
    pub fees: Decimal,
    /// Raw side code
    #[serde(default, deserialize_with = "null_as_default")]
    pub side: i32,
    /// Number of contracts
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: i32,
    /// Whether the trade was voided
    #[serde(default, deserialize_with = "null_as_default")]
    pub voided: bool,
    /// Order that produced the trade
    #[serde(default)]
    pub order_id: Option<i64>,
}

impl Trade {
    /// Whether this trade only opened a position.
    pub fn is_half_turn(&self) -> bool {
        self.profit_and_loss.is_none()
    }

    /// Typed side, if the code is known.
    pub fn trade_side(&self) -> Option<OrderSide> {
        OrderSide::try_from(self.side).ok()
    }
}

// Response payloads

/// Payload of the account search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountList {
    /// Accounts
    #[serde(default, deserialize_with = "null_as_default")]
    pub accounts: Vec<Account>,
}

/// Payload of the available contracts endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractList {
    /// Contracts
    #[serde(default, deserialize_with = "null_as_default")]
    pub contracts: Vec<Contract>,
}

/// Payload of the order search endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderList {
    /// Orders
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: Vec<Order>,
}

/// Payload of the open positions endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionList {
    /// Positions
    #[serde(default, deserialize_with = "null_as_default")]
    pub positions: Vec<Position>,
}

/// Payload of the trade search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeList {
    /// Trades
    #[serde(default, deserialize_with = "null_as_default")]
    pub trades: Vec<Trade>,
}

/// Payload of the order placement endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    /// Server-assigned order ID
    #[serde(default)]
    pub order_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_place_order_sends_nulls() {
        let request = PlaceOrderRequest::market(123, "CON.F.US.EP.M25", OrderSide::Buy, 1);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "accountId": 123,
                "contractId": "CON.F.US.EP.M25",
                "type": 2,
                "side": 0,
                "size": 1,
                "limitPrice": null,
                "stopPrice": null,
                "trailPrice": null,
                "customTag": null,
                "linkedOrderId": null
            })
        );
    }

    #[test]
    fn test_limit_order_price_is_a_number() {
        let price = "21500.25".parse::<Decimal>().unwrap();
        let request =
            PlaceOrderRequest::limit(1, "CON", OrderSide::Sell, 2, price).with_custom_tag("entry-1");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["limitPrice"], serde_json::json!(21500.25));
        assert_eq!(json["type"], serde_json::json!(1));
        assert_eq!(json["side"], serde_json::json!(1));
        assert_eq!(json["customTag"], serde_json::json!("entry-1"));
    }

    #[test]
    fn test_time_range_omits_missing_end() {
        let request = TimeRangeRequest::new(7, datetime!(2025-01-02 03:04:05 UTC));
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"accountId": 7, "startTimestamp": "2025-01-02T03:04:05Z"})
        );

        let json = serde_json::to_value(request.until(datetime!(2025-01-03 00:00 UTC))).unwrap();
        assert_eq!(json["endTimestamp"], serde_json::json!("2025-01-03T00:00:00Z"));
    }

    #[test]
    fn test_trade_half_turn() {
        let trade: Trade = serde_json::from_value(serde_json::json!({
            "id": 8604,
            "accountId": 203,
            "contractId": "CON.F.US.EP.H25",
            "creationTimestamp": "2025-01-21T16:13:52.523293+00:00",
            "price": 6065.25,
            "profitAndLoss": null,
            "fees": 1.4,
            "side": 1,
            "size": 1,
            "voided": false,
            "orderId": 14328
        }))
        .unwrap();
        assert!(trade.is_half_turn());
        assert_eq!(trade.price, "6065.25".parse::<Decimal>().unwrap());
        assert_eq!(trade.trade_side(), Some(OrderSide::Sell));
    }

    #[test]
    fn test_order_typed_accessors() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": 26060,
            "accountId": 545,
            "contractId": "CON.F.US.EP.M25",
            "status": 2,
            "type": 2,
            "side": 0,
            "size": 1,
            "limitPrice": null,
            "stopPrice": null
        }))
        .unwrap();
        assert_eq!(order.order_status(), Some(OrderStatus::Filled));
        assert_eq!(order.kind(), Some(OrderType::Market));
        assert_eq!(order.order_side(), Some(OrderSide::Buy));
        assert!(order.limit_price.is_none());
    }

    #[test]
    fn test_null_scalars_do_not_fail_decoding() {
        let trade: Trade = serde_json::from_value(serde_json::json!({
            "id": 3,
            "accountId": 4,
            "contractId": "CON",
            "price": 5000.0,
            "profitAndLoss": 12.5,
            "fees": null,
            "side": null,
            "size": 1,
            "voided": null
        }))
        .unwrap();
        assert_eq!(trade.fees, Decimal::ZERO);
        assert_eq!(trade.side, 0);
        assert!(!trade.voided);

        let contract: Contract = serde_json::from_value(serde_json::json!({
            "id": "CON.F.US.EP.M25",
            "name": null,
            "description": null,
            "tickSize": 0.25,
            "tickValue": null,
            "activeContract": true
        }))
        .unwrap();
        assert!(contract.name.is_empty());
        assert!(contract.description.is_empty());
        assert_eq!(contract.tick_value, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_codes_do_not_fail_decoding() {
        let position: Position = serde_json::from_value(serde_json::json!({
            "id": 1,
            "accountId": 2,
            "contractId": "CON",
            "type": 9,
            "size": 3,
            "averagePrice": 100.5
        }))
        .unwrap();
        assert_eq!(position.direction(), None);
        assert_eq!(position.average_price, "100.5".parse::<Decimal>().unwrap());
    }
}
