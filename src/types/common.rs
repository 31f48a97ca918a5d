//! Integer-coded enums shared across the TopstepX API.
//!
//! The numeric codes are fixed by the remote service and must not change.

use serde::{Deserialize, Serialize};

/// Order type for trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum OrderType {
    /// Limit order - execute at specified price or better
    Limit,
    /// Market order - execute immediately at best available price
    Market,
    /// Stop order - becomes a market order when the stop price trades
    Stop,
    /// Trailing stop order
    TrailingStop,
    /// Join the best bid
    JoinBid,
    /// Join the best ask
    JoinAsk,
}

impl From<OrderType> for i32 {
    fn from(order_type: OrderType) -> i32 {
        match order_type {
            OrderType::Limit => 1,
            OrderType::Market => 2,
            OrderType::Stop => 4,
            OrderType::TrailingStop => 5,
            OrderType::JoinBid => 6,
            OrderType::JoinAsk => 7,
        }
    }
}

impl TryFrom<i32> for OrderType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OrderType::Limit),
            2 => Ok(OrderType::Market),
            4 => Ok(OrderType::Stop),
            5 => Ok(OrderType::TrailingStop),
            6 => Ok(OrderType::JoinBid),
            7 => Ok(OrderType::JoinAsk),
            _ => Err(format!("Invalid order type: {}", value)),
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
            OrderType::Stop => "stop",
            OrderType::TrailingStop => "trailing-stop",
            OrderType::JoinBid => "join-bid",
            OrderType::JoinAsk => "join-ask",
        };
        write!(f, "{}", s)
    }
}

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum OrderSide {
    /// Buy (bid)
    Buy,
    /// Sell (ask)
    Sell,
}

impl From<OrderSide> for i32 {
    fn from(side: OrderSide) -> i32 {
        match side {
            OrderSide::Buy => 0,
            OrderSide::Sell => 1,
        }
    }
}

impl TryFrom<i32> for OrderSide {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderSide::Buy),
            1 => Ok(OrderSide::Sell),
            _ => Err(format!("Invalid order side: {}", value)),
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

/// Status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum OrderStatus {
    /// Order is open/working
    Pending,
    /// Order has been filled
    Filled,
    /// Order has been cancelled
    Cancelled,
    /// Order was rejected
    Rejected,
}

impl From<OrderStatus> for i32 {
    fn from(status: OrderStatus) -> i32 {
        match status {
            OrderStatus::Pending => 1,
            OrderStatus::Filled => 2,
            OrderStatus::Cancelled => 3,
            OrderStatus::Rejected => 4,
        }
    }
}

impl TryFrom<i32> for OrderStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OrderStatus::Pending),
            2 => Ok(OrderStatus::Filled),
            3 => Ok(OrderStatus::Cancelled),
            4 => Ok(OrderStatus::Rejected),
            _ => Err(format!("Invalid order status: {}", value)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Filled => write!(f, "filled"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
            OrderStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum PositionType {
    /// Long position
    Long,
    /// Short position
    Short,
}

impl From<PositionType> for i32 {
    fn from(position_type: PositionType) -> i32 {
        match position_type {
            PositionType::Long => 0,
            PositionType::Short => 1,
        }
    }
}

impl TryFrom<i32> for PositionType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PositionType::Long),
            1 => Ok(PositionType::Short),
            _ => Err(format!("Invalid position type: {}", value)),
        }
    }
}

impl std::fmt::Display for PositionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionType::Long => write!(f, "long"),
            PositionType::Short => write!(f, "short"),
        }
    }
}
