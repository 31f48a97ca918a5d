//! TopstepX REST API endpoint constants.

/// Base URL for the TopstepX REST API.
pub const TOPSTEPX_BASE_URL: &str = "https://api.topstepx.com";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "TOPSTEPX_BASE_URL";

/// Authentication endpoints.
pub mod auth {
    /// Exchange username and API key for a bearer token.
    pub const LOGIN_KEY: &str = "/api/Auth/loginKey";
    /// Check whether the current token is still accepted.
    pub const VALIDATE: &str = "/api/Auth/validate";
}

/// Account endpoints.
pub mod account {
    /// Search accounts.
    pub const SEARCH: &str = "/api/Account/search";
}

/// Contract endpoints.
pub mod contract {
    /// List available contracts.
    pub const AVAILABLE: &str = "/api/Contract/available";
}

/// Order endpoints.
pub mod order {
    /// Place an order.
    pub const PLACE: &str = "/api/Order/place";
    /// Search orders in a time range.
    pub const SEARCH: &str = "/api/Order/search";
    /// List open orders.
    pub const SEARCH_OPEN: &str = "/api/Order/searchOpen";
    /// Cancel an order.
    pub const CANCEL: &str = "/api/Order/cancel";
    /// Modify an open order.
    pub const MODIFY: &str = "/api/Order/modify";
}

/// Position endpoints.
pub mod position {
    /// List open positions.
    pub const SEARCH_OPEN: &str = "/api/Position/searchOpen";
    /// Close a whole position.
    pub const CLOSE_CONTRACT: &str = "/api/Position/closeContract";
    /// Close part of a position.
    pub const PARTIAL_CLOSE_CONTRACT: &str = "/api/Position/partialCloseContract";
}

/// Trade endpoints.
pub mod trade {
    /// Search trades in a time range.
    pub const SEARCH: &str = "/api/Trade/search";
}
