//! TopstepX REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::ClientBuilder;
use reqwest_tracing::TracingMiddleware;
use serde::Serialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::{
    CredentialsProvider, EnvCredentials, Session, StaticCredentials, TokenPolicy, bearer_header,
};
use crate::error::{ErrorKind, TopstepError};
use crate::rest::endpoints::{
    BASE_URL_ENV, TOPSTEPX_BASE_URL, account, contract, order, position, trade,
};
use crate::rest::envelope::{Envelope, ResponseFields};
use crate::rest::traits::TopstepApi;
use crate::rest::transport::HttpTransport;
use crate::rest::types::*;

/// The TopstepX REST API client.
///
/// Every operation obtains a valid token from the shared [`Session`] (logging
/// in when needed), posts one JSON request and decodes the response envelope.
/// Clones share the same session and connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use topstepx_api_client::rest::TopstepClient;
/// use topstepx_api_client::{OrderSide, PlaceOrderRequest};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = TopstepClient::new("your_username", "your_api_key");
///
///     let accounts = client.get_active_accounts().await?;
///     println!("Accounts: {:?}", accounts);
///
///     let order = PlaceOrderRequest::market(123, "CON.F.US.EP.M25", OrderSide::Buy, 1);
///     let placed = client.place_order(&order).await?;
///     println!("Order ID: {:?}", placed.payload.order_id);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct TopstepClient {
    transport: HttpTransport,
    session: Arc<Session>,
}

impl TopstepClient {
    /// Create a client for the given username and API key with default settings.
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::builder(Arc::new(StaticCredentials::new(username, api_key))).build()
    }

    /// Create a client from environment variables.
    ///
    /// Reads `TOPSTEPX_USERNAME`, `TOPSTEPX_API_KEY` and, optionally,
    /// `TOPSTEPX_BASE_URL`.
    pub fn from_env() -> Result<Self, TopstepError> {
        let credentials = EnvCredentials::from_env()?;
        let mut builder = Self::builder(Arc::new(credentials));
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            builder = builder.base_url(base_url);
        }
        Ok(builder.build())
    }

    /// Create a new client builder.
    pub fn builder(credentials: Arc<dyn CredentialsProvider>) -> TopstepClientBuilder {
        TopstepClientBuilder::new(credentials)
    }

    /// The session holding this client's token.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Make an authenticated POST request.
    async fn authed_post<P, T>(
        &self,
        endpoint: &str,
        payload: &P,
        kind: ErrorKind,
    ) -> Result<Envelope<T>, TopstepError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.session.get_valid_token().await?;
        self.transport
            .post(endpoint, payload, bearer_header(&token)?, kind)
            .await
    }

    // Accounts.

    /// Search accounts.
    pub async fn search_accounts(&self, only_active: bool) -> Result<Vec<Account>, TopstepError> {
        debug!(only_active, "Searching accounts");
        let request = SearchAccountsRequest {
            only_active_accounts: only_active,
        };
        let envelope: Envelope<AccountList> = self
            .authed_post(account::SEARCH, &request, ErrorKind::Api)
            .await?;

        let accounts = envelope.payload.accounts;
        debug!("Found {} accounts", accounts.len());
        Ok(accounts)
    }

    /// Get active accounts.
    pub async fn get_active_accounts(&self) -> Result<Vec<Account>, TopstepError> {
        self.search_accounts(true).await
    }

    // Contracts.

    /// Get available contracts.
    ///
    /// # Arguments
    ///
    /// * `live` - Live contracts when true, otherwise demo
    pub async fn get_available_contracts(&self, live: bool) -> Result<Vec<Contract>, TopstepError> {
        debug!(live, "Fetching available contracts");
        let envelope: Envelope<ContractList> = self
            .authed_post(
                contract::AVAILABLE,
                &AvailableContractsRequest { live },
                ErrorKind::Api,
            )
            .await?;

        let contracts = envelope.payload.contracts;
        debug!("Found {} contracts", contracts.len());
        Ok(contracts)
    }

    /// Find a live contract by symbol prefix (e.g., "NQ").
    ///
    /// Matches a contract whose name starts with `symbol` or whose ID contains it.
    pub async fn find_contract(&self, symbol: &str) -> Result<Option<Contract>, TopstepError> {
        let contracts = self.get_available_contracts(true).await?;
        Ok(contracts
            .into_iter()
            .find(|c| c.name.starts_with(symbol) || c.id.contains(symbol)))
    }

    // Orders.

    /// Place an order.
    ///
    /// Returns the whole envelope; the server-assigned ID is in
    /// `payload.order_id`.
    pub async fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> Result<Envelope<PlacedOrder>, TopstepError> {
        debug!(
            account_id = request.account_id,
            contract_id = %request.contract_id,
            order_type = %request.order_type,
            side = %request.side,
            size = request.size,
            "Placing order"
        );
        let envelope: Envelope<PlacedOrder> = self
            .authed_post(order::PLACE, request, ErrorKind::Order)
            .await?;

        info!(order_id = ?envelope.payload.order_id, "Order placed");
        Ok(envelope)
    }

    /// Search orders in a time range.
    ///
    /// # Arguments
    ///
    /// * `account_id` - The account ID
    /// * `start` - Start of the range
    /// * `end` - Optional end of the range
    pub async fn search_orders(
        &self,
        account_id: i64,
        start: OffsetDateTime,
        end: Option<OffsetDateTime>,
    ) -> Result<Vec<Order>, TopstepError> {
        debug!(account_id, %start, ?end, "Searching orders");
        let request = TimeRangeRequest {
            account_id,
            start_timestamp: start,
            end_timestamp: end,
        };
        let envelope: Envelope<OrderList> = self
            .authed_post(order::SEARCH, &request, ErrorKind::Order)
            .await?;
        Ok(envelope.payload.orders)
    }

    /// Get open orders for an account.
    pub async fn get_open_orders(&self, account_id: i64) -> Result<Vec<Order>, TopstepError> {
        debug!(account_id, "Fetching open orders");
        let envelope: Envelope<OrderList> = self
            .authed_post(
                order::SEARCH_OPEN,
                &AccountRequest { account_id },
                ErrorKind::Order,
            )
            .await?;

        let orders = envelope.payload.orders;
        debug!("Found {} open orders", orders.len());
        Ok(orders)
    }

    /// Cancel an order.
    pub async fn cancel_order(
        &self,
        account_id: i64,
        order_id: i64,
    ) -> Result<Envelope<ResponseFields>, TopstepError> {
        debug!(account_id, order_id, "Cancelling order");
        let request = CancelOrderRequest {
            account_id,
            order_id,
        };
        self.authed_post(order::CANCEL, &request, ErrorKind::Order)
            .await
    }

    /// Modify an open order.
    ///
    /// Fields left unset on the request are sent as `null`.
    pub async fn modify_order(
        &self,
        request: &ModifyOrderRequest,
    ) -> Result<Envelope<ResponseFields>, TopstepError> {
        debug!(
            account_id = request.account_id,
            order_id = request.order_id,
            "Modifying order"
        );
        self.authed_post(order::MODIFY, request, ErrorKind::Order)
            .await
    }

    // Positions.

    /// Get open positions for an account.
    pub async fn get_open_positions(&self, account_id: i64) -> Result<Vec<Position>, TopstepError> {
        debug!(account_id, "Fetching open positions");
        let envelope: Envelope<PositionList> = self
            .authed_post(
                position::SEARCH_OPEN,
                &AccountRequest { account_id },
                ErrorKind::Position,
            )
            .await?;

        let positions = envelope.payload.positions;
        debug!("Found {} open positions", positions.len());
        Ok(positions)
    }

    /// Close the whole position in a contract.
    pub async fn close_position(
        &self,
        account_id: i64,
        contract_id: &str,
    ) -> Result<Envelope<ResponseFields>, TopstepError> {
        info!(account_id, contract_id, "Closing position");
        let request = ClosePositionRequest {
            account_id,
            contract_id: contract_id.to_string(),
        };
        self.authed_post(position::CLOSE_CONTRACT, &request, ErrorKind::Position)
            .await
    }

    /// Close `size` contracts of a position.
    pub async fn partial_close_position(
        &self,
        account_id: i64,
        contract_id: &str,
        size: i32,
    ) -> Result<Envelope<ResponseFields>, TopstepError> {
        info!(account_id, contract_id, size, "Partially closing position");
        let request = PartialClosePositionRequest {
            account_id,
            contract_id: contract_id.to_string(),
            size,
        };
        self.authed_post(
            position::PARTIAL_CLOSE_CONTRACT,
            &request,
            ErrorKind::Position,
        )
        .await
    }

    // Trades.

    /// Search trades in a time range.
    ///
    /// Half-turn (opening) trades carry no `profit_and_loss`.
    pub async fn search_trades(
        &self,
        account_id: i64,
        start: OffsetDateTime,
        end: Option<OffsetDateTime>,
    ) -> Result<Vec<Trade>, TopstepError> {
        debug!(account_id, %start, ?end, "Searching trades");
        let request = TimeRangeRequest {
            account_id,
            start_timestamp: start,
            end_timestamp: end,
        };
        let envelope: Envelope<TradeList> = self
            .authed_post(trade::SEARCH, &request, ErrorKind::Api)
            .await?;
        Ok(envelope.payload.trades)
    }
}

impl TopstepApi for TopstepClient {
    // ========== Accounts ==========

    async fn search_accounts(&self, only_active: bool) -> Result<Vec<Account>, TopstepError> {
        TopstepClient::search_accounts(self, only_active).await
    }

    async fn get_active_accounts(&self) -> Result<Vec<Account>, TopstepError> {
        TopstepClient::get_active_accounts(self).await
    }

    // ========== Contracts ==========

    async fn get_available_contracts(&self, live: bool) -> Result<Vec<Contract>, TopstepError> {
        TopstepClient::get_available_contracts(self, live).await
    }

    async fn find_contract(&self, symbol: &str) -> Result<Option<Contract>, TopstepError> {
        TopstepClient::find_contract(self, symbol).await
    }

    // ========== Orders ==========

    async fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> Result<Envelope<PlacedOrder>, TopstepError> {
        TopstepClient::place_order(self, request).await
    }

    async fn search_orders(
        &self,
        account_id: i64,
        start: OffsetDateTime,
        end: Option<OffsetDateTime>,
    ) -> Result<Vec<Order>, TopstepError> {
        TopstepClient::search_orders(self, account_id, start, end).await
    }

    async fn get_open_orders(&self, account_id: i64) -> Result<Vec<Order>, TopstepError> {
        TopstepClient::get_open_orders(self, account_id).await
    }

    async fn cancel_order(
        &self,
        account_id: i64,
        order_id: i64,
    ) -> Result<Envelope<ResponseFields>, TopstepError> {
        TopstepClient::cancel_order(self, account_id, order_id).await
    }

    async fn modify_order(
        &self,
        request: &ModifyOrderRequest,
    ) -> Result<Envelope<ResponseFields>, TopstepError> {
        TopstepClient::modify_order(self, request).await
    }

    // ========== Positions ==========

    async fn get_open_positions(&self, account_id: i64) -> Result<Vec<Position>, TopstepError> {
        TopstepClient::get_open_positions(self, account_id).await
    }

    async fn close_position(
        &self,
        account_id: i64,
        contract_id: &str,
    ) -> Result<Envelope<ResponseFields>, TopstepError> {
        TopstepClient::close_position(self, account_id, contract_id).await
    }

    async fn partial_close_position(
        &self,
        account_id: i64,
        contract_id: &str,
        size: i32,
    ) -> Result<Envelope<ResponseFields>, TopstepError> {
        TopstepClient::partial_close_position(self, account_id, contract_id, size).await
    }

    // ========== Trades ==========

    async fn search_trades(
        &self,
        account_id: i64,
        start: OffsetDateTime,
        end: Option<OffsetDateTime>,
    ) -> Result<Vec<Trade>, TopstepError> {
        TopstepClient::search_trades(self, account_id, start, end).await
    }
}

impl std::fmt::Debug for TopstepClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopstepClient")
            .field("base_url", &self.transport.base_url())
            .field("session", &self.session)
            .finish()
    }
}

/// Builder for [`TopstepClient`].
pub struct TopstepClientBuilder {
    base_url: String,
    credentials: Arc<dyn CredentialsProvider>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    token_policy: TokenPolicy,
}

impl TopstepClientBuilder {
    /// Create a new builder with default settings.
    pub fn new(credentials: Arc<dyn CredentialsProvider>) -> Self {
        Self {
            base_url: TOPSTEPX_BASE_URL.to_string(),
            credentials,
            user_agent: None,
            timeout: None,
            token_policy: TokenPolicy::default(),
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set a timeout applied to every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the assumed token lifetime and refresh margin.
    pub fn token_policy(mut self, policy: TokenPolicy) -> Self {
        self.token_policy = policy;
        self
    }

    /// Build the client.
    pub fn build(self) -> TopstepClient {
        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("topstepx-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("topstepx-api-client"));
        headers.insert(USER_AGENT, header_value);

        let mut reqwest_builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            reqwest_builder = reqwest_builder.timeout(timeout);
        }
        let reqwest_client = reqwest_builder
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        // No retry layer: each call is attempted exactly once.
        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let transport = HttpTransport::new(client, self.base_url);
        let session = Arc::new(Session::new(
            transport.clone(),
            self.credentials,
            self.token_policy,
        ));

        TopstepClient { transport, session }
    }
}
