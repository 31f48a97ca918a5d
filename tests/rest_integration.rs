use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use time::macros::datetime;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use topstepx_api_client::auth::{SessionStatus, StaticCredentials};
use topstepx_api_client::rest::TopstepClient;
use topstepx_api_client::{
    ModifyOrderRequest, OrderSide, OrderStatus, PlaceOrderRequest, PositionType, TopstepApi,
    TopstepError,
};

fn build_client(server: &MockServer) -> TopstepClient {
    let credentials = Arc::new(StaticCredentials::new("test_user", "test_key"));
    TopstepClient::builder(credentials)
        .base_url(server.uri())
        .build()
}

fn ok_envelope(fields: serde_json::Value) -> serde_json::Value {
    let mut body = serde_json::json!({
        "success": true,
        "errorCode": 0,
        "errorMessage": null
    });
    if let (Some(body), Some(fields)) = (body.as_object_mut(), fields.as_object()) {
        body.extend(fields.clone());
    }
    body
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/Auth/loginKey"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({ "token": token }))),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_sends_credentials_and_caches_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Auth/loginKey"))
        .and(body_json(serde_json::json!({
            "userName": "test_user",
            "apiKey": "test_key"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({ "token": "abc" }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    assert_eq!(client.session().get_valid_token().await.unwrap(), "abc");
    assert_eq!(client.session().status(), SessionStatus::Valid);

    // The second call reuses the cached token.
    assert_eq!(client.session().get_valid_token().await.unwrap(), "abc");
    assert!(client.session().token_expiry().is_some());
}

#[tokio::test]
async fn test_login_failure_is_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Auth/loginKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "errorCode": 7,
            "errorMessage": "bad key"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.session().login().await.unwrap_err();

    match &err {
        TopstepError::Authentication(api) => {
            assert_eq!(api.message, "bad key");
            assert_eq!(api.code, Some(7));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_authentication());
    assert_eq!(client.session().status(), SessionStatus::Unauthenticated);
    assert!(!client.session().is_token_valid());
}

#[tokio::test]
async fn test_login_without_token_is_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Auth/loginKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({}))))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = assert_err!(client.session().get_valid_token().await);
    assert!(err.is_authentication());
}

#[tokio::test]
async fn test_concurrent_callers_share_one_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Auth/loginKey"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(serde_json::json!({ "token": "shared" })))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let other = client.clone();

    let (first, second) = tokio::join!(
        client.session().get_valid_token(),
        other.session().get_valid_token()
    );
    assert_eq!(first.unwrap(), "shared");
    assert_eq!(second.unwrap(), "shared");
}

#[tokio::test]
async fn test_expired_token_triggers_login() {
    let server = MockServer::start().await;
    mount_login(&server, "fresh").await;

    let client = build_client(&server);
    client
        .session()
        .restore("stale", time::OffsetDateTime::now_utc() - time::Duration::minutes(1));
    assert_eq!(client.session().status(), SessionStatus::Expired);

    assert_eq!(client.session().get_valid_token().await.unwrap(), "fresh");
    assert_eq!(client.session().status(), SessionStatus::Valid);
}

#[tokio::test]
async fn test_search_accounts_sends_bearer_and_body() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Account/search"))
        .and(header("Authorization", "Bearer abc"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({ "onlyActiveAccounts": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({
            "accounts": [{
                "id": 123,
                "name": "50K Combine",
                "balance": 50000.0,
                "canTrade": true,
                "isVisible": true,
                "simulated": true
            }]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let accounts = client.get_active_accounts().await.unwrap();

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, 123);
    assert_eq!(accounts[0].name, "50K Combine");
    assert!(accounts[0].can_trade);
}

#[tokio::test]
async fn test_null_list_is_empty() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Order/searchOpen"))
        .and(body_json(serde_json::json!({ "accountId": 9 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({ "orders": null }))),
        )
        .mount(&server)
        .await;

    let client = build_client(&server);
    let orders = assert_ok!(client.get_open_orders(9).await);
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_find_contract_by_symbol() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Contract/available"))
        .and(body_json(serde_json::json!({ "live": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({
            "contracts": [
                {
                    "id": "CON.F.US.EP.M25",
                    "name": "ESM5",
                    "description": "E-mini S&P 500",
                    "tickSize": 0.25,
                    "tickValue": 12.5,
                    "activeContract": true
                },
                {
                    "id": "CON.F.US.ENQ.M25",
                    "name": "NQM5",
                    "description": "E-mini NASDAQ-100",
                    "tickSize": 0.25,
                    "tickValue": 5.0,
                    "activeContract": true
                }
            ]
        }))))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let contract = client.find_contract("NQ").await.unwrap().unwrap();
    assert_eq!(contract.id, "CON.F.US.ENQ.M25");
    assert_eq!(contract.tick_size, "0.25".parse::<Decimal>().unwrap());

    assert!(client.find_contract("CL").await.unwrap().is_none());
}

#[tokio::test]
async fn test_place_order_returns_order_id() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Order/place"))
        .and(body_json(serde_json::json!({
            "accountId": 123,
            "contractId": "CON.F.US.EP.M25",
            "type": 1,
            "side": 0,
            "size": 2,
            "limitPrice": 5000.25,
            "stopPrice": null,
            "trailPrice": null,
            "customTag": null,
            "linkedOrderId": null
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({ "orderId": 9056 }))),
        )
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = PlaceOrderRequest::limit(
        123,
        "CON.F.US.EP.M25",
        OrderSide::Buy,
        2,
        "5000.25".parse::<Decimal>().unwrap(),
    );
    let placed = client.place_order(&request).await.unwrap();

    assert!(placed.status.is_success());
    assert_eq!(placed.payload.order_id, Some(9056));
}

#[tokio::test]
async fn test_place_order_failure_is_order_error() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Order/place"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "errorCode": 3,
            "errorMessage": "insufficient margin"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = PlaceOrderRequest::market(123, "CON.F.US.EP.M25", OrderSide::Sell, 1);
    let err = client.place_order(&request).await.unwrap_err();

    match err {
        TopstepError::Order(api) => {
            assert_eq!(api.message, "insufficient margin");
            assert_eq!(api.code, Some(3));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_search_orders_omits_missing_end() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Order/search"))
        .and(body_json(serde_json::json!({
            "accountId": 123,
            "startTimestamp": "2025-01-02T03:04:05Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({
            "orders": [{
                "id": 1,
                "accountId": 123,
                "contractId": "CON.F.US.EP.M25",
                "creationTimestamp": "2025-01-02T03:05:00Z",
                "updateTimestamp": null,
                "status": 2,
                "type": 2,
                "side": 0,
                "size": 1,
                "limitPrice": null,
                "stopPrice": null,
                "fillVolume": 1,
                "filledPrice": 5001.5
            }]
        }))))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let orders = client
        .search_orders(123, datetime!(2025-01-02 03:04:05 UTC), None)
        .await
        .unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order_status(), Some(OrderStatus::Filled));
    assert_eq!(orders[0].filled_price, Some("5001.5".parse::<Decimal>().unwrap()));
}

#[tokio::test]
async fn test_cancel_order_returns_envelope() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Order/cancel"))
        .and(body_json(serde_json::json!({ "accountId": 123, "orderId": 9056 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({}))))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let envelope = client.cancel_order(123, 9056).await.unwrap();
    assert!(envelope.status.is_success());
    assert!(envelope.payload.is_empty());
}

#[tokio::test]
async fn test_modify_order_sends_nulls() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Order/modify"))
        .and(body_json(serde_json::json!({
            "accountId": 123,
            "orderId": 9056,
            "size": null,
            "limitPrice": null,
            "stopPrice": 4990.0,
            "trailPrice": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = ModifyOrderRequest::new(123, 9056).stop_price("4990".parse::<Decimal>().unwrap());
    assert_ok!(client.modify_order(&request).await);
}

#[tokio::test]
async fn test_open_positions_and_close() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Position/searchOpen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({
            "positions": [{
                "id": 77,
                "accountId": 123,
                "contractId": "CON.F.US.EP.M25",
                "creationTimestamp": "2025-01-02T03:05:00Z",
                "type": 1,
                "size": 2,
                "averagePrice": 5000.75
            }]
        }))))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/Position/partialCloseContract"))
        .and(body_json(serde_json::json!({
            "accountId": 123,
            "contractId": "CON.F.US.EP.M25",
            "size": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/Position/closeContract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "errorCode": 2,
            "errorMessage": "position not found"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let positions = client.get_open_positions(123).await.unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].direction(), Some(PositionType::Short));
    assert_eq!(positions[0].average_price, "5000.75".parse::<Decimal>().unwrap());

    assert_ok!(
        client
            .partial_close_position(123, &positions[0].contract_id, 1)
            .await
    );

    let err = client
        .close_position(123, &positions[0].contract_id)
        .await
        .unwrap_err();
    assert!(matches!(err, TopstepError::Position(_)));
    assert_eq!(err.error_code(), Some(2));
}

#[tokio::test]
async fn test_search_trades_with_half_turn() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Trade/search"))
        .and(body_string_contains("\"endTimestamp\":\"2025-01-03T00:00:00Z\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({
            "trades": [
                {
                    "id": 1,
                    "accountId": 123,
                    "contractId": "CON.F.US.EP.M25",
                    "creationTimestamp": "2025-01-02T03:05:00Z",
                    "price": 5000.0,
                    "profitAndLoss": null,
                    "fees": 1.4,
                    "side": 0,
                    "size": 1,
                    "voided": false,
                    "orderId": 10
                },
                {
                    "id": 2,
                    "accountId": 123,
                    "contractId": "CON.F.US.EP.M25",
                    "creationTimestamp": "2025-01-02T04:05:00Z",
                    "price": 5010.0,
                    "profitAndLoss": 500.0,
                    "fees": 1.4,
                    "side": 1,
                    "size": 1,
                    "voided": false,
                    "orderId": 11
                }
            ]
        }))))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let trades = client
        .search_trades(
            123,
            datetime!(2025-01-02 00:00:00 UTC),
            Some(datetime!(2025-01-03 00:00:00 UTC)),
        )
        .await
        .unwrap();

    assert_eq!(trades.len(), 2);
    assert!(trades[0].is_half_turn());
    assert!(!trades[1].is_half_turn());
    assert_eq!(trades[1].profit_and_loss, Some("500".parse::<Decimal>().unwrap()));
    assert_eq!(trades[1].trade_side(), Some(OrderSide::Sell));
}

#[tokio::test]
async fn test_missing_error_message_is_unknown_error() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Trade/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "errorCode": 1
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client
        .search_trades(123, datetime!(2025-01-02 00:00:00 UTC), None)
        .await
        .unwrap_err();

    match err {
        TopstepError::Api(api) => {
            assert_eq!(api.message, "Unknown error");
            assert_eq!(api.code, Some(1));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_status_is_not_translated() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Account/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.search_accounts(false).await.unwrap_err();

    assert!(matches!(err, TopstepError::Http(_)));
    assert_eq!(err.http_status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    assert!(err.api_error().is_none());
}

#[tokio::test]
async fn test_validate_token() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Auth/validate"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    assert!(!client.session().validate_token().await.unwrap());

    client.session().login().await.unwrap();
    assert!(client.session().validate_token().await.unwrap());
}

#[tokio::test]
async fn test_validate_rejected_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Auth/validate"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = build_client(&server);
    client
        .session()
        .restore("revoked", time::OffsetDateTime::now_utc() + time::Duration::hours(1));
    assert!(!client.session().validate_token().await.unwrap());
}

async fn open_order_count<C: TopstepApi>(client: &C, account_id: i64) -> usize {
    client
        .get_open_orders(account_id)
        .await
        .map(|orders| orders.len())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_client_through_trait() {
    let server = MockServer::start().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path("/api/Order/searchOpen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(serde_json::json!({
            "orders": [{
                "id": 5,
                "accountId": 123,
                "contractId": "CON.F.US.EP.M25",
                "status": 1,
                "type": 1,
                "side": 1,
                "size": 1,
                "limitPrice": 5100.0
            }]
        }))))
        .mount(&server)
        .await;

    let client = build_client(&server);
    assert_eq!(open_order_count(&client, 123).await, 1);
}

#[tokio::test]
async fn test_failed_login_keeps_previous_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Auth/loginKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "errorCode": 7,
            "errorMessage": "bad key"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let expires_at = time::OffsetDateTime::now_utc() + time::Duration::hours(2);
    client.session().restore("kept", expires_at);

    let err = assert_err!(client.session().login().await);
    assert!(err.is_authentication());

    assert_eq!(client.session().token_expiry(), Some(expires_at));
    assert_eq!(client.session().status(), SessionStatus::Valid);
    // Still fresh, so no second login is attempted.
    assert_eq!(client.session().get_valid_token().await.unwrap(), "kept");
}
