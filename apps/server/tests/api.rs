use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use nuchain_core::ledger::{LedgerClientTrait, LedgerResult, LedgerTx, WalletBalance};
use nuchain_server::{
    api::app_router,
    build_state, build_state_with_ledger,
    config::{Config, LedgerConfig},
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn build_test_router() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let mut config = Config::from_env().unwrap();
    config.db_path = tmp.path().join("test.db").to_string_lossy().into_owned();
    config.seed_reactors = true;
    config.ledger = None;

    let state = build_state(&config).await.unwrap();
    (app_router(state, &config).unwrap(), tmp)
}

/// Ledger whose lock call answers only after `lock_delay`.
struct SlowLedger {
    lock_delay: Duration,
}

impl SlowLedger {
    fn tx(name: &str) -> LedgerResult<LedgerTx> {
        Ok(LedgerTx {
            tx_ref: format!("0x{}", name),
            block_number: Some(1),
        })
    }
}

#[async_trait]
impl LedgerClientTrait for SlowLedger {
    async fn lock(&self, _wallet_ref: &str, _amount: Decimal) -> LedgerResult<LedgerTx> {
        tokio::time::sleep(self.lock_delay).await;
        Self::tx("lock")
    }

    async fn unlock_all(&self, _wallet_ref: &str) -> LedgerResult<LedgerTx> {
        Self::tx("unlock")
    }

    async fn mint_signup(&self, _wallet_ref: &str) -> LedgerResult<LedgerTx> {
        Self::tx("mint")
    }

    async fn burn_account(&self, _wallet_ref: &str) -> LedgerResult<LedgerTx> {
        Self::tx("burn")
    }

    async fn query_balance(&self, wallet_ref: &str) -> LedgerResult<WalletBalance> {
        Ok(WalletBalance {
            address: wallet_ref.to_string(),
            total: Decimal::ZERO,
            locked: Decimal::ZERO,
            available: Decimal::ZERO,
        })
    }
}

/// Router with a 100ms request timeout in front of `ledger`.
async fn build_ledger_router(ledger: SlowLedger, ledger_timeout: Duration) -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let mut config = Config::from_env().unwrap();
    config.db_path = tmp.path().join("test.db").to_string_lossy().into_owned();
    config.seed_reactors = true;
    config.request_timeout = Duration::from_millis(100);
    config.ledger = Some(LedgerConfig {
        base_url: "http://ledger.invalid".to_string(),
        api_key: None,
        timeout: ledger_timeout,
    });

    let ledger: Arc<dyn LedgerClientTrait> = Arc::new(ledger);
    let state = build_state_with_ledger(&config, Some(ledger)).await.unwrap();
    (app_router(state, &config).unwrap(), tmp)
}

async fn create_user_with_wallet(app: &Router, username: &str, wallet: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({ "username": username, "walletAddress": wallet })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user_id: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create_user(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({ "username": username, "email": format!("{}@example.com", username) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn healthz_works() {
    let (app, _tmp) = build_test_router().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn lists_and_resolves_seeded_reactors() {
    let (app, _tmp) = build_test_router().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/reactors", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let reactors = body.as_array().unwrap();
    assert_eq!(reactors.len(), 5);
    assert_eq!(reactors[0]["slug"], "nuwave");

    let (status, body) = send(&app, Method::GET, "/api/v1/reactors/nuwave", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "NuWave");
    assert_eq!(body["fundingPercentage"].as_f64(), Some(0.0));

    let (status, body) = send(&app, Method::GET, "/api/v1/reactors/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn signup_grants_starting_balance() {
    let (app, _tmp) = build_test_router().await;
    let user_id = create_user(&app, "alice").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/users/me", Some(&user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["balance"].as_f64(), Some(25000.0));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({ "username": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["fields"]["username"].is_string());
}

#[tokio::test]
async fn requests_without_identity_are_rejected() {
    let (app, _tmp) = build_test_router().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/investments", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn invest_then_summarize() {
    let (app, _tmp) = build_test_router().await;
    let user_id = create_user(&app, "bob").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/investments",
        Some(&user_id),
        Some(json!({ "reactorId": "nuwave", "amount": 10000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Successfully invested 10,000.00 $NUC in NuWave");
    assert_eq!(body["remainingBalance"].as_f64(), Some(15000.0));
    assert_eq!(body["amountInvested"].as_f64(), Some(10000.0));
    assert!(body.get("externalTxRef").is_none());
    let investment_id = body["investment"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/investments/{}", investment_id),
        Some(&user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reactor"]["currentFunding"].as_f64(), Some(10000.0));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/investments/portfolio-summary",
        Some(&user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalInvested"].as_f64(), Some(10000.0));
    assert_eq!(body["investmentCount"], 1);
    assert_eq!(body["reactorsInvestedIn"], json!(["NuWave"]));
    let projections = body["projections"].as_array().unwrap();
    assert_eq!(projections.len(), 4);
    assert_eq!(projections[0]["timePeriodYears"], 1);
    assert_eq!(projections[0]["totalRoi"].as_f64(), Some(450.0));
    assert_eq!(projections[0]["totalReturn"].as_f64(), Some(10450.0));
    assert_eq!(projections[3]["timePeriodYears"], 10);
    assert_eq!(projections[3]["totalCarbonOffset"].as_f64(), Some(85000.0));
}

#[tokio::test]
async fn empty_portfolio_summary_is_zeroed() {
    let (app, _tmp) = build_test_router().await;
    let user_id = create_user(&app, "carol").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/investments/portfolio-summary",
        Some(&user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalInvested"].as_f64(), Some(0.0));
    assert_eq!(body["investmentCount"], 0);
    assert_eq!(body["reactorsInvestedIn"], json!([]));
}

#[tokio::test]
async fn rejected_investments_map_to_error_kinds() {
    let (app, _tmp) = build_test_router().await;
    let user_id = create_user(&app, "dave").await;

    let cases = [
        (json!({ "reactorId": "nuwave", "amount": 30000 }), StatusCode::CONFLICT, "insufficient_funds"),
        (json!({ "reactorId": "nuwave", "amount": "abc" }), StatusCode::BAD_REQUEST, "validation_error"),
        (json!({ "reactorId": "nuwave", "amount": 10.123 }), StatusCode::BAD_REQUEST, "validation_error"),
        (json!({ "reactorId": "nuwave", "amount": 0 }), StatusCode::BAD_REQUEST, "validation_error"),
        (json!({ "reactorId": "nuwave" }), StatusCode::BAD_REQUEST, "validation_error"),
        (json!({ "reactorId": "unknown", "amount": 100 }), StatusCode::NOT_FOUND, "not_found"),
    ];

    for (payload, expected_status, expected_kind) in cases {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/investments",
            Some(&user_id),
            Some(payload.clone()),
        )
        .await;
        assert_eq!(status, expected_status, "payload {}", payload);
        assert_eq!(body["error"], expected_kind, "payload {}", payload);
    }

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/investments",
        Some(&user_id),
        Some(json!({ "reactorId": "nuwave", "amount": 30000 })),
    )
    .await;
    assert_eq!(body["available"].as_f64(), Some(25000.0));

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/investments",
        Some(&user_id),
        Some(json!({ "reactorId": "nuwave", "amount": "abc" })),
    )
    .await;
    assert!(body["fields"]["amount"].is_string());

    // Nothing was committed by the rejected requests.
    let (_, body) = send(&app, Method::GET, "/api/v1/users/me", Some(&user_id), None).await;
    assert_eq!(body["balance"].as_f64(), Some(25000.0));
    let (_, body) = send(&app, Method::GET, "/api/v1/investments", Some(&user_id), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn investments_are_scoped_to_their_owner() {
    let (app, _tmp) = build_test_router().await;
    let owner = create_user(&app, "erin").await;
    let other = create_user(&app, "frank").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/investments",
        Some(&owner),
        Some(json!({ "reactorId": "fermi_iii", "amount": "500.50" })),
    )
    .await;
    let investment_id = body["investment"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/investments/{}", investment_id),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/api/v1/investments", Some(&other), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn reset_wallet_restores_balance_and_funding() {
    let (app, _tmp) = build_test_router().await;
    let user_id = create_user(&app, "grace").await;

    for (reactor, amount) in [("nuwave", 5000), ("nexus_core", 2500)] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/investments",
            Some(&user_id),
            Some(json!({ "reactorId": reactor, "amount": amount })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users/me/wallet/reset",
        Some(&user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"].as_f64(), Some(25000.0));
    assert_eq!(body["investmentsRemoved"], 2);
    assert_eq!(
        body["message"],
        "Wallet reset successfully! Your balance is now 25,000.00 $NUC."
    );

    let (_, body) = send(&app, Method::GET, "/api/v1/investments", Some(&user_id), None).await;
    assert_eq!(body, json!([]));
    let (_, body) = send(&app, Method::GET, "/api/v1/reactors/nuwave", None, None).await;
    assert_eq!(body["currentFunding"].as_f64(), Some(0.0));

    // A second reset is a no-op with the same outcome.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users/me/wallet/reset",
        Some(&user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["investmentsRemoved"], 0);
}

#[tokio::test]
async fn deleting_a_user_releases_funding() {
    let (app, _tmp) = build_test_router().await;
    let user_id = create_user(&app, "heidi").await;

    send(
        &app,
        Method::POST,
        "/api/v1/investments",
        Some(&user_id),
        Some(json!({ "reactorId": "nuwave", "amount": 1200 })),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, "/api/v1/users/me", Some(&user_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/v1/users/me", Some(&user_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = send(&app, Method::GET, "/api/v1/reactors/nuwave", None, None).await;
    assert_eq!(body["currentFunding"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn wallet_can_be_attached_and_detached() {
    let (app, _tmp) = build_test_router().await;
    let user_id = create_user(&app, "ivan").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/users/me/wallet",
        Some(&user_id),
        Some(json!({ "walletAddress": " 0xabc " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["walletAddress"], "0xabc");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/users/me/wallet",
        Some(&user_id),
        Some(json!({ "walletAddress": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["walletAddress"].is_null());
}

#[tokio::test]
async fn slow_ledger_lock_is_not_cut_off_by_request_timeout() {
    let ledger = SlowLedger {
        lock_delay: Duration::from_millis(300),
    };
    let (app, _tmp) = build_ledger_router(ledger, Duration::from_secs(2)).await;
    let user_id = create_user_with_wallet(&app, "erin", "0xabc").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/investments",
        Some(&user_id),
        Some(json!({ "reactorId": "nuwave", "amount": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body {}", body);
    assert_eq!(body["externalTxRef"], "0xlock");
    assert_eq!(body["remainingBalance"].as_f64(), Some(24500.0));

    let (_, entries) = send(&app, Method::GET, "/api/v1/reconciliation", None, None).await;
    assert_eq!(entries, json!([]));
}

#[tokio::test]
async fn timed_out_lock_is_reconciled_not_dropped() {
    let ledger = SlowLedger {
        lock_delay: Duration::from_secs(2),
    };
    let (app, _tmp) = build_ledger_router(ledger, Duration::from_millis(50)).await;
    let user_id = create_user_with_wallet(&app, "frank", "0xdef").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/investments",
        Some(&user_id),
        Some(json!({ "reactorId": "nuwave", "amount": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "external_system_error");

    let (status, entries) = send(&app, Method::GET, "/api/v1/reconciliation", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["operation"], "LOCK");
    assert_eq!(entries[0]["walletAddress"], "0xdef");
    assert!(entries[0]["externalTxRef"].is_null());

    let (_, profile) = send(&app, Method::GET, "/api/v1/users/me", Some(&user_id), None).await;
    assert_eq!(profile["balance"].as_f64(), Some(25000.0));
}
