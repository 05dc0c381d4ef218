//! Endpoint tests for the payment flow, run against mock backends and a mock gateway. No network traffic, no
//! database: these verify the HTTP contract — status codes, envelopes and, crucially, which engine operations do and
//! do not get invoked on each path.
use actix_web::{guard, http::StatusCode, test, web, App};
use flutterwave_tools::FlutterwaveApiError;
use grandeur_common::Secret;
use grandeur_engine::{events::EventProducers, AccountApi, CheckoutApi, CheckoutApiError};
use serde_json::{json, Value};

use super::{
    helpers::{
        auth_config,
        completed_order,
        customer,
        flutterwave_config,
        new_settlement,
        successful_charge,
        valid_token,
        webhook_body,
        TEST_REFERENCE,
        TEST_TRANSACTION_ID,
    },
    mocks::{MockAccountManager, MockCheckoutDb, MockGateway},
};
use crate::{
    auth::TokenIssuer,
    middleware::SignatureMiddlewareFactory,
    payment_routes::{payment_webhook, InitializePaymentRoute, VerifyPaymentRoute},
    server::WEBHOOK_SIGNATURE_HEADER,
};

const WEBHOOK_SECRET: &str = "whsec_test_0001";

fn cart_item(product_id: i64, price_naira: i64, quantity: i64) -> grandeur_engine::db_types::CartItem {
    grandeur_engine::db_types::CartItem {
        product_id,
        name: format!("Product {product_id}"),
        image: String::new(),
        unit_price: grandeur_common::Naira::from_naira(price_naira),
        quantity,
        selected_size: None,
        selected_color: None,
    }
}

/// Spins up the payment scope against the given mocks, fires one request at it, and hands back status + raw body.
async fn call_payment_scope(
    checkout_db: MockCheckoutDb,
    accounts_db: MockAccountManager,
    gateway: MockGateway,
    req: actix_http::Request,
) -> (StatusCode, String) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(CheckoutApi::new(checkout_db, EventProducers::default())))
            .app_data(web::Data::new(AccountApi::new(accounts_db, EventProducers::default())))
            .app_data(web::Data::new(gateway))
            .app_data(web::Data::new(flutterwave_config()))
            .app_data(web::Data::new(TokenIssuer::new(&auth_config())))
            .service(
                web::scope("/api/payment")
                    .service(InitializePaymentRoute::<MockCheckoutDb, MockAccountManager, MockGateway>::new())
                    .service(VerifyPaymentRoute::<MockCheckoutDb, MockAccountManager, MockGateway>::new())
                    .service(
                        web::resource("/webhook")
                            .guard(guard::Post())
                            .wrap(SignatureMiddlewareFactory::new(
                                WEBHOOK_SIGNATURE_HEADER,
                                Secret::new(WEBHOOK_SECRET.to_string()),
                            ))
                            .to(payment_webhook::<MockCheckoutDb>),
                    ),
            ),
    )
    .await;
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, String::from_utf8_lossy(&body).to_string())
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).expect("Response body was not JSON")
}

//----------------------------------------------   Initialize  ----------------------------------------------------

#[actix_web::test]
async fn initialize_returns_link_and_creates_no_order() {
    let _ = env_logger::try_init();
    let mut checkout_db = MockCheckoutDb::new();
    // Only the cart read may happen. Any settlement call would panic the mock and fail the test.
    checkout_db
        .expect_fetch_cart_for_checkout()
        .returning(|_| Ok(vec![cart_item(11, 5_000, 2), cart_item(12, 3_000, 1)]));
    let mut accounts_db = MockAccountManager::new();
    accounts_db.expect_fetch_user_by_email().returning(|_| Ok(Some(customer())));
    let mut gateway = MockGateway::new();
    gateway
        .expect_create_payment_link()
        .withf(|req| req.amount == 13_000.0 && req.currency == "NGN")
        .returning(|_| Ok("https://checkout.flutterwave.com/v3/hosted/pay/mock".to_string()));

    let token = valid_token(&customer());
    let req = test::TestRequest::post()
        .uri("/api/payment/initialize")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "email": "ada@example.com" }))
        .to_request();
    let (status, body) = call_payment_scope(checkout_db, accounts_db, gateway, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let body = parse(&body);
    assert_eq!(body["success"], json!(true));
    assert!(body["link"].as_str().unwrap().starts_with("https://checkout.flutterwave.com/"));
    assert!(!body["orderId"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn initialize_requires_an_email() {
    let _ = env_logger::try_init();
    let token = valid_token(&customer());
    let req = test::TestRequest::post()
        .uri("/api/payment/initialize")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({}))
        .to_request();
    let (status, body) =
        call_payment_scope(MockCheckoutDb::new(), MockAccountManager::new(), MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = parse(&body);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Email is required!"));
}

#[actix_web::test]
async fn initialize_rejects_unauthenticated_callers() {
    let _ = env_logger::try_init();
    let req = test::TestRequest::post()
        .uri("/api/payment/initialize")
        .set_json(json!({ "email": "ada@example.com" }))
        .to_request();
    let (status, _) =
        call_payment_scope(MockCheckoutDb::new(), MockAccountManager::new(), MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn initialize_surfaces_gateway_failures_as_bad_gateway() {
    let _ = env_logger::try_init();
    let mut checkout_db = MockCheckoutDb::new();
    checkout_db.expect_fetch_cart_for_checkout().returning(|_| Ok(vec![cart_item(11, 5_000, 1)]));
    let mut accounts_db = MockAccountManager::new();
    accounts_db.expect_fetch_user_by_email().returning(|_| Ok(Some(customer())));
    let mut gateway = MockGateway::new();
    gateway.expect_create_payment_link().returning(|_| {
        Err(FlutterwaveApiError::QueryError { status: 503, message: "gateway offline".to_string() })
    });

    let token = valid_token(&customer());
    let req = test::TestRequest::post()
        .uri("/api/payment/initialize")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "email": "ada@example.com" }))
        .to_request();
    let (status, _) = call_payment_scope(checkout_db, accounts_db, gateway, req).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

//----------------------------------------------   Verify  ----------------------------------------------------

#[actix_web::test]
async fn verify_requires_a_transaction_id() {
    let _ = env_logger::try_init();
    let req = test::TestRequest::get().uri("/api/payment/verify").to_request();
    let (status, body) =
        call_payment_scope(MockCheckoutDb::new(), MockAccountManager::new(), MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body)["message"], json!("Transaction ID is required!"));
}

#[actix_web::test]
async fn verify_gateway_timeout_touches_nothing() {
    let _ = env_logger::try_init();
    // No expectations on the checkout mock: the handler must not reconcile anything when the gateway is unreachable.
    let mut gateway = MockGateway::new();
    gateway
        .expect_verify_transaction()
        .returning(|_| Err(FlutterwaveApiError::RestResponseError("operation timed out".to_string())));
    let req = test::TestRequest::get().uri("/api/payment/verify?transaction_id=821000123").to_request();
    let (status, _) = call_payment_scope(MockCheckoutDb::new(), MockAccountManager::new(), gateway, req).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn verify_rejects_unsuccessful_charges() {
    let _ = env_logger::try_init();
    let mut gateway = MockGateway::new();
    gateway.expect_verify_transaction().returning(|_| {
        let mut charge = successful_charge();
        charge.status = "failed".to_string();
        Ok(charge)
    });
    let req = test::TestRequest::get().uri("/api/payment/verify?transaction_id=821000123").to_request();
    let (status, body) = call_payment_scope(MockCheckoutDb::new(), MockAccountManager::new(), gateway, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body)["message"], json!("Payment was not successful!"));
}

#[actix_web::test]
async fn verify_settles_the_order_and_returns_the_receipt() {
    let _ = env_logger::try_init();
    let mut gateway = MockGateway::new();
    gateway
        .expect_verify_transaction()
        .withf(|id| id == TEST_TRANSACTION_ID.to_string())
        .returning(|_| Ok(successful_charge()));
    let mut accounts_db = MockAccountManager::new();
    accounts_db.expect_fetch_user_by_id().returning(|_| Ok(Some(customer())));
    let mut checkout_db = MockCheckoutDb::new();
    checkout_db.expect_fetch_order_by_reference().returning(|_| Ok(None));
    checkout_db
        .expect_settle_new_order()
        .withf(|conf| conf.reference.as_str() == TEST_REFERENCE && conf.user_id == 7)
        .returning(|_| Ok(Some(new_settlement())));

    let uri = format!("/api/payment/verify?transaction_id={TEST_TRANSACTION_ID}");
    let req = test::TestRequest::get().uri(&uri).to_request();
    let (status, body) = call_payment_scope(checkout_db, accounts_db, gateway, req).await;
    assert_eq!(status, StatusCode::OK);
    let body = parse(&body);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["orderId"], json!(TEST_REFERENCE));
    assert_eq!(body["data"]["receiptItems"].as_array().unwrap().len(), 2);
}

//----------------------------------------------   Webhook  ----------------------------------------------------

#[actix_web::test]
async fn webhook_with_invalid_signature_never_touches_an_order() {
    let _ = env_logger::try_init();
    // No expectations: any engine call on a forged webhook is a test failure.
    let body = webhook_body("charge.completed", &successful_charge());
    let req = test::TestRequest::post()
        .uri("/api/payment/webhook")
        .insert_header((WEBHOOK_SIGNATURE_HEADER, "not-the-secret"))
        .set_json(body)
        .to_request();
    let (status, _) =
        call_payment_scope(MockCheckoutDb::new(), MockAccountManager::new(), MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn webhook_without_signature_is_rejected() {
    let _ = env_logger::try_init();
    let body = webhook_body("charge.completed", &successful_charge());
    let req = test::TestRequest::post().uri("/api/payment/webhook").set_json(body).to_request();
    let (status, _) =
        call_payment_scope(MockCheckoutDb::new(), MockAccountManager::new(), MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn webhook_acknowledges_and_ignores_foreign_events() {
    let _ = env_logger::try_init();
    let body = webhook_body("transfer.completed", &successful_charge());
    let req = test::TestRequest::post()
        .uri("/api/payment/webhook")
        .insert_header((WEBHOOK_SIGNATURE_HEADER, WEBHOOK_SECRET))
        .set_json(body)
        .to_request();
    let (status, _) =
        call_payment_scope(MockCheckoutDb::new(), MockAccountManager::new(), MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn webhook_duplicate_delivery_is_acknowledged() {
    let _ = env_logger::try_init();
    let mut checkout_db = MockCheckoutDb::new();
    // The order already exists in a settled state: a retry must replay, not resettle.
    checkout_db.expect_fetch_order_by_reference().returning(|_| Ok(Some(completed_order())));
    checkout_db.expect_fetch_receipt_for_order().returning(|_| Ok(None));
    let body = webhook_body("charge.completed", &successful_charge());
    let req = test::TestRequest::post()
        .uri("/api/payment/webhook")
        .insert_header((WEBHOOK_SIGNATURE_HEADER, WEBHOOK_SECRET))
        .set_json(body)
        .to_request();
    let (status, body) = call_payment_scope(checkout_db, MockAccountManager::new(), MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["success"], json!(true));
}

#[actix_web::test]
async fn webhook_without_attribution_is_acknowledged_and_dropped() {
    let _ = env_logger::try_init();
    // No engine expectations: an unattributable charge is logged and dropped, never reconciled.
    let mut charge = successful_charge();
    charge.meta = Some(json!({}));
    let body = webhook_body("charge.completed", &charge);
    let req = test::TestRequest::post()
        .uri("/api/payment/webhook")
        .insert_header((WEBHOOK_SIGNATURE_HEADER, WEBHOOK_SECRET))
        .set_json(body)
        .to_request();
    let (status, body) =
        call_payment_scope(MockCheckoutDb::new(), MockAccountManager::new(), MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["success"], json!(false));
}

#[actix_web::test]
async fn webhook_database_errors_ask_the_gateway_to_retry() {
    let _ = env_logger::try_init();
    let mut checkout_db = MockCheckoutDb::new();
    checkout_db
        .expect_fetch_order_by_reference()
        .returning(|_| Err(CheckoutApiError::DatabaseError("connection pool exhausted".to_string())));
    let body = webhook_body("charge.completed", &successful_charge());
    let req = test::TestRequest::post()
        .uri("/api/payment/webhook")
        .insert_header((WEBHOOK_SIGNATURE_HEADER, WEBHOOK_SECRET))
        .set_json(body)
        .to_request();
    let (status, _) = call_payment_scope(checkout_db, MockAccountManager::new(), MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
