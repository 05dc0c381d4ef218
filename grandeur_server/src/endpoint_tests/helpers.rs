use chrono::{Duration, Utc};
use flutterwave_tools::{ChargeData, FlutterwaveConfig};
use grandeur_common::{Naira, Secret};
use grandeur_engine::db_types::{Order, OrderId, OrderStatusType, Receipt, ReceiptItem, Role, Settlement, User};
use serde_json::json;

use crate::{auth::TokenIssuer, config::AuthConfig};

pub const TEST_JWT_SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const TEST_REFERENCE: &str = "d2b8a225-6dd0-4f30-8f3c-2a7c2f0a51b1";
pub const TEST_TRANSACTION_ID: i64 = 821000123;

pub fn auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new(TEST_JWT_SECRET.to_string()), token_lifetime: Duration::hours(2) }
}

pub fn flutterwave_config() -> FlutterwaveConfig {
    FlutterwaveConfig {
        base_url: "http://localhost:0".to_string(),
        secret_key: Secret::new("FLWSECK_TEST-x".to_string()),
        redirect_url: "http://localhost:5173/verify-payment".to_string(),
        currency: "NGN".to_string(),
    }
}

pub fn customer() -> User {
    User {
        id: 7,
        public_id: "4dd7a9c0-2f27-4b8e-9d3e-63bd6cde2ab1".to_string(),
        firstname: "Ada".to_string(),
        lastname: "Obi".to_string(),
        email: "ada@example.com".to_string(),
        phone: Some("+2348000000000".to_string()),
        address: Some("12 Marina Rd, Lagos".to_string()),
        image: None,
        role: Role::Customer,
        email_verified: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn valid_token(user: &User) -> String {
    TokenIssuer::new(&auth_config()).issue_token(user).expect("Could not issue test token")
}

pub fn completed_order() -> Order {
    Order {
        id: 1,
        order_id: OrderId(TEST_REFERENCE.to_string()),
        user_id: 7,
        email: "ada@example.com".to_string(),
        total_price: Naira::from_naira(13_000),
        currency: "NGN".to_string(),
        status: OrderStatusType::Completed,
        transaction_id: Some(TEST_TRANSACTION_ID.to_string()),
        payment_data: Some(r#"{"id":821000123,"status":"successful","amount":13000.0,"currency":"NGN"}"#.to_string()),
        paid_at: Some(Utc::now()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn receipt_with_items() -> (Receipt, Vec<ReceiptItem>) {
    let receipt = Receipt {
        id: 1,
        order_id: OrderId(TEST_REFERENCE.to_string()),
        user_id: 7,
        name: "Ada Obi".to_string(),
        email: "ada@example.com".to_string(),
        phone: Some("+2348000000000".to_string()),
        total: Naira::from_naira(13_000),
        transaction_id: TEST_TRANSACTION_ID.to_string(),
        status: "Order Placed".to_string(),
        created_at: Utc::now(),
    };
    let items = vec![
        ReceiptItem {
            id: 1,
            receipt_id: 1,
            product_id: 11,
            name: "Linen Shirt".to_string(),
            image: "https://img.example.com/shirt.jpg".to_string(),
            unit_price: Naira::from_naira(5_000),
            quantity: 2,
            line_total: Naira::from_naira(10_000),
        },
        ReceiptItem {
            id: 2,
            receipt_id: 1,
            product_id: 12,
            name: "Canvas Belt".to_string(),
            image: "https://img.example.com/belt.jpg".to_string(),
            unit_price: Naira::from_naira(3_000),
            quantity: 1,
            line_total: Naira::from_naira(3_000),
        },
    ];
    (receipt, items)
}

pub fn new_settlement() -> Settlement {
    let (receipt, items) = receipt_with_items();
    Settlement { order: completed_order(), receipt: Some(receipt), receipt_items: items, newly_settled: true }
}

pub fn successful_charge() -> ChargeData {
    ChargeData {
        id: TEST_TRANSACTION_ID,
        tx_ref: TEST_REFERENCE.to_string(),
        flw_ref: Some("FLW-MOCK-9000".to_string()),
        amount: 13_000.0,
        currency: "NGN".to_string(),
        status: "successful".to_string(),
        customer: None,
        meta: Some(json!({ "userId": 7, "orderId": TEST_REFERENCE })),
    }
}

pub fn webhook_body(event: &str, charge: &ChargeData) -> serde_json::Value {
    json!({ "event": event, "data": charge })
}
