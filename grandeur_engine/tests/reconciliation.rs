//! The exactly-once guarantees of the checkout reconciliation flow, exercised against a real SQLite database.
use std::sync::Arc;

use grandeur_common::Naira;
use grandeur_engine::{
    db_types::{OrderId, OrderStatusType},
    events::EventProducers,
    shop_objects::OrderQueryFilter,
    CartManagement,
    CheckoutApi,
    CheckoutApiError,
    CheckoutDatabase,
    OrderManagement,
    SqliteDatabase,
};
use log::*;
use tokio::runtime::Runtime;

mod support;

use support::{add_line, checkout_api, confirmation_for, new_test_db, seed_catalog, seed_user, tear_down};

const TX_ID: &str = "821000123";

#[test]
fn verify_then_webhook_is_idempotent() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = new_test_db().await;
        let user = seed_user(&db, "ada@example.com").await;
        let (shirt, belt) = seed_catalog(&db).await;
        add_line(&db, &user, &shirt, 2).await;
        add_line(&db, &user, &belt, 1).await;

        let api = checkout_api(&db);
        let (items, total) = api.cart_for_checkout(user.id).await.expect("Error reading cart");
        assert_eq!(items.len(), 2);
        assert_eq!(total, Naira::from_naira(13_000));

        let reference = OrderId::random();
        let confirmation = confirmation_for(&reference, TX_ID, user.id, total);

        // First arrival (the buyer's redirect) settles the order.
        let first = api.reconcile_confirmed_charge(confirmation.clone()).await.expect("Error reconciling");
        assert!(first.newly_settled);
        assert_eq!(first.order.order_id, reference);
        assert_eq!(first.order.status, OrderStatusType::Completed);
        assert_eq!(first.order.total_price, Naira::from_naira(13_000));
        assert_eq!(first.order.transaction_id.as_deref(), Some(TX_ID));
        let receipt = first.receipt.as_ref().expect("Receipt should have been created");
        assert_eq!(receipt.total, Naira::from_naira(13_000));
        assert_eq!(first.receipt_items.len(), 2);

        // The cart clears on success.
        let cart = db.fetch_cart(user.id).await.expect("Error fetching cart");
        assert!(cart.is_empty());

        // Second arrival (the gateway's webhook retry) is an idempotent replay.
        let second = api.reconcile_confirmed_charge(confirmation).await.expect("Error reconciling replay");
        assert!(!second.newly_settled);
        assert_eq!(second.order.id, first.order.id);

        let (orders, total_count) =
            db.search_orders(OrderQueryFilter::default().with_user_id(user.id)).await.expect("Error listing orders");
        assert_eq!(total_count, 1);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].items.len(), 2);
        tear_down(db).await;
    });
    info!("🚀️ test complete");
}

#[test]
fn concurrent_deliveries_settle_exactly_once() {
    const ATTEMPTS: usize = 8;
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = new_test_db().await;
        let user = seed_user(&db, "bisi@example.com").await;
        let (shirt, _) = seed_catalog(&db).await;
        add_line(&db, &user, &shirt, 1).await;

        let api = Arc::new(CheckoutApi::new(db.clone(), EventProducers::default()));
        let reference = OrderId::random();
        let confirmation = confirmation_for(&reference, "821000777", user.id, Naira::from_naira(5_000));

        let mut handles = Vec::with_capacity(ATTEMPTS);
        for _ in 0..ATTEMPTS {
            let api = Arc::clone(&api);
            let confirmation = confirmation.clone();
            handles.push(tokio::spawn(async move { api.reconcile_confirmed_charge(confirmation).await }));
        }
        let mut settled = 0;
        for handle in handles {
            let settlement = handle.await.expect("Task panicked").expect("Error reconciling");
            assert_eq!(settlement.order.order_id, reference);
            if settlement.newly_settled {
                settled += 1;
            }
        }
        assert_eq!(settled, 1, "exactly one delivery performs the settlement");

        let (_, order_count) =
            db.search_orders(OrderQueryFilter::default().with_user_id(user.id)).await.expect("Error listing orders");
        assert_eq!(order_count, 1, "uniqueness constraint holds under concurrency");
        tear_down(db).await;
    });
    info!("🚀️ test complete");
}

#[test]
fn empty_cart_still_creates_the_order() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = new_test_db().await;
        let user = seed_user(&db, "chidi@example.com").await;
        seed_catalog(&db).await;

        // No cart lines at all; the confirmation must still be recorded.
        let api = checkout_api(&db);
        let reference = OrderId::random();
        let confirmation = confirmation_for(&reference, "821000555", user.id, Naira::from_naira(2_500));
        let settlement = api.reconcile_confirmed_charge(confirmation).await.expect("Error reconciling");
        assert!(settlement.newly_settled);
        assert_eq!(settlement.order.total_price, Naira::from_naira(2_500));
        assert!(settlement.receipt_items.is_empty());

        let order = db.fetch_order(&reference, Some(user.id)).await.expect("Error fetching order").unwrap();
        assert!(order.items.is_empty());
        tear_down(db).await;
    });
}

#[test]
fn failed_reconciliation_commits_nothing() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = new_test_db().await;
        let user = seed_user(&db, "dayo@example.com").await;
        let (shirt, _) = seed_catalog(&db).await;
        add_line(&db, &user, &shirt, 1).await;

        let api = checkout_api(&db);
        let reference = OrderId::random();
        // The metadata points at a user that does not exist; reconciliation must fail without side effects.
        let confirmation = confirmation_for(&reference, "821000999", 987_654, Naira::from_naira(5_000));
        let err = api.reconcile_confirmed_charge(confirmation.clone()).await.expect_err("Expected an error");
        assert!(matches!(err, CheckoutApiError::UserNotFound(987_654)));

        let order = db.fetch_order_by_reference(&reference).await.expect("Error fetching order");
        assert!(order.is_none(), "no order may exist after a rolled-back settlement");
        let cart = db.fetch_cart(user.id).await.expect("Error fetching cart");
        assert_eq!(cart.len(), 1, "a failed reconciliation leaves carts untouched");

        // A retry with corrected attribution succeeds.
        let retried = confirmation_for(&reference, "821000999", user.id, Naira::from_naira(5_000));
        let settlement = api.reconcile_confirmed_charge(retried).await.expect("Error reconciling retry");
        assert!(settlement.newly_settled);
        assert!(db.fetch_cart(user.id).await.expect("Error fetching cart").is_empty());
        tear_down(db).await;
    });
}
