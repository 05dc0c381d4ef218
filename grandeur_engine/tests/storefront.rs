//! Cart, wishlist, order lifecycle and review behaviour against a real SQLite database.
use grandeur_common::Naira;
use grandeur_engine::{
    db_types::{NewReview, OrderId, OrderStatusType},
    CartApiError,
    CartManagement,
    CatalogApiError,
    CatalogManagement,
    OrderApiError,
    OrderManagement,
};
use log::*;
use tokio::runtime::Runtime;

mod support;

use support::{add_line, checkout_api, confirmation_for, new_test_db, seed_catalog, seed_user, tear_down};

#[test]
fn adding_twice_tops_up_the_line() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = new_test_db().await;
        let user = seed_user(&db, "femi@example.com").await;
        let (shirt, _) = seed_catalog(&db).await;

        let (line, is_new) = db
            .add_to_cart(user.id, shirt.id, 1, Some("L".to_string()), None)
            .await
            .expect("Error adding to cart");
        assert!(is_new);
        assert_eq!(line.quantity, 1);
        assert_eq!(line.selected_size.as_deref(), Some("L"));

        let (line, is_new) = db
            .add_to_cart(user.id, shirt.id, 2, None, Some("white".to_string()))
            .await
            .expect("Error adding to cart");
        assert!(!is_new);
        assert_eq!(line.quantity, 3);
        // Unspecified selections keep their previous values; new ones replace them.
        assert_eq!(line.selected_size.as_deref(), Some("L"));
        assert_eq!(line.selected_color.as_deref(), Some("white"));

        let updated = db
            .update_cart_line(user.id, shirt.id, Some(5), None, None)
            .await
            .expect("Error updating cart line");
        assert_eq!(updated.quantity, 5);

        db.remove_from_cart(user.id, shirt.id).await.expect("Error removing line");
        let err = db.remove_from_cart(user.id, shirt.id).await.expect_err("Expected missing line");
        assert!(matches!(err, CartApiError::LineNotFound));
        tear_down(db).await;
    });
    info!("🚀️ test complete");
}

#[test]
fn unknown_products_cannot_be_carted() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = new_test_db().await;
        let user = seed_user(&db, "gina@example.com").await;
        seed_catalog(&db).await;
        let err = db.add_to_cart(user.id, 404_404, 1, None, None).await.expect_err("Expected missing product");
        assert!(matches!(err, CartApiError::ProductNotFound(404_404)));
        tear_down(db).await;
    });
}

#[test]
fn wishlist_rejects_duplicates() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = new_test_db().await;
        let user = seed_user(&db, "hauwa@example.com").await;
        let (shirt, belt) = seed_catalog(&db).await;

        db.add_to_wishlist(user.id, shirt.id).await.expect("Error wishlisting");
        db.add_to_wishlist(user.id, belt.id).await.expect("Error wishlisting");
        let err = db.add_to_wishlist(user.id, shirt.id).await.expect_err("Expected duplicate");
        assert!(matches!(err, CartApiError::AlreadyInWishlist));

        let wishlist = db.fetch_wishlist(user.id).await.expect("Error fetching wishlist");
        assert_eq!(wishlist.len(), 2);

        let removed = db.clear_wishlist(user.id).await.expect("Error clearing wishlist");
        assert_eq!(removed, 2);
        tear_down(db).await;
    });
}

#[test]
fn only_pending_orders_can_be_cancelled() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = new_test_db().await;
        let user = seed_user(&db, "ike@example.com").await;
        let (shirt, _) = seed_catalog(&db).await;
        add_line(&db, &user, &shirt, 1).await;

        let api = checkout_api(&db);
        let reference = OrderId::random();
        let confirmation = confirmation_for(&reference, "821000444", user.id, Naira::from_naira(5_000));
        api.reconcile_confirmed_charge(confirmation).await.expect("Error reconciling");

        // The order settled as Completed; cancellation is a status transition reserved for Pending orders.
        let err = db.cancel_order(&reference, user.id).await.expect_err("Expected cancellation to be refused");
        assert!(matches!(err, OrderApiError::CannotCancel));

        let order = db.fetch_order(&reference, Some(user.id)).await.expect("Error fetching order").unwrap();
        assert_eq!(order.order.status, OrderStatusType::Completed);
        tear_down(db).await;
    });
}

#[test]
fn status_updates_append_tracking_history() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = new_test_db().await;
        let user = seed_user(&db, "jide@example.com").await;
        let (shirt, _) = seed_catalog(&db).await;
        add_line(&db, &user, &shirt, 1).await;

        let api = checkout_api(&db);
        let reference = OrderId::random();
        let confirmation = confirmation_for(&reference, "821000666", user.id, Naira::from_naira(5_000));
        api.reconcile_confirmed_charge(confirmation).await.expect("Error reconciling");

        db.update_order_status(&reference, OrderStatusType::Shipped).await.expect("Error updating status");
        db.update_order_status(&reference, OrderStatusType::Delivered).await.expect("Error updating status");

        let events = db.fetch_tracking(&reference, Some(user.id)).await.expect("Error fetching tracking");
        let statuses: Vec<_> = events.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![OrderStatusType::Completed, OrderStatusType::Shipped, OrderStatusType::Delivered],
            "history is append-only and in order"
        );
        tear_down(db).await;
    });
}

#[test]
fn reviews_require_a_delivered_order() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = new_test_db().await;
        let user = seed_user(&db, "kemi@example.com").await;
        let (shirt, _) = seed_catalog(&db).await;
        add_line(&db, &user, &shirt, 1).await;

        let api = checkout_api(&db);
        let reference = OrderId::random();
        let confirmation = confirmation_for(&reference, "821000888", user.id, Naira::from_naira(5_000));
        let settlement = api.reconcile_confirmed_charge(confirmation).await.expect("Error reconciling");
        let order_rowid = settlement.order.id;

        let review = NewReview {
            user_id: user.id,
            product_id: shirt.id,
            order_id: order_rowid,
            rating: 5,
            comment: "Fits perfectly".to_string(),
            images: vec![],
        };

        // Not delivered yet.
        let err = db.create_review(review.clone()).await.expect_err("Expected ineligible order");
        assert!(matches!(err, CatalogApiError::OrderNotEligibleForReview));

        db.update_order_status(&reference, OrderStatusType::Delivered).await.expect("Error updating status");
        db.create_review(review.clone()).await.expect("Error creating review");

        // One review per (user, product, order).
        let err = db.create_review(review).await.expect_err("Expected duplicate review");
        assert!(matches!(err, CatalogApiError::ReviewAlreadyExists));

        let reviews = db.fetch_reviews_for_product(shirt.id).await.expect("Error fetching reviews");
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].firstname, "Ada");
        tear_down(db).await;
    });
}
