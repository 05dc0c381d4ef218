//! `SqliteDatabase` is a concrete implementation of the Grandeur engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`traits`] module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{addresses, carts, catalog, db_url, new_pool, orders, receipts, reviews, tracking, users, wishlist};
use crate::{
    db_types::{
        Address,
        AddressUpdate,
        CartItem,
        CartLine,
        Category,
        ChargeConfirmation,
        NewAddress,
        NewProduct,
        NewReview,
        NewUser,
        Order,
        OrderId,
        OrderStatusType,
        Product,
        ProductReview,
        Receipt,
        ReceiptItem,
        Review,
        Settlement,
        TrackingEvent,
        User,
        UserCredentials,
        UserProfileUpdate,
        WishlistEntry,
    },
    shop_api::{
        errors::{AccountApiError, CartApiError, CatalogApiError, CheckoutApiError, OrderApiError},
        shop_objects::{AdminOrderStats, OrderQueryFilter, OrderStats, OrderWithItems, UserQueryFilter, UserStats},
    },
    traits::{
        AccountManagement,
        AddressManagement,
        CartManagement,
        CatalogManagement,
        CheckoutDatabase,
        OrderManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl CheckoutDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_cart_for_checkout(&self, user_id: i64) -> Result<Vec<CartItem>, CheckoutApiError> {
        let mut conn = self.pool.acquire().await?;
        let items = carts::fetch_cart_items(user_id, &mut conn).await?;
        Ok(items)
    }

    async fn fetch_order_by_reference(&self, reference: &OrderId) -> Result<Option<Order>, CheckoutApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_reference(reference, &mut conn).await?;
        Ok(order)
    }

    async fn complete_pending_order(
        &self,
        order: &Order,
        confirmation: &ChargeConfirmation,
    ) -> Result<Order, CheckoutApiError> {
        let mut tx = self.pool.begin().await?;
        let updated = orders::complete_order(&order.order_id, confirmation, &mut tx)
            .await?
            .ok_or_else(|| CheckoutApiError::OrderShouldExist(order.order_id.clone()))?;
        tracking::append_tracking_event(
            &updated.order_id,
            OrderStatusType::Completed,
            None,
            Some("Payment confirmed"),
            &mut tx,
        )
        .await?;
        tx.commit().await?;
        debug!("🗃️ Order {} transitioned to Completed on confirmation of {}", updated.order_id,
               confirmation.transaction_id);
        Ok(updated)
    }

    /// The settlement transaction. Everything between `begin` and `commit` is atomic: a failure (including losing
    /// the uniqueness race) rolls back the order, its items, the receipt and the cart clearing together.
    ///
    /// The order INSERT is deliberately the first statement inside the transaction. SQLite refuses to upgrade a
    /// shared lock to a write lock when another writer is active (the busy handler is not consulted for that
    /// upgrade), so a read-then-write transaction here would fail spuriously under the verify/webhook race instead
    /// of waiting its turn. Leading with the write serialises concurrent settlements and lets the loser observe a
    /// clean uniqueness violation.
    async fn settle_new_order(
        &self,
        confirmation: &ChargeConfirmation,
    ) -> Result<Option<Settlement>, CheckoutApiError> {
        let user_id = confirmation.user_id;
        let mut conn = self.pool.acquire().await?;
        let user = users::user_by_id(user_id, &mut conn)
            .await
            .map_err(|e| CheckoutApiError::DatabaseError(e.to_string()))?
            .ok_or(CheckoutApiError::UserNotFound(user_id))?;
        drop(conn);
        let mut tx = self.pool.begin().await?;
        let order = match orders::insert_settled_order(confirmation, &user.email, &mut tx).await {
            Ok(order) => order,
            Err(e) if users::is_unique_violation(&e) => {
                // A concurrent settlement for this reference won the race. Nothing from this attempt may survive.
                tx.rollback().await?;
                info!("🗃️ Order {} was settled concurrently by another request", confirmation.reference);
                return Ok(None);
            },
            Err(e) => return Err(e.into()),
        };
        let items = carts::fetch_cart_items(user_id, &mut tx).await?;
        if items.is_empty() {
            // A confirmed charge is never dropped. This happens when a prior partial run already cleared the cart,
            // or checkout was somehow started against an empty cart.
            warn!(
                "🗃️ Cart for user {user_id} was empty while settling {}. Creating the order with no line items.",
                confirmation.reference
            );
        }
        orders::insert_order_items(order.id, &items, &mut tx).await?;
        let (receipt, receipt_items) = receipts::insert_receipt(confirmation, &user, &items, &mut tx).await?;
        carts::clear_cart(user_id, &mut tx).await?;
        tracking::append_tracking_event(
            &order.order_id,
            OrderStatusType::Completed,
            None,
            Some("Order placed and payment confirmed"),
            &mut tx,
        )
        .await?;
        tx.commit().await?;
        debug!("🗃️ Order {} settled for user {user_id} with {} item(s)", order.order_id, receipt_items.len());
        Ok(Some(Settlement { order, receipt: Some(receipt), receipt_items, newly_settled: true }))
    }

    async fn fetch_receipt_for_order(
        &self,
        reference: &OrderId,
    ) -> Result<Option<(Receipt, Vec<ReceiptItem>)>, CheckoutApiError> {
        let mut conn = self.pool.acquire().await?;
        let receipt = receipts::fetch_receipt_for_order(reference.as_str(), &mut conn).await?;
        Ok(receipt)
    }

    async fn close(&mut self) -> Result<(), CheckoutApiError> {
        self.pool.close().await;
        Ok(())
    }
}

impl AccountManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user_by_id(&self, user_id: i64) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::user_by_id(user_id, &mut conn).await
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::user_by_email(email, &mut conn).await
    }

    async fn fetch_credentials(&self, email: &str) -> Result<Option<UserCredentials>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::credentials_by_email(email, &mut conn).await
    }

    async fn update_profile(&self, user_id: i64, update: UserProfileUpdate) -> Result<User, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::update_profile(user_id, update, &mut conn).await?.ok_or(AccountApiError::UserNotFound)
    }

    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        if users::update_password(user_id, password_hash, &mut conn).await? {
            Ok(())
        } else {
            Err(AccountApiError::UserNotFound)
        }
    }

    async fn search_users(&self, filter: UserQueryFilter) -> Result<(Vec<User>, i64), AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::search_users(filter, &mut conn).await
    }

    async fn user_stats(&self) -> Result<UserStats, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::user_stats(&mut conn).await
    }
}

impl AddressManagement for SqliteDatabase {
    async fn fetch_addresses(&self, user_id: i64) -> Result<Vec<Address>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        addresses::fetch_addresses(user_id, &mut conn).await
    }

    async fn create_address(&self, user_id: i64, address: NewAddress) -> Result<Address, AccountApiError> {
        // Clearing the previous default and inserting must not interleave with another request for the same user
        let mut tx = self.pool.begin().await?;
        let created = addresses::insert_address(user_id, address, &mut tx).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update_address(
        &self,
        user_id: i64,
        address_id: i64,
        update: AddressUpdate,
    ) -> Result<Address, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        addresses::update_address(user_id, address_id, update, &mut conn)
            .await?
            .ok_or(AccountApiError::AddressNotFound)
    }

    async fn delete_address(&self, user_id: i64, address_id: i64) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        if addresses::delete_address(user_id, address_id, &mut conn).await? {
            Ok(())
        } else {
            Err(AccountApiError::AddressNotFound)
        }
    }

    async fn set_default_address(&self, user_id: i64, address_id: i64) -> Result<Address, AccountApiError> {
        let mut tx = self.pool.begin().await?;
        let address = addresses::set_default(user_id, address_id, &mut tx).await?;
        tx.commit().await?;
        address.ok_or(AccountApiError::AddressNotFound)
    }
}

impl CartManagement for SqliteDatabase {
    async fn add_to_cart(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<(CartLine, bool), CartApiError> {
        let mut tx = self.pool.begin().await?;
        catalog::product_by_id(product_id, &mut tx)
            .await
            .map_err(|e| CartApiError::DatabaseError(e.to_string()))?
            .ok_or(CartApiError::ProductNotFound(product_id))?;
        let line = carts::upsert_cart_line(user_id, product_id, quantity, size, color, &mut tx).await?;
        tx.commit().await?;
        Ok(line)
    }

    async fn update_cart_line(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: Option<i64>,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<CartLine, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        carts::update_cart_line(user_id, product_id, quantity, size, color, &mut conn)
            .await?
            .ok_or(CartApiError::LineNotFound)
    }

    async fn remove_from_cart(&self, user_id: i64, product_id: i64) -> Result<(), CartApiError> {
        let mut conn = self.pool.acquire().await?;
        if carts::delete_cart_line(user_id, product_id, &mut conn).await? {
            Ok(())
        } else {
            Err(CartApiError::LineNotFound)
        }
    }

    async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartItem>, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        let items = carts::fetch_cart_items(user_id, &mut conn).await?;
        Ok(items)
    }

    async fn fetch_wishlist(&self, user_id: i64) -> Result<Vec<(WishlistEntry, Product)>, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        wishlist::fetch_wishlist(user_id, &mut conn).await
    }

    async fn add_to_wishlist(&self, user_id: i64, product_id: i64) -> Result<WishlistEntry, CartApiError> {
        let mut tx = self.pool.begin().await?;
        catalog::product_by_id(product_id, &mut tx)
            .await
            .map_err(|e| CartApiError::DatabaseError(e.to_string()))?
            .ok_or(CartApiError::ProductNotFound(product_id))?;
        let entry = wishlist::insert_wishlist_entry(user_id, product_id, &mut tx).await?;
        tx.commit().await?;
        Ok(entry)
    }

    async fn remove_from_wishlist(&self, user_id: i64, product_id: i64) -> Result<(), CartApiError> {
        let mut conn = self.pool.acquire().await?;
        if wishlist::delete_wishlist_entry(user_id, product_id, &mut conn).await? {
            Ok(())
        } else {
            Err(CartApiError::NotInWishlist)
        }
    }

    async fn clear_wishlist(&self, user_id: i64) -> Result<u64, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        wishlist::clear_wishlist(user_id, &mut conn).await
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn create_category(&self, name: &str) -> Result<Category, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_category(name, &mut conn).await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_categories(&mut conn).await
    }

    async fn fetch_category_by_name(&self, name: &str) -> Result<Option<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::category_by_name(name, &mut conn).await
    }

    async fn update_category(&self, category_id: i64, name: &str) -> Result<Category, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::category_by_id(category_id, &mut conn).await?.ok_or(CatalogApiError::CategoryNotFound)?;
        catalog::update_category(category_id, name, &mut conn).await
    }

    async fn delete_category(&self, category_id: i64) -> Result<Category, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::delete_category(category_id, &mut conn).await
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        catalog::category_by_id(product.category_id, &mut tx).await?.ok_or(CatalogApiError::CategoryNotFound)?;
        if catalog::product_by_name(&product.name, &mut tx).await?.is_some() {
            return Err(CatalogApiError::ProductAlreadyExists(product.name));
        }
        let created = catalog::insert_product(product, &mut tx).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn fetch_products(&self) -> Result<Vec<crate::shop_api::shop_objects::ProductWithCategory>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_products(&mut conn).await
    }

    async fn fetch_product_by_id(&self, product_id: i64) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::product_by_id(product_id, &mut conn).await
    }

    async fn update_product(&self, product_id: i64, patch: serde_json::Value) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::product_by_id(product_id, &mut conn).await?.ok_or(CatalogApiError::ProductNotFound(product_id))?;
        catalog::update_product(product_id, patch, &mut conn).await
    }

    async fn delete_product(&self, product_id: i64) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::delete_product(product_id, &mut conn).await
    }

    async fn create_review(&self, review: NewReview) -> Result<Review, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        // Only buyers with a delivered order may review, and only for products they can attribute to that order.
        let eligible: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM orders WHERE id = $1 AND user_id = $2 AND status = 'Delivered'",
        )
        .bind(review.order_id)
        .bind(review.user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if eligible.is_none() {
            return Err(CatalogApiError::OrderNotEligibleForReview);
        }
        let created = reviews::insert_review(review, &mut tx).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn fetch_reviews_for_product(&self, product_id: i64) -> Result<Vec<ProductReview>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        reviews::fetch_reviews_for_product(product_id, &mut conn).await
    }

    async fn fetch_reviews_for_user(&self, user_id: i64) -> Result<Vec<Review>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        reviews::fetch_reviews_for_user(user_id, &mut conn).await
    }
}

impl OrderManagement for SqliteDatabase {
    async fn search_orders(&self, filter: OrderQueryFilter) -> Result<(Vec<OrderWithItems>, i64), OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let (found, total) = orders::search_orders(filter, &mut conn).await?;
        let mut result = Vec::with_capacity(found.len());
        for order in found {
            let items = orders::fetch_order_items(order.id, &mut conn).await?;
            result.push(OrderWithItems { order, items });
        }
        Ok((result, total))
    }

    async fn fetch_order(
        &self,
        reference: &OrderId,
        user_id: Option<i64>,
    ) -> Result<Option<OrderWithItems>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = match orders::fetch_order_by_reference(reference, &mut conn).await? {
            Some(order) => order,
            None => return Ok(None),
        };
        if user_id.is_some_and(|uid| uid != order.user_id) {
            return Ok(None);
        }
        let items = orders::fetch_order_items(order.id, &mut conn).await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    async fn cancel_order(&self, reference: &OrderId, user_id: i64) -> Result<Order, OrderApiError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::cancel_order(reference, user_id, &mut tx).await?.ok_or(OrderApiError::CannotCancel)?;
        tracking::append_tracking_event(
            &order.order_id,
            OrderStatusType::Cancelled,
            None,
            Some("Order cancelled by customer"),
            &mut tx,
        )
        .await?;
        tx.commit().await?;
        info!("🗃️ Order {} cancelled by user {user_id}", order.order_id);
        Ok(order)
    }

    async fn update_order_status(
        &self,
        reference: &OrderId,
        status: OrderStatusType,
    ) -> Result<Order, OrderApiError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::update_order_status(reference, status, &mut tx)
            .await?
            .ok_or_else(|| OrderApiError::OrderNotFound(reference.clone()))?;
        tracking::append_tracking_event(&order.order_id, status, None, Some("Status updated"), &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order {} status set to {status}", order.order_id);
        Ok(order)
    }

    async fn fetch_tracking(
        &self,
        reference: &OrderId,
        user_id: Option<i64>,
    ) -> Result<Vec<TrackingEvent>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_reference(reference, &mut conn)
            .await?
            .ok_or_else(|| OrderApiError::OrderNotFound(reference.clone()))?;
        if user_id.is_some_and(|uid| uid != order.user_id) {
            return Err(OrderApiError::OrderNotFound(reference.clone()));
        }
        let events = tracking::fetch_tracking_events(reference, &mut conn).await?;
        Ok(events)
    }

    async fn order_stats_for_user(&self, user_id: i64) -> Result<OrderStats, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::order_stats_for_user(user_id, &mut conn).await
    }

    async fn admin_order_stats(&self) -> Result<AdminOrderStats, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::admin_order_stats(&mut conn).await
    }
}

impl SqliteDatabase {
    /// Maintenance operation for the operator tooling: pushes all in-progress orders back to `Pending` and their
    /// receipts back to the initial status, in one transaction. Returns (orders reset, receipts reset).
    pub async fn reset_order_statuses(&self) -> Result<(u64, u64), OrderApiError> {
        let mut tx = self.pool.begin().await?;
        let orders_reset = orders::reset_fulfilment_statuses(&mut tx).await?;
        let receipts_reset = receipts::reset_receipt_statuses("Completed", &mut tx).await?;
        tx.commit().await?;
        info!("🗃️ Reset {orders_reset} order(s) and {receipts_reset} receipt(s)");
        Ok((orders_reset, receipts_reset))
    }

    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
