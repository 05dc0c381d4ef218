use std::str::FromStr;

use crate::{
    db_types::{Order, OrderId, OrderStatusType, TrackingEvent},
    shop_api::{
        errors::OrderApiError,
        shop_objects::{AdminOrderStats, OrderQueryFilter, OrderStats, OrderWithItems},
    },
    traits::OrderManagement,
};

/// Read and lifecycle operations on existing orders. Orders are only ever *created* by the checkout flow; from here
/// they can be listed, inspected, tracked, cancelled and (by admins) moved through fulfilment statuses.
#[derive(Debug, Clone)]
pub struct OrderApi<B> {
    db: B,
}

impl<B> OrderApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderApi<B>
where B: OrderManagement
{
    pub async fn search_orders(&self, filter: OrderQueryFilter) -> Result<(Vec<OrderWithItems>, i64), OrderApiError> {
        self.db.search_orders(filter).await
    }

    pub async fn order_for_user(
        &self,
        reference: &OrderId,
        user_id: i64,
    ) -> Result<Option<OrderWithItems>, OrderApiError> {
        self.db.fetch_order(reference, Some(user_id)).await
    }

    pub async fn order(&self, reference: &OrderId) -> Result<Option<OrderWithItems>, OrderApiError> {
        self.db.fetch_order(reference, None).await
    }

    pub async fn cancel_order(&self, reference: &OrderId, user_id: i64) -> Result<Order, OrderApiError> {
        self.db.cancel_order(reference, user_id).await
    }

    /// Admin-side status transition. The status arrives as a string from the request body; anything that does not
    /// parse to a known status is rejected before touching the database.
    pub async fn update_order_status(&self, reference: &OrderId, status: &str) -> Result<Order, OrderApiError> {
        let status =
            OrderStatusType::from_str(status).map_err(|_| OrderApiError::InvalidStatus(status.to_string()))?;
        self.db.update_order_status(reference, status).await
    }

    pub async fn tracking_for_user(
        &self,
        reference: &OrderId,
        user_id: i64,
    ) -> Result<Vec<TrackingEvent>, OrderApiError> {
        self.db.fetch_tracking(reference, Some(user_id)).await
    }

    pub async fn order_stats_for_user(&self, user_id: i64) -> Result<OrderStats, OrderApiError> {
        self.db.order_stats_for_user(user_id).await
    }

    pub async fn admin_order_stats(&self) -> Result<AdminOrderStats, OrderApiError> {
        self.db.admin_order_stats().await
    }
}
