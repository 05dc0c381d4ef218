use crate::{
    db_types::{Order, OrderId, OrderStatusType, TrackingEvent},
    shop_api::{
        errors::OrderApiError,
        shop_objects::{AdminOrderStats, OrderQueryFilter, OrderStats, OrderWithItems},
    },
};

#[allow(async_fn_in_trait)]
pub trait OrderManagement: Clone {
    /// Fetches orders matching the filter, newest first, along with the total match count for pagination.
    async fn search_orders(&self, filter: OrderQueryFilter) -> Result<(Vec<OrderWithItems>, i64), OrderApiError>;

    /// Fetches a single order with its items. When `user_id` is given, the order must belong to that user.
    async fn fetch_order(
        &self,
        reference: &OrderId,
        user_id: Option<i64>,
    ) -> Result<Option<OrderWithItems>, OrderApiError>;

    /// Cancels an order. Only the owner's `Pending` orders can be cancelled; the order row is never deleted.
    async fn cancel_order(&self, reference: &OrderId, user_id: i64) -> Result<Order, OrderApiError>;

    /// Admin status transition. Appends a tracking event in the same transaction.
    async fn update_order_status(
        &self,
        reference: &OrderId,
        status: OrderStatusType,
    ) -> Result<Order, OrderApiError>;

    /// The append-only tracking history for an order, oldest first.
    async fn fetch_tracking(&self, reference: &OrderId, user_id: Option<i64>)
        -> Result<Vec<TrackingEvent>, OrderApiError>;

    async fn order_stats_for_user(&self, user_id: i64) -> Result<OrderStats, OrderApiError>;

    async fn admin_order_stats(&self) -> Result<AdminOrderStats, OrderApiError>;
}
