use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{CartItem, ChargeConfirmation, Order, OrderId, OrderLineItem, OrderStatusType},
    shop_api::{
        errors::OrderApiError,
        shop_objects::{AdminOrderStats, OrderQueryFilter, OrderStats},
    },
};

/// Returns the order for the corresponding public reference.
pub async fn fetch_order_by_reference(
    reference: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE order_id = $1")
        .bind(reference.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Inserts a settled order for a confirmed charge. This is NOT atomic on its own; it runs inside the settlement
/// transaction. A uniqueness violation on `order_id` (or `transaction_id`) here means a concurrent settlement won
/// the race; callers roll back and fall back to the existing row.
pub async fn insert_settled_order(
    confirmation: &ChargeConfirmation,
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    let order = sqlx::query_as::<_, Order>(
        r#"
            INSERT INTO orders (
                order_id,
                user_id,
                email,
                total_price,
                currency,
                status,
                transaction_id,
                payment_data,
                paid_at
            ) VALUES ($1, $2, $3, $4, $5, 'Completed', $6, $7, CURRENT_TIMESTAMP)
            RETURNING *;
        "#,
    )
    .bind(confirmation.reference.as_str())
    .bind(confirmation.user_id)
    .bind(email)
    .bind(confirmation.amount)
    .bind(&confirmation.currency)
    .bind(&confirmation.transaction_id)
    .bind(confirmation.payment_data.to_json())
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order [{}] inserted with id {}", order.order_id, order.id);
    Ok(order)
}

/// Snapshots the given cart lines as the order's line items, at the prices read in the same transaction.
pub async fn insert_order_items(
    order_rowid: i64,
    items: &[CartItem],
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    for item in items {
        sqlx::query("INSERT INTO order_items (order_id, product_id, quantity, unit_price) VALUES ($1, $2, $3, $4)")
            .bind(order_rowid)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn fetch_order_items(
    order_rowid: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderLineItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_rowid)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// Completes an order that already existed in a not-yet-settled state: attaches the gateway confirmation and stamps
/// the payment time.
pub async fn complete_order(
    reference: &OrderId,
    confirmation: &ChargeConfirmation,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders SET
                status = 'Completed',
                transaction_id = $1,
                payment_data = $2,
                paid_at = CURRENT_TIMESTAMP,
                updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $3
            RETURNING *;
        "#,
    )
    .bind(&confirmation.transaction_id)
    .bind(confirmation.payment_data.to_json())
    .bind(reference.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

fn push_order_filters<'a>(builder: &mut QueryBuilder<'a, sqlx::Sqlite>, filter: &'a OrderQueryFilter) {
    if filter.is_empty() {
        return;
    }
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    if let Some(user_id) = filter.user_id {
        where_clause.push("user_id = ");
        where_clause.push_bind_unseparated(user_id);
    }
    if let Some(status) = filter.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status.to_string());
    }
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`, newest first, plus the total match
/// count for pagination.
pub async fn search_orders(
    filter: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<(Vec<Order>, i64), sqlx::Error> {
    let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM orders");
    push_order_filters(&mut count_builder, &filter);
    let total: i64 = count_builder.build_query_scalar().fetch_one(&mut *conn).await?;

    let mut builder = QueryBuilder::new("SELECT * FROM orders");
    push_order_filters(&mut builder, &filter);
    builder.push(" ORDER BY created_at DESC");
    if let Some(pagination) = filter.pagination {
        builder.push(" LIMIT ");
        builder.push_bind(pagination.limit);
        builder.push(" OFFSET ");
        builder.push_bind(pagination.offset());
    }
    trace!("📝️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    Ok((orders, total))
}

/// Cancels the user's own order, provided it is still `Pending`. Returns `None` when there is no matching
/// cancellable order; cancellation never deletes the row.
pub async fn cancel_order(
    reference: &OrderId,
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders SET status = 'Cancelled', updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $1 AND user_id = $2 AND status = 'Pending'
            RETURNING *;
        "#,
    )
    .bind(reference.as_str())
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

pub async fn update_order_status(
    reference: &OrderId,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        "UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE order_id = $2 RETURNING *",
    )
    .bind(status.to_string())
    .bind(reference.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Bulk maintenance reset: pushes every in-progress order back to `Pending`. Used by the operator tooling only.
pub async fn reset_fulfilment_statuses(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders SET status = 'Pending', updated_at = CURRENT_TIMESTAMP WHERE status IN ('Completed', \
         'Shipped', 'Delivered')",
    )
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn order_stats_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<OrderStats, OrderApiError> {
    let (total_orders, pending_orders, completed_orders, total_spent): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COUNT(CASE WHEN status = 'Pending' THEN 1 END),
            COUNT(CASE WHEN status = 'Completed' THEN 1 END),
            COALESCE(SUM(CASE WHEN status = 'Completed' THEN total_price END), 0)
        FROM orders WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(conn)
    .await?;
    Ok(OrderStats { total_orders, pending_orders, completed_orders, total_spent: total_spent.into() })
}

pub async fn admin_order_stats(conn: &mut SqliteConnection) -> Result<AdminOrderStats, OrderApiError> {
    let (total_orders, pending_orders, completed_orders, cancelled_orders, total_revenue): (i64, i64, i64, i64, i64) =
        sqlx::query_as(
            r#"
        SELECT
            COUNT(*),
            COUNT(CASE WHEN status = 'Pending' THEN 1 END),
            COUNT(CASE WHEN status = 'Completed' THEN 1 END),
            COUNT(CASE WHEN status = 'Cancelled' THEN 1 END),
            COALESCE(SUM(CASE WHEN status = 'Completed' THEN total_price END), 0)
        FROM orders
        "#,
        )
        .fetch_one(conn)
        .await?;
    Ok(AdminOrderStats {
        total_orders,
        pending_orders,
        completed_orders,
        cancelled_orders,
        total_revenue: total_revenue.into(),
    })
}
