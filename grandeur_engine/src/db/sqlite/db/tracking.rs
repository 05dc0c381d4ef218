use sqlx::SqliteConnection;

use crate::db_types::{OrderId, OrderStatusType, TrackingEvent};

/// Appends an entry to an order's tracking history. History rows are never updated or deleted.
pub async fn append_tracking_event(
    order_id: &OrderId,
    status: OrderStatusType,
    location: Option<&str>,
    description: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<TrackingEvent, sqlx::Error> {
    let event = sqlx::query_as(
        "INSERT INTO order_tracking (order_id, status, location, description) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(order_id.as_str())
    .bind(status.to_string())
    .bind(location)
    .bind(description)
    .fetch_one(conn)
    .await?;
    Ok(event)
}

pub async fn fetch_tracking_events(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Vec<TrackingEvent>, sqlx::Error> {
    let events = sqlx::query_as("SELECT * FROM order_tracking WHERE order_id = $1 ORDER BY created_at ASC, id ASC")
        .bind(order_id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(events)
}
