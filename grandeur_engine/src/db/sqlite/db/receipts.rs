use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{CartItem, ChargeConfirmation, Receipt, ReceiptItem, User};

const RECEIPT_INITIAL_STATUS: &str = "Order Placed";

/// Creates the human-facing receipt for a settled order, with a denormalized snapshot of the purchased items so that
/// later catalog changes never alter historical receipts. Runs inside the settlement transaction.
pub async fn insert_receipt(
    confirmation: &ChargeConfirmation,
    user: &User,
    items: &[CartItem],
    conn: &mut SqliteConnection,
) -> Result<(Receipt, Vec<ReceiptItem>), sqlx::Error> {
    let receipt = sqlx::query_as::<_, Receipt>(
        r#"
            INSERT INTO receipts (order_id, user_id, name, email, phone, total, transaction_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(confirmation.reference.as_str())
    .bind(user.id)
    .bind(user.full_name())
    .bind(&user.email)
    .bind(&user.phone)
    .bind(confirmation.amount)
    .bind(&confirmation.transaction_id)
    .bind(RECEIPT_INITIAL_STATUS)
    .fetch_one(&mut *conn)
    .await?;
    let mut receipt_items = Vec::with_capacity(items.len());
    for item in items {
        let row = sqlx::query_as::<_, ReceiptItem>(
            r#"
                INSERT INTO receipt_items (receipt_id, product_id, name, image, unit_price, quantity, line_total)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *;
            "#,
        )
        .bind(receipt.id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(&item.image)
        .bind(item.unit_price)
        .bind(item.quantity)
        .bind(item.line_total())
        .fetch_one(&mut *conn)
        .await?;
        receipt_items.push(row);
    }
    debug!("🧾️ Receipt {} created for order {} with {} item(s)", receipt.id, receipt.order_id, receipt_items.len());
    Ok((receipt, receipt_items))
}

pub async fn fetch_receipt_for_order(
    order_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<(Receipt, Vec<ReceiptItem>)>, sqlx::Error> {
    let receipt: Option<Receipt> =
        sqlx::query_as("SELECT * FROM receipts WHERE order_id = $1").bind(order_id).fetch_optional(&mut *conn).await?;
    let receipt = match receipt {
        Some(r) => r,
        None => return Ok(None),
    };
    let items = sqlx::query_as("SELECT * FROM receipt_items WHERE receipt_id = $1 ORDER BY id ASC")
        .bind(receipt.id)
        .fetch_all(conn)
        .await?;
    Ok(Some((receipt, items)))
}

/// Bulk status reset used by the operator tooling.
pub async fn reset_receipt_statuses(
    from_status: &str,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE receipts SET status = $1 WHERE status = $2")
        .bind(RECEIPT_INITIAL_STATUS)
        .bind(from_status)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
