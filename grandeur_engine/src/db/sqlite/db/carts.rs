use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{CartItem, CartLine},
    shop_api::errors::CartApiError,
};

/// Adds a product to the user's cart, or tops up the quantity if the line already exists. Size and colour selections
/// follow the most recent add. Returns the line and whether it was newly created.
pub async fn upsert_cart_line(
    user_id: i64,
    product_id: i64,
    quantity: i64,
    size: Option<String>,
    color: Option<String>,
    conn: &mut SqliteConnection,
) -> Result<(CartLine, bool), CartApiError> {
    let existing: Option<CartLine> =
        sqlx::query_as("SELECT * FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;
    let is_new = existing.is_none();
    let line = sqlx::query_as::<_, CartLine>(
        r#"
            INSERT INTO cart_items (user_id, product_id, quantity, selected_size, selected_color)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, product_id) DO UPDATE SET
                quantity = quantity + excluded.quantity,
                selected_size = COALESCE(excluded.selected_size, selected_size),
                selected_color = COALESCE(excluded.selected_color, selected_color),
                updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(size)
    .bind(color)
    .fetch_one(conn)
    .await?;
    trace!("🛒️ Cart line for user {user_id}, product {product_id} now has quantity {}", line.quantity);
    Ok((line, is_new))
}

pub async fn update_cart_line(
    user_id: i64,
    product_id: i64,
    quantity: Option<i64>,
    size: Option<String>,
    color: Option<String>,
    conn: &mut SqliteConnection,
) -> Result<Option<CartLine>, CartApiError> {
    if quantity.is_none() && size.is_none() && color.is_none() {
        let line = sqlx::query_as("SELECT * FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .fetch_optional(conn)
            .await?;
        return Ok(line);
    }
    let mut builder = QueryBuilder::new("UPDATE cart_items SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(quantity) = quantity {
        set_clause.push("quantity = ");
        set_clause.push_bind_unseparated(quantity);
    }
    if let Some(size) = size {
        set_clause.push("selected_size = ");
        set_clause.push_bind_unseparated(size);
    }
    if let Some(color) = color {
        set_clause.push("selected_color = ");
        set_clause.push_bind_unseparated(color);
    }
    builder.push(" WHERE user_id = ");
    builder.push_bind(user_id);
    builder.push(" AND product_id = ");
    builder.push_bind(product_id);
    builder.push(" RETURNING *");
    trace!("🛒️ Executing query: {}", builder.sql());
    let line = builder.build_query_as::<CartLine>().fetch_optional(conn).await?;
    Ok(line)
}

pub async fn delete_cart_line(
    user_id: i64,
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, CartApiError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// The user's cart joined with product details. This is both the storefront cart view and the snapshot source for
/// checkout, so the price read here is the price at initiation/settlement time.
pub async fn fetch_cart_items(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<CartItem>, sqlx::Error> {
    let items = sqlx::query_as(
        r#"
        SELECT
            products.id AS product_id,
            products.name AS name,
            products.image AS image,
            products.price AS unit_price,
            cart_items.quantity AS quantity,
            cart_items.selected_size AS selected_size,
            cart_items.selected_color AS selected_color
        FROM cart_items JOIN products ON products.id = cart_items.product_id
        WHERE cart_items.user_id = $1
        ORDER BY cart_items.created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

/// Clears the user's cart. Called inside the settlement transaction; carts clear on success, never on failure.
pub async fn clear_cart(user_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1").bind(user_id).execute(conn).await?;
    debug!("🛒️ Cleared {} cart line(s) for user {user_id}", result.rows_affected());
    Ok(result.rows_affected())
}
