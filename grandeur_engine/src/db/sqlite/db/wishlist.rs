use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Product, WishlistEntry},
    shop_api::errors::CartApiError,
};

pub async fn fetch_wishlist(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<(WishlistEntry, Product)>, CartApiError> {
    let entries: Vec<WishlistEntry> =
        sqlx::query_as("SELECT * FROM wishlist_items WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;
    let mut result = Vec::with_capacity(entries.len());
    for entry in entries {
        let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
            .bind(entry.product_id)
            .fetch_optional(&mut *conn)
            .await?;
        if let Some(product) = product {
            result.push((entry, product));
        }
    }
    Ok(result)
}

pub async fn insert_wishlist_entry(
    user_id: i64,
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<WishlistEntry, CartApiError> {
    let entry = sqlx::query_as("INSERT INTO wishlist_items (user_id, product_id) VALUES ($1, $2) RETURNING *")
        .bind(user_id)
        .bind(product_id)
        .fetch_one(conn)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => CartApiError::AlreadyInWishlist,
            _ => e.into(),
        })?;
    trace!("🤍️ Product {product_id} wishlisted by user {user_id}");
    Ok(entry)
}

pub async fn delete_wishlist_entry(
    user_id: i64,
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, CartApiError> {
    let result = sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn clear_wishlist(user_id: i64, conn: &mut SqliteConnection) -> Result<u64, CartApiError> {
    let result = sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1").bind(user_id).execute(conn).await?;
    Ok(result.rows_affected())
}
