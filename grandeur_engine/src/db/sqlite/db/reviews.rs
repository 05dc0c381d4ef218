use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewReview, ProductReview, Review},
    shop_api::errors::CatalogApiError,
};

/// Inserts a review. Eligibility (delivered order owned by the reviewer) is checked by the caller inside the same
/// connection; the unique constraint backstops double submissions.
pub async fn insert_review(review: NewReview, conn: &mut SqliteConnection) -> Result<Review, CatalogApiError> {
    let created = sqlx::query_as::<_, Review>(
        r#"
            INSERT INTO reviews (user_id, product_id, order_id, rating, comment, images)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(review.user_id)
    .bind(review.product_id)
    .bind(review.order_id)
    .bind(review.rating)
    .bind(review.comment)
    .bind(serde_json::to_string(&review.images).unwrap_or_else(|_| "[]".to_string()))
    .fetch_one(conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => CatalogApiError::ReviewAlreadyExists,
        _ => e.into(),
    })?;
    debug!("⭐️ Review {} created for product {}", created.id, created.product_id);
    Ok(created)
}

pub async fn fetch_reviews_for_product(
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<ProductReview>, CatalogApiError> {
    let reviews = sqlx::query_as(
        r#"
        SELECT
            reviews.id AS id,
            reviews.product_id AS product_id,
            reviews.rating AS rating,
            reviews.comment AS comment,
            reviews.images AS images,
            reviews.created_at AS created_at,
            users.firstname AS firstname,
            users.lastname AS lastname,
            users.image AS reviewer_image
        FROM reviews JOIN users ON users.id = reviews.user_id
        WHERE reviews.product_id = $1
        ORDER BY reviews.created_at DESC
        "#,
    )
    .bind(product_id)
    .fetch_all(conn)
    .await?;
    Ok(reviews)
}

pub async fn fetch_reviews_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Review>, CatalogApiError> {
    let reviews = sqlx::query_as("SELECT * FROM reviews WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(reviews)
}
