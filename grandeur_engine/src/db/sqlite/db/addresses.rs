use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Address, AddressUpdate, NewAddress},
    shop_api::errors::AccountApiError,
};

pub async fn fetch_addresses(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Address>, AccountApiError> {
    let addresses =
        sqlx::query_as("SELECT * FROM addresses WHERE user_id = $1 ORDER BY is_default DESC, created_at DESC")
            .bind(user_id)
            .fetch_all(conn)
            .await?;
    Ok(addresses)
}

pub async fn address_by_id(
    user_id: i64,
    address_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Address>, AccountApiError> {
    let address = sqlx::query_as("SELECT * FROM addresses WHERE id = $1 AND user_id = $2")
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(address)
}

pub async fn insert_address(
    user_id: i64,
    address: NewAddress,
    conn: &mut SqliteConnection,
) -> Result<Address, AccountApiError> {
    if address.is_default {
        clear_default(user_id, &mut *conn).await?;
    }
    let created = sqlx::query_as::<_, Address>(
        r#"
            INSERT INTO addresses (
                user_id, label, full_name, phone, line1, line2, city, state, postal_code, country, is_default
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(address.label)
    .bind(address.full_name)
    .bind(address.phone)
    .bind(address.line1)
    .bind(address.line2)
    .bind(address.city)
    .bind(address.state)
    .bind(address.postal_code)
    .bind(address.country)
    .bind(address.is_default)
    .fetch_one(conn)
    .await?;
    Ok(created)
}

pub async fn update_address(
    user_id: i64,
    address_id: i64,
    update: AddressUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Address>, AccountApiError> {
    if update.is_empty() {
        return address_by_id(user_id, address_id, conn).await;
    }
    let mut builder = QueryBuilder::new("UPDATE addresses SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    let AddressUpdate { label, full_name, phone, line1, line2, city, state, postal_code, country } = update;
    let fields = [
        ("label", label),
        ("full_name", full_name),
        ("phone", phone),
        ("line1", line1),
        ("line2", line2),
        ("city", city),
        ("state", state),
        ("postal_code", postal_code),
        ("country", country),
    ];
    for (column, value) in fields {
        if let Some(value) = value {
            set_clause.push(format!("{column} = "));
            set_clause.push_bind_unseparated(value);
        }
    }
    builder.push(" WHERE id = ");
    builder.push_bind(address_id);
    builder.push(" AND user_id = ");
    builder.push_bind(user_id);
    builder.push(" RETURNING *");
    trace!("🏠️ Executing query: {}", builder.sql());
    let address = builder.build_query_as::<Address>().fetch_optional(conn).await?;
    Ok(address)
}

pub async fn delete_address(
    user_id: i64,
    address_id: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, AccountApiError> {
    let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
        .bind(address_id)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Makes the given address the user's single default.
pub async fn set_default(
    user_id: i64,
    address_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Address>, AccountApiError> {
    clear_default(user_id, &mut *conn).await?;
    let address = sqlx::query_as(
        "UPDATE addresses SET is_default = TRUE, updated_at = CURRENT_TIMESTAMP WHERE id = $1 AND user_id = $2 \
         RETURNING *",
    )
    .bind(address_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(address)
}

async fn clear_default(user_id: i64, conn: &mut SqliteConnection) -> Result<(), AccountApiError> {
    sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1 AND is_default = TRUE")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}
