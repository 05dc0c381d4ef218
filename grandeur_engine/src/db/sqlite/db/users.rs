use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewUser, User, UserCredentials, UserProfileUpdate},
    shop_api::{
        errors::AccountApiError,
        shop_objects::{UserQueryFilter, UserStats},
    },
};

/// Inserts a new user. A fresh public id is minted here; the role is always `Customer` (admin accounts are promoted
/// directly in the database, never through registration).
pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, AccountApiError> {
    let public_id = uuid::Uuid::new_v4().to_string();
    let email = user.email.clone();
    let created = sqlx::query_as::<_, User>(
        r#"
            INSERT INTO users (
                public_id,
                firstname,
                lastname,
                email,
                phone,
                address,
                password_hash,
                image,
                role
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'Customer')
            RETURNING id, public_id, firstname, lastname, email, phone, address, image, role, email_verified,
                      created_at, updated_at;
        "#,
    )
    .bind(public_id)
    .bind(user.firstname)
    .bind(user.lastname)
    .bind(user.email)
    .bind(user.phone)
    .bind(user.address)
    .bind(user.password_hash)
    .bind(user.image)
    .fetch_one(conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AccountApiError::UserAlreadyExists(email),
        _ => e.into(),
    })?;
    debug!("🗂️ User {} registered with id {}", created.email, created.id);
    Ok(created)
}

const USER_COLUMNS: &str = "id, public_id, firstname, lastname, email, phone, address, image, role, email_verified, \
                            created_at, updated_at";

pub async fn user_by_id(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, AccountApiError> {
    let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

pub async fn user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, AccountApiError> {
    let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

pub async fn credentials_by_email(
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<UserCredentials>, AccountApiError> {
    let creds = sqlx::query_as("SELECT id, email, password_hash FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(conn)
        .await?;
    Ok(creds)
}

pub async fn update_profile(
    user_id: i64,
    update: UserProfileUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, AccountApiError> {
    if update.is_empty() {
        trace!("🗂️ Empty profile update for user {user_id}. Returning current record.");
        return user_by_id(user_id, conn).await;
    }
    let mut builder = QueryBuilder::new("UPDATE users SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(firstname) = update.firstname {
        set_clause.push("firstname = ");
        set_clause.push_bind_unseparated(firstname);
    }
    if let Some(lastname) = update.lastname {
        set_clause.push("lastname = ");
        set_clause.push_bind_unseparated(lastname);
    }
    if let Some(phone) = update.phone {
        set_clause.push("phone = ");
        set_clause.push_bind_unseparated(phone);
    }
    if let Some(address) = update.address {
        set_clause.push("address = ");
        set_clause.push_bind_unseparated(address);
    }
    if let Some(image) = update.image {
        set_clause.push("image = ");
        set_clause.push_bind_unseparated(image);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(user_id);
    builder.push(format!(" RETURNING {USER_COLUMNS}"));
    trace!("🗂️ Executing query: {}", builder.sql());
    let user = builder.build_query_as::<User>().fetch_optional(conn).await?;
    Ok(user)
}

pub async fn update_password(
    user_id: i64,
    password_hash: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, AccountApiError> {
    let result = sqlx::query("UPDATE users SET password_hash = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(password_hash)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn push_user_filters<'a>(builder: &mut QueryBuilder<'a, sqlx::Sqlite>, filter: &'a UserQueryFilter) {
    if filter.role.is_none() && filter.search.is_none() {
        return;
    }
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    if let Some(role) = filter.role {
        where_clause.push("role = ");
        where_clause.push_bind_unseparated(role.to_string());
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        where_clause.push("(firstname LIKE ");
        where_clause.push_bind_unseparated(pattern.clone());
        where_clause.push_unseparated(" OR lastname LIKE ");
        where_clause.push_bind_unseparated(pattern.clone());
        where_clause.push_unseparated(" OR email LIKE ");
        where_clause.push_bind_unseparated(pattern);
        where_clause.push_unseparated(")");
    }
}

/// Fetches users matching the filter (newest first) and the total match count.
pub async fn search_users(
    filter: UserQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<(Vec<User>, i64), AccountApiError> {
    let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM users");
    push_user_filters(&mut count_builder, &filter);
    let total: i64 = count_builder.build_query_scalar().fetch_one(&mut *conn).await?;

    let mut builder = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
    push_user_filters(&mut builder, &filter);
    builder.push(" ORDER BY created_at DESC");
    let pagination = filter.pagination.unwrap_or_default();
    builder.push(" LIMIT ");
    builder.push_bind(pagination.limit);
    builder.push(" OFFSET ");
    builder.push_bind(pagination.offset());
    trace!("🗂️ Executing query: {}", builder.sql());
    let users = builder.build_query_as::<User>().fetch_all(conn).await?;
    Ok((users, total))
}

pub async fn user_stats(conn: &mut SqliteConnection) -> Result<UserStats, AccountApiError> {
    let (total_users, admin_users, customer_users): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COUNT(CASE WHEN role = 'Admin' THEN 1 END),
            COUNT(CASE WHEN role = 'Customer' THEN 1 END)
        FROM users
        "#,
    )
    .fetch_one(conn)
    .await?;
    Ok(UserStats { total_users, admin_users, customer_users })
}

/// Detects the race where two registrations with the same email hit the unique constraint.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
