use grandeur_common::Naira;
use log::{debug, trace};
use serde_json::Value;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Category, NewProduct, Product},
    shop_api::{errors::CatalogApiError, shop_objects::ProductWithCategory},
};

//----------------------------------------  Categories  ---------------------------------------------------------------

pub async fn insert_category(name: &str, conn: &mut SqliteConnection) -> Result<Category, CatalogApiError> {
    let category = sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING *")
        .bind(name)
        .fetch_one(conn)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CatalogApiError::CategoryAlreadyExists(name.to_string())
            },
            _ => e.into(),
        })?;
    debug!("📇️ Category '{name}' created");
    Ok(category)
}

pub async fn fetch_categories(conn: &mut SqliteConnection) -> Result<Vec<Category>, CatalogApiError> {
    let categories = sqlx::query_as("SELECT * FROM categories ORDER BY name ASC").fetch_all(conn).await?;
    Ok(categories)
}

pub async fn category_by_name(name: &str, conn: &mut SqliteConnection) -> Result<Option<Category>, CatalogApiError> {
    let category = sqlx::query_as("SELECT * FROM categories WHERE name = $1").bind(name).fetch_optional(conn).await?;
    Ok(category)
}

pub async fn category_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Category>, CatalogApiError> {
    let category = sqlx::query_as("SELECT * FROM categories WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(category)
}

pub async fn update_category(id: i64, name: &str, conn: &mut SqliteConnection) -> Result<Category, CatalogApiError> {
    let category = sqlx::query_as("UPDATE categories SET name = $1 WHERE id = $2 RETURNING *")
        .bind(name)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    category.ok_or(CatalogApiError::CategoryNotFound)
}

pub async fn delete_category(id: i64, conn: &mut SqliteConnection) -> Result<Category, CatalogApiError> {
    let category =
        sqlx::query_as("DELETE FROM categories WHERE id = $1 RETURNING *").bind(id).fetch_optional(conn).await?;
    category.ok_or(CatalogApiError::CategoryNotFound)
}

//----------------------------------------  Products  -----------------------------------------------------------------

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, CatalogApiError> {
    let name = product.name.clone();
    let created = sqlx::query_as::<_, Product>(
        r#"
            INSERT INTO products (
                name, description, price, currency, image,
                sizes, default_size, colors, default_color,
                subcategory, tags, rating, discount, stock,
                best_seller, new_arrival, category_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *;
        "#,
    )
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(product.currency)
    .bind(product.image)
    .bind(serde_json::to_string(&product.sizes).unwrap_or_else(|_| "[]".to_string()))
    .bind(product.default_size)
    .bind(serde_json::to_string(&product.colors).unwrap_or_else(|_| "[]".to_string()))
    .bind(product.default_color)
    .bind(product.subcategory)
    .bind(serde_json::to_string(&product.tags).unwrap_or_else(|_| "[]".to_string()))
    .bind(product.rating)
    .bind(product.discount)
    .bind(product.stock)
    .bind(product.best_seller)
    .bind(product.new_arrival)
    .bind(product.category_id)
    .fetch_one(conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => CatalogApiError::ProductAlreadyExists(name),
        _ => e.into(),
    })?;
    debug!("📇️ Product '{}' created with id {}", created.name, created.id);
    Ok(created)
}

pub async fn fetch_products(conn: &mut SqliteConnection) -> Result<Vec<ProductWithCategory>, CatalogApiError> {
    let products = sqlx::query_as(
        r#"
        SELECT products.*, categories.name AS category_name
        FROM products JOIN categories ON categories.id = products.category_id
        ORDER BY products.created_at DESC
        "#,
    )
    .fetch_all(conn)
    .await?;
    Ok(products)
}

pub async fn product_by_id(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, CatalogApiError> {
    let product =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn product_by_name(name: &str, conn: &mut SqliteConnection) -> Result<Option<Product>, CatalogApiError> {
    let product = sqlx::query_as("SELECT * FROM products WHERE name = $1").bind(name).fetch_optional(conn).await?;
    Ok(product)
}

/// Columns an admin patch may touch. Anything else in the patch is rejected rather than ignored.
const PATCHABLE_COLUMNS: [&str; 16] = [
    "name",
    "description",
    "price",
    "currency",
    "image",
    "sizes",
    "default_size",
    "colors",
    "default_color",
    "subcategory",
    "tags",
    "rating",
    "discount",
    "stock",
    "best_seller",
    "new_arrival",
];

pub async fn update_product(
    product_id: i64,
    patch: Value,
    conn: &mut SqliteConnection,
) -> Result<Product, CatalogApiError> {
    let fields = match patch {
        Value::Object(map) => map,
        _ => return Err(CatalogApiError::DatabaseError("Product patch must be a JSON object".to_string())),
    };
    if fields.is_empty() {
        return product_by_id(product_id, conn).await?.ok_or(CatalogApiError::ProductNotFound(product_id));
    }
    let mut builder = QueryBuilder::new("UPDATE products SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    for (key, value) in fields {
        if !PATCHABLE_COLUMNS.contains(&key.as_str()) {
            return Err(CatalogApiError::DatabaseError(format!("'{key}' is not an updatable product field")));
        }
        set_clause.push(format!("{key} = "));
        match (key.as_str(), value) {
            ("price", Value::Number(n)) => {
                let naira = n.as_f64().and_then(|v| Naira::try_from(v).ok()).unwrap_or_default();
                set_clause.push_bind_unseparated(naira);
            },
            ("sizes" | "colors" | "tags", v) => {
                set_clause.push_bind_unseparated(v.to_string());
            },
            ("best_seller" | "new_arrival", Value::Bool(b)) => {
                set_clause.push_bind_unseparated(b);
            },
            ("rating", Value::Number(n)) => {
                set_clause.push_bind_unseparated(n.as_f64().unwrap_or(0.0));
            },
            ("stock" | "discount", Value::Number(n)) => {
                set_clause.push_bind_unseparated(n.as_i64().unwrap_or(0));
            },
            (_, Value::String(s)) => {
                set_clause.push_bind_unseparated(s);
            },
            (key, v) => {
                return Err(CatalogApiError::DatabaseError(format!("Unsupported value {v} for product field '{key}'")));
            },
        }
    }
    builder.push(" WHERE id = ");
    builder.push_bind(product_id);
    builder.push(" RETURNING *");
    trace!("📇️ Executing query: {}", builder.sql());
    let product = builder.build_query_as::<Product>().fetch_optional(conn).await?;
    product.ok_or(CatalogApiError::ProductNotFound(product_id))
}

pub async fn delete_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Product, CatalogApiError> {
    let product = sqlx::query_as("DELETE FROM products WHERE id = $1 RETURNING *")
        .bind(product_id)
        .fetch_optional(conn)
        .await?;
    product.ok_or(CatalogApiError::ProductNotFound(product_id))
}
