use std::path::Path;

use grandeur_common::Naira;
use grandeur_engine::{
    db_types::{CartLine, ChargeConfirmation, NewProduct, NewUser, OrderId, PaymentData, Product, User},
    events::EventProducers,
    AccountManagement,
    CartManagement,
    CatalogManagement,
    CheckoutApi,
    CheckoutDatabase,
    SqliteDatabase,
};
use log::*;
use sqlx::{migrate, migrate::MigrateDatabase, Sqlite};

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    run_migrations(url).await;
}

pub fn random_db_path() -> String {
    format!("sqlite://../data/test_store_{}", rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    migrate!("./src/db/sqlite/migrations").run(db.pool()).await.expect("Error running DB migrations");
    info!("🚀️ Migrations complete");
}

pub async fn create_database<P: AsRef<Path>>(path: P) {
    let p = path.as_ref().as_os_str().to_str().unwrap();
    if let Err(e) = Sqlite::drop_database(p).await {
        warn!("Error dropping database {p}: {e:?}");
    }
    Sqlite::create_database(p).await.expect("Error creating database");
    info!("Created Sqlite database {p}");
}

pub async fn new_test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

pub async fn tear_down(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    Sqlite::drop_database(&url).await.expect("Error dropping test database");
}

pub fn checkout_api(db: &SqliteDatabase) -> CheckoutApi<SqliteDatabase> {
    CheckoutApi::new(db.clone(), EventProducers::default())
}

pub async fn seed_user(db: &SqliteDatabase, email: &str) -> User {
    let user = NewUser {
        firstname: "Ada".to_string(),
        lastname: "Obi".to_string(),
        email: email.to_string(),
        phone: Some("+2348000000000".to_string()),
        address: Some("12 Marina Rd, Lagos".to_string()),
        password_hash: "$2b$10$testhashtesthashtesthash".to_string(),
        image: None,
    };
    db.create_user(user).await.expect("Error creating user")
}

/// Seeds one category and two products priced at ₦5 000 and ₦3 000, matching the canonical checkout scenario.
pub async fn seed_catalog(db: &SqliteDatabase) -> (Product, Product) {
    let category = db.create_category("men").await.expect("Error creating category");
    let product_a = db
        .create_product(test_product("Linen Shirt", Naira::from_naira(5_000), category.id))
        .await
        .expect("Error creating product");
    let product_b = db
        .create_product(test_product("Canvas Belt", Naira::from_naira(3_000), category.id))
        .await
        .expect("Error creating product");
    (product_a, product_b)
}

pub fn test_product(name: &str, price: Naira, category_id: i64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: format!("{name} description"),
        price,
        currency: "NGN".to_string(),
        image: format!("https://img.example.com/{name}.jpg"),
        sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
        default_size: "M".to_string(),
        colors: vec!["black".to_string(), "white".to_string()],
        default_color: "black".to_string(),
        subcategory: "tops".to_string(),
        tags: vec!["new".to_string()],
        rating: 4.5,
        discount: 0,
        stock: 25,
        best_seller: false,
        new_arrival: true,
        category_id,
    }
}

pub async fn add_line(db: &SqliteDatabase, user: &User, product: &Product, quantity: i64) -> CartLine {
    let (line, _) = db
        .add_to_cart(user.id, product.id, quantity, None, None)
        .await
        .expect("Error adding product to cart");
    line
}

pub fn confirmation_for(reference: &OrderId, transaction_id: &str, user_id: i64, amount: Naira) -> ChargeConfirmation {
    ChargeConfirmation {
        reference: reference.clone(),
        transaction_id: transaction_id.to_string(),
        user_id,
        amount,
        currency: "NGN".to_string(),
        payment_data: PaymentData {
            id: 9_000_001,
            status: "successful".to_string(),
            amount: amount.to_naira_f64(),
            currency: "NGN".to_string(),
        },
    }
}
