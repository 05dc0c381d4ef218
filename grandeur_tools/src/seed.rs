use std::{collections::HashMap, path::Path};

use anyhow::Context;
use grandeur_common::Naira;
use grandeur_engine::{db_types::NewProduct, CatalogApiError, CatalogManagement, SqliteDatabase};
use log::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
struct SeedProduct {
    name: String,
    description: String,
    /// Price in whole naira.
    price: f64,
    #[serde(default = "default_currency")]
    currency: String,
    sizes: Vec<String>,
    #[serde(rename = "defaultSize")]
    default_size: String,
    colors: Vec<String>,
    #[serde(rename = "defaultColor")]
    default_color: String,
    #[serde(rename = "bestSeller", default)]
    best_seller: bool,
    #[serde(rename = "newArrival", default)]
    new_arrival: bool,
    #[serde(default)]
    image: String,
    subcategory: String,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    discount: i64,
    #[serde(default)]
    stock: i64,
    #[serde(default)]
    tags: Vec<String>,
    category: String,
}

fn default_currency() -> String {
    "NGN".to_string()
}

const SEED_CATEGORIES: [&str; 3] = ["men", "women", "children"];

pub async fn run(db: &SqliteDatabase, file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file).with_context(|| format!("Could not read {}", file.display()))?;
    let catalog: CatalogFile =
        serde_json::from_str(&raw).with_context(|| format!("{} is not a valid catalog file", file.display()))?;
    info!("🌱️ Seeding {} product(s) from {}", catalog.products.len(), file.display());

    let mut category_ids = HashMap::new();
    for name in SEED_CATEGORIES {
        match db.create_category(name).await {
            Ok(category) => {
                info!("🌱️ Category created: {name}");
                category_ids.insert(name.to_string(), category.id);
            },
            Err(CatalogApiError::CategoryAlreadyExists(_)) => {
                let category = db
                    .fetch_category_by_name(name)
                    .await
                    .map_err(|e| anyhow::anyhow!("{e}"))?
                    .context("Category vanished between create and fetch")?;
                category_ids.insert(name.to_string(), category.id);
            },
            Err(e) => return Err(anyhow::anyhow!("Could not create category {name}: {e}")),
        }
    }

    let mut added = 0usize;
    let mut skipped = 0usize;
    for product in catalog.products {
        let Some(&category_id) = category_ids.get(&product.category) else {
            warn!("🌱️ Skipping product '{}': unknown category '{}'", product.name, product.category);
            skipped += 1;
            continue;
        };
        let name = product.name.clone();
        let new_product = NewProduct {
            name: product.name,
            description: product.description,
            price: Naira::try_from(product.price).map_err(|e| anyhow::anyhow!("{e}"))?,
            currency: product.currency,
            image: product.image,
            sizes: product.sizes,
            default_size: product.default_size,
            colors: product.colors,
            default_color: product.default_color,
            subcategory: product.subcategory,
            tags: product.tags,
            rating: product.rating,
            discount: product.discount,
            stock: product.stock,
            best_seller: product.best_seller,
            new_arrival: product.new_arrival,
            category_id,
        };
        match db.create_product(new_product).await {
            Ok(_) => {
                info!("🌱️ Added product: {name}");
                added += 1;
            },
            Err(CatalogApiError::ProductAlreadyExists(_)) => {
                debug!("🌱️ Product already exists: {name}");
                skipped += 1;
            },
            Err(e) => {
                warn!("🌱️ Error adding product {name}: {}", crate::describe_catalog_error(&e));
                skipped += 1;
            },
        }
    }
    println!("Seeding complete. Added {added} product(s), skipped {skipped}.");
    Ok(())
}
