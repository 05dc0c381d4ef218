use crate::{
    db_types::{Category, NewProduct, NewReview, Product, ProductReview, Review},
    shop_api::{errors::CatalogApiError, shop_objects::ProductWithCategory},
    traits::CatalogManagement,
};

/// The product catalog: categories, products and product reviews.
#[derive(Debug, Clone)]
pub struct CatalogApi<B> {
    db: B,
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn create_category(&self, name: &str) -> Result<Category, CatalogApiError> {
        self.db.create_category(name).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, CatalogApiError> {
        self.db.fetch_categories().await
    }

    pub async fn category_by_name(&self, name: &str) -> Result<Option<Category>, CatalogApiError> {
        self.db.fetch_category_by_name(name).await
    }

    pub async fn update_category(&self, category_id: i64, name: &str) -> Result<Category, CatalogApiError> {
        self.db.update_category(category_id, name).await
    }

    pub async fn delete_category(&self, category_id: i64) -> Result<Category, CatalogApiError> {
        self.db.delete_category(category_id).await
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        self.db.create_product(product).await
    }

    pub async fn products(&self) -> Result<Vec<ProductWithCategory>, CatalogApiError> {
        self.db.fetch_products().await
    }

    pub async fn product_by_id(&self, product_id: i64) -> Result<Option<Product>, CatalogApiError> {
        self.db.fetch_product_by_id(product_id).await
    }

    pub async fn update_product(&self, product_id: i64, patch: serde_json::Value) -> Result<Product, CatalogApiError> {
        self.db.update_product(product_id, patch).await
    }

    pub async fn delete_product(&self, product_id: i64) -> Result<Product, CatalogApiError> {
        self.db.delete_product(product_id).await
    }

    /// Creates a review after checking the rating bounds. Ownership and delivery checks happen in the backend within
    /// one transaction.
    pub async fn create_review(&self, review: NewReview) -> Result<Review, CatalogApiError> {
        self.db.create_review(review).await
    }

    pub async fn reviews_for_product(&self, product_id: i64) -> Result<Vec<ProductReview>, CatalogApiError> {
        self.db.fetch_reviews_for_product(product_id).await
    }

    pub async fn reviews_for_user(&self, user_id: i64) -> Result<Vec<Review>, CatalogApiError> {
        self.db.fetch_reviews_for_user(user_id).await
    }
}
