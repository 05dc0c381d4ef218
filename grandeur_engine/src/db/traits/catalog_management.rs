use crate::{
    db_types::{Category, NewProduct, NewReview, Product, ProductReview, Review},
    shop_api::{errors::CatalogApiError, shop_objects::ProductWithCategory},
};

#[allow(async_fn_in_trait)]
pub trait CatalogManagement: Clone {
    //----------------------------------------  Categories  ----------------------------------------
    async fn create_category(&self, name: &str) -> Result<Category, CatalogApiError>;

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogApiError>;

    async fn fetch_category_by_name(&self, name: &str) -> Result<Option<Category>, CatalogApiError>;

    async fn update_category(&self, category_id: i64, name: &str) -> Result<Category, CatalogApiError>;

    async fn delete_category(&self, category_id: i64) -> Result<Category, CatalogApiError>;

    //----------------------------------------  Products  ------------------------------------------
    /// Creates a product. The category must exist and product names are unique.
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;

    async fn fetch_products(&self) -> Result<Vec<ProductWithCategory>, CatalogApiError>;

    async fn fetch_product_by_id(&self, product_id: i64) -> Result<Option<Product>, CatalogApiError>;

    /// Applies a JSON patch of column/value pairs to a product. Unknown columns are rejected.
    async fn update_product(&self, product_id: i64, patch: serde_json::Value) -> Result<Product, CatalogApiError>;

    async fn delete_product(&self, product_id: i64) -> Result<Product, CatalogApiError>;

    //----------------------------------------  Reviews  -------------------------------------------
    /// Creates a review. The order must belong to the reviewer and be in `Delivered` status, and a user can review a
    /// product at most once per order.
    async fn create_review(&self, review: NewReview) -> Result<Review, CatalogApiError>;

    async fn fetch_reviews_for_product(&self, product_id: i64) -> Result<Vec<ProductReview>, CatalogApiError>;

    async fn fetch_reviews_for_user(&self, user_id: i64) -> Result<Vec<Review>, CatalogApiError>;
}
