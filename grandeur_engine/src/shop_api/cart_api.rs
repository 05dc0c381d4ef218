use grandeur_common::Naira;

use crate::{
    db_types::{CartItem, CartLine, Product, WishlistEntry},
    shop_api::errors::CartApiError,
    traits::CartManagement,
};

/// Cart and wishlist operations. Carts are read-and-mutated freely here; checkout reads and clears them through
/// [`crate::CheckoutApi`] instead, inside its own transaction boundary.
#[derive(Debug, Clone)]
pub struct CartApi<B> {
    db: B,
}

impl<B> CartApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CartApi<B>
where B: CartManagement
{
    pub async fn add_to_cart(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<(CartLine, bool), CartApiError> {
        let quantity = quantity.max(1);
        self.db.add_to_cart(user_id, product_id, quantity, size, color).await
    }

    pub async fn update_cart_line(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: Option<i64>,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<CartLine, CartApiError> {
        self.db.update_cart_line(user_id, product_id, quantity, size, color).await
    }

    pub async fn remove_from_cart(&self, user_id: i64, product_id: i64) -> Result<(), CartApiError> {
        self.db.remove_from_cart(user_id, product_id).await
    }

    /// The cart lines with product details plus the running total.
    pub async fn cart(&self, user_id: i64) -> Result<(Vec<CartItem>, Naira), CartApiError> {
        let items = self.db.fetch_cart(user_id).await?;
        let total = items.iter().map(CartItem::line_total).sum();
        Ok((items, total))
    }

    pub async fn wishlist(&self, user_id: i64) -> Result<Vec<(WishlistEntry, Product)>, CartApiError> {
        self.db.fetch_wishlist(user_id).await
    }

    pub async fn add_to_wishlist(&self, user_id: i64, product_id: i64) -> Result<WishlistEntry, CartApiError> {
        self.db.add_to_wishlist(user_id, product_id).await
    }

    pub async fn remove_from_wishlist(&self, user_id: i64, product_id: i64) -> Result<(), CartApiError> {
        self.db.remove_from_wishlist(user_id, product_id).await
    }

    pub async fn clear_wishlist(&self, user_id: i64) -> Result<u64, CartApiError> {
        self.db.clear_wishlist(user_id).await
    }
}
