use crate::{
    db_types::{CartItem, CartLine, Product, WishlistEntry},
    shop_api::errors::CartApiError,
};

#[allow(async_fn_in_trait)]
pub trait CartManagement: Clone {
    /// Adds a product to the user's cart. If the product is already in the cart, its quantity is incremented and the
    /// size/colour selections are refreshed. Returns the line and whether it was newly created.
    async fn add_to_cart(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<(CartLine, bool), CartApiError>;

    /// Replaces quantity/size/colour on an existing cart line.
    async fn update_cart_line(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: Option<i64>,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<CartLine, CartApiError>;

    /// Removes one product from the cart.
    async fn remove_from_cart(&self, user_id: i64, product_id: i64) -> Result<(), CartApiError>;

    /// The user's cart lines joined with product details.
    async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartItem>, CartApiError>;

    // Wishlist operations live here too: a wishlist is a cart without quantities.

    async fn fetch_wishlist(&self, user_id: i64) -> Result<Vec<(WishlistEntry, Product)>, CartApiError>;

    async fn add_to_wishlist(&self, user_id: i64, product_id: i64) -> Result<WishlistEntry, CartApiError>;

    async fn remove_from_wishlist(&self, user_id: i64, product_id: i64) -> Result<(), CartApiError>;

    /// Empties the wishlist, returning the number of entries removed.
    async fn clear_wishlist(&self, user_id: i64) -> Result<u64, CartApiError>;
}
