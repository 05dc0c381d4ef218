use thiserror::Error;

use crate::db_types::OrderId;

#[derive(Debug, Clone, Error)]
pub enum CheckoutApiError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("The user with id {0} does not exist")]
    UserNotFound(i64),
    #[error("The cart for user {0} is empty")]
    CartIsEmpty(i64),
    #[error("The computed cart total is not positive")]
    InvalidCartTotal,
    #[error("The order {0} should exist but could not be fetched")]
    OrderShouldExist(OrderId),
}

impl From<sqlx::Error> for CheckoutApiError {
    fn from(e: sqlx::Error) -> Self {
        CheckoutApiError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A user with email {0} already exists")]
    UserAlreadyExists(String),
    #[error("User not found")]
    UserNotFound,
    #[error("Address not found")]
    AddressNotFound,
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        AccountApiError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The product with id {0} does not exist")]
    ProductNotFound(i64),
    #[error("A product named '{0}' already exists")]
    ProductAlreadyExists(String),
    #[error("The category does not exist")]
    CategoryNotFound,
    #[error("The category '{0}' already exists")]
    CategoryAlreadyExists(String),
    #[error("This product has already been reviewed for this order")]
    ReviewAlreadyExists,
    #[error("No delivered order matches this review")]
    OrderNotEligibleForReview,
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum CartApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The product with id {0} does not exist")]
    ProductNotFound(i64),
    #[error("The item is not in the cart")]
    LineNotFound,
    #[error("The product is already in the wishlist")]
    AlreadyInWishlist,
    #[error("The product is not in the wishlist")]
    NotInWishlist,
}

impl From<sqlx::Error> for CartApiError {
    fn from(e: sqlx::Error) -> Self {
        CartApiError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Order cannot be cancelled. Either order not found or already processed.")]
    CannotCancel,
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),
}

impl From<sqlx::Error> for OrderApiError {
    fn from(e: sqlx::Error) -> Self {
        OrderApiError::DatabaseError(e.to_string())
    }
}
