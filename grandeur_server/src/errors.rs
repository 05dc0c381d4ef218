use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use grandeur_engine::{AccountApiError, CartApiError, CatalogApiError, CheckoutApiError, OrderApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NoRecordFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("Payment service error. {0}")]
    PaymentGatewayError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
                AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
                AuthError::InvalidSignature => StatusCode::UNAUTHORIZED,
            },
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::PaymentGatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Same JSON envelope as every success response, so storefront clients have one shape to deal with
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "success": false, "message": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Access denied. Please provide a valid token.")]
    MissingToken,
    #[error("Invalid token. Please log in again. {0}")]
    InvalidToken(String),
    #[error("Your session has expired. Please log in again.")]
    TokenExpired,
    #[error("Invalid webhook signature.")]
    InvalidSignature,
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::UserAlreadyExists(_) => Self::InvalidRequest("User with this email already exists!".into()),
            AccountApiError::UserNotFound => Self::NoRecordFound("User not found".into()),
            AccountApiError::AddressNotFound => Self::NoRecordFound("Address not found".into()),
            AccountApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CartApiError> for ServerError {
    fn from(e: CartApiError) -> Self {
        match e {
            CartApiError::ProductNotFound(_) => Self::InvalidRequest("Product does not exist!".into()),
            CartApiError::LineNotFound => Self::NoRecordFound("Item not found in cart!".into()),
            CartApiError::AlreadyInWishlist => Self::InvalidRequest("Product already in wishlist".into()),
            CartApiError::NotInWishlist => Self::NoRecordFound("Product not in wishlist".into()),
            CartApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::ProductNotFound(_) => Self::NoRecordFound("Product not found!".into()),
            CatalogApiError::ProductAlreadyExists(_) => Self::InvalidRequest("Product already exists!".into()),
            CatalogApiError::CategoryNotFound => Self::InvalidRequest("Category does not exist in database!".into()),
            CatalogApiError::CategoryAlreadyExists(_) => Self::Conflict("Category already exists!".into()),
            CatalogApiError::ReviewAlreadyExists => {
                Self::InvalidRequest("You have already reviewed this product".into())
            },
            CatalogApiError::OrderNotEligibleForReview => {
                Self::NoRecordFound("Order not found or not yet delivered".into())
            },
            CatalogApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::OrderNotFound(_) => Self::NoRecordFound("Order not found".into()),
            OrderApiError::CannotCancel => {
                Self::InvalidRequest("Order cannot be cancelled. Either order not found or already processed.".into())
            },
            OrderApiError::InvalidStatus(_) => Self::InvalidRequest("Invalid order status".into()),
            OrderApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CheckoutApiError> for ServerError {
    fn from(e: CheckoutApiError) -> Self {
        match e {
            CheckoutApiError::CartIsEmpty(_) => Self::InvalidRequest("Cart is empty!".into()),
            CheckoutApiError::InvalidCartTotal => Self::InvalidRequest("Invalid cart total!".into()),
            CheckoutApiError::UserNotFound(_) => Self::InvalidRequest("User not found!".into()),
            CheckoutApiError::OrderShouldExist(_) | CheckoutApiError::DatabaseError(_) => {
                Self::BackendError(e.to_string())
            },
        }
    }
}
