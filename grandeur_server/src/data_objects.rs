use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The JSON envelope every endpoint answers with. Data-carrying responses embed their payload under `data` via
/// `serde_json::json!`; this type covers the message-only cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

//--------------------------------------        Users          -------------------------------------------------------
// Field names mirror the storefront's existing wire format, which uses flat lowercase names for user fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
    pub confirmpassword: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "currentPassword")]
    pub current_password: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub role: Option<String>,
    pub search: Option<String>,
}

//--------------------------------------       Catalog         -------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreateRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryUpdateRequest {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDeleteRequest {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Price in whole naira.
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub sizes: Option<Vec<String>>,
    #[serde(rename = "defaultSize")]
    pub default_size: Option<String>,
    pub colors: Option<Vec<String>>,
    #[serde(rename = "defaultColor")]
    pub default_color: Option<String>,
    #[serde(rename = "bestSeller", default)]
    pub best_seller: bool,
    #[serde(rename = "newArrival", default)]
    pub new_arrival: bool,
    pub subcategory: Option<String>,
    pub rating: Option<f64>,
    pub discount: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdateRequest {
    pub id: i64,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductDeleteRequest {
    pub id: i64,
}

//--------------------------------------         Cart          -------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartRequest {
    pub productid: Option<i64>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartRequest {
    pub productid: Option<i64>,
    pub quantity: Option<i64>,
    pub size: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoveCartItemRequest {
    pub productid: Option<i64>,
}

//--------------------------------------       Wishlist        -------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct WishlistAddRequest {
    #[serde(rename = "productId")]
    pub product_id: Option<i64>,
}

//--------------------------------------       Reviews         -------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCreateRequest {
    #[serde(rename = "orderId")]
    pub order_id: Option<i64>,
    #[serde(rename = "productId")]
    pub product_id: Option<i64>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

//--------------------------------------      Addresses        -------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct AddressCreateRequest {
    pub label: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "addressLine1")]
    pub line1: Option<String>,
    #[serde(rename = "addressLine2")]
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "postalCode")]
    pub postal_code: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressUpdateRequest {
    pub label: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "addressLine1")]
    pub line1: Option<String>,
    #[serde(rename = "addressLine2")]
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "postalCode")]
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

//--------------------------------------        Orders         -------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdateRequest {
    pub status: Option<String>,
}

//--------------------------------------       Payments        -------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct InitializePaymentRequest {
    pub email: Option<String>,
}

/// Query parameters the gateway appends when redirecting the buyer back. Only `transaction_id` is trusted; status
/// and tx_ref are re-derived from the gateway's verify response.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentQuery {
    pub transaction_id: Option<String>,
    pub status: Option<String>,
    pub tx_ref: Option<String>,
}
