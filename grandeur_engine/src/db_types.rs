use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use grandeur_common::Naira;
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

//--------------------------------------        OrderId        -------------------------------------------------------
/// The public order reference. This is the caller-generated idempotency key (`tx_ref` on the gateway side) that
/// correlates one checkout attempt across initiate, verify and webhook. Uniqueness of this value in the orders table
/// is what makes concurrent reconciliation safe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Mints a fresh, globally unique reference for a new checkout attempt.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------         Role          -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Admin,
}

pub type Roles = Vec<Role>;

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "Customer"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid role: {0}")]
pub struct RoleConversionError(String);

impl FromStr for Role {
    type Err = RoleConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Customer" => Ok(Self::Customer),
            "Admin" => Ok(Self::Admin),
            s => Err(RoleConversionError(s.to_string())),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid role: {value}. But this conversion cannot fail. Defaulting to Customer");
            Role::Customer
        })
    }
}

//--------------------------------------         User          -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Stable public identifier, safe to expose in URLs and tokens.
    pub public_id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
    pub role: Role,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// The roles this user carries in an access token. Admins retain the customer role, so admin accounts can also
    /// shop.
    pub fn roles(&self) -> Roles {
        match self.role {
            Role::Customer => vec![Role::Customer],
            Role::Admin => vec![Role::Customer, Role::Admin],
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password_hash: String,
    pub image: Option<String>,
}

/// The subset of the users table needed to check a login. Kept separate from [`User`] so password hashes never ride
/// along on profile fetches.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
}

impl UserProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none() &&
            self.lastname.is_none() &&
            self.phone.is_none() &&
            self.address.is_none() &&
            self.image.is_none()
    }
}

//--------------------------------------       Catalog         -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Naira,
    pub currency: String,
    pub image: String,
    pub sizes: Json<Vec<String>>,
    pub default_size: String,
    pub colors: Json<Vec<String>>,
    pub default_color: String,
    pub subcategory: String,
    pub tags: Json<Vec<String>>,
    pub rating: f64,
    pub discount: i64,
    pub stock: i64,
    pub best_seller: bool,
    pub new_arrival: bool,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Naira,
    pub currency: String,
    pub image: String,
    pub sizes: Vec<String>,
    pub default_size: String,
    pub colors: Vec<String>,
    pub default_color: String,
    pub subcategory: String,
    pub tags: Vec<String>,
    pub rating: f64,
    pub discount: i64,
    pub stock: i64,
    pub best_seller: bool,
    pub new_arrival: bool,
    pub category_id: i64,
}

//--------------------------------------         Cart          -------------------------------------------------------
/// One line of a user's cart. The cart itself is just the set of lines keyed by `user_id`; there is no separate cart
/// header row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CartLine {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with the product fields checkout needs: unit price at the time of reading, plus the name and
/// image used for receipt snapshots.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub image: String,
    pub unit_price: Naira,
    pub quantity: i64,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
}

impl CartItem {
    pub fn line_total(&self) -> Naira {
        self.unit_price * self.quantity
    }
}

//--------------------------------------   OrderStatusType     -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order exists but payment has not been confirmed.
    Pending,
    /// Payment has been confirmed by the gateway. Reconciliation always lands here.
    Completed,
    /// The order has been handed to a courier.
    Shipped,
    /// The order has reached the buyer.
    Delivered,
    /// Payment failed at the gateway.
    Failed,
    /// The order was cancelled by the user or an admin.
    Cancelled,
}

impl OrderStatusType {
    /// Statuses in which a payment confirmation is an idempotent replay rather than a state change.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Completed | Self::Shipped | Self::Delivered)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::Completed => write!(f, "Completed"),
            OrderStatusType::Shipped => write!(f, "Shipped"),
            OrderStatusType::Delivered => write!(f, "Delivered"),
            OrderStatusType::Failed => write!(f, "Failed"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct StatusConversionError(pub String);

impl FromStr for OrderStatusType {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Failed" => Ok(Self::Failed),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatusType::Pending
        })
    }
}

//--------------------------------------        Order          -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub user_id: i64,
    pub email: String,
    pub total_price: Naira,
    pub currency: String,
    pub status: OrderStatusType,
    pub transaction_id: Option<String>,
    /// Allow-listed confirmation payload ([`PaymentData`] as JSON). Never the raw gateway response.
    pub payment_data: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price at the time of purchase. Later catalog price changes do not affect settled orders.
    pub unit_price: Naira,
}

//--------------------------------------       Receipt         -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Receipt {
    pub id: i64,
    pub order_id: OrderId,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub total: Naira,
    pub transaction_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub id: i64,
    pub receipt_id: i64,
    pub product_id: i64,
    pub name: String,
    pub image: String,
    pub unit_price: Naira,
    pub quantity: i64,
    pub line_total: Naira,
}

//--------------------------------------    TrackingEvent      -------------------------------------------------------
/// Append-only fulfilment history for an order. Rows are never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub id: i64,
    pub order_id: OrderId,
    pub status: OrderStatusType,
    pub location: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------        Review         -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub order_id: i64,
    pub rating: i64,
    pub comment: String,
    pub images: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// A review joined with the reviewer's public details, as rendered on product pages.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProductReview {
    pub id: i64,
    pub product_id: i64,
    pub rating: i64,
    pub comment: String,
    pub images: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub firstname: String,
    pub lastname: String,
    pub reviewer_image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i64,
    pub product_id: i64,
    pub order_id: i64,
    pub rating: i64,
    pub comment: String,
    pub images: Vec<String>,
}

//--------------------------------------       Wishlist        -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------       Address         -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    pub label: String,
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAddress {
    pub label: String,
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AddressUpdate {
    pub label: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl AddressUpdate {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() &&
            self.full_name.is_none() &&
            self.phone.is_none() &&
            self.line1.is_none() &&
            self.line2.is_none() &&
            self.city.is_none() &&
            self.state.is_none() &&
            self.postal_code.is_none() &&
            self.country.is_none()
    }
}

//--------------------------------------  ChargeConfirmation   -------------------------------------------------------
/// A successful charge as confirmed by the gateway. Both reconciliation entry points (the synchronous verifier and
/// the webhook receiver) reduce their inputs to this before touching local state. The amount is the
/// gateway-confirmed figure; locally computed cart totals are never substituted for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeConfirmation {
    pub reference: OrderId,
    pub transaction_id: String,
    pub user_id: i64,
    pub amount: Naira,
    pub currency: String,
    pub payment_data: PaymentData,
}

/// The only confirmation fields that are persisted, by explicit allow-list. Card and account details from the
/// gateway response are never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentData {
    pub id: i64,
    pub status: String,
    pub amount: f64,
    pub currency: String,
}

impl PaymentData {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            error!("Could not serialize payment data: {e}. Storing an empty object instead.");
            "{}".to_string()
        })
    }
}

//--------------------------------------      Settlement       -------------------------------------------------------
/// The outcome of reconciling a confirmed charge: the order (created or replayed), the receipt where one exists, and
/// whether this call was the one that settled the order.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub order: Order,
    pub receipt: Option<Receipt>,
    pub receipt_items: Vec<ReceiptItem>,
    pub newly_settled: bool,
}
