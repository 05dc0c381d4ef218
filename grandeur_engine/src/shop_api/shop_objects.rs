use grandeur_common::Naira;
use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderLineItem, OrderStatusType, Product};

//--------------------------------------      Pagination       -------------------------------------------------------
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit.filter(|l| *l > 0).unwrap_or(10);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Page metadata returned alongside every paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub limit: i64,
}

impl PageInfo {
    pub fn new(total: i64, pagination: Pagination) -> Self {
        let pages = if total == 0 { 0 } else { (total + pagination.limit - 1) / pagination.limit };
        Self { total, page: pagination.page, pages, limit: pagination.limit }
    }
}

//--------------------------------------   OrderQueryFilter    -------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct OrderQueryFilter {
    pub user_id: Option<i64>,
    pub status: Option<OrderStatusType>,
    pub pagination: Option<Pagination>,
}

impl OrderQueryFilter {
    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.status.is_none()
    }
}

//--------------------------------------   UserQueryFilter     -------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct UserQueryFilter {
    pub role: Option<crate::db_types::Role>,
    /// Case-insensitive substring match against first name, last name and email.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

//--------------------------------------        Views          -------------------------------------------------------
/// An order together with its line items, as returned to the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderLineItem>,
}

/// A product joined with its category name for listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub product: Product,
    pub category_name: String,
}

//--------------------------------------        Stats          -------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStats {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub completed_orders: i64,
    pub total_spent: Naira,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOrderStats {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
    pub total_revenue: Naira,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total_users: i64,
    pub admin_users: i64,
    pub customer_users: i64,
}
