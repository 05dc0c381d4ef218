//! Grandeur storefront engine
//!
//! This library contains the storage layer and business logic for the Grandeur e-commerce backend. It is
//! HTTP-framework agnostic; the server crate is a thin JSON layer over the APIs exported here.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@db`]). SQLite is the supported backend. You should never need to access
//!    the database directly. Instead, use the public API provided by the engine. The exception is the data types used
//!    in the database. These are defined in the `db_types` module and are public.
//! 2. The shop public API ([`mod@shop_api`]). This provides the public-facing functionality of the engine: checkout
//!    and payment reconciliation, carts, the product catalog, orders, user accounts, reviews, wishlists and
//!    addresses. Backends need to implement the traits in [`mod@db`] in order to serve the Grandeur server.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted when certain actions
//! occur within the engine. For example, when a charge is reconciled into an order, an `OrderPaidEvent` is emitted.
//! A simple actor framework is used so that you can easily hook into these events and perform custom actions.
mod db;

pub mod db_types;
pub mod events;
mod shop_api;

#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDatabase;
pub use db::traits;
pub use db::traits::{
    AccountManagement,
    AddressManagement,
    CartManagement,
    CatalogManagement,
    CheckoutDatabase,
    OrderManagement,
};
pub use shop_api::{
    accounts_api::AccountApi,
    cart_api::CartApi,
    catalog_api::CatalogApi,
    checkout_api::CheckoutApi,
    errors::{AccountApiError, CartApiError, CatalogApiError, CheckoutApiError, OrderApiError},
    orders_api::OrderApi,
    shop_objects,
};
