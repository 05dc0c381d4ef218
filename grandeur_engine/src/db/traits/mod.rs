//! Database abstractions for the engine.
//!
//! Each trait groups the storage operations for one area of the shop. The server's handlers are generic over these
//! traits, which is what lets the endpoint tests run against mock backends.
mod account_management;
mod address_management;
mod cart_management;
mod catalog_management;
mod checkout_database;
mod order_management;

pub use account_management::AccountManagement;
pub use address_management::AddressManagement;
pub use cart_management::CartManagement;
pub use catalog_management::CatalogManagement;
pub use checkout_database::CheckoutDatabase;
pub use order_management::OrderManagement;
