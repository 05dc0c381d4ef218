//! Database backends for the Grandeur engine.
//!
//! The [`traits`] module defines the behaviour a backend must provide; [`sqlite`] is the concrete implementation.

#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;
