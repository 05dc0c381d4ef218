mod naira;

pub mod op;
mod secret;

pub mod helpers;

pub use naira::{Naira, NairaConversionError, NGN_CURRENCY_CODE, NGN_CURRENCY_CODE_LOWER};
pub use secret::Secret;
