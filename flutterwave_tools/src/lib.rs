mod api;
mod config;
mod error;

mod data_objects;

pub mod helpers;

pub use api::{FlutterwaveApi, PaymentGateway};
pub use config::FlutterwaveConfig;
pub use data_objects::{
    ChargeCustomer,
    ChargeData,
    Customer,
    Customizations,
    PaymentMeta,
    PaymentRequest,
    WebhookEvent,
    CHARGE_COMPLETED_EVENT,
    SUCCESSFUL_CHARGE_STATUS,
};
pub use error::FlutterwaveApiError;
