use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlutterwaveApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The gateway rejected the request. {0}")]
    GatewayRejection(String),
    #[error("Invalid currency amount: {0}")]
    InvalidCurrencyAmount(String),
}
