use grandeur_common::Secret;
use log::*;

const DEFAULT_BASE_URL: &str = "https://api.flutterwave.com/v3";

#[derive(Debug, Clone, Default)]
pub struct FlutterwaveConfig {
    /// Base url of the Flutterwave REST API. Only overridden in tests.
    pub base_url: String,
    pub secret_key: Secret<String>,
    /// Where the gateway sends the buyer's browser after checkout.
    pub redirect_url: String,
    pub currency: String,
}

impl FlutterwaveConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("GRANDEUR_FLW_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let secret_key = Secret::new(std::env::var("GRANDEUR_FLW_SECRET_KEY").unwrap_or_else(|_| {
            warn!("GRANDEUR_FLW_SECRET_KEY not set. Payment initialization and verification will be rejected by the \
                   gateway.");
            String::default()
        }));
        let redirect_url = std::env::var("GRANDEUR_PAYMENT_REDIRECT_URL").unwrap_or_else(|_| {
            warn!("GRANDEUR_PAYMENT_REDIRECT_URL not set, using http://localhost:5173/verify-payment as default");
            "http://localhost:5173/verify-payment".to_string()
        });
        let currency = std::env::var("GRANDEUR_PAYMENT_CURRENCY").unwrap_or_else(|_| {
            debug!("GRANDEUR_PAYMENT_CURRENCY not set, using NGN as default");
            grandeur_common::NGN_CURRENCY_CODE.to_string()
        });
        Self { base_url, secret_key, redirect_url, currency }
    }
}
