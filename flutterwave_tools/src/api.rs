use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::FlutterwaveConfig,
    data_objects::{ApiEnvelope, ChargeData, PaymentLink},
    FlutterwaveApiError,
    PaymentRequest,
};

/// All calls to the gateway must complete within this window; a hung call is treated as a failed call (nothing is
/// persisted on the initiate path, and nothing is reconciled on the verify path).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The operations the payment routes need from the gateway. `FlutterwaveApi` is the production implementation;
/// endpoint tests substitute a mock so no network traffic is involved.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway: Clone {
    /// Submit a payment request and return the hosted checkout link the buyer is redirected to.
    async fn create_payment_link(&self, request: PaymentRequest) -> Result<String, FlutterwaveApiError>;

    /// Fetch the authoritative state of a charge by the gateway-assigned transaction id.
    async fn verify_transaction(&self, transaction_id: &str) -> Result<ChargeData, FlutterwaveApiError>;
}

#[derive(Clone)]
pub struct FlutterwaveApi {
    config: FlutterwaveConfig,
    client: Arc<Client>,
}

impl FlutterwaveApi {
    pub fn new(config: FlutterwaveConfig) -> Result<Self, FlutterwaveApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.secret_key.reveal());
        let val = HeaderValue::from_str(&bearer).map_err(|e| FlutterwaveApiError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FlutterwaveApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &FlutterwaveConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, FlutterwaveApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| FlutterwaveApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| FlutterwaveApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| FlutterwaveApiError::RestResponseError(e.to_string()))?;
            Err(FlutterwaveApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<T, FlutterwaveApiError> {
        if envelope.status != "success" {
            return Err(FlutterwaveApiError::GatewayRejection(envelope.message));
        }
        envelope.data.ok_or_else(|| FlutterwaveApiError::JsonError("Response envelope carried no data".to_string()))
    }
}

impl PaymentGateway for FlutterwaveApi {
    async fn create_payment_link(&self, request: PaymentRequest) -> Result<String, FlutterwaveApiError> {
        debug!("Creating payment link for reference {}", request.tx_ref);
        let result =
            self.rest_query::<ApiEnvelope<PaymentLink>, PaymentRequest>(Method::POST, "/payments", Some(request)).await?;
        let link = Self::unwrap_envelope(result)?;
        info!("Payment link created");
        Ok(link.link)
    }

    async fn verify_transaction(&self, transaction_id: &str) -> Result<ChargeData, FlutterwaveApiError> {
        let path = format!("/transactions/{transaction_id}/verify");
        debug!("Verifying transaction {transaction_id}");
        let result = self.rest_query::<ApiEnvelope<ChargeData>, ()>(Method::GET, &path, None).await?;
        let charge = Self::unwrap_envelope(result)?;
        info!("Transaction {transaction_id} verified with charge status '{}'", charge.status);
        Ok(charge)
    }
}
