use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The charge status the gateway reports for a settled payment.
pub const SUCCESSFUL_CHARGE_STATUS: &str = "successful";
/// The only webhook event type that triggers reconciliation.
pub const CHARGE_COMPLETED_EVENT: &str = "charge.completed";

//--------------------------------------  Outgoing payment request  ---------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub tx_ref: String,
    /// Amount in whole naira. The gateway's number format, not kobo.
    pub amount: f64,
    pub currency: String,
    pub redirect_url: String,
    pub customer: Customer,
    pub meta: PaymentMeta,
    pub customizations: Customizations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonenumber: Option<String>,
}

/// Metadata echoed back verbatim by the gateway on both the verify call and the webhook. This is how a confirmation
/// is attributed to a local user when all we hold is the gateway's response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMeta {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "orderId")]
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customizations {
    pub title: String,
    pub description: String,
}

//--------------------------------------  Gateway responses  ----------------------------------------------------------
/// Envelope for every Flutterwave response: `status` is "success" or "error" and `data` carries the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentLink {
    pub link: String,
}

/// The authoritative record of a charge, as returned by `/transactions/{id}/verify` and delivered in webhook
/// payloads. Everything the reconciliation engine needs is here; local state is never trusted over these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeData {
    pub id: i64,
    pub tx_ref: String,
    #[serde(default)]
    pub flw_ref: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub customer: Option<ChargeCustomer>,
    #[serde(default)]
    pub meta: Option<Value>,
}

impl ChargeData {
    pub fn is_successful(&self) -> bool {
        self.status == SUCCESSFUL_CHARGE_STATUS
    }

    /// The `userId` metadata field. The gateway does not guarantee a type here, so both numeric and string forms are
    /// accepted.
    pub fn meta_user_id(&self) -> Option<i64> {
        let meta = self.meta.as_ref()?;
        crate::helpers::value_as_i64(meta.get("userId")?)
    }
}

//--------------------------------------  Webhook payload  ------------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: ChargeData,
}

impl WebhookEvent {
    pub fn is_completed_charge(&self) -> bool {
        self.event == CHARGE_COMPLETED_EVENT && self.data.is_successful()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeCustomer {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}
