//! Glue between the Flutterwave data model and the engine's reconciliation types, plus the event hooks the server
//! installs on engine events.

use flutterwave_tools::ChargeData;
use grandeur_common::Naira;
use grandeur_engine::{
    db_types::{ChargeConfirmation, OrderId, PaymentData},
    events::{EventHandlers, EventHooks},
};
use log::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChargeConversionError {
    #[error("The gateway reported the charge as '{0}', not successful.")]
    NotSuccessful(String),
    #[error("The confirmed amount is invalid. {0}")]
    InvalidAmount(String),
    #[error("User ID not found in transaction data!")]
    MissingUserId,
}

/// Reduces a gateway charge to the engine's confirmation type. This is the single place where gateway ground truth
/// is read: the reference, the confirmed amount and the attribution all come from the charge itself, never from
/// anything stored locally. Only the allow-listed confirmation fields survive into `payment_data`.
pub fn confirmation_from_charge(charge: &ChargeData) -> Result<ChargeConfirmation, ChargeConversionError> {
    if !charge.is_successful() {
        return Err(ChargeConversionError::NotSuccessful(charge.status.clone()));
    }
    let user_id = charge.meta_user_id().ok_or(ChargeConversionError::MissingUserId)?;
    let amount = Naira::try_from(charge.amount).map_err(|e| ChargeConversionError::InvalidAmount(e.to_string()))?;
    Ok(ChargeConfirmation {
        reference: OrderId(charge.tx_ref.clone()),
        transaction_id: charge.id.to_string(),
        user_id,
        amount,
        currency: charge.currency.clone(),
        payment_data: PaymentData {
            id: charge.id,
            status: charge.status.clone(),
            amount: charge.amount,
            currency: charge.currency.clone(),
        },
    })
}

pub const EVENT_BUFFER_SIZE: usize = 25;

/// Builds the event handlers the server runs. Mail transport lives outside this repository; the hooks log what the
/// mailer would send so operators can follow the flow end to end.
pub fn create_event_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_order_paid(|event| {
        Box::pin(async move {
            let recipient = event.receipt.as_ref().map(|r| r.email.clone()).unwrap_or_else(|| event.order.email.clone());
            info!(
                "📧️ Order confirmation for {} ({}) queued for delivery to {recipient}",
                event.order.order_id, event.order.total_price
            );
        })
    });
    hooks.on_user_registered(|event| {
        Box::pin(async move {
            info!(
                "📧️ Verification mail for {} queued for delivery (user id {})",
                event.user.email, event.user.public_id
            );
        })
    });
    EventHandlers::new(EVENT_BUFFER_SIZE, hooks)
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn charge(status: &str, meta: serde_json::Value) -> ChargeData {
        ChargeData {
            id: 821000123,
            tx_ref: "REF1".to_string(),
            flw_ref: Some("FLW-MOCK-1".to_string()),
            amount: 13_000.0,
            currency: "NGN".to_string(),
            status: status.to_string(),
            customer: None,
            meta: Some(meta),
        }
    }

    #[test]
    fn successful_charge_converts() {
        let charge = charge("successful", json!({ "userId": 7, "orderId": "REF1" }));
        let confirmation = confirmation_from_charge(&charge).unwrap();
        assert_eq!(confirmation.reference.as_str(), "REF1");
        assert_eq!(confirmation.transaction_id, "821000123");
        assert_eq!(confirmation.user_id, 7);
        assert_eq!(confirmation.amount, Naira::from_naira(13_000));
        // Allow-listed payload only
        assert_eq!(confirmation.payment_data.status, "successful");
        assert_eq!(confirmation.payment_data.amount, 13_000.0);
    }

    #[test]
    fn string_user_ids_are_accepted() {
        let charge = charge("successful", json!({ "userId": "42" }));
        let confirmation = confirmation_from_charge(&charge).unwrap();
        assert_eq!(confirmation.user_id, 42);
    }

    #[test]
    fn unsuccessful_or_unattributed_charges_are_rejected() {
        let failed = charge("failed", json!({ "userId": 7 }));
        assert!(matches!(confirmation_from_charge(&failed), Err(ChargeConversionError::NotSuccessful(_))));
        let anonymous = charge("successful", json!({}));
        assert!(matches!(confirmation_from_charge(&anonymous), Err(ChargeConversionError::MissingUserId)));
    }
}
