//----------------------------------------------   Checkout  ----------------------------------------------------

use actix_web::{web, HttpRequest, HttpResponse};
use flutterwave_tools::{
    Customer,
    Customizations,
    FlutterwaveConfig,
    PaymentGateway,
    PaymentMeta,
    PaymentRequest,
    WebhookEvent,
};
use grandeur_engine::{
    db_types::{OrderId, Role},
    AccountApi,
    AccountManagement,
    CheckoutApi,
    CheckoutApiError,
    CheckoutDatabase,
};
use log::{debug, error, info, trace, warn};
use serde_json::json;

use crate::{
    auth::JwtClaims,
    data_objects::{InitializePaymentRequest, JsonResponse, VerifyPaymentQuery},
    errors::ServerError,
    helpers::get_remote_ip,
    integrations::flutterwave::{confirmation_from_charge, ChargeConversionError},
    route,
    routes::required,
};

const PAYMENT_TITLE: &str = "Grandeur";
const PAYMENT_DESCRIPTION: &str = "Payment for Order";

route!(initialize_payment => Post "/initialize" impl CheckoutDatabase, AccountManagement, PaymentGateway where requires [Role::Customer]);
/// Payment initiation.
///
/// Reads the buyer's cart, prices it at this moment, mints a fresh order reference and asks the gateway for a hosted
/// checkout link. Nothing is persisted locally: repeated calls simply mint new references, and only whichever
/// reference eventually gets charged will reconcile into an order.
pub async fn initialize_payment<BChk, BAcc, G>(
    claims: JwtClaims,
    body: web::Json<InitializePaymentRequest>,
    checkout: web::Data<CheckoutApi<BChk>>,
    accounts: web::Data<AccountApi<BAcc>>,
    gateway: web::Data<G>,
    settings: web::Data<FlutterwaveConfig>,
) -> Result<HttpResponse, ServerError>
where
    BChk: CheckoutDatabase,
    BAcc: AccountManagement,
    G: PaymentGateway,
{
    let email = required(body.into_inner().email, "Email is required!")?;
    let user = accounts
        .user_by_email(&email)
        .await?
        .ok_or_else(|| ServerError::InvalidRequest("User does not exist!".to_string()))?;
    if user.id != claims.user_id() {
        return Err(ServerError::InsufficientPermissions(
            "Access denied. You can only check out your own cart.".to_string(),
        ));
    }
    let (items, total) = checkout.cart_for_checkout(user.id).await?;
    let reference = OrderId::random();
    debug!("💳️ Initializing payment of {total} over {} line(s) with reference {reference}", items.len());

    let request = PaymentRequest {
        tx_ref: reference.as_str().to_string(),
        amount: total.to_naira_f64(),
        currency: settings.currency.clone(),
        redirect_url: settings.redirect_url.clone(),
        customer: Customer { email: user.email.clone(), name: user.full_name(), phonenumber: user.phone.clone() },
        meta: PaymentMeta { user_id: user.id, order_id: reference.as_str().to_string() },
        customizations: Customizations {
            title: PAYMENT_TITLE.to_string(),
            description: PAYMENT_DESCRIPTION.to_string(),
        },
    };
    let link = gateway.create_payment_link(request).await.map_err(|e| {
        error!("💳️ Gateway rejected the payment initialization for {reference}. {e}");
        ServerError::PaymentGatewayError("Payment initialization failed!".to_string())
    })?;
    info!("💳️ Payment initialized for {} with reference {reference}", user.email);
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Payment initialized successfully!",
        "link": link,
        "orderId": reference.as_str(),
    })))
}

route!(verify_payment => Get "/verify" impl CheckoutDatabase, AccountManagement, PaymentGateway);
/// The synchronous verification path, hit when the buyer's browser returns from the gateway.
///
/// The query-string transaction id is the only client-supplied input; everything else (reference, amount,
/// attribution) is re-read from the gateway, which is ground truth. On a confirmed-successful charge the
/// reconciliation engine produces (or replays) the order and receipt.
pub async fn verify_payment<BChk, BAcc, G>(
    query: web::Query<VerifyPaymentQuery>,
    checkout: web::Data<CheckoutApi<BChk>>,
    accounts: web::Data<AccountApi<BAcc>>,
    gateway: web::Data<G>,
) -> Result<HttpResponse, ServerError>
where
    BChk: CheckoutDatabase,
    BAcc: AccountManagement,
    G: PaymentGateway,
{
    let transaction_id = query
        .into_inner()
        .transaction_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ServerError::InvalidRequest("Transaction ID is required!".to_string()))?;
    trace!("💳️ Verifying transaction {transaction_id}");
    let charge = gateway.verify_transaction(&transaction_id).await.map_err(|e| {
        error!("💳️ Could not verify transaction {transaction_id} with the gateway. {e}");
        ServerError::PaymentGatewayError("Payment verification failed!".to_string())
    })?;
    let confirmation = confirmation_from_charge(&charge).map_err(|e| match e {
        ChargeConversionError::NotSuccessful(_) => {
            ServerError::InvalidRequest("Payment was not successful!".to_string())
        },
        ChargeConversionError::MissingUserId => {
            ServerError::InvalidRequest("User ID not found in transaction data!".to_string())
        },
        ChargeConversionError::InvalidAmount(e) => ServerError::InvalidRequest(e),
    })?;
    // The order cannot be attributed if the user vanished between checkout and verification
    accounts
        .user_by_id(confirmation.user_id)
        .await?
        .ok_or_else(|| ServerError::InvalidRequest("User not found!".to_string()))?;

    let settlement = checkout.reconcile_confirmed_charge(confirmation).await?;
    info!("💳️ Transaction {transaction_id} verified against order {}", settlement.order.order_id);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Payment verified successfully!",
        "data": {
            "orderId": settlement.order.order_id.as_str(),
            "transactionId": transaction_id,
            "totalPrice": settlement.order.total_price,
            "order": settlement.order,
            "receiptItems": settlement.receipt_items,
        },
    })))
}

/// The asynchronous webhook path, called server-to-server by the gateway — possibly before, after, instead of, or
/// multiple times alongside the synchronous path. Signature authentication has already happened in the middleware
/// wrapping this route.
///
/// Webhook responses must be 200 once an event has been parsed and either processed or deliberately ignored; the
/// gateway retries indefinitely on anything else. Only a genuinely transient internal failure (a database error
/// inside the settlement transaction, which rolled everything back) returns a retryable status.
pub async fn payment_webhook<B>(
    req: HttpRequest,
    body: web::Json<WebhookEvent>,
    checkout: web::Data<CheckoutApi<B>>,
) -> HttpResponse
where
    B: CheckoutDatabase,
{
    let peer = get_remote_ip(&req, false, false).map(|ip| ip.to_string()).unwrap_or_else(|| "unknown".to_string());
    let event = body.into_inner();
    trace!("💳️🪝️ Received webhook event '{}' from {peer}", event.event);
    if !event.is_completed_charge() {
        debug!("💳️🪝️ Ignoring webhook event '{}' with charge status '{}'", event.event, event.data.status);
        return HttpResponse::Ok().json(JsonResponse::success("Event ignored."));
    }
    let confirmation = match confirmation_from_charge(&event.data) {
        Ok(confirmation) => confirmation,
        Err(ChargeConversionError::MissingUserId) => {
            // Cannot be attributed to a user. Acknowledge so the gateway stops retrying; an operator must reconcile
            // this charge by hand.
            warn!(
                "💳️🪝️ Webhook charge {} (reference {}) carries no user id in its metadata. Acknowledging and \
                 dropping; manual reconciliation required.",
                event.data.id, event.data.tx_ref
            );
            return HttpResponse::Ok().json(JsonResponse::failure("User ID not found in transaction data."));
        },
        Err(e) => {
            warn!("💳️🪝️ Could not convert webhook charge {}. {e}", event.data.id);
            return HttpResponse::Ok().json(JsonResponse::failure(e));
        },
    };
    match checkout.reconcile_confirmed_charge(confirmation).await {
        Ok(settlement) if settlement.newly_settled => {
            info!("💳️🪝️ Webhook settled order {}", settlement.order.order_id);
            HttpResponse::Ok().json(JsonResponse::success("Charge reconciled."))
        },
        Ok(settlement) => {
            info!("💳️🪝️ Webhook for order {} was a duplicate delivery.", settlement.order.order_id);
            HttpResponse::Ok().json(JsonResponse::success("Order already settled."))
        },
        Err(CheckoutApiError::UserNotFound(user_id)) => {
            warn!(
                "💳️🪝️ Webhook charge for reference {} points at unknown user {user_id}. Acknowledging and \
                 dropping; manual reconciliation required.",
                event.data.tx_ref
            );
            HttpResponse::Ok().json(JsonResponse::failure("User not found."))
        },
        Err(e @ (CheckoutApiError::DatabaseError(_) | CheckoutApiError::OrderShouldExist(_))) => {
            // Transient: the settlement transaction rolled back, so a retry from the gateway is safe and wanted
            error!("💳️🪝️ Transient failure while reconciling webhook charge. {e}");
            HttpResponse::InternalServerError().json(JsonResponse::failure("Temporary processing failure."))
        },
        Err(e) => {
            warn!("💳️🪝️ Unexpected error while handling webhook charge. {e}");
            HttpResponse::Ok().json(JsonResponse::failure("Unexpected error handling charge."))
        },
    }
}
