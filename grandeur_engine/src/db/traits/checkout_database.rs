use crate::{
    db_types::{CartItem, ChargeConfirmation, Order, OrderId, Receipt, ReceiptItem, Settlement},
    shop_api::errors::CheckoutApiError,
};

/// The storage contract for the payment reconciliation flow.
///
/// Two independent entry points (the synchronous verifier and the webhook receiver) race into this interface with
/// the same charge, possibly concurrently and possibly repeatedly. Correctness rests on two properties the
/// implementation must provide:
/// * `settle_new_order` is a single atomic transaction, so no partially-created order/receipt/cart state is ever
///   observable, and
/// * the orders table enforces a uniqueness constraint on the public order reference, so exactly one of any number
///   of concurrent settlement attempts can succeed. Losers must report the conflict (by returning `None`) rather
///   than surfacing an error.
#[allow(async_fn_in_trait)]
pub trait CheckoutDatabase: Clone {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Fetches the user's current cart lines joined with product pricing, for computing the charge amount at
    /// initiation time.
    async fn fetch_cart_for_checkout(&self, user_id: i64) -> Result<Vec<CartItem>, CheckoutApiError>;

    /// Returns the order for the given public reference, if one exists.
    async fn fetch_order_by_reference(&self, reference: &OrderId) -> Result<Option<Order>, CheckoutApiError>;

    /// Marks an existing, not-yet-settled order as completed: attaches the transaction id and the allow-listed
    /// confirmation payload, stamps `paid_at` and appends a tracking event. Single atomic transaction.
    async fn complete_pending_order(
        &self,
        order: &Order,
        confirmation: &ChargeConfirmation,
    ) -> Result<Order, CheckoutApiError>;

    /// Creates the order for a confirmed charge in one atomic transaction:
    /// * insert the order in `Completed` status with a line-item snapshot of the user's cart (price at time of
    ///   purchase),
    /// * insert the matching receipt with a denormalized item list,
    /// * delete the user's cart lines,
    /// * append an order-placed tracking event.
    ///
    /// An empty cart is not an error: the order is still created (with no items) so a confirmed charge is never
    /// silently dropped; implementations log the anomaly.
    ///
    /// Returns `Ok(None)` if a concurrent invocation inserted the order first (uniqueness-constraint conflict). The
    /// caller falls back to fetching the winner's order.
    async fn settle_new_order(&self, confirmation: &ChargeConfirmation)
        -> Result<Option<Settlement>, CheckoutApiError>;

    /// Fetches the receipt and its items for a settled order, if a receipt was created for it.
    async fn fetch_receipt_for_order(
        &self,
        reference: &OrderId,
    ) -> Result<Option<(Receipt, Vec<ReceiptItem>)>, CheckoutApiError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), CheckoutApiError> {
        Ok(())
    }
}
