use std::fmt::Debug;

use grandeur_common::Naira;
use log::*;

use crate::{
    db_types::{CartItem, ChargeConfirmation, Order, OrderStatusType, Settlement},
    events::{EventProducers, OrderPaidEvent},
    shop_api::errors::CheckoutApiError,
    traits::CheckoutDatabase,
};

/// `CheckoutApi` owns the payment reconciliation flow: converting a gateway-confirmed charge into exactly one local
/// order, one receipt and one cart clearing, no matter how many times, in what order, or how concurrently the
/// synchronous verifier and the webhook receiver deliver that confirmation.
pub struct CheckoutApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for CheckoutApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi")
    }
}

impl<B> CheckoutApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> CheckoutApi<B>
where B: CheckoutDatabase
{
    /// Reads the user's cart and computes the charge amount for payment initiation. The price used is the catalog
    /// price at this moment; the figure is advisory only, since reconciliation later trusts the gateway-confirmed
    /// amount instead.
    ///
    /// Fails when the cart is empty or the computed total is not positive; initiation must not proceed in either
    /// case.
    pub async fn cart_for_checkout(&self, user_id: i64) -> Result<(Vec<CartItem>, Naira), CheckoutApiError> {
        let items = self.db.fetch_cart_for_checkout(user_id).await?;
        if items.is_empty() {
            return Err(CheckoutApiError::CartIsEmpty(user_id));
        }
        let total: Naira = items.iter().map(CartItem::line_total).sum();
        if !total.is_positive() {
            return Err(CheckoutApiError::InvalidCartTotal);
        }
        trace!("🔄️ Cart for user {user_id} has {} line(s) totalling {total}", items.len());
        Ok((items, total))
    }

    /// The reconciliation engine (shared idempotent core).
    ///
    /// Called with a charge the gateway has confirmed as successful, from either the synchronous verifier or the
    /// webhook receiver. Guarantees exactly-once order creation per reference:
    ///
    /// 1. If an order already exists for the reference it is returned unchanged when settled, or completed in place
    ///    when it is not.
    /// 2. Otherwise the order, its line-item snapshot, the receipt and the cart clearing are created in one atomic
    ///    transaction.
    /// 3. If two invocations race past step 1 together, the uniqueness constraint on the reference rejects the
    ///    second insert; the loser rolls back and returns the winner's order via step 1's found branch.
    ///
    /// The order-paid hook fires exactly once per order, on the invocation that performed the settlement.
    pub async fn reconcile_confirmed_charge(
        &self,
        confirmation: ChargeConfirmation,
    ) -> Result<Settlement, CheckoutApiError> {
        trace!(
            "🔄️ Reconciling transaction {} against reference {}",
            confirmation.transaction_id,
            confirmation.reference
        );
        if let Some(existing) = self.db.fetch_order_by_reference(&confirmation.reference).await? {
            return self.settle_existing(existing, &confirmation).await;
        }
        match self.db.settle_new_order(&confirmation).await? {
            Some(settlement) => {
                info!(
                    "🔄️ Order {} settled: {} paid by user {} (transaction {})",
                    settlement.order.order_id,
                    settlement.order.total_price,
                    confirmation.user_id,
                    confirmation.transaction_id
                );
                self.call_order_paid_hook(&settlement).await;
                Ok(settlement)
            },
            None => {
                // Lost the insert race. The winner's order is committed, so the lookup cannot miss.
                let existing = self
                    .db
                    .fetch_order_by_reference(&confirmation.reference)
                    .await?
                    .ok_or_else(|| CheckoutApiError::OrderShouldExist(confirmation.reference.clone()))?;
                self.settle_existing(existing, &confirmation).await
            },
        }
    }

    async fn settle_existing(
        &self,
        order: Order,
        confirmation: &ChargeConfirmation,
    ) -> Result<Settlement, CheckoutApiError> {
        if order.status.is_settled() {
            debug!("🔄️ Order {} is already settled. Returning it unchanged (idempotent replay).", order.order_id);
            let (receipt, receipt_items) = self.receipt_for(&order).await?;
            return Ok(Settlement { order, receipt, receipt_items, newly_settled: false });
        }
        if order.status == OrderStatusType::Cancelled {
            warn!(
                "🔄️ Payment {} arrived for cancelled order {}. Completing the order; flagging for manual review.",
                confirmation.transaction_id, order.order_id
            );
        }
        let updated = self.db.complete_pending_order(&order, confirmation).await?;
        let (receipt, receipt_items) = self.receipt_for(&updated).await?;
        let settlement = Settlement { order: updated, receipt, receipt_items, newly_settled: true };
        self.call_order_paid_hook(&settlement).await;
        Ok(settlement)
    }

    async fn receipt_for(
        &self,
        order: &Order,
    ) -> Result<(Option<crate::db_types::Receipt>, Vec<crate::db_types::ReceiptItem>), CheckoutApiError> {
        let receipt = self.db.fetch_receipt_for_order(&order.order_id).await?;
        Ok(match receipt {
            Some((receipt, items)) => (Some(receipt), items),
            None => (None, Vec::new()),
        })
    }

    async fn call_order_paid_hook(&self, settlement: &Settlement) {
        if !settlement.newly_settled {
            return;
        }
        for emitter in &self.producers.order_paid_producer {
            debug!("🔄️ Notifying order paid hook subscribers for {}", settlement.order.order_id);
            let event = OrderPaidEvent::new(settlement.order.clone(), settlement.receipt.clone());
            emitter.publish_event(event).await;
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}
