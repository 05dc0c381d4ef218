use crate::db_types::{Order, Receipt};

/// Emitted exactly once per order settlement: when a confirmed charge is first reconciled into a completed order.
/// Idempotent replays of the same charge do not re-fire this event.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPaidEvent {
    pub order: Order,
    pub receipt: Option<Receipt>,
}

impl OrderPaidEvent {
    pub fn new(order: Order, receipt: Option<Receipt>) -> Self {
        Self { order, receipt }
    }
}

/// Emitted when a new account is registered, so that subscribers can send the verification mail.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRegisteredEvent {
    pub user: crate::db_types::User,
}
