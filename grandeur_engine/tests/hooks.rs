//! The order-paid hook must fire exactly once per settlement, no matter how many times the confirmation is
//! delivered.
use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicI32, Ordering},
        Arc,
    },
};

use grandeur_common::Naira;
use grandeur_engine::{
    db_types::OrderId,
    events::{EventHandlers, EventHooks},
    CheckoutApi,
};
use log::*;
use tokio::runtime::Runtime;

mod support;

use support::{add_line, confirmation_for, new_test_db, seed_catalog, seed_user, tear_down};

#[derive(Default, Clone)]
struct HookCalled {
    called: Arc<AtomicI32>,
}

impl HookCalled {
    pub fn called(&self) {
        let _ = self.called.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> i32 {
        self.called.load(Ordering::Relaxed)
    }
}

#[test]
fn on_order_paid_fires_once_for_duplicate_deliveries() {
    let rt = Runtime::new().unwrap();
    let event = HookCalled::default();
    let event_copy = event.clone();
    rt.block_on(async move {
        let db = new_test_db().await;
        let user = seed_user(&db, "efe@example.com").await;
        let (shirt, _) = seed_catalog(&db).await;
        add_line(&db, &user, &shirt, 2).await;

        let mut hooks = EventHooks::default();
        hooks.on_order_paid(move |event| {
            info!("🪝️ Order {} paid", event.order.order_id);
            event_copy.called();
            Box::pin(async {}) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
        let handlers = EventHandlers::new(8, hooks);
        let api = CheckoutApi::new(db.clone(), handlers.producers());

        let reference = OrderId::random();
        let confirmation = confirmation_for(&reference, "821000321", user.id, Naira::from_naira(10_000));
        let _ = api.reconcile_confirmed_charge(confirmation.clone()).await.expect("Error reconciling");
        let _ = api.reconcile_confirmed_charge(confirmation).await.expect("Error reconciling replay");

        // Dropping the api drops the producers, which lets the handler drain and shut down.
        drop(api);
        if let Some(handler) = handlers.on_order_paid {
            handler.start_handler().await;
        }
        tear_down(db).await;
    });
    assert_eq!(event.count(), 1);
    info!("🪝️ test complete");
}
