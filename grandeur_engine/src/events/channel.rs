//! Stateless pub-sub plumbing for engine events.
//!
//! Components subscribe to engine events through hooks; each hook invocation runs as its own task, receives the
//! event by value and has no access to engine state. Handlers may be async, and a slow handler never blocks the
//! dispatch loop.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{sync::mpsc, task::JoinSet};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, listener) = mpsc::channel(buffer_size);
        Self { listener, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    /// Runs the dispatch loop until every producer has been dropped, then waits for the in-flight hook invocations
    /// to finish before returning.
    pub async fn start_handler(mut self) {
        debug!("📬️ Event handler running");
        // The handler holds a sender of its own for subscribe(). Drop it, so that the loop below ends as soon as the
        // last external producer goes away.
        drop(self.sender);
        let mut in_flight = JoinSet::new();
        while let Some(event) = self.listener.recv().await {
            trace!("📬️ Dispatching event");
            let handler = Arc::clone(&self.handler);
            in_flight.spawn(async move { (handler)(event).await });
        }
        debug!("📬️ All producers disconnected. Draining in-flight hooks.");
        while let Some(result) = in_flight.join_next().await {
            if let Err(e) = result {
                warn!("📬️ An event hook panicked: {e}");
            }
        }
        debug!("📬️ Event handler has shut down");
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    pub async fn publish_event(&self, event: E) {
        if self.sender.send(event).await.is_err() {
            error!("📬️ Event dropped: the handler is no longer running");
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn every_published_event_is_handled_before_shutdown() {
        let _ = env_logger::try_init();
        let seen = Arc::new(AtomicUsize::new(0));
        let tally = Arc::clone(&seen);
        let handler: Handler<usize> = Arc::new(move |weight| {
            let tally = Arc::clone(&tally);
            Box::pin(async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
                tally.fetch_add(weight, Ordering::SeqCst);
            })
        });
        let event_handler = EventHandler::new(4, handler);
        let odds = event_handler.subscribe();
        let evens = event_handler.subscribe();
        tokio::spawn(async move {
            for i in [1usize, 3, 5, 7, 9] {
                odds.publish_event(i).await;
            }
        });
        tokio::spawn(async move {
            for i in [2usize, 4, 6, 8, 10] {
                evens.publish_event(i).await;
            }
        });

        event_handler.start_handler().await;
        assert_eq!(seen.load(Ordering::SeqCst), 55, "all ten events must be processed before shutdown");
    }
}
