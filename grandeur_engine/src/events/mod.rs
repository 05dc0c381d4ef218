//! Engine events and the pub-sub plumbing that delivers them.
//!
//! The server installs hooks at startup via [`EventHooks`]; the engine's APIs publish events through the producers
//! in [`EventProducers`]. See [`OrderPaidEvent`] for the exactly-once guarantee around order settlement.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::{OrderPaidEvent, UserRegisteredEvent};
pub use hooks::{EventHandlers, EventHooks, EventProducers};
