//! Orchestration services over the ledger and notifier seams.

pub mod fanout;
pub mod subscriptions;

pub use fanout::{FanoutError, FanoutReport, FanoutService};
pub use subscriptions::{Sender, ServiceError, SubscriptionService};
