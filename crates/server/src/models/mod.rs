//! Domain models backing the subscription ledger.

pub mod drop;
pub mod store;
pub mod subscription;

pub use drop::ProductDrop;
pub use store::Store;
pub use subscription::Subscription;
