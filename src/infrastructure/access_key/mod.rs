//! Access key infrastructure
//!
//! Issuance service and the background eviction sweeper.

mod service;
mod sweeper;

pub use service::{now_millis, AccessKeyService};
pub use sweeper::{EvictionSweeper, SweeperHandle};
