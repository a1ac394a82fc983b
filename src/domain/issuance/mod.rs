//! Issuance domain
//!
//! Cooldown policy and key generation.

mod generator;
mod policy;

pub use generator::{generate_key, KeyGenerator};
pub use policy::{Cooldown, IssuanceConfig, IssuancePolicy, PolicyState};
