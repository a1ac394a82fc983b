//! Domain layer - Core business logic and entities

pub mod access_key;
pub mod error;
pub mod issuance;

pub use access_key::{KeyRecord, KeyStore};
pub use error::DomainError;
pub use issuance::{Cooldown, IssuanceConfig, IssuancePolicy, PolicyState};
