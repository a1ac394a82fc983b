//! Access key domain
//!
//! Key records, the key store abstraction, and key format validation.

mod entity;
mod repository;
mod validation;

pub use entity::{KeyRecord, MILLIS_PER_DAY};
pub use repository::{retain_unexpired, KeyStore};
pub use validation::{validate_key, KeyValidationError, KEY_ALPHABET};
