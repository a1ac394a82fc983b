//! Access key record entity

use serde::{Deserialize, Serialize};

/// Milliseconds in one day
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// An issued access key together with its expiration timestamp
///
/// Serialized as `{"key": "...", "expirationDate": <ms since epoch>}`, which is
/// both the persisted format and the issuance response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRecord {
    /// The key material
    pub key: String,
    /// Expiration time in milliseconds since the Unix epoch
    pub expiration_date: i64,
}

impl KeyRecord {
    /// Create a new key record
    pub fn new(key: impl Into<String>, expiration_date: i64) -> Self {
        Self {
            key: key.into(),
            expiration_date,
        }
    }

    /// A record is expired once `now` reaches its expiration date
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expiration_date <= now
    }
}
