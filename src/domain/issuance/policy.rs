//! Issuance policy
//!
//! Enforces a single process-wide cooldown between successful issuances and
//! produces new key records.

use serde::Deserialize;

use crate::domain::access_key::{KeyRecord, MILLIS_PER_DAY};
use crate::domain::DomainError;

use super::generator::KeyGenerator;

/// Issuance settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IssuanceConfig {
    /// Minimum time between successful issuances
    pub cooldown_period_ms: i64,
    /// How long an issued key stays valid
    pub validity_days: u32,
    /// Shortest generated key
    pub key_min_length: usize,
    /// Longest generated key
    pub key_max_length: usize,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            cooldown_period_ms: MILLIS_PER_DAY,
            validity_days: 1,
            key_min_length: 6,
            key_max_length: 8,
        }
    }
}

impl IssuanceConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.cooldown_period_ms < 0 {
            return Err(DomainError::configuration(
                "issuance.cooldown_period_ms cannot be negative",
            ));
        }

        if self.validity_days == 0 {
            return Err(DomainError::configuration(
                "issuance.validity_days must be at least 1",
            ));
        }

        if self.key_min_length == 0 {
            return Err(DomainError::configuration(
                "issuance.key_min_length must be at least 1",
            ));
        }

        if self.key_min_length > self.key_max_length {
            return Err(DomainError::configuration(format!(
                "issuance.key_min_length ({}) exceeds issuance.key_max_length ({})",
                self.key_min_length, self.key_max_length
            )));
        }

        Ok(())
    }

    /// Validity window in milliseconds
    pub fn validity_ms(&self) -> i64 {
        i64::from(self.validity_days).saturating_mul(MILLIS_PER_DAY)
    }
}

/// Issuance rejected because the cooldown window has not elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    /// Time left until the next issuance is allowed
    pub retry_after_ms: i64,
}

impl From<Cooldown> for DomainError {
    fn from(cooldown: Cooldown) -> Self {
        DomainError::cooldown(cooldown.retry_after_ms)
    }
}

/// Observable policy state at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyState {
    Ready,
    Cooling { remaining_ms: i64 },
}

/// Global-cooldown issuance policy
///
/// Not synchronized; callers that share it across tasks wrap it in a lock
/// together with the key store so check and update happen as one step.
#[derive(Debug, Clone)]
pub struct IssuancePolicy {
    config: IssuanceConfig,
    generator: KeyGenerator,
    last_issued_at: Option<i64>,
}

impl IssuancePolicy {
    /// Create a policy that has never issued; the first call always succeeds
    pub fn new(config: IssuanceConfig) -> Self {
        let generator = KeyGenerator::new(config.key_min_length, config.key_max_length);

        Self {
            config,
            generator,
            last_issued_at: None,
        }
    }

    /// Instant of the last successful issuance, `None` before the first one
    pub fn last_issued_at(&self) -> Option<i64> {
        self.last_issued_at
    }

    pub fn state(&self, now: i64) -> PolicyState {
        let Some(last_issued_at) = self.last_issued_at else {
            return PolicyState::Ready;
        };
        let elapsed = now.saturating_sub(last_issued_at);

        if elapsed < self.config.cooldown_period_ms {
            PolicyState::Cooling {
                remaining_ms: self.config.cooldown_period_ms - elapsed,
            }
        } else {
            PolicyState::Ready
        }
    }

    /// Fails with [`Cooldown`] while the cooldown window is open
    pub fn check(&self, now: i64) -> Result<(), Cooldown> {
        match self.state(now) {
            PolicyState::Ready => Ok(()),
            PolicyState::Cooling { remaining_ms } => Err(Cooldown {
                retry_after_ms: remaining_ms,
            }),
        }
    }

    /// Builds a new record issued at `now` without touching policy state
    pub fn prepare(&self, now: i64) -> KeyRecord {
        KeyRecord::new(
            self.generator.generate(),
            now.saturating_add(self.config.validity_ms()),
        )
    }

    /// Records a successful issuance at `now`
    pub fn mark_issued(&mut self, now: i64) {
        self.last_issued_at = Some(now);
    }

    /// Checks the cooldown and, if ready, issues a record and starts a new
    /// cooldown window
    pub fn try_issue(&mut self, now: i64) -> Result<KeyRecord, Cooldown> {
        self.check(now)?;

        let record = self.prepare(now);
        self.mark_issued(now);

        Ok(record)
    }
}

impl Default for IssuancePolicy {
    fn default() -> Self {
        Self::new(IssuanceConfig::default())
    }
}
