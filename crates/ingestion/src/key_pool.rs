//! Credential key pool with cooldown-based rotation
//!
//! Keys are tried in configured (insertion) order: selection returns the
//! first active key, so a healthy primary key is always preferred over later
//! keys. A key is deactivated only on quota/rate-limit signals and becomes
//! eligible again once its cooldown window elapses, with its error count
//! reset to zero.

use crate::{IngestionError, Result};
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;
use tracing::{info, warn};

struct KeyState {
    secret: String,
    is_active: bool,
    last_status_change: DateTime<Utc>,
    consecutive_errors: u32,
}

/// Point-in-time view of a key's state, for tests and diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStatus {
    pub is_active: bool,
    pub consecutive_errors: u32,
}

/// Pool of upstream API credential keys
pub struct KeyPool {
    keys: Mutex<Vec<KeyState>>,
    cooldown: Duration,
}

impl KeyPool {
    /// Create a pool from secrets in priority order
    ///
    /// # Arguments
    /// * `secrets` - Key values, tried first-to-last
    /// * `cooldown` - How long a deactivated key stays out of rotation
    pub fn new(secrets: Vec<String>, cooldown: std::time::Duration) -> Self {
        let now = Utc::now();
        let keys = secrets
            .into_iter()
            .map(|secret| KeyState {
                secret,
                is_active: true,
                last_status_change: now,
                consecutive_errors: 0,
            })
            .collect();

        Self {
            keys: Mutex::new(keys),
            cooldown: Duration::from_std(cooldown).unwrap_or_else(|_| Duration::hours(1)),
        }
    }

    /// Select the next usable key
    ///
    /// Reactivates any key whose cooldown has elapsed, then returns the first
    /// active key in insertion order.
    pub fn select_active_key(&self) -> Result<String> {
        self.select_active_key_at(Utc::now())
    }

    fn select_active_key_at(&self, now: DateTime<Utc>) -> Result<String> {
        let mut keys = self.keys.lock().expect("key pool lock poisoned");

        for key in keys.iter_mut() {
            if !key.is_active && now - key.last_status_change >= self.cooldown {
                key.is_active = true;
                key.consecutive_errors = 0;
                key.last_status_change = now;
                info!("API key reactivated after cooldown");
            }
        }

        keys.iter()
            .find(|k| k.is_active)
            .map(|k| k.secret.clone())
            .ok_or(IngestionError::NoActiveKeys)
    }

    /// Take a key out of rotation after a quota/rate-limit signal
    pub fn deactivate(&self, secret: &str, reason: &str) {
        self.deactivate_at(secret, reason, Utc::now());
    }

    fn deactivate_at(&self, secret: &str, reason: &str, now: DateTime<Utc>) {
        let mut keys = self.keys.lock().expect("key pool lock poisoned");

        if let Some(key) = keys.iter_mut().find(|k| k.secret == secret) {
            key.is_active = false;
            key.last_status_change = now;
            key.consecutive_errors += 1;
            warn!(
                reason,
                consecutive_errors = key.consecutive_errors,
                cooldown_secs = self.cooldown.num_seconds(),
                "API key deactivated"
            );
        }
    }

    /// Snapshot of every key's state, in insertion order
    pub fn statuses(&self) -> Vec<KeyStatus> {
        let keys = self.keys.lock().expect("key pool lock poisoned");
        keys.iter()
            .map(|k| KeyStatus {
                is_active: k.is_active,
                consecutive_errors: k.consecutive_errors,
            })
            .collect()
    }
}
