use crate::{
    constants::{DAY_MS, RATE_LIMIT_STORE_KEY},
    entities::rate_limit::{RateLimitDecision, SendHistory},
    errors::StorageError,
    store::KeyValueStore,
    utils::clock::Clock,
};

/// Sliding-window throttle: at most `max_sends` recorded sends per email
/// within the rolling `window_ms`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_sends: usize,
    pub window_ms: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig {
            max_sends: 3,
            window_ms: 3 * DAY_MS,
        }
    }
}

/// Per-email send throttle over a persisted timestamp record.
///
/// This is a UX throttle, not a security control: check and record are two
/// separate store round-trips, so concurrent processes sharing the record
/// can both pass a check before either records.
pub struct RateLimiter<S, C> {
    store: S,
    clock: C,
    config: RateLimitConfig,
}

impl<S, C> RateLimiter<S, C>
where
    S: KeyValueStore,
    C: Clock,
{
    pub fn new(store: S, clock: C, config: RateLimitConfig) -> Self {
        RateLimiter { store, clock, config }
    }

    /// Decides whether `email` may send right now. A missing or corrupt
    /// record counts as no history: the throttle fails open rather than
    /// ever blocking a visitor on a storage problem.
    pub fn check(&self, email: &str) -> RateLimitDecision {
        let key = normalize_key(email);
        let now = self.clock.now_ms();

        let history = self.load_history();
        let recent: Vec<i64> = history
            .get(&key)
            .map(|timestamps| {
                timestamps
                    .iter()
                    .copied()
                    .filter(|&t| now - t < self.config.window_ms)
                    .collect()
            })
            .unwrap_or_default();

        if recent.len() >= self.config.max_sends {
            let oldest = recent.iter().copied().min().unwrap_or(now);
            let remaining_ms = oldest + self.config.window_ms - now;
            let days_left = ((remaining_ms + DAY_MS - 1) / DAY_MS).max(1);
            RateLimitDecision::Limited { days_left }
        } else {
            RateLimitDecision::Allowed { recent }
        }
    }

    /// Records a confirmed send, appending now to the filtered list the
    /// preceding `check` returned. Appending to that snapshot rather than a
    /// fresh read keeps already-expired entries from resurrecting between
    /// the check and the write.
    pub fn record_send(&self, email: &str, recent: &[i64]) -> Result<(), StorageError> {
        let key = normalize_key(email);
        let now = self.clock.now_ms();

        let mut history = self.load_history();
        let mut timestamps = recent.to_vec();
        timestamps.push(now);
        history.insert(key, timestamps);

        let serialized =
            serde_json::to_string(&history).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.store.set(RATE_LIMIT_STORE_KEY, &serialized)
    }

    /// Health probe: can the backing store be read at all.
    pub fn store_reachable(&self) -> bool {
        self.store.get(RATE_LIMIT_STORE_KEY).is_ok()
    }

    fn load_history(&self) -> SendHistory {
        match self.store.get(RATE_LIMIT_STORE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Corrupt send-history record, treating as empty: {}", e);
                SendHistory::default()
            }),
            Ok(None) => SendHistory::default(),
            Err(e) => {
                tracing::warn!("Failed to read send-history record, treating as empty: {}", e);
                SendHistory::default()
            }
        }
    }
}

fn normalize_key(email: &str) -> String {
    email.trim().to_lowercase()
}
