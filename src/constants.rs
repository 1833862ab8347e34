use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Single storage key the serialized send-history record lives under.
pub const RATE_LIMIT_STORE_KEY: &str = "contact_send_history";

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
