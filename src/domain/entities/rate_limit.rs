use std::collections::HashMap;

/// Persisted shape of the rate-limit record: normalized email key to the
/// epoch-millisecond timestamps of its recorded sends, in insertion order.
pub type SendHistory = HashMap<String, Vec<i64>>;

/// Result of a rate-limit check. `Allowed` threads the filtered in-window
/// timestamps through to the record step so check-then-record sees one
/// consistent snapshot of the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { recent: Vec<i64> },
    Limited { days_left: i64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }
}

/// The only held states of the submission machine. Success and failure are
/// instantaneous transitions back to `Idle` plus an outcome value, never
/// states the controller blocks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}
