use parking_lot::Mutex;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        contact::{ContactForm, ContactResponse},
        rate_limit::{RateLimitDecision, SubmissionState},
    },
    errors::AppError,
    limiter::RateLimiter,
    mailer::Mailer,
    store::KeyValueStore,
    utils::clock::Clock,
};

/// Drives one contact submission end to end: completeness check, field
/// validation, rate-limit check, the single outbound send, and the
/// record-on-success step.
pub struct ContactHandler<S, C, M>
where
    S: KeyValueStore,
    C: Clock,
    M: Mailer,
{
    limiter: RateLimiter<S, C>,
    mailer: M,
    state: Mutex<SubmissionState>,
}

impl<S, C, M> ContactHandler<S, C, M>
where
    S: KeyValueStore,
    C: Clock,
    M: Mailer,
{
    pub fn new(limiter: RateLimiter<S, C>, mailer: M) -> Self {
        ContactHandler {
            limiter,
            mailer,
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    /// Handles one submit action. At most one send is in flight per
    /// handler: a submit arriving while another is pending is rejected
    /// before any validation or storage access. Fields are cleared only on
    /// a confirmed successful send; every failure path leaves them intact
    /// so the visitor can retry without retyping.
    pub async fn submit(&self, form: &mut ContactForm) -> Result<ContactResponse, AppError> {
        // Guard, validation, and the rate-limit check all happen under the
        // state lock, before the first await. The lock is released while
        // the send is in flight.
        let recent = {
            let mut state = self.state.lock();
            if *state == SubmissionState::Submitting {
                return Err(AppError::SubmissionInFlight);
            }

            form.ensure_complete()?;
            form.validate()?;

            match self.limiter.check(&form.email) {
                RateLimitDecision::Limited { days_left } => {
                    return Err(AppError::RateLimited { days_left });
                }
                RateLimitDecision::Allowed { recent } => {
                    *state = SubmissionState::Submitting;
                    recent
                }
            }
        };

        let sent = self.mailer.send(form).await;

        let result = match sent {
            Ok(()) => {
                // Best-effort: a failed write must not turn a delivered
                // message into a user-facing error.
                if let Err(e) = self.limiter.record_send(&form.email, &recent) {
                    tracing::warn!("Could not persist send history: {}", e);
                }
                let id = Uuid::new_v4();
                tracing::info!("Contact message {} relayed successfully", id);
                form.clear();
                Ok(ContactResponse::sent(id))
            }
            Err(crate::errors::MailError::Transport(msg)) => {
                tracing::error!("Contact send failed in transit: {}", msg);
                Err(AppError::TransportError(msg))
            }
            Err(crate::errors::MailError::Rejected(msg)) => {
                tracing::error!("Contact send rejected by provider: {}", msg);
                Err(AppError::ServerRejected(msg))
            }
        };

        *self.state.lock() = SubmissionState::Idle;
        result
    }

    pub fn store_reachable(&self) -> bool {
        self.limiter.store_reachable()
    }
}
