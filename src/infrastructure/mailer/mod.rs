mod resend;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{entities::contact::ContactForm, errors::MailError};

pub use resend::ResendMailer;

/// Outbound email provider boundary. The submission flow only ever sees
/// this trait, so tests substitute a mock and never touch the network.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, form: &ContactForm) -> Result<(), MailError>;
}

#[async_trait]
impl<M: Mailer + ?Sized> Mailer for Arc<M> {
    async fn send(&self, form: &ContactForm) -> Result<(), MailError> {
        (**self).send(form).await
    }
}
