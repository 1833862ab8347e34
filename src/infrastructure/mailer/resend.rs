use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::{
    entities::contact::ContactForm,
    errors::MailError,
    settings::AppConfig,
    utils::sanitize::sanitize,
};

use super::Mailer;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    reply_to: String,
    subject: String,
    html: String,
}

#[derive(Deserialize)]
struct ResendErrorBody {
    message: String,
}

/// HTTP client for the Resend email API. Relays a contact form as a styled
/// notification email to the configured inbox.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: Zeroizing<String>,
    from: String,
    to: String,
}

impl ResendMailer {
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.mail_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        ResendMailer {
            client,
            api_key: Zeroizing::new(config.resend_api_key.clone()),
            from: config.mail_from.clone(),
            to: config.mail_to.clone(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, form: &ContactForm) -> Result<(), MailError> {
        let payload = SendEmailRequest {
            from: &self.from,
            to: [self.to.as_str()],
            reply_to: sanitize(&form.email),
            subject: format!("[Portfolio] {}", sanitize(&form.subject)),
            html: render_email_html(form),
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(self.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response
                .json::<ResendErrorBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| {
                    "Failed to send email. Please try again later.".to_string()
                });
            tracing::error!("Resend rejected the send ({}): {}", status, message);
            Err(MailError::Rejected(message))
        }
    }
}

fn render_email_html(form: &ContactForm) -> String {
    format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 24px; background: #0f0f0f; color: #ffffff; border-radius: 8px;">
  <h2 style="color: #00ffff; margin-top: 0;">Contact Form Submission</h2>
  <table style="width: 100%; border-collapse: collapse;">
    <tr>
      <td style="padding: 8px 0; color: #9ca3af; width: 80px;">Name</td>
      <td style="padding: 8px 0; font-weight: 600;">{name}</td>
    </tr>
    <tr>
      <td style="padding: 8px 0; color: #9ca3af;">Email</td>
      <td style="padding: 8px 0;">{email}</td>
    </tr>
    <tr>
      <td style="padding: 8px 0; color: #9ca3af;">Subject</td>
      <td style="padding: 8px 0;">{subject}</td>
    </tr>
  </table>
  <hr style="border: none; border-top: 1px solid #374151; margin: 16px 0;" />
  <p style="color: #9ca3af; margin-bottom: 8px;">Message:</p>
  <p style="background: #1f2937; padding: 16px; border-radius: 6px; white-space: pre-wrap; margin: 0;">{message}</p>
  <p style="color: #6b7280; font-size: 12px; margin-top: 24px; margin-bottom: 0;">
    Sent from your portfolio contact form
  </p>
</div>"#,
        name = sanitize(&form.name),
        email = sanitize(&form.email),
        subject = sanitize(&form.subject),
        message = sanitize(&form.message),
    )
}
