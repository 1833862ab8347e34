
use std::{sync::atomic::Ordering, sync::Arc, time::Duration};

use mockall::mock;
use portfolio_contact_api::{
    constants::RATE_LIMIT_STORE_KEY,
    entities::{contact::ContactForm, rate_limit::SendHistory},
    errors::{AppError, MailError},
    limiter::{RateLimitConfig, RateLimiter},
    mailer::Mailer,
    use_cases::contact::ContactHandler,
};
use test_utils::{sample_form, seeded_history, BlockingMailer, ManualClock, MemoryStore};

const NOW: i64 = 1_700_000_000_000;
const HOUR_MS: i64 = 60 * 60 * 1000;

mock! {
    pub ProviderMailer {}

    #[async_trait::async_trait]
    impl Mailer for ProviderMailer {
        async fn send(&self, form: &ContactForm) -> Result<(), MailError>;
    }
}

fn handler_with<M: Mailer>(
    store: MemoryStore,
    mailer: M,
) -> ContactHandler<MemoryStore, ManualClock, M> {
    let limiter = RateLimiter::new(store, ManualClock::new(NOW), RateLimitConfig::default());
    ContactHandler::new(limiter, mailer)
}

fn stored_history(store: &MemoryStore) -> Option<SendHistory> {
    store
        .raw(RATE_LIMIT_STORE_KEY)
        .map(|raw| serde_json::from_str(&raw).expect("record not valid JSON"))
}

#[tokio::test]
async fn successful_submission_records_one_send_and_clears_the_form() {
    let store = MemoryStore::new();
    let mut mailer = MockProviderMailer::new();
    mailer
        .expect_send()
        .withf(|form: &ContactForm| form.email == "x@y.com")
        .times(1)
        .returning(|_| Ok(()));
    let handler = handler_with(store.clone(), mailer);

    let mut form = sample_form();
    let response = handler.submit(&mut form).await.expect("submit failed");

    assert!(response.success);
    assert_eq!(response.message, "Message sent successfully!");

    assert_eq!(form.name, "");
    assert_eq!(form.email, "");
    assert_eq!(form.subject, "");
    assert_eq!(form.message, "");

    let history = stored_history(&store).expect("no record written");
    assert_eq!(history["x@y.com"], vec![NOW]);
}

#[tokio::test]
async fn transport_failure_leaves_history_and_form_untouched() {
    let store = MemoryStore::new();
    let seeded = seeded_history("x@y.com", &[NOW - HOUR_MS]);
    store.seed(RATE_LIMIT_STORE_KEY, &seeded);

    let mut mailer = MockProviderMailer::new();
    mailer
        .expect_send()
        .times(1)
        .returning(|_| Err(MailError::Transport("connection refused".to_string())));
    let handler = handler_with(store.clone(), mailer);

    let mut form = sample_form();
    let result = handler.submit(&mut form).await;

    assert!(matches!(result, Err(AppError::TransportError(_))));
    assert_eq!(form.email, "x@y.com");
    assert_eq!(store.raw(RATE_LIMIT_STORE_KEY), Some(seeded));
}

#[tokio::test]
async fn provider_rejection_surfaces_the_provider_message() {
    let store = MemoryStore::new();
    let mut mailer = MockProviderMailer::new();
    mailer
        .expect_send()
        .times(1)
        .returning(|_| Err(MailError::Rejected("Invalid `to` address".to_string())));
    let handler = handler_with(store.clone(), mailer);

    let result = handler.submit(&mut sample_form()).await;

    match result {
        Err(AppError::ServerRejected(msg)) => assert_eq!(msg, "Invalid `to` address"),
        other => panic!("expected ServerRejected, got {:?}", other),
    }
    assert!(stored_history(&store).is_none());
}

#[tokio::test]
async fn blank_field_means_no_send_and_no_storage_access() {
    let store = MemoryStore::new();
    let mut mailer = MockProviderMailer::new();
    mailer.expect_send().times(0);
    let handler = handler_with(store.clone(), mailer);

    let mut form = sample_form();
    form.message = "   ".to_string();
    let result = handler.submit(&mut form).await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(store.read_count(), 0);
    assert_eq!(store.write_count(), 0);
    assert_eq!(form.name, "Ada Lovelace");
}

#[tokio::test]
async fn invalid_email_shape_is_rejected_before_any_send() {
    let mut mailer = MockProviderMailer::new();
    mailer.expect_send().times(0);
    let handler = handler_with(MemoryStore::new(), mailer);

    let mut form = sample_form();
    form.email = "not-an-email".to_string();

    let result = handler.submit(&mut form).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn over_length_message_is_rejected_before_any_send() {
    let mut mailer = MockProviderMailer::new();
    mailer.expect_send().times(0);
    let handler = handler_with(MemoryStore::new(), mailer);

    let mut form = sample_form();
    form.message = "a".repeat(5001);

    let result = handler.submit(&mut form).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn throttled_email_gets_no_network_call() {
    let store = MemoryStore::new();
    store.seed(
        RATE_LIMIT_STORE_KEY,
        &seeded_history("x@y.com", &[NOW - 3 * HOUR_MS, NOW - 2 * HOUR_MS, NOW - HOUR_MS]),
    );
    let mut mailer = MockProviderMailer::new();
    mailer.expect_send().times(0);
    let handler = handler_with(store, mailer);

    let result = handler.submit(&mut sample_form()).await;

    match result {
        Err(AppError::RateLimited { days_left }) => assert_eq!(days_left, 3),
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn second_submit_while_pending_is_a_no_op() {
    let mailer = Arc::new(BlockingMailer::default());
    let handler = Arc::new(handler_with(MemoryStore::new(), mailer.clone()));

    let first = {
        let handler = handler.clone();
        tokio::spawn(async move {
            let mut form = sample_form();
            handler.submit(&mut form).await
        })
    };

    // Wait until the first submission is parked inside the mailer.
    for _ in 0..200 {
        if mailer.calls.load(Ordering::SeqCst) == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 1);

    let second = handler.submit(&mut sample_form()).await;
    assert!(matches!(second, Err(AppError::SubmissionInFlight)));

    mailer.release.notify_one();
    let first = first.await.expect("task panicked");
    assert!(first.is_ok());

    assert_eq!(mailer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn handler_returns_to_idle_after_a_failure() {
    let mut mailer = MockProviderMailer::new();
    let mut seq = mockall::Sequence::new();
    mailer
        .expect_send()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(MailError::Transport("offline".to_string())));
    mailer
        .expect_send()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    let handler = handler_with(MemoryStore::new(), mailer);

    assert!(handler.submit(&mut sample_form()).await.is_err());
    assert!(handler.submit(&mut sample_form()).await.is_ok());
}

#[tokio::test]
async fn storage_write_failure_does_not_fail_the_submission() {
    let store = MemoryStore::new();
    store.fail_writes(true);
    let mut mailer = MockProviderMailer::new();
    mailer.expect_send().times(1).returning(|_| Ok(()));
    let handler = handler_with(store, mailer);

    let mut form = sample_form();
    let result = handler.submit(&mut form).await;

    assert!(result.is_ok());
    assert_eq!(form.message, "");
}
