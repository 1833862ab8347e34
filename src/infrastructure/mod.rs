pub mod limiter;
pub mod mailer;
pub mod store;
pub mod utils;
