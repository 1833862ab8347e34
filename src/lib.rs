mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, routes};
pub use infrastructure::{limiter, mailer, store, utils};

use limiter::RateLimiter;
use mailer::ResendMailer;
use store::JsonFileStore;
use use_cases::contact::ContactHandler;
use utils::clock::SystemClock;

pub type AppContactHandler = ContactHandler<JsonFileStore, SystemClock, ResendMailer>;

pub struct AppState {
    pub contact_handler: AppContactHandler,
}

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Self {
        let store = JsonFileStore::new(config.store_dir.clone());
        let limiter = RateLimiter::new(store, SystemClock, config.rate_limit());
        let mailer = ResendMailer::new(config);

        AppState {
            contact_handler: ContactHandler::new(limiter, mailer),
        }
    }
}
