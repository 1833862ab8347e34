use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

use crate::constants::DAY_MS;
use crate::limiter::RateLimitConfig;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub resend_api_key: String,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    #[serde(default)]
    pub mail_to: String,

    #[serde(default = "default_mail_timeout")]
    pub mail_timeout_secs: u64,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_max_sends")]
    pub rate_limit_max_sends: usize,

    #[serde(default = "default_window_days")]
    pub rate_limit_window_days: i64,

    #[serde(default = "default_store_dir")]
    pub store_dir: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Contact-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_mail_from() -> String {
    "Portfolio Contact <onboarding@resend.dev>".to_string()
}
fn default_mail_timeout() -> u64 {
    10
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_max_sends() -> usize {
    3
}
fn default_window_days() -> i64 {
    3
}
fn default_store_dir() -> String {
    "data".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name.to_string().to_lowercase())).required(false))
            .add_source(Environment::with_prefix("APP").separator("_").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Inject critical env values if missing
        config.resend_api_key = fill_or_env(config.resend_api_key, "APP_RESEND_API_KEY")?;
        config.mail_to = fill_or_env(config.mail_to, "APP_MAIL_TO")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.resend_api_key.trim().is_empty() {
            errors.push("RESEND_API_KEY cannot be empty");
        }
        if self.mail_to.trim().is_empty() {
            errors.push("MAIL_TO cannot be empty");
        }
        if self.rate_limit_max_sends == 0 {
            errors.push("RATE_LIMIT_MAX_SENDS must be at least 1");
        }
        if self.rate_limit_window_days < 1 {
            errors.push("RATE_LIMIT_WINDOW_DAYS must be at least 1");
        }
        if self.mail_timeout_secs == 0 {
            errors.push("MAIL_TIMEOUT_SECS must be at least 1");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_sends: self.rate_limit_max_sends,
            window_ms: self.rate_limit_window_days * DAY_MS,
        }
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("resend_api_key", &self.resend_api_key.redact())
            .field("mail_from", &self.mail_from)
            .field("mail_to", &self.mail_to)
            .field("mail_timeout_secs", &self.mail_timeout_secs)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("rate_limit_max_sends", &self.rate_limit_max_sends)
            .field("rate_limit_window_days", &self.rate_limit_window_days)
            .field("store_dir", &self.store_dir)
            .finish()
    }
}
