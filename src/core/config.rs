use once_cell::sync::Lazy;
use secrecy::SecretString;
use std::env;
use std::time::Duration;

use crate::core::error::{AppError, AppResult};

/// Environment variables checked for the bot token, in priority order.
/// `TELEGRAM_BOT_TOKEN` is the primary name; the other two are what
/// teloxide tooling conventionally reads.
pub const TOKEN_VARS: [&str; 3] = ["TELEGRAM_BOT_TOKEN", "BOT_TOKEN", "TELOXIDE_TOKEN"];

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: markaz.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "markaz.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: markaz.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "markaz.log".to_string()));

/// Custom Bot API server (e.g. a local telegram-bot-api instance)
/// Read from BOT_API_URL environment variable
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| {
    env::var("BOT_API_URL").ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
});

/// Reads the bot token from the process environment.
///
/// # Returns
/// * `Ok(SecretString)` - first non-empty value among [`TOKEN_VARS`]
/// * `Err(AppError::MissingConfig)` - none of them is set; the bot must not start
pub fn bot_token() -> AppResult<SecretString> {
    token_from(|name| env::var(name).ok())
}

fn token_from(lookup: impl Fn(&str) -> Option<String>) -> AppResult<SecretString> {
    TOKEN_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| AppError::MissingConfig(format!("{} is not defined", TOKEN_VARS[0])))
}

/// Conversation session configuration
pub mod session {
    use super::Duration;
    use once_cell::sync::Lazy;
    use std::env;

    /// Default idle time after which an unfinished conversation is dropped
    pub const DEFAULT_TTL_SECS: u64 = 60 * 60; // 1 hour

    /// Interval between sweeps of expired sessions (in seconds)
    pub const SWEEP_INTERVAL_SECS: u64 = 5 * 60;

    /// Session TTL in seconds
    /// Read from SESSION_TTL_SECS environment variable
    pub static TTL_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TTL_SECS)
    });

    /// Session TTL duration
    pub fn ttl() -> Duration {
        Duration::from_secs(*TTL_SECS)
    }

    /// Sweep interval duration
    pub fn sweep_interval() -> Duration {
        Duration::from_secs(SWEEP_INTERVAL_SECS)
    }
}

/// Registration commit configuration
pub mod commit {
    use super::Duration;

    /// Upper bound for a single create-registration call (in seconds)
    pub const TIMEOUT_SECS: u64 = 10;

    /// Commit timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Must stay above the long-polling timeout teloxide uses.
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}
