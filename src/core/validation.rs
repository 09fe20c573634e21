//! Input validation for the registration conversation
//!
//! Each parser accepts the raw text a user typed and either returns the
//! normalized value to store in the session or a [`ValidationError`]
//! explaining why it was rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Minimum number of characters in a full name (after trimming)
pub const MIN_NAME_CHARS: usize = 2;

/// Longest accepted full name, in characters
pub const MAX_NAME_CHARS: usize = 64;

/// Youngest accepted age
pub const MIN_AGE: u8 = 10;

/// Oldest accepted age
pub const MAX_AGE: u8 = 120;

/// Uzbekistan numbers: optional `+`, country code 998, then 9 ASCII digits.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?998[0-9]{9}$").expect("phone regex is valid"));

/// `@handle` or a `t.me` link. Telegram usernames are ASCII, at most 32 chars.
static CHANNEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(@[A-Za-z0-9_]{1,32}|https?://t\.me/[A-Za-z0-9_]{1,32})$").expect("channel regex is valid")
});

/// Validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must be at least {min} characters long", min = MIN_NAME_CHARS)]
    NameTooShort,

    #[error("name must be at most {max} characters long", max = MAX_NAME_CHARS)]
    NameTooLong,

    #[error("age is not a whole number: {0:?}")]
    AgeNotNumber(String),

    #[error("age {0} is outside {min}..={max}", min = MIN_AGE, max = MAX_AGE)]
    AgeOutOfRange(i64),

    #[error("invalid phone number: {0:?}")]
    InvalidPhone(String),

    #[error("invalid channel: {0:?}")]
    InvalidChannel(String),

    /// A committed registration needs every field of the session
    #[error("registration is incomplete: missing {0}")]
    Incomplete(&'static str),
}

/// Validates a full name.
///
/// # Examples
/// ```
/// use markaz::core::validation::parse_name;
///
/// assert_eq!(parse_name("  Ali Valiyev ").unwrap(), "Ali Valiyev");
/// assert!(parse_name("A").is_err());
/// ```
pub fn parse_name(text: &str) -> Result<String, ValidationError> {
    let name = text.trim();
    let chars = name.chars().count();
    if chars < MIN_NAME_CHARS {
        return Err(ValidationError::NameTooShort);
    }
    if chars > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong);
    }
    Ok(name.to_string())
}

/// Parses an age, accepting whole numbers in `MIN_AGE..=MAX_AGE`.
///
/// # Examples
/// ```
/// use markaz::core::validation::parse_age;
///
/// assert_eq!(parse_age("25").unwrap(), 25);
/// assert!(parse_age("9").is_err());
/// assert!(parse_age("abc").is_err());
/// ```
pub fn parse_age(text: &str) -> Result<u8, ValidationError> {
    let trimmed = text.trim();
    let age: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::AgeNotNumber(trimmed.to_string()))?;

    if !(i64::from(MIN_AGE)..=i64::from(MAX_AGE)).contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }

    u8::try_from(age).map_err(|_| ValidationError::AgeOutOfRange(age))
}

/// Validates a phone number and returns it as `+998XXXXXXXXX`.
///
/// Whitespace, hyphens and parentheses are stripped before matching.
///
/// # Examples
/// ```
/// use markaz::core::validation::normalize_phone;
///
/// assert_eq!(normalize_phone("+998 (90) 123-45-67").unwrap(), "+998901234567");
/// assert!(normalize_phone("+7 900 123 45 67").is_err());
/// ```
pub fn normalize_phone(text: &str) -> Result<String, ValidationError> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    if !PHONE_RE.is_match(&compact) {
        return Err(ValidationError::InvalidPhone(text.trim().to_string()));
    }

    let digits = compact.trim_start_matches('+');
    Ok(format!("+{}", digits))
}

/// Validates a channel reference: `@name` or `https://t.me/name`.
pub fn parse_channel(text: &str) -> Result<String, ValidationError> {
    let channel = text.trim();
    if !CHANNEL_RE.is_match(channel) {
        return Err(ValidationError::InvalidChannel(channel.to_string()));
    }
    Ok(channel.to_string())
}
