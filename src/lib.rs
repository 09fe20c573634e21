//! markaz - Telegram self-registration bot for an education center CRM
//!
//! This library provides the registration conversation engine, its SQLite
//! storage and the Telegram transport that drives it.

pub mod cli;
pub mod core;
pub mod registration;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{AppError, AppResult};
pub use registration::{Conversation, Input, Reply};
