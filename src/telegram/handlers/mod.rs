//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the Telegram bot.
//! Handlers only translate updates into engine inputs and engine replies
//! into Bot API calls; the conversation itself lives in `registration`.

mod commands;
mod reply;
mod schema;
mod types;

pub use reply::{keyboard, reply_to_callback, reply_to_message};
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
