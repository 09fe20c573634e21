//! Handler types and dependencies

use std::sync::Arc;

use teloxide::types::User;

use crate::registration::Conversation;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub conversation: Arc<Conversation>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(conversation: Arc<Conversation>) -> Self {
        Self { conversation }
    }
}

/// Telegram user ids are `u64` on the wire; sessions and records key on `i64`.
pub(super) fn user_id_of(user: &User) -> Option<i64> {
    match i64::try_from(user.id.0) {
        Ok(id) => Some(id),
        Err(_) => {
            log::warn!("Telegram user id {} does not fit into i64, ignoring update", user.id.0);
            None
        }
    }
}
