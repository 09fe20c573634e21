//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod helpers;

#[allow(unused_imports)]
pub use fixtures::{FlakyStore, LateStore, MemoryStore, StallingStore};
#[allow(unused_imports)]
pub use helpers::{menu_actions, prompt_text, walk_to_confirm, walk_to_confirm_as, TestConversation};
