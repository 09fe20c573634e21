//! Telegram self-registration conversation
//!
//! - `regions`: static region → district directory
//! - `session`: per-user in-memory sessions with TTL eviction
//! - `engine`: the step-driven state machine
//! - `render`: prompt and menu builders
//! - `commit`: handing finished registrations to the data store

pub mod action;
pub mod commit;
pub mod engine;
pub mod regions;
pub mod render;
pub mod session;

pub use action::CallbackAction;
pub use commit::{Committer, NewRegistration, Registration, RegistrationStore};
pub use engine::{Conversation, Input, Reply};
pub use regions::{District, Region};
pub use render::{Menu, MenuButton, Prompt};
pub use session::{Clock, ManualClock, Session, SessionStore, Step, SystemClock};
