//! Per-user conversation sessions
//!
//! Sessions live only in memory. Every access touches the entry; entries
//! idle for longer than the store's TTL are treated as absent and removed
//! by [`SessionStore::evict_expired`], which the bot runs periodically.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use strum::{Display, EnumIter};

use super::regions::{District, Region};

/// Source of the current time for TTL bookkeeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used by tests.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        self.origin + offset
    }
}

/// Position in the registration conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    /// Session exists, registration not started yet
    #[default]
    Idle,
    Name,
    Age,
    Phone,
    Region,
    District,
    Channels,
    AddingChannel,
    Confirm,
}

/// Answers collected so far for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub step: Step,
    pub name: Option<String>,
    pub age: Option<u8>,
    pub phone: Option<String>,
    pub region: Option<Region>,
    pub district: Option<District>,
    pub channels: Vec<String>,
}

impl Session {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            step: Step::Idle,
            name: None,
            age: None,
            phone: None,
            region: None,
            district: None,
            channels: Vec::new(),
        }
    }
}

struct Entry {
    session: Session,
    touched_at: Instant,
}

/// Process-wide session registry keyed by Telegram user id.
///
/// All methods work on owned snapshots, so no shard guard outlives a call.
pub struct SessionStore {
    entries: DashMap<i64, Entry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Returns the user's session, creating an idle one if absent or expired.
    pub fn get(&self, user_id: i64) -> Session {
        let now = self.clock.now();
        let mut entry = self.entries.entry(user_id).or_insert_with(|| Entry {
            session: Session::new(user_id),
            touched_at: now,
        });

        if now.duration_since(entry.touched_at) > self.ttl {
            log::debug!("Session of user {} expired at step {}, starting over", user_id, entry.session.step);
            entry.session = Session::new(user_id);
        }
        entry.touched_at = now;
        entry.session.clone()
    }

    /// Returns the live session without creating or touching it.
    pub fn peek(&self, user_id: i64) -> Option<Session> {
        let now = self.clock.now();
        self.entries
            .get(&user_id)
            .filter(|entry| now.duration_since(entry.touched_at) <= self.ttl)
            .map(|entry| entry.session.clone())
    }

    /// Stores a session snapshot.
    pub fn put(&self, session: Session) {
        let touched_at = self.clock.now();
        self.entries.insert(session.user_id, Entry { session, touched_at });
    }

    /// Replaces whatever the user had with a fresh idle session.
    pub fn reset(&self, user_id: i64) -> Session {
        let session = Session::new(user_id);
        self.put(session.clone());
        session
    }

    /// Removes the user's session. No-op if absent.
    pub fn clear(&self, user_id: i64) {
        self.entries.remove(&user_id);
    }

    pub fn contains(&self, user_id: i64) -> bool {
        self.peek(user_id).is_some()
    }

    /// Drops every session idle for longer than the TTL.
    ///
    /// # Returns
    /// Number of sessions removed
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.touched_at) <= self.ttl);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const TTL: Duration = Duration::from_secs(60);

    fn store() -> (Arc<ManualClock>, SessionStore) {
        let clock = Arc::new(ManualClock::new());
        let store = SessionStore::new(TTL, clock.clone());
        (clock, store)
    }

    #[test]
    fn test_get_creates_idle_session() {
        let (_, store) = store();
        assert!(store.is_empty());

        let session = store.get(42);
        assert_eq!(session, Session::new(42));
        assert_eq!(session.step, Step::Idle);
        assert!(store.contains(42));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_is_idempotent() {
        let (_, store) = store();
        let mut session = store.get(7);
        session.step = Step::Age;
        session.name = Some("Ali".to_string());
        store.put(session.clone());

        assert_eq!(store.get(7), session);
        assert_eq!(store.get(7), session);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_removes_and_is_noop_when_absent() {
        let (_, store) = store();
        store.get(1);
        store.clear(1);
        assert!(!store.contains(1));
        store.clear(1);
        store.clear(999);
        assert!(store.is_empty());
    }

    #[test]
    fn test_reset_discards_answers() {
        let (_, store) = store();
        let mut session = store.get(5);
        session.step = Step::Confirm;
        session.channels = vec!["@a".to_string(), "@b".to_string()];
        store.put(session);

        assert_eq!(store.reset(5), Session::new(5));
        assert_eq!(store.get(5), Session::new(5));
    }

    #[test]
    fn test_expired_session_starts_over() {
        let (clock, store) = store();
        let mut session = store.get(3);
        session.step = Step::Phone;
        store.put(session);

        clock.advance(TTL + Duration::from_secs(1));
        assert_eq!(store.peek(3), None);
        assert_eq!(store.get(3).step, Step::Idle);
    }

    #[test]
    fn test_access_refreshes_ttl() {
        let (clock, store) = store();
        store.get(3);
        clock.advance(TTL / 2);
        store.get(3);
        clock.advance(TTL / 2 + Duration::from_secs(1));

        assert_eq!(store.evict_expired(), 0);
        assert!(store.contains(3));
    }

    #[test]
    fn test_evict_expired_only_drops_idle_entries() {
        let (clock, store) = store();
        store.get(1);
        store.get(2);
        clock.advance(TTL + Duration::from_secs(1));
        store.get(3);

        assert_eq!(store.evict_expired(), 2);
        assert_eq!(store.len(), 1);
        assert!(store.contains(3));
    }

    #[test]
    fn test_step_set_is_closed() {
        let names: Vec<String> = Step::iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            ["idle", "name", "age", "phone", "region", "district", "channels", "adding_channel", "confirm"]
        );
    }
}
