//! In-memory registration stores

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use markaz::core::{AppError, AppResult};
use markaz::registration::{NewRegistration, Registration, RegistrationStore};

/// Keeps records in a vector; one registration per Telegram user, idempotent on repeats.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Registration>>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Registration> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn create(&self, registration: NewRegistration) -> AppResult<Registration> {
        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records.iter().find(|r| r.telegram_id == registration.telegram_id) {
            if existing.matches(&registration) {
                return Ok(existing.clone());
            }
            return Err(AppError::AlreadyRegistered(registration.telegram_id));
        }

        let record = Registration {
            id: records.len() as i64 + 1,
            telegram_id: registration.telegram_id,
            name: registration.name,
            age: registration.age,
            phone: registration.phone,
            region: registration.region.id().to_string(),
            district: registration.district.id.to_string(),
            channels: registration.channels,
            created_at: Utc::now(),
        };
        records.push(record.clone());
        Ok(record)
    }
}

/// Fails while `failing` is set, otherwise writes to the inner store.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    failing: AtomicBool,
    attempts: AtomicUsize,
}

#[allow(dead_code)]
impl FlakyStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistrationStore for FlakyStore {
    async fn create(&self, registration: NewRegistration) -> AppResult<Registration> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Store("data store unavailable".to_string()));
        }
        self.inner.create(registration).await
    }
}

/// Never answers.
pub struct StallingStore;

#[async_trait]
impl RegistrationStore for StallingStore {
    async fn create(&self, _registration: NewRegistration) -> AppResult<Registration> {
        std::future::pending().await
    }
}

/// Writes immediately but answers the first call only after `delay`.
pub struct LateStore {
    pub inner: MemoryStore,
    delay: Duration,
    answered_late: AtomicBool,
}

#[allow(dead_code)]
impl LateStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
            answered_late: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl RegistrationStore for LateStore {
    async fn create(&self, registration: NewRegistration) -> AppResult<Registration> {
        let record = self.inner.create(registration).await;
        if !self.answered_late.swap(true, Ordering::SeqCst) {
            tokio::time::sleep(self.delay).await;
        }
        record
    }
}
