//! Persisting a finished conversation as a registration record.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::regions::{District, Region};
use super::session::Session;
use crate::core::error::{AppError, AppResult};
use crate::core::validation::ValidationError;

/// Everything a completed conversation collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub telegram_id: i64,
    pub name: String,
    pub age: u8,
    pub phone: String,
    pub region: Region,
    pub district: District,
    pub channels: Vec<String>,
}

impl NewRegistration {
    /// Packages a session; every field must have been answered.
    pub fn from_session(session: &Session) -> Result<Self, ValidationError> {
        Ok(Self {
            telegram_id: session.user_id,
            name: session.name.clone().ok_or(ValidationError::Incomplete("name"))?,
            age: session.age.ok_or(ValidationError::Incomplete("age"))?,
            phone: session.phone.clone().ok_or(ValidationError::Incomplete("phone"))?,
            region: session.region.ok_or(ValidationError::Incomplete("region"))?,
            district: session.district.ok_or(ValidationError::Incomplete("district"))?,
            channels: session.channels.clone(),
        })
    }
}

/// A stored registration. Region and district are kept as ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub id: i64,
    pub telegram_id: i64,
    pub name: String,
    pub age: u8,
    pub phone: String,
    pub region: String,
    pub district: String,
    pub channels: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Display name of the stored region, falling back to the raw id.
    pub fn region_name(&self) -> &str {
        Region::from_id(&self.region).map(Region::name).unwrap_or(self.region.as_str())
    }

    /// Display name of the stored district, falling back to the raw id.
    pub fn district_name(&self) -> &str {
        Region::from_id(&self.region)
            .and_then(|region| region.district(&self.district))
            .map(|district| district.name)
            .unwrap_or(self.district.as_str())
    }

    /// True when this record holds exactly the answers of `registration`.
    pub fn matches(&self, registration: &NewRegistration) -> bool {
        self.telegram_id == registration.telegram_id
            && self.name == registration.name
            && self.age == registration.age
            && self.phone == registration.phone
            && self.region == registration.region.id()
            && self.district == registration.district.id
            && self.channels == registration.channels
    }
}

/// The data store the conversation hands finished registrations to.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Persists a registration and returns the stored record with its id.
    ///
    /// Must be idempotent per Telegram user: storing the same registration
    /// again returns the existing record, so a commit that timed out on the
    /// caller's side can be retried.
    async fn create(&self, registration: NewRegistration) -> AppResult<Registration>;
}

/// Hands completed sessions to a [`RegistrationStore`] with a bounded wait.
#[derive(Clone)]
pub struct Committer {
    store: Arc<dyn RegistrationStore>,
    timeout: Duration,
}

impl Committer {
    pub fn new(store: Arc<dyn RegistrationStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Commits a session.
    ///
    /// # Returns
    /// * `Ok(Registration)` - the stored record
    /// * `Err(AppError::Validation)` - the session is missing an answer
    /// * `Err(AppError::CommitTimeout)` - the store did not answer in time
    /// * `Err(_)` - whatever the store reported
    pub async fn commit(&self, session: &Session) -> AppResult<Registration> {
        let registration = NewRegistration::from_session(session)?;
        match tokio::time::timeout(self.timeout, self.store.create(registration)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::CommitTimeout(self.timeout)),
        }
    }
}
