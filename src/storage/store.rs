//! SQLite-backed [`RegistrationStore`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::error::{AppError, AppResult};
use crate::registration::{NewRegistration, Registration, RegistrationStore};
use crate::storage::db::{get_connection, insert_registration, DbPool};

/// Writes registrations through the shared connection pool.
///
/// rusqlite is blocking, so each insert runs on tokio's blocking pool.
#[derive(Clone)]
pub struct SqliteRegistrationStore {
    pool: Arc<DbPool>,
}

impl SqliteRegistrationStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationStore for SqliteRegistrationStore {
    async fn create(&self, registration: NewRegistration) -> AppResult<Registration> {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let conn = get_connection(&pool)?;
            insert_registration(&conn, &registration)
        })
        .await
        .map_err(|e| AppError::Store(format!("registration insert task failed: {}", e)))?
    }
}
