use std::time::Duration;

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::core::error::{AppError, AppResult};
use crate::registration::{NewRegistration, Registration};
use crate::storage::migrations::run_migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// How long a writer waits for a competing write lock before failing.
const BUSY_TIMEOUT_SECS: u64 = 5;

const REGISTRATION_COLUMNS: &str = "id, telegram_id, name, age, phone, region, district, channels, created_at";

/// Create a new database connection pool
///
/// Initializes a connection pool with up to 10 connections and runs schema migrations.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
///
/// # Example
///
/// ```no_run
/// use markaz::storage::db;
///
/// let pool = db::create_pool("markaz.sqlite")?;
/// # Ok::<(), markaz::core::AppError>(())
/// ```
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path)
        .with_init(|conn| conn.busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS)));
    let pool = Pool::builder()
        .max_size(10) // Maximum 10 connections in the pool
        .build(manager)?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is automatically returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

fn conversion_error(column: usize, err: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn registration_from_row(row: &Row<'_>) -> rusqlite::Result<Registration> {
    let channels: String = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(Registration {
        id: row.get(0)?,
        telegram_id: row.get(1)?,
        name: row.get(2)?,
        age: row.get(3)?,
        phone: row.get(4)?,
        region: row.get(5)?,
        district: row.get(6)?,
        channels: serde_json::from_str(&channels).map_err(|e| conversion_error(7, e))?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| conversion_error(8, e))?
            .with_timezone(&Utc),
    })
}

/// Inserts a registration and returns the stored record.
///
/// Idempotent per Telegram user: if an identical registration is already
/// stored, that record is returned. A different registration for the same
/// user fails with [`AppError::AlreadyRegistered`].
pub fn insert_registration(conn: &Connection, registration: &NewRegistration) -> AppResult<Registration> {
    let channels = serde_json::to_string(&registration.channels)?;
    let created_at = Utc::now();

    let inserted = conn.execute(
        "INSERT INTO registrations (telegram_id, name, age, phone, region, district, channels, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(telegram_id) DO NOTHING",
        params![
            registration.telegram_id,
            registration.name,
            registration.age,
            registration.phone,
            registration.region.id(),
            registration.district.id,
            channels,
            created_at.to_rfc3339(),
        ],
    )?;

    if inserted == 0 {
        let existing = get_registration_by_telegram_id(conn, registration.telegram_id)?.ok_or_else(|| {
            AppError::Store(format!(
                "registration of user {} conflicted but is gone",
                registration.telegram_id
            ))
        })?;
        if existing.matches(registration) {
            log::info!(
                "Registration of user {} already stored as #{}, reusing it",
                registration.telegram_id,
                existing.id
            );
            return Ok(existing);
        }
        return Err(AppError::AlreadyRegistered(registration.telegram_id));
    }

    Ok(Registration {
        id: conn.last_insert_rowid(),
        telegram_id: registration.telegram_id,
        name: registration.name.clone(),
        age: registration.age,
        phone: registration.phone.clone(),
        region: registration.region.id().to_string(),
        district: registration.district.id.to_string(),
        channels: registration.channels.clone(),
        created_at,
    })
}

pub fn get_registration(conn: &Connection, id: i64) -> AppResult<Option<Registration>> {
    let sql = format!("SELECT {} FROM registrations WHERE id = ?1", REGISTRATION_COLUMNS);
    Ok(conn.query_row(&sql, params![id], registration_from_row).optional()?)
}

pub fn get_registration_by_telegram_id(conn: &Connection, telegram_id: i64) -> AppResult<Option<Registration>> {
    let sql = format!("SELECT {} FROM registrations WHERE telegram_id = ?1", REGISTRATION_COLUMNS);
    Ok(conn.query_row(&sql, params![telegram_id], registration_from_row).optional()?)
}

/// Most recent registrations first.
pub fn list_registrations(conn: &Connection, limit: usize) -> AppResult<Vec<Registration>> {
    let sql = format!(
        "SELECT {} FROM registrations ORDER BY id DESC LIMIT ?1",
        REGISTRATION_COLUMNS
    );
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit], registration_from_row)?;

    let mut registrations = Vec::new();
    for row in rows {
        registrations.push(row?);
    }
    Ok(registrations)
}

pub fn count_registrations(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM registrations", [], |row| row.get(0))?)
}
