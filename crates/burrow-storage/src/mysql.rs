use async_trait::async_trait;
use burrow_core::repository::{ReadRepository, Repository, Result};
use burrow_core::{Origin, ShortCode, ShortCodeRecord, StorageError};
use jiff::Timestamp;
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::info;

const SCHEMA: &str = include_str!("../ddl/mysql/short_urls.sql");

/// MySQL implementation of the repository contract.
///
/// The `short_code` primary key is the uniqueness guard: a plain `INSERT`
/// either lands or fails with a duplicate-key error, so no read-then-write
/// race exists across service instances.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Opens a new pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `short_urls` table if it is missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        info!("short_urls schema is in place");
        Ok(())
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn record_from_row(row: &MySqlRow) -> Result<ShortCodeRecord> {
    let code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
    let created_at_ms: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let is_custom: bool = row.try_get("is_custom").map_err(map_sqlx_error)?;

    let created_at = Timestamp::from_millisecond(created_at_ms).map_err(|e| {
        StorageError::InvalidData(format!(
            "invalid created_at timestamp '{created_at_ms}': {e}"
        ))
    })?;

    Ok(ShortCodeRecord {
        code: ShortCode::new_unchecked(code),
        long_url,
        created_at,
        origin: if is_custom {
            Origin::Custom
        } else {
            Origin::Generated
        },
    })
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortCodeRecord>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, long_url, created_at, is_custom
            FROM short_urls
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM short_urls
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortCodeRecord>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, long_url, created_at, is_custom
            FROM short_urls
            WHERE long_url = ?
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(long_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert_if_absent(&self, record: ShortCodeRecord) -> Result<ShortCodeRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_urls (short_code, long_url, created_at, is_custom)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.code.as_str())
        .bind(record.long_url.as_str())
        .bind(record.created_at.as_millisecond())
        .bind(record.origin.is_custom())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(record),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(record.code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
