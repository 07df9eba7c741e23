use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use super::{AnalysisRecord, AnalysisStore};
use crate::analysis::{AnalysisData, FiveWhysData, FtaData, IshikawaData};
use crate::config::DatabaseConfig;
use crate::error::{StorageError, StorageResult};

/// Static migrator that embeds migrations at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite-backed analysis record store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store instance
    pub async fn new(config: &DatabaseConfig) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Connection {
                message: format!("Failed to create database directory: {}", e),
            })?;
        }

        let database_url = format!("sqlite://{}?mode=rwc", config.path.display());

        let options = SqliteConnectOptions::from_str(&database_url)
            .map_err(|e| StorageError::Connection {
                message: format!("Invalid database URL: {}", e),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Create an in-memory store, mainly for tests.
    pub async fn new_in_memory() -> StorageResult<Self> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
                StorageError::Connection {
                    message: format!("Invalid database URL: {}", e),
                }
            })?;

        // A single connection so every query sees the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to in-memory database: {}", e),
            })?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Run database migrations using embedded sqlx migrations
    async fn run_migrations(&self) -> StorageResult<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Migration {
                message: format!("Failed to run migrations: {}", e),
            })?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Get the underlying pool for advanced queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl AnalysisStore for SqliteStore {
    async fn get(&self, subject_id: &str) -> StorageResult<Option<AnalysisRecord>> {
        let row: Option<AnalysisRow> = sqlx::query_as(
            r#"
            SELECT subject_id, analysis_type, payload, created_at, updated_at
            FROM analyses
            WHERE subject_id = ?
            "#,
        )
        .bind(subject_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AnalysisRecord::try_from).transpose()
    }

    async fn put(&self, subject_id: &str, data: &AnalysisData) -> StorageResult<()> {
        let payload = data.payload_json().map_err(|e| StorageError::Query {
            message: format!("Failed to serialize payload: {}", e),
        })?;
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO analyses (subject_id, analysis_type, payload, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(subject_id) DO UPDATE SET
                analysis_type = excluded.analysis_type,
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(subject_id)
        .bind(data.kind().as_str())
        .bind(&payload)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, subject_id: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM analyses WHERE subject_id = ?")
            .bind(subject_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// Internal row type for SQLx mapping
#[derive(sqlx::FromRow)]
struct AnalysisRow {
    subject_id: String,
    analysis_type: String,
    payload: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<AnalysisRow> for AnalysisRecord {
    type Error = StorageError;

    fn try_from(row: AnalysisRow) -> Result<Self, Self::Error> {
        use chrono::DateTime;

        let data = decode_payload(&row.analysis_type, &row.payload).map_err(|message| {
            StorageError::CorruptPayload {
                subject_id: row.subject_id.clone(),
                message,
            }
        })?;

        Ok(Self {
            subject_id: row.subject_id,
            data,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .unwrap_or_else(|_| chrono::Utc::now()),
            updated_at: DateTime::parse_from_rfc3339(&row.updated_at)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .unwrap_or_else(|_| chrono::Utc::now()),
        })
    }
}

fn decode_payload(analysis_type: &str, payload: &str) -> Result<AnalysisData, String> {
    match analysis_type {
        "five_whys" => serde_json::from_str::<FiveWhysData>(payload)
            .map(AnalysisData::FiveWhys)
            .map_err(|e| e.to_string()),
        "ishikawa" => serde_json::from_str::<IshikawaData>(payload)
            .map(AnalysisData::Ishikawa)
            .map_err(|e| e.to_string()),
        "fta" => serde_json::from_str::<FtaData>(payload)
            .map(AnalysisData::Fta)
            .map_err(|e| e.to_string()),
        other => Err(format!("unknown analysis type: {}", other)),
    }
}
