use crate::models::{MatchRecord, MatchStatus};
use crate::services::ports::{MatchRecordStore, PortError};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the match record store
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl From<RecordStoreError> for PortError {
    fn from(e: RecordStoreError) -> Self {
        PortError::Store(e.to_string())
    }
}

/// PostgreSQL-backed store for match records.
///
/// A primary key on `(subject_id, candidate_id)` makes creation idempotent:
/// concurrent passes discovering the same pair race harmlessly into a single
/// row. The `status` column is write-once `'pending'` for this service.
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, RecordStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, RecordStoreError> {
        tracing::info!("Connecting to PostgreSQL match record store");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Insert a match record unless the pair already exists.
    ///
    /// Returns `true` when a new row was written, `false` when the pair was
    /// already recorded (the conflict is swallowed, not raised).
    pub async fn insert_record(&self, record: &MatchRecord) -> Result<bool, RecordStoreError> {
        let query = r#"
            INSERT INTO match_records (subject_id, candidate_id, score, matched_at, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (subject_id, candidate_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(&record.subject_id)
            .bind(&record.candidate_id)
            .bind(record.score)
            .bind(record.matched_at)
            .bind(record.status.as_str())
            .execute(&self.pool)
            .await?;

        let created = result.rows_affected() > 0;

        tracing::debug!(
            "Match record {} -> {}: {}",
            record.subject_id,
            record.candidate_id,
            if created { "created" } else { "already present" }
        );

        Ok(created)
    }

    /// Check whether a record exists for the ordered pair.
    pub async fn pair_exists(
        &self,
        subject_id: &str,
        candidate_id: &str,
    ) -> Result<bool, RecordStoreError> {
        let query = r#"
            SELECT EXISTS(
                SELECT 1 FROM match_records
                WHERE subject_id = $1 AND candidate_id = $2
            ) AS present
        "#;

        let row = sqlx::query(query)
            .bind(subject_id)
            .bind(candidate_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("present"))
    }

    /// All candidate ids already matched with the subject, for pre-filtering
    /// a detection pass.
    pub async fn candidates_for(&self, subject_id: &str) -> Result<Vec<String>, RecordStoreError> {
        let query = r#"
            SELECT candidate_id
            FROM match_records
            WHERE subject_id = $1
        "#;

        let rows = sqlx::query(query)
            .bind(subject_id)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<String> = rows.iter().map(|row| row.get("candidate_id")).collect();

        tracing::debug!("Subject {} has {} recorded matches", subject_id, ids.len());

        Ok(ids)
    }

    /// Persisted records for a subject, newest first.
    pub async fn list_for_subject(
        &self,
        subject_id: &str,
    ) -> Result<Vec<MatchRecord>, RecordStoreError> {
        let query = r#"
            SELECT subject_id, candidate_id, score, matched_at
            FROM match_records
            WHERE subject_id = $1
            ORDER BY matched_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(subject_id)
            .fetch_all(&self.pool)
            .await?;

        let records = rows
            .iter()
            .map(|row| MatchRecord {
                subject_id: row.get("subject_id"),
                candidate_id: row.get("candidate_id"),
                score: row.get("score"),
                matched_at: row.get("matched_at"),
                // The status column is write-once 'pending'.
                status: MatchStatus::Pending,
            })
            .collect();

        Ok(records)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, RecordStoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl MatchRecordStore for PostgresRecordStore {
    async fn exists(&self, subject_id: &str, candidate_id: &str) -> Result<bool, PortError> {
        self.pair_exists(subject_id, candidate_id)
            .await
            .map_err(PortError::from)
    }

    async fn create(&self, record: &MatchRecord) -> Result<bool, PortError> {
        self.insert_record(record).await.map_err(PortError::from)
    }

    async fn matched_candidates(&self, subject_id: &str) -> Result<Vec<String>, PortError> {
        self.candidates_for(subject_id).await.map_err(PortError::from)
    }
}
