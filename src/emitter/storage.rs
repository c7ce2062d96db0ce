//! SQLite storage sink.
//!
//! Entries are enriched into [`DtcRecord`]s and written in fixed-size
//! batches. Each batch is its own transaction, so a failed batch leaves
//! earlier batches committed. Conflicts on `code` are skipped, never
//! updated: the first stored occurrence of a code wins.

use crate::constants::CREATE_DTC_TABLE_SQL;
use crate::error::{DtcError, Result};
use crate::models::{DtcEntry, DtcRecord, EmitReport, Severity};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use std::str::FromStr;
use tracing::{debug, error, info};

/// A stored row
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DtcRow {
    pub code: String,
    pub description: String,
    pub category: String,
    pub severity: Severity,
    #[sqlx(rename = "affectedSystem")]
    pub affected_system: String,
    pub created_at: DateTime<Utc>,
}

/// Number of batches needed for `len` records
pub fn batch_count(len: usize, batch_size: usize) -> usize {
    len.div_ceil(batch_size.max(1))
}

/// Batched upsert writer for the `dtc_codes` table
#[derive(Debug, Clone)]
pub struct StorageSink {
    pool: SqlitePool,
    batch_size: usize,
}

impl StorageSink {
    /// Open (creating if missing) the database at `url` and ensure the table exists
    pub async fn connect(url: &str, batch_size: usize) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        debug!("Connected to {}", url);
        Self::from_pool(pool, batch_size).await
    }

    /// Wrap an existing pool and ensure the table exists
    pub async fn from_pool(pool: SqlitePool, batch_size: usize) -> Result<Self> {
        let sink = Self {
            pool,
            batch_size: batch_size.max(1),
        };
        sink.ensure_schema().await?;
        Ok(sink)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_DTC_TABLE_SQL)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Write entries in batches, stopping at the first failed batch
    pub async fn write(
        &self,
        entries: &[DtcEntry],
        progress: Option<&ProgressBar>,
    ) -> Result<EmitReport> {
        let records: Vec<DtcRecord> = entries.iter().map(DtcRecord::from).collect();
        let total_batches = batch_count(records.len(), self.batch_size);
        let mut report = EmitReport::default();

        for (index, batch) in records.chunks(self.batch_size).enumerate() {
            let batch_index = index + 1;

            let inserted = match self.write_batch(batch).await {
                Ok(inserted) => inserted,
                Err(source) => {
                    error!(
                        "Batch {}/{} failed after {} rows inserted: {}",
                        batch_index, total_batches, report.written, source
                    );
                    return Err(DtcError::BatchWrite {
                        batch_index,
                        total_batches,
                        source,
                    });
                }
            };

            let skipped = batch.len().saturating_sub(inserted);
            report.written += inserted;
            report.skipped += skipped;
            report.batches += 1;

            info!(
                "Batch {}/{}: inserted {}, skipped {} existing",
                batch_index, total_batches, inserted, skipped
            );
            if let Some(pb) = progress {
                pb.inc(batch.len() as u64);
            }
        }

        Ok(report)
    }

    /// Insert one batch in its own transaction, returning rows inserted
    async fn write_batch(&self, batch: &[DtcRecord]) -> std::result::Result<usize, sqlx::Error> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO dtc_codes (code, description, category, severity, affectedSystem, created_at) ",
        );
        builder.push_values(batch, |mut row, record| {
            row.push_bind(record.code.to_string())
                .push_bind(record.description.clone())
                .push_bind(record.category.clone())
                .push_bind(record.severity)
                .push_bind(record.affected_system.clone())
                .push_bind(created_at);
        });
        builder.push(" ON CONFLICT(code) DO NOTHING");

        let result = builder.build().execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(result.rows_affected() as usize)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dtc_codes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// All stored rows ordered by code
    pub async fn fetch_all(&self) -> Result<Vec<DtcRow>> {
        let rows = sqlx::query_as::<_, DtcRow>(
            "SELECT code, description, category, severity, affectedSystem, created_at \
             FROM dtc_codes ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
