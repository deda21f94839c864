use crate::error::{AppError, Result};
use crate::models::SnapshotRecord;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow, SqliteSynchronous};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Handle to the snapshot table
///
/// Cheap to clone; every operation checks a connection out of the pool and
/// returns it when the operation (or its transaction) ends.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    pool: SqlitePool,
}

impl SnapshotStore {
    /// Connect to `database_url` and create the schema if absent
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!(database_url, "Connecting to snapshot database");

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Config(format!("Invalid DATABASE_URL '{}': {}", database_url, e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;

        let store = Self { pool };
        store.initialize_schema().await?;

        info!("Snapshot database ready");
        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                snapshot_timestamp DATETIME NOT NULL,
                ingestion_timestamp DATETIME NOT NULL,
                symbol VARCHAR(10) NOT NULL,
                name VARCHAR(255) NOT NULL,
                price VARCHAR(20) NOT NULL,
                change VARCHAR(20) NOT NULL,
                changes_percentage VARCHAR(20) NOT NULL,
                launch_link TEXT NOT NULL,
                is_gainer INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        let indexes = [
            // One row per symbol and side within a batch
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_snapshots_unique ON snapshots(snapshot_timestamp, symbol, is_gainer)",
            "CREATE INDEX IF NOT EXISTS idx_snapshots_time ON snapshots(snapshot_timestamp DESC)",
        ];
        for index in indexes {
            sqlx::query(index).execute(&self.pool).await?;
        }

        debug!("Snapshot schema initialized");
        Ok(())
    }

    /// Insert one batch in a single transaction
    ///
    /// Any failure rolls the whole batch back; a duplicate row surfaces as
    /// [`AppError::Integrity`].
    pub async fn insert_batch(&self, records: &[SnapshotRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        // Dropping the transaction without commit rolls it back
        let mut transaction = self.pool.begin().await?;
        let mut affected_rows = 0;

        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO snapshots
                (snapshot_timestamp, ingestion_timestamp, symbol, name, price, change,
                 changes_percentage, launch_link, is_gainer)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(record.snapshot_timestamp)
            .bind(record.ingestion_timestamp)
            .bind(&record.symbol)
            .bind(&record.name)
            .bind(&record.price)
            .bind(&record.change)
            .bind(&record.changes_percentage)
            .bind(&record.launch_link)
            .bind(record.is_gainer)
            .execute(&mut *transaction)
            .await?;

            affected_rows += result.rows_affected() as usize;
        }

        transaction.commit().await?;
        debug!(rows = affected_rows, "Snapshot batch committed");
        Ok(affected_rows)
    }

    /// Date of the most recent snapshot, if any
    pub async fn latest_snapshot_date(&self) -> Result<Option<NaiveDate>> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date(snapshot_timestamp)) FROM snapshots")
            .fetch_one(&self.pool)
            .await?;
        latest.as_deref().map(parse_date).transpose()
    }

    /// Whether any record was taken on `date`
    pub async fn has_snapshot_on(&self, date: NaiveDate) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM snapshots WHERE date(snapshot_timestamp) = ?1")
            .bind(date.format("%Y-%m-%d").to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Distinct snapshot dates, newest first
    pub async fn snapshot_dates(&self) -> Result<Vec<NaiveDate>> {
        let days: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT date(snapshot_timestamp) AS day FROM snapshots ORDER BY day DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        days.iter().map(|d| parse_date(d)).collect()
    }

    /// Records of the latest batch taken on `date`, gainers first, in insertion order
    pub async fn records_on(&self, date: NaiveDate) -> Result<Vec<SnapshotRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, snapshot_timestamp, ingestion_timestamp, symbol, name, price, change,
                   changes_percentage, launch_link, is_gainer
            FROM snapshots
            WHERE snapshot_timestamp = (
                SELECT MAX(snapshot_timestamp) FROM snapshots WHERE date(snapshot_timestamp) = ?1
            )
            ORDER BY is_gainer DESC, id ASC
            "#,
        )
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_record).collect()
    }

    /// Get count of records in database
    pub async fn record_count(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM snapshots")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the database connection pool
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Snapshot database connection pool closed");
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| AppError::Database(format!("Unexpected date '{}' in snapshots: {}", s, e)))
}

/// Convert SQL row to SnapshotRecord
fn row_to_record(row: SqliteRow) -> Result<SnapshotRecord> {
    Ok(SnapshotRecord {
        id: Some(row.try_get("id")?),
        snapshot_timestamp: row.try_get::<NaiveDateTime, _>("snapshot_timestamp")?,
        ingestion_timestamp: row.try_get::<NaiveDateTime, _>("ingestion_timestamp")?,
        symbol: row.try_get("symbol")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        change: row.try_get("change")?,
        changes_percentage: row.try_get("changes_percentage")?,
        launch_link: row.try_get("launch_link")?,
        is_gainer: row.try_get("is_gainer")?,
    })
}
