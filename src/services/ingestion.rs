//! Daily snapshot ingestion.
//!
//! The index page calls [`SnapshotService::refresh_if_due`] on every request.
//! Once per day, after the refresh time, that fetches both sides of the board
//! and stores them as one batch. Both sides are fetched before anything is
//! written, so a provider failure never leaves half a snapshot behind.

use crate::constants::SNAPSHOT_LIMIT;
use crate::error::{AppError, Result};
use crate::models::{MarketSide, Mover, SnapshotRecord};
use crate::services::fmp_client::FmpClient;
use crate::services::snapshot_gate::SnapshotSchedule;
use crate::services::snapshot_store::SnapshotStore;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::collections::HashSet;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

/// Result of one gate check, for logging and rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Before the refresh time, or today's snapshot already exists
    NotDue,
    /// A new batch was committed with this many rows
    Stored(usize),
    /// The store already holds this batch (duplicate insert rolled back)
    AlreadyStored,
    /// Fetch or insert failed; nothing was committed
    Failed(String),
}

pub struct SnapshotService {
    store: SnapshotStore,
    client: FmpClient,
    schedule: SnapshotSchedule,
    limit: usize,
    /// Serialises check-then-fetch inside this process
    refresh_lock: Mutex<()>,
}

impl SnapshotService {
    pub fn new(store: SnapshotStore, client: FmpClient) -> Self {
        Self {
            store,
            client,
            schedule: SnapshotSchedule::default(),
            limit: SNAPSHOT_LIMIT,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn schedule(&self) -> &SnapshotSchedule {
        &self.schedule
    }

    /// Ask the gate, using the latest snapshot date currently in the store
    pub async fn is_due(&self, now: DateTime<Utc>) -> Result<bool> {
        let latest = self.store.latest_snapshot_date().await?;
        Ok(self.schedule.should_fetch(now, latest))
    }

    /// Take today's snapshot if the gate says so
    ///
    /// Never returns an error: failures are logged and reported as
    /// [`RefreshOutcome::Failed`] so the calling page still renders.
    #[instrument(skip(self))]
    pub async fn refresh_if_due(&self, now: DateTime<Utc>) -> RefreshOutcome {
        match self.is_due(now).await {
            Ok(true) => {}
            Ok(false) => return RefreshOutcome::NotDue,
            Err(e) => {
                error!(error = %e, "Snapshot gate check failed");
                return RefreshOutcome::Failed(e.to_string());
            }
        }

        let _guard = self.refresh_lock.lock().await;

        // Another request may have stored the snapshot while we waited
        match self.is_due(now).await {
            Ok(true) => {}
            Ok(false) => return RefreshOutcome::NotDue,
            Err(e) => {
                error!(error = %e, "Snapshot gate check failed");
                return RefreshOutcome::Failed(e.to_string());
            }
        }

        info!("Daily snapshot is due, fetching from provider");
        let result = self.store_live_snapshot(now).await;
        self.outcome_from(now, result).await
    }

    /// Take a snapshot now, ignoring the gate
    pub async fn force_refresh(&self, now: DateTime<Utc>) -> RefreshOutcome {
        let _guard = self.refresh_lock.lock().await;
        let result = self.store_live_snapshot(now).await;
        self.outcome_from(now, result).await
    }

    /// Fetch the provider's movers for a past `date` and store them with
    /// `date 00:00` as the snapshot timestamp
    #[instrument(skip(self))]
    pub async fn ingest_for_date(&self, date: NaiveDate) -> Result<usize> {
        let batch = self.fetch_batch(Some(date)).await?;
        let taken = date.and_time(NaiveTime::MIN);
        let records = build_records(&batch, taken, Utc::now().naive_utc());

        let stored = self.store.insert_batch(&records).await?;
        info!(%date, rows = stored, "Historical snapshot stored");
        Ok(stored)
    }

    async fn store_live_snapshot(&self, now: DateTime<Utc>) -> Result<usize> {
        let taken = self.schedule.local_now(now);
        let batch = self.fetch_batch(None).await?;
        let records = build_records(&batch, taken, Utc::now().naive_utc());

        if records.is_empty() {
            warn!(snapshot_timestamp = %taken, "Provider returned no movers, nothing to store");
        }
        self.store.insert_batch(&records).await
    }

    /// Both sides, gainers first; fails if either side fails
    async fn fetch_batch(&self, date: Option<NaiveDate>) -> Result<Vec<(MarketSide, Vec<Mover>)>> {
        let mut batch = Vec::with_capacity(2);
        for side in MarketSide::all() {
            let movers = match date {
                Some(date) => self.client.fetch_historical_movers(side, date, self.limit).await?,
                None => self.client.fetch_movers(side, self.limit).await?,
            };
            batch.push((side, movers));
        }
        Ok(batch)
    }

    /// A duplicate insert only counts as stored when today's snapshot is
    /// actually in the store
    async fn outcome_from(&self, now: DateTime<Utc>, result: Result<usize>) -> RefreshOutcome {
        match result {
            Ok(rows) => {
                info!(rows, "Snapshot stored");
                RefreshOutcome::Stored(rows)
            }
            Err(AppError::Integrity(msg)) => {
                let today = self.schedule.local_date(now);
                match self.store.has_snapshot_on(today).await {
                    Ok(true) => {
                        warn!(error = %msg, "Snapshot already stored, rolled back duplicate insert");
                        RefreshOutcome::AlreadyStored
                    }
                    Ok(false) => {
                        error!(error = %msg, %today, "Duplicate insert rolled back but nothing is stored for today");
                        RefreshOutcome::Failed(format!("Storage integrity error: {}", msg))
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to check stored snapshot after duplicate insert");
                        RefreshOutcome::Failed(e.to_string())
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Snapshot ingestion failed, rolled back");
                RefreshOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Rows for one batch; a symbol listed twice on the same side keeps its first entry
fn build_records(
    batch: &[(MarketSide, Vec<Mover>)],
    taken: NaiveDateTime,
    ingested: NaiveDateTime,
) -> Vec<SnapshotRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for (side, movers) in batch {
        for mover in movers {
            if !seen.insert((side.is_gainer(), mover.symbol.as_str())) {
                warn!(side = %side, symbol = %mover.symbol, "Provider listed symbol twice, keeping first entry");
                continue;
            }
            records.push(SnapshotRecord::from_mover(mover, *side, taken, ingested));
        }
    }
    records
}
