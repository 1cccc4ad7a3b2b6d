//! Batched ingestion into a [`StationStore`].
//!
//! Batches run one after another; the upserts inside a batch run
//! concurrently and the batch drains fully before the next starts. Each
//! upsert result is collected and folded into a [`WriteTally`] once its
//! batch completes, so no counter is shared between in-flight writes.

use chargemap_core::{AppConfig, Station, StationStore, StoreError};
use futures::future::join_all;
use serde::Serialize;

use crate::error::FeedError;
use crate::feed::{parse_feed, FeedStats, ParsedFeed};

/// Stations per concurrent batch when nothing else is configured.
pub const DEFAULT_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub batch_size: usize,
    pub max_stations: Option<usize>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_stations: None,
        }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            batch_size: config.ingest_batch_size,
            max_stations: config.ingest_max_stations,
        }
    }
}

/// Upsert outcomes for a set of stations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteTally {
    pub written: usize,
    /// Every failed upsert, rate-limited ones included.
    pub failed: usize,
    pub rate_limited: usize,
    pub batches: usize,
}

impl WriteTally {
    fn record(&mut self, station_id: &str, result: Result<(), StoreError>) {
        match result {
            Ok(()) => self.written += 1,
            Err(err) if err.is_rate_limited() => {
                tracing::warn!(station_id, error = %err, "upsert rate limited by store");
                self.failed += 1;
                self.rate_limited += 1;
            }
            Err(err) => {
                tracing::warn!(station_id, error = %err, "upsert failed");
                self.failed += 1;
            }
        }
    }
}

/// Summary of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    #[serde(flatten)]
    pub feed: FeedStats,
    /// Stations handed to the writer after dedup and cap.
    pub stations_selected: usize,
    pub written: usize,
    pub failed: usize,
    pub rate_limited: usize,
    pub batches: usize,
}

/// Upsert `stations` in sequential batches of concurrent writes.
///
/// A zero `batch_size` is treated as one. Failures never abort the run; they
/// are counted in the returned tally.
pub async fn write_batches<S: StationStore>(
    store: &S,
    stations: &[Station],
    batch_size: usize,
) -> WriteTally {
    let batch_size = batch_size.max(1);
    let total_batches = stations.len().div_ceil(batch_size);
    let mut tally = WriteTally::default();

    for (index, batch) in stations.chunks(batch_size).enumerate() {
        tracing::info!(
            batch = index + 1,
            total_batches,
            size = batch.len(),
            "batch {}/{}",
            index + 1,
            total_batches
        );

        let results = join_all(batch.iter().map(|station| store.upsert(station))).await;
        for (station, result) in batch.iter().zip(results) {
            tally.record(station.id(), result);
        }
        tally.batches += 1;
    }

    tally
}

/// Parse `bytes` as an operator feed and upsert every resulting station.
///
/// # Errors
///
/// Returns [`FeedError`] only when the feed itself is unusable; in that case
/// nothing has been written.
pub async fn ingest<S: StationStore>(
    store: &S,
    bytes: &[u8],
    options: IngestOptions,
) -> Result<IngestionReport, FeedError> {
    let parsed = parse_feed(bytes, options.max_stations)?;
    Ok(ingest_parsed(store, parsed, options.batch_size).await)
}

/// Write an already parsed feed and report the run.
pub async fn ingest_parsed<S: StationStore>(
    store: &S,
    parsed: ParsedFeed,
    batch_size: usize,
) -> IngestionReport {
    let stations_selected = parsed.stations.len();

    let tally = write_batches(store, &parsed.stations, batch_size).await;

    let report = IngestionReport {
        feed: parsed.stats,
        stations_selected,
        written: tally.written,
        failed: tally.failed,
        rate_limited: tally.rate_limited,
        batches: tally.batches,
    };

    tracing::info!(
        operators = report.feed.operators_seen,
        operators_skipped = report.feed.operators_skipped,
        records = report.feed.records_seen,
        malformed = report.feed.records_malformed,
        rejected = report.feed.records_rejected,
        duplicates = report.feed.duplicates_dropped,
        selected = report.stations_selected,
        written = report.written,
        failed = report.failed,
        rate_limited = report.rate_limited,
        "ingestion complete"
    );

    report
}
