//! `ingest` command handler.

use std::future::Future;

use chargemap_core::{AppConfig, MemoryStationStore, StationStore};
use chargemap_db::PgStationStore;
use chargemap_feed::{IngestOptions, IngestionReport};

use crate::source::{load_feed, FeedSource};

#[derive(Debug, Clone)]
pub(crate) struct IngestArgs {
    pub source: FeedSource,
    pub max_stations: Option<usize>,
    pub batch_size: Option<usize>,
    pub reset: bool,
    pub dry_run: bool,
}

/// Command-line flags override the configured ingestion settings.
pub(crate) fn ingest_options(config: &AppConfig, args: &IngestArgs) -> IngestOptions {
    let mut options = IngestOptions::from_app_config(config);
    if let Some(batch_size) = args.batch_size {
        options.batch_size = batch_size;
    }
    if args.max_stations.is_some() {
        options.max_stations = args.max_stations;
    }
    options
}

/// Load the feed and run the ingestion pipeline.
///
/// With `dry_run` the stations go into an in-memory store and the database is
/// never contacted. With `reset` every stored station is deleted once the
/// feed has parsed, before the first write.
///
/// # Errors
///
/// Returns an error if the feed cannot be loaded, the feed is structurally
/// unusable, or the database cannot be reached. Per-station write failures
/// are only reported.
pub(crate) async fn run_ingest(config: &AppConfig, args: IngestArgs) -> anyhow::Result<()> {
    let options = ingest_options(config, &args);
    tracing::info!(
        source = %args.source,
        batch_size = options.batch_size,
        max_stations = ?options.max_stations,
        dry_run = args.dry_run,
        "starting ingestion"
    );

    let bytes = load_feed(&args.source, config.feed_request_timeout_secs).await?;

    let report = if args.dry_run {
        let store = MemoryStationStore::new();
        chargemap_feed::ingest(&store, &bytes, options).await?
    } else {
        let pool = crate::connect(config).await?;
        let store = PgStationStore::new(pool);
        let reset = args
            .reset
            .then(|| chargemap_db::delete_all_stations(store.pool()));
        ingest_with_reset(&store, &bytes, options, reset).await?
    };

    print_report(&report, args.dry_run);
    Ok(())
}

/// Parse the feed, run `reset` if given, then write.
///
/// A feed that fails to parse never reaches `reset`, so stored stations
/// survive a bad download.
pub(crate) async fn ingest_with_reset<S, R>(
    store: &S,
    bytes: &[u8],
    options: IngestOptions,
    reset: Option<R>,
) -> anyhow::Result<IngestionReport>
where
    S: StationStore,
    R: Future<Output = Result<u64, sqlx::Error>>,
{
    let parsed = chargemap_feed::parse_feed(bytes, options.max_stations)?;
    if let Some(reset) = reset {
        let deleted = reset.await?;
        println!("reset: deleted {deleted} stations");
    }
    Ok(chargemap_feed::ingest_parsed(store, parsed, options.batch_size).await)
}

fn print_report(report: &IngestionReport, dry_run: bool) {
    let prefix = if dry_run { "dry-run: " } else { "" };
    println!(
        "{prefix}operators: {} seen, {} skipped",
        report.feed.operators_seen, report.feed.operators_skipped
    );
    println!(
        "{prefix}records: {} seen, {} malformed, {} rejected, {} duplicates",
        report.feed.records_seen,
        report.feed.records_malformed,
        report.feed.records_rejected,
        report.feed.duplicates_dropped
    );
    println!(
        "{prefix}stations: {} parsed, {} selected, {} capped",
        report.feed.stations_parsed, report.stations_selected, report.feed.capped
    );
    println!(
        "{prefix}writes: {} ok, {} failed ({} rate limited) in {} batches",
        report.written, report.failed, report.rate_limited, report.batches
    );
}
