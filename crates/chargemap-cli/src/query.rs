//! Read-only `query` and `partition` command handlers.

use chargemap_core::{
    partition_key_for, query_by_id, query_by_partition, query_by_postal_code, AppConfig,
    PageRequest, StationSummary,
};
use chargemap_db::PgStationStore;

pub(crate) fn run_partition(postal_code: &str) {
    println!("{}", partition_key_for(postal_code));
}

fn page_request(
    config: &AppConfig,
    page: i64,
    page_size: Option<i64>,
) -> anyhow::Result<PageRequest> {
    let page_size = page_size.unwrap_or_else(|| i64::from(config.query_default_page_size));
    Ok(PageRequest::new(page, page_size, config.query_max_page_size)?)
}

/// Print one page of a partition as JSON.
///
/// # Errors
///
/// Returns an error for invalid paging parameters or a failed store read.
pub(crate) async fn run_query_partition(
    config: &AppConfig,
    partition_key: &str,
    page: i64,
    page_size: Option<i64>,
) -> anyhow::Result<()> {
    let request = page_request(config, page, page_size)?;
    let store = PgStationStore::new(crate::connect(config).await?);
    let result = query_by_partition(&store, partition_key, request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Print one page of the postal code's partition as JSON summaries.
///
/// # Errors
///
/// Returns an error for invalid paging parameters or a failed store read.
pub(crate) async fn run_query_postal(
    config: &AppConfig,
    postal_code: &str,
    page: i64,
    page_size: Option<i64>,
) -> anyhow::Result<()> {
    let request = page_request(config, page, page_size)?;
    let store = PgStationStore::new(crate::connect(config).await?);
    let result = query_by_postal_code(&store, postal_code, request)
        .await?
        .map(StationSummary::from);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Print a single station as JSON.
///
/// # Errors
///
/// Returns an error if no station has this id or the store read fails.
pub(crate) async fn run_query_station(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let store = PgStationStore::new(crate::connect(config).await?);
    let Some(station) = query_by_id(&store, id).await? else {
        anyhow::bail!("no station with id {id}");
    };
    println!("{}", serde_json::to_string_pretty(&station)?);
    Ok(())
}
