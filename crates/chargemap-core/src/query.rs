//! Read side: partition-paginated search, point lookups and map positions.
//!
//! A page is assembled from two independent store reads, a partition count
//! and a skip/take window. They share no snapshot, so a concurrent ingestion
//! run can make `total_count` disagree with the items actually returned.
//! Callers get a weakly consistent page; nothing here tries to reconcile it.

use thiserror::Error;

use crate::pagination::{PageRequest, PaginatedResult};
use crate::partition::partition_key_for;
use crate::station::{Station, StationPosition};
use crate::store::{StationStore, StoreError};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("page must be at least 1 (got {0})")]
    InvalidPage(i64),

    #[error("page size must be between 1 and {max} (got {requested})")]
    InvalidPageSize { requested: i64, max: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Whether the caller, rather than the store, is at fault.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidPage(_) | QueryError::InvalidPageSize { .. }
        )
    }
}

/// Fetch one page of stations from a single partition.
///
/// Pages past the end are not an error: they come back empty with
/// `has_next_page == false`.
///
/// # Errors
///
/// Returns [`QueryError::Store`] if either store read fails.
pub async fn query_by_partition<S: StationStore>(
    store: &S,
    partition_key: &str,
    request: PageRequest,
) -> Result<PaginatedResult<Station>, QueryError> {
    let total_count = store.count_in_partition(partition_key).await?;
    let items = store
        .window_in_partition(partition_key, request.skip(), request.take())
        .await?;

    tracing::debug!(
        partition_key,
        page = request.page(),
        page_size = request.page_size(),
        total_count,
        returned = items.len(),
        "partition page query"
    );

    Ok(PaginatedResult::new(items, total_count, request))
}

/// Page through the partition that `postal_code` falls into.
///
/// # Errors
///
/// Returns [`QueryError::Store`] if either store read fails.
pub async fn query_by_postal_code<S: StationStore>(
    store: &S,
    postal_code: &str,
    request: PageRequest,
) -> Result<PaginatedResult<Station>, QueryError> {
    query_by_partition(store, partition_key_for(postal_code), request).await
}

/// Point lookup; `Ok(None)` when no station has this id.
///
/// # Errors
///
/// Returns [`QueryError::Store`] if the store read fails.
pub async fn query_by_id<S: StationStore>(
    store: &S,
    id: &str,
) -> Result<Option<Station>, QueryError> {
    Ok(store.get_by_id(id).await?)
}

/// Every station's id and coordinates, for map display.
///
/// # Errors
///
/// Returns [`QueryError::Store`] if the store read fails.
pub async fn query_positions<S: StationStore>(
    store: &S,
) -> Result<Vec<StationPosition>, QueryError> {
    Ok(store.positions().await?)
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
