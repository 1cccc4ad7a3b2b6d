//! Postgres-backed [`StationStore`] over the `stations` table.
//!
//! Natural order is the `seq` identity column, assigned on first insert and
//! left alone by later upserts, so pages stay in first-insertion order.

mod read;
mod types;
mod write;

use chargemap_core::{Station, StationPosition, StationStore, StoreError};
use sqlx::PgPool;

pub use types::StationRow;
pub use write::delete_all_stations;

/// Postgres SQLSTATE for `too_many_connections`.
const TOO_MANY_CONNECTIONS: &str = "53300";

#[derive(Debug, Clone)]
pub struct PgStationStore {
    pool: PgPool,
}

impl PgStationStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Translate a sqlx failure into the store-level signal callers observe.
///
/// Pool exhaustion and server-side connection limits are reported as
/// [`StoreError::RateLimited`]; everything else is a backend error.
#[must_use]
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut => StoreError::RateLimited {
            retry_after_ms: None,
        },
        sqlx::Error::Database(ref db)
            if db.code().as_deref() == Some(TOO_MANY_CONNECTIONS) =>
        {
            StoreError::RateLimited {
                retry_after_ms: None,
            }
        }
        other => StoreError::Backend(other.to_string()),
    }
}

impl StationStore for PgStationStore {
    async fn upsert(&self, station: &Station) -> Result<(), StoreError> {
        write::upsert_station(&self.pool, station)
            .await
            .map_err(map_sqlx_error)
    }

    async fn count_in_partition(&self, partition_key: &str) -> Result<u64, StoreError> {
        let count = read::count_in_partition(&self.pool, partition_key)
            .await
            .map_err(map_sqlx_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn window_in_partition(
        &self,
        partition_key: &str,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Station>, StoreError> {
        let offset = i64::try_from(skip).unwrap_or(i64::MAX);
        let limit = i64::try_from(take).unwrap_or(i64::MAX);
        let rows = read::list_partition_window(&self.pool, partition_key, offset, limit)
            .await
            .map_err(map_sqlx_error)?;
        rows.into_iter().map(StationRow::into_station).collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Station>, StoreError> {
        read::get_station_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(StationRow::into_station)
            .transpose()
    }

    async fn positions(&self) -> Result<Vec<StationPosition>, StoreError> {
        let rows = read::list_positions(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(StationPosition::from).collect())
    }

    async fn health(&self) -> Result<(), StoreError> {
        crate::ping(&self.pool).await.map_err(map_sqlx_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_rate_limited() {
        assert!(map_sqlx_error(sqlx::Error::PoolTimedOut).is_rate_limited());
    }

    #[test]
    fn other_errors_are_backend_errors() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(!err.is_rate_limited());

        let err = map_sqlx_error(sqlx::Error::PoolClosed);
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
