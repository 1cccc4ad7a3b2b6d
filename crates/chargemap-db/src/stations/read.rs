//! Read operations for the `stations` table.

use sqlx::PgPool;

use super::types::{PositionRow, StationRow};

const STATION_COLUMNS: &str = "id, seq, partition_key, street, city, postal_code, names, \
     is_open_24_hours, latitude, longitude, created_at, updated_at";

/// Count stations stored under `partition_key`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_in_partition(pool: &PgPool, partition_key: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stations WHERE partition_key = $1")
        .bind(partition_key)
        .fetch_one(pool)
        .await
}

/// One `OFFSET`/`LIMIT` window of a partition in `seq` order.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_partition_window(
    pool: &PgPool,
    partition_key: &str,
    offset: i64,
    limit: i64,
) -> Result<Vec<StationRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {STATION_COLUMNS} FROM stations \
         WHERE partition_key = $1 \
         ORDER BY seq \
         OFFSET $2 LIMIT $3"
    );
    sqlx::query_as::<_, StationRow>(&sql)
        .bind(partition_key)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await
}

/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_station_by_id(pool: &PgPool, id: &str) -> Result<Option<StationRow>, sqlx::Error> {
    let sql = format!("SELECT {STATION_COLUMNS} FROM stations WHERE id = $1");
    sqlx::query_as::<_, StationRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Id and coordinates of every station, in `seq` order.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub(super) async fn list_positions(pool: &PgPool) -> Result<Vec<PositionRow>, sqlx::Error> {
    sqlx::query_as::<_, PositionRow>("SELECT id, latitude, longitude FROM stations ORDER BY seq")
        .fetch_all(pool)
        .await
}
