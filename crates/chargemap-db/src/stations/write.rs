//! Write operations for the `stations` table.

use chargemap_core::Station;
use sqlx::types::Json;
use sqlx::PgPool;

/// Insert a station or overwrite the row with the same id.
///
/// `seq` is not touched on conflict, so an overwritten station keeps its
/// place in partition order.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn upsert_station(pool: &PgPool, station: &Station) -> Result<(), sqlx::Error> {
    let address = station.address();
    let coordinates = station.coordinates();

    sqlx::query(
        "INSERT INTO stations \
            (id, partition_key, street, city, postal_code, names, \
             is_open_24_hours, latitude, longitude) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (id) DO UPDATE SET \
            partition_key = EXCLUDED.partition_key, \
            street = EXCLUDED.street, \
            city = EXCLUDED.city, \
            postal_code = EXCLUDED.postal_code, \
            names = EXCLUDED.names, \
            is_open_24_hours = EXCLUDED.is_open_24_hours, \
            latitude = EXCLUDED.latitude, \
            longitude = EXCLUDED.longitude, \
            updated_at = NOW()",
    )
    .bind(station.id())
    .bind(station.partition_key())
    .bind(&address.street)
    .bind(&address.city)
    .bind(&address.postal_code)
    .bind(Json(station.names()))
    .bind(station.is_open_24_hours())
    .bind(coordinates.latitude())
    .bind(coordinates.longitude())
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove every station. Returns the number of rows deleted.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn delete_all_stations(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM stations").execute(pool).await?;
    tracing::info!(deleted = result.rows_affected(), "stations table cleared");
    Ok(result.rows_affected())
}
