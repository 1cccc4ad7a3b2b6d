//! Row types for the `stations` table.

use chargemap_core::{Address, Coordinates, Station, StationName, StationPosition, StoreError};
use chrono::{DateTime, Utc};
use sqlx::types::Json;

/// A row from the `stations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StationRow {
    pub id: String,
    pub seq: i64,
    pub partition_key: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub names: Json<Vec<StationName>>,
    pub is_open_24_hours: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StationRow {
    /// Rebuild the domain station, keeping the stored partition key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the row no longer satisfies the
    /// station invariants.
    pub fn into_station(self) -> Result<Station, StoreError> {
        let coordinates =
            Coordinates::new(self.latitude, self.longitude).ok_or_else(|| StoreError::Corrupt {
                id: self.id.clone(),
                reason: format!(
                    "coordinates ({}, {}) are not usable",
                    self.latitude, self.longitude
                ),
            })?;
        let id = self.id.clone();
        Station::restore(
            self.id,
            self.partition_key,
            Address {
                street: self.street,
                city: self.city,
                postal_code: self.postal_code,
            },
            self.names.0,
            self.is_open_24_hours,
            coordinates,
        )
        .map_err(|e| StoreError::Corrupt {
            id,
            reason: e.to_string(),
        })
    }
}

/// Projection used by [`super::read::list_positions`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub(super) struct PositionRow {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<PositionRow> for StationPosition {
    fn from(row: PositionRow) -> Self {
        Self {
            id: row.id,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}
