//! The document-store seam used by ingestion and queries.
//!
//! [`StationStore`] is the only contract the core relies on: keyed upserts,
//! partition-scoped count and window reads, point lookups and a position
//! projection. Retries and backoff belong to the implementation; callers only
//! observe success or failure per call.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::station::{Station, StationPosition};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store is rate limiting requests")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("store backend error: {0}")]
    Backend(String),

    #[error("stored station {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },
}

impl StoreError {
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StoreError::RateLimited { .. })
    }
}

pub trait StationStore: Send + Sync {
    /// Insert or overwrite the station stored under `station.id()`.
    fn upsert(&self, station: &Station) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Count every station stored under `partition_key`.
    fn count_in_partition(
        &self,
        partition_key: &str,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Read up to `take` stations from `partition_key` after skipping `skip`,
    /// in the store's natural order.
    fn window_in_partition(
        &self,
        partition_key: &str,
        skip: u64,
        take: u64,
    ) -> impl Future<Output = Result<Vec<Station>, StoreError>> + Send;

    fn get_by_id(&self, id: &str)
        -> impl Future<Output = Result<Option<Station>, StoreError>> + Send;

    /// Id and coordinates of every stored station.
    fn positions(&self) -> impl Future<Output = Result<Vec<StationPosition>, StoreError>> + Send;

    fn health(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        async { Ok(()) }
    }
}

/// In-process [`StationStore`] that keeps stations in first-insertion order.
///
/// Used for dry runs and tests. Failures can be injected per station id with
/// [`MemoryStationStore::fail_on`].
#[derive(Debug, Default)]
pub struct MemoryStationStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    stations: Vec<Station>,
    index: HashMap<String, usize>,
    failures: HashMap<String, StoreError>,
}

impl MemoryStationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later upsert of `id` fail with `error`.
    pub fn fail_on(&self, id: impl Into<String>, error: StoreError) {
        self.lock().failures.insert(id.into(), error);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().stations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored ids in natural order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.lock()
            .stations
            .iter()
            .map(|s| s.id().to_string())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn clamp_to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

impl StationStore for MemoryStationStore {
    async fn upsert(&self, station: &Station) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if let Some(err) = inner.failures.get(station.id()) {
            return Err(err.clone());
        }
        if let Some(&pos) = inner.index.get(station.id()) {
            inner.stations[pos] = station.clone();
        } else {
            let pos = inner.stations.len();
            inner.index.insert(station.id().to_string(), pos);
            inner.stations.push(station.clone());
        }
        Ok(())
    }

    async fn count_in_partition(&self, partition_key: &str) -> Result<u64, StoreError> {
        let count = self
            .lock()
            .stations
            .iter()
            .filter(|s| s.partition_key() == partition_key)
            .count();
        Ok(count as u64)
    }

    async fn window_in_partition(
        &self,
        partition_key: &str,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Station>, StoreError> {
        Ok(self
            .lock()
            .stations
            .iter()
            .filter(|s| s.partition_key() == partition_key)
            .skip(clamp_to_usize(skip))
            .take(clamp_to_usize(take))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Station>, StoreError> {
        let inner = self.lock();
        Ok(inner.index.get(id).map(|&pos| inner.stations[pos].clone()))
    }

    async fn positions(&self) -> Result<Vec<StationPosition>, StoreError> {
        Ok(self.lock().stations.iter().map(Station::position).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::{Address, Coordinates};

    fn station(id: &str, postal_code: &str, city: &str) -> Station {
        Station::new(
            id,
            Address {
                street: "Teststrasse 1".to_string(),
                city: city.to_string(),
                postal_code: postal_code.to_string(),
            },
            vec![],
            false,
            Coordinates::new(47.37, 8.54).expect("valid coordinates"),
        )
        .expect("valid station")
    }

    #[tokio::test]
    async fn upsert_overwrites_in_place() {
        let store = MemoryStationStore::new();
        store.upsert(&station("a", "8001", "Zürich")).await.unwrap();
        store.upsert(&station("b", "8002", "Zürich")).await.unwrap();
        store.upsert(&station("a", "8001", "Zurich")).await.unwrap();

        assert_eq!(store.ids(), vec!["a", "b"]);
        let a = store.get_by_id("a").await.unwrap().expect("a exists");
        assert_eq!(a.address().city, "Zurich");
    }

    #[tokio::test]
    async fn window_is_scoped_to_partition() {
        let store = MemoryStationStore::new();
        store.upsert(&station("z1", "8001", "Zürich")).await.unwrap();
        store.upsert(&station("b1", "3011", "Bern")).await.unwrap();
        store.upsert(&station("z2", "8400", "Winterthur")).await.unwrap();
        store.upsert(&station("z3", "8050", "Zürich")).await.unwrap();

        assert_eq!(store.count_in_partition("zurich").await.unwrap(), 3);
        let window = store.window_in_partition("zurich", 1, 5).await.unwrap();
        let ids: Vec<&str> = window.iter().map(Station::id).collect();
        assert_eq!(ids, vec!["z2", "z3"]);
    }

    #[tokio::test]
    async fn missing_id_is_none() {
        let store = MemoryStationStore::new();
        assert!(store.get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn injected_failure_is_returned_and_nothing_is_stored() {
        let store = MemoryStationStore::new();
        store.fail_on("bad", StoreError::RateLimited { retry_after_ms: Some(50) });
        let err = store.upsert(&station("bad", "8001", "Zürich")).await.unwrap_err();
        assert!(err.is_rate_limited());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn positions_cover_every_partition() {
        let store = MemoryStationStore::new();
        store.upsert(&station("z1", "8001", "Zürich")).await.unwrap();
        store.upsert(&station("x1", "abc", "Nowhere")).await.unwrap();
        let positions = store.positions().await.unwrap();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[1].id, "x1");
    }
}
