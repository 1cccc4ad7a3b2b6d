//! Offline tests for chargemap-db pool configuration and row mapping.
//! These tests do not require a live database connection.

use chargemap_core::{AppConfig, Environment, StationName, StoreError};
use chargemap_db::{PoolConfig, StationRow};
use chrono::Utc;
use sqlx::types::Json;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        feed_path: PathBuf::from("./data/charging-stations.json"),
        feed_request_timeout_secs: 30,
        ingest_batch_size: 50,
        ingest_max_stations: None,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        query_default_page_size: 10,
        query_max_page_size: 100,
        rate_limit_max_requests: 120,
        rate_limit_window_secs: 60,
    }
}

fn row(latitude: f64, partition_key: &str) -> StationRow {
    StationRow {
        id: "CH-ZH-1".to_string(),
        seq: 1,
        partition_key: partition_key.to_string(),
        street: "Limmatquai 1".to_string(),
        city: "Zürich".to_string(),
        postal_code: "8001".to_string(),
        names: Json(vec![StationName {
            lang: "de".to_string(),
            value: "Rathaus".to_string(),
        }]),
        is_open_24_hours: true,
        latitude,
        longitude: 8.54,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn row_converts_to_station_keeping_stored_partition() {
    // A stored key wins over whatever the postal code would map to today.
    let station = row(47.37, "legacy-zone").into_station().unwrap();

    assert_eq!(station.id(), "CH-ZH-1");
    assert_eq!(station.partition_key(), "legacy-zone");
    assert_eq!(station.names()[0].value, "Rathaus");
    assert!(station.is_open_24_hours());
}

#[test]
fn row_with_zero_coordinate_is_corrupt() {
    let err = row(0.0, "zurich").into_station().unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { ref id, .. } if id == "CH-ZH-1"));
}

#[test]
fn row_with_blank_partition_is_corrupt() {
    let err = row(47.37, " ").into_station().unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}
