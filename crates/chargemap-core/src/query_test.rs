use super::*;
use crate::station::{Address, Coordinates};
use crate::store::MemoryStationStore;

fn station(id: &str, postal_code: &str) -> Station {
    Station::new(
        id,
        Address {
            street: format!("Street {id}"),
            city: "City".to_string(),
            postal_code: postal_code.to_string(),
        },
        vec![],
        false,
        Coordinates::new(47.0, 8.0).expect("valid coordinates"),
    )
    .expect("valid station")
}

/// 25 stations in `zurich` plus a few elsewhere.
async fn seeded_store() -> MemoryStationStore {
    let store = MemoryStationStore::new();
    for n in 0..25 {
        store
            .upsert(&station(&format!("zh-{n:02}"), &format!("80{n:02}")))
            .await
            .unwrap();
        if n % 10 == 0 {
            store
                .upsert(&station(&format!("be-{n:02}"), "3011"))
                .await
                .unwrap();
        }
    }
    store
}

fn page(page: i64, size: i64) -> PageRequest {
    PageRequest::new(page, size, 100).expect("valid page request")
}

#[tokio::test]
async fn first_page_is_full_with_next_page() {
    let store = seeded_store().await;
    let result = query_by_partition(&store, "zurich", page(1, 10)).await.unwrap();

    assert_eq!(result.items.len(), 10);
    assert_eq!(result.total_count, 25);
    assert_eq!(result.total_pages, 3);
    assert!(!result.has_previous_page);
    assert!(result.has_next_page);
    assert_eq!(result.items[0].id(), "zh-00");
}

#[tokio::test]
async fn last_page_is_partial() {
    let store = seeded_store().await;
    let result = query_by_partition(&store, "zurich", page(3, 10)).await.unwrap();

    assert_eq!(result.items.len(), 5);
    assert!(!result.has_next_page);
    assert!(result.has_previous_page);
    assert_eq!(result.items[0].id(), "zh-20");
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_an_error() {
    let store = seeded_store().await;
    let result = query_by_partition(&store, "zurich", page(4, 10)).await.unwrap();

    assert!(result.items.is_empty());
    assert_eq!(result.total_count, 25);
    assert!(!result.has_next_page);
    assert!(result.has_previous_page);
}

#[tokio::test]
async fn pages_do_not_overlap() {
    let store = seeded_store().await;
    let mut seen = Vec::new();
    for p in 1..=3 {
        let result = query_by_partition(&store, "zurich", page(p, 10)).await.unwrap();
        seen.extend(result.items.into_iter().map(|s| s.id().to_string()));
    }
    let mut deduped = seen.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(seen.len(), 25);
    assert_eq!(deduped.len(), 25);
}

#[tokio::test]
async fn empty_partition_returns_empty_page() {
    let store = seeded_store().await;
    let result = query_by_partition(&store, "east", page(1, 10)).await.unwrap();

    assert!(result.items.is_empty());
    assert_eq!(result.total_count, 0);
    assert_eq!(result.total_pages, 0);
    assert!(!result.has_next_page);
    assert!(!result.has_previous_page);
}

#[tokio::test]
async fn postal_code_query_uses_its_partition() {
    let store = seeded_store().await;
    let result = query_by_postal_code(&store, "3000", page(1, 10)).await.unwrap();

    assert_eq!(result.total_count, 3);
    assert!(result.items.iter().all(|s| s.partition_key() == "bern-fribourg"));
}

#[tokio::test]
async fn query_by_id_finds_and_misses() {
    let store = seeded_store().await;
    let found = query_by_id(&store, "be-10").await.unwrap();
    assert_eq!(found.map(|s| s.id().to_string()), Some("be-10".to_string()));
    assert!(query_by_id(&store, "missing").await.unwrap().is_none());
}

#[tokio::test]
async fn positions_include_all_partitions() {
    let store = seeded_store().await;
    let positions = query_positions(&store).await.unwrap();
    assert_eq!(positions.len(), 28);
}

#[test]
fn invalid_input_is_classified() {
    assert!(QueryError::InvalidPage(0).is_invalid_input());
    assert!(QueryError::InvalidPageSize {
        requested: 500,
        max: 100
    }
    .is_invalid_input());
    assert!(!QueryError::Store(StoreError::Backend("down".to_string())).is_invalid_input());
}
