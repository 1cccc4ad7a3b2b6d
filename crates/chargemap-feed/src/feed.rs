//! Whole-feed parsing: operator walk, record mapping, dedup and cap.
//!
//! Only a blob that is not a JSON document with an `EVSEData` array is fatal.
//! Bad operators and bad records are counted in [`FeedStats`] and skipped.

use std::collections::HashSet;

use chargemap_core::Station;
use serde::{Deserialize, Serialize};

use crate::error::FeedError;
use crate::normalize::map_record;
use crate::types::{RawOperator, RawRecord};

const OPERATOR_LIST_KEY: &str = "EVSEData";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Counters gathered while walking one feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub operators_seen: usize,
    pub operators_skipped: usize,
    pub records_seen: usize,
    /// Records that did not decode as a record object.
    pub records_malformed: usize,
    /// Records that decoded but were refused by the mapper.
    pub records_rejected: usize,
    pub duplicates_dropped: usize,
    /// Unique stations, before any cap.
    pub stations_parsed: usize,
    /// Stations dropped by the cap.
    pub capped: usize,
}

#[derive(Debug)]
pub struct ParsedFeed {
    /// Deduplicated stations in feed order.
    pub stations: Vec<Station>,
    pub stats: FeedStats,
}

/// Parse a raw feed blob into unique stations.
///
/// The first record to claim an id wins; later records with the same id are
/// dropped, across operators too. `max_stations` keeps only the front of the
/// deduplicated list. A leading UTF-8 byte-order mark is ignored.
///
/// # Errors
///
/// Returns [`FeedError::Empty`] for a blank blob, [`FeedError::Json`] when
/// the blob is not JSON, and [`FeedError::MissingOperatorList`] when the
/// top-level `EVSEData` array is absent.
pub fn parse_feed(bytes: &[u8], max_stations: Option<usize>) -> Result<ParsedFeed, FeedError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(FeedError::Empty);
    }

    let document: serde_json::Value = serde_json::from_slice(bytes)?;
    let operators = match operator_list(&document) {
        Some(serde_json::Value::Array(operators)) => operators,
        _ => return Err(FeedError::MissingOperatorList),
    };

    let mut stats = FeedStats::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut stations = Vec::new();

    for (index, value) in operators.iter().enumerate() {
        stats.operators_seen += 1;

        let operator = match RawOperator::deserialize(value) {
            Ok(op) => op,
            Err(e) => {
                tracing::warn!(
                    operator_index = index,
                    error = %e,
                    "skipping malformed operator"
                );
                stats.operators_skipped += 1;
                continue;
            }
        };
        let operator_id = operator.operator_id.as_deref().unwrap_or("<none>");

        for record in operator.records.iter().flatten() {
            stats.records_seen += 1;

            let raw = match RawRecord::deserialize(record) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(operator_id, error = %e, "skipping malformed record");
                    stats.records_malformed += 1;
                    continue;
                }
            };

            let station = match map_record(raw) {
                Ok(station) => station,
                Err(reason) => {
                    tracing::debug!(operator_id, %reason, "record rejected");
                    stats.records_rejected += 1;
                    continue;
                }
            };

            if seen.insert(station.id().to_string()) {
                stations.push(station);
            } else {
                tracing::debug!(
                    operator_id,
                    station_id = station.id(),
                    "duplicate station dropped"
                );
                stats.duplicates_dropped += 1;
            }
        }
    }

    stats.stations_parsed = stations.len();
    if let Some(cap) = max_stations {
        if stations.len() > cap {
            stats.capped = stations.len() - cap;
            stations.truncate(cap);
        }
    }

    Ok(ParsedFeed { stations, stats })
}

/// The top-level operator list, matching the key without regard to case.
fn operator_list(document: &serde_json::Value) -> Option<&serde_json::Value> {
    document
        .as_object()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(OPERATOR_LIST_KEY))
        .map(|(_, value)| value)
}
