//! Mapping from one raw feed record to a canonical [`Station`].
//!
//! Every field goes through its own fallback chain so the defaults can be
//! tested in isolation. Coordinates are the only hard requirement; a record
//! without a usable position is rejected.

use chargemap_core::{Address, Station, StationName, DEFAULT_NAME_LANG, UNKNOWN_PLACEHOLDER};

use crate::error::RejectReason;
use crate::parse::{first_non_blank, non_blank_or, parse_coordinates};
use crate::types::{RawAddress, RawName, RawRecord};

/// Convert a raw record into a [`Station`], or say why it was rejected.
///
/// # Errors
///
/// Returns a [`RejectReason`] when the coordinate string is missing, is the
/// `"0 0"` marker, does not parse, or has a zero axis.
pub fn map_record(raw: RawRecord) -> Result<Station, RejectReason> {
    let google = raw
        .geo_coordinates
        .as_ref()
        .and_then(|g| g.google.as_deref())
        .unwrap_or_default();
    let coordinates = parse_coordinates(google)?;

    let id = select_id(&raw);
    let names = normalize_names(raw.names);
    let address = normalize_address(raw.address);

    Station::new(
        id,
        address,
        names,
        raw.is_open_24_hours.unwrap_or(false),
        coordinates,
    )
    .map_err(|_| RejectReason::InvalidStation)
}

/// [`map_record`] with the reason discarded; `None` means "skip this record".
#[must_use]
pub fn map_to_station(raw: RawRecord) -> Option<Station> {
    map_record(raw).ok()
}

/// `ChargingStationId`, then `EvseID`, then a fresh v4 UUID.
fn select_id(raw: &RawRecord) -> String {
    first_non_blank([raw.charging_station_id.as_deref(), raw.evse_id.as_deref()])
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string)
}

fn normalize_names(raw: Option<Vec<RawName>>) -> Vec<StationName> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|name| {
            let value = name.value.filter(|v| !v.trim().is_empty())?;
            Some(StationName {
                lang: non_blank_or(name.lang, DEFAULT_NAME_LANG),
                value,
            })
        })
        .collect()
}

fn normalize_address(raw: Option<RawAddress>) -> Address {
    let raw = raw.unwrap_or_default();
    Address {
        street: non_blank_or(raw.street, UNKNOWN_PLACEHOLDER),
        city: non_blank_or(raw.city, UNKNOWN_PLACEHOLDER),
        postal_code: non_blank_or(
            raw.postal_code.map(|p| p.trim().to_string()),
            UNKNOWN_PLACEHOLDER,
        ),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
