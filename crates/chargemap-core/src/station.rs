//! The canonical charging-station record and its read projections.

use serde::{Deserialize, Serialize};

use crate::partition::partition_key_for;
use crate::CoreError;

/// Stand-in for address fields the feed leaves out.
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// Language tag assumed for station names that carry none.
pub const DEFAULT_NAME_LANG: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl Address {
    /// Single-line display form: `"street, postal city"`.
    ///
    /// The postal code is omitted when it is `"0"` or the placeholder, since
    /// neither carries any information for a reader.
    #[must_use]
    pub fn formatted(&self) -> String {
        let postal = self.postal_code.trim();
        if postal.is_empty() || postal == "0" || postal == UNKNOWN_PLACEHOLDER {
            format!("{}, {}", self.street, self.city)
        } else {
            format!("{}, {} {}", self.street, postal, self.city)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationName {
    pub lang: String,
    pub value: String,
}

/// A latitude/longitude pair that is finite and non-zero on both axes.
///
/// Zero is the feed's "no position" marker, so it is never a valid value here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinatesDocument")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let usable = |v: f64| v.is_finite() && v != 0.0;
        (usable(latitude) && usable(longitude)).then_some(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Deserialize)]
struct CoordinatesDocument {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<CoordinatesDocument> for Coordinates {
    type Error = String;

    fn try_from(doc: CoordinatesDocument) -> Result<Self, Self::Error> {
        Coordinates::new(doc.latitude, doc.longitude).ok_or_else(|| {
            format!(
                "coordinates ({}, {}) must be finite and non-zero",
                doc.latitude, doc.longitude
            )
        })
    }
}

/// A normalized, validated charging station.
///
/// The partition key is fixed when the station is built and never recomputed,
/// so a stored station keeps its shard even if the region table changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StationDocument")]
pub struct Station {
    id: String,
    partition_key: String,
    address: Address,
    names: Vec<StationName>,
    is_open_24_hours: bool,
    coordinates: Coordinates,
}

impl Station {
    /// Build a fresh station, deriving its partition key from the postal code.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyId`] if `id` is blank.
    pub fn new(
        id: impl Into<String>,
        address: Address,
        names: Vec<StationName>,
        is_open_24_hours: bool,
        coordinates: Coordinates,
    ) -> Result<Self, CoreError> {
        let partition_key = partition_key_for(&address.postal_code).to_string();
        Self::restore(
            id,
            partition_key,
            address,
            names,
            is_open_24_hours,
            coordinates,
        )
    }

    /// Rebuild a station from persisted parts, keeping its stored partition key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyId`] or [`CoreError::EmptyPartitionKey`] when
    /// either key is blank.
    pub fn restore(
        id: impl Into<String>,
        partition_key: impl Into<String>,
        address: Address,
        names: Vec<StationName>,
        is_open_24_hours: bool,
        coordinates: Coordinates,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::EmptyId);
        }
        let partition_key = partition_key.into();
        if partition_key.trim().is_empty() {
            return Err(CoreError::EmptyPartitionKey { id });
        }
        Ok(Self {
            id,
            partition_key,
            address,
            names,
            is_open_24_hours,
            coordinates,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }

    #[must_use]
    pub fn names(&self) -> &[StationName] {
        &self.names
    }

    #[must_use]
    pub fn is_open_24_hours(&self) -> bool {
        self.is_open_24_hours
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    #[must_use]
    pub fn position(&self) -> StationPosition {
        StationPosition {
            id: self.id.clone(),
            latitude: self.coordinates.latitude,
            longitude: self.coordinates.longitude,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StationDocument {
    id: String,
    partition_key: String,
    address: Address,
    #[serde(default)]
    names: Vec<StationName>,
    #[serde(default)]
    is_open_24_hours: bool,
    coordinates: Coordinates,
}

impl TryFrom<StationDocument> for Station {
    type Error = CoreError;

    fn try_from(doc: StationDocument) -> Result<Self, Self::Error> {
        Station::restore(
            doc.id,
            doc.partition_key,
            doc.address,
            doc.names,
            doc.is_open_24_hours,
            doc.coordinates,
        )
    }
}

/// Lightweight id + position projection used to draw map markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPosition {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Flattened station shape for search results and detail lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSummary {
    pub id: String,
    pub name: String,
    pub address: String,
    pub is_open_24_hours: bool,
}

impl From<&Station> for StationSummary {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id.clone(),
            name: station
                .names
                .first()
                .map_or_else(|| UNKNOWN_PLACEHOLDER.to_string(), |n| n.value.clone()),
            address: station.address.formatted(),
            is_open_24_hours: station.is_open_24_hours,
        }
    }
}

impl From<Station> for StationSummary {
    fn from(station: Station) -> Self {
        StationSummary::from(&station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bern_address() -> Address {
        Address {
            street: "Bundesplatz 3".to_string(),
            city: "Bern".to_string(),
            postal_code: "3005".to_string(),
        }
    }

    fn coords() -> Coordinates {
        Coordinates::new(46.95, 7.44).expect("valid coordinates")
    }

    #[test]
    fn coordinates_reject_zero_and_non_finite() {
        assert!(Coordinates::new(0.0, 7.44).is_none());
        assert!(Coordinates::new(46.95, 0.0).is_none());
        assert!(Coordinates::new(f64::NAN, 7.44).is_none());
        assert!(Coordinates::new(46.95, f64::INFINITY).is_none());
        assert!(Coordinates::new(-33.9, -70.6).is_some());
    }

    #[test]
    fn new_derives_partition_key_from_postal_code() {
        let station = Station::new("CH-1", bern_address(), vec![], false, coords()).unwrap();
        assert_eq!(station.partition_key(), "bern-fribourg");
    }

    #[test]
    fn new_rejects_blank_id() {
        let err = Station::new("  ", bern_address(), vec![], false, coords()).unwrap_err();
        assert_eq!(err, CoreError::EmptyId);
    }

    #[test]
    fn restore_keeps_persisted_partition_key() {
        let station = Station::restore(
            "CH-1",
            "legacy-bucket",
            bern_address(),
            vec![],
            true,
            coords(),
        )
        .unwrap();
        assert_eq!(station.partition_key(), "legacy-bucket");
    }

    #[test]
    fn restore_rejects_blank_partition_key() {
        let err = Station::restore("CH-1", "", bern_address(), vec![], true, coords()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyPartitionKey { ref id } if id == "CH-1"));
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let station = Station::new(
            "CH-1",
            bern_address(),
            vec![StationName {
                lang: "de".to_string(),
                value: "Bundesplatz".to_string(),
            }],
            true,
            coords(),
        )
        .unwrap();
        let json = serde_json::to_value(&station).unwrap();
        assert_eq!(json["partitionKey"], "bern-fribourg");
        assert_eq!(json["isOpen24Hours"], true);
        assert_eq!(json["address"]["postalCode"], "3005");
        assert_eq!(json["coordinates"]["latitude"], 46.95);
        assert_eq!(json["names"][0]["lang"], "de");
    }

    #[test]
    fn deserialization_enforces_invariants() {
        let zero_coords = serde_json::json!({
            "id": "CH-1",
            "partitionKey": "bern-fribourg",
            "address": { "street": "a", "city": "b", "postalCode": "3005" },
            "coordinates": { "latitude": 0.0, "longitude": 7.44 }
        });
        assert!(serde_json::from_value::<Station>(zero_coords).is_err());

        let blank_id = serde_json::json!({
            "id": "",
            "partitionKey": "bern-fribourg",
            "address": { "street": "a", "city": "b", "postalCode": "3005" },
            "coordinates": { "latitude": 46.95, "longitude": 7.44 }
        });
        assert!(serde_json::from_value::<Station>(blank_id).is_err());
    }

    #[test]
    fn summary_uses_first_name_and_formatted_address() {
        let station = Station::new(
            "CH-1",
            bern_address(),
            vec![
                StationName {
                    lang: "de".to_string(),
                    value: "Ladestation Bundesplatz".to_string(),
                },
                StationName {
                    lang: "fr".to_string(),
                    value: "Borne Place Fédérale".to_string(),
                },
            ],
            true,
            coords(),
        )
        .unwrap();
        let summary = StationSummary::from(&station);
        assert_eq!(summary.name, "Ladestation Bundesplatz");
        assert_eq!(summary.address, "Bundesplatz 3, 3005 Bern");
        assert!(summary.is_open_24_hours);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["isOpen24Hours"], true);
    }

    #[test]
    fn summary_without_names_is_unknown() {
        let station = Station::new("CH-1", bern_address(), vec![], false, coords()).unwrap();
        assert_eq!(StationSummary::from(station).name, UNKNOWN_PLACEHOLDER);
    }

    #[test]
    fn formatted_address_omits_meaningless_postal_codes() {
        let mut address = bern_address();
        address.postal_code = "0".to_string();
        assert_eq!(address.formatted(), "Bundesplatz 3, Bern");
        address.postal_code = UNKNOWN_PLACEHOLDER.to_string();
        assert_eq!(address.formatted(), "Bundesplatz 3, Bern");
    }

    #[test]
    fn position_projects_id_and_coordinates() {
        let station = Station::new("CH-1", bern_address(), vec![], false, coords()).unwrap();
        let position = station.position();
        assert_eq!(position.id, "CH-1");
        assert!((position.latitude - 46.95).abs() < f64::EPSILON);
        assert!((position.longitude - 7.44).abs() < f64::EPSILON);
    }
}
