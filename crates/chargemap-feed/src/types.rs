//! Operator feed shapes as published by the charging-station data hub.
//!
//! ## Observed shape
//!
//! The document is `{ "EVSEData": [ operator, ... ] }`. Each operator carries
//! `OperatorID`, `OperatorName` and an `EVSEDataRecord` array which may be
//! absent or `null` for operators without published stations.
//!
//! Records are kept as raw JSON on the operator and decoded one at a time so
//! that a single bad record does not take its siblings down with it.
//!
//! ### `GeoCoordinates.Google`
//! A single string `"<lat> <lon>"` with `.` as the decimal separator.
//! `"0 0"` is used for stations without a known position.
//!
//! ### `ChargingStationNames`
//! Lowercase `lang` / `value` keys, unlike the rest of the record.
//! Values are sometimes empty strings.
//!
//! ### `IsOpen24Hours`
//! Boolean; occasionally missing or `null`, treated as `false`.
//!
//! ### Key casing
//! Some mirrors re-serialise the feed with lower-camel keys
//! (`chargingStationId`, `geoCoordinates`). Both spellings are accepted.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RawOperator {
    #[serde(rename = "OperatorID", alias = "operatorID", alias = "operatorId")]
    pub operator_id: Option<String>,

    #[serde(rename = "OperatorName", alias = "operatorName")]
    pub operator_name: Option<String>,

    #[serde(rename = "EVSEDataRecord", alias = "evseDataRecord")]
    pub records: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "ChargingStationId", alias = "chargingStationId")]
    pub charging_station_id: Option<String>,

    #[serde(rename = "EvseID", alias = "EvseId", alias = "evseID", alias = "evseId")]
    pub evse_id: Option<String>,

    #[serde(rename = "ChargingStationNames", alias = "chargingStationNames")]
    pub names: Option<Vec<RawName>>,

    #[serde(rename = "Address", alias = "address")]
    pub address: Option<RawAddress>,

    #[serde(rename = "IsOpen24Hours", alias = "isOpen24Hours")]
    pub is_open_24_hours: Option<bool>,

    #[serde(rename = "GeoCoordinates", alias = "geoCoordinates")]
    pub geo_coordinates: Option<RawGeoCoordinates>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawName {
    #[serde(alias = "Lang")]
    pub lang: Option<String>,

    #[serde(alias = "Value")]
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAddress {
    #[serde(rename = "Street", alias = "street")]
    pub street: Option<String>,

    #[serde(rename = "City", alias = "city")]
    pub city: Option<String>,

    #[serde(rename = "PostalCode", alias = "postalCode")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawGeoCoordinates {
    #[serde(rename = "Google", alias = "google")]
    pub google: Option<String>,
}
