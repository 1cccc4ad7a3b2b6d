use thiserror::Error;

/// Problems that abort a whole ingestion run before anything is written.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed is empty")]
    Empty,

    #[error("feed is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("feed has no EVSEData operator list")]
    MissingOperatorList,
}

/// Why a single feed record did not become a station.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RejectReason {
    #[error("coordinate string is missing or blank")]
    MissingCoordinates,

    #[error("coordinate string is the \"0 0\" no-data marker")]
    NoDataSentinel,

    #[error("coordinate string does not hold two tokens")]
    MalformedCoordinates,

    #[error("latitude or longitude is zero or unparsable")]
    ZeroCoordinate,

    #[error("record does not form a valid station")]
    InvalidStation,
}
