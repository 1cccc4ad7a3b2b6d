pub mod error;
pub mod feed;
pub mod normalize;
pub mod parse;
pub mod pipeline;
pub mod types;

pub use error::{FeedError, RejectReason};
pub use feed::{parse_feed, FeedStats, ParsedFeed};
pub use normalize::{map_record, map_to_station};
pub use pipeline::{ingest, ingest_parsed, write_batches, IngestOptions, IngestionReport, WriteTally};
pub use types::{RawAddress, RawGeoCoordinates, RawName, RawOperator, RawRecord};
