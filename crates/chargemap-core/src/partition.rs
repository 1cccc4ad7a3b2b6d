//! Postal-code partitioning.
//!
//! Stations are sharded by the leading digit of their four-digit Swiss postal
//! code. Each thousand-block maps to one coarse region; anything that is not
//! an integer inside `1000..=9999` lands in [`FALLBACK_PARTITION`].

use serde::{Deserialize, Serialize};

/// Bucket for postal codes that are blank, non-numeric, or out of range.
pub const FALLBACK_PARTITION: &str = "other";

/// Regional buckets, one per postal thousand-block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    WestSouth,
    WestNorth,
    BernFribourg,
    Basel,
    Aargau,
    CentralTicino,
    Graubuenden,
    Zurich,
    East,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::WestSouth,
        Region::WestNorth,
        Region::BernFribourg,
        Region::Basel,
        Region::Aargau,
        Region::CentralTicino,
        Region::Graubuenden,
        Region::Zurich,
        Region::East,
    ];

    /// The partition key stored alongside every station in this region.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Region::WestSouth => "west-south",
            Region::WestNorth => "west-north",
            Region::BernFribourg => "bern-fribourg",
            Region::Basel => "basel",
            Region::Aargau => "aargau",
            Region::CentralTicino => "central-ticino",
            Region::Graubuenden => "graubuenden",
            Region::Zurich => "zurich",
            Region::East => "east",
        }
    }

    /// Look up the region for a numeric postal code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Region> {
        match code {
            1000..=1999 => Some(Region::WestSouth),
            2000..=2999 => Some(Region::WestNorth),
            3000..=3999 => Some(Region::BernFribourg),
            4000..=4999 => Some(Region::Basel),
            5000..=5999 => Some(Region::Aargau),
            6000..=6999 => Some(Region::CentralTicino),
            7000..=7999 => Some(Region::Graubuenden),
            8000..=8999 => Some(Region::Zurich),
            9000..=9999 => Some(Region::East),
            _ => None,
        }
    }

    /// Look up the region for a raw postal code string.
    ///
    /// Surrounding whitespace and a leading sign are accepted; anything else
    /// that does not parse as an integer yields `None`.
    #[must_use]
    pub fn from_postal_code(postal_code: &str) -> Option<Region> {
        let trimmed = postal_code.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<i64>().ok().and_then(Region::from_code)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a postal code to its partition key. Total: never fails.
#[must_use]
pub fn partition_key_for(postal_code: &str) -> &'static str {
    Region::from_postal_code(postal_code).map_or(FALLBACK_PARTITION, Region::label)
}
