//! Field-level parsing helpers for feed records.
//!
//! Each helper is one link of a fallback chain and is tested on its own;
//! [`crate::normalize`] only strings them together.

use chargemap_core::Coordinates;

use crate::error::RejectReason;

/// The feed's explicit "no position" value.
pub const NO_DATA_SENTINEL: &str = "0 0";

/// Parse one decimal coordinate token.
///
/// Uses `.` as the decimal separator regardless of locale. Anything that is
/// not a finite number becomes `0.0`, which later fails the zero check.
#[must_use]
pub fn parse_coordinate_token(token: &str) -> f64 {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse a `"<lat> <lon>"` coordinate string.
///
/// Tokens are split on whitespace; anything after the second token is
/// ignored.
///
/// # Errors
///
/// Returns the [`RejectReason`] for blank strings, the `"0 0"` marker,
/// strings with fewer than two tokens, and zero or unparsable axes.
pub fn parse_coordinates(raw: &str) -> Result<Coordinates, RejectReason> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RejectReason::MissingCoordinates);
    }
    if raw == NO_DATA_SENTINEL {
        return Err(RejectReason::NoDataSentinel);
    }

    let mut tokens = raw.split_whitespace();
    let (Some(lat), Some(lon)) = (tokens.next(), tokens.next()) else {
        return Err(RejectReason::MalformedCoordinates);
    };

    Coordinates::new(parse_coordinate_token(lat), parse_coordinate_token(lon))
        .ok_or(RejectReason::ZeroCoordinate)
}

/// Return the first candidate that is present and not blank.
pub fn first_non_blank<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

/// `value` if present and not blank, else `default`.
#[must_use]
pub fn non_blank_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
