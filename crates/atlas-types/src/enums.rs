//! Enumeration types for the timeline atlas.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Date precision
// ---------------------------------------------------------------------------

/// How much of a fuzzy date value is meaningful.
///
/// The data source tags each date with the precision it was recorded at.
/// Anything coarser than a day is anchored to the first instant of the
/// period (January 1 for `Year`, the 1st for `Month`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum DateResolution {
    /// Only the year is known.
    Year,
    /// Year and month are known.
    Month,
    /// Full calendar date.
    Day,
    /// Date plus hour.
    Hour,
    /// Date plus hour and minute.
    Minute,
    /// Full timestamp.
    Second,
}

impl DateResolution {
    /// Return the lowercase tag used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }

    /// Parse a wire tag, case-insensitively. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "year" => Some(Self::Year),
            "month" => Some(Self::Month),
            "day" => Some(Self::Day),
            "hour" => Some(Self::Hour),
            "minute" => Some(Self::Minute),
            "second" => Some(Self::Second),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Display item kind
// ---------------------------------------------------------------------------

/// How the timeline widget should draw an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ItemKind {
    /// An instantaneous marker at the start instant.
    Point,
    /// A bar spanning the start and end instants.
    Range,
}
