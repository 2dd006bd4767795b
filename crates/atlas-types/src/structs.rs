//! Core record and payload structs for the timeline atlas.
//!
//! Covers the records consumed from the data source ([`Event`],
//! [`Category`], [`FuzzyDate`]), the viewport inputs supplied by the
//! rendering widgets ([`VisibleWindow`], [`GeoBounds`]), and the payloads
//! handed back to the timeline widget ([`DisplayItem`], [`DisplayGroup`]).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DateResolution, ItemKind};
use crate::ids::{CategoryId, EventId};

// ---------------------------------------------------------------------------
// Fuzzy dates
// ---------------------------------------------------------------------------

/// A date as recorded by the data source: a textual value plus an optional
/// precision tag.
///
/// `value` is ISO-like (`"1943-06-01"`, `"+1943-06-01T00:00:00Z"`,
/// `"-0060"`, `"\u{2212}44-03"`) and may carry only year or year-month
/// precision. The resolution tag is kept as free text so an unknown tag
/// never rejects the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FuzzyDate {
    /// Textual date value.
    pub value: String,
    /// Precision tag (`year`, `month`, `day`, ...), if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl FuzzyDate {
    /// Create a fuzzy date with no precision tag.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            resolution: None,
        }
    }

    /// Create a fuzzy date with an explicit precision.
    pub fn with_resolution(value: impl Into<String>, resolution: DateResolution) -> Self {
        Self {
            value: value.into(),
            resolution: Some(resolution.as_str().to_owned()),
        }
    }

    /// The parsed precision tag, or `None` if absent or unrecognized.
    pub fn resolution(&self) -> Option<DateResolution> {
        self.resolution.as_deref().and_then(DateResolution::from_tag)
    }
}

// ---------------------------------------------------------------------------
// Events and categories
// ---------------------------------------------------------------------------

/// A historical event as supplied by the data source.
///
/// Treated as immutable by the layout core. Every temporal field is
/// optional; an event with no resolvable date is silently left out of
/// timeline processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Unique event identity.
    pub id: EventId,
    /// Category used for grouping and coloring only.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Primary display title.
    #[serde(default)]
    pub title: String,
    /// Longer description shown in tooltips.
    #[serde(default)]
    pub description: String,
    /// Fallback display text used when `title` is blank. The events API
    /// sends it as `wikipedia_title`.
    #[serde(default, alias = "wikipedia_title")]
    pub alternate_title: String,
    /// Instant the event happened, for events without a duration.
    #[serde(default)]
    pub point_in_time: Option<FuzzyDate>,
    /// Start of the event.
    #[serde(default)]
    pub start_time: Option<FuzzyDate>,
    /// End of the event.
    #[serde(default)]
    pub end_time: Option<FuzzyDate>,
    /// Human-readable place name.
    #[serde(default)]
    pub location_name: String,
    /// Latitude in degrees.
    #[serde(default)]
    pub location_lat: Option<f64>,
    /// Longitude in degrees.
    #[serde(default)]
    pub location_lon: Option<f64>,
    /// Importance in `[0, 1]`; `None` ranks below every measured score.
    #[serde(default)]
    pub importance_score: Option<f64>,
}

impl Event {
    /// Create an event carrying only an id and a title.
    ///
    /// Mostly useful for tests and fixtures; all other fields are empty.
    pub fn new(id: EventId, title: impl Into<String>) -> Self {
        Self {
            id,
            category_id: None,
            title: title.into(),
            description: String::new(),
            alternate_title: String::new(),
            point_in_time: None,
            start_time: None,
            end_time: None,
            location_name: String::new(),
            location_lat: None,
            location_lon: None,
            importance_score: None,
        }
    }

    /// The best available display title: `title`, then `alternate_title`,
    /// then a generic `Event <id>` label.
    pub fn display_title(&self) -> String {
        let title = self.title.trim();
        if !title.is_empty() {
            return title.to_owned();
        }
        let alternate = self.alternate_title.trim();
        if !alternate.is_empty() {
            return alternate.to_owned();
        }
        format!("Event {}", self.id)
    }

    /// Finite `(lat, lon)` coordinates, if both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.location_lat, self.location_lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// An event category as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Category {
    /// Unique category identity.
    pub id: CategoryId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Fallback label used when `name` is blank. The categories API sends
    /// it as `wikidata_id`.
    #[serde(default, alias = "wikidata_id")]
    pub alternate_label: String,
}

// ---------------------------------------------------------------------------
// Viewport inputs
// ---------------------------------------------------------------------------

/// The caller's current temporal viewport, in milliseconds since the Unix
/// epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisibleWindow {
    /// Left edge of the viewport.
    #[ts(type = "number")]
    pub start_ms: i64,
    /// Right edge of the viewport.
    #[ts(type = "number")]
    pub end_ms: i64,
}

impl VisibleWindow {
    /// Create a window, ordering the endpoints so the span is never negative.
    pub const fn new(a_ms: i64, b_ms: i64) -> Self {
        if a_ms <= b_ms {
            Self {
                start_ms: a_ms,
                end_ms: b_ms,
            }
        } else {
            Self {
                start_ms: b_ms,
                end_ms: a_ms,
            }
        }
    }

    /// Width of the window in milliseconds (saturating, never negative).
    pub const fn span_ms(&self) -> i64 {
        let span = self.end_ms.saturating_sub(self.start_ms);
        if span < 0 { 0 } else { span }
    }

    /// Whether the closed interval `[start_ms, end_ms]` touches this window.
    pub const fn overlaps(&self, start_ms: i64, end_ms: i64) -> bool {
        start_ms <= self.end_ms && end_ms >= self.start_ms
    }
}

/// A rectangular geographic bound reported by the map widget.
///
/// When `west > east` the bound crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeoBounds {
    /// Southern latitude edge in degrees.
    pub south: f64,
    /// Western longitude edge in degrees.
    pub west: f64,
    /// Northern latitude edge in degrees.
    pub north: f64,
    /// Eastern longitude edge in degrees.
    pub east: f64,
}

// ---------------------------------------------------------------------------
// Rendering payloads
// ---------------------------------------------------------------------------

/// A positioned item for the timeline widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DisplayItem {
    /// The source event's id.
    pub id: EventId,
    /// Label text; empty when the label is suppressed.
    pub content: String,
    /// Start instant as an ISO 8601 string (signed years for BCE).
    pub start_iso: String,
    /// End instant for range items; absent for point markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_iso: Option<String>,
    /// Point marker or range bar.
    pub kind: ItemKind,
    /// Key of the [`DisplayGroup`] this item belongs to.
    pub group_key: String,
    /// Full hover text (title, dates, place, description).
    pub tooltip: String,
    /// Inline style for the widget (category color).
    pub style_hint: String,
}

/// A row/group on the timeline, one per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DisplayGroup {
    /// Group key referenced by [`DisplayItem::group_key`].
    pub key: String,
    /// Human-readable group label.
    pub label: String,
    /// Inline style for the group header (category color).
    pub style_hint: String,
    /// Position of the group, ascending.
    pub order: u32,
}
