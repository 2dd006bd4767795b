//! Conversion of admitted events into timeline widget items.
//!
//! Pure mapping, no selection logic: extent, point-vs-range, group key,
//! category color, label, and tooltip.

use atlas_types::{CategoryId, DisplayItem, Event, ItemKind};
use chrono::{DateTime, Datelike};

use crate::config::DisplayOptions;
use crate::temporal::{TemporalExtent, display_extent_of, to_iso};

/// Group key for events without a category.
pub const UNCATEGORIZED_KEY: &str = "uncategorized";

/// Display group key for an optional category.
pub fn group_key(category_id: Option<CategoryId>) -> String {
    category_id.map_or_else(|| UNCATEGORIZED_KEY.to_owned(), |id| id.to_string())
}

/// Deterministic hue in `[0, 360)` for a group key (FNV-1a).
pub fn hue_for_key(key: &str) -> u16 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    let hash = key.bytes().fold(FNV_OFFSET, |acc, byte| {
        (acc ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    });
    // Always < 360.
    u16::try_from(hash.checked_rem(360).unwrap_or(0)).unwrap_or(0)
}

/// Inline style for items and groups of `key`.
///
/// Uncategorized items are neutral gray; every category gets a stable hue.
pub fn style_for_key(key: &str) -> String {
    if key == UNCATEGORIZED_KEY {
        return "background-color: hsl(0, 0%, 85%); border-color: hsl(0, 0%, 45%);".to_owned();
    }
    let hue = hue_for_key(key);
    format!("background-color: hsl({hue}, 65%, 85%); border-color: hsl({hue}, 65%, 40%);")
}

/// Materialize an event, resolving its display extent.
///
/// Returns `None` when the event has no resolvable date.
pub fn to_display_item(
    event: &Event,
    hide_label: bool,
    options: &DisplayOptions,
) -> Option<DisplayItem> {
    let extent = display_extent_of(event)?;
    Some(materialize(event, extent, hide_label, options.min_range_duration_ms))
}

/// Materialize an event whose display extent is already known.
pub fn materialize(
    event: &Event,
    extent: TemporalExtent,
    hide_label: bool,
    min_range_duration_ms: i64,
) -> DisplayItem {
    let is_range = extent.duration_ms() >= min_range_duration_ms && !extent.is_instant();
    let (kind, end_iso) = if is_range {
        (ItemKind::Range, Some(to_iso(extent.end_ms)))
    } else {
        (ItemKind::Point, None)
    };

    let key = group_key(event.category_id);
    let title = event.display_title();

    DisplayItem {
        id: event.id,
        content: if hide_label { String::new() } else { title.clone() },
        start_iso: to_iso(extent.start_ms),
        end_iso,
        kind,
        style_hint: style_for_key(&key),
        group_key: key,
        tooltip: tooltip(event, &title, extent, is_range),
    }
}

fn tooltip(event: &Event, title: &str, extent: TemporalExtent, is_range: bool) -> String {
    let dates = if is_range {
        format!("{} \u{2013} {}", human_date(extent.start_ms), human_date(extent.end_ms))
    } else {
        human_date(extent.start_ms)
    };

    [
        title,
        dates.as_str(),
        event.location_name.trim(),
        event.description.trim(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}

/// Calendar date for tooltips; BCE years read as `44-03-15 BCE`.
fn human_date(instant_ms: i64) -> String {
    let Some(dt) = DateTime::from_timestamp_millis(instant_ms) else {
        return String::new();
    };
    let year = dt.year();
    if year < 0 {
        format!(
            "{}-{:02}-{:02} BCE",
            year.unsigned_abs(),
            dt.month(),
            dt.day()
        )
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}
