//! Geographic bound filtering.
//!
//! The map widget reports its visible rectangle; when the caller opts in,
//! events outside it are removed from the pool before any temporal work.
//! An event without finite coordinates is never inside a bound, but it only
//! loses its place when the filter is active.

use atlas_types::{Event, GeoBounds};

/// Whether the event's coordinates fall inside `bounds` (edges inclusive).
///
/// Bounds with `west > east` wrap across the antimeridian.
pub fn is_within(event: &Event, bounds: &GeoBounds) -> bool {
    let Some((lat, lon)) = event.coordinates() else {
        return false;
    };
    if !(lat >= bounds.south && lat <= bounds.north) {
        return false;
    }
    if bounds.west <= bounds.east {
        lon >= bounds.west && lon <= bounds.east
    } else {
        lon >= bounds.west || lon <= bounds.east
    }
}

/// Restrict `events` to those inside `bounds`.
///
/// A pass-through when `enabled` is false or no bound is supplied.
pub fn filter_events<'a>(
    events: &'a [Event],
    bounds: Option<&GeoBounds>,
    enabled: bool,
) -> Vec<&'a Event> {
    match bounds {
        Some(bounds) if enabled => events.iter().filter(|e| is_within(e, bounds)).collect(),
        _ => events.iter().collect(),
    }
}
