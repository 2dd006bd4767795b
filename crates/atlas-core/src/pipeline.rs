//! The selection pipeline: from a raw event pool and a viewport to the
//! items the timeline widget should draw.
//!
//! Stages, in order:
//!
//! 1. Geographic filter (when enabled and a bound is supplied).
//! 2. Temporal resolution, once per event; undated events drop out.
//! 3. Overlap with the visible window.
//! 4. Removal of events too long to render at this zoom.
//! 5. Importance threshold and capacity, with the visible-event floor
//!    backfilled from the unthresholded pool.
//! 6. Concurrency-bounded admission, topped up to the floor if needed.
//! 7. Label suppression over the admitted set.
//! 8. Materialization, sorted chronologically.
//!
//! Every call takes the whole pool, viewport, and options. Nothing is
//! carried between calls, so the pipeline can be re-run on every viewport
//! change and is trivially deterministic.

use std::cmp::Ordering;

use atlas_types::{Category, DisplayGroup, DisplayItem, Event, GeoBounds, VisibleWindow};
use serde::{Deserialize, Serialize};

use crate::capacity::max_events_for;
use crate::config::DisplayOptions;
use crate::geo;
use crate::groups::build_groups;
use crate::labels::hidden_labels;
use crate::materialize::materialize;
use crate::selector;
use crate::temporal::{TemporalExtent, display_extent_of};
use crate::threshold::min_importance;

/// What the caller is currently looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    /// Temporal window; `None` for unwindowed mode.
    pub window: Option<VisibleWindow>,
    /// Visible span override; defaults to the window's span.
    pub span_ms: Option<i64>,
    /// Geographic bound reported by the map.
    pub bounds: Option<GeoBounds>,
}

impl Viewport {
    /// A viewport over `window` with no geographic bound.
    pub const fn windowed(window: VisibleWindow) -> Self {
        Self {
            window: Some(window),
            span_ms: None,
            bounds: None,
        }
    }

    /// The visible span used for threshold, capacity, and size filtering.
    pub fn effective_span(&self) -> Option<i64> {
        self.span_ms
            .map(|span| span.max(0))
            .or_else(|| self.window.map(|window| window.span_ms()))
    }
}

/// Outcome of one pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Items to render, sorted by start instant then id.
    pub items: Vec<DisplayItem>,
    /// Display extent of each item, parallel to `items`.
    pub extents: Vec<TemporalExtent>,
    /// Items admitted past the concurrency bound to honor the floor.
    pub floor_forced: usize,
    /// Importance threshold applied for this span.
    pub threshold: f64,
    /// Capacity for this span (`usize::MAX` without a span).
    pub capacity: usize,
    /// Events left after the window and size filters.
    pub pool_size: usize,
}

/// Items plus the groups they render into, ready for the timeline widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineView {
    /// Rows, one per category present.
    pub groups: Vec<DisplayGroup>,
    /// Positioned items.
    pub items: Vec<DisplayItem>,
}

/// An event with its display extent resolved once for the whole pass.
#[derive(Debug, Clone, Copy)]
struct Resolved<'a> {
    event: &'a Event,
    extent: TemporalExtent,
    score: Option<f64>,
}

/// Importance ranking: measured scores descending, missing scores last.
fn rank(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Run the full pipeline.
#[allow(clippy::cast_precision_loss)]
pub fn select_events(events: &[Event], viewport: &Viewport, options: &DisplayOptions) -> Selection {
    let span = viewport.effective_span();

    let mut pool: Vec<Resolved<'_>> = geo::filter_events(
        events,
        viewport.bounds.as_ref(),
        options.filter_by_visible_geographic_area,
    )
    .into_iter()
    .filter_map(|event| {
        display_extent_of(event).map(|extent| Resolved {
            event,
            extent,
            score: event.importance_score.filter(|s| s.is_finite()),
        })
    })
    .collect();

    if let Some(window) = viewport.window {
        pool.retain(|r| window.overlaps(r.extent.start_ms, r.extent.end_ms));
    }

    if let Some(span) = span.filter(|span| *span > 0) {
        let limit = options.max_event_span_visible_ratio * span as f64;
        pool.retain(|r| r.extent.duration_ms() as f64 <= limit);
    }

    // Stable: equal scores keep source order.
    pool.sort_by(|a, b| rank(a.score, b.score));

    let floor = if viewport.window.is_some() {
        options.min_visible_events.min(pool.len())
    } else {
        0
    };
    let threshold = min_importance(span);
    let capacity = max_events_for(span, options.min_visible_events);

    let thresholded: Vec<usize> = pool
        .iter()
        .enumerate()
        .filter(|(_, r)| r.score.unwrap_or(0.0) >= threshold)
        .map(|(idx, _)| idx)
        .collect();
    let take = floor.max(capacity.min(thresholded.len()));
    let mut chosen: Vec<usize> = thresholded.into_iter().take(take).collect();

    if chosen.len() < floor {
        // Everything above the threshold is already in; the rest of the
        // pool ranks below it, so appending keeps rank order.
        let needed = floor.saturating_sub(chosen.len());
        let backfill: Vec<usize> = (0..pool.len())
            .filter(|idx| !chosen.contains(idx))
            .take(needed)
            .collect();
        chosen.extend(backfill);
    }

    let candidates: Vec<Resolved<'_>> = chosen.iter().filter_map(|idx| pool.get(*idx).copied()).collect();
    let admission = selector::select(candidates, options.max_overlapping_events, |r| Some(r.extent));

    let mut admitted = admission.admitted;
    let shortfall = floor.saturating_sub(admitted.len());
    let forced: Vec<Resolved<'_>> = admission.rejected.into_iter().take(shortfall).collect();
    let floor_forced = forced.len();
    admitted.extend(forced);

    let label_input: Vec<(TemporalExtent, Option<f64>)> =
        admitted.iter().map(|r| (r.extent, r.score)).collect();
    let hidden = hidden_labels(
        &label_input,
        viewport.window.as_ref(),
        options.short_event_fraction,
    );

    let mut placed: Vec<(Resolved<'_>, bool)> = admitted.into_iter().zip(hidden).collect();
    placed.sort_by(|(a, _), (b, _)| {
        a.extent
            .start_ms
            .cmp(&b.extent.start_ms)
            .then_with(|| a.event.id.cmp(&b.event.id))
    });

    let extents = placed.iter().map(|(r, _)| r.extent).collect();
    let items: Vec<DisplayItem> = placed
        .iter()
        .map(|(r, hide)| materialize(r.event, r.extent, *hide, options.min_range_duration_ms))
        .collect();

    tracing::trace!(
        pool = pool.len(),
        admitted = items.len(),
        floor_forced,
        threshold,
        "selection pass"
    );

    Selection {
        items,
        extents,
        floor_forced,
        threshold,
        capacity,
        pool_size: pool.len(),
    }
}

/// Run the pipeline and return only the display items.
pub fn select_display_items(
    events: &[Event],
    span_ms: Option<i64>,
    window: Option<VisibleWindow>,
    bounds: Option<&GeoBounds>,
    options: &DisplayOptions,
) -> Vec<DisplayItem> {
    let viewport = Viewport {
        window,
        span_ms,
        bounds: bounds.copied(),
    };
    select_events(events, &viewport, options).items
}

/// Run the pipeline and build the groups for the resulting items.
pub fn build_view(
    events: &[Event],
    categories: &[Category],
    viewport: &Viewport,
    options: &DisplayOptions,
) -> TimelineView {
    let selection = select_events(events, viewport, options);
    TimelineView {
        groups: build_groups(categories, &selection.items),
        items: selection.items,
    }
}

#[cfg(test)]
mod tests {
    use atlas_types::{CategoryId, EventId, FuzzyDate, ItemKind};

    use super::*;
    use crate::selector::peak_coverage;
    use crate::temporal::{MS_PER_DAY, resolve_ms};
    use crate::threshold::MS_PER_YEAR;

    fn ms(value: &str) -> i64 {
        resolve_ms(&FuzzyDate::new(value)).unwrap_or(0)
    }

    fn event(id: i64, start: &str, end: Option<&str>, score: Option<f64>) -> Event {
        let mut event = Event::new(EventId(id), format!("event {id}"));
        event.start_time = Some(FuzzyDate::new(start));
        event.end_time = end.map(FuzzyDate::new);
        event.importance_score = score;
        event
    }

    fn score(i: i64) -> f64 {
        f64::from(i32::try_from(i).unwrap_or(0))
    }

    fn ids(selection: &Selection) -> Vec<i64> {
        selection.items.iter().map(|i| i.id.into_inner()).collect()
    }

    fn window(start: &str, end: &str) -> Viewport {
        Viewport::windowed(VisibleWindow::new(ms(start), ms(end)))
    }

    #[test]
    fn empty_pool_yields_empty_selection() {
        let selection = select_events(&[], &window("1940-01-01", "1941-01-01"), &DisplayOptions::default());
        assert!(selection.items.is_empty());
        assert_eq!(selection.floor_forced, 0);
    }

    #[test]
    fn events_outside_window_are_dropped() {
        let events = [
            event(1, "1940-03-01", None, Some(0.5)),
            event(2, "1950-03-01", None, Some(0.9)),
            event(3, "1939-06-01", Some("1940-01-01"), Some(0.1)),
        ];
        let selection = select_events(&events, &window("1940-01-01", "1941-01-01"), &DisplayOptions::default());
        assert_eq!(ids(&selection), vec![3, 1]);
    }

    #[test]
    fn events_far_longer_than_window_are_excluded() {
        let events = [
            event(1, "1900-01-01", Some("2000-01-01"), Some(1.0)),
            event(2, "1940-06-01", None, Some(0.2)),
        ];
        let selection = select_events(&events, &window("1940-01-01", "1941-01-01"), &DisplayOptions::default());
        assert_eq!(ids(&selection), vec![2]);
        assert_eq!(selection.pool_size, 1);
    }

    #[test]
    fn undated_events_are_silently_dropped() {
        let mut undated = Event::new(EventId(9), "undated");
        undated.point_in_time = Some(FuzzyDate::new("unknown"));
        let events = [undated, event(1, "1940-06-01", None, None)];
        let selection = select_events(&events, &Viewport::default(), &DisplayOptions::default());
        assert_eq!(ids(&selection), vec![1]);
    }

    #[test]
    fn unwindowed_mode_has_no_threshold_floor_or_capacity() {
        let events: Vec<Event> = (0..50)
            .map(|i| event(i, &format!("{}-01-01", 1000 + i * 10), None, Some(0.01)))
            .collect();
        let selection = select_events(&events, &Viewport::default(), &DisplayOptions::default());
        assert_eq!(selection.items.len(), 50);
        assert!(selection.threshold.abs() < f64::EPSILON);
        assert_eq!(selection.capacity, usize::MAX);
        // No window: no label suppression.
        assert!(selection.items.iter().all(|i| !i.content.is_empty()));
    }

    #[test]
    fn threshold_is_backfilled_up_to_floor() {
        // A 500-year window applies a high threshold; all scores are below it.
        let events: Vec<Event> = (0..10)
            .map(|i| event(i, &format!("{}-06-01", 1500 + i * 40), None, Some(0.01 * score(i))))
            .collect();
        let options = DisplayOptions {
            min_visible_events: 4,
            ..DisplayOptions::default()
        };
        let selection = select_events(&events, &window("1500-01-01", "2000-01-01"), &options);
        assert!(selection.threshold > 0.3);
        // The four highest-ranked events, in chronological order.
        assert_eq!(ids(&selection), vec![6, 7, 8, 9]);
    }

    #[test]
    fn capacity_limits_dense_windows() {
        // 10-year window: capacity max(12, floor) with floor 5.
        let events: Vec<Event> = (0..40)
            .map(|i| event(i, &format!("19{:02}-0{}-01", 40 + i / 4, 1 + i % 4), None, Some(0.9)))
            .collect();
        let options = DisplayOptions {
            min_visible_events: 5,
            ..DisplayOptions::default()
        };
        // Exactly ten mean years; a calendar decade is a little longer and
        // floors to eleven.
        let start = ms("1940-01-01");
        let viewport = Viewport::windowed(VisibleWindow::new(start, start + 10 * MS_PER_YEAR));
        let selection = select_events(&events, &viewport, &options);
        assert_eq!(selection.capacity, 12);
        assert_eq!(selection.items.len(), 12);
        // Ties keep source order, so the first twelve events win.
        assert_eq!(ids(&selection), (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn calendar_decade_is_slightly_over_ten_years() {
        let events: Vec<Event> = (0..40)
            .map(|i| event(i, &format!("19{:02}-0{}-01", 40 + i / 4, 1 + i % 4), None, Some(0.9)))
            .collect();
        let options = DisplayOptions {
            min_visible_events: 5,
            ..DisplayOptions::default()
        };
        let selection = select_events(&events, &window("1940-01-01", "1950-01-01"), &options);
        assert_eq!(selection.capacity, 11);
        assert_eq!(ids(&selection), (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn missing_scores_rank_last() {
        let events = [
            event(1, "1940-02-01", None, None),
            event(2, "1940-03-01", None, Some(0.0)),
            event(3, "1940-04-01", None, Some(0.01)),
        ];
        let options = DisplayOptions {
            min_visible_events: 2,
            ..DisplayOptions::default()
        };
        // A 60-year window filters every score out, so the floor is
        // backfilled by rank.
        let selection = select_events(&events, &window("1940-01-01", "2000-01-01"), &options);
        assert!(selection.threshold > 0.2);
        assert_eq!(ids(&selection), vec![2, 3]);
    }

    #[test]
    fn concurrency_bound_limits_overlap() {
        let events: Vec<Event> = (0..8)
            .map(|i| event(i, "1940-01-01", Some("1940-12-31"), Some(0.9 - 0.1 * score(i))))
            .collect();
        let options = DisplayOptions {
            min_visible_events: 2,
            max_overlapping_events: 3,
            ..DisplayOptions::default()
        };
        let selection = select_events(&events, &window("1940-01-01", "1941-01-01"), &options);
        assert_eq!(ids(&selection), vec![0, 1, 2]);
        assert_eq!(selection.floor_forced, 0);
        assert!(peak_coverage(&selection.extents) <= 3);
    }

    #[test]
    fn floor_overrides_concurrency_bound() {
        let events: Vec<Event> = (0..6)
            .map(|i| event(i, "1940-01-01", Some("1940-12-31"), Some(0.5)))
            .collect();
        let options = DisplayOptions {
            min_visible_events: 5,
            max_overlapping_events: 2,
            ..DisplayOptions::default()
        };
        let selection = select_events(&events, &window("1940-01-01", "1941-01-01"), &options);
        assert_eq!(selection.items.len(), 5);
        assert_eq!(selection.floor_forced, 3);
        assert_eq!(peak_coverage(&selection.extents), 5);
    }

    #[test]
    fn geographic_filter_applies_only_when_enabled() {
        let mut paris = event(1, "1940-06-14", None, Some(0.5));
        paris.location_lat = Some(48.86);
        paris.location_lon = Some(2.35);
        let nowhere = event(2, "1940-06-15", None, Some(0.5));
        let events = [paris, nowhere];

        let mut viewport = window("1940-01-01", "1941-01-01");
        viewport.bounds = Some(GeoBounds {
            south: 40.0,
            west: -5.0,
            north: 55.0,
            east: 10.0,
        });

        let selection = select_events(&events, &viewport, &DisplayOptions::default());
        assert_eq!(ids(&selection), vec![1, 2]);

        let options = DisplayOptions {
            filter_by_visible_geographic_area: true,
            ..DisplayOptions::default()
        };
        let selection = select_events(&events, &viewport, &options);
        assert_eq!(ids(&selection), vec![1]);
    }

    #[test]
    fn zero_width_window_does_not_panic() {
        let events = [event(1, "1940-06-14", None, Some(0.5))];
        let instant = ms("1940-06-14T12:00:00Z");
        let viewport = Viewport::windowed(VisibleWindow::new(instant, instant));
        let selection = select_events(&events, &viewport, &DisplayOptions::default());
        assert_eq!(ids(&selection), vec![1]);
        assert!(!selection.items.iter().any(|i| i.content.is_empty()));
    }

    #[test]
    fn labels_are_suppressed_against_admitted_median() {
        let start = ms("1940-01-01");
        let events = [
            event(1, "1940-02-01", None, Some(0.9)),
            event(2, "1940-03-01", None, Some(0.5)),
            event(3, "1940-04-01", None, Some(0.1)),
        ];
        let viewport = Viewport::windowed(VisibleWindow::new(start, start + 1000 * MS_PER_DAY));
        let options = DisplayOptions {
            short_event_fraction: 0.05,
            ..DisplayOptions::default()
        };
        let selection = select_events(&events, &viewport, &options);
        let contents: Vec<&str> = selection.items.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, vec!["event 1", "event 2", ""]);
        assert!(selection.items.iter().all(|i| i.kind == ItemKind::Point));
    }

    #[test]
    fn view_includes_groups_for_rendered_items() {
        let mut categorized = event(1, "1940-02-01", None, Some(0.9));
        categorized.category_id = Some(CategoryId(7));
        let events = [categorized, event(2, "1940-03-01", None, Some(0.5))];
        let categories = [Category {
            id: CategoryId(7),
            name: "World War II".to_owned(),
            alternate_label: String::new(),
        }];
        let view = build_view(
            &events,
            &categories,
            &window("1940-01-01", "1941-01-01"),
            &DisplayOptions::default(),
        );
        let keys: Vec<&str> = view.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["7", "uncategorized"]);
        assert_eq!(view.items.len(), 2);
    }

    #[test]
    fn display_items_helper_matches_full_pipeline() {
        let events = [event(1, "1940-02-01", None, Some(0.9))];
        let w = VisibleWindow::new(ms("1940-01-01"), ms("1941-01-01"));
        let items = select_display_items(&events, None, Some(w), None, &DisplayOptions::default());
        let selection = select_events(&events, &Viewport::windowed(w), &DisplayOptions::default());
        assert_eq!(items, selection.items);
    }

    #[test]
    fn display_items_helper_honors_bounds() {
        let mut paris = event(1, "1940-06-14", None, Some(0.5));
        paris.location_lat = Some(48.86);
        paris.location_lon = Some(2.35);
        let mut new_york = event(2, "1940-06-15", None, Some(0.5));
        new_york.location_lat = Some(40.71);
        new_york.location_lon = Some(-74.0);
        let events = [paris, new_york];

        let europe = GeoBounds {
            south: 35.0,
            west: -10.0,
            north: 60.0,
            east: 30.0,
        };
        let options = DisplayOptions {
            filter_by_visible_geographic_area: true,
            ..DisplayOptions::default()
        };
        let w = VisibleWindow::new(ms("1940-01-01"), ms("1941-01-01"));
        let items = select_display_items(&events, None, Some(w), Some(&europe), &options);
        let ids: Vec<i64> = items.iter().map(|i| i.id.into_inner()).collect();
        assert_eq!(ids, vec![1]);
    }
}
