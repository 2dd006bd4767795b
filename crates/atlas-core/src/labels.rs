//! Label suppression for cluttered timelines.
//!
//! After selection, short events of below-median importance are drawn
//! without a label. Both conditions must hold: a short event that matters
//! more than most of what is on screen keeps its label. The median is taken
//! over the admitted set, not the whole pool, so the decision tracks what is
//! actually visible.

use atlas_types::VisibleWindow;

use crate::temporal::TemporalExtent;

/// Median of `scores`, treating each missing score as 0.
///
/// Even counts average the two middle values. An empty set has median 0.
pub fn median_importance<I>(scores: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut values: Vec<f64> = scores.into_iter().map(|s| s.unwrap_or(0.0)).collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    let upper = values.get(mid).copied().unwrap_or(0.0);
    if values.len() % 2 == 1 {
        upper
    } else {
        let lower = mid
            .checked_sub(1)
            .and_then(|i| values.get(i))
            .copied()
            .unwrap_or(upper);
        (lower + upper) / 2.0
    }
}

/// Whether an admitted event's label should be hidden.
///
/// `display_extent` is the event's layout extent (point events already
/// stretched to the end of their day). Without a window, or with a
/// zero-width one, nothing is hidden.
#[allow(clippy::cast_precision_loss)]
pub fn should_hide_label(
    display_extent: TemporalExtent,
    importance: Option<f64>,
    window: Option<&VisibleWindow>,
    short_event_fraction: f64,
    median: f64,
) -> bool {
    let Some(window) = window else {
        return false;
    };
    let span = window.span_ms();
    if span <= 0 {
        return false;
    }
    let fraction = display_extent.duration_ms() as f64 / span as f64;
    fraction < short_event_fraction && importance.unwrap_or(0.0) < median
}

/// Compute hide-label flags for a whole admitted set, in input order.
pub fn hidden_labels(
    admitted: &[(TemporalExtent, Option<f64>)],
    window: Option<&VisibleWindow>,
    short_event_fraction: f64,
) -> Vec<bool> {
    let median = median_importance(admitted.iter().map(|(_, score)| *score));
    admitted
        .iter()
        .map(|(extent, score)| {
            should_hide_label(*extent, *score, window, short_event_fraction, median)
        })
        .collect()
}
