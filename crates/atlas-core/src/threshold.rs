//! Importance threshold as a function of the visible span.
//!
//! Zoomed in to a year or less, every event is eligible. Zoomed out to a
//! millennium or more, only events at or above [`MAX_THRESHOLD`] are.
//! In between the threshold grows linearly in `ln(span)`: spans range from
//! days to millennia, and the number of events worth showing grows far
//! slower than the span itself.

/// Milliseconds in a 365.25-day year.
pub const MS_PER_YEAR: i64 = 31_557_600_000;

/// Spans at or below this show everything.
pub const FOCUSED_SPAN_MS: i64 = MS_PER_YEAR;

/// Spans at or above this use [`MAX_THRESHOLD`].
pub const MAX_SPAN_MS: i64 = 1_000 * MS_PER_YEAR;

/// Highest threshold ever applied. Deliberately below 1.0 so the
/// long tail can still surface when the visible-event floor needs it.
pub const MAX_THRESHOLD: f64 = 0.4;

/// Minimum importance score an event needs to be shown at `span_ms`.
///
/// Returns 0 when no span is known (unwindowed mode).
#[allow(clippy::cast_precision_loss)]
pub fn min_importance(span_ms: Option<i64>) -> f64 {
    let Some(span) = span_ms else {
        return 0.0;
    };
    if span <= FOCUSED_SPAN_MS {
        return 0.0;
    }
    if span >= MAX_SPAN_MS {
        return MAX_THRESHOLD;
    }

    let low = (FOCUSED_SPAN_MS as f64).ln();
    let high = (MAX_SPAN_MS as f64).ln();
    let t = ((span as f64).ln() - low) / (high - low);
    (t * MAX_THRESHOLD).clamp(0.0, MAX_THRESHOLD)
}
