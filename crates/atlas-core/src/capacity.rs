//! Maximum number of timeline items as a function of the visible span.
//!
//! Piecewise in years visible `y`:
//!
//! | Years visible | Capacity                  |
//! |---------------|---------------------------|
//! | `y < 1`       | `min(200, 150 / y)`       |
//! | `1 <= y < 5`  | `150 / y`                 |
//! | `5 <= y < 20` | `120 / y`                 |
//! | `y >= 20`     | `min_visible_events`      |
//!
//! and never below `min_visible_events`. The constants are chosen so the
//! curve never steps upward at a breakpoint: at `y = 1` both sides give 150,
//! at `y = 5` the value drops from 30 to 24, and at `y = 20` both sides are
//! held at the floor.

use crate::threshold::MS_PER_YEAR;

/// Hard ceiling for sub-year windows (a single zoomed-in day).
pub const SUB_YEAR_CEILING: f64 = 200.0;

/// Inverse-proportional constant below five years visible.
pub const SHORT_SPAN_CONSTANT: f64 = 150.0;

/// Inverse-proportional constant from five to twenty years visible.
pub const MEDIUM_SPAN_CONSTANT: f64 = 120.0;

/// Years visible at which the short segment ends.
pub const SHORT_SPAN_YEARS: f64 = 5.0;

/// Years visible beyond which the capacity is flat at the floor.
pub const FLAT_SPAN_YEARS: f64 = 20.0;

/// Maximum number of events to show for a visible span of `span_ms`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn max_events(span_ms: i64, min_visible_events: usize) -> usize {
    let years = span_ms.max(0) as f64 / MS_PER_YEAR as f64;

    let raw = if years < 1.0 {
        if years <= 0.0 {
            SUB_YEAR_CEILING
        } else {
            (SHORT_SPAN_CONSTANT / years).min(SUB_YEAR_CEILING)
        }
    } else if years < SHORT_SPAN_YEARS {
        SHORT_SPAN_CONSTANT / years
    } else if years < FLAT_SPAN_YEARS {
        MEDIUM_SPAN_CONSTANT / years
    } else {
        0.0
    };

    // `raw` is finite and within [0, 200], so the cast cannot wrap.
    (raw.floor() as usize).max(min_visible_events)
}

/// Capacity for an optional span; no span means no limit.
pub fn max_events_for(span_ms: Option<i64>, min_visible_events: usize) -> usize {
    span_ms.map_or(usize::MAX, |span| max_events(span, min_visible_events))
}
