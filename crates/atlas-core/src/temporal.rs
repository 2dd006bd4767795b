//! Fuzzy-date resolution and temporal extents.
//!
//! The data source records dates as text with an optional precision tag.
//! Values routinely carry BCE years (`"-0060"`, `"\u{2212}44-03-15"`), one to
//! four digit years, and year-only or year-month precision. Generic date
//! parsers either reject negative years or read `"60"` as 1960, so the
//! leading `[sign]YYYY[-MM[-DD]]` part is matched explicitly and the instant
//! is built from its components. Only strings that do not fit that shape are
//! handed to the general parsers.
//!
//! Every function here is pure. An unparseable value is "no value", never an
//! error: the event owning it simply drops out of timeline processing.

use std::sync::LazyLock;

use atlas_types::{DateResolution, Event, FuzzyDate};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;

/// Unicode minus sign used by Wikidata for BCE years.
const UNICODE_MINUS: char = '\u{2212}';

/// Milliseconds in one calendar day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Leading date (and optional time-of-day) pattern.
///
/// Groups: 1 sign, 2 year, 3 month, 4 day, 5 hour, 6 minute, 7 second,
/// 8 fractional second.
static LEADING_DATE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^([+-])?(\d{1,4})(?:-(\d{1,2})(?:-(\d{1,2})(?:[T ](\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?)?)?)?",
    )
    .ok()
});

/// Trailing UTC offset after a time of day.
static UTC_OFFSET: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([+-])(\d{2}):?(\d{2})$").ok());

/// Resolved start/end instants of an event, in milliseconds since the Unix
/// epoch. Always `end_ms >= start_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemporalExtent {
    /// First instant covered by the event.
    pub start_ms: i64,
    /// Last instant covered by the event.
    pub end_ms: i64,
}

impl TemporalExtent {
    /// Build an extent, swapping the endpoints if they arrive reversed.
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

    /// Length of the extent in milliseconds.
    pub const fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Whether start and end coincide.
    pub const fn is_instant(&self) -> bool {
        self.start_ms == self.end_ms
    }

    /// Whether `point_ms` lies inside the closed interval.
    pub const fn covers(&self, point_ms: i64) -> bool {
        point_ms >= self.start_ms && point_ms <= self.end_ms
    }
}

/// Resolve a fuzzy date to a UTC instant.
///
/// Returns `None` when the value matches neither the leading-date pattern
/// nor any of the general formats.
pub fn resolve(date: &FuzzyDate) -> Option<DateTime<Utc>> {
    let normalized: String = date
        .value
        .trim()
        .chars()
        .map(|c| if c == UNICODE_MINUS { '-' } else { c })
        .collect();
    if normalized.is_empty() {
        return None;
    }

    resolve_components(&normalized, date.resolution()).or_else(|| resolve_general(&normalized))
}

/// Resolve a fuzzy date straight to epoch milliseconds.
pub fn resolve_ms(date: &FuzzyDate) -> Option<i64> {
    resolve(date).map(|dt| dt.timestamp_millis())
}

/// Match the leading `[sign]YYYY[-MM[-DD[THH:MM[:SS[.fff]]]]]` pattern and
/// build the instant from its parts.
fn resolve_components(value: &str, resolution: Option<DateResolution>) -> Option<DateTime<Utc>> {
    let pattern = LEADING_DATE.as_ref()?;
    let caps = pattern.captures(value)?;
    let matched = caps.get(0)?;

    // Only a time/offset suffix may follow the date: "19431" and
    // "6 June 1944" belong to the general parsers.
    let rest = value.get(matched.end()..).unwrap_or_default();
    if !(rest.is_empty() || rest.starts_with(['T', 'Z', '+', '-'])) {
        return None;
    }

    let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");
    let magnitude: i32 = caps.get(2)?.as_str().parse().ok()?;
    let year = if negative { magnitude.checked_neg()? } else { magnitude };

    let component = |idx: usize| -> Option<u32> { caps.get(idx).and_then(|m| m.as_str().parse().ok()) };
    // Wikidata writes unknown month/day as 00.
    let month = component(3).filter(|m| *m != 0).unwrap_or(1);
    let day = component(4).filter(|d| *d != 0).unwrap_or(1);

    let (month, day) = match resolution {
        Some(DateResolution::Year) => (1, 1),
        Some(DateResolution::Month) => (month, 1),
        _ => (month, day),
    };
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let coarse = matches!(
        resolution,
        Some(DateResolution::Year | DateResolution::Month | DateResolution::Day)
    );
    let time = if coarse {
        NaiveTime::MIN
    } else {
        time_of_day(&caps)?
    };

    let naive = date.and_time(time);
    if !coarse {
        if let Some(offset) = utc_offset(rest.trim()) {
            return naive
                .and_local_timezone(offset)
                .single()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    Some(naive.and_utc())
}

/// Parse a trailing `Z`, `+HH:MM`, or `-HHMM` offset.
fn utc_offset(suffix: &str) -> Option<FixedOffset> {
    if suffix == "Z" {
        return FixedOffset::east_opt(0);
    }
    let caps = UTC_OFFSET.as_ref()?.captures(suffix)?;
    let hours: i32 = caps.get(2)?.as_str().parse().ok()?;
    let minutes: i32 = caps.get(3)?.as_str().parse().ok()?;
    let seconds = hours.checked_mul(3600)?.checked_add(minutes.checked_mul(60)?)?;
    let seconds = if caps.get(1)?.as_str() == "-" {
        seconds.checked_neg()?
    } else {
        seconds
    };
    FixedOffset::east_opt(seconds)
}

fn time_of_day(caps: &regex::Captures<'_>) -> Option<NaiveTime> {
    let field = |idx: usize| -> Option<u32> { caps.get(idx).and_then(|m| m.as_str().parse().ok()) };
    let hour = field(5).unwrap_or(0);
    let minute = field(6).unwrap_or(0);
    let second = field(7).unwrap_or(0);
    let milli = caps
        .get(8)
        .map(|m| {
            let digits: String = m.as_str().chars().chain("000".chars()).take(3).collect();
            digits.parse().unwrap_or(0)
        })
        .unwrap_or(0);
    NaiveTime::from_hms_milli_opt(hour, minute, second, milli)
}

/// General-purpose fallbacks for values outside the leading-date shape.
fn resolve_general(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }
    for format in ["%Y/%m/%d", "%d %B %Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.and_time(NaiveTime::MIN).and_utc());
        }
    }
    None
}

/// Resolve the logical extent of an event.
///
/// `start = start ?? point ?? end` and `end = end ?? point ?? start`, which
/// also yields the explicit pair when both `start_time` and `end_time`
/// resolve. Returns `None` when no field resolves.
pub fn extent_of(event: &Event) -> Option<TemporalExtent> {
    let start = event.start_time.as_ref().and_then(resolve_ms);
    let point = event.point_in_time.as_ref().and_then(resolve_ms);
    let end = event.end_time.as_ref().and_then(resolve_ms);

    let resolved_start = start.or(point).or(end)?;
    let resolved_end = end.or(point).or(start)?;
    Some(TemporalExtent::new(resolved_start, resolved_end))
}

/// Resolve the extent used for layout, overlap, and duration decisions.
///
/// Identical to [`extent_of`] except that an event with no explicit end
/// whose start and end coincide is stretched to 23:59:59.999 UTC of its
/// start day.
pub fn display_extent_of(event: &Event) -> Option<TemporalExtent> {
    let extent = extent_of(event)?;
    let has_explicit_end = event.end_time.as_ref().and_then(resolve_ms).is_some();
    if has_explicit_end || !extent.is_instant() {
        return Some(extent);
    }
    Some(TemporalExtent::new(extent.start_ms, end_of_day_ms(extent.start_ms)))
}

/// Last millisecond of the UTC day containing `instant_ms`.
pub fn end_of_day_ms(instant_ms: i64) -> i64 {
    DateTime::from_timestamp_millis(instant_ms)
        .and_then(|dt| dt.date_naive().and_hms_milli_opt(23, 59, 59, 999))
        .map_or(instant_ms, |end| end.and_utc().timestamp_millis())
}

/// Chronological sort key for an event: its display start in milliseconds.
pub fn sort_key(event: &Event) -> Option<i64> {
    extent_of(event).map(|extent| extent.start_ms)
}

/// Format an instant as ISO 8601 with millisecond precision.
///
/// Years outside `0..=9999` carry an explicit sign (`-0060-01-01T...`).
pub fn to_iso(instant_ms: i64) -> String {
    DateTime::from_timestamp_millis(instant_ms)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
        .unwrap_or_default()
}
