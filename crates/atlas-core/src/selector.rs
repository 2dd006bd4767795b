//! Concurrency-bounded greedy admission.
//!
//! Candidates arrive ranked by importance. Each one is admitted unless doing
//! so would leave some instant covered by more than `max_concurrent`
//! admitted intervals. A rejected candidate is never reconsidered within the
//! same pass.
//!
//! Coverage is tested with a sweep over critical points: interval
//! endpoints. The coverage count of a set of closed intervals is piecewise
//! constant and only changes at an endpoint, so checking the endpoints is
//! enough. Intervals are closed on both ends (`start <= t <= end`), which
//! means a point event touching a range endpoint counts as overlapping it.
//!
//! The sweep is rebuilt for every candidate, giving O(n²) over the pool.
//! The pool reaching this stage is already bounded by the capacity curve.

use crate::temporal::TemporalExtent;

/// Result of one admission pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission<T> {
    /// Admitted candidates, in admission (rank) order.
    pub admitted: Vec<T>,
    /// Candidates with an extent that were turned away, in rank order.
    pub rejected: Vec<T>,
}

impl<T> Default for Admission<T> {
    fn default() -> Self {
        Self {
            admitted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Greedily admit `candidates` (already ranked, best first) under a
/// concurrency bound.
///
/// `extent_of` supplies each candidate's closed interval; candidates for
/// which it returns `None` are dropped.
pub fn select<T, F>(candidates: Vec<T>, max_concurrent: usize, extent_of: F) -> Admission<T>
where
    F: Fn(&T) -> Option<TemporalExtent>,
{
    let mut outcome = Admission::default();
    let mut intervals: Vec<TemporalExtent> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let Some(extent) = extent_of(&candidate) else {
            continue;
        };
        if peak_coverage_with(&intervals, extent) <= max_concurrent {
            intervals.push(extent);
            outcome.admitted.push(candidate);
        } else {
            outcome.rejected.push(candidate);
        }
    }

    outcome
}

/// Highest number of intervals covering any critical point once
/// `candidate` joins `admitted`.
///
/// Points outside the candidate keep the coverage they already had, which
/// the admitted set holds within the bound, so only critical points inside
/// the candidate are swept.
pub fn peak_coverage_with(admitted: &[TemporalExtent], candidate: TemporalExtent) -> usize {
    let critical_points = admitted
        .iter()
        .flat_map(|iv| [iv.start_ms, iv.end_ms])
        .chain([candidate.start_ms, candidate.end_ms])
        .filter(|point| candidate.covers(*point));

    critical_points
        .map(|point| {
            admitted
                .iter()
                .filter(|iv| iv.covers(point))
                .count()
                .saturating_add(1)
        })
        .max()
        .unwrap_or(0)
}

/// Highest number of intervals covering any single instant.
pub fn peak_coverage(intervals: &[TemporalExtent]) -> usize {
    intervals
        .iter()
        .flat_map(|iv| [iv.start_ms, iv.end_ms])
        .map(|point| intervals.iter().filter(|iv| iv.covers(point)).count())
        .max()
        .unwrap_or(0)
}
