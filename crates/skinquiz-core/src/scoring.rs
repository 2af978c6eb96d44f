//! Score-range lookup and achievable-score analysis.
//!
//! Band lookup is a plain linear scan in authored order: the first band
//! containing the score wins, and a score no band contains resolves to the
//! first band. Authored quizzes carry a handful of bands, so there is no
//! interval index.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{QuizDefinition, ResultBand};

/// Which band a total score resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandMatch {
    /// Index into the definition's `results`.
    pub index: usize,
    /// `false` when no band contained the score and the first band was
    /// used as the fallback.
    pub matched: bool,
}

/// Index of the first band whose inclusive range contains `score`.
pub fn find_band(results: &[ResultBand], score: i32) -> Option<usize> {
    results.iter().position(|band| band.contains(score))
}

/// Resolve `score` to a band, falling back to the first band.
///
/// Returns `None` only when `results` is empty.
pub fn resolve_band(results: &[ResultBand], score: i32) -> Option<BandMatch> {
    if results.is_empty() {
        return None;
    }
    Some(match find_band(results, score) {
        Some(index) => BandMatch {
            index,
            matched: true,
        },
        None => BandMatch {
            index: 0,
            matched: false,
        },
    })
}

/// Upper limit on the number of distinct totals tracked by
/// [`reachable_totals`]. Larger quizzes get a bounds-only coverage check.
pub const MAX_TRACKED_TOTALS: usize = 1 << 16;

/// Lowest and highest total a full run can reach.
///
/// `None` if some question has no options (the quiz cannot be finished),
/// or if either sum leaves the `i32` range.
pub fn score_bounds(quiz: &QuizDefinition) -> Option<(i32, i32)> {
    quiz.questions
        .iter()
        .try_fold((0i32, 0i32), |(lo, hi), q| {
            Some((lo.checked_add(q.min_score()?)?, hi.checked_add(q.max_score()?)?))
        })
}

/// Whether some sequence of answers drives the running total outside the
/// `i32` range at any step.
///
/// Checked per prefix, since negative scores late in a quiz can pull an
/// overflowing intermediate total back into range.
pub fn total_overflows(quiz: &QuizDefinition) -> bool {
    let (mut lo, mut hi) = (0i64, 0i64);
    for question in &quiz.questions {
        let (Some(min), Some(max)) = (question.min_score(), question.max_score()) else {
            // No run gets past an unanswerable question.
            return false;
        };
        lo += i64::from(min);
        hi += i64::from(max);
        if lo < i64::from(i32::MIN) || hi > i64::from(i32::MAX) {
            return true;
        }
    }
    false
}

/// Every total score some sequence of answers can produce.
///
/// `None` when a running total overflows `i32`, or when the set would grow
/// past [`MAX_TRACKED_TOTALS`].
pub fn reachable_totals(quiz: &QuizDefinition) -> Option<BTreeSet<i32>> {
    let mut totals = BTreeSet::from([0i32]);
    for question in &quiz.questions {
        let mut next = BTreeSet::new();
        for &total in &totals {
            for option in &question.options {
                next.insert(total.checked_add(option.score)?);
            }
            if next.len() > MAX_TRACKED_TOTALS {
                return None;
            }
        }
        totals = next;
    }
    Some(totals)
}

/// Reachable totals that no band contains, in ascending order.
///
/// When the exact set is too large to track, only the lowest and highest
/// reachable totals are checked.
pub fn uncovered_totals(quiz: &QuizDefinition) -> Vec<i32> {
    let candidates: Vec<i32> = match reachable_totals(quiz) {
        Some(totals) => totals.into_iter().collect(),
        None => match score_bounds(quiz) {
            Some((lo, hi)) if lo == hi => vec![lo],
            Some((lo, hi)) => vec![lo, hi],
            None => Vec::new(),
        },
    };
    candidates
        .into_iter()
        .filter(|&t| find_band(&quiz.results, t).is_none())
        .collect()
}

/// Indices of bands that no reachable total resolves to.
///
/// A band is dead when its range misses every reachable total, or when
/// every reachable total inside it is claimed by an earlier band. Empty
/// when the reachable set is too large to track.
pub fn unreachable_bands(quiz: &QuizDefinition) -> Vec<usize> {
    let Some(totals) = reachable_totals(quiz) else {
        return Vec::new();
    };
    let mut hit = vec![false; quiz.results.len()];
    for total in totals {
        if let Some(index) = find_band(&quiz.results, total) {
            hit[index] = true;
        }
    }
    hit.iter()
        .enumerate()
        .filter(|&(_, &h)| !h)
        .map(|(i, _)| i)
        .collect()
}

/// Collapse sorted integers into inclusive runs: `[1,2,3,7]` -> `[(1,3),(7,7)]`.
pub fn collapse_runs(values: &[i32]) -> Vec<(i32, i32)> {
    let mut runs: Vec<(i32, i32)> = Vec::new();
    for &v in values {
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == v => *end = v,
            _ => runs.push((v, v)),
        }
    }
    runs
}
