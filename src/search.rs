//! Index range lookup on a sorted time axis.
//!
//! Redraws need the samples of each channel that fall inside the visible
//! window. Recordings run for many hours at high sample rates, so the bounds
//! are found by bisection rather than by scanning.

use serde::{Deserialize, Serialize};

/// How tight the returned index range is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Halts once the candidate pair is adjacent and may include one sample
    /// before `t_min` (and, for a window entirely before the data, one sample
    /// at or after `t_max`). Matches the slices drawn by earlier releases.
    #[default]
    Compatible,
    /// Exactly the samples with `t_min <= t < t_max`.
    Exact,
}

/// Find `(i_min, i_max)` so that `t[i_min..i_max]` covers every sample with
/// `t_min <= t[i] < t_max`.
///
/// `t` must be sorted ascending. Empty input yields `(0, 0)`.
pub fn bisect_range(t: &[i64], t_min: i64, t_max: i64, mode: SearchMode) -> (usize, usize) {
    match mode {
        SearchMode::Compatible => bisect_compatible(t, t_min, t_max),
        SearchMode::Exact => bisect_exact(t, t_min, t_max),
    }
}

fn bisect_compatible(t: &[i64], t_min: i64, t_max: i64) -> (usize, usize) {
    if t.is_empty() {
        return (0, 0);
    }

    // Lower bound, anchored at the start of the axis.
    let mut lo = 0;
    let mut hi = t.len();
    loop {
        let candidate = (lo + hi) / 2;
        if t[candidate] < t_min {
            lo = candidate;
        } else {
            hi = candidate;
        }
        if hi.abs_diff(lo) < 2 {
            break;
        }
    }
    let i_min = lo;

    // Upper bound, anchored at the lower bound.
    let mut lo = i_min;
    let mut hi = t.len();
    loop {
        let candidate = (lo + hi) / 2;
        if t[candidate] < t_max {
            lo = candidate;
        } else {
            hi = candidate;
        }
        if hi.abs_diff(lo) < 2 {
            break;
        }
    }

    (i_min, hi)
}

fn bisect_exact(t: &[i64], t_min: i64, t_max: i64) -> (usize, usize) {
    let i_min = t.partition_point(|&x| x < t_min);
    let i_max = i_min + t[i_min..].partition_point(|&x| x < t_max);
    (i_min, i_max)
}
