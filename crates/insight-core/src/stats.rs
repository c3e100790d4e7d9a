//! Statistics primitives for threshold derivation.
//!
//! Thresholds are taken from the data's own distribution rather than fixed
//! cutoffs, so "high demand" always means "high relative to this batch".
//! Every function is total: empty input yields `0.0` instead of panicking.

use std::cmp::Ordering;

/// Linear-interpolation percentile (`PERCENTILE.INC` convention).
///
/// `p` is on a 0-1 scale and is clamped into that range. Non-finite values
/// are ignored. The input slice is never reordered.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(f64::total_cmp);

    let p = if p.is_nan() { 0.5 } else { p.clamp(0.0, 1.0) };
    let pos = (sorted.len() - 1) as f64 * p;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}

/// Median, i.e. the 50th percentile.
pub fn median(values: &[f64]) -> f64 {
    percentile(values, 0.5)
}

/// Clamp a volume-like metric to `>= 0`. NaN becomes 0.
pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Clamp a share-like metric into `[0, cap]`. NaN becomes 0.
pub fn clamp_share(value: f64, cap: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, cap.max(0.0))
    }
}

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && numerator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

/// Descending order for floats (largest first).
pub fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Ascending order for floats (smallest first).
pub fn asc(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Sign of `last - first`: `1`, `-1`, or `0` for flat or too-short series.
pub fn direction(series: &[f64]) -> i8 {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => {
            let delta = last - first;
            if delta > 0.0 {
                1
            } else if delta < 0.0 {
                -1
            } else {
                0
            }
        }
        _ => 0,
    }
}
