//! Tick interval selection, viewport rounding, and label formatting.

use crate::view::Range;

/// Candidate multipliers for "nice" tick steps, scanned per decade.
pub const NICE_STEPS: [f64; 3] = [1.0, 2.0, 5.0];

/// Choose the largest step of the form `10^k * m` (m from `candidates`) that
/// does not exceed `target`.
///
/// `target` is the data range each tick may cover, typically
/// `range / available_ticks`. Scanning starts at `10^-8`; `None` means the
/// target is below even that (degenerate or collapsed range).
pub fn choose_interval(target: f64, candidates: &[f64]) -> Option<f64> {
    if !target.is_finite() || target <= 0.0 {
        return None;
    }
    let mut exp = -8;
    let mut prev = None;
    loop {
        let multiplier = 10f64.powi(exp);
        for candidate in candidates {
            let step = multiplier * candidate;
            if step > target {
                return prev;
            }
            prev = Some(step);
        }
        exp += 1;
    }
}

/// Round `value` down to a multiple of `interval`, unchanged if already on one.
pub fn round_min_to_interval(value: f64, interval: f64) -> f64 {
    let rounded = interval * (value / interval).floor();
    if value > rounded { rounded } else { value }
}

/// Round `value` up to a multiple of `interval`, unchanged if already on one.
pub fn round_max_to_interval(value: f64, interval: f64) -> f64 {
    let rounded = interval * (value / interval).ceil();
    if value < rounded { rounded } else { value }
}

/// Decimal places needed to distinguish labels at the given tick interval.
pub fn decimal_places(interval: f64) -> usize {
    (-interval.log10()).ceil().max(0.0) as usize
}

/// Format an axis value for the given tick interval.
///
/// Falls back to three decimal places before the first interval is known.
pub fn format_value(value: f64, interval: Option<f64>) -> String {
    match interval {
        Some(interval) => format!("{:.*}", decimal_places(interval), value),
        None => format!("{value:.3}"),
    }
}

/// Tick positions over an interval-aligned viewport range.
///
/// Assumes `view.min` sits on an interval multiple (see the rounding
/// helpers); steps by index to avoid accumulating float error.
pub fn tick_values(view: Range, interval: f64) -> Vec<f64> {
    let mut values = Vec::new();
    if !(interval > 0.0) || !view.is_finite() {
        return values;
    }
    let slack = interval * 1e-6;
    let mut index = 0u32;
    loop {
        let value = view.min + f64::from(index) * interval;
        if value > view.max + slack {
            break;
        }
        values.push(value);
        index += 1;
    }
    values
}
