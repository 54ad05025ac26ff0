//! Ease-out interpolation of the displayed progress

use crate::constants::{DISPLAY_CEILING, MIN_SMOOTHING_STEP, SMOOTHING_FACTOR};

/// Advance `current` one tick toward `target`.
///
/// Covers a quarter of the remaining gap, at least half a point, and never
/// passes `target` or the 99 ceiling. Only completion shows 100.
pub fn next_display(current: f64, target: f64) -> f64 {
    let cap = target.min(DISPLAY_CEILING).max(0.0);
    let step = MIN_SMOOTHING_STEP.max((target - current) * SMOOTHING_FACTOR);
    (current + step).min(cap)
}
