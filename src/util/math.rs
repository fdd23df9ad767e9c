//! Numeric helpers shared by the classification passes.

/// Exponential moving average step: `(1 - rate) * current + rate * sample`.
#[inline]
pub(crate) fn ema(current: f32, sample: f32, rate: f32) -> f32 {
    (1.0 - rate) * current + rate * sample
}

/// Returns true when `a` and `b` are strictly closer than `tolerance`.
#[inline]
pub(crate) fn within(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() < tolerance
}

/// Integer ceiling division for block counts.
#[inline]
pub(crate) fn div_ceil(value: usize, divisor: usize) -> usize {
    value.div_ceil(divisor)
}
