/// Floor for league-average denominators in the form adjustment.
pub const FORM_EPS: f64 = 1e-3;

/// Floor for early/total shares in the segment multiplier.
pub const SEGMENT_EPS: f64 = 1e-4;

/// `num / den`, with `den` floored at `floor` so a zero or negative
/// denominator never yields inf/NaN.
pub fn saturating_ratio(num: f64, den: f64, floor: f64) -> f64 {
    num / den.max(floor)
}

pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}
