//! Division-guarded arithmetic for metric composers.
//!
//! Every ratio on the dashboard goes through these helpers so a zero
//! denominator yields 0 rather than NaN or infinity.

/// `num / den`, or 0 when `den` is zero or the result is not finite.
#[must_use]
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    finite_or_zero(num / den)
}

/// `ratio(num, den) * 100`, rounded to two decimals.
#[must_use]
pub fn percent(num: f64, den: f64) -> f64 {
    round2(ratio(num, den) * 100.0)
}

/// Average of `sum` over `count` with the count clamped to at least 1.
#[must_use]
pub fn mean(sum: f64, count: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let den = count.max(1) as f64;
    finite_or_zero(sum / den)
}

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    finite_or_zero((value * 100.0).round() / 100.0)
}

#[must_use]
pub const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(3.0, 0.0, 0.0)]
    #[case(0.0, 0.0, 0.0)]
    #[case(1.0, 4.0, 0.25)]
    #[case(f64::INFINITY, 2.0, 0.0)]
    #[case(f64::NAN, 2.0, 0.0)]
    fn ratio_is_guarded(#[case] num: f64, #[case] den: f64, #[case] expected: f64) {
        let got = ratio(num, den);
        assert!(got.is_finite());
        assert!((got - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_rounds() {
        assert!((percent(1.0, 3.0) - 33.33).abs() < 1e-9);
        assert!((percent(5.0, 0.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn mean_clamps_zero_count() {
        assert!((mean(10.0, 0) - 10.0).abs() < f64::EPSILON);
        assert!((mean(0.0, 0)).abs() < f64::EPSILON);
        assert!((mean(9.0, 3) - 3.0).abs() < f64::EPSILON);
    }
}
