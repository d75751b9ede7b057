//! Numeric helpers centralizing rating clamps and safe numeric casts.

use num_traits::cast::cast;

/// Lowest value any rating may take after clamping.
pub const RATING_FLOOR: f64 = 1.0;
/// Highest value any rating may take after clamping.
pub const RATING_CEILING: f64 = 100.0;
/// Neutral rating used whenever an input is missing or degenerate.
pub const NEUTRAL_RATING: f64 = 50.0;

/// Clamp a rating into `[1, 100]`, mapping non-finite input to neutral.
#[must_use]
pub fn clamp_rating(value: f64) -> f64 {
    if !value.is_finite() {
        return NEUTRAL_RATING;
    }
    value.clamp(RATING_FLOOR, RATING_CEILING)
}

/// Clamp a probability into `[0, 1]`, mapping non-finite input to zero.
#[must_use]
pub fn clamp_probability(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Round a f64 into the `u8` range, saturating at both ends.
#[must_use]
pub fn round_f64_to_u8(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    let clamped = value.clamp(0.0, f64::from(u8::MAX)).round();
    cast::<f64, u8>(clamped).unwrap_or(0)
}

/// Convert a count into f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Arithmetic mean of a slice, `None` when empty.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / usize_to_f64(values.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_clamp_handles_bounds_and_nan() {
        assert!((clamp_rating(140.0) - 100.0).abs() < f64::EPSILON);
        assert!((clamp_rating(-3.0) - 1.0).abs() < f64::EPSILON);
        assert!((clamp_rating(f64::NAN) - NEUTRAL_RATING).abs() < f64::EPSILON);
    }

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f64_to_i32(1.6), 2);
        assert_eq!(round_f64_to_i32(f64::NAN), 0);
        assert_eq!(round_f64_to_i32(f64::from(i32::MAX) * 2.0), i32::MAX);
        assert_eq!(round_f64_to_u8(300.0), u8::MAX);
        assert_eq!(round_f64_to_u8(-4.0), 0);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert!(mean(&[]).is_none());
        assert!((mean(&[2.0, 4.0]).unwrap_or_default() - 3.0).abs() < f64::EPSILON);
    }
}
