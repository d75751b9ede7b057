//! Truncated, optionally skewed Gaussian yardage sampling.
//!
//! Each outcome carries a profile (range, centre, spread, skew). Draws use a
//! split normal: the right half of the curve is widened by `1 + skew` and the
//! left half narrowed by `1 - skew`, so a positive skew keeps most samples
//! near the centre with a long upper tail. Draws outside the range are
//! resampled a bounded number of times before the last draw is clamped.
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::numbers::round_f64_to_i32;
use crate::play::PlayOutcome;

/// Share of one standard deviation the mean moves per unit of advantage.
const ADVANTAGE_MEAN_SHIFT: f64 = 0.5;

/// Inclusive yardage bounds for an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YardRange {
    pub min: i32,
    pub max: i32,
}

impl YardRange {
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn contains(&self, yards: i32) -> bool {
        yards >= self.min && yards <= self.max
    }

    /// Cap positive yardage at `limit` (the distance to the end zone).
    #[must_use]
    pub fn capped_at(self, limit: i32) -> Self {
        let max = self.max.min(limit);
        Self {
            min: self.min.min(max),
            max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YardageProfile {
    pub range: YardRange,
    pub mean: f64,
    pub std_dev: f64,
    /// In `[0, 1)`; zero is a plain normal.
    pub skew: f64,
}

impl YardageProfile {
    const fn new(min: i32, max: i32, mean: f64, std_dev: f64, skew: f64) -> Self {
        Self {
            range: YardRange::new(min, max),
            mean,
            std_dev,
            skew,
        }
    }

    const fn fixed(yards: i32) -> Self {
        Self::new(yards, yards, 0.0, 0.0, 0.0)
    }
}

/// Interceptions and fumbles report the spot of the turnover relative to the
/// line of scrimmage.
#[must_use]
pub const fn yardage_profile(outcome: PlayOutcome) -> YardageProfile {
    match outcome {
        PlayOutcome::Loss => YardageProfile::new(-5, -1, -2.0, 1.2, 0.0),
        PlayOutcome::NoGain | PlayOutcome::Incomplete => YardageProfile::fixed(0),
        PlayOutcome::ShortGain => YardageProfile::new(1, 4, 2.5, 1.2, 0.0),
        PlayOutcome::GoodGain => YardageProfile::new(5, 14, 8.0, 2.5, 0.3),
        PlayOutcome::BigGain => YardageProfile::new(15, 80, 18.0, 7.0, 0.7),
        PlayOutcome::Sack => YardageProfile::new(-10, -2, -6.0, 2.0, 0.0),
        PlayOutcome::Interception => YardageProfile::new(5, 30, 12.0, 6.0, 0.0),
        PlayOutcome::Fumble => YardageProfile::new(-3, 8, 2.0, 3.0, 0.0),
        PlayOutcome::FumbleRecovered => YardageProfile::new(-3, 8, 1.0, 3.0, 0.0),
        PlayOutcome::Scramble => YardageProfile::new(0, 15, 5.0, 3.0, 0.4),
    }
}

/// Parameters for one yardage draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YardageDraw {
    pub profile: YardageProfile,
    /// Range after capping at the end zone.
    pub range: YardRange,
    /// Clamped matchup advantage in `[-1, 1]`.
    pub advantage: f64,
    /// Scheme yardage shift in percent; only stretches gains.
    pub yards_pct: f64,
    pub attempts: u8,
}

impl YardageDraw {
    #[must_use]
    pub fn shifted_mean(&self) -> f64 {
        let profile = &self.profile;
        let mut mean = (self.advantage.clamp(-1.0, 1.0) * profile.std_dev).mul_add(ADVANTAGE_MEAN_SHIFT, profile.mean);
        if profile.mean > 0.0 && self.yards_pct.is_finite() {
            mean *= 1.0 + self.yards_pct / 100.0;
        }
        mean
    }
}

/// Draw yards for an outcome. Always lands inside `draw.range`.
pub fn sample_yardage<R>(draw: &YardageDraw, rng: &mut R) -> i32
where
    R: Rng + ?Sized,
{
    let range = draw.range;
    if range.min >= range.max {
        return range.min;
    }
    let profile = &draw.profile;
    let mean = draw.shifted_mean();
    if profile.std_dev <= 0.0 {
        return round_f64_to_i32(mean).clamp(range.min, range.max);
    }
    let skew = profile.skew.clamp(0.0, 0.95);
    let lower = f64::from(range.min) - 0.5;
    let upper = f64::from(range.max) + 0.5;
    let mut value = mean;
    for _ in 0..draw.attempts.max(1) {
        let z: f64 = rng.sample(StandardNormal);
        let spread = if z >= 0.0 {
            profile.std_dev * (1.0 + skew)
        } else {
            profile.std_dev * (1.0 - skew)
        };
        value = z.mul_add(spread, mean);
        if value >= lower && value < upper {
            break;
        }
    }
    round_f64_to_i32(value).clamp(range.min, range.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn draw_for(outcome: PlayOutcome, advantage: f64) -> YardageDraw {
        let profile = yardage_profile(outcome);
        YardageDraw {
            profile,
            range: profile.range,
            advantage,
            yards_pct: 0.0,
            attempts: 8,
        }
    }

    #[test]
    fn profiles_centre_inside_their_ranges() {
        for outcome in PlayOutcome::ALL {
            let profile = yardage_profile(outcome);
            assert!(profile.range.min <= profile.range.max, "{outcome:?}");
            if profile.std_dev > 0.0 {
                let centre = round_f64_to_i32(profile.mean);
                assert!(profile.range.contains(centre), "{outcome:?}");
            }
        }
    }

    #[test]
    fn samples_respect_capped_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut draw = draw_for(PlayOutcome::BigGain, 1.0);
        draw.range = draw.profile.range.capped_at(22);
        for _ in 0..2_000 {
            let yards = sample_yardage(&draw, &mut rng);
            assert!((15..=22).contains(&yards));
        }
    }

    #[test]
    fn big_gains_cluster_low_with_a_tail() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let draw = draw_for(PlayOutcome::BigGain, 0.0);
        let samples: Vec<i32> = (0..5_000).map(|_| sample_yardage(&draw, &mut rng)).collect();
        let under_thirty = samples.iter().filter(|&&y| y < 30).count();
        let over_forty = samples.iter().filter(|&&y| y >= 40).count();
        assert!(under_thirty > samples.len() * 3 / 4);
        assert!(over_forty > 0);
    }

    #[test]
    fn advantage_moves_the_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let average = |advantage: f64, rng: &mut ChaCha8Rng| {
            let draw = draw_for(PlayOutcome::GoodGain, advantage);
            let total: i64 = (0..4_000).map(|_| i64::from(sample_yardage(&draw, rng))).sum();
            total as f64 / 4_000.0
        };
        let weak = average(-1.0, &mut rng);
        let strong = average(1.0, &mut rng);
        assert!(strong > weak + 1.0, "strong {strong} weak {weak}");
    }

    #[test]
    fn fixed_outcomes_never_draw() {
        let mut rng = crate::rng::CountingRng::from(ChaCha8Rng::seed_from_u64(1));
        let draw = draw_for(PlayOutcome::Incomplete, 0.5);
        assert_eq!(sample_yardage(&draw, &mut rng), 0);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn capping_below_the_minimum_collapses_the_range() {
        let range = YardRange::new(15, 80).capped_at(3);
        assert_eq!(range, YardRange::new(3, 3));
        let loss = YardRange::new(-5, -1).capped_at(3);
        assert_eq!(loss, YardRange::new(-5, -1));
    }
}
