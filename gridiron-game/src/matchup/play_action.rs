//! Play-action credibility from the recent run game.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::constants::{
    BIG_RUN_MULTIPLIER, BIG_RUN_YARDS, PLAY_ACTION_MAX_MULTIPLIER, PLAY_ACTION_MIN_MULTIPLIER,
    RUN_WINDOW, SUCCESS_YARDS_CAP,
};
use crate::numbers::usize_to_f64;

/// One recorded rushing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSample {
    pub yards: i32,
    pub yards_needed: i32,
}

impl RunSample {
    /// Gained at least `min(needed, 4)` yards.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.yards >= self.yards_needed.min(SUCCESS_YARDS_CAP)
    }
}

/// Rolling window of the offense's last ten runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunGameTracker {
    runs: VecDeque<RunSample>,
}

impl RunGameTracker {
    pub fn record(&mut self, yards: i32, yards_needed: i32) {
        if self.runs.len() == RUN_WINDOW {
            self.runs.pop_front();
        }
        self.runs.push_back(RunSample {
            yards,
            yards_needed: yards_needed.max(1),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    #[must_use]
    pub fn yards_per_carry(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        let total: i32 = self.runs.iter().map(|run| run.yards).sum();
        f64::from(total) / usize_to_f64(self.runs.len())
    }

    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        let successes = self.runs.iter().filter(|run| run.is_success()).count();
        usize_to_f64(successes) / usize_to_f64(self.runs.len())
    }

    #[must_use]
    pub fn big_runs(&self) -> usize {
        self.runs.iter().filter(|run| run.yards >= BIG_RUN_YARDS).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayActionTier {
    Elite,
    Good,
    Average,
    Mediocre,
    Poor,
}

impl PlayActionTier {
    #[must_use]
    pub fn classify(tracker: &RunGameTracker) -> Self {
        if tracker.len() < 3 {
            return Self::Average;
        }
        let ypc = tracker.yards_per_carry();
        let success = tracker.success_rate();
        if ypc >= 5.5 && success >= 0.55 {
            Self::Elite
        } else if ypc >= 4.5 && success >= 0.45 {
            Self::Good
        } else if ypc >= 3.8 || success >= 0.40 {
            Self::Average
        } else if ypc >= 3.0 {
            Self::Mediocre
        } else {
            Self::Poor
        }
    }

    /// `(route bonus, pocket seconds, deep completion shift, multiplier)`.
    const fn effects(self) -> (f64, f64, f64, f64) {
        match self {
            Self::Elite => (8.0, 0.4, 0.10, 1.35),
            Self::Good => (5.0, 0.25, 0.06, 1.2),
            Self::Average => (2.0, 0.1, 0.02, 1.0),
            Self::Mediocre => (0.0, 0.0, -0.02, 0.85),
            Self::Poor => (-3.0, -0.1, -0.05, 0.7),
        }
    }
}

/// Bonuses a play-action fake earns this snap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayActionBonus {
    pub tier: PlayActionTier,
    pub route_bonus: f64,
    pub pocket_time_bonus: f64,
    pub deep_completion_bonus: f64,
    pub multiplier: f64,
}

/// Evaluate how much the defense respects the fake.
#[must_use]
pub fn play_action_effectiveness(tracker: &RunGameTracker) -> PlayActionBonus {
    let tier = PlayActionTier::classify(tracker);
    let (route_bonus, pocket_time_bonus, deep_completion_bonus, base) = tier.effects();
    let mut multiplier = base;
    if tracker.big_runs() >= 2 {
        multiplier *= BIG_RUN_MULTIPLIER;
    }
    PlayActionBonus {
        tier,
        route_bonus,
        pocket_time_bonus,
        deep_completion_bonus,
        multiplier: multiplier.clamp(PLAY_ACTION_MIN_MULTIPLIER, PLAY_ACTION_MAX_MULTIPLIER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(runs: &[i32]) -> RunGameTracker {
        let mut tracker = RunGameTracker::default();
        for yards in runs {
            tracker.record(*yards, 10);
        }
        tracker
    }

    #[test]
    fn window_keeps_last_ten() {
        let tracker = tracker(&[0; 15]);
        assert_eq!(tracker.len(), 10);
    }

    #[test]
    fn thin_sample_is_average() {
        assert_eq!(PlayActionTier::classify(&tracker(&[20, 20])), PlayActionTier::Average);
    }

    #[test]
    fn strong_run_game_is_elite_with_big_run_boost() {
        let bonus = play_action_effectiveness(&tracker(&[6, 5, 18, 4, 16, 7]));
        assert_eq!(bonus.tier, PlayActionTier::Elite);
        assert!((bonus.multiplier - 1.35 * 1.1).abs() < 1e-9);
    }

    #[test]
    fn stuffed_run_game_is_poor() {
        let bonus = play_action_effectiveness(&tracker(&[0, 1, -2, 2, 1]));
        assert_eq!(bonus.tier, PlayActionTier::Poor);
        assert!((bonus.multiplier - 0.7).abs() < f64::EPSILON);
        assert!(bonus.route_bonus < 0.0);
    }

    #[test]
    fn success_uses_capped_need() {
        let sample = RunSample {
            yards: 4,
            yards_needed: 10,
        };
        assert!(sample.is_success());
        let short = RunSample {
            yards: 1,
            yards_needed: 2,
        };
        assert!(!short.is_success());
    }
}
