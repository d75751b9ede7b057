//! Phase-based pocket resolution.
//!
//! Quick throws are decided by the interior, long developing throws by the
//! edges. The phase-adjusted protection margin is bucketed into five ordered
//! pressure tiers; the boundaries are part of the outcome model's contract.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::RUSH_JITTER;
use crate::play::{Blitz, PlayType};
use crate::ratings::composite::{RatedPlayer, UnitKind, UnitRating, aggregate_with};
use crate::ratings::weights::PositionWeightTables;

/// How long the quarterback holds the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RushPhase {
    Quick,
    Standard,
    Extended,
}

impl RushPhase {
    #[must_use]
    pub const fn for_play(play_type: PlayType) -> Self {
        match play_type {
            PlayType::Screen | PlayType::ShortPass => Self::Quick,
            PlayType::DeepPass | PlayType::PlayActionDeep => Self::Extended,
            _ => Self::Standard,
        }
    }

    /// Protection bonus: quick game favors the offense, long drops the rush.
    #[must_use]
    pub const fn protection_bonus(self) -> f64 {
        match self {
            Self::Quick => 8.0,
            Self::Standard => 0.0,
            Self::Extended => -8.0,
        }
    }

    /// Exposure of a weak protector grows with time in the pocket.
    #[must_use]
    pub const fn weak_link_scale(self) -> f64 {
        match self {
            Self::Quick => 0.5,
            Self::Standard => 1.0,
            Self::Extended => 1.5,
        }
    }
}

/// Ordered pressure outcomes, cleanest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureTier {
    Clean,
    Pressure,
    Hurry,
    Hit,
    Sack,
}

impl PressureTier {
    /// `clean > 15`, `pressure >= 5`, `hurry >= -5`, `hit >= -15`, otherwise sack.
    #[must_use]
    pub fn classify(advantage: f64) -> Self {
        if advantage > 15.0 {
            Self::Clean
        } else if advantage >= 5.0 {
            Self::Pressure
        } else if advantage >= -5.0 {
            Self::Hurry
        } else if advantage >= -15.0 {
            Self::Hit
        } else {
            Self::Sack
        }
    }

    /// Shift applied to the completion rate, as a probability.
    #[must_use]
    pub const fn completion_modifier(self) -> f64 {
        match self {
            Self::Clean => 0.08,
            Self::Pressure => -0.03,
            Self::Hurry => -0.10,
            Self::Hit => -0.18,
            Self::Sack => -0.30,
        }
    }

    #[must_use]
    pub const fn sack_multiplier(self) -> f64 {
        match self {
            Self::Clean => 0.3,
            Self::Pressure => 0.8,
            Self::Hurry => 1.2,
            Self::Hit => 1.8,
            Self::Sack => 3.0,
        }
    }

    /// Minimum quarterback mobility needed to escape, if escape is possible at all.
    #[must_use]
    pub const fn scramble_gate(self) -> Option<f64> {
        match self {
            Self::Clean | Self::Pressure => None,
            Self::Hurry => Some(60.0),
            Self::Hit => Some(70.0),
            Self::Sack => Some(80.0),
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Pressure => "pressure",
            Self::Hurry => "hurry",
            Self::Hit => "hit",
            Self::Sack => "sack",
        }
    }
}

/// Rating points the protection loses to an extra rusher package.
#[must_use]
pub const fn blitz_penalty(blitz: Blitz) -> f64 {
    match blitz {
        Blitz::None => 0.0,
        Blitz::Linebacker => 5.0,
        Blitz::DefensiveBack => 6.0,
        Blitz::AllOut => 12.0,
    }
}

/// Protection and rush units re-aggregated with the phase's positional weights.
#[must_use]
pub fn phase_units(
    weights: &PositionWeightTables,
    phase: RushPhase,
    protectors: &[RatedPlayer],
    rushers: &[RatedPlayer],
) -> (UnitRating, UnitRating) {
    let protection = aggregate_with(UnitKind::PassProtection, protectors, |position| {
        weights.protection_phase_weight(phase, position)
    });
    let rush = aggregate_with(UnitKind::PassRush, rushers, |position| {
        weights.rush_phase_weight(phase, position)
    });
    (protection, rush)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassRushInput {
    pub protection: UnitRating,
    pub rush: UnitRating,
    pub blitz: Blitz,
    /// Quarterback escapability on the rating scale.
    pub qb_mobility: f64,
    /// Extra pocket time in seconds (play-action, protection calls).
    pub pocket_time_bonus: f64,
}

/// Result of the pocket phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassRushResult {
    pub phase: RushPhase,
    pub advantage: f64,
    pub tier: PressureTier,
    pub completion_modifier: f64,
    pub sack_multiplier: f64,
    pub scramble_eligible: bool,
    /// Chance a sampled sack turns into a scramble; zero when not eligible.
    pub escape_chance: f64,
}

/// Rating points per second of extra pocket time.
const POCKET_SECOND_POINTS: f64 = 10.0;
const ESCAPE_BASE: f64 = 0.35;
const ESCAPE_PER_MOBILITY_POINT: f64 = 0.0125;
const ESCAPE_MAX: f64 = 0.85;

/// Escape chance for a quarterback of `mobility` against the tier's gate:
/// 35% right at the gate, 1.25 points per mobility point above it, capped at 85%.
#[must_use]
pub fn escape_chance(tier: PressureTier, mobility: f64) -> f64 {
    match tier.scramble_gate() {
        Some(gate) if mobility.is_finite() && mobility >= gate => {
            ESCAPE_PER_MOBILITY_POINT.mul_add(mobility - gate, ESCAPE_BASE).min(ESCAPE_MAX)
        }
        _ => 0.0,
    }
}

/// Score the pocket for one dropback and bucket it into a pressure tier.
pub fn resolve_pass_rush<R>(input: &PassRushInput, play_type: PlayType, rng: &mut R) -> PassRushResult
where
    R: Rng + ?Sized,
{
    let phase = RushPhase::for_play(play_type);
    let jitter = rng.gen_range(-RUSH_JITTER..=RUSH_JITTER);
    let advantage = phase_advantage(input, phase) + jitter;
    let tier = PressureTier::classify(advantage);
    let escape_chance = escape_chance(tier, input.qb_mobility);
    log::debug!(
        "pass rush {phase:?}: advantage {advantage:.1} (jitter {jitter:.1}) -> {}",
        tier.key()
    );
    PassRushResult {
        phase,
        advantage,
        tier,
        completion_modifier: tier.completion_modifier(),
        sack_multiplier: tier.sack_multiplier(),
        scramble_eligible: escape_chance > 0.0,
        escape_chance,
    }
}

/// Deterministic part of the pocket score.
#[must_use]
pub fn phase_advantage(input: &PassRushInput, phase: RushPhase) -> f64 {
    let base = input.protection.effective - input.rush.effective;
    let weak_link = input.protection.weak_link_penalty * phase.weak_link_scale();
    let pocket = if input.pocket_time_bonus.is_finite() {
        input.pocket_time_bonus * POCKET_SECOND_POINTS
    } else {
        0.0
    };
    base + phase.protection_bonus() - blitz_penalty(input.blitz) - weak_link + pocket
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::CountingRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn unit(effective: f64, penalty: f64) -> UnitRating {
        UnitRating {
            effective,
            weak_link_penalty: penalty,
            ..UnitRating::neutral()
        }
    }

    #[test]
    fn tier_boundaries_are_exact() {
        assert_eq!(PressureTier::classify(15.01), PressureTier::Clean);
        assert_eq!(PressureTier::classify(15.0), PressureTier::Pressure);
        assert_eq!(PressureTier::classify(5.0), PressureTier::Pressure);
        assert_eq!(PressureTier::classify(4.99), PressureTier::Hurry);
        assert_eq!(PressureTier::classify(-5.0), PressureTier::Hurry);
        assert_eq!(PressureTier::classify(-5.01), PressureTier::Hit);
        assert_eq!(PressureTier::classify(-15.0), PressureTier::Hit);
        assert_eq!(PressureTier::classify(-15.01), PressureTier::Sack);
    }

    #[test]
    fn phase_and_blitz_shift_advantage() {
        let input = PassRushInput {
            protection: unit(70.0, 4.0),
            rush: unit(65.0, 0.0),
            blitz: Blitz::None,
            qb_mobility: 50.0,
            pocket_time_bonus: 0.0,
        };
        let quick = phase_advantage(&input, RushPhase::Quick);
        let extended = phase_advantage(&input, RushPhase::Extended);
        assert!((quick - (5.0 + 8.0 - 2.0)).abs() < 1e-9);
        assert!((extended - (5.0 - 8.0 - 6.0)).abs() < 1e-9);

        let blitzed = PassRushInput {
            blitz: Blitz::AllOut,
            ..input
        };
        assert!(phase_advantage(&blitzed, RushPhase::Quick) < quick);
    }

    #[test]
    fn mobile_quarterback_can_escape_a_hit() {
        let input = PassRushInput {
            protection: unit(40.0, 0.0),
            rush: unit(70.0, 0.0),
            blitz: Blitz::None,
            qb_mobility: 85.0,
            pocket_time_bonus: 0.0,
        };
        let mut rng = CountingRng::from(ChaCha8Rng::seed_from_u64(4));
        let result = resolve_pass_rush(&input, PlayType::DeepPass, &mut rng);
        assert_eq!(result.phase, RushPhase::Extended);
        assert_eq!(result.tier, PressureTier::Sack);
        assert!(result.scramble_eligible);
        assert!((result.escape_chance - 0.4125).abs() < 1e-9);
        assert!((result.sack_multiplier - 3.0).abs() < f64::EPSILON);
        assert!(rng.draws() > 0);
    }

    #[test]
    fn escape_chance_scales_with_mobility() {
        assert!(escape_chance(PressureTier::Pressure, 99.0).abs() < f64::EPSILON);
        assert!(escape_chance(PressureTier::Sack, 79.0).abs() < f64::EPSILON);
        assert!((escape_chance(PressureTier::Hurry, 60.0) - 0.35).abs() < 1e-9);
        assert!((escape_chance(PressureTier::Hurry, 76.0) - 0.55).abs() < 1e-9);
        assert!((escape_chance(PressureTier::Hurry, 100.0) - 0.85).abs() < 1e-9);
        assert!(escape_chance(PressureTier::Hit, 90.0) > escape_chance(PressureTier::Sack, 90.0));
    }
}
