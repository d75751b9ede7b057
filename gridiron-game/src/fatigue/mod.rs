//! In-game fatigue accumulation and recovery.
//!
//! Fatigue is a 0..=100 gauge per player held in the team's usage ledger.
//! Each snap on the field adds a delta shaped by the play's intensity, the
//! player's position, age, stamina and traits, the current gauge, and heat.
//! Sitting out a snap, the break between drives, and halftime all recover.
pub mod curves;

pub use curves::{
    CurveArchetype, CurveReading, FatigueCurve, SubstitutionUrgency, adjusted_curve,
    injury_risk_multiplier, read_curve,
};

use serde::{Deserialize, Serialize};

use crate::config::FatigueTuning;
use crate::context::WeatherCondition;
use crate::play::{PlayOutcome, PlayType};
use crate::player::{HiddenTrait, Player, Position, Skill};
use crate::team::PlayerUsage;

const FATIGUE_MAX: f64 = 100.0;
const AGE_PIVOT: u8 = 30;
const AGE_STEP: f64 = 0.03;
const SNAP_STEP: f64 = 0.002;
const CURRENT_FATIGUE_DIVISOR: f64 = 200.0;
const HOT_THRESHOLD_F: f64 = 85.0;
const COLD_THRESHOLD_F: f64 = 25.0;

/// Physical load of a single snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayIntensity {
    Low,
    Normal,
    High,
}

impl PlayIntensity {
    #[must_use]
    pub const fn base_cost(self) -> f64 {
        match self {
            Self::Low => 1.0,
            Self::Normal => 2.0,
            Self::High => 3.5,
        }
    }

    /// Long developing plays and long runs after the catch are the heavy ones;
    /// a quick incompletion barely registers.
    #[must_use]
    pub const fn classify(play_type: PlayType, outcome: PlayOutcome) -> Self {
        match outcome {
            PlayOutcome::BigGain | PlayOutcome::Scramble => Self::High,
            PlayOutcome::Incomplete => Self::Low,
            _ => match play_type {
                PlayType::DeepPass | PlayType::PlayActionDeep => Self::High,
                PlayType::QbSneak => Self::Low,
                _ => Self::Normal,
            },
        }
    }
}

#[must_use]
pub const fn position_multiplier(position: Position) -> f64 {
    match position {
        Position::Lt | Position::Lg | Position::C | Position::Rg | Position::Rt => 0.8,
        Position::De | Position::Dt | Position::Nt => 1.3,
        Position::Rb | Position::Fb => 1.2,
        Position::Wr | Position::Cb => 1.1,
        Position::Olb | Position::Mlb | Position::Ilb | Position::Te => 1.0,
        Position::Fs | Position::Ss => 0.9,
        Position::Qb => 0.5,
        Position::K | Position::P => 0.2,
    }
}

/// Everything the per-snap delta depends on.
#[derive(Debug, Clone, Copy)]
pub struct FatigueInput<'a> {
    pub player: &'a Player,
    pub current: f64,
    pub snaps: u32,
    pub weather: &'a WeatherCondition,
}

/// Computes fatigue gains and recoveries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FatigueSystem {
    tuning: FatigueTuning,
}

impl FatigueSystem {
    #[must_use]
    pub fn new(tuning: &FatigueTuning) -> Self {
        Self {
            tuning: tuning.clone(),
        }
    }

    #[must_use]
    pub const fn tuning(&self) -> &FatigueTuning {
        &self.tuning
    }

    /// Fatigue gained by one snap on the field. Always non-negative.
    #[must_use]
    pub fn snap_delta(&self, input: &FatigueInput<'_>, intensity: PlayIntensity) -> f64 {
        let player = input.player;
        let age_factor = if player.age > AGE_PIVOT {
            AGE_STEP.mul_add(f64::from(player.age - AGE_PIVOT), 1.0)
        } else {
            1.0
        };
        let snap_factor = SNAP_STEP.mul_add(f64::from(input.snaps), 1.0);
        let current_factor = 1.0 + input.current.clamp(0.0, FATIGUE_MAX) / CURRENT_FATIGUE_DIVISOR;
        let delta = intensity.base_cost()
            * position_multiplier(player.position)
            * age_factor
            * snap_factor
            * current_factor
            * weather_factor(input.weather)
            * trait_factor(player)
            * stamina_factor(player);
        delta.max(0.0)
    }

    /// Gauge after one snap on the field.
    #[must_use]
    pub fn after_snap(&self, input: &FatigueInput<'_>, intensity: PlayIntensity) -> f64 {
        clamp_fatigue(input.current + self.snap_delta(input, intensity))
    }

    /// Gauge after one snap spent on the sideline.
    #[must_use]
    pub fn bench_recovery(&self, current: f64) -> f64 {
        recover(current, self.tuning.bench_recovery_pct, self.tuning.bench_recovery_flat)
    }

    /// Gauge after the break between possessions.
    #[must_use]
    pub fn drive_recovery(&self, current: f64) -> f64 {
        recover(current, self.tuning.drive_recovery_pct, self.tuning.drive_recovery_flat)
    }

    #[must_use]
    pub fn halftime_recovery(&self, current: f64) -> f64 {
        recover(current, self.tuning.halftime_recovery_pct, 0.0)
    }

    /// Whether the gauge alone is high enough to force a player off.
    #[must_use]
    pub fn needs_rotation(&self, current: f64) -> bool {
        current >= self.tuning.rotation_threshold
    }

    /// The usage curve's reading for `player`, raised to `Required` once the
    /// gauge reaches the rotation threshold.
    #[must_use]
    pub fn substitution_urgency(&self, player: &Player, usage: &PlayerUsage) -> SubstitutionUrgency {
        if self.needs_rotation(usage.fatigue) {
            SubstitutionUrgency::Required
        } else {
            read_curve(player, usage).urgency
        }
    }
}

fn recover(current: f64, pct: f64, flat: f64) -> f64 {
    let current = clamp_fatigue(current);
    clamp_fatigue(current - current.mul_add(pct, flat))
}

#[must_use]
pub fn clamp_fatigue(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, FATIGUE_MAX)
    } else {
        FATIGUE_MAX
    }
}

#[must_use]
pub fn weather_factor(weather: &WeatherCondition) -> f64 {
    if !weather.is_exposed() {
        return 1.0;
    }
    if weather.temperature_f > HOT_THRESHOLD_F {
        1.2
    } else if weather.temperature_f < COLD_THRESHOLD_F {
        1.1
    } else {
        1.0
    }
}

fn trait_factor(player: &Player) -> f64 {
    let mut factor = 1.0;
    if player.has_trait(HiddenTrait::IronMan) {
        factor *= 0.75;
    }
    if player.has_trait(HiddenTrait::Workhorse) {
        factor *= 0.85;
    }
    factor
}

/// 1.3 at zero stamina down to 0.7 at 100.
fn stamina_factor(player: &Player) -> f64 {
    let stamina = player.true_skill(Skill::Stamina).clamp(0.0, 100.0);
    0.6f64.mul_add(-stamina / 100.0, 1.3)
}
