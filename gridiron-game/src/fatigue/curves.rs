//! Position-specific usage curves: how accumulated work erodes performance.
//!
//! Running backs wear by touches, everyone else by snaps. Each archetype is
//! flat up to its degradation threshold, gives up 40% of its total loss by
//! the sharp-decline threshold, then the remaining 60% over the same span
//! again before bottoming out at the floor.
use serde::{Deserialize, Serialize};

use crate::player::{HiddenTrait, Player, Position};
use crate::team::PlayerUsage;

const EARLY_DECLINE_SHARE: f64 = 0.4;
const LATE_DECLINE_SHARE: f64 = 0.6;
const INJURY_RISK_SLOPE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveArchetype {
    RunningBack,
    Quarterback,
    OffensiveLine,
    DefensiveLine,
    Linebacker,
    DefensiveBack,
    WideReceiver,
    TightEnd,
}

impl CurveArchetype {
    #[must_use]
    pub const fn for_position(position: Position) -> Self {
        match position {
            Position::Rb | Position::Fb => Self::RunningBack,
            Position::Qb | Position::K | Position::P => Self::Quarterback,
            Position::Lt | Position::Lg | Position::C | Position::Rg | Position::Rt => Self::OffensiveLine,
            Position::De | Position::Dt | Position::Nt => Self::DefensiveLine,
            Position::Olb | Position::Mlb | Position::Ilb => Self::Linebacker,
            Position::Cb | Position::Fs | Position::Ss => Self::DefensiveBack,
            Position::Wr => Self::WideReceiver,
            Position::Te => Self::TightEnd,
        }
    }

    /// Running backs are measured in touches; everyone else in snaps.
    #[must_use]
    pub const fn counts_touches(self) -> bool {
        matches!(self, Self::RunningBack)
    }

    #[must_use]
    pub const fn base_curve(self) -> FatigueCurve {
        let (degradation_threshold, sharp_decline_threshold, floor) = match self {
            Self::RunningBack => (15.0, 25.0, 0.75),
            Self::Quarterback => (60.0, 80.0, 0.92),
            Self::OffensiveLine => (55.0, 75.0, 0.88),
            Self::DefensiveLine => (35.0, 50.0, 0.78),
            Self::Linebacker => (50.0, 65.0, 0.85),
            Self::DefensiveBack => (55.0, 70.0, 0.85),
            Self::WideReceiver => (45.0, 65.0, 0.85),
            Self::TightEnd => (45.0, 62.0, 0.85),
        };
        FatigueCurve {
            degradation_threshold,
            sharp_decline_threshold,
            floor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatigueCurve {
    pub degradation_threshold: f64,
    pub sharp_decline_threshold: f64,
    pub floor: f64,
}

impl FatigueCurve {
    /// Multiplicative performance factor in `[floor, 1]` for a usage count.
    #[must_use]
    pub fn effectiveness(&self, usage: f64) -> f64 {
        let degrade = self.degradation_threshold;
        let sharp = self.sharp_decline_threshold.max(degrade + 1.0);
        let span = sharp - degrade;
        let total_loss = 1.0 - self.floor;
        if !usage.is_finite() || usage <= degrade {
            return 1.0;
        }
        if usage <= sharp {
            return total_loss.mul_add(-EARLY_DECLINE_SHARE * (usage - degrade) / span, 1.0);
        }
        let late = ((usage - sharp) / span).min(1.0);
        let value = 1.0 - total_loss * EARLY_DECLINE_SHARE - total_loss * LATE_DECLINE_SHARE * late;
        value.max(self.floor)
    }

    #[must_use]
    pub fn urgency(&self, usage: f64) -> SubstitutionUrgency {
        let midpoint = (self.degradation_threshold + self.sharp_decline_threshold) / 2.0;
        if usage < self.degradation_threshold {
            SubstitutionUrgency::None
        } else if usage < midpoint {
            SubstitutionUrgency::Consider
        } else if usage < self.sharp_decline_threshold {
            SubstitutionUrgency::Recommended
        } else {
            SubstitutionUrgency::Required
        }
    }
}

/// How urgently the player should come off the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionUrgency {
    None,
    Consider,
    Recommended,
    Required,
}

/// Archetype curve shifted for age and durability/effort traits.
#[must_use]
pub fn adjusted_curve(player: &Player) -> FatigueCurve {
    let mut curve = CurveArchetype::for_position(player.position).base_curve();
    let mut scale = 1.0;
    if player.age > 30 {
        scale *= 0.03f64.mul_add(-f64::from(player.age - 30), 1.0).max(0.7);
    } else if player.age < 25 {
        scale *= 1.05;
    }
    if player.has_trait(HiddenTrait::IronMan) {
        scale *= 1.2;
    }
    if player.has_trait(HiddenTrait::Workhorse) {
        scale *= 1.15;
    }
    if player.has_trait(HiddenTrait::Motor) {
        scale *= 1.1;
    }
    if player.has_trait(HiddenTrait::Lazy) {
        scale *= 0.9;
        curve.floor = (curve.floor - 0.03).max(0.5);
    }
    curve.degradation_threshold *= scale;
    curve.sharp_decline_threshold *= scale;
    curve
}

/// `1 + (1 - effectiveness) * 3`.
#[must_use]
pub fn injury_risk_multiplier(effectiveness: f64) -> f64 {
    (1.0 - effectiveness.clamp(0.0, 1.0)).mul_add(INJURY_RISK_SLOPE, 1.0)
}

/// Full curve reading for one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveReading {
    pub archetype: CurveArchetype,
    pub usage: f64,
    pub effectiveness: f64,
    pub urgency: SubstitutionUrgency,
    pub injury_risk: f64,
}

#[must_use]
pub fn read_curve(player: &Player, usage: &PlayerUsage) -> CurveReading {
    let archetype = CurveArchetype::for_position(player.position);
    let count = if archetype.counts_touches() {
        usage.touches
    } else {
        usage.snaps
    };
    let usage_value = f64::from(count);
    let curve = adjusted_curve(player);
    let effectiveness = curve.effectiveness(usage_value);
    CurveReading {
        archetype,
        usage: usage_value,
        effectiveness,
        urgency: curve.urgency(usage_value),
        injury_risk: injury_risk_multiplier(effectiveness),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerId, PlayerRole};

    #[test]
    fn running_back_curve_shape() {
        let curve = CurveArchetype::RunningBack.base_curve();
        assert!((curve.effectiveness(10.0) - 1.0).abs() < f64::EPSILON);
        assert!((curve.effectiveness(25.0) - 0.9).abs() < 1e-9);
        assert!((curve.effectiveness(35.0) - 0.75).abs() < 1e-9);
        assert!((curve.effectiveness(80.0) - 0.75).abs() < 1e-9);
        assert!(curve.effectiveness(20.0) > curve.effectiveness(24.0));
    }

    #[test]
    fn urgency_escalates() {
        let curve = CurveArchetype::DefensiveLine.base_curve();
        assert_eq!(curve.urgency(10.0), SubstitutionUrgency::None);
        assert_eq!(curve.urgency(40.0), SubstitutionUrgency::Consider);
        assert_eq!(curve.urgency(45.0), SubstitutionUrgency::Recommended);
        assert_eq!(curve.urgency(50.0), SubstitutionUrgency::Required);
    }

    #[test]
    fn veterans_wear_sooner_and_iron_men_later() {
        let mut veteran = Player::new(PlayerId(1), "Vet", Position::Rb, PlayerRole::FeatureBack);
        veteran.age = 33;
        let iron = Player::new(PlayerId(2), "Iron", Position::Rb, PlayerRole::FeatureBack)
            .with_trait(HiddenTrait::IronMan);
        let base = CurveArchetype::RunningBack.base_curve();
        assert!(adjusted_curve(&veteran).degradation_threshold < base.degradation_threshold);
        assert!(adjusted_curve(&iron).degradation_threshold > base.degradation_threshold);
    }

    #[test]
    fn risk_grows_as_effectiveness_falls() {
        assert!((injury_risk_multiplier(1.0) - 1.0).abs() < f64::EPSILON);
        assert!((injury_risk_multiplier(0.75) - 1.75).abs() < 1e-9);
    }

    #[test]
    fn backs_are_read_by_touches() {
        let back = Player::new(PlayerId(3), "Back", Position::Rb, PlayerRole::FeatureBack);
        let usage = PlayerUsage {
            snaps: 60,
            touches: 5,
            ..PlayerUsage::default()
        };
        let reading = read_curve(&back, &usage);
        assert!((reading.usage - 5.0).abs() < f64::EPSILON);
        assert_eq!(reading.urgency, SubstitutionUrgency::None);
    }
}
