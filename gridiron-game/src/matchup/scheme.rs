//! Offensive and defensive schemes: skill requirements and head-to-head effects.
use serde::{Deserialize, Serialize};

use crate::play::{Coverage, PlayType};
use crate::player::{PositionGroup, Skill};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffensiveScheme {
    WestCoast,
    AirRaid,
    SpreadOption,
    PowerRun,
    ProStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefensiveScheme {
    Cover2Zone,
    Cover3Zone,
    ManPress,
    QuartersMatch,
    BlitzHeavy,
    Tampa2,
}

type Requirements = &'static [(Skill, f64)];

impl OffensiveScheme {
    pub const ALL: [Self; 5] = [
        Self::WestCoast,
        Self::AirRaid,
        Self::SpreadOption,
        Self::PowerRun,
        Self::ProStyle,
    ];

    /// Weighted skills the scheme asks of a position group.
    #[must_use]
    pub const fn skill_requirements(self, group: PositionGroup) -> Requirements {
        use Skill::{
            Agility, BallCarrierVision, BreakTackle, Carrying, Catching, DecisionMaking,
            Elusiveness, PassBlock, PlayAction, Release, RouteRunning, RunBlock, Speed, Strength,
            ThrowAccuracyDeep, ThrowAccuracyMedium, ThrowAccuracyShort, ThrowOnRun, ThrowPower,
        };
        match (self, group) {
            (Self::WestCoast, PositionGroup::Quarterback) => {
                &[(ThrowAccuracyShort, 0.5), (DecisionMaking, 0.3), (ThrowOnRun, 0.2)]
            }
            (Self::WestCoast, PositionGroup::Receiver) => {
                &[(RouteRunning, 0.5), (Catching, 0.3), (Agility, 0.2)]
            }
            (Self::WestCoast, PositionGroup::RunningBack) => {
                &[(Catching, 0.4), (Elusiveness, 0.3), (BallCarrierVision, 0.3)]
            }
            (Self::WestCoast, PositionGroup::TightEnd) => {
                &[(Catching, 0.5), (RouteRunning, 0.3), (RunBlock, 0.2)]
            }
            (Self::WestCoast, PositionGroup::OffensiveLine) => &[(PassBlock, 0.7), (Agility, 0.3)],
            (Self::AirRaid, PositionGroup::Quarterback) => {
                &[(ThrowAccuracyDeep, 0.35), (ThrowPower, 0.3), (DecisionMaking, 0.35)]
            }
            (Self::AirRaid, PositionGroup::Receiver) => {
                &[(Speed, 0.4), (RouteRunning, 0.3), (Release, 0.3)]
            }
            (Self::AirRaid, PositionGroup::RunningBack) => &[(Catching, 0.5), (Speed, 0.5)],
            (Self::AirRaid, PositionGroup::TightEnd) => &[(Catching, 0.6), (Speed, 0.4)],
            (Self::AirRaid, PositionGroup::OffensiveLine) => &[(PassBlock, 0.8), (Strength, 0.2)],
            (Self::SpreadOption, PositionGroup::Quarterback) => {
                &[(Speed, 0.35), (ThrowOnRun, 0.35), (DecisionMaking, 0.3)]
            }
            (Self::SpreadOption, PositionGroup::Receiver) => {
                &[(Speed, 0.4), (Release, 0.3), (Catching, 0.3)]
            }
            (Self::SpreadOption, PositionGroup::RunningBack) => {
                &[(Speed, 0.4), (Elusiveness, 0.4), (BallCarrierVision, 0.2)]
            }
            (Self::SpreadOption, PositionGroup::TightEnd) => &[(RunBlock, 0.5), (Catching, 0.5)],
            (Self::SpreadOption, PositionGroup::OffensiveLine) => &[(RunBlock, 0.5), (Agility, 0.5)],
            (Self::PowerRun, PositionGroup::Quarterback) => &[(PlayAction, 0.5), (DecisionMaking, 0.5)],
            (Self::PowerRun, PositionGroup::Receiver) => &[(RunBlock, 0.4), (Catching, 0.6)],
            (Self::PowerRun, PositionGroup::RunningBack) => {
                &[(BreakTackle, 0.4), (Strength, 0.3), (Carrying, 0.3)]
            }
            (Self::PowerRun, PositionGroup::TightEnd) => &[(RunBlock, 0.7), (Strength, 0.3)],
            (Self::PowerRun, PositionGroup::OffensiveLine) => &[(RunBlock, 0.7), (Strength, 0.3)],
            (Self::ProStyle, PositionGroup::Quarterback) => {
                &[(ThrowAccuracyMedium, 0.4), (PlayAction, 0.3), (DecisionMaking, 0.3)]
            }
            (Self::ProStyle, PositionGroup::Receiver) => {
                &[(RouteRunning, 0.4), (Catching, 0.4), (Speed, 0.2)]
            }
            (Self::ProStyle, PositionGroup::RunningBack) => {
                &[(BallCarrierVision, 0.4), (Carrying, 0.3), (Catching, 0.3)]
            }
            (Self::ProStyle, PositionGroup::TightEnd) => &[(Catching, 0.5), (RunBlock, 0.5)],
            (Self::ProStyle, PositionGroup::OffensiveLine) => &[(PassBlock, 0.5), (RunBlock, 0.5)],
            _ => &[],
        }
    }

    #[must_use]
    pub const fn is_pass_first(self) -> bool {
        matches!(self, Self::WestCoast | Self::AirRaid)
    }
}

impl DefensiveScheme {
    pub const ALL: [Self; 6] = [
        Self::Cover2Zone,
        Self::Cover3Zone,
        Self::ManPress,
        Self::QuartersMatch,
        Self::BlitzHeavy,
        Self::Tampa2,
    ];

    #[must_use]
    pub const fn skill_requirements(self, group: PositionGroup) -> Requirements {
        use Skill::{
            Acceleration, BlockShedding, ManCoverage, PassRush, PlayRecognition, Press, Pursuit,
            Speed, Strength, Tackling, ZoneCoverage,
        };
        match (self, group) {
            (Self::Cover2Zone, PositionGroup::DefensiveLine) => &[(PassRush, 0.6), (BlockShedding, 0.4)],
            (Self::Cover2Zone, PositionGroup::Linebacker) => &[(ZoneCoverage, 0.5), (Pursuit, 0.5)],
            (Self::Cover2Zone, PositionGroup::Secondary) => &[(ZoneCoverage, 0.6), (Tackling, 0.4)],
            (Self::Cover3Zone, PositionGroup::DefensiveLine) => &[(BlockShedding, 0.5), (PassRush, 0.5)],
            (Self::Cover3Zone, PositionGroup::Linebacker) => &[(ZoneCoverage, 0.4), (Tackling, 0.6)],
            (Self::Cover3Zone, PositionGroup::Secondary) => &[(ZoneCoverage, 0.6), (Speed, 0.4)],
            (Self::ManPress, PositionGroup::DefensiveLine) => &[(PassRush, 0.7), (Acceleration, 0.3)],
            (Self::ManPress, PositionGroup::Linebacker) => &[(ManCoverage, 0.6), (Speed, 0.4)],
            (Self::ManPress, PositionGroup::Secondary) => &[(Press, 0.4), (ManCoverage, 0.6)],
            (Self::QuartersMatch, PositionGroup::DefensiveLine) => {
                &[(BlockShedding, 0.6), (Strength, 0.4)]
            }
            (Self::QuartersMatch, PositionGroup::Linebacker) => {
                &[(PlayRecognition, 0.5), (ZoneCoverage, 0.5)]
            }
            (Self::QuartersMatch, PositionGroup::Secondary) => {
                &[(PlayRecognition, 0.4), (ZoneCoverage, 0.3), (ManCoverage, 0.3)]
            }
            (Self::BlitzHeavy, PositionGroup::DefensiveLine) => &[(PassRush, 0.6), (Acceleration, 0.4)],
            (Self::BlitzHeavy, PositionGroup::Linebacker) => &[(PassRush, 0.5), (Speed, 0.5)],
            (Self::BlitzHeavy, PositionGroup::Secondary) => &[(ManCoverage, 0.6), (Speed, 0.4)],
            (Self::Tampa2, PositionGroup::DefensiveLine) => &[(PassRush, 0.6), (Speed, 0.4)],
            (Self::Tampa2, PositionGroup::Linebacker) => &[(Speed, 0.5), (ZoneCoverage, 0.5)],
            (Self::Tampa2, PositionGroup::Secondary) => &[(ZoneCoverage, 0.5), (Tackling, 0.5)],
            _ => &[],
        }
    }

    /// Base coverage shell the scheme calls most often.
    #[must_use]
    pub const fn base_coverage(self) -> Coverage {
        match self {
            Self::Cover2Zone | Self::Tampa2 => Coverage::Cover2,
            Self::Cover3Zone => Coverage::Cover3,
            Self::ManPress => Coverage::Cover1,
            Self::QuartersMatch => Coverage::Cover4,
            Self::BlitzHeavy => Coverage::Cover0,
        }
    }
}

/// Percentage-point shifts applied to outcome rates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemeEffect {
    pub completion_pct: f64,
    pub yards_pct: f64,
    pub sack_pct: f64,
    pub interception_pct: f64,
    pub fumble_pct: f64,
    pub big_play_pct: f64,
}

impl SchemeEffect {
    const fn new(
        completion_pct: f64,
        yards_pct: f64,
        sack_pct: f64,
        interception_pct: f64,
        fumble_pct: f64,
        big_play_pct: f64,
    ) -> Self {
        Self {
            completion_pct,
            yards_pct,
            sack_pct,
            interception_pct,
            fumble_pct,
            big_play_pct,
        }
    }

    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            completion_pct: self.completion_pct + other.completion_pct,
            yards_pct: self.yards_pct + other.yards_pct,
            sack_pct: self.sack_pct + other.sack_pct,
            interception_pct: self.interception_pct + other.interception_pct,
            fumble_pct: self.fumble_pct + other.fumble_pct,
            big_play_pct: self.big_play_pct + other.big_play_pct,
        }
    }

    /// Keep the pass-only fields zero for runs and run-only effects muted for passes.
    #[must_use]
    pub fn for_play(self, play_type: PlayType) -> Self {
        if play_type.is_run() {
            Self {
                completion_pct: 0.0,
                sack_pct: 0.0,
                interception_pct: 0.0,
                ..self
            }
        } else {
            self
        }
    }
}

/// Scheme-versus-scheme effect for one play type.
#[must_use]
pub fn scheme_matchup_effect(
    offense: OffensiveScheme,
    defense: DefensiveScheme,
    play_type: PlayType,
) -> SchemeEffect {
    use DefensiveScheme as D;
    use OffensiveScheme as O;
    let effect = match (offense, defense) {
        (O::WestCoast, D::Cover2Zone) => SchemeEffect::new(4.0, 2.0, 0.0, -1.0, 0.0, -3.0),
        (O::WestCoast, D::Cover3Zone) => SchemeEffect::new(5.0, 3.0, 0.0, 0.0, 0.0, 0.0),
        (O::WestCoast, D::ManPress) => SchemeEffect::new(-5.0, -3.0, 2.0, 1.0, 0.0, 0.0),
        (O::WestCoast, D::QuartersMatch) => SchemeEffect::new(-2.0, 0.0, 0.0, 0.0, 0.0, -2.0),
        (O::WestCoast, D::BlitzHeavy) => SchemeEffect::new(3.0, 4.0, -4.0, 0.0, 0.0, 4.0),
        (O::WestCoast, D::Tampa2) => SchemeEffect::new(2.0, 0.0, 0.0, 0.0, 0.0, -4.0),
        (O::AirRaid, D::Cover2Zone) => SchemeEffect::new(-3.0, 2.0, 0.0, 2.0, 0.0, -6.0),
        (O::AirRaid, D::Cover3Zone) => SchemeEffect::new(2.0, 5.0, 0.0, 0.0, 0.0, 4.0),
        (O::AirRaid, D::ManPress) => SchemeEffect::new(-4.0, 6.0, 3.0, 2.0, 0.0, 8.0),
        (O::AirRaid, D::QuartersMatch) => SchemeEffect::new(-4.0, -4.0, 0.0, 2.0, 0.0, -8.0),
        (O::AirRaid, D::BlitzHeavy) => SchemeEffect::new(0.0, 8.0, 5.0, 3.0, 0.0, 10.0),
        (O::AirRaid, D::Tampa2) => SchemeEffect::new(-2.0, -2.0, 0.0, 2.0, 0.0, -5.0),
        (O::SpreadOption, D::Cover2Zone) => SchemeEffect::new(2.0, 4.0, -1.0, 0.0, 1.0, 2.0),
        (O::SpreadOption, D::Cover3Zone) => SchemeEffect::new(0.0, 2.0, 0.0, 0.0, 1.0, 0.0),
        (O::SpreadOption, D::ManPress) => SchemeEffect::new(-2.0, 6.0, -2.0, 0.0, 1.0, 5.0),
        (O::SpreadOption, D::QuartersMatch) => SchemeEffect::new(0.0, -3.0, 0.0, 0.0, 0.0, -2.0),
        (O::SpreadOption, D::BlitzHeavy) => SchemeEffect::new(0.0, 6.0, -3.0, 0.0, 2.0, 6.0),
        (O::SpreadOption, D::Tampa2) => SchemeEffect::new(0.0, 3.0, 0.0, 0.0, 1.0, 2.0),
        (O::PowerRun, D::Cover2Zone) => SchemeEffect::new(0.0, 6.0, 0.0, 0.0, 0.0, 3.0),
        (O::PowerRun, D::Cover3Zone) => SchemeEffect::new(0.0, -2.0, 0.0, 0.0, 0.0, -2.0),
        (O::PowerRun, D::ManPress) => SchemeEffect::new(2.0, 4.0, -1.0, 0.0, 0.0, 2.0),
        (O::PowerRun, D::QuartersMatch) => SchemeEffect::new(0.0, -4.0, 0.0, 0.0, -1.0, -3.0),
        (O::PowerRun, D::BlitzHeavy) => SchemeEffect::new(0.0, -3.0, 1.0, 0.0, 1.0, 4.0),
        (O::PowerRun, D::Tampa2) => SchemeEffect::new(0.0, 5.0, 0.0, 0.0, 0.0, 2.0),
        (O::ProStyle, D::Cover2Zone) => SchemeEffect::new(1.0, 1.0, 0.0, 0.0, 0.0, 0.0),
        (O::ProStyle, D::Cover3Zone) => SchemeEffect::new(1.0, 2.0, 0.0, 0.0, 0.0, 1.0),
        (O::ProStyle, D::ManPress) => SchemeEffect::new(-2.0, 1.0, 1.0, 1.0, 0.0, 2.0),
        (O::ProStyle, D::QuartersMatch) => SchemeEffect::new(0.0, 0.0, 0.0, 0.0, 0.0, -1.0),
        (O::ProStyle, D::BlitzHeavy) => SchemeEffect::new(2.0, 3.0, 2.0, 1.0, 0.0, 5.0),
        (O::ProStyle, D::Tampa2) => SchemeEffect::new(0.0, 1.0, 0.0, 0.0, 0.0, -2.0),
    }
    .for_play(play_type);
    log::trace!("scheme {offense:?} vs {defense:?} on {}: {effect:?}", play_type.label());
    effect
}

/// Coverage shell versus play family.
#[must_use]
pub fn coverage_effect(coverage: Coverage, play_type: PlayType) -> SchemeEffect {
    match (coverage, play_type) {
        (Coverage::Cover0, PlayType::DeepPass | PlayType::PlayActionDeep) => {
            SchemeEffect::new(5.0, 10.0, 3.0, 0.0, 0.0, 15.0)
        }
        (Coverage::Cover0, PlayType::Screen) => SchemeEffect::new(6.0, 12.0, 0.0, 0.0, 0.0, 10.0),
        (Coverage::Cover0, _) if play_type.is_pass() => SchemeEffect::new(0.0, 3.0, 4.0, 0.0, 0.0, 4.0),
        (Coverage::Cover1 | Coverage::Man, PlayType::Screen) => {
            SchemeEffect::new(3.0, 5.0, 0.0, 0.0, 0.0, 3.0)
        }
        (Coverage::Cover1 | Coverage::Man, PlayType::ShortPass | PlayType::PlayActionShort) => {
            SchemeEffect::new(-3.0, 0.0, 0.0, 1.0, 0.0, 0.0)
        }
        (Coverage::Cover2, PlayType::DeepPass | PlayType::PlayActionDeep) => {
            SchemeEffect::new(-4.0, 0.0, 0.0, 1.0, 0.0, -10.0)
        }
        (Coverage::Cover2, PlayType::RunInside | PlayType::Draw) => {
            SchemeEffect::new(0.0, 4.0, 0.0, 0.0, 0.0, 2.0)
        }
        (Coverage::Cover3, PlayType::ShortPass | PlayType::Screen) => {
            SchemeEffect::new(4.0, 0.0, 0.0, 0.0, 0.0, 0.0)
        }
        (Coverage::Cover3, PlayType::DeepPass) => SchemeEffect::new(-2.0, 0.0, 0.0, 1.0, 0.0, -5.0),
        (Coverage::Cover4, PlayType::DeepPass | PlayType::PlayActionDeep) => {
            SchemeEffect::new(-5.0, 0.0, 0.0, 1.0, 0.0, -12.0)
        }
        (Coverage::Cover4, _) if play_type.is_run() => SchemeEffect::new(0.0, 6.0, 0.0, 0.0, 0.0, 3.0),
        _ => SchemeEffect::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_plays_ignore_pass_only_fields() {
        let effect = scheme_matchup_effect(
            OffensiveScheme::AirRaid,
            DefensiveScheme::BlitzHeavy,
            PlayType::RunInside,
        );
        assert!(effect.sack_pct.abs() < f64::EPSILON);
        assert!(effect.interception_pct.abs() < f64::EPSILON);
        assert!(effect.yards_pct > 0.0);
    }

    #[test]
    fn two_deep_shells_limit_big_plays() {
        let cover2 = coverage_effect(Coverage::Cover2, PlayType::DeepPass);
        let cover0 = coverage_effect(Coverage::Cover0, PlayType::DeepPass);
        assert!(cover2.big_play_pct < 0.0);
        assert!(cover0.big_play_pct > cover2.big_play_pct);
    }

    #[test]
    fn every_scheme_has_requirements_for_its_side() {
        for scheme in OffensiveScheme::ALL {
            assert!(!scheme.skill_requirements(PositionGroup::Quarterback).is_empty());
            assert!(scheme.skill_requirements(PositionGroup::Secondary).is_empty());
        }
        for scheme in DefensiveScheme::ALL {
            assert!(!scheme.skill_requirements(PositionGroup::Linebacker).is_empty());
        }
    }
}
