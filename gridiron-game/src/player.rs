//! Player data model: identity, hidden skill ratings, traits and condition.
//!
//! True skill values are the ground truth consumed by the resolution core.
//! Perceived ranges belong to scouting and are carried only so the same
//! record can round-trip through the roster layer.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::injury::{InjurySeverity, InjuryType};
use crate::numbers::{NEUTRAL_RATING, clamp_rating, mean};

/// Stable identifier used to key every per-player arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// On-field position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Qb,
    Rb,
    Fb,
    Wr,
    Te,
    Lt,
    Lg,
    C,
    Rg,
    Rt,
    De,
    Dt,
    Nt,
    Olb,
    Mlb,
    Ilb,
    Cb,
    Fs,
    Ss,
    K,
    P,
}

impl Position {
    pub const ALL: [Self; 21] = [
        Self::Qb,
        Self::Rb,
        Self::Fb,
        Self::Wr,
        Self::Te,
        Self::Lt,
        Self::Lg,
        Self::C,
        Self::Rg,
        Self::Rt,
        Self::De,
        Self::Dt,
        Self::Nt,
        Self::Olb,
        Self::Mlb,
        Self::Ilb,
        Self::Cb,
        Self::Fs,
        Self::Ss,
        Self::K,
        Self::P,
    ];

    pub const OFFENSIVE_LINE: [Self; 5] = [Self::Lt, Self::Lg, Self::C, Self::Rg, Self::Rt];

    #[must_use]
    pub const fn group(self) -> PositionGroup {
        match self {
            Self::Qb => PositionGroup::Quarterback,
            Self::Rb | Self::Fb => PositionGroup::RunningBack,
            Self::Wr => PositionGroup::Receiver,
            Self::Te => PositionGroup::TightEnd,
            Self::Lt | Self::Lg | Self::C | Self::Rg | Self::Rt => PositionGroup::OffensiveLine,
            Self::De | Self::Dt | Self::Nt => PositionGroup::DefensiveLine,
            Self::Olb | Self::Mlb | Self::Ilb => PositionGroup::Linebacker,
            Self::Cb | Self::Fs | Self::Ss => PositionGroup::Secondary,
            Self::K | Self::P => PositionGroup::Specialist,
        }
    }

    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Qb => "QB",
            Self::Rb => "RB",
            Self::Fb => "FB",
            Self::Wr => "WR",
            Self::Te => "TE",
            Self::Lt => "LT",
            Self::Lg => "LG",
            Self::C => "C",
            Self::Rg => "RG",
            Self::Rt => "RT",
            Self::De => "DE",
            Self::Dt => "DT",
            Self::Nt => "NT",
            Self::Olb => "OLB",
            Self::Mlb => "MLB",
            Self::Ilb => "ILB",
            Self::Cb => "CB",
            Self::Fs => "FS",
            Self::Ss => "SS",
            Self::K => "K",
            Self::P => "P",
        }
    }

    #[must_use]
    pub const fn is_offense(self) -> bool {
        matches!(
            self.group(),
            PositionGroup::Quarterback
                | PositionGroup::RunningBack
                | PositionGroup::Receiver
                | PositionGroup::TightEnd
                | PositionGroup::OffensiveLine
        )
    }

    #[must_use]
    pub const fn is_defense(self) -> bool {
        matches!(
            self.group(),
            PositionGroup::DefensiveLine | PositionGroup::Linebacker | PositionGroup::Secondary
        )
    }
}

/// Coarse grouping used by coaches, fatigue archetypes and injury tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionGroup {
    Quarterback,
    RunningBack,
    Receiver,
    TightEnd,
    OffensiveLine,
    DefensiveLine,
    Linebacker,
    Secondary,
    Specialist,
}

/// Hidden skill dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Speed,
    Acceleration,
    Agility,
    Strength,
    Stamina,
    Toughness,
    Awareness,
    DecisionMaking,
    ThrowPower,
    ThrowAccuracyShort,
    ThrowAccuracyMedium,
    ThrowAccuracyDeep,
    ThrowOnRun,
    PlayAction,
    Carrying,
    BallCarrierVision,
    Elusiveness,
    BreakTackle,
    Catching,
    RouteRunning,
    Release,
    PassBlock,
    RunBlock,
    PassRush,
    BlockShedding,
    Tackling,
    Pursuit,
    PlayRecognition,
    ManCoverage,
    ZoneCoverage,
    Press,
    HitPower,
    KickPower,
    KickAccuracy,
}

impl Skill {
    pub const ALL: [Self; 34] = [
        Self::Speed,
        Self::Acceleration,
        Self::Agility,
        Self::Strength,
        Self::Stamina,
        Self::Toughness,
        Self::Awareness,
        Self::DecisionMaking,
        Self::ThrowPower,
        Self::ThrowAccuracyShort,
        Self::ThrowAccuracyMedium,
        Self::ThrowAccuracyDeep,
        Self::ThrowOnRun,
        Self::PlayAction,
        Self::Carrying,
        Self::BallCarrierVision,
        Self::Elusiveness,
        Self::BreakTackle,
        Self::Catching,
        Self::RouteRunning,
        Self::Release,
        Self::PassBlock,
        Self::RunBlock,
        Self::PassRush,
        Self::BlockShedding,
        Self::Tackling,
        Self::Pursuit,
        Self::PlayRecognition,
        Self::ManCoverage,
        Self::ZoneCoverage,
        Self::Press,
        Self::HitPower,
        Self::KickPower,
        Self::KickAccuracy,
    ];

    /// Skills whose execution depends on handling the ball; weather hits these harder.
    #[must_use]
    pub const fn is_ball_skill(self) -> bool {
        matches!(
            self,
            Self::ThrowPower
                | Self::ThrowAccuracyShort
                | Self::ThrowAccuracyMedium
                | Self::ThrowAccuracyDeep
                | Self::ThrowOnRun
                | Self::Carrying
                | Self::Catching
                | Self::KickPower
                | Self::KickAccuracy
        )
    }

    /// Skills that rely on footing and top-end movement.
    #[must_use]
    pub const fn is_movement_skill(self) -> bool {
        matches!(
            self,
            Self::Speed | Self::Acceleration | Self::Agility | Self::Elusiveness | Self::Pursuit
        )
    }
}

/// One hidden skill: the ground truth plus the scouting window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillRating {
    pub true_value: f64,
    pub perceived_min: f64,
    pub perceived_max: f64,
}

impl SkillRating {
    /// Rating with a perfectly scouted window.
    #[must_use]
    pub fn exact(value: f64) -> Self {
        let value = clamp_rating(value);
        Self {
            true_value: value,
            perceived_min: value,
            perceived_max: value,
        }
    }
}

/// Hidden personality and physical tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenTrait {
    Clutch,
    Choker,
    IronMan,
    InjuryProne,
    Motor,
    Lazy,
    FilmJunkie,
    Workhorse,
    Undisciplined,
}

/// Current injury carried into a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryStatus {
    pub injury_type: InjuryType,
    pub severity: InjurySeverity,
    pub weeks_remaining: u8,
}

impl InjuryStatus {
    /// Players with a major or worse injury are kept off the field.
    #[must_use]
    pub const fn keeps_player_out(&self) -> bool {
        self.weeks_remaining > 0
            && matches!(
                self.severity,
                InjurySeverity::Major | InjurySeverity::Severe | InjurySeverity::SeasonEnding
            )
    }
}

/// Tactical roles a player can be asked to fill on a snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    PocketPasser,
    Scrambler,
    FeatureBack,
    ReceivingBack,
    PowerBack,
    DeepThreat,
    Possession,
    Slot,
    BlockingTightEnd,
    ReceivingTightEnd,
    PassProtector,
    RoadGrader,
    EdgeRusher,
    RunStuffer,
    Coverage,
    Thumper,
    Press,
    Zone,
    Centerfield,
    Box,
    Specialist,
}

/// Assigned role and how well the player fills it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleFit {
    pub role: PlayerRole,
    /// 0 to 100, 50 is an average fit.
    pub effectiveness: f64,
}

/// Player record consumed by the resolution core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub skills: BTreeMap<Skill, SkillRating>,
    #[serde(default)]
    pub hidden_traits: BTreeSet<HiddenTrait>,
    pub age: u8,
    #[serde(default)]
    pub experience_years: u8,
    /// Fatigue carried into the game (0 to 100).
    #[serde(default)]
    pub fatigue: f64,
    #[serde(default = "default_morale")]
    pub morale: f64,
    #[serde(default)]
    pub injury: Option<InjuryStatus>,
    pub role_fit: RoleFit,
    /// Clutch tendency (0 to 100, 50 neutral).
    #[serde(default = "default_it_factor")]
    pub it_factor: f64,
}

const fn default_morale() -> f64 {
    NEUTRAL_RATING
}

const fn default_it_factor() -> f64 {
    NEUTRAL_RATING
}

impl Player {
    /// Build a player with a uniform skill profile; handy for rosters assembled in code.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, position: Position, role: PlayerRole) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            skills: BTreeMap::new(),
            hidden_traits: BTreeSet::new(),
            age: 26,
            experience_years: 4,
            fatigue: 0.0,
            morale: default_morale(),
            injury: None,
            role_fit: RoleFit {
                role,
                effectiveness: NEUTRAL_RATING,
            },
            it_factor: default_it_factor(),
        }
    }

    /// Builder helper setting one skill to an exactly scouted value.
    #[must_use]
    pub fn with_skill(mut self, skill: Skill, value: f64) -> Self {
        self.skills.insert(skill, SkillRating::exact(value));
        self
    }

    /// Builder helper setting many skills to the same value.
    #[must_use]
    pub fn with_skills(mut self, skills: &[Skill], value: f64) -> Self {
        for skill in skills {
            self.skills.insert(*skill, SkillRating::exact(value));
        }
        self
    }

    /// Builder helper adding a hidden trait.
    #[must_use]
    pub fn with_trait(mut self, hidden: HiddenTrait) -> Self {
        self.hidden_traits.insert(hidden);
        self
    }

    #[must_use]
    pub fn has_trait(&self, hidden: HiddenTrait) -> bool {
        self.hidden_traits.contains(&hidden)
    }

    /// True value for `skill`, the mean of all skills when absent, or 50.
    #[must_use]
    pub fn true_skill(&self, skill: Skill) -> f64 {
        if let Some(rating) = self.skills.get(&skill) {
            return clamp_rating(rating.true_value);
        }
        let values: Vec<f64> = self.skills.values().map(|r| r.true_value).collect();
        mean(&values).map_or(NEUTRAL_RATING, clamp_rating)
    }

    /// Experience expressed on the rating scale (rookie 40, ten-year veteran 100).
    #[must_use]
    pub fn experience_rating(&self) -> f64 {
        clamp_rating(f64::from(self.experience_years).mul_add(6.0, 40.0))
    }

    /// Whether the player can take the field at all.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.injury.as_ref().is_some_and(InjuryStatus::keeps_player_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Player {
        Player::new(PlayerId(9), "Sample", Position::Rb, PlayerRole::FeatureBack)
    }

    #[test]
    fn missing_skill_falls_back_to_mean_then_neutral() {
        let bare = sample();
        assert!((bare.true_skill(Skill::Speed) - 50.0).abs() < f64::EPSILON);

        let rated = sample()
            .with_skill(Skill::Speed, 90.0)
            .with_skill(Skill::Carrying, 70.0);
        assert!((rated.true_skill(Skill::Speed) - 90.0).abs() < f64::EPSILON);
        assert!((rated.true_skill(Skill::Catching) - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn severe_injury_keeps_player_out() {
        let mut player = sample();
        assert!(player.is_available());
        player.injury = Some(InjuryStatus {
            injury_type: InjuryType::Ankle,
            severity: InjurySeverity::Minor,
            weeks_remaining: 1,
        });
        assert!(player.is_available());
        player.injury = Some(InjuryStatus {
            injury_type: InjuryType::Acl,
            severity: InjurySeverity::SeasonEnding,
            weeks_remaining: 20,
        });
        assert!(!player.is_available());
    }

    #[test]
    fn positions_map_to_sides() {
        assert!(Position::Lt.is_offense());
        assert!(Position::Nt.is_defense());
        assert!(!Position::K.is_offense() && !Position::K.is_defense());
        assert_eq!(Position::Olb.group(), PositionGroup::Linebacker);
        assert_eq!(Position::Olb.abbreviation(), "OLB");
    }
}
