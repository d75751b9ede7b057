//! Play calls and the discrete outcomes a snap can produce.
use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Offensive play family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    RunInside,
    RunOutside,
    Draw,
    QbSneak,
    Screen,
    ShortPass,
    MediumPass,
    DeepPass,
    PlayActionShort,
    PlayActionDeep,
}

impl PlayType {
    pub const ALL: [Self; 10] = [
        Self::RunInside,
        Self::RunOutside,
        Self::Draw,
        Self::QbSneak,
        Self::Screen,
        Self::ShortPass,
        Self::MediumPass,
        Self::DeepPass,
        Self::PlayActionShort,
        Self::PlayActionDeep,
    ];

    #[must_use]
    pub const fn category(self) -> PlayCategory {
        match self {
            Self::RunInside | Self::RunOutside | Self::Draw | Self::QbSneak => PlayCategory::Run,
            Self::Screen
            | Self::ShortPass
            | Self::MediumPass
            | Self::DeepPass
            | Self::PlayActionShort
            | Self::PlayActionDeep => PlayCategory::Pass,
        }
    }

    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self.category(), PlayCategory::Pass)
    }

    #[must_use]
    pub const fn is_run(self) -> bool {
        matches!(self.category(), PlayCategory::Run)
    }

    #[must_use]
    pub const fn is_play_action(self) -> bool {
        matches!(self, Self::PlayActionShort | Self::PlayActionDeep)
    }

    /// Whether the quarterback drops back long enough to face a rush phase.
    #[must_use]
    pub const fn has_dropback(self) -> bool {
        self.is_pass()
    }

    /// Nominal depth of the throw, used for pass interference spots.
    #[must_use]
    pub const fn air_yards(self) -> u8 {
        match self {
            Self::RunInside | Self::RunOutside | Self::Draw | Self::QbSneak | Self::Screen => 0,
            Self::ShortPass | Self::PlayActionShort => 7,
            Self::MediumPass => 14,
            Self::DeepPass | Self::PlayActionDeep => 30,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RunInside => "run_inside",
            Self::RunOutside => "run_outside",
            Self::Draw => "draw",
            Self::QbSneak => "qb_sneak",
            Self::Screen => "screen",
            Self::ShortPass => "short_pass",
            Self::MediumPass => "medium_pass",
            Self::DeepPass => "deep_pass",
            Self::PlayActionShort => "play_action_short",
            Self::PlayActionDeep => "play_action_deep",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayCategory {
    Run,
    Pass,
}

/// Point of attack for run plays; selects the run-blocking weight table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunDirection {
    Left,
    #[default]
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formation {
    UnderCenter,
    Shotgun,
    Pistol,
    IFormation,
    Singleback,
    Empty,
    Jumbo,
}

/// Offensive personnel grouping: first digit running backs, second tight ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OffensivePersonnel {
    #[serde(rename = "10")]
    P10,
    #[serde(rename = "11")]
    P11,
    #[serde(rename = "12")]
    P12,
    #[serde(rename = "13")]
    P13,
    #[serde(rename = "21")]
    P21,
    #[serde(rename = "22")]
    P22,
    #[serde(rename = "empty")]
    Empty,
}

impl OffensivePersonnel {
    pub const ALL: [Self; 7] = [
        Self::P10,
        Self::P11,
        Self::P12,
        Self::P13,
        Self::P21,
        Self::P22,
        Self::Empty,
    ];

    /// `(running backs, tight ends, wide receivers)` on the field.
    #[must_use]
    pub const fn skill_counts(self) -> (usize, usize, usize) {
        match self {
            Self::P10 => (1, 0, 4),
            Self::P11 => (1, 1, 3),
            Self::P12 => (1, 2, 2),
            Self::P13 => (1, 3, 1),
            Self::P21 => (2, 1, 2),
            Self::P22 => (2, 2, 1),
            Self::Empty => (0, 1, 4),
        }
    }

    /// Two or more tight ends or a fullback.
    #[must_use]
    pub const fn is_heavy(self) -> bool {
        matches!(self, Self::P12 | Self::P13 | Self::P21 | Self::P22)
    }

    /// Four or more wide receivers.
    #[must_use]
    pub const fn is_light(self) -> bool {
        matches!(self, Self::P10 | Self::Empty)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::P10 => 0,
            Self::P11 => 1,
            Self::P12 => 2,
            Self::P13 => 3,
            Self::P21 => 4,
            Self::P22 => 5,
            Self::Empty => 6,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::P10 => "10",
            Self::P11 => "11",
            Self::P12 => "12",
            Self::P13 => "13",
            Self::P21 => "21",
            Self::P22 => "22",
            Self::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefensivePersonnel {
    Base43,
    Base34,
    Nickel,
    Dime,
    Quarter,
    GoalLine,
}

impl DefensivePersonnel {
    pub const ALL: [Self; 6] = [
        Self::Base43,
        Self::Base34,
        Self::Nickel,
        Self::Dime,
        Self::Quarter,
        Self::GoalLine,
    ];

    /// `(linemen, linebackers, defensive backs)` on the field.
    #[must_use]
    pub const fn counts(self) -> (usize, usize, usize) {
        match self {
            Self::Base43 => (4, 3, 4),
            Self::Base34 => (3, 4, 4),
            Self::Nickel => (4, 2, 5),
            Self::Dime => (4, 1, 6),
            Self::Quarter => (3, 1, 7),
            Self::GoalLine => (6, 3, 2),
        }
    }

    /// Defenders near the line before any blitz or red-zone adjustment.
    #[must_use]
    pub const fn base_box(self) -> u8 {
        match self {
            Self::Base43 | Self::Base34 => 7,
            Self::Nickel => 6,
            Self::Dime | Self::Quarter => 5,
            Self::GoalLine => 9,
        }
    }

    #[must_use]
    pub const fn is_pass_package(self) -> bool {
        matches!(self, Self::Dime | Self::Quarter)
    }

    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::Base43 | Self::Base34 | Self::GoalLine)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Base43 => 0,
            Self::Base34 => 1,
            Self::Nickel => 2,
            Self::Dime => 3,
            Self::Quarter => 4,
            Self::GoalLine => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    Cover0,
    Cover1,
    Cover2,
    Cover3,
    Cover4,
    Man,
}

impl Coverage {
    #[must_use]
    pub const fn is_man(self) -> bool {
        matches!(self, Self::Cover0 | Self::Cover1 | Self::Man)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blitz {
    #[default]
    None,
    Linebacker,
    DefensiveBack,
    AllOut,
}

impl Blitz {
    #[must_use]
    pub const fn is_blitz(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Extra rushers added to the box count.
    #[must_use]
    pub const fn extra_box_defenders(self) -> u8 {
        match self {
            Self::None | Self::DefensiveBack => 0,
            Self::Linebacker => 1,
            Self::AllOut => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffensivePlayCall {
    pub play_type: PlayType,
    pub formation: Formation,
    pub personnel: OffensivePersonnel,
    #[serde(default)]
    pub direction: RunDirection,
    /// Designed primary target, when the call names one.
    #[serde(default)]
    pub primary_target: Option<PlayerId>,
}

impl OffensivePlayCall {
    #[must_use]
    pub const fn new(play_type: PlayType, personnel: OffensivePersonnel) -> Self {
        let formation = match personnel {
            OffensivePersonnel::P10 | OffensivePersonnel::P11 => Formation::Shotgun,
            OffensivePersonnel::Empty => Formation::Empty,
            OffensivePersonnel::P12 => Formation::Singleback,
            OffensivePersonnel::P21 | OffensivePersonnel::P22 => Formation::IFormation,
            OffensivePersonnel::P13 => Formation::Jumbo,
        };
        Self {
            play_type,
            formation,
            personnel,
            direction: RunDirection::Middle,
            primary_target: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefensivePlayCall {
    pub personnel: DefensivePersonnel,
    pub coverage: Coverage,
    #[serde(default)]
    pub blitz: Blitz,
}

impl DefensivePlayCall {
    #[must_use]
    pub const fn new(personnel: DefensivePersonnel, coverage: Coverage, blitz: Blitz) -> Self {
        Self {
            personnel,
            coverage,
            blitz,
        }
    }
}

/// Discrete result of one snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayOutcome {
    Loss,
    NoGain,
    ShortGain,
    GoodGain,
    BigGain,
    Incomplete,
    Sack,
    Interception,
    Fumble,
    FumbleRecovered,
    Scramble,
}

/// Which side of the advantage modifier an outcome sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeBucket {
    Positive,
    Negative,
    Neutral,
}

impl PlayOutcome {
    pub const ALL: [Self; 11] = [
        Self::Loss,
        Self::NoGain,
        Self::ShortGain,
        Self::GoodGain,
        Self::BigGain,
        Self::Incomplete,
        Self::Sack,
        Self::Interception,
        Self::Fumble,
        Self::FumbleRecovered,
        Self::Scramble,
    ];

    #[must_use]
    pub const fn bucket(self) -> OutcomeBucket {
        match self {
            Self::GoodGain | Self::BigGain => OutcomeBucket::Positive,
            Self::Loss
            | Self::NoGain
            | Self::Incomplete
            | Self::Sack
            | Self::Interception
            | Self::Fumble => OutcomeBucket::Negative,
            Self::ShortGain | Self::FumbleRecovered | Self::Scramble => OutcomeBucket::Neutral,
        }
    }

    /// Possession changes hands.
    #[must_use]
    pub const fn is_turnover(self) -> bool {
        matches!(self, Self::Interception | Self::Fumble)
    }

    /// Ball carrier may advance into the end zone on this outcome.
    #[must_use]
    pub const fn can_score(self) -> bool {
        matches!(
            self,
            Self::ShortGain | Self::GoodGain | Self::BigGain | Self::FumbleRecovered | Self::Scramble
        )
    }

    /// Completed pass or handoff: someone carried the ball.
    #[must_use]
    pub const fn has_ball_carrier(self) -> bool {
        !matches!(self, Self::Incomplete | Self::Interception)
    }

    /// The clock stops after the snap.
    #[must_use]
    pub const fn stops_clock(self) -> bool {
        matches!(self, Self::Incomplete | Self::Interception | Self::Fumble)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Loss => "loss",
            Self::NoGain => "no_gain",
            Self::ShortGain => "short_gain",
            Self::GoodGain => "good_gain",
            Self::BigGain => "big_gain",
            Self::Incomplete => "incomplete",
            Self::Sack => "sack",
            Self::Interception => "interception",
            Self::Fumble => "fumble",
            Self::FumbleRecovered => "fumble_recovered",
            Self::Scramble => "scramble",
        }
    }
}
