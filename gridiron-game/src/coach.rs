//! Position coaches: the only staff the resolution core reads.
use serde::{Deserialize, Serialize};

use crate::matchup::scheme::{DefensiveScheme, OffensiveScheme};
use crate::player::PositionGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachPersonality {
    PlayersCoach,
    Disciplinarian,
    Innovator,
    Motivator,
}

/// A position coach attached to one position group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    pub name: String,
    pub group: PositionGroup,
    pub personality: CoachPersonality,
    #[serde(default)]
    pub preferred_offense: Option<OffensiveScheme>,
    #[serde(default)]
    pub preferred_defense: Option<DefensiveScheme>,
    #[serde(default)]
    pub tenure_years: u8,
    /// Teaching quality on the rating scale, 50 is average.
    pub quality: f64,
}

impl Coach {
    #[must_use]
    pub fn new(name: impl Into<String>, group: PositionGroup, personality: CoachPersonality) -> Self {
        Self {
            name: name.into(),
            group,
            personality,
            preferred_offense: None,
            preferred_defense: None,
            tenure_years: 0,
            quality: 50.0,
        }
    }
}
