//! Immutable per-game and per-play context consumed by ratings, tables and injuries.
use serde::{Deserialize, Serialize};

/// Sky conditions at kickoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precipitation {
    #[default]
    Clear,
    Rain,
    Snow,
}

/// Weather for one game. Indoor games ignore every other field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub temperature_f: f64,
    pub wind_mph: f64,
    #[serde(default)]
    pub precipitation: Precipitation,
    #[serde(default)]
    pub is_dome: bool,
}

impl WeatherCondition {
    #[must_use]
    pub const fn dome() -> Self {
        Self {
            temperature_f: 72.0,
            wind_mph: 0.0,
            precipitation: Precipitation::Clear,
            is_dome: true,
        }
    }

    #[must_use]
    pub const fn fair() -> Self {
        Self {
            temperature_f: 65.0,
            wind_mph: 5.0,
            precipitation: Precipitation::Clear,
            is_dome: false,
        }
    }

    /// Weather that actually reaches the field (domes neutralize everything).
    #[must_use]
    pub fn is_exposed(&self) -> bool {
        !self.is_dome
    }
}

impl Default for WeatherCondition {
    fn default() -> Self {
        Self::fair()
    }
}

/// How much the game matters; scales clutch behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStakes {
    Preseason,
    #[default]
    Regular,
    Rivalry,
    PlayoffRace,
    Playoff,
    ConferenceChampionship,
    Championship,
}

impl GameStakes {
    /// Multiplier applied to the clutch-trait rating modifier.
    #[must_use]
    pub const fn clutch_multiplier(self) -> f64 {
        match self {
            Self::Preseason => 0.0,
            Self::Regular => 0.5,
            Self::Rivalry => 0.75,
            Self::PlayoffRace => 0.85,
            Self::Playoff => 1.0,
            Self::ConferenceChampionship => 1.1,
            Self::Championship => 1.25,
        }
    }
}

/// Game-flow snapshot handed to play calling and resolution.
///
/// `field_position` is measured from the offense's own goal line: 0 is the
/// own goal, 100 the opponent's. `score_differential` is offense minus defense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayCallContext {
    pub down: u8,
    pub distance: u8,
    pub field_position: u8,
    pub quarter: u8,
    pub seconds_remaining: u16,
    pub score_differential: i16,
    #[serde(default)]
    pub weather: WeatherCondition,
    #[serde(default)]
    pub stakes: GameStakes,
}

impl PlayCallContext {
    /// First and ten at midfield, opening quarter, tied game.
    #[must_use]
    pub fn first_and_ten_at(field_position: u8) -> Self {
        Self {
            down: 1,
            distance: 10,
            field_position: field_position.min(99),
            quarter: 1,
            seconds_remaining: 900,
            score_differential: 0,
            weather: WeatherCondition::fair(),
            stakes: GameStakes::Regular,
        }
    }

    #[must_use]
    pub fn yards_to_endzone(&self) -> i32 {
        100 - i32::from(self.field_position.min(100))
    }

    #[must_use]
    pub fn is_red_zone(&self) -> bool {
        self.yards_to_endzone() <= 20
    }

    #[must_use]
    pub fn is_goal_line(&self) -> bool {
        self.yards_to_endzone() <= 5
    }

    #[must_use]
    pub const fn is_third_and_long(&self) -> bool {
        self.down == 3 && self.distance >= 7
    }

    #[must_use]
    pub const fn is_fourth_down(&self) -> bool {
        self.down == 4
    }

    #[must_use]
    pub const fn is_short_yardage(&self) -> bool {
        self.down >= 3 && self.distance <= 2
    }

    /// Offense pinned inside its own ten.
    #[must_use]
    pub const fn is_backed_up(&self) -> bool {
        self.field_position <= 10
    }

    #[must_use]
    pub const fn is_two_minute_drill(&self) -> bool {
        (self.quarter == 2 || self.quarter >= 4) && self.seconds_remaining <= 120
    }

    /// One-score game in the final five minutes.
    #[must_use]
    pub const fn is_close_and_late(&self) -> bool {
        self.quarter >= 4 && self.seconds_remaining <= 300 && self.score_differential.abs() <= 8
    }

    /// Three-score margin after halftime.
    #[must_use]
    pub const fn is_blowout(&self) -> bool {
        self.quarter >= 3 && self.score_differential.abs() >= 21
    }
}

impl Default for PlayCallContext {
    fn default() -> Self {
        Self::first_and_ten_at(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stakes_multiplier_spans_preseason_to_title() {
        assert!(GameStakes::Preseason.clutch_multiplier().abs() < f64::EPSILON);
        assert!((GameStakes::Championship.clutch_multiplier() - 1.25).abs() < f64::EPSILON);
        assert!(GameStakes::Playoff.clutch_multiplier() > GameStakes::Regular.clutch_multiplier());
    }

    #[test]
    fn field_zones_follow_yards_to_goal() {
        let mut ctx = PlayCallContext::first_and_ten_at(82);
        assert!(ctx.is_red_zone());
        assert!(!ctx.is_goal_line());
        ctx.field_position = 97;
        assert!(ctx.is_goal_line());
        assert_eq!(ctx.yards_to_endzone(), 3);
        ctx.field_position = 6;
        assert!(ctx.is_backed_up());
    }

    #[test]
    fn late_game_flags() {
        let ctx = PlayCallContext {
            quarter: 4,
            seconds_remaining: 90,
            score_differential: -4,
            ..PlayCallContext::default()
        };
        assert!(ctx.is_two_minute_drill());
        assert!(ctx.is_close_and_late());
        assert!(!ctx.is_blowout());
    }
}
