//! Game-situation multipliers applied to per-player ratings.
use serde::{Deserialize, Serialize};

use crate::context::PlayCallContext;
use crate::play::PlayType;
use crate::player::{HiddenTrait, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    TwoMinuteDrill,
    ThirdDown,
    RedZone,
    GoalLine,
    CloseLate,
    Blowout,
}

/// Side-wide rating multipliers for the current situation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SituationalModifier {
    pub situations: Vec<Situation>,
    pub offense: f64,
    pub defense: f64,
}

impl SituationalModifier {
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            situations: Vec::new(),
            offense: 1.0,
            defense: 1.0,
        }
    }

    #[must_use]
    pub fn has(&self, situation: Situation) -> bool {
        self.situations.contains(&situation)
    }

    /// Individual multiplier layered on the side multiplier: clutch performers rise late.
    #[must_use]
    pub fn player_multiplier(&self, player: &Player) -> f64 {
        let mut multiplier = 1.0;
        if self.has(Situation::CloseLate) {
            if player.has_trait(HiddenTrait::Clutch) {
                multiplier *= 1.05;
            }
            if player.has_trait(HiddenTrait::Choker) {
                multiplier *= 0.94;
            }
        }
        if self.has(Situation::ThirdDown) && player.has_trait(HiddenTrait::FilmJunkie) {
            multiplier *= 1.02;
        }
        multiplier
    }
}

/// Identify every active situation and fold its multipliers together.
#[must_use]
pub fn evaluate_situation(ctx: &PlayCallContext, play_type: PlayType) -> SituationalModifier {
    let mut modifier = SituationalModifier::neutral();
    let pass = play_type.is_pass();

    if ctx.is_two_minute_drill() {
        modifier.situations.push(Situation::TwoMinuteDrill);
        modifier.offense *= if pass { 1.03 } else { 0.97 };
        modifier.defense *= 0.98;
    }
    if ctx.down == 3 {
        modifier.situations.push(Situation::ThirdDown);
        if pass {
            modifier.defense *= 1.02;
        }
    }
    if ctx.is_goal_line() {
        modifier.situations.push(Situation::GoalLine);
        if pass {
            modifier.defense *= 1.03;
        } else {
            modifier.offense *= 1.04;
            modifier.defense *= 1.04;
        }
    } else if ctx.is_red_zone() {
        modifier.situations.push(Situation::RedZone);
        modifier.offense *= 0.98;
        modifier.defense *= 1.03;
    }
    if ctx.is_close_and_late() {
        modifier.situations.push(Situation::CloseLate);
    }
    if ctx.is_blowout() {
        modifier.situations.push(Situation::Blowout);
        if ctx.score_differential < 0 {
            // Trailing offense against a defense sitting back.
            modifier.defense *= 0.95;
        } else {
            modifier.offense *= 0.97;
        }
    }
    modifier
}
