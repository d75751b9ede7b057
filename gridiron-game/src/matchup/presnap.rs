//! Quarterback pre-snap reads: blitz recognition, protection calls, audibles.
//!
//! This is the one stage allowed to change the play that gets run.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::context::PlayCallContext;
use crate::play::{DefensivePlayCall, OffensivePlayCall, PlayType};
use crate::player::{Player, Skill};

const AUDIBLE_IQ: f64 = 75.0;
const SWAP_AUDIBLE_IQ: f64 = 80.0;
const HOT_ROUTE_IQ: f64 = 85.0;
const PROTECTION_CALL_IQ: f64 = 70.0;
const RUN_TO_PASS_CHANCE: f64 = 0.6;
const PASS_TO_RUN_CHANCE: f64 = 0.5;
const STACKED_BOX: u8 = 8;
const LIGHT_BOX: u8 = 5;

/// Mental attributes feeding the read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QbMentals {
    pub decision_making: f64,
    pub awareness: f64,
    pub experience: f64,
}

impl QbMentals {
    #[must_use]
    pub fn from_player(player: &Player) -> Self {
        Self {
            decision_making: player.true_skill(Skill::DecisionMaking),
            awareness: player.true_skill(Skill::Awareness),
            experience: player.experience_rating(),
        }
    }

    /// Decision-making 40%, awareness 30%, experience 30%.
    #[must_use]
    pub fn football_iq(&self) -> f64 {
        0.3f64.mul_add(
            self.experience,
            0.4f64.mul_add(self.decision_making, 0.3 * self.awareness),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audible {
    RunToPass,
    PassToRun,
    HotRoute,
}

/// What the quarterback saw and changed before the snap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresnapRead {
    pub football_iq: f64,
    pub box_count: u8,
    pub blitz_identified: bool,
    pub protection_adjusted: bool,
    pub audible: Option<Audible>,
    pub modifier: f64,
    pub original_play: PlayType,
    pub final_play: PlayType,
}

impl PresnapRead {
    /// Read that saw nothing and changed nothing.
    #[must_use]
    pub const fn passive(play: PlayType) -> Self {
        Self {
            football_iq: 0.0,
            box_count: 0,
            blitz_identified: false,
            protection_adjusted: false,
            audible: None,
            modifier: 0.0,
            original_play: play,
            final_play: play,
        }
    }

    #[must_use]
    pub fn changed_play(&self) -> bool {
        self.original_play != self.final_play
    }
}

/// Defenders the quarterback counts in the box.
#[must_use]
pub fn estimate_box(defense: &DefensivePlayCall, ctx: &PlayCallContext) -> u8 {
    let red_zone = u8::from(ctx.is_red_zone());
    defense.personnel.base_box() + defense.blitz.extra_box_defenders() + red_zone
}

/// Chance to diagnose a disguised blitz.
#[must_use]
pub fn blitz_identification_chance(football_iq: f64) -> f64 {
    ((football_iq - 40.0) / 60.0).clamp(0.05, 0.95)
}

pub fn read_defense<R>(
    qb: &QbMentals,
    offense: &OffensivePlayCall,
    defense: &DefensivePlayCall,
    ctx: &PlayCallContext,
    rng: &mut R,
) -> PresnapRead
where
    R: Rng + ?Sized,
{
    let iq = qb.football_iq();
    let box_count = estimate_box(defense, ctx);
    let original = offense.play_type;
    let blitzing = defense.blitz.is_blitz();

    let blitz_identified = blitzing && rng.r#gen::<f64>() < blitz_identification_chance(iq);
    let protection_adjusted = blitz_identified && iq >= PROTECTION_CALL_IQ;

    let mut audible = None;
    let mut final_play = original;
    if iq >= AUDIBLE_IQ {
        if original.is_run() && box_count >= STACKED_BOX && iq >= SWAP_AUDIBLE_IQ {
            if rng.r#gen::<f64>() < RUN_TO_PASS_CHANCE {
                audible = Some(Audible::RunToPass);
                final_play = PlayType::ShortPass;
            }
        } else if original.is_pass() && box_count <= LIGHT_BOX && iq >= SWAP_AUDIBLE_IQ {
            if rng.r#gen::<f64>() < PASS_TO_RUN_CHANCE {
                audible = Some(Audible::PassToRun);
                final_play = PlayType::RunInside;
            }
        }
        if audible.is_none() && original.is_pass() && blitz_identified && iq >= HOT_ROUTE_IQ {
            audible = Some(Audible::HotRoute);
            if matches!(
                original,
                PlayType::MediumPass | PlayType::DeepPass | PlayType::PlayActionShort | PlayType::PlayActionDeep
            ) {
                final_play = PlayType::ShortPass;
            }
        }
    }

    let mut modifier = 0.0;
    if blitz_identified {
        modifier += 2.0;
    }
    if audible.is_some() {
        modifier += 3.0;
    }
    if protection_adjusted {
        modifier += 1.0;
    }
    if blitzing && !blitz_identified {
        modifier -= 2.0;
    }

    if let Some(call) = audible {
        log::debug!(
            "presnap audible {call:?}: {} -> {} (iq {iq:.1}, box {box_count})",
            original.label(),
            final_play.label()
        );
    }
    PresnapRead {
        football_iq: iq,
        box_count,
        blitz_identified,
        protection_adjusted,
        audible,
        modifier,
        original_play: original,
        final_play,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play::{Blitz, Coverage, DefensivePersonnel, OffensivePersonnel};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const GENIUS: QbMentals = QbMentals {
        decision_making: 95.0,
        awareness: 95.0,
        experience: 95.0,
    };
    const ROOKIE: QbMentals = QbMentals {
        decision_making: 45.0,
        awareness: 45.0,
        experience: 40.0,
    };

    #[test]
    fn iq_blends_components() {
        let qb = QbMentals {
            decision_making: 80.0,
            awareness: 60.0,
            experience: 40.0,
        };
        assert!((qb.football_iq() - 62.0).abs() < 1e-9);
        assert!((blitz_identification_chance(10.0) - 0.05).abs() < f64::EPSILON);
        assert!((blitz_identification_chance(100.0) - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn box_count_includes_blitz_and_red_zone() {
        let defense = DefensivePlayCall::new(DefensivePersonnel::Base43, Coverage::Cover1, Blitz::AllOut);
        let ctx = PlayCallContext::first_and_ten_at(85);
        assert_eq!(estimate_box(&defense, &ctx), 10);
    }

    #[test]
    fn rookie_never_audibles() {
        let offense = OffensivePlayCall::new(PlayType::RunInside, OffensivePersonnel::P11);
        let defense = DefensivePlayCall::new(DefensivePersonnel::GoalLine, Coverage::Cover0, Blitz::None);
        let ctx = PlayCallContext::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..100 {
            let read = read_defense(&ROOKIE, &offense, &defense, &ctx, &mut rng);
            assert!(read.audible.is_none());
            assert!(!read.changed_play());
        }
    }

    #[test]
    fn veteran_checks_out_of_run_into_stacked_box() {
        let offense = OffensivePlayCall::new(PlayType::RunInside, OffensivePersonnel::P11);
        let defense = DefensivePlayCall::new(DefensivePersonnel::GoalLine, Coverage::Cover0, Blitz::None);
        let ctx = PlayCallContext::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let checked = (0..1000)
            .filter(|_| read_defense(&GENIUS, &offense, &defense, &ctx, &mut rng).final_play == PlayType::ShortPass)
            .count();
        assert!((520..=680).contains(&checked), "checked {checked}");
    }

    #[test]
    fn missed_blitz_costs_the_offense() {
        let offense = OffensivePlayCall::new(PlayType::ShortPass, OffensivePersonnel::P11);
        let defense = DefensivePlayCall::new(DefensivePersonnel::Nickel, Coverage::Cover1, Blitz::Linebacker);
        let ctx = PlayCallContext::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let reads: Vec<PresnapRead> = (0..200)
            .map(|_| read_defense(&ROOKIE, &offense, &defense, &ctx, &mut rng))
            .collect();
        assert!(reads.iter().any(|read| read.modifier < 0.0));
        assert!(reads.iter().all(|read| read.final_play == PlayType::ShortPass));
    }
}
