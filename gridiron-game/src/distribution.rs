//! Stat distribution: who catches the ball, who carries it, who makes the stop.
//!
//! Everything here is a weighted categorical draw over the players on the
//! field. The weight tables decide who is *likely*; the draw decides who
//! actually shows up in the box score.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    RB_CARRY_HARD_LIMIT, RB_CARRY_HARD_MULTIPLIER, RB_CARRY_SOFT_LIMIT, RB_CARRY_SOFT_MULTIPLIER,
    RB_DEPTH_WEIGHTS, RB_FATIGUE_HARD_LIMIT, RB_FATIGUE_HARD_MULTIPLIER, RB_FATIGUE_SOFT_LIMIT,
    RB_FATIGUE_SOFT_MULTIPLIER,
};
use crate::lineup::Lineup;
use crate::numbers::NEUTRAL_RATING;
use crate::play::PlayType;
use crate::player::{Player, PlayerId, Position, PositionGroup, Skill};
use crate::team::TeamGameState;
use crate::trace::{DecisionTrace, RollValue, WeightFactor, WeightedCandidate};

const DEPTH_PREFERENCE: [f64; 3] = [1.0, 0.8, 0.6];
const PRIMARY_TARGET_MULTIPLIER: f64 = 3.0;

/// Weighted random selection over `f64` weights.
///
/// Negative and non-finite weights count as zero. When every weight is zero
/// the pick is uniform. Returns the chosen index and the roll.
pub fn weighted_index<R>(weights: &[f64], rng: &mut R) -> Option<(usize, f64)>
where
    R: Rng + ?Sized,
{
    if weights.is_empty() {
        return None;
    }
    let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let total: f64 = weights.iter().copied().map(clean).sum();
    if total <= 0.0 {
        let index = rng.gen_range(0..weights.len());
        return Some((index, 0.0));
    }
    let roll = rng.r#gen::<f64>() * total;
    let mut cursor = 0.0;
    for (index, weight) in weights.iter().copied().map(clean).enumerate() {
        cursor += weight;
        if roll < cursor {
            return Some((index, roll));
        }
    }
    let last = weights.iter().copied().map(clean).rposition(|w| w > 0.0).unwrap_or(weights.len() - 1);
    Some((last, roll))
}

/// Weighted choice over items, returning the item.
pub fn weighted_choice<T, R>(options: &[(T, f64)], rng: &mut R) -> Option<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let weights: Vec<f64> = options.iter().map(|(_, weight)| *weight).collect();
    weighted_index(&weights, rng).map(|(index, _)| options[index].0.clone())
}

/// Weighted choice over players with full telemetry.
pub fn choose_player<R>(
    pool_id: &str,
    candidates: Vec<(PlayerId, WeightedCandidate)>,
    rng: &mut R,
) -> Option<(PlayerId, DecisionTrace)>
where
    R: Rng + ?Sized,
{
    let weights: Vec<f64> = candidates.iter().map(|(_, c)| c.final_weight).collect();
    let (index, roll) = weighted_index(&weights, rng)?;
    let chosen = candidates[index].0;
    let trace = DecisionTrace {
        pool_id: pool_id.to_string(),
        roll: RollValue::F64(roll),
        candidates: candidates.into_iter().map(|(_, c)| c).collect(),
        chosen_id: chosen.to_string(),
    };
    Some((chosen, trace))
}

fn candidate(id: PlayerId, base: f64, factors: Vec<WeightFactor>) -> (PlayerId, WeightedCandidate) {
    let final_weight = factors.iter().fold(base, |acc, f| acc * f.value).max(0.0);
    (
        id,
        WeightedCandidate {
            id: id.to_string(),
            base_weight: base,
            multipliers: factors,
            final_weight,
        },
    )
}

fn skill_factor(player: Option<&Player>, skills: &[Skill]) -> f64 {
    let Some(player) = player else {
        return 1.0;
    };
    let total: f64 = skills.iter().map(|skill| player.true_skill(*skill)).sum();
    let count = f64::from(u8::try_from(skills.len()).unwrap_or(u8::MAX)).max(1.0);
    (total / count / NEUTRAL_RATING).clamp(0.2, 2.0)
}

// Targets ----------------------------------------------------------------

#[must_use]
pub const fn target_base_weight(position: Position) -> f64 {
    match position {
        Position::Wr => 1.0,
        Position::Te => 0.7,
        Position::Rb => 0.45,
        Position::Fb => 0.15,
        _ => 0.0,
    }
}

/// Route-family preference per position.
#[must_use]
pub const fn target_play_factor(position: Position, play_type: PlayType) -> f64 {
    match (play_type, position) {
        (PlayType::Screen, Position::Rb | Position::Fb) => 2.5,
        (PlayType::Screen, Position::Te) => 0.6,
        (PlayType::DeepPass | PlayType::PlayActionDeep, Position::Wr) => 1.3,
        (PlayType::DeepPass | PlayType::PlayActionDeep, Position::Te) => 0.6,
        (PlayType::DeepPass | PlayType::PlayActionDeep, Position::Rb | Position::Fb) => 0.2,
        (PlayType::ShortPass | PlayType::PlayActionShort, Position::Rb) => 1.2,
        (PlayType::ShortPass | PlayType::PlayActionShort, Position::Te) => 1.15,
        _ => 1.0,
    }
}

/// Target weights for every eligible receiver in the lineup.
#[must_use]
pub fn target_weights(
    team: &TeamGameState,
    lineup: &Lineup,
    play_type: PlayType,
    primary_target: Option<PlayerId>,
) -> Vec<(PlayerId, WeightedCandidate)> {
    let mut seen: Vec<Position> = Vec::new();
    let mut weights = Vec::new();
    for slot in lineup.slots() {
        let base = target_base_weight(slot.position);
        if base <= 0.0 {
            continue;
        }
        let depth = seen.iter().filter(|p| **p == slot.position).count();
        seen.push(slot.position);
        let mut factors = vec![
            WeightFactor::new("play", target_play_factor(slot.position, play_type)),
            WeightFactor::new(
                "hands",
                skill_factor(team.player(slot.player), &[Skill::Catching, Skill::RouteRunning]),
            ),
            WeightFactor::new("depth", DEPTH_PREFERENCE.get(depth).copied().unwrap_or(0.5)),
        ];
        if primary_target == Some(slot.player) {
            factors.push(WeightFactor::new("primary", PRIMARY_TARGET_MULTIPLIER));
        }
        weights.push(candidate(slot.player, base, factors));
    }
    weights
}

/// Pick who the ball goes to on a pass.
pub fn select_target<R>(
    team: &TeamGameState,
    lineup: &Lineup,
    play_type: PlayType,
    primary_target: Option<PlayerId>,
    rng: &mut R,
) -> Option<(PlayerId, DecisionTrace)>
where
    R: Rng + ?Sized,
{
    let weights = target_weights(team, lineup, play_type, primary_target);
    choose_player(&format!("target.{}", play_type.label()), weights, rng)
}

// Running backs ----------------------------------------------------------

/// Carry-count multiplier: 0.8 from 15 carries, stacking 0.75 from 20.
#[must_use]
pub fn carry_multiplier(carries: u32) -> f64 {
    let mut multiplier = 1.0;
    if carries >= RB_CARRY_SOFT_LIMIT {
        multiplier *= RB_CARRY_SOFT_MULTIPLIER;
    }
    if carries >= RB_CARRY_HARD_LIMIT {
        multiplier *= RB_CARRY_HARD_MULTIPLIER;
    }
    multiplier
}

#[must_use]
pub fn fatigue_multiplier(fatigue: f64) -> f64 {
    if fatigue >= RB_FATIGUE_HARD_LIMIT {
        RB_FATIGUE_HARD_MULTIPLIER
    } else if fatigue >= RB_FATIGUE_SOFT_LIMIT {
        RB_FATIGUE_SOFT_MULTIPLIER
    } else {
        1.0
    }
}

/// Rotation weights for the healthy backs on the depth chart, in depth order.
#[must_use]
pub fn running_back_weights(team: &TeamGameState) -> Vec<(PlayerId, WeightedCandidate)> {
    team.depth_at(Position::Rb)
        .iter()
        .copied()
        .filter(|id| team.player(*id).is_some_and(Player::is_available))
        .take(RB_DEPTH_WEIGHTS.len())
        .enumerate()
        .map(|(depth, id)| {
            let factors = vec![
                WeightFactor::new("carries", carry_multiplier(team.usage().carries(id))),
                WeightFactor::new("fatigue", fatigue_multiplier(team.fatigue(id))),
            ];
            candidate(id, RB_DEPTH_WEIGHTS[depth], factors)
        })
        .collect()
}

/// Pick the ball carrier for a designed run.
pub fn select_running_back<R>(team: &TeamGameState, rng: &mut R) -> Option<(PlayerId, DecisionTrace)>
where
    R: Rng + ?Sized,
{
    choose_player("rotation.rb", running_back_weights(team), rng)
}

// Defensive credit -------------------------------------------------------

/// What the defender is being credited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "yards", rename_all = "snake_case")]
pub enum DefensiveCredit {
    Tackle(i32),
    Sack,
    Interception,
    ForcedFumble,
}

impl DefensiveCredit {
    /// `(defensive line, linebackers, secondary)` shares.
    #[must_use]
    pub const fn group_shares(self) -> (f64, f64, f64) {
        match self {
            Self::Tackle(yards) if yards <= 0 => (0.45, 0.45, 0.10),
            Self::Tackle(yards) if yards <= 4 => (0.25, 0.55, 0.20),
            Self::Tackle(yards) if yards <= 14 => (0.05, 0.45, 0.50),
            Self::Tackle(_) => (0.0, 0.15, 0.85),
            Self::Sack => (0.70, 0.25, 0.05),
            Self::Interception => (0.02, 0.18, 0.80),
            Self::ForcedFumble => (0.30, 0.40, 0.30),
        }
    }

    const fn skills(self) -> &'static [Skill] {
        match self {
            Self::Tackle(_) => &[Skill::Tackling, Skill::Pursuit],
            Self::Sack => &[Skill::PassRush, Skill::BlockShedding],
            Self::Interception => &[Skill::ZoneCoverage, Skill::Catching],
            Self::ForcedFumble => &[Skill::HitPower, Skill::Tackling],
        }
    }

    const fn key(self) -> &'static str {
        match self {
            Self::Tackle(_) => "tackle",
            Self::Sack => "sack",
            Self::Interception => "interception",
            Self::ForcedFumble => "forced_fumble",
        }
    }
}

/// Per-defender weights: the group share split across that group's players.
#[must_use]
pub fn defensive_weights(
    team: &TeamGameState,
    lineup: &Lineup,
    credit: DefensiveCredit,
) -> Vec<(PlayerId, WeightedCandidate)> {
    let (line, backers, secondary) = credit.group_shares();
    let share = |group: PositionGroup| match group {
        PositionGroup::DefensiveLine => line,
        PositionGroup::Linebacker => backers,
        PositionGroup::Secondary => secondary,
        _ => 0.0,
    };
    let count = |group: PositionGroup| {
        lineup
            .slots()
            .iter()
            .filter(|slot| slot.position.group() == group)
            .count()
            .max(1)
    };
    lineup
        .slots()
        .iter()
        .filter(|slot| share(slot.position.group()) > 0.0)
        .map(|slot| {
            let group = slot.position.group();
            let members = f64::from(u8::try_from(count(group)).unwrap_or(u8::MAX));
            let base = share(group) / members;
            let factors = vec![WeightFactor::new(
                "skill",
                skill_factor(team.player(slot.player), credit.skills()),
            )];
            candidate(slot.player, base, factors)
        })
        .collect()
}

/// Credit a defender with the stop, sack, pick or forced fumble.
pub fn attribute_defender<R>(
    team: &TeamGameState,
    lineup: &Lineup,
    credit: DefensiveCredit,
    rng: &mut R,
) -> Option<(PlayerId, DecisionTrace)>
where
    R: Rng + ?Sized,
{
    let weights = defensive_weights(team, lineup, credit);
    choose_player(&format!("credit.{}", credit.key()), weights, rng)
}

/// Tackler for a play that gained `yards`.
pub fn attribute_tackle<R>(
    team: &TeamGameState,
    lineup: &Lineup,
    yards: i32,
    rng: &mut R,
) -> Option<(PlayerId, DecisionTrace)>
where
    R: Rng + ?Sized,
{
    attribute_defender(team, lineup, DefensiveCredit::Tackle(yards), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fatigue::FatigueSystem;
    use crate::matchup::{DefensiveScheme, OffensiveScheme};
    use crate::play::{DefensivePersonnel, OffensivePersonnel};
    use crate::player::PlayerRole;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn backs() -> TeamGameState {
        let mut team = TeamGameState::new("Backs", OffensiveScheme::PowerRun, DefensiveScheme::Cover2Zone);
        team.add_player(Player::new(PlayerId(1), "Lead", Position::Rb, PlayerRole::FeatureBack));
        team.add_player(Player::new(PlayerId(2), "Change", Position::Rb, PlayerRole::ReceivingBack));
        team.add_player(Player::new(PlayerId(3), "Third", Position::Rb, PlayerRole::PowerBack));
        team
    }

    #[test]
    fn weighted_index_handles_degenerate_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(weighted_index(&[], &mut rng).is_none());
        let (index, _) = weighted_index(&[0.0, 0.0], &mut rng).expect("uniform pick");
        assert!(index < 2);
        for _ in 0..100 {
            let (index, _) = weighted_index(&[0.0, f64::NAN, 2.0], &mut rng).expect("pick");
            assert_eq!(index, 2);
        }
    }

    #[test]
    fn weighted_choice_prefers_heavier_options() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let options = [("heavy", 9.0), ("light", 1.0)];
        let heavy = (0..2_000)
            .filter(|_| weighted_choice(&options, &mut rng) == Some("heavy"))
            .count();
        assert!(heavy > 1_650 && heavy < 1_950, "heavy picked {heavy}");
    }

    #[test]
    fn carry_penalties_stack_to_point_six() {
        assert!((carry_multiplier(10) - 1.0).abs() < f64::EPSILON);
        assert!((carry_multiplier(16) - 0.8).abs() < 1e-9);
        assert!((carry_multiplier(22) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn workload_shifts_carries_to_backups() {
        let fresh = backs();
        let mut worn = backs();
        worn.usage_mut().entry_mut(PlayerId(1)).carries = 22;
        let lead_share = |team: &TeamGameState| {
            let mut rng = ChaCha8Rng::seed_from_u64(21);
            let picks = (0..5_000)
                .filter(|_| select_running_back(team, &mut rng).map(|(id, _)| id) == Some(PlayerId(1)))
                .count();
            picks as f64 / 5_000.0
        };
        let fresh_share = lead_share(&fresh);
        let worn_share = lead_share(&worn);
        assert!((fresh_share - 0.70).abs() < 0.03, "fresh {fresh_share}");
        // 0.42 / (0.42 + 0.25 + 0.05)
        assert!((worn_share - 0.583).abs() < 0.03, "worn {worn_share}");
    }

    #[test]
    fn run_stuffs_credit_the_front() {
        let mut defense = TeamGameState::new("D", OffensiveScheme::ProStyle, DefensiveScheme::Cover3Zone);
        let mut next = 10;
        for position in [
            Position::De, Position::Dt, Position::Dt, Position::De, Position::Olb, Position::Mlb,
            Position::Olb, Position::Cb, Position::Cb, Position::Fs, Position::Ss,
        ] {
            defense.add_player(Player::new(PlayerId(next), "D", position, PlayerRole::Zone));
            next += 1;
        }
        let lineup = Lineup::defense(&defense, DefensivePersonnel::Base43, &FatigueSystem::default());
        let stuff: f64 = defensive_weights(&defense, &lineup, DefensiveCredit::Tackle(-1))
            .iter()
            .filter(|(id, _)| defense.player(*id).is_some_and(|p| p.position.group() == PositionGroup::DefensiveLine))
            .map(|(_, c)| c.final_weight)
            .sum();
        assert!((stuff - 0.45).abs() < 1e-9);
        let long: f64 = defensive_weights(&defense, &lineup, DefensiveCredit::Tackle(30))
            .iter()
            .filter(|(id, _)| defense.player(*id).is_some_and(|p| p.position.group() == PositionGroup::Secondary))
            .map(|(_, c)| c.final_weight)
            .sum();
        assert!((long - 0.85).abs() < 1e-9);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let (tackler, trace) = attribute_tackle(&defense, &lineup, 2, &mut rng).expect("tackler");
        assert!(lineup.contains(tackler));
        assert_eq!(trace.pool_id, "credit.tackle");
    }

    #[test]
    fn screens_favour_backs() {
        let mut offense = backs();
        offense.add_player(Player::new(PlayerId(20), "Wideout", Position::Wr, PlayerRole::Possession));
        let lineup = Lineup::offense(&offense, OffensivePersonnel::P11, &FatigueSystem::default());
        let weights = target_weights(&offense, &lineup, PlayType::Screen, None);
        let back = weights.iter().find(|(id, _)| *id == PlayerId(1)).map(|(_, c)| c.final_weight);
        let wide = weights.iter().find(|(id, _)| *id == PlayerId(20)).map(|(_, c)| c.final_weight);
        assert!(back.unwrap_or(0.0) > wide.unwrap_or(0.0));
    }
}
