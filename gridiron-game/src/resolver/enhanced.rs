//! Full resolution pipeline with every structural modifier.
//!
//! Stage order: pre-snap flag, lineups, pre-snap read (may change the play),
//! ball-carrier rotation, personnel and scheme effects, unit ratings,
//! play-action, pocket phase, situational and per-player matchups, then the
//! outcome table and the shared bookkeeping in [`PlayResolver`].
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Finish, PlayResolver, PlayResult, Resolution, Snap, UnitRatings};
use crate::config::EngineConfig;
use crate::context::PlayCallContext;
use crate::distribution::select_running_back;
use crate::fatigue::{FatigueSystem, read_curve};
use crate::lineup::Lineup;
use crate::matchup::pass_rush::{PassRushInput, phase_units, resolve_pass_rush};
use crate::matchup::presnap::read_defense;
use crate::matchup::resolver::MatchupSide;
use crate::matchup::scheme::{coverage_effect, scheme_matchup_effect};
use crate::matchup::{
    KeyMatchup, MatchupAggregate, MatchupResolver, PassRushResult, PersonnelMismatch, PlayActionBonus, PresnapRead,
    QbMentals, RunGameTracker, SchemeEffect, SituationalModifier, evaluate_situation, personnel_advantage,
    play_action_effectiveness,
};
use crate::numbers::{NEUTRAL_RATING, clamp_rating};
use crate::outcome::{TableModifiers, static_effects};
use crate::play::{DefensivePlayCall, OffensivePlayCall, PlayOutcome, PlayType};
use crate::player::{Position, Skill};
use crate::ratings::composite::rate_members;
use crate::ratings::{EffectiveRatingCalculator, RatingContext, UnitKind};
use crate::rng::RngBundle;
use crate::team::TeamGameState;
use crate::trace::DecisionTrace;

/// Weight of the per-player matchup aggregate in the offensive rating.
const MATCHUP_SHARE: f64 = 0.5;
/// Weight of the personnel mismatch in the offensive rating.
const PERSONNEL_SHARE: f64 = 0.5;
/// Rating points per unit of play-action multiplier above 1.
const PLAY_ACTION_MULTIPLIER_POINTS: f64 = 10.0;
/// Extra pocket seconds when the quarterback slides protection to a blitz.
const PROTECTION_CALL_POCKET_BONUS: f64 = 0.2;

const QB_MOBILITY_MIX: [(Skill, f64); 3] = [(Skill::Speed, 0.4), (Skill::Agility, 0.3), (Skill::Elusiveness, 0.3)];

const RUN_BLOCKERS: [Position; 7] = [
    Position::Lt,
    Position::Lg,
    Position::C,
    Position::Rg,
    Position::Rt,
    Position::Te,
    Position::Fb,
];
const RUN_FRONT: [Position; 6] = [
    Position::Dt,
    Position::Nt,
    Position::De,
    Position::Mlb,
    Position::Ilb,
    Position::Olb,
];
const RECEIVERS: [Position; 3] = [Position::Wr, Position::Te, Position::Rb];
const COVERAGE: [Position; 6] = [
    Position::Cb,
    Position::Fs,
    Position::Ss,
    Position::Olb,
    Position::Mlb,
    Position::Ilb,
];

/// [`PlayResult`] plus every intermediate the pipeline produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedPlayResult {
    pub base: PlayResult,
    /// Play type as called, before any audible.
    pub called_play: PlayType,
    pub personnel: PersonnelMismatch,
    pub scheme_effect: SchemeEffect,
    pub pass_rush: Option<PassRushResult>,
    pub presnap: PresnapRead,
    pub play_action: Option<PlayActionBonus>,
    pub situational: SituationalModifier,
    pub weak_link_exploited: bool,
    pub key_matchup: Option<KeyMatchup>,
    pub units: UnitRatings,
    pub offense_rating: f64,
    pub defense_rating: f64,
    pub advantage: f64,
    /// The sampled sack became a scramble.
    pub scrambled: bool,
    pub rotation_trace: Option<DecisionTrace>,
    pub outcome_trace: DecisionTrace,
}

/// Everything that feeds the offensive and defensive ratings.
#[derive(Debug, Clone, Copy)]
struct RatingInputs<'r> {
    units: &'r UnitRatings,
    situational: &'r SituationalModifier,
    matchups: &'r MatchupAggregate,
    personnel: &'r PersonnelMismatch,
    presnap: &'r PresnapRead,
    play_action: Option<&'r PlayActionBonus>,
}

/// Orchestrates one snap through every modifier stage.
#[derive(Debug, Clone)]
pub struct EnhancedPlayResolver<'a> {
    core: PlayResolver<'a>,
}

impl<'a> EnhancedPlayResolver<'a> {
    #[must_use]
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            core: PlayResolver::new(config),
        }
    }

    #[must_use]
    pub const fn core(&self) -> &PlayResolver<'a> {
        &self.core
    }

    #[must_use]
    pub const fn fatigue(&self) -> &FatigueSystem {
        self.core.fatigue()
    }

    /// Resolve one snap without touching either team.
    ///
    /// `run_game` is the offense's recent rushing history, used to price the
    /// play fake.
    #[allow(clippy::too_many_arguments, clippy::too_many_lines)]
    pub fn resolve(
        &self,
        offense: &TeamGameState,
        defense: &TeamGameState,
        offense_call: &OffensivePlayCall,
        defense_call: &DefensivePlayCall,
        ctx: &PlayCallContext,
        run_game: &RunGameTracker,
        rngs: &RngBundle,
    ) -> Resolution<EnhancedPlayResult> {
        let called_play = offense_call.play_type;
        let mut snap = self.core.snap(offense, defense, offense_call, defense_call, ctx);

        let flag = self.core.roll_flag(&snap, called_play, rngs);
        if let Some(foul) = flag.filter(|foul| foul.kind.is_pre_snap()) {
            log::debug!("{}: dead-ball {}", offense.name, foul.kind.key());
            let base = PlayResult::dead_ball(called_play, ctx, foul);
            return Resolution {
                result: EnhancedPlayResult::dead_ball(base, offense_call, defense_call),
                effects: super::PlaySideEffects::default(),
            };
        }

        let presnap = quarterback_read(&snap, offense_call, defense_call, rngs);
        let play_type = presnap.final_play;
        if presnap.changed_play() {
            log::debug!(
                "{}: audible {} -> {}",
                offense.name,
                called_play.label(),
                play_type.label()
            );
        }

        let mut designed_carrier = None;
        let mut rotation_trace = None;
        if play_type.is_run()
            && play_type != PlayType::QbSneak
            && let Some((back, trace)) = select_running_back(offense, &mut *rngs.distribution())
        {
            if let Some(benched) = snap.offense_lineup.substitute(Position::Rb, back) {
                log::trace!("rotation: {back} in for {benched}");
            }
            designed_carrier = Some(back);
            rotation_trace = Some(trace);
        }

        let personnel = personnel_advantage(offense_call.personnel, defense_call.personnel, play_type.category());
        let scheme_effect = scheme_matchup_effect(offense.offensive_scheme, defense.defensive_scheme, play_type)
            .combine(coverage_effect(defense_call.coverage, play_type));

        let direction = play_type.is_run().then_some(offense_call.direction);
        let units = self.core.rate_units(&snap, play_type, direction);

        let play_action = play_type.is_play_action().then(|| play_action_effectiveness(run_game));

        let pass_rush = play_type.has_dropback().then(|| {
            let phase = crate::matchup::RushPhase::for_play(play_type);
            let protectors = rate_members(UnitKind::PassProtection, offense, &snap.offense_lineup, ctx);
            let rushers = rate_members(UnitKind::PassRush, defense, &snap.defense_lineup, ctx);
            let (protection, rush) = phase_units(self.core.composites().weights(), phase, &protectors, &rushers);
            let mut pocket_time_bonus = play_action.map_or(0.0, |bonus| bonus.pocket_time_bonus);
            if presnap.protection_adjusted {
                pocket_time_bonus += PROTECTION_CALL_POCKET_BONUS;
            }
            let input = PassRushInput {
                protection,
                rush,
                blitz: defense_call.blitz,
                qb_mobility: quarterback_mobility(&snap),
                pocket_time_bonus,
            };
            resolve_pass_rush(&input, play_type, &mut *rngs.rush())
        });

        let situational = evaluate_situation(ctx, play_type);
        let (offense_sides, defense_sides) = matchup_sides(&snap, play_type, &situational);
        let matchups = MatchupResolver::resolve(&offense_sides, &defense_sides, &mut *rngs.matchup());

        let (offense_rating, defense_rating) = ratings(&RatingInputs {
            units: &units,
            situational: &situational,
            matchups: &matchups,
            personnel: &personnel,
            presnap: &presnap,
            play_action: play_action.as_ref(),
        });

        let modifiers = TableModifiers {
            scheme: scheme_effect,
            completion_shift: pass_rush.map_or(0.0, |rush| rush.completion_modifier),
            sack_multiplier: pass_rush.map_or(1.0, |rush| rush.sack_multiplier),
            deep_completion_bonus: play_action.map_or(0.0, |bonus| bonus.deep_completion_bonus),
        };
        let tables = self.core.tables();
        let table = tables.generate(
            offense_rating,
            defense_rating,
            play_type,
            ctx,
            &modifiers,
            &mut *rngs.outcome(),
        );
        let mut rolled = tables.roll(&table, &mut *rngs.outcome(), &mut *rngs.yardage());
        let outcome_trace = rolled.trace.clone();

        let scrambled = rolled.outcome == PlayOutcome::Sack
            && pass_rush.is_some_and(|rush| rush.scramble_eligible && rngs.rush().gen_bool(rush.escape_chance));
        if scrambled {
            rolled.outcome = PlayOutcome::Scramble;
            rolled.yards = tables.sample_yards(&table, PlayOutcome::Scramble, &mut *rngs.yardage());
            rolled.secondary_effects = static_effects(PlayOutcome::Scramble);
            log::debug!("{}: quarterback escapes for {} yards", offense.name, rolled.yards);
        }

        let (base, effects) = self.core.finish(
            &snap,
            Finish {
                play_type,
                primary_target: offense_call.primary_target,
                designed_carrier,
                rolled,
                flag,
            },
            rngs,
        );

        let result = EnhancedPlayResult {
            base,
            called_play,
            personnel,
            scheme_effect,
            pass_rush,
            presnap,
            play_action,
            situational,
            weak_link_exploited: units.weak_link_exploited(),
            key_matchup: matchups.key,
            advantage: table.advantage,
            units,
            offense_rating,
            defense_rating,
            scrambled,
            rotation_trace,
            outcome_trace,
        };
        Resolution { result, effects }
    }

    /// Resolve and apply side effects to both teams.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_and_apply(
        &self,
        offense: &mut TeamGameState,
        defense: &mut TeamGameState,
        offense_call: &OffensivePlayCall,
        defense_call: &DefensivePlayCall,
        ctx: &PlayCallContext,
        run_game: &RunGameTracker,
        rngs: &RngBundle,
    ) -> EnhancedPlayResult {
        let resolution = self.resolve(offense, defense, offense_call, defense_call, ctx, run_game, rngs);
        super::apply_side_effects(offense, defense, &resolution.effects, self.core.fatigue());
        resolution.result
    }
}

impl EnhancedPlayResult {
    fn dead_ball(base: PlayResult, offense_call: &OffensivePlayCall, defense_call: &DefensivePlayCall) -> Self {
        let play_type = offense_call.play_type;
        Self {
            called_play: play_type,
            personnel: personnel_advantage(offense_call.personnel, defense_call.personnel, play_type.category()),
            scheme_effect: SchemeEffect::default(),
            pass_rush: None,
            presnap: PresnapRead::passive(play_type),
            play_action: None,
            situational: SituationalModifier::neutral(),
            weak_link_exploited: false,
            key_matchup: None,
            units: UnitRatings::default(),
            offense_rating: NEUTRAL_RATING,
            defense_rating: NEUTRAL_RATING,
            advantage: 0.0,
            scrambled: false,
            rotation_trace: None,
            outcome_trace: DecisionTrace {
                pool_id: "outcome.dead_ball".to_string(),
                roll: crate::trace::RollValue::F64(0.0),
                candidates: Vec::new(),
                chosen_id: base.outcome.label().to_string(),
            },
            base,
        }
    }
}

fn quarterback_read(
    snap: &Snap<'_>,
    offense_call: &OffensivePlayCall,
    defense_call: &DefensivePlayCall,
    rngs: &RngBundle,
) -> PresnapRead {
    let Some(quarterback) = snap.offense_lineup.quarterback().and_then(|id| snap.offense.player(id)) else {
        return PresnapRead::passive(offense_call.play_type);
    };
    read_defense(
        &QbMentals::from_player(quarterback),
        offense_call,
        defense_call,
        snap.ctx,
        &mut *rngs.presnap(),
    )
}

fn quarterback_mobility(snap: &Snap<'_>) -> f64 {
    snap.offense_lineup
        .quarterback()
        .and_then(|id| snap.offense.player(id))
        .map_or(NEUTRAL_RATING, |quarterback| {
            let ctx = RatingContext::for_player(snap.offense, quarterback, snap.ctx);
            EffectiveRatingCalculator::blended_rating(quarterback, &QB_MOBILITY_MIX, &ctx)
        })
}

/// Offensive and defensive ratings fed to the outcome table.
fn ratings(inputs: &RatingInputs<'_>) -> (f64, f64) {
    let play_action_points = inputs.play_action.map_or(0.0, |bonus| {
        (bonus.multiplier - 1.0).mul_add(PLAY_ACTION_MULTIPLIER_POINTS, bonus.route_bonus)
    });
    let offense = inputs.units.offense_mean() * inputs.situational.offense
        + MATCHUP_SHARE * inputs.matchups.advantage
        + PERSONNEL_SHARE * inputs.personnel.advantage
        + inputs.presnap.modifier
        + play_action_points;
    let defense = inputs.units.defense_mean() * inputs.situational.defense;
    (clamp_rating(offense), clamp_rating(defense))
}

/// Paired participants: blockers against the front on runs, receivers
/// against coverage on passes, in priority order.
fn matchup_sides(
    snap: &Snap<'_>,
    play_type: PlayType,
    situational: &SituationalModifier,
) -> (Vec<MatchupSide>, Vec<MatchupSide>) {
    let (offense_positions, offense_unit, defense_positions, defense_unit): (&[Position], _, &[Position], _) =
        if play_type.is_run() {
            (&RUN_BLOCKERS, UnitKind::RunBlocking, &RUN_FRONT, UnitKind::RunStopping)
        } else {
            (&RECEIVERS, UnitKind::Receiving, &COVERAGE, UnitKind::PassCoverage)
        };
    let offense = rated_sides(
        snap.offense,
        &snap.offense_lineup,
        offense_positions,
        offense_unit,
        snap.ctx,
        situational,
        situational.offense,
    );
    let defense = rated_sides(
        snap.defense,
        &snap.defense_lineup,
        defense_positions,
        defense_unit,
        snap.ctx,
        situational,
        situational.defense,
    );
    (offense, defense)
}

fn rated_sides(
    team: &TeamGameState,
    lineup: &Lineup,
    positions: &[Position],
    unit: UnitKind,
    ctx: &PlayCallContext,
    situational: &SituationalModifier,
    side_multiplier: f64,
) -> Vec<MatchupSide> {
    positions
        .iter()
        .flat_map(|position| lineup.slots().iter().filter(move |slot| slot.position == *position))
        .filter_map(|slot| {
            let player = team.player(slot.player)?;
            let rating_ctx = RatingContext::for_player(team, player, ctx);
            let base = EffectiveRatingCalculator::blended_rating(player, unit.skill_mix(), &rating_ctx);
            let curve = read_curve(player, &team.usage().get(slot.player));
            let rating =
                clamp_rating(base * side_multiplier * situational.player_multiplier(player) * curve.effectiveness);
            Some(MatchupSide {
                id: slot.player,
                position: slot.position,
                rating,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play::{Blitz, Coverage, DefensivePersonnel, OffensivePersonnel};
    use crate::roster::stock_team;

    fn resolve_with(
        play_type: PlayType,
        offense_rating: f64,
        defense_rating: f64,
        seed: u64,
    ) -> Resolution<EnhancedPlayResult> {
        let config = EngineConfig::default();
        let resolver = EnhancedPlayResolver::new(&config);
        let offense = stock_team("Home", 1_000, offense_rating);
        let defense = stock_team("Away", 2_000, defense_rating);
        let offense_call = OffensivePlayCall::new(play_type, OffensivePersonnel::P11);
        let defense_call = DefensivePlayCall::new(DefensivePersonnel::Nickel, Coverage::Cover3, Blitz::None);
        let ctx = PlayCallContext::first_and_ten_at(40);
        resolver.resolve(
            &offense,
            &defense,
            &offense_call,
            &defense_call,
            &ctx,
            &RunGameTracker::default(),
            &RngBundle::from_user_seed(seed),
        )
    }

    #[test]
    fn same_seed_same_result() {
        for seed in [1, 9, 42] {
            let first = resolve_with(PlayType::PlayActionDeep, 65.0, 60.0, seed);
            let second = resolve_with(PlayType::PlayActionDeep, 65.0, 60.0, seed);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn pass_plays_report_pocket_and_run_plays_do_not() {
        for seed in 0..20 {
            let pass = resolve_with(PlayType::MediumPass, 60.0, 60.0, seed).result;
            if !pass.base.no_play && pass.presnap.final_play.is_pass() {
                assert!(pass.pass_rush.is_some());
            }
            let run = resolve_with(PlayType::RunInside, 60.0, 60.0, seed).result;
            if !run.base.no_play && run.presnap.final_play.is_run() {
                assert!(run.pass_rush.is_none());
                assert!(run.units.get(UnitKind::RunStopping).is_some());
            }
        }
    }

    #[test]
    fn stronger_offense_rates_higher() {
        let strong = resolve_with(PlayType::RunInside, 80.0, 50.0, 5).result;
        let weak = resolve_with(PlayType::RunInside, 50.0, 80.0, 5).result;
        if !strong.base.no_play && !weak.base.no_play {
            assert!(strong.offense_rating > weak.offense_rating);
            assert!(strong.defense_rating < weak.defense_rating);
            assert!(strong.advantage > weak.advantage);
        }
    }

    #[test]
    fn ratings_stay_in_bounds() {
        for seed in 0..30 {
            let result = resolve_with(PlayType::ALL[(seed % 10) as usize], 95.0, 5.0, seed).result;
            assert!((1.0..=100.0).contains(&result.offense_rating));
            assert!((1.0..=100.0).contains(&result.defense_rating));
            assert!((-1.0..=1.0).contains(&result.advantage));
        }
    }

    #[test]
    fn scramble_only_replaces_sacks() {
        for seed in 0..200 {
            let result = resolve_with(PlayType::DeepPass, 40.0, 85.0, seed).result;
            if result.scrambled {
                assert_eq!(result.base.outcome, PlayOutcome::Scramble);
                assert!(result.pass_rush.is_some_and(|rush| rush.scramble_eligible && rush.escape_chance > 0.0));
            }
        }
    }
}
