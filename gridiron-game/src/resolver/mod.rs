//! Play resolution: one snap in, one [`PlayResult`] out.
//!
//! Resolvers only read team state. Everything a play changes (fatigue,
//! snap counts, touches, injuries) comes back as [`PlaySideEffects`] and is
//! written by [`apply_side_effects`].
pub mod effects;
pub mod enhanced;
pub mod field;
pub mod penalty;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::EngineConfig;
use crate::constants::WEAK_LINK_EXPLOIT_THRESHOLD;
use crate::context::PlayCallContext;
use crate::distribution::{DefensiveCredit, attribute_defender, attribute_tackle, select_target};
use crate::fatigue::{FatigueInput, FatigueSystem, PlayIntensity, read_curve};
use crate::injury::{Injury, InjuryProcessor, InjuryRiskInput};
use crate::lineup::Lineup;
use crate::numbers::{NEUTRAL_RATING, mean};
use crate::outcome::{OutcomeTables, RolledOutcome, SecondaryEffect, TableModifiers};
use crate::play::{DefensivePlayCall, OffensivePlayCall, PlayOutcome, PlayType, RunDirection};
use crate::player::{PlayerId, Position};
use crate::ratings::{TeamCompositeRatings, UnitKind, UnitRating};
use crate::rng::RngBundle;
use crate::team::TeamGameState;

pub use effects::{
    PlaySideEffects, SideEffects, UsageDelta, apply_drive_recovery, apply_halftime_recovery, apply_side_effects,
};
pub use enhanced::{EnhancedPlayResolver, EnhancedPlayResult};
pub use field::{FieldOutcome, advance, enforce_penalty};
pub use penalty::{Penalty, PenaltyKind, PenaltySide};

const RUN_OFFENSE_UNITS: [UnitKind; 2] = [UnitKind::RunBlocking, UnitKind::Rushing];
const RUN_DEFENSE_UNITS: [UnitKind; 1] = [UnitKind::RunStopping];
const PASS_OFFENSE_UNITS: [UnitKind; 2] = [UnitKind::PassProtection, UnitKind::Receiving];
const PASS_DEFENSE_UNITS: [UnitKind; 2] = [UnitKind::PassRush, UnitKind::PassCoverage];

/// Who did what on the play.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvolvedPlayers {
    pub passer: Option<PlayerId>,
    pub ball_carrier: Option<PlayerId>,
    pub target: Option<PlayerId>,
    pub tackler: Option<PlayerId>,
    /// Sack, interception or forced-fumble credit.
    pub defender: Option<PlayerId>,
    pub injured: Vec<PlayerId>,
}

/// The externally visible result of one snap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayResult {
    pub play_type: PlayType,
    pub outcome: PlayOutcome,
    pub yards: i32,
    pub new_down: u8,
    pub new_distance: u8,
    pub new_field_position: u8,
    pub first_down: bool,
    pub turnover: bool,
    pub turnover_on_downs: bool,
    pub touchdown: bool,
    pub safety: bool,
    pub injury: bool,
    /// Dead-ball foul; the snap never happened.
    pub no_play: bool,
    pub penalty: Option<Penalty>,
    pub players: InvolvedPlayers,
    pub injuries: Vec<Injury>,
}

impl PlayResult {
    fn from_field(
        play_type: PlayType,
        outcome: PlayOutcome,
        field: FieldOutcome,
        penalty: Option<Penalty>,
        players: InvolvedPlayers,
        injuries: Vec<Injury>,
    ) -> Self {
        Self {
            play_type,
            outcome,
            yards: field.yards,
            new_down: field.new_down,
            new_distance: field.new_distance,
            new_field_position: field.new_field_position,
            first_down: field.first_down,
            turnover: field.turnover,
            turnover_on_downs: field.turnover_on_downs,
            touchdown: field.touchdown,
            safety: field.safety,
            injury: !injuries.is_empty(),
            no_play: false,
            penalty,
            players,
            injuries,
        }
    }

    /// Result of a pre-snap foul.
    #[must_use]
    pub fn dead_ball(play_type: PlayType, ctx: &PlayCallContext, penalty: Penalty) -> Self {
        let field = enforce_penalty(ctx, &penalty);
        let mut result = Self::from_field(
            play_type,
            PlayOutcome::NoGain,
            field,
            Some(penalty),
            InvolvedPlayers::default(),
            Vec::new(),
        );
        result.no_play = true;
        result
    }

    /// An accepted flag decided the spot.
    #[must_use]
    pub fn penalty_enforced(&self) -> bool {
        self.penalty.is_some_and(|penalty| penalty.accepted)
    }

    /// Possession changes for any reason other than a score.
    #[must_use]
    pub const fn possession_changes(&self) -> bool {
        self.turnover || self.turnover_on_downs
    }
}

/// Unit ratings computed for the snap, per side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitRatings {
    pub offense: Vec<(UnitKind, UnitRating)>,
    pub defense: Vec<(UnitKind, UnitRating)>,
}

impl UnitRatings {
    #[must_use]
    pub fn get(&self, unit: UnitKind) -> Option<&UnitRating> {
        self.offense
            .iter()
            .chain(&self.defense)
            .find(|(kind, _)| *kind == unit)
            .map(|(_, rating)| rating)
    }

    #[must_use]
    pub fn offense_mean(&self) -> f64 {
        side_mean(&self.offense)
    }

    #[must_use]
    pub fn defense_mean(&self) -> f64 {
        side_mean(&self.defense)
    }

    /// Some unit on the field carries a weak-link penalty big enough to matter.
    #[must_use]
    pub fn weak_link_exploited(&self) -> bool {
        self.offense
            .iter()
            .chain(&self.defense)
            .any(|(_, rating)| rating.weak_link_penalty > WEAK_LINK_EXPLOIT_THRESHOLD)
    }
}

fn side_mean(units: &[(UnitKind, UnitRating)]) -> f64 {
    let values: Vec<f64> = units.iter().map(|(_, rating)| rating.effective).collect();
    mean(&values).unwrap_or(NEUTRAL_RATING)
}

/// A resolved play plus the usage it owes both teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution<T> {
    pub result: T,
    pub effects: PlaySideEffects,
}

/// Both teams and their on-field elevens for one snap.
#[derive(Debug, Clone)]
pub(crate) struct Snap<'a> {
    pub offense: &'a TeamGameState,
    pub defense: &'a TeamGameState,
    pub offense_lineup: Lineup,
    pub defense_lineup: Lineup,
    pub ctx: &'a PlayCallContext,
}

/// Everything between the rolled outcome and the returned result.
#[derive(Debug, Clone)]
pub(crate) struct Finish {
    pub play_type: PlayType,
    pub primary_target: Option<PlayerId>,
    pub designed_carrier: Option<PlayerId>,
    pub rolled: RolledOutcome,
    pub flag: Option<Penalty>,
}

/// Baseline resolver: unit ratings against the outcome table, no structural
/// modifiers. Shares its bookkeeping with [`EnhancedPlayResolver`].
#[derive(Debug, Clone)]
pub struct PlayResolver<'a> {
    config: &'a EngineConfig,
    composites: TeamCompositeRatings<'a>,
    tables: OutcomeTables,
    injuries: InjuryProcessor<'a>,
    fatigue: FatigueSystem,
}

impl<'a> PlayResolver<'a> {
    #[must_use]
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            composites: TeamCompositeRatings::new(&config.position_weights),
            tables: OutcomeTables::new(&config.outcome),
            injuries: InjuryProcessor::new(&config.injury),
            fatigue: FatigueSystem::new(&config.fatigue),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &'a EngineConfig {
        self.config
    }

    #[must_use]
    pub const fn tables(&self) -> &OutcomeTables {
        &self.tables
    }

    #[must_use]
    pub const fn fatigue(&self) -> &FatigueSystem {
        &self.fatigue
    }

    /// Resolve one snap without touching either team.
    pub fn resolve(
        &self,
        offense: &TeamGameState,
        defense: &TeamGameState,
        offense_call: &OffensivePlayCall,
        defense_call: &DefensivePlayCall,
        ctx: &PlayCallContext,
        rngs: &RngBundle,
    ) -> Resolution<PlayResult> {
        let play_type = offense_call.play_type;
        let snap = self.snap(offense, defense, offense_call, defense_call, ctx);
        let flag = self.roll_flag(&snap, play_type, rngs);
        if let Some(foul) = flag.filter(|foul| foul.kind.is_pre_snap()) {
            log::debug!("{}: dead-ball {}", offense.name, foul.kind.key());
            return Resolution {
                result: PlayResult::dead_ball(play_type, ctx, foul),
                effects: PlaySideEffects::default(),
            };
        }

        let direction = play_type.is_run().then_some(offense_call.direction);
        let units = self.rate_units(&snap, play_type, direction);
        let table = self.tables.generate(
            units.offense_mean(),
            units.defense_mean(),
            play_type,
            ctx,
            &TableModifiers::neutral(),
            &mut *rngs.outcome(),
        );
        let rolled = self.tables.roll(&table, &mut *rngs.outcome(), &mut *rngs.yardage());
        let (result, effects) = self.finish(
            &snap,
            Finish {
                play_type,
                primary_target: offense_call.primary_target,
                designed_carrier: None,
                rolled,
                flag,
            },
            rngs,
        );
        Resolution { result, effects }
    }

    /// Resolve and immediately apply the side effects.
    pub fn resolve_and_apply(
        &self,
        offense: &mut TeamGameState,
        defense: &mut TeamGameState,
        offense_call: &OffensivePlayCall,
        defense_call: &DefensivePlayCall,
        ctx: &PlayCallContext,
        rngs: &RngBundle,
    ) -> PlayResult {
        let resolution = self.resolve(offense, defense, offense_call, defense_call, ctx, rngs);
        apply_side_effects(offense, defense, &resolution.effects, &self.fatigue);
        resolution.result
    }

    pub(crate) fn snap<'s>(
        &self,
        offense: &'s TeamGameState,
        defense: &'s TeamGameState,
        offense_call: &OffensivePlayCall,
        defense_call: &DefensivePlayCall,
        ctx: &'s PlayCallContext,
    ) -> Snap<'s> {
        Snap {
            offense,
            defense,
            offense_lineup: Lineup::offense(offense, offense_call.personnel, &self.fatigue),
            defense_lineup: Lineup::defense(defense, defense_call.personnel, &self.fatigue),
            ctx,
        }
    }

    pub(crate) fn rate_units(&self, snap: &Snap<'_>, play_type: PlayType, direction: Option<RunDirection>) -> UnitRatings {
        let (offense_units, defense_units): (&[UnitKind], &[UnitKind]) = if play_type.is_run() {
            (&RUN_OFFENSE_UNITS, &RUN_DEFENSE_UNITS)
        } else {
            (&PASS_OFFENSE_UNITS, &PASS_DEFENSE_UNITS)
        };
        let rate = |unit: UnitKind, team: &TeamGameState, lineup: &Lineup| {
            let direction = if unit == UnitKind::RunBlocking { direction } else { None };
            (unit, self.composites.rate_lineup(unit, team, lineup, snap.ctx, direction))
        };
        UnitRatings {
            offense: offense_units
                .iter()
                .map(|unit| rate(*unit, snap.offense, &snap.offense_lineup))
                .collect(),
            defense: defense_units
                .iter()
                .map(|unit| rate(*unit, snap.defense, &snap.defense_lineup))
                .collect(),
        }
    }

    pub(crate) const fn composites(&self) -> &TeamCompositeRatings<'a> {
        &self.composites
    }

    /// Roll for a flag before the snap; pre-snap kinds end the play.
    pub(crate) fn roll_flag(&self, snap: &Snap<'_>, play_type: PlayType, rngs: &RngBundle) -> Option<Penalty> {
        let offense_share = snap.offense.undisciplined_share(&snap.offense_lineup.ids());
        let defense_share = snap.defense.undisciplined_share(&snap.defense_lineup.ids());
        let mut rng = rngs.penalty();
        let kind = penalty::roll_penalty_kind(&self.config.penalty, offense_share, defense_share, play_type, &mut *rng)?;
        let (team, lineup) = match kind.side() {
            PenaltySide::Offense => (snap.offense, &snap.offense_lineup),
            PenaltySide::Defense => (snap.defense, &snap.defense_lineup),
        };
        let culprit = penalty::pick_culprit(kind, team, lineup, &mut *rng);
        let yards = penalty::enforced_yards(kind, play_type, snap.ctx);
        log::debug!("flag: {} for {yards} yards on {:?}", kind.key(), culprit);
        Some(Penalty::flagged(kind, yards, culprit))
    }

    /// Field result, credits, injuries and usage for a rolled outcome.
    pub(crate) fn finish(&self, snap: &Snap<'_>, finish: Finish, rngs: &RngBundle) -> (PlayResult, PlaySideEffects) {
        let Finish {
            play_type,
            primary_target,
            designed_carrier,
            rolled,
            flag,
        } = finish;
        let outcome = rolled.outcome;
        let (field, penalty) = settle(snap.ctx, play_type, outcome, rolled.yards, flag);

        let mut players = self.credit(snap, play_type, primary_target, designed_carrier, &rolled, &field, rngs);
        let (offense_injuries, defense_injuries) = self.check_injuries(snap, &rolled, &players, rngs);
        players.injured = offense_injuries
            .iter()
            .chain(&defense_injuries)
            .map(|injury| injury.player)
            .collect();

        let mut effects = self.usage_effects(snap, play_type, &rolled, &players);
        effects.offense.injuries = offense_injuries.clone();
        effects.defense.injuries = defense_injuries.clone();
        let mut injuries = offense_injuries;
        injuries.extend(defense_injuries);

        log::debug!(
            "{} {} -> {} for {} (down {} & {} at {})",
            snap.offense.name,
            play_type.label(),
            outcome.label(),
            field.yards,
            field.new_down,
            field.new_distance,
            field.new_field_position
        );
        (
            PlayResult::from_field(play_type, outcome, field, penalty, players, injuries),
            effects,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn credit(
        &self,
        snap: &Snap<'_>,
        play_type: PlayType,
        primary_target: Option<PlayerId>,
        designed_carrier: Option<PlayerId>,
        rolled: &RolledOutcome,
        field: &FieldOutcome,
        rngs: &RngBundle,
    ) -> InvolvedPlayers {
        let outcome = rolled.outcome;
        let quarterback = snap.offense_lineup.quarterback();
        let mut rng = rngs.distribution();
        let mut players = InvolvedPlayers::default();

        if play_type.is_pass() {
            players.passer = quarterback;
            if matches!(outcome, PlayOutcome::Sack | PlayOutcome::Scramble) {
                players.ball_carrier = quarterback;
            } else {
                players.target = select_target(snap.offense, &snap.offense_lineup, play_type, primary_target, &mut *rng)
                    .map(|(id, _)| id);
                if outcome.has_ball_carrier() {
                    players.ball_carrier = players.target;
                }
            }
        } else {
            players.ball_carrier = designed_carrier.or_else(|| {
                if play_type == PlayType::QbSneak {
                    quarterback
                } else {
                    snap.offense_lineup.first_at(&[Position::Rb, Position::Fb]).or(quarterback)
                }
            });
        }

        let credit = match outcome {
            PlayOutcome::Sack => Some(DefensiveCredit::Sack),
            PlayOutcome::Interception => Some(DefensiveCredit::Interception),
            PlayOutcome::Fumble | PlayOutcome::FumbleRecovered => Some(DefensiveCredit::ForcedFumble),
            _ => None,
        };
        if let Some(credit) = credit {
            players.defender = attribute_defender(snap.defense, &snap.defense_lineup, credit, &mut *rng).map(|(id, _)| id);
        }
        let tackled = outcome.has_ball_carrier() && outcome != PlayOutcome::Sack && !field.touchdown;
        if tackled && players.ball_carrier.is_some() {
            players.tackler =
                attribute_tackle(snap.defense, &snap.defense_lineup, field.yards, &mut *rng).map(|(id, _)| id);
        }
        players
    }

    fn check_injuries(
        &self,
        snap: &Snap<'_>,
        rolled: &RolledOutcome,
        players: &InvolvedPlayers,
        rngs: &RngBundle,
    ) -> (Vec<Injury>, Vec<Injury>) {
        if !rolled.has_effect(SecondaryEffect::InjuryCheck) {
            return (Vec::new(), Vec::new());
        }
        let big_hit = rolled.has_effect(SecondaryEffect::BigHit);
        let mut rng = rngs.injury();
        let mut roll_for = |team: &TeamGameState, ids: &[Option<PlayerId>]| {
            let mut checked: SmallVec<[PlayerId; 3]> = SmallVec::new();
            let mut injuries = Vec::new();
            for id in ids.iter().flatten() {
                if checked.contains(id) {
                    continue;
                }
                checked.push(*id);
                let Some(player) = team.player(*id) else {
                    continue;
                };
                let usage = team.usage().get(*id);
                let input = InjuryRiskInput {
                    player,
                    outcome: rolled.outcome,
                    big_hit,
                    fatigue: usage.fatigue,
                    weather: &snap.ctx.weather,
                    usage_risk: read_curve(player, &usage).injury_risk,
                };
                if let Some(injury) = self.injuries.check(&input, &mut *rng) {
                    injuries.push(injury);
                }
            }
            injuries
        };
        let offense = roll_for(snap.offense, &[players.ball_carrier, players.passer]);
        let defense = roll_for(snap.defense, &[players.tackler, players.defender]);
        (offense, defense)
    }

    fn usage_effects(
        &self,
        snap: &Snap<'_>,
        play_type: PlayType,
        rolled: &RolledOutcome,
        players: &InvolvedPlayers,
    ) -> PlaySideEffects {
        let intensity = if rolled.has_effect(SecondaryEffect::FatigueHigh) {
            PlayIntensity::High
        } else {
            PlayIntensity::classify(play_type, rolled.outcome)
        };
        let mut offense = side_usage(&self.fatigue, snap.offense, &snap.offense_lineup, snap.ctx, intensity);
        let defense = side_usage(&self.fatigue, snap.defense, &snap.defense_lineup, snap.ctx, intensity);

        let outcome = rolled.outcome;
        if let Some(carrier) = players.ball_carrier
            && outcome != PlayOutcome::Sack
            && let Some(delta) = offense.delta_mut(carrier)
        {
            delta.touch = true;
            delta.carry = play_type.is_run() || outcome == PlayOutcome::Scramble;
        }
        if let Some(target) = players.target
            && let Some(delta) = offense.delta_mut(target)
        {
            delta.target = true;
        }
        PlaySideEffects { offense, defense }
    }
}

fn side_usage(
    fatigue: &FatigueSystem,
    team: &TeamGameState,
    lineup: &Lineup,
    ctx: &PlayCallContext,
    intensity: PlayIntensity,
) -> SideEffects {
    let on_field = lineup
        .slots()
        .iter()
        .filter_map(|slot| {
            let player = team.player(slot.player)?;
            let usage = team.usage().get(slot.player);
            let input = FatigueInput {
                player,
                current: usage.fatigue,
                snaps: usage.snaps,
                weather: &ctx.weather,
            };
            Some(UsageDelta::snap(slot.player, fatigue.snap_delta(&input, intensity)))
        })
        .collect();
    SideEffects {
        on_field,
        injuries: Vec::new(),
    }
}

/// Field result with any post-snap flag accepted or declined.
#[must_use]
pub fn settle(
    ctx: &PlayCallContext,
    play_type: PlayType,
    outcome: PlayOutcome,
    yards: i32,
    flag: Option<Penalty>,
) -> (FieldOutcome, Option<Penalty>) {
    let field = advance(ctx, play_type, outcome, yards);
    match flag {
        None => (field, None),
        Some(flag) if penalty::accepts(&flag, field.yards, field.changes_possession(), field.touchdown) => {
            (enforce_penalty(ctx, &flag), Some(flag))
        }
        Some(flag) => (field, Some(flag.declined())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play::{Blitz, Coverage, DefensivePersonnel, OffensivePersonnel};
    use crate::roster::stock_team;

    fn calls(play_type: PlayType) -> (OffensivePlayCall, DefensivePlayCall) {
        (
            OffensivePlayCall::new(play_type, OffensivePersonnel::P11),
            DefensivePlayCall::new(DefensivePersonnel::Nickel, Coverage::Cover3, Blitz::None),
        )
    }

    #[test]
    fn resolve_is_pure_and_apply_writes_usage() {
        let config = EngineConfig::default();
        let resolver = PlayResolver::new(&config);
        let mut offense = stock_team("Home", 1_000, 60.0);
        let mut defense = stock_team("Away", 2_000, 60.0);
        let (offense_call, defense_call) = calls(PlayType::RunInside);
        let ctx = PlayCallContext::first_and_ten_at(35);

        let rngs = RngBundle::from_user_seed(7);
        let resolution = resolver.resolve(&offense, &defense, &offense_call, &defense_call, &ctx, &rngs);
        assert_eq!(offense.usage().iter().count(), 0);
        if !resolution.result.no_play {
            assert_eq!(resolution.effects.offense.on_field.len(), 11);
            assert_eq!(resolution.effects.defense.on_field.len(), 11);
        }

        let rngs = RngBundle::from_user_seed(7);
        let applied =
            resolver.resolve_and_apply(&mut offense, &mut defense, &offense_call, &defense_call, &ctx, &rngs);
        assert_eq!(applied, resolution.result);
        if !applied.no_play {
            assert_eq!(offense.usage().iter().filter(|(_, usage)| usage.snaps == 1).count(), 11);
        }
    }

    #[test]
    fn results_stay_on_the_field() {
        let config = EngineConfig::default();
        let resolver = PlayResolver::new(&config);
        let offense = stock_team("Home", 1_000, 70.0);
        let defense = stock_team("Away", 2_000, 50.0);
        for (seed, play_type) in PlayType::ALL.iter().cycle().take(200).enumerate() {
            let (offense_call, defense_call) = calls(*play_type);
            let ctx = PlayCallContext::first_and_ten_at(95);
            let rngs = RngBundle::from_user_seed(seed as u64);
            let result = resolver
                .resolve(&offense, &defense, &offense_call, &defense_call, &ctx, &rngs)
                .result;
            assert!(result.touchdown || result.safety || (1..=99).contains(&result.new_field_position));
            assert!(result.yards <= 5, "{result:?}");
            assert!((1..=4).contains(&result.new_down));
        }
    }

    #[test]
    fn declined_flag_keeps_the_play() {
        let ctx = PlayCallContext::first_and_ten_at(40);
        let flag = Penalty::flagged(PenaltyKind::DefensiveHolding, 5, None);
        let (field, penalty) = settle(&ctx, PlayType::DeepPass, PlayOutcome::BigGain, 25, Some(flag));
        assert_eq!(field.new_field_position, 65);
        assert!(penalty.is_some_and(|penalty| !penalty.accepted));

        let (field, penalty) = settle(&ctx, PlayType::DeepPass, PlayOutcome::Incomplete, 0, Some(flag));
        assert_eq!(field.new_field_position, 45);
        assert!(field.first_down);
        assert!(penalty.is_some_and(|penalty| penalty.accepted));
    }

    #[test]
    fn failed_fourth_down_settles_penalties_like_a_turnover() {
        let ctx = PlayCallContext {
            down: 4,
            distance: 3,
            field_position: 40,
            ..PlayCallContext::default()
        };
        let (field, _) = settle(&ctx, PlayType::RunInside, PlayOutcome::ShortGain, 1, None);
        assert!(field.turnover_on_downs);
        assert!(field.changes_possession());

        let holding = Penalty::flagged(PenaltyKind::OffensiveHolding, 10, None);
        let (field, penalty) = settle(&ctx, PlayType::RunInside, PlayOutcome::ShortGain, 1, Some(holding));
        assert!(penalty.is_some_and(|penalty| !penalty.accepted));
        assert!(field.turnover_on_downs);
        assert_eq!(field.new_field_position, 59);

        let grab = Penalty::flagged(PenaltyKind::DefensiveHolding, 5, None);
        let (field, penalty) = settle(&ctx, PlayType::RunInside, PlayOutcome::ShortGain, 1, Some(grab));
        assert!(penalty.is_some_and(|penalty| penalty.accepted));
        assert!(!field.turnover_on_downs);
        assert!(field.first_down);
    }

    #[test]
    fn unit_plan_follows_play_category() {
        let config = EngineConfig::default();
        let resolver = PlayResolver::new(&config);
        let offense = stock_team("Home", 1_000, 60.0);
        let defense = stock_team("Away", 2_000, 60.0);
        let (offense_call, defense_call) = calls(PlayType::ShortPass);
        let ctx = PlayCallContext::default();
        let snap = resolver.snap(&offense, &defense, &offense_call, &defense_call, &ctx);
        let units = resolver.rate_units(&snap, PlayType::ShortPass, None);
        assert!(units.get(UnitKind::PassProtection).is_some());
        assert!(units.get(UnitKind::RunStopping).is_none());
        assert!((1.0..=100.0).contains(&units.offense_mean()));
    }
}
