//! Deterministic stock rosters for tests, tools and quick simulations.
//!
//! Every player on a stock team is rated around one number: starters at the
//! team rating, backups a step below. Names and ids are derived from the
//! team name and id base, so two calls with the same arguments build the
//! same team.
use crate::coach::{Coach, CoachPersonality};
use crate::matchup::scheme::{DefensiveScheme, OffensiveScheme};
use crate::numbers::clamp_rating;
use crate::play_caller::CoordinatorTendencies;
use crate::player::{Player, PlayerId, PlayerRole, Position, PositionGroup, Skill};
use crate::team::TeamGameState;

/// Rating drop per step down the depth chart.
const DEPTH_STEP: f64 = 6.0;
/// Secondary skills sit this far below the primary ones.
const SECONDARY_GAP: f64 = 10.0;

/// Bodies carried at each position, starters first.
const ROSTER_SHAPE: [(Position, u8); 21] = [
    (Position::Qb, 2),
    (Position::Rb, 3),
    (Position::Fb, 1),
    (Position::Wr, 5),
    (Position::Te, 3),
    (Position::Lt, 2),
    (Position::Lg, 2),
    (Position::C, 2),
    (Position::Rg, 2),
    (Position::Rt, 2),
    (Position::De, 4),
    (Position::Dt, 3),
    (Position::Nt, 1),
    (Position::Olb, 3),
    (Position::Mlb, 2),
    (Position::Ilb, 2),
    (Position::Cb, 5),
    (Position::Fs, 2),
    (Position::Ss, 2),
    (Position::K, 1),
    (Position::P, 1),
];

const COACHED_GROUPS: [PositionGroup; 8] = [
    PositionGroup::Quarterback,
    PositionGroup::RunningBack,
    PositionGroup::Receiver,
    PositionGroup::TightEnd,
    PositionGroup::OffensiveLine,
    PositionGroup::DefensiveLine,
    PositionGroup::Linebacker,
    PositionGroup::Secondary,
];

fn primary_skills(group: PositionGroup) -> &'static [Skill] {
    use Skill::{
        Acceleration, Agility, Awareness, BallCarrierVision, BlockShedding, BreakTackle, Carrying, Catching,
        DecisionMaking, Elusiveness, HitPower, KickAccuracy, KickPower, ManCoverage, PassBlock, PassRush, PlayAction,
        PlayRecognition, Press, Pursuit, Release, RouteRunning, RunBlock, Speed, Strength, Tackling, ThrowAccuracyDeep,
        ThrowAccuracyMedium, ThrowAccuracyShort, ThrowPower, ZoneCoverage,
    };
    match group {
        PositionGroup::Quarterback => &[
            ThrowPower,
            ThrowAccuracyShort,
            ThrowAccuracyMedium,
            ThrowAccuracyDeep,
            PlayAction,
            DecisionMaking,
            Awareness,
        ],
        PositionGroup::RunningBack => &[
            Speed,
            Acceleration,
            Agility,
            Carrying,
            BallCarrierVision,
            Elusiveness,
            BreakTackle,
        ],
        PositionGroup::Receiver => &[Speed, Acceleration, Agility, Catching, RouteRunning, Release],
        PositionGroup::TightEnd => &[Catching, RouteRunning, RunBlock, PassBlock, Strength],
        PositionGroup::OffensiveLine => &[PassBlock, RunBlock, Strength, Awareness],
        PositionGroup::DefensiveLine => &[PassRush, BlockShedding, Strength, Tackling, Pursuit],
        PositionGroup::Linebacker => &[Tackling, Pursuit, PlayRecognition, BlockShedding, HitPower],
        PositionGroup::Secondary => &[ManCoverage, ZoneCoverage, Press, Speed, PlayRecognition],
        PositionGroup::Specialist => &[KickPower, KickAccuracy],
    }
}

fn secondary_skills(group: PositionGroup) -> &'static [Skill] {
    use Skill::{
        Awareness, Catching, DecisionMaking, Elusiveness, HitPower, ManCoverage, PassBlock, PassRush, RunBlock,
        Speed, Stamina, Tackling, ThrowOnRun, Toughness, ZoneCoverage,
    };
    match group {
        PositionGroup::Quarterback => &[ThrowOnRun, Speed, Elusiveness, Stamina, Toughness],
        PositionGroup::RunningBack => &[Catching, PassBlock, RunBlock, Stamina, Toughness],
        PositionGroup::Receiver | PositionGroup::TightEnd => &[Awareness, Stamina, Toughness],
        PositionGroup::OffensiveLine | PositionGroup::DefensiveLine => &[Speed, Stamina, Toughness],
        PositionGroup::Linebacker => &[ZoneCoverage, ManCoverage, PassRush, Speed, Stamina, Toughness],
        PositionGroup::Secondary => &[Catching, Tackling, HitPower, Awareness, Stamina, Toughness],
        PositionGroup::Specialist => &[DecisionMaking, Stamina],
    }
}

const fn stock_role(position: Position, depth: u8) -> PlayerRole {
    match position {
        Position::Qb => PlayerRole::PocketPasser,
        Position::Rb => match depth {
            0 => PlayerRole::FeatureBack,
            1 => PlayerRole::ReceivingBack,
            _ => PlayerRole::PowerBack,
        },
        Position::Fb => PlayerRole::PowerBack,
        Position::Wr => match depth % 3 {
            0 => PlayerRole::DeepThreat,
            1 => PlayerRole::Possession,
            _ => PlayerRole::Slot,
        },
        Position::Te => {
            if depth == 0 {
                PlayerRole::ReceivingTightEnd
            } else {
                PlayerRole::BlockingTightEnd
            }
        }
        Position::Lt | Position::Rt => PlayerRole::PassProtector,
        Position::Lg | Position::C | Position::Rg => PlayerRole::RoadGrader,
        Position::De | Position::Olb => PlayerRole::EdgeRusher,
        Position::Dt | Position::Nt => PlayerRole::RunStuffer,
        Position::Mlb | Position::Ilb => PlayerRole::Thumper,
        Position::Cb => {
            if depth % 2 == 0 {
                PlayerRole::Press
            } else {
                PlayerRole::Zone
            }
        }
        Position::Fs => PlayerRole::Centerfield,
        Position::Ss => PlayerRole::Box,
        Position::K | Position::P => PlayerRole::Specialist,
    }
}

/// One stock player at `rating`.
#[must_use]
pub fn stock_player(id: PlayerId, name: impl Into<String>, position: Position, depth: u8, rating: f64) -> Player {
    let group = position.group();
    let rating = clamp_rating(rating);
    let mut player = Player::new(id, name, position, stock_role(position, depth))
        .with_skills(primary_skills(group), rating)
        .with_skills(secondary_skills(group), clamp_rating(rating - SECONDARY_GAP));
    player.role_fit.effectiveness = rating;
    player.experience_years = 6_u8.saturating_sub(depth * 2);
    player.age = 24 + depth;
    player
}

/// Full stock team with the default pro-style and cover-3 schemes.
#[must_use]
pub fn stock_team(name: &str, id_base: u32, rating: f64) -> TeamGameState {
    stock_team_with(name, id_base, rating, OffensiveScheme::ProStyle, DefensiveScheme::Cover3Zone)
}

/// Full stock team running the given schemes.
#[must_use]
pub fn stock_team_with(
    name: &str,
    id_base: u32,
    rating: f64,
    offensive_scheme: OffensiveScheme,
    defensive_scheme: DefensiveScheme,
) -> TeamGameState {
    let mut team = TeamGameState::new(name, offensive_scheme, defensive_scheme);
    team.tendencies = CoordinatorTendencies::for_schemes(offensive_scheme, defensive_scheme);
    let mut next_id = id_base;
    for (position, count) in ROSTER_SHAPE {
        for depth in 0..count {
            let player_rating = f64::from(depth).mul_add(-DEPTH_STEP, rating);
            let player_name = format!("{name} {}{}", position.abbreviation(), depth + 1);
            team.add_player(stock_player(PlayerId(next_id), player_name, position, depth, player_rating));
            next_id += 1;
        }
    }
    for group in COACHED_GROUPS {
        let mut coach = Coach::new(format!("{name} {group:?} coach"), group, CoachPersonality::PlayersCoach);
        coach.preferred_offense = Some(offensive_scheme);
        coach.preferred_defense = Some(defensive_scheme);
        coach.tenure_years = 3;
        team.add_coach(coach);
    }
    team
}
