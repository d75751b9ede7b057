//! One game driven snap by snap.
//!
//! [`GameSession`] owns both teams, the seeded streams and the game state
//! (possession, series, clock, score). Each call to [`GameSession::run_play`]
//! lets both coordinators call the snap, resolves it through the
//! [`EnhancedPlayResolver`] and applies its side effects. Fourth downs may
//! become punts or field goals. Kickoffs are not simulated; every drive that
//! follows a score or the half starts at the receiving team's 25.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constants::{
    DRIVE_START_SPOT, FIELD_GOAL_CHIP_SHOT, FIELD_GOAL_CHIP_SHOT_CHANCE, FIELD_GOAL_HOLD_YARDS,
    FIELD_GOAL_MAX_DISTANCE, FIELD_GOAL_MAX_DISTANCE_CHANCE, FIELD_GOAL_POINTS, GOAL_LINE, HURRY_UP_SECONDS,
    KICK_ACCURACY_SCALE, LAST_FIELD_SPOT, MAX_SNAPS_PER_GAME, PUNT_NET_YARDS, QUARTER_SECONDS, QUARTERS,
    RUNNING_CLOCK_SECONDS, SAFETY_POINTS, SPECIAL_TEAMS_SECONDS, STOPPED_CLOCK_SECONDS, TOUCHBACK_SPOT,
    TOUCHDOWN_POINTS,
};
use crate::context::{GameStakes, PlayCallContext, WeatherCondition};
use crate::matchup::RunGameTracker;
use crate::numbers::{NEUTRAL_RATING, clamp_probability};
use crate::play::PlayOutcome;
use crate::play_caller::{FourthDownDecision, PlayCaller, field_goal_distance};
use crate::player::{Position, Skill};
use crate::resolver::{
    EnhancedPlayResolver, EnhancedPlayResult, PlayResult, apply_drive_recovery, apply_halftime_recovery,
};
use crate::rng::RngBundle;
use crate::team::{TeamGameState, TeamSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub home: u16,
    pub away: u16,
}

impl Scoreboard {
    #[must_use]
    pub const fn points(&self, side: TeamSide) -> u16 {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u16 {
        self.home.saturating_add(self.away)
    }

    /// Points for `side` minus points against.
    #[must_use]
    pub fn margin(&self, side: TeamSide) -> i16 {
        let diff = i32::from(self.points(side)) - i32::from(self.points(side.opponent()));
        i16::try_from(diff).unwrap_or(if diff > 0 { i16::MAX } else { i16::MIN })
    }

    fn add(&mut self, side: TeamSide, points: u16) {
        match side {
            TeamSide::Home => self.home = self.home.saturating_add(points),
            TeamSide::Away => self.away = self.away.saturating_add(points),
        }
    }
}

/// What happened on one snap of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapKind {
    Scrimmage(Box<EnhancedPlayResult>),
    Punt { net_yards: i32, touchback: bool },
    FieldGoal { distance: i32, made: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnap {
    /// 1-based snap count for the game.
    pub number: u32,
    pub offense: TeamSide,
    /// Situation before the snap.
    pub context: PlayCallContext,
    pub kind: SnapKind,
    /// Points scored on the snap by either side.
    pub points: u16,
    pub elapsed_seconds: u16,
}

impl SessionSnap {
    #[must_use]
    pub fn scrimmage(&self) -> Option<&EnhancedPlayResult> {
        match &self.kind {
            SnapKind::Scrimmage(result) => Some(result),
            _ => None,
        }
    }
}

/// Final score plus the full snap log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub home: String,
    pub away: String,
    pub score: Scoreboard,
    pub snaps: Vec<SessionSnap>,
}

impl GameSummary {
    /// Scrimmage plays with the side that had the ball.
    pub fn scrimmage_plays(&self) -> impl Iterator<Item = (TeamSide, &EnhancedPlayResult)> + '_ {
        self.snaps
            .iter()
            .filter_map(|snap| snap.scrimmage().map(|result| (snap.offense, result)))
    }
}

/// Make chance for a kick of `distance` yards, falling off linearly from a
/// chip shot to the longest attempt. Kicker accuracy shifts it slightly.
#[must_use]
pub fn field_goal_chance(distance: i32, kick_accuracy: f64) -> f64 {
    if distance > FIELD_GOAL_MAX_DISTANCE {
        return 0.0;
    }
    let span = f64::from(FIELD_GOAL_MAX_DISTANCE - FIELD_GOAL_CHIP_SHOT);
    let t = (f64::from(distance - FIELD_GOAL_CHIP_SHOT) / span).clamp(0.0, 1.0);
    let base = t.mul_add(FIELD_GOAL_MAX_DISTANCE_CHANCE - FIELD_GOAL_CHIP_SHOT_CHANCE, FIELD_GOAL_CHIP_SHOT_CHANCE);
    let accuracy = if kick_accuracy.is_finite() { kick_accuracy } else { NEUTRAL_RATING };
    clamp_probability((accuracy - NEUTRAL_RATING).mul_add(KICK_ACCURACY_SCALE, base))
}

fn to_spot(value: i32) -> u8 {
    u8::try_from(value.clamp(1, LAST_FIELD_SPOT)).unwrap_or(DRIVE_START_SPOT)
}

/// Seconds a scrimmage snap takes off the clock.
fn snap_seconds(ctx: &PlayCallContext, result: &PlayResult) -> u16 {
    if result.no_play {
        return 0;
    }
    let clock_stops = result.outcome == PlayOutcome::Incomplete
        || result.touchdown
        || result.safety
        || result.possession_changes()
        || result.penalty_enforced();
    if clock_stops {
        STOPPED_CLOCK_SECONDS
    } else if ctx.is_two_minute_drill() && ctx.score_differential <= 0 {
        HURRY_UP_SECONDS
    } else {
        RUNNING_CLOCK_SECONDS
    }
}

/// A single game between two teams, driven one snap at a time.
#[derive(Debug, Clone)]
pub struct GameSession<'c> {
    resolver: EnhancedPlayResolver<'c>,
    rngs: RngBundle,
    home: TeamGameState,
    away: TeamGameState,
    home_run_game: RunGameTracker,
    away_run_game: RunGameTracker,
    weather: WeatherCondition,
    stakes: GameStakes,
    possession: TeamSide,
    second_half_receiver: TeamSide,
    down: u8,
    distance: u8,
    field_position: u8,
    quarter: u8,
    seconds_remaining: u16,
    score: Scoreboard,
    snaps: u32,
    finished: bool,
}

impl<'c> GameSession<'c> {
    /// Fresh game at 0-0; a seeded coin toss decides the opening possession.
    #[must_use]
    pub fn new(config: &'c EngineConfig, home: TeamGameState, away: TeamGameState, seed: u64) -> Self {
        let rngs = RngBundle::from_user_seed(seed);
        let opening = if rngs.calls().gen_bool(0.5) { TeamSide::Home } else { TeamSide::Away };
        log::debug!("{} at {}: {} receive", away.name, home.name, opening.label());
        Self {
            resolver: EnhancedPlayResolver::new(config),
            rngs,
            home,
            away,
            home_run_game: RunGameTracker::default(),
            away_run_game: RunGameTracker::default(),
            weather: WeatherCondition::fair(),
            stakes: GameStakes::Regular,
            possession: opening,
            second_half_receiver: opening.opponent(),
            down: 1,
            distance: 10,
            field_position: DRIVE_START_SPOT,
            quarter: 1,
            seconds_remaining: QUARTER_SECONDS,
            score: Scoreboard::default(),
            snaps: 0,
            finished: false,
        }
    }

    #[must_use]
    pub fn with_conditions(mut self, weather: WeatherCondition, stakes: GameStakes) -> Self {
        self.weather = weather;
        self.stakes = stakes;
        self
    }

    #[must_use]
    pub const fn home(&self) -> &TeamGameState {
        &self.home
    }

    #[must_use]
    pub const fn away(&self) -> &TeamGameState {
        &self.away
    }

    #[must_use]
    pub const fn team(&self, side: TeamSide) -> &TeamGameState {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    #[must_use]
    pub const fn score(&self) -> Scoreboard {
        self.score
    }

    #[must_use]
    pub const fn possession(&self) -> TeamSide {
        self.possession
    }

    #[must_use]
    pub const fn quarter(&self) -> u8 {
        self.quarter
    }

    #[must_use]
    pub const fn seconds_remaining(&self) -> u16 {
        self.seconds_remaining
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Seeded streams, exposed for draw-count instrumentation.
    #[must_use]
    pub const fn rngs(&self) -> &RngBundle {
        &self.rngs
    }

    #[must_use]
    pub fn into_teams(self) -> (TeamGameState, TeamGameState) {
        (self.home, self.away)
    }

    /// Place the ball for the side in possession.
    pub fn spot_ball(&mut self, down: u8, distance: u8, field_position: u8) {
        self.down = down.clamp(1, 4);
        self.distance = distance.max(1);
        self.field_position = to_spot(i32::from(field_position));
    }

    /// Situation the next snap will be called against.
    #[must_use]
    pub fn context(&self) -> PlayCallContext {
        PlayCallContext {
            down: self.down,
            distance: self.distance,
            field_position: self.field_position,
            quarter: self.quarter,
            seconds_remaining: self.seconds_remaining,
            score_differential: self.score.margin(self.possession),
            weather: self.weather,
            stakes: self.stakes,
        }
    }

    /// Run the next snap. Returns `None` once the game is over.
    pub fn run_play(&mut self) -> Option<SessionSnap> {
        if self.finished {
            return None;
        }
        if self.snaps >= MAX_SNAPS_PER_GAME {
            log::warn!("{} at {}: snap limit reached, ending game", self.away.name, self.home.name);
            self.finished = true;
            return None;
        }

        let ctx = self.context();
        let offense = self.possession;
        let points_before = self.score.total();
        let (kind, elapsed_seconds) = if ctx.is_fourth_down() {
            match PlayCaller::fourth_down_decision(self.team(offense), &ctx) {
                FourthDownDecision::Punt => (self.punt(&ctx), SPECIAL_TEAMS_SECONDS),
                FourthDownDecision::FieldGoal => (self.field_goal(&ctx), SPECIAL_TEAMS_SECONDS),
                FourthDownDecision::Go => self.scrimmage(&ctx),
            }
        } else {
            self.scrimmage(&ctx)
        };
        self.snaps += 1;
        self.run_clock(elapsed_seconds);

        Some(SessionSnap {
            number: self.snaps,
            offense,
            context: ctx,
            kind,
            points: self.score.total().saturating_sub(points_before),
            elapsed_seconds,
        })
    }

    /// Run snaps until the fourth quarter expires.
    pub fn play_to_completion(&mut self) -> GameSummary {
        let mut snaps = Vec::new();
        while let Some(snap) = self.run_play() {
            snaps.push(snap);
        }
        log::debug!(
            "final: {} {} - {} {} in {} snaps",
            self.away.name,
            self.score.away,
            self.home.name,
            self.score.home,
            snaps.len()
        );
        GameSummary {
            home: self.home.name.clone(),
            away: self.away.name.clone(),
            score: self.score,
            snaps,
        }
    }

    fn scrimmage(&mut self, ctx: &PlayCallContext) -> (SnapKind, u16) {
        let offense_side = self.possession;
        let result = {
            let Self {
                resolver,
                rngs,
                home,
                away,
                home_run_game,
                away_run_game,
                ..
            } = self;
            let (offense, defense, run_game) = match offense_side {
                TeamSide::Home => (home, away, home_run_game),
                TeamSide::Away => (away, home, away_run_game),
            };
            let (offense_call, _) = PlayCaller::call_offense(offense, ctx, &mut *rngs.calls());
            let defense_call = PlayCaller::call_defense(defense, ctx, offense_call.personnel, &mut *rngs.calls());
            let result =
                resolver.resolve_and_apply(offense, defense, &offense_call, &defense_call, ctx, run_game, rngs);
            let base = &result.base;
            if base.play_type.is_run() && !base.no_play && !base.turnover {
                run_game.record(base.yards, i32::from(ctx.distance));
            }
            result
        };

        let base = &result.base;
        let elapsed = snap_seconds(ctx, base);
        if base.touchdown {
            self.score.add(offense_side, TOUCHDOWN_POINTS);
            self.change_possession(DRIVE_START_SPOT);
        } else if base.safety {
            self.score.add(offense_side.opponent(), SAFETY_POINTS);
            self.change_possession(DRIVE_START_SPOT);
        } else if base.possession_changes() {
            self.change_possession(base.new_field_position);
        } else {
            self.down = base.new_down;
            self.distance = base.new_distance;
            self.field_position = base.new_field_position;
        }
        (SnapKind::Scrimmage(Box::new(result)), elapsed)
    }

    fn punt(&mut self, ctx: &PlayCallContext) -> SnapKind {
        let start = i32::from(ctx.field_position);
        let landing = start + PUNT_NET_YARDS;
        let touchback = landing >= GOAL_LINE;
        let (spot, net_yards) = if touchback {
            let spot = i32::from(TOUCHBACK_SPOT);
            (spot, GOAL_LINE - spot - start)
        } else {
            (GOAL_LINE - landing, PUNT_NET_YARDS)
        };
        log::debug!("{} punts {net_yards} net", self.team(self.possession).name);
        self.change_possession(to_spot(spot));
        SnapKind::Punt { net_yards, touchback }
    }

    fn field_goal(&mut self, ctx: &PlayCallContext) -> SnapKind {
        let distance = field_goal_distance(ctx);
        let kicker = self.team(self.possession);
        let accuracy = kicker
            .depth_at(Position::K)
            .iter()
            .find_map(|id| kicker.player(*id))
            .map_or(NEUTRAL_RATING, |player| player.true_skill(Skill::KickAccuracy));
        let chance = field_goal_chance(distance, accuracy);
        let made = self.rngs.outcome().gen_bool(chance);
        log::debug!("{} {distance}-yard field goal {}", kicker.name, if made { "good" } else { "no good" });

        if made {
            self.score.add(self.possession, FIELD_GOAL_POINTS);
            self.change_possession(DRIVE_START_SPOT);
        } else {
            // Missed kicks come back to the spot of the kick, or the 20 if that is deeper.
            let kick_spot = i32::from(ctx.field_position) - FIELD_GOAL_HOLD_YARDS;
            let spot = (GOAL_LINE - kick_spot).max(i32::from(TOUCHBACK_SPOT));
            self.change_possession(to_spot(spot));
        }
        SnapKind::FieldGoal { distance, made }
    }

    /// Hand the ball to the other side, first and ten at `spot` on its side of the field.
    fn change_possession(&mut self, spot: u8) {
        self.possession = self.possession.opponent();
        self.start_series(spot);
        apply_drive_recovery(&mut self.home, self.resolver.fatigue());
        apply_drive_recovery(&mut self.away, self.resolver.fatigue());
    }

    fn start_series(&mut self, spot: u8) {
        let spot = to_spot(i32::from(spot));
        self.down = 1;
        self.distance = 10.min(100 - spot);
        self.field_position = spot;
    }

    fn run_clock(&mut self, elapsed: u16) {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(elapsed);
        if self.seconds_remaining > 0 {
            return;
        }
        if self.quarter >= QUARTERS {
            self.finished = true;
            return;
        }
        self.quarter += 1;
        self.seconds_remaining = QUARTER_SECONDS;
        if self.quarter == QUARTERS / 2 + 1 {
            log::debug!("halftime: {} {} - {} {}", self.away.name, self.score.away, self.home.name, self.score.home);
            apply_halftime_recovery(&mut self.home, self.resolver.fatigue());
            apply_halftime_recovery(&mut self.away, self.resolver.fatigue());
            self.possession = self.second_half_receiver;
            self.start_series(DRIVE_START_SPOT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::stock_team;

    fn session(config: &EngineConfig, seed: u64) -> GameSession<'_> {
        GameSession::new(config, stock_team("Home", 1_000, 60.0), stock_team("Away", 2_000, 60.0), seed)
    }

    #[test]
    fn full_game_runs_four_quarters() {
        let config = EngineConfig::default();
        let mut game = session(&config, 7);
        let summary = game.play_to_completion();
        assert!(game.is_finished());
        assert_eq!(game.quarter(), QUARTERS);
        assert!(summary.snaps.len() > 60, "only {} snaps", summary.snaps.len());
        let logged: u16 = summary.snaps.iter().map(|snap| snap.points).sum();
        assert_eq!(logged, summary.score.total());
        assert!(game.run_play().is_none());
    }

    #[test]
    fn same_seed_replays_the_same_game() {
        let config = EngineConfig::default();
        let first = session(&config, 42).play_to_completion();
        let second = session(&config, 42).play_to_completion();
        assert_eq!(first, second);
    }

    #[test]
    fn punt_flips_the_field() {
        let config = EngineConfig::default();
        let mut game = session(&config, 3);
        let kicking = game.possession();
        game.spot_ball(4, 15, 30);
        let snap = game.run_play().map(|snap| snap.kind);
        assert_eq!(
            snap,
            Some(SnapKind::Punt {
                net_yards: 40,
                touchback: false
            })
        );
        assert_eq!(game.possession(), kicking.opponent());
        assert_eq!(game.context().field_position, 30);
    }

    #[test]
    fn deep_punt_is_a_touchback() {
        let config = EngineConfig::default();
        let mut game = session(&config, 3);
        game.spot_ball(4, 20, 65);
        let ctx = game.context();
        assert_eq!(
            game.punt(&ctx),
            SnapKind::Punt {
                net_yards: 15,
                touchback: true
            }
        );
        assert_eq!(game.context().field_position, 20);
    }

    #[test]
    fn field_goal_scores_or_turns_over_at_the_kick_spot() {
        let config = EngineConfig::default();
        let mut game = session(&config, 11);
        let kicking = game.possession();
        game.spot_ball(4, 8, 80);
        let snap = game.run_play().map(|snap| snap.kind);
        let Some(SnapKind::FieldGoal { distance, made }) = snap else {
            panic!("expected a field goal, got {snap:?}");
        };
        assert_eq!(distance, 37);
        assert_eq!(game.possession(), kicking.opponent());
        if made {
            assert_eq!(game.score().points(kicking), 3);
            assert_eq!(game.context().field_position, 25);
        } else {
            assert_eq!(game.score().total(), 0);
            assert_eq!(game.context().field_position, 27);
        }
    }

    #[test]
    fn make_chance_falls_off_with_distance() {
        assert!((field_goal_chance(25, 50.0) - 0.95).abs() < 1e-9);
        assert!((field_goal_chance(62, 50.0) - 0.40).abs() < 1e-9);
        assert!(field_goal_chance(63, 99.0).abs() < f64::EPSILON);
        assert!(field_goal_chance(45, 50.0) < field_goal_chance(35, 50.0));
        assert!(field_goal_chance(45, 80.0) > field_goal_chance(45, 50.0));
    }

    #[test]
    fn halftime_hands_the_ball_to_the_other_receiver() {
        let config = EngineConfig::default();
        let mut game = session(&config, 5);
        let opening = game.possession();
        while game.quarter() < 3 {
            assert!(game.run_play().is_some());
        }
        assert_eq!(game.possession(), opening.opponent());
        assert_eq!(game.context().field_position, 25);
        assert_eq!(game.seconds_remaining(), QUARTER_SECONDS);
    }

    #[test]
    fn scoreboard_margin_is_signed() {
        let mut score = Scoreboard::default();
        score.add(TeamSide::Home, 7);
        score.add(TeamSide::Away, 3);
        assert_eq!(score.margin(TeamSide::Home), 4);
        assert_eq!(score.margin(TeamSide::Away), -4);
    }
}
