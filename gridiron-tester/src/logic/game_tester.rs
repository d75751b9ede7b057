use std::convert::TryFrom;
use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use gridiron_game::{
    EngineConfig, GameSession, GameStakes, GameSummary, PlayOutcome, Precipitation, SessionSnap, SnapKind,
    TeamGameState, WeatherCondition, stock_team,
};
use serde::{Deserialize, Serialize};

const HOME_ID_BASE: u32 = 1_000;
const AWAY_ID_BASE: u32 = 2_000;
const EVEN_RATING: f64 = 60.0;
const FAVORITE_RATING: f64 = 72.0;
const UNDERDOG_RATING: f64 = 52.0;

/// Two stock rosters plus the conditions they meet in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub home_rating: f64,
    pub away_rating: f64,
    pub weather: WeatherCondition,
    pub stakes: GameStakes,
}

impl Matchup {
    #[must_use]
    pub const fn even() -> Self {
        Self {
            home_rating: EVEN_RATING,
            away_rating: EVEN_RATING,
            weather: WeatherCondition::fair(),
            stakes: GameStakes::Regular,
        }
    }

    #[must_use]
    pub const fn home_favorite() -> Self {
        Self {
            home_rating: FAVORITE_RATING,
            away_rating: UNDERDOG_RATING,
            ..Self::even()
        }
    }

    #[must_use]
    pub const fn winter() -> Self {
        Self {
            weather: WeatherCondition {
                temperature_f: 22.0,
                wind_mph: 18.0,
                precipitation: Precipitation::Snow,
                is_dome: false,
            },
            stakes: GameStakes::PlayoffRace,
            ..Self::even()
        }
    }

    #[must_use]
    pub fn teams(&self) -> (TeamGameState, TeamGameState) {
        (
            stock_team("Home", HOME_ID_BASE, self.home_rating),
            stock_team("Away", AWAY_ID_BASE, self.away_rating),
        )
    }
}

impl Default for Matchup {
    fn default() -> Self {
        Self::even()
    }
}

#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub matchup: Matchup,
    /// `None` plays the full four quarters.
    pub max_snaps: Option<u32>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(matchup: Matchup) -> Self {
        Self {
            matchup,
            max_snaps: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_snaps(mut self, max_snaps: u32) -> Self {
        self.max_snaps = Some(max_snaps);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn = Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the hook against a finished simulation.
    ///
    /// # Errors
    ///
    /// Returns the hook's error when the expectation does not hold.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

/// Everything a scenario may assert on after one simulated game.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub matchup: Matchup,
    /// Snap limit of the plan that produced this summary.
    pub plan_snaps: Option<u32>,
    pub config: Arc<EngineConfig>,
    pub game: GameSummary,
    pub home: TeamGameState,
    pub away: TeamGameState,
    pub finished: bool,
    pub metrics: PlayabilityMetrics,
}

impl SimulationSummary {
    #[must_use]
    pub fn team_for_player(&self, id: gridiron_game::PlayerId) -> Option<&TeamGameState> {
        [&self.home, &self.away].into_iter().find(|team| team.players.contains_key(&id))
    }
}

/// Drives seeded games for scenarios and playability sweeps.
#[derive(Debug, Clone)]
pub struct GameTester {
    config: Arc<EngineConfig>,
    verbose: bool,
}

impl GameTester {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            config: Arc::new(EngineConfig::default()),
            verbose,
        }
    }

    #[must_use]
    pub const fn from_shared(config: Arc<EngineConfig>, verbose: bool) -> Self {
        Self { config, verbose }
    }

    /// Tester over a custom engine configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configuration does not validate.
    pub fn with_config(config: EngineConfig, verbose: bool) -> Result<Self> {
        config.validate().context("engine configuration rejected")?;
        Ok(Self {
            config: Arc::new(config),
            verbose,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        let (home, away) = plan.matchup.teams();
        let mut session = GameSession::new(&self.config, home, away, seed)
            .with_conditions(plan.matchup.weather, plan.matchup.stakes);

        let game = match plan.max_snaps {
            None => session.play_to_completion(),
            Some(limit) => {
                let limit = usize::try_from(limit).unwrap_or(usize::MAX);
                let snaps: Vec<SessionSnap> = std::iter::from_fn(|| session.run_play()).take(limit).collect();
                GameSummary {
                    home: session.home().name.clone(),
                    away: session.away().name.clone(),
                    score: session.score(),
                    snaps,
                }
            }
        };
        let finished = session.is_finished();
        let (home, away) = session.into_teams();
        let metrics = PlayabilityMetrics::from_game(&game);

        if self.verbose {
            println!(
                "    {} seed {seed}: {} {} - {} {} in {} snaps",
                "🏈".bright_white(),
                game.away,
                game.score.away,
                game.home,
                game.score.home,
                metrics.snaps
            );
        }
        log::debug!("seed {seed}: {metrics:?}");

        SimulationSummary {
            seed,
            matchup: plan.matchup,
            plan_snaps: plan.max_snaps,
            config: Arc::clone(&self.config),
            game,
            home,
            away,
            finished,
            metrics,
        }
    }
}

/// Box-score style counters for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayabilityMetrics {
    pub snaps: u32,
    pub scrimmage_plays: u32,
    pub total_yards: i32,
    pub dropbacks: u32,
    pub pass_attempts: u32,
    pub completions: u32,
    pub sacks: u32,
    pub turnovers: u32,
    pub injuries: u32,
    pub penalties: u32,
    pub touchdowns: u32,
    pub punts: u32,
    pub field_goals_attempted: u32,
    pub field_goals_made: u32,
    pub home_points: u16,
    pub away_points: u16,
}

impl PlayabilityMetrics {
    #[must_use]
    pub fn from_game(game: &GameSummary) -> Self {
        let mut metrics = Self {
            home_points: game.score.home,
            away_points: game.score.away,
            ..Self::default()
        };
        for snap in &game.snaps {
            metrics.record_snap(snap);
        }
        metrics
    }

    pub fn record_snap(&mut self, snap: &SessionSnap) {
        self.snaps += 1;
        match &snap.kind {
            SnapKind::Punt { .. } => self.punts += 1,
            SnapKind::FieldGoal { made, .. } => {
                self.field_goals_attempted += 1;
                if *made {
                    self.field_goals_made += 1;
                }
            }
            SnapKind::Scrimmage(result) => {
                let base = &result.base;
                if base.penalty_enforced() {
                    self.penalties += 1;
                }
                if base.no_play {
                    return;
                }
                self.scrimmage_plays += 1;
                self.total_yards += base.yards;
                self.injuries += u32::try_from(base.injuries.len()).unwrap_or(u32::MAX);
                if base.turnover {
                    self.turnovers += 1;
                }
                if base.touchdown {
                    self.touchdowns += 1;
                }
                if base.play_type.is_pass() {
                    self.dropbacks += 1;
                    match base.outcome {
                        PlayOutcome::Sack => self.sacks += 1,
                        PlayOutcome::Scramble => {}
                        PlayOutcome::Incomplete | PlayOutcome::Interception => self.pass_attempts += 1,
                        _ => {
                            self.pass_attempts += 1;
                            self.completions += 1;
                        }
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn yards_per_play(&self) -> f64 {
        if self.scrimmage_plays == 0 {
            0.0
        } else {
            f64::from(self.total_yards) / f64::from(self.scrimmage_plays)
        }
    }

    #[must_use]
    pub fn completion_rate(&self) -> f64 {
        ratio(self.completions, self.pass_attempts)
    }

    /// Sacks per dropback.
    #[must_use]
    pub fn sack_rate(&self) -> f64 {
        ratio(self.sacks, self.dropbacks)
    }

    /// Turnovers per scrimmage play.
    #[must_use]
    pub fn turnover_rate(&self) -> f64 {
        ratio(self.turnovers, self.scrimmage_plays)
    }

    #[must_use]
    pub fn points_per_team(&self) -> f64 {
        (f64::from(self.home_points) + f64::from(self.away_points)) / 2.0
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_plan_finishes_and_counts_every_snap() {
        let tester = GameTester::new(false);
        let summary = tester.run_plan(&SimulationPlan::new(Matchup::even()), 11);
        assert!(summary.finished);
        assert_eq!(summary.metrics.snaps as usize, summary.game.snaps.len());
        assert!(summary.metrics.scrimmage_plays > 0);
        assert!(summary.metrics.pass_attempts <= summary.metrics.dropbacks);
        assert!(summary.metrics.completions <= summary.metrics.pass_attempts);
        assert_eq!(summary.metrics.home_points, summary.game.score.home);
    }

    #[test]
    fn snap_limit_stops_early() {
        let tester = GameTester::new(false);
        let summary = tester.run_plan(&SimulationPlan::new(Matchup::even()).with_max_snaps(12), 3);
        assert!(!summary.finished);
        assert_eq!(summary.game.snaps.len(), 12);
    }

    #[test]
    fn zero_snap_plan_leaves_the_game_untouched() {
        let tester = GameTester::new(false);
        let summary = tester.run_plan(&SimulationPlan::new(Matchup::winter()).with_max_snaps(0), 3);
        assert!(summary.game.snaps.is_empty());
        assert_eq!(summary.metrics, PlayabilityMetrics::default());
    }

    #[test]
    fn rates_are_zero_without_samples() {
        let metrics = PlayabilityMetrics::default();
        assert!(metrics.yards_per_play().abs() < f64::EPSILON);
        assert!(metrics.completion_rate().abs() < f64::EPSILON);
        assert!(metrics.sack_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn team_lookup_follows_id_ranges() {
        let tester = GameTester::new(false);
        let summary = tester.run_plan(&SimulationPlan::new(Matchup::even()).with_max_snaps(0), 1);
        let home_qb = summary.home.depth_at(gridiron_game::Position::Qb)[0];
        let away_qb = summary.away.depth_at(gridiron_game::Position::Qb)[0];
        assert_eq!(summary.team_for_player(home_qb).map(|t| t.name.as_str()), Some("Home"));
        assert_eq!(summary.team_for_player(away_qb).map(|t| t.name.as_str()), Some("Away"));
    }
}
