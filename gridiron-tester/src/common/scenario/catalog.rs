use anyhow::{Context, Result, ensure};
use gridiron_game::play::OutcomeBucket;
use gridiron_game::{
    InjurySeverity, OutcomeTables, PlayCallContext, PlayOutcome, PlayType, PlayerId, Position, RngBundle,
    TableModifiers, TeamGameState, base_table, weeks_out_range,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::TestScenario;
use crate::logic::{GameTester, Matchup, SimulationPlan, SimulationSummary};

const DISTRIBUTION_DRAWS: u32 = 5_000;
const DISTRIBUTION_TOLERANCE: f64 = 0.03;
const EVEN_RATING: f64 = 60.0;
const STRONG_RATING: f64 = 80.0;
const WEAK_RATING: f64 = 45.0;
/// Below this many running back carries the split is too noisy to judge.
const ROTATION_MIN_CARRIES: u32 = 15;
const ROTATION_MAX_STARTER_SHARE: f64 = 0.92;
const ROTATION_MIN_STARTER_SHARE: f64 = 0.35;

#[must_use]
pub fn determinism_scenario() -> TestScenario {
    TestScenario::simulation(
        "Deterministic Replay",
        SimulationPlan::new(Matchup::even()).with_expectation(determinism_expectation),
    )
}

#[must_use]
pub fn outcome_distribution_scenario() -> TestScenario {
    TestScenario::simulation(
        "Outcome Distribution",
        SimulationPlan::new(Matchup::even())
            .with_max_snaps(0)
            .with_expectation(outcome_distribution_expectation),
    )
}

#[must_use]
pub fn injury_bounds_scenario() -> TestScenario {
    TestScenario::simulation(
        "Injury Bounds",
        SimulationPlan::new(Matchup::winter()).with_expectation(injury_bounds_expectation),
    )
}

#[must_use]
pub fn rb_rotation_scenario() -> TestScenario {
    TestScenario::simulation(
        "Running Back Rotation",
        SimulationPlan::new(Matchup::even()).with_expectation(rb_rotation_expectation),
    )
}

fn replay(summary: &SimulationSummary, seed: u64) -> SimulationSummary {
    let tester = GameTester::from_shared(Arc::clone(&summary.config), false);
    let plan = SimulationPlan::new(summary.matchup);
    let plan = match summary.plan_snaps {
        Some(limit) => plan.with_max_snaps(limit),
        None => plan,
    };
    tester.run_plan(&plan, seed)
}

fn determinism_expectation(summary: &SimulationSummary) -> Result<()> {
    let again = replay(summary, summary.seed);
    let original = serde_json::to_vec(&summary.game).context("serialize original game")?;
    let replayed = serde_json::to_vec(&again.game).context("serialize replayed game")?;
    ensure!(
        original == replayed,
        "seed {} replayed into a different game ({} vs {} snaps)",
        summary.seed,
        summary.game.snaps.len(),
        again.game.snaps.len()
    );
    ensure!(
        again.home == summary.home && again.away == summary.away,
        "seed {} left different team state behind",
        summary.seed
    );

    let neighbor = replay(summary, summary.seed.wrapping_add(1));
    ensure!(
        neighbor.game != summary.game,
        "seeds {} and {} played the same game",
        summary.seed,
        summary.seed.wrapping_add(1)
    );
    Ok(())
}

fn outcome_distribution_expectation(summary: &SimulationSummary) -> Result<()> {
    let tables = OutcomeTables::new(&summary.config.outcome);
    let ctx = PlayCallContext::first_and_ten_at(50);
    let rngs = RngBundle::from_user_seed(summary.seed);
    let mut rng = rngs.outcome();

    for play_type in PlayType::ALL {
        let table = tables.generate(EVEN_RATING, EVEN_RATING, play_type, &ctx, &TableModifiers::neutral(), &mut *rng);
        let mut counts: BTreeMap<PlayOutcome, u32> = BTreeMap::new();
        for _ in 0..DISTRIBUTION_DRAWS {
            let (outcome, _) = tables.roll_outcome(&table, &mut *rng);
            *counts.entry(outcome).or_default() += 1;
        }
        for &(outcome, expected) in base_table(play_type) {
            let observed = f64::from(counts.get(&outcome).copied().unwrap_or(0)) / f64::from(DISTRIBUTION_DRAWS);
            ensure!(
                (observed - expected).abs() <= DISTRIBUTION_TOLERANCE,
                "{} {}: observed {observed:.4}, expected {expected:.4}",
                play_type.label(),
                outcome.label()
            );
        }

        let even_positive = table.bucket_probability(OutcomeBucket::Positive);
        let strong = tables.generate(STRONG_RATING, WEAK_RATING, play_type, &ctx, &TableModifiers::neutral(), &mut *rng);
        let weak = tables.generate(WEAK_RATING, STRONG_RATING, play_type, &ctx, &TableModifiers::neutral(), &mut *rng);
        ensure!(
            strong.bucket_probability(OutcomeBucket::Positive) > even_positive
                && weak.bucket_probability(OutcomeBucket::Positive) < even_positive,
            "{}: advantage did not move the positive bucket",
            play_type.label()
        );
        ensure!(
            weak.bucket_probability(OutcomeBucket::Negative) > strong.bucket_probability(OutcomeBucket::Negative),
            "{}: disadvantage did not move the negative bucket",
            play_type.label()
        );
    }
    Ok(())
}

fn injury_bounds_expectation(summary: &SimulationSummary) -> Result<()> {
    let mut sidelined: BTreeSet<PlayerId> = BTreeSet::new();

    for snap in &summary.game.snaps {
        let Some(result) = snap.scrimmage() else {
            continue;
        };
        let base = &result.base;
        let players = &base.players;
        for id in [players.passer, players.ball_carrier, players.target, players.tackler, players.defender]
            .into_iter()
            .flatten()
        {
            ensure!(!sidelined.contains(&id), "snap {}: sidelined player {id} took part", snap.number);
        }

        ensure!(
            base.injury == !base.injuries.is_empty(),
            "snap {}: injury flag disagrees with the injury list",
            snap.number
        );
        for injury in &base.injuries {
            let range = weeks_out_range(injury.injury_type, injury.severity);
            ensure!(
                range.contains(injury.weeks_out),
                "snap {}: {:?}/{:?} out {} weeks, allowed {}..={}",
                snap.number,
                injury.injury_type,
                injury.severity,
                injury.weeks_out,
                range.min,
                range.max
            );
            ensure!(
                injury.severity >= InjurySeverity::Severe || injury.permanent_effects.is_empty(),
                "snap {}: {:?} injury left permanent effects",
                snap.number,
                injury.severity
            );
            let team = summary
                .team_for_player(injury.player)
                .with_context(|| format!("snap {}: injured player {} is on neither roster", snap.number, injury.player))?;
            let status = team.player(injury.player).and_then(|player| player.injury.as_ref());
            ensure!(status.is_some(), "{}: player {} has no injury status", team.name, injury.player);
            if injury.severity >= InjurySeverity::Major && injury.weeks_out > 0 {
                sidelined.insert(injury.player);
            }
        }
    }
    Ok(())
}

fn rb_rotation_expectation(summary: &SimulationSummary) -> Result<()> {
    for team in [&summary.home, &summary.away] {
        check_rotation(team)?;
    }
    Ok(())
}

fn check_rotation(team: &TeamGameState) -> Result<()> {
    let backs = team.depth_at(Position::Rb);
    let Some((&starter, backups)) = backs.split_first() else {
        anyhow::bail!("{} has no running backs", team.name);
    };
    if team.player(starter).is_some_and(|player| !player.is_available()) {
        log::debug!("{}: feature back {starter} was sidelined, rotation not judged", team.name);
        return Ok(());
    }
    let usage = team.usage();
    let starter_carries = usage.carries(starter);
    let backup_carries: u32 = backups.iter().map(|id| usage.carries(*id)).sum();
    let total = starter_carries + backup_carries;
    if total < ROTATION_MIN_CARRIES {
        log::debug!("{}: only {total} running back carries, rotation not judged", team.name);
        return Ok(());
    }

    let share = f64::from(starter_carries) / f64::from(total);
    ensure!(
        (ROTATION_MIN_STARTER_SHARE..=ROTATION_MAX_STARTER_SHARE).contains(&share),
        "{}: feature back took {starter_carries}/{total} carries ({share:.2})",
        team.name
    );
    ensure!(backup_carries > 0, "{}: backups never touched the ball in {total} carries", team.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_for(scenario: &TestScenario, seed: u64) -> SimulationSummary {
        GameTester::new(false).run_plan(&scenario.plan, seed)
    }

    #[test]
    fn outcome_distribution_holds() {
        let scenario = outcome_distribution_scenario();
        outcome_distribution_expectation(&summary_for(&scenario, 21)).expect("distribution holds");
    }

    #[test]
    fn determinism_holds_for_a_full_game() {
        let scenario = determinism_scenario();
        determinism_expectation(&summary_for(&scenario, 404)).expect("replay matches");
    }

    #[test]
    fn injury_bounds_hold_over_several_games() {
        let scenario = injury_bounds_scenario();
        for seed in [3, 33, 333] {
            injury_bounds_expectation(&summary_for(&scenario, seed)).expect("injuries in bounds");
        }
    }

    #[test]
    fn rotation_holds_for_a_full_game() {
        let scenario = rb_rotation_scenario();
        rb_rotation_expectation(&summary_for(&scenario, 8)).expect("carries rotate");
    }

    #[test]
    fn rotation_flags_a_starter_who_never_sits() {
        let mut team = gridiron_game::stock_team("Bellcow", 100, 60.0);
        let starter = team.depth_at(Position::Rb)[0];
        let mut opponent = gridiron_game::stock_team("Scout", 900, 60.0);
        let fatigue = gridiron_game::FatigueSystem::new(&gridiron_game::EngineConfig::default().fatigue);
        let effects = gridiron_game::PlaySideEffects {
            offense: gridiron_game::resolver::SideEffects {
                on_field: vec![gridiron_game::resolver::UsageDelta {
                    carry: true,
                    touch: true,
                    ..gridiron_game::resolver::UsageDelta::snap(starter, 0.0)
                }],
                injuries: Vec::new(),
            },
            defense: gridiron_game::resolver::SideEffects::default(),
        };
        for _ in 0..20 {
            gridiron_game::apply_side_effects(&mut team, &mut opponent, &effects, &fatigue);
        }
        let err = check_rotation(&team).unwrap_err().to_string();
        assert!(err.contains("20/20"));
    }
}
