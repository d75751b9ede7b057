use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::common::scenario::full_game::{full_game_expectation, full_game_plan};
use crate::logic::game_tester::{GameTester, Matchup, PlayabilityMetrics};
use crate::logic::seeds::SeedInfo;

#[derive(Debug, Clone, Serialize)]
pub struct PlayabilityRecord {
    pub scenario_name: String,
    pub seed_label: String,
    pub seed_value: u64,
    pub metrics: PlayabilityMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayabilityAggregate {
    pub scenario_name: String,
    pub iterations: usize,
    pub mean_snaps: f64,
    pub mean_yards_per_play: f64,
    pub std_yards_per_play: f64,
    pub mean_completion_pct: f64,
    pub mean_sack_rate: f64,
    pub mean_turnover_rate: f64,
    pub mean_injuries: f64,
    pub mean_penalties: f64,
    pub mean_points_per_team: f64,
    pub std_points_per_team: f64,
    pub field_goal_pct: f64,
    pub shutout_pct: f64,
}

/// Acceptable band for one aggregate metric.
#[derive(Debug, Clone)]
pub struct TargetBand {
    pub metric: &'static str,
    pub range: RangeInclusive<f64>,
    pub value: fn(&PlayabilityAggregate) -> f64,
}

pub const PLAYABILITY_SCENARIOS: &[(&str, Matchup)] = &[
    ("Even Matchup", Matchup::even()),
    ("Home Favorite", Matchup::home_favorite()),
    ("Winter Game", Matchup::winter()),
];

#[must_use]
pub fn target_bands() -> Vec<TargetBand> {
    vec![
        TargetBand {
            metric: "yards per play",
            range: 2.5..=9.0,
            value: |a| a.mean_yards_per_play,
        },
        TargetBand {
            metric: "completion %",
            range: 0.40..=0.85,
            value: |a| a.mean_completion_pct,
        },
        TargetBand {
            metric: "sack rate",
            range: 0.01..=0.20,
            value: |a| a.mean_sack_rate,
        },
        TargetBand {
            metric: "turnover rate",
            range: 0.0..=0.08,
            value: |a| a.mean_turnover_rate,
        },
        TargetBand {
            metric: "injuries per game",
            range: 0.0..=20.0,
            value: |a| a.mean_injuries,
        },
        TargetBand {
            metric: "penalties per game",
            range: 1.0..=30.0,
            value: |a| a.mean_penalties,
        },
        TargetBand {
            metric: "points per team",
            range: 3.0..=60.0,
            value: |a| a.mean_points_per_team,
        },
    ]
}

/// Play every playability matchup for each seed and iteration.
///
/// # Errors
///
/// Fails when a game breaks the full-game expectations.
pub fn run_playability_analysis(
    tester: &GameTester,
    seeds: &[SeedInfo],
    iterations: usize,
) -> Result<Vec<PlayabilityRecord>> {
    let iterations = iterations.max(1);
    let mut records = Vec::with_capacity(seeds.len() * PLAYABILITY_SCENARIOS.len() * iterations);

    for &(scenario_name, matchup) in PLAYABILITY_SCENARIOS {
        let plan = full_game_plan(matchup).with_expectation(full_game_expectation);
        for seed in seeds {
            for iteration in 0..iterations {
                let iteration_seed = seed.seed.wrapping_add(u64::try_from(iteration).unwrap_or(0));
                let summary = tester.run_plan(&plan, iteration_seed);
                for expectation in &plan.expectations {
                    expectation.evaluate(&summary).with_context(|| {
                        format!(
                            "playability expectation failed for {scenario_name}, seed {} (iteration {})",
                            seed.label,
                            iteration + 1
                        )
                    })?;
                }
                records.push(PlayabilityRecord {
                    scenario_name: scenario_name.to_string(),
                    seed_label: seed.label.clone(),
                    seed_value: iteration_seed,
                    metrics: summary.metrics,
                });
            }
        }
    }

    Ok(records)
}

#[must_use]
pub fn aggregate_playability(records: &[PlayabilityRecord]) -> Vec<PlayabilityAggregate> {
    let mut aggregates: BTreeMap<&str, AggregateBuilder> = BTreeMap::new();
    for record in records {
        aggregates
            .entry(record.scenario_name.as_str())
            .or_insert_with(|| AggregateBuilder::new(&record.scenario_name))
            .ingest(&record.metrics);
    }
    aggregates.into_values().map(AggregateBuilder::finish).collect()
}

/// Check every aggregate against [`target_bands`].
///
/// # Errors
///
/// Lists every metric that fell outside its band.
pub fn validate_playability_targets(aggregates: &[PlayabilityAggregate]) -> Result<()> {
    ensure!(!aggregates.is_empty(), "no playability aggregates to validate");
    let bands = target_bands();
    let misses: Vec<String> = aggregates
        .iter()
        .flat_map(|aggregate| {
            bands.iter().filter_map(move |band| {
                let value = (band.value)(aggregate);
                (!band.range.contains(&value)).then(|| {
                    format!(
                        "{}: {} {value:.3} outside {:.3}..={:.3}",
                        aggregate.scenario_name,
                        band.metric,
                        band.range.start(),
                        band.range.end()
                    )
                })
            })
        })
        .collect();
    for miss in &misses {
        log::warn!("{miss}");
    }
    ensure!(misses.is_empty(), "playability targets missed:\n  {}", misses.join("\n  "));
    Ok(())
}

#[derive(Debug, Clone)]
struct AggregateBuilder {
    scenario_name: String,
    iterations: u32,
    snaps: RunningStats,
    yards_per_play: RunningStats,
    completion: RunningStats,
    sack_rate: RunningStats,
    turnover_rate: RunningStats,
    injuries: RunningStats,
    penalties: RunningStats,
    points: RunningStats,
    field_goals_attempted: u32,
    field_goals_made: u32,
    shutouts: u32,
}

impl AggregateBuilder {
    fn new(scenario_name: &str) -> Self {
        Self {
            scenario_name: scenario_name.to_string(),
            iterations: 0,
            snaps: RunningStats::default(),
            yards_per_play: RunningStats::default(),
            completion: RunningStats::default(),
            sack_rate: RunningStats::default(),
            turnover_rate: RunningStats::default(),
            injuries: RunningStats::default(),
            penalties: RunningStats::default(),
            points: RunningStats::default(),
            field_goals_attempted: 0,
            field_goals_made: 0,
            shutouts: 0,
        }
    }

    fn ingest(&mut self, metrics: &PlayabilityMetrics) {
        self.iterations += 1;
        self.snaps.add(f64::from(metrics.snaps));
        self.yards_per_play.add(metrics.yards_per_play());
        self.completion.add(metrics.completion_rate());
        self.sack_rate.add(metrics.sack_rate());
        self.turnover_rate.add(metrics.turnover_rate());
        self.injuries.add(f64::from(metrics.injuries));
        self.penalties.add(f64::from(metrics.penalties));
        self.points.add(metrics.points_per_team());
        self.field_goals_attempted = self.field_goals_attempted.saturating_add(metrics.field_goals_attempted);
        self.field_goals_made = self.field_goals_made.saturating_add(metrics.field_goals_made);
        if metrics.home_points == 0 || metrics.away_points == 0 {
            self.shutouts += 1;
        }
    }

    fn finish(self) -> PlayabilityAggregate {
        let denom = f64::from(self.iterations.max(1));
        PlayabilityAggregate {
            scenario_name: self.scenario_name,
            iterations: usize::try_from(self.iterations).unwrap_or(usize::MAX),
            mean_snaps: self.snaps.mean(),
            mean_yards_per_play: self.yards_per_play.mean(),
            std_yards_per_play: self.yards_per_play.std_dev(),
            mean_completion_pct: self.completion.mean(),
            mean_sack_rate: self.sack_rate.mean(),
            mean_turnover_rate: self.turnover_rate.mean(),
            mean_injuries: self.injuries.mean(),
            mean_penalties: self.penalties.mean(),
            mean_points_per_team: self.points.mean(),
            std_points_per_team: self.points.std_dev(),
            field_goal_pct: if self.field_goals_attempted == 0 {
                0.0
            } else {
                f64::from(self.field_goals_made) / f64::from(self.field_goals_attempted)
            },
            shutout_pct: f64::from(self.shutouts) / denom,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn variance(&self) -> f64 {
        if self.count > 1 { self.m2 / f64::from(self.count - 1) } else { 0.0 }
    }

    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
