use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::game_tester::{GameTester, SimulationPlan, SimulationSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    tester: GameTester,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(tester: GameTester, verbose: bool) -> Self {
        Self { tester, verbose }
    }

    pub fn run_scenario(&self, scenario: &TestScenario, seeds: &[u64], iterations: usize) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!("🧪 Testing scenario: {} (seed: {seed})", scenario.name.bright_white());
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(&self, scenario: &TestScenario, seed: u64, iterations: usize) -> ScenarioResult {
        let (successes, failures, performance_data) = self.run_simulation_iterations(&scenario.plan, seed, iterations);

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>() / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> (usize, Vec<String>, Vec<Duration>) {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let summary = self.tester.run_plan(plan, iteration_seed);

            if let Some(err) = evaluate_expectations(plan, &summary) {
                failures.push(format!(
                    "Iteration {} (seed {}, snaps {}, quarter reached {}, score {}-{}): {err}",
                    i + 1,
                    summary.seed,
                    summary.game.snaps.len(),
                    last_quarter(&summary),
                    summary.game.score.away,
                    summary.game.score.home,
                ));
                if self.verbose {
                    println!("  ❌ Iteration {}/{iterations} failed: {}", i + 1, err.red());
                }
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);
                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{iterations} passed ({duration:?}) snaps:{} yards/play:{:.2}",
                        i + 1,
                        summary.metrics.snaps,
                        summary.metrics.yards_per_play()
                    );
                }
            }
        }

        (successes, failures, performance_data)
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    plan.expectations
        .iter()
        .find_map(|expectation| expectation.evaluate(summary).err())
        .map(|err| format!("{err:#}"))
}

fn last_quarter(summary: &SimulationSummary) -> u8 {
    summary.game.snaps.last().map_or(0, |snap| snap.context.quarter)
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
