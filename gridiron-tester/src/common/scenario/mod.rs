pub mod catalog;
pub mod full_game;
pub mod smoke;

use crate::logic::SimulationPlan;

/// Named plan the logic tester runs once per seed and iteration.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Scenario keys in the order `all` expands to.
pub const SCENARIO_KEYS: [&str; 6] = [
    "smoke",
    "determinism",
    "full-game",
    "outcome-distribution",
    "injury-bounds",
    "rb-rotation",
];

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(smoke::smoke_scenario()),
        "determinism" | "deterministic" => Some(catalog::determinism_scenario()),
        "full-game" | "full" => Some(full_game::full_game_scenario()),
        "outcome-distribution" | "outcomes" => Some(catalog::outcome_distribution_scenario()),
        "injury-bounds" | "injuries" => Some(catalog::injury_bounds_scenario()),
        "rb-rotation" | "rotation" => Some(catalog::rb_rotation_scenario()),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test: opening snaps stay on the field and on the scoreboard"),
        ("determinism", "Deterministic Replay: same seed, same game"),
        ("full-game", "Full Game: four quarters with consistent scoring and clock"),
        ("outcome-distribution", "Outcome Distribution: even matchups reproduce the base tables"),
        ("injury-bounds", "Injury Bounds: durations in range, sidelined players stay off"),
        ("rb-rotation", "Running Back Rotation: workload spreads carries to backups"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_key_resolves() {
        let listed: Vec<&str> = list_scenarios().into_iter().map(|(key, _)| key).collect();
        assert_eq!(listed, SCENARIO_KEYS);
        for key in SCENARIO_KEYS {
            assert!(get_scenario(key).is_some(), "{key} missing");
        }
    }

    #[test]
    fn aliases_and_case_are_accepted() {
        assert_eq!(get_scenario("ROTATION").map(|s| s.name), get_scenario("rb-rotation").map(|s| s.name));
        assert!(get_scenario("kickoff-returns").is_none());
    }
}
