pub mod game_tester;
pub mod playability;
pub mod reports;
pub mod seeds;
pub mod tester;

pub use game_tester::{GameTester, Matchup, PlayabilityMetrics, SimulationPlan, SimulationSummary};
pub use playability::{
    PlayabilityAggregate, PlayabilityRecord, aggregate_playability, run_playability_analysis,
    validate_playability_targets,
};
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use tester::*;
