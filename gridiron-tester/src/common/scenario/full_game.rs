use anyhow::{Result, ensure};
use gridiron_game::{SnapKind, TeamSide};
use std::ops::RangeInclusive;

use super::TestScenario;
use crate::logic::{Matchup, SimulationPlan, SimulationSummary};

const PLAUSIBLE_SNAPS: RangeInclusive<usize> = 60..=400;
const FINAL_QUARTER: u8 = 4;

#[must_use]
pub fn full_game_plan(matchup: Matchup) -> SimulationPlan {
    SimulationPlan::new(matchup)
}

#[must_use]
pub fn full_game_scenario() -> TestScenario {
    TestScenario::simulation(
        "Full Game",
        full_game_plan(Matchup::even()).with_expectation(full_game_expectation),
    )
}

/// Four quarters played with a clock that only moves forward and a
/// scoreboard built from legal scoring plays.
pub fn full_game_expectation(summary: &SimulationSummary) -> Result<()> {
    let snaps = &summary.game.snaps;
    ensure!(summary.finished, "game still running after {} snaps", snaps.len());
    ensure!(
        PLAUSIBLE_SNAPS.contains(&snaps.len()),
        "{} snaps is outside {PLAUSIBLE_SNAPS:?}",
        snaps.len()
    );
    let last_quarter = snaps.last().map_or(0, |snap| snap.context.quarter);
    ensure!(last_quarter == FINAL_QUARTER, "last snap came in quarter {last_quarter}");

    let mut home = 0_u16;
    let mut away = 0_u16;
    let mut previous = (1_u8, u16::MAX);
    for snap in snaps {
        let clock = (snap.context.quarter, snap.context.seconds_remaining);
        ensure!(
            clock.0 > previous.0 || (clock.0 == previous.0 && clock.1 <= previous.1),
            "snap {}: clock ran backwards to Q{} {}s",
            snap.number,
            clock.0,
            clock.1
        );
        previous = clock;

        let scorer = match (&snap.kind, snap.points) {
            (_, 0) => continue,
            (SnapKind::Scrimmage(result), 7) if result.base.touchdown => snap.offense,
            (SnapKind::Scrimmage(result), 2) if result.base.safety => snap.offense.opponent(),
            (SnapKind::FieldGoal { made: true, .. }, 3) => snap.offense,
            (kind, points) => anyhow::bail!("snap {}: {points} points from {kind:?}", snap.number),
        };
        match scorer {
            TeamSide::Home => home += snap.points,
            TeamSide::Away => away += snap.points,
        }
    }
    ensure!(
        (home, away) == (summary.game.score.home, summary.game.score.away),
        "scoring plays add to {away}-{home}, scoreboard shows {}-{}",
        summary.game.score.away,
        summary.game.score.home
    );
    Ok(())
}
