use anyhow::{Result, ensure};

use super::TestScenario;
use crate::logic::{Matchup, SimulationPlan, SimulationSummary};

const SMOKE_SNAPS: u32 = 24;

#[must_use]
pub fn smoke_scenario() -> TestScenario {
    TestScenario::simulation(
        "Smoke Test",
        SimulationPlan::new(Matchup::even())
            .with_max_snaps(SMOKE_SNAPS)
            .with_expectation(smoke_expectation),
    )
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    let snaps = &summary.game.snaps;
    ensure!(
        snaps.len() == SMOKE_SNAPS as usize,
        "expected {SMOKE_SNAPS} snaps, got {}",
        snaps.len()
    );
    ensure!(!summary.finished, "game ended after {} snaps", snaps.len());

    for (index, snap) in snaps.iter().enumerate() {
        ensure!(snap.number as usize == index + 1, "snap {} numbered {}", index + 1, snap.number);
        let ctx = &snap.context;
        ensure!((1..=4).contains(&ctx.down), "snap {}: down {}", snap.number, ctx.down);
        ensure!(ctx.distance >= 1, "snap {}: distance {}", snap.number, ctx.distance);
        ensure!(
            (1..=99).contains(&ctx.field_position),
            "snap {}: ball spotted at {}",
            snap.number,
            ctx.field_position
        );
        ensure!(ctx.quarter <= 2, "snap {}: quarter {} this early", snap.number, ctx.quarter);
        if let Some(result) = snap.scrimmage() {
            let base = &result.base;
            ensure!(base.new_field_position <= 100, "snap {}: spot {}", snap.number, base.new_field_position);
            ensure!((1..=4).contains(&base.new_down), "snap {}: next down {}", snap.number, base.new_down);
            ensure!(
                (1.0..=100.0).contains(&result.offense_rating) && (1.0..=100.0).contains(&result.defense_rating),
                "snap {}: ratings off the scale",
                snap.number
            );
        }
    }

    let points: u32 = snaps.iter().map(|snap| u32::from(snap.points)).sum();
    ensure!(
        points == u32::from(summary.game.score.total()),
        "snap points {points} do not add up to the scoreboard {}",
        summary.game.score.total()
    );
    Ok(())
}
