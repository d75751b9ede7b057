use std::collections::BTreeMap;
use std::convert::TryFrom;

use gridiron_game::play::OutcomeBucket;
use gridiron_game::{
    EngineConfig, OutcomeTables, PlayCallContext, PlayOutcome, PlayType, TableModifiers, base_table,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SAMPLE_SIZE: usize = 20_000;
const TOLERANCE: f64 = 0.015;

fn observed_rates(tables: &OutcomeTables, play_type: PlayType, off: f64, def: f64, seed: u64) -> BTreeMap<PlayOutcome, f64> {
    let ctx = PlayCallContext::first_and_ten_at(50);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let table = tables.generate(off, def, play_type, &ctx, &TableModifiers::neutral(), &mut rng);
    let mut counts: BTreeMap<PlayOutcome, usize> = BTreeMap::new();
    for _ in 0..SAMPLE_SIZE {
        let (outcome, _) = tables.roll_outcome(&table, &mut rng);
        *counts.entry(outcome).or_default() += 1;
    }
    let total = f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"));
    counts
        .into_iter()
        .map(|(outcome, count)| (outcome, f64::from(u32::try_from(count).expect("count fits")) / total))
        .collect()
}

#[test]
fn even_matchup_reproduces_base_tables() {
    let config = EngineConfig::default();
    let tables = OutcomeTables::new(&config.outcome);
    for (index, play_type) in PlayType::ALL.into_iter().enumerate() {
        let observed = observed_rates(&tables, play_type, 60.0, 60.0, 0xBA5E + u64::try_from(index).expect("index fits"));
        for &(outcome, expected) in base_table(play_type) {
            let rate = observed.get(&outcome).copied().unwrap_or(0.0);
            assert!(
                (rate - expected).abs() <= TOLERANCE,
                "{} {}: observed {rate:.4}, expected {expected:.4}",
                play_type.label(),
                outcome.label()
            );
        }
    }
}

#[test]
fn strong_offense_shifts_mass_toward_big_plays() {
    let config = EngineConfig::default();
    let tables = OutcomeTables::new(&config.outcome);
    let observed = observed_rates(&tables, PlayType::RunInside, 80.0, 50.0, 0xFA57);
    let positive: f64 = observed
        .iter()
        .filter(|(outcome, _)| outcome.bucket() == OutcomeBucket::Positive)
        .map(|(_, rate)| rate)
        .sum();
    let base_positive: f64 = base_table(PlayType::RunInside)
        .iter()
        .filter(|(outcome, _)| outcome.bucket() == OutcomeBucket::Positive)
        .map(|(_, p)| p)
        .sum();
    assert!(
        positive > base_positive + 0.05,
        "positive share {positive:.4} barely moved from {base_positive:.4}"
    );
    let base_loss = base_table(PlayType::RunInside)
        .iter()
        .find(|(outcome, _)| *outcome == PlayOutcome::Loss)
        .map_or(0.0, |(_, p)| *p);
    assert!(observed.get(&PlayOutcome::Loss).copied().unwrap_or(0.0) < base_loss);
}

#[test]
fn weak_offense_shifts_mass_toward_negative_plays() {
    let config = EngineConfig::default();
    let tables = OutcomeTables::new(&config.outcome);
    let ctx = PlayCallContext::first_and_ten_at(50);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let even = tables.generate(60.0, 60.0, PlayType::MediumPass, &ctx, &TableModifiers::neutral(), &mut rng);
    let lopsided = tables.generate(40.0, 80.0, PlayType::MediumPass, &ctx, &TableModifiers::neutral(), &mut rng);
    assert!(lopsided.bucket_probability(OutcomeBucket::Negative) > even.bucket_probability(OutcomeBucket::Negative));
    assert!((lopsided.advantage + 1.0).abs() < 1e-9);
}
