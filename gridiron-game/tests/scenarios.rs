use std::convert::TryFrom;

use gridiron_game::distribution::{running_back_weights, select_running_back};
use gridiron_game::injury::{sample_permanent_effects, sample_weeks_out};
use gridiron_game::ratings::calculate_weather_modifier;
use gridiron_game::resolver::{SideEffects, UsageDelta};
use gridiron_game::{
    Blitz, Coverage, DefensivePersonnel, DefensivePlayCall, EngineConfig, EnhancedPlayResolver, FatigueSystem,
    InjurySeverity, InjuryType, OffensivePersonnel, OffensivePlayCall, PlayCallContext, PlayOutcome, PlaySideEffects,
    PlayType, Position, Precipitation, RngBundle, RunGameTracker, Skill, TeamGameState, WeatherCondition,
    apply_side_effects, stock_team, weeks_out_range,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SAMPLE_SIZE: usize = 10_000;

fn rate(count: usize, total: usize) -> f64 {
    f64::from(u32::try_from(count).expect("count fits")) / f64::from(u32::try_from(total).expect("total fits"))
}

fn give_carries(team: &mut TeamGameState, back: gridiron_game::PlayerId, carries: usize) {
    let mut opponent = stock_team("Scout", 9_000, 50.0);
    let fatigue = FatigueSystem::new(&EngineConfig::default().fatigue);
    let effects = PlaySideEffects {
        offense: SideEffects {
            on_field: vec![UsageDelta {
                carry: true,
                touch: true,
                ..UsageDelta::snap(back, 0.0)
            }],
            injuries: Vec::new(),
        },
        defense: SideEffects::default(),
    };
    for _ in 0..carries {
        apply_side_effects(team, &mut opponent, &effects, &fatigue);
    }
}

fn feature_back_share(team: &TeamGameState, seed: u64) -> f64 {
    let starter = team.depth_at(Position::Rb)[0];
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let picks = (0..SAMPLE_SIZE)
        .filter_map(|_| select_running_back(team, &mut rng))
        .filter(|(id, _)| *id == starter)
        .count();
    rate(picks, SAMPLE_SIZE)
}

#[test]
fn run_at_the_one_never_leaves_the_field_without_scoring() {
    let config = EngineConfig::default();
    let resolver = EnhancedPlayResolver::new(&config);
    let offense = stock_team("Offense", 100, 70.0);
    let defense = stock_team("Defense", 500, 55.0);
    let offense_call = OffensivePlayCall::new(PlayType::RunInside, OffensivePersonnel::P22);
    let defense_call = DefensivePlayCall::new(DefensivePersonnel::GoalLine, Coverage::Cover1, Blitz::None);
    let ctx = PlayCallContext {
        down: 1,
        distance: 1,
        field_position: 99,
        ..PlayCallContext::default()
    };
    let run_game = RunGameTracker::default();

    for seed in 0..300 {
        let resolution = resolver.resolve(
            &offense,
            &defense,
            &offense_call,
            &defense_call,
            &ctx,
            &run_game,
            &RngBundle::from_user_seed(seed),
        );
        let result = &resolution.result.base;
        if result.touchdown || result.possession_changes() || result.safety {
            continue;
        }
        assert!(result.new_field_position <= 99, "seed {seed}: spot {}", result.new_field_position);
        if !result.penalty_enforced() {
            assert!(result.yards <= 0, "seed {seed}: {} yards from the one", result.yards);
        }
    }
}

#[test]
fn heavy_workload_pushes_carries_to_the_backups() {
    let mut team = stock_team("Backs", 100, 60.0);
    let fresh_share = feature_back_share(&team, 0x5EED);
    let starter = team.depth_at(Position::Rb)[0];
    give_carries(&mut team, starter, 22);
    assert_eq!(team.usage().carries(starter), 22);

    let weights = running_back_weights(&team);
    let (_, starter_weight) = weights.first().expect("starter listed");
    assert!((starter_weight.final_weight - 0.70 * 0.6).abs() < 1e-9);

    let tired_share = feature_back_share(&team, 0x5EED);
    assert!((fresh_share - 0.70).abs() < 0.02, "fresh share {fresh_share:.3}");
    // 0.42 / (0.42 + 0.25 + 0.05)
    assert!((tired_share - 0.583).abs() < 0.02, "tired share {tired_share:.3}");
}

#[test]
fn dome_neutralizes_every_weather_modifier() {
    let blizzard_dome = WeatherCondition {
        temperature_f: -5.0,
        wind_mph: 45.0,
        precipitation: Precipitation::Snow,
        is_dome: true,
    };
    for skill in Skill::ALL {
        assert!(
            calculate_weather_modifier(&blizzard_dome, skill).abs() < f64::EPSILON,
            "{skill:?} felt the weather indoors"
        );
    }
    let blizzard = WeatherCondition {
        is_dome: false,
        ..blizzard_dome
    };
    assert!(calculate_weather_modifier(&blizzard, Skill::Catching) < 0.0);
}

#[test]
fn injury_durations_and_lingering_effects_stay_in_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x1A7);
    for injury_type in InjuryType::ALL {
        for severity in InjurySeverity::ALL {
            let range = weeks_out_range(injury_type, severity);
            for _ in 0..50 {
                let weeks = sample_weeks_out(injury_type, severity, &mut rng);
                assert!(range.contains(weeks), "{injury_type:?}/{severity:?}: {weeks} outside {range:?}");
                let effects = sample_permanent_effects(injury_type, severity, &mut rng);
                if !matches!(severity, InjurySeverity::Severe | InjurySeverity::SeasonEnding) {
                    assert!(effects.is_empty(), "{severity:?} left lingering effects");
                }
            }
        }
    }
}

#[test]
fn every_resolved_play_is_internally_consistent() {
    let config = EngineConfig::default();
    let resolver = EnhancedPlayResolver::new(&config);
    let offense = stock_team("Offense", 100, 60.0);
    let defense = stock_team("Defense", 500, 60.0);
    let defense_call = DefensivePlayCall::new(DefensivePersonnel::Base43, Coverage::Cover3, Blitz::Linebacker);
    let run_game = RunGameTracker::default();
    let ctx = PlayCallContext {
        down: 3,
        distance: 8,
        field_position: 42,
        ..PlayCallContext::default()
    };

    for (index, play_type) in PlayType::ALL.into_iter().enumerate() {
        let offense_call = OffensivePlayCall::new(play_type, OffensivePersonnel::P11);
        for seed in 0..40_u64 {
            let rngs = RngBundle::from_user_seed(seed * 31 + u64::try_from(index).expect("index fits"));
            let result =
                resolver.resolve(&offense, &defense, &offense_call, &defense_call, &ctx, &run_game, &rngs).result;
            let base = &result.base;
            assert!(base.new_field_position <= 100);
            assert!((1..=4).contains(&base.new_down));
            if base.outcome == PlayOutcome::Incomplete && !base.penalty_enforced() {
                assert_eq!(base.yards, 0);
            }
            if base.touchdown {
                assert_eq!(42 + base.yards, 100);
            }
            assert_eq!(base.injury, !base.injuries.is_empty());
            assert!((1.0..=100.0).contains(&result.offense_rating));
            assert!((1.0..=100.0).contains(&result.defense_rating));
            assert!((-1.0..=1.0).contains(&result.advantage));
        }
    }
}
