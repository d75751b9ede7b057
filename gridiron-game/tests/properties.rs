use gridiron_game::ratings::{RatedPlayer, weak_link_penalty};
use gridiron_game::resolver::advance;
use gridiron_game::{
    EffectiveRatingCalculator, EngineConfig, GameStakes, OutcomeTables, Player, PlayerId, PlayerRole, PlayCallContext,
    PlayOutcome, PlayType, Position, Precipitation, RatingContext, Skill, TableModifiers, TeamCompositeRatings,
    UnitKind, WeatherCondition,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const LINE: [Position; 5] = [Position::Lt, Position::Lg, Position::C, Position::Rg, Position::Rt];

fn precipitation(index: usize) -> Precipitation {
    [Precipitation::Clear, Precipitation::Rain, Precipitation::Snow][index % 3]
}

proptest! {
    #[test]
    fn effective_rating_stays_on_the_scale(
        skill_value in -50.0f64..150.0,
        skill_index in 0usize..Skill::ALL.len(),
        fatigue in 0.0f64..100.0,
        variance in -5.0f64..5.0,
        temperature in -20.0f64..110.0,
        wind in 0.0f64..50.0,
        precip in 0usize..3,
        is_dome in any::<bool>(),
    ) {
        let skill = Skill::ALL[skill_index];
        let player = Player::new(PlayerId(1), "Prop", Position::Wr, PlayerRole::Slot).with_skill(skill, skill_value);
        let weather = WeatherCondition {
            temperature_f: temperature,
            wind_mph: wind,
            precipitation: precipitation(precip),
            is_dome,
        };
        let ctx = RatingContext {
            fatigue,
            weekly_variance: variance,
            stakes: GameStakes::Championship,
            ..RatingContext::neutral(&weather)
        };
        let rating = EffectiveRatingCalculator::effective_rating(&player, skill, &ctx);
        prop_assert!((1.0..=100.0).contains(&rating), "rating {rating}");
    }

    #[test]
    fn unit_effective_stays_on_the_scale(ratings in proptest::collection::vec(-40.0f64..160.0, 5)) {
        let config = EngineConfig::default();
        let composites = TeamCompositeRatings::new(&config.position_weights);
        let players: Vec<RatedPlayer> = LINE
            .iter()
            .zip(&ratings)
            .enumerate()
            .map(|(index, (position, rating))| RatedPlayer {
                id: PlayerId(u32::try_from(index).expect("index fits")),
                position: *position,
                rating: *rating,
            })
            .collect();
        for unit in [UnitKind::PassProtection, UnitKind::RunBlocking] {
            let rating = composites.aggregate(unit, &players, None);
            prop_assert!((1.0..=100.0).contains(&rating.effective), "{unit:?}: {}", rating.effective);
            prop_assert!(rating.weak_link_penalty >= 0.0);
        }
    }

    #[test]
    fn weak_link_penalty_never_shrinks_as_the_gap_grows(a in 0.0f64..60.0, b in 0.0f64..60.0) {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        for unit in UnitKind::ALL {
            prop_assert!(weak_link_penalty(unit, small) <= weak_link_penalty(unit, large) + 1e-12);
        }
    }

    #[test]
    fn outcome_tables_are_normalized_and_capped(
        off in 1.0f64..100.0,
        def in 1.0f64..100.0,
        play_index in 0usize..PlayType::ALL.len(),
        field_position in 1u8..=99,
        down in 1u8..=4,
        distance in 1u8..=25,
        seed in any::<u64>(),
    ) {
        let config = EngineConfig::default();
        let tables = OutcomeTables::new(&config.outcome);
        let ctx = PlayCallContext { down, distance, field_position, ..PlayCallContext::default() };
        let play_type = PlayType::ALL[play_index];
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let table = tables.generate(off, def, play_type, &ctx, &TableModifiers::neutral(), &mut rng);
        prop_assert!((table.total_probability() - 1.0).abs() < 1e-9);
        let to_endzone = ctx.yards_to_endzone();
        for entry in &table.entries {
            prop_assert!(entry.probability >= 0.0);
            prop_assert!(entry.yards.min <= entry.yards.max);
            if entry.yards.max > 0 {
                prop_assert!(entry.yards.max <= to_endzone, "{:?} max {} past {to_endzone}", entry.outcome, entry.yards.max);
            }
        }
        let mut yardage_rng = rng.clone();
        let rolled = tables.roll(&table, &mut rng, &mut yardage_rng);
        prop_assert!(rolled.yards <= to_endzone);
    }

    #[test]
    fn field_bookkeeping_stays_on_the_field(
        field_position in 1u8..=99,
        down in 1u8..=4,
        distance in 1u8..=30,
        yards in -30i32..110,
        play_index in 0usize..PlayType::ALL.len(),
        outcome_index in 0usize..PlayOutcome::ALL.len(),
    ) {
        let ctx = PlayCallContext { down, distance, field_position, ..PlayCallContext::default() };
        let field = advance(&ctx, PlayType::ALL[play_index], PlayOutcome::ALL[outcome_index], yards);
        prop_assert!(field.new_field_position <= 100);
        prop_assert!((1..=4).contains(&field.new_down));
        prop_assert!(field.new_distance >= 1);
        prop_assert!(i32::from(field_position) + field.yards <= 100);
        if !field.touchdown && !field.safety {
            prop_assert!((1..=99).contains(&field.new_field_position));
        }
    }
}
