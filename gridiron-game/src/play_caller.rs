//! Coordinator decision logic: the calls that feed resolution.
//!
//! Nothing here resolves a play. The offensive coordinator picks run or pass
//! from its tendencies and the situation, then a play type and personnel
//! group; the defensive coordinator answers the offensive personnel with a
//! package, a coverage shell and maybe a blitz.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{FIELD_GOAL_MAX_DISTANCE, FIELD_GOAL_SNAP_OFFSET};
use crate::context::PlayCallContext;
use crate::distribution::{weighted_choice, weighted_index};
use crate::matchup::{DefensiveScheme, OffensiveScheme};
use crate::numbers::round_f64_to_u8;
use crate::play::{
    Blitz, Coverage, DefensivePersonnel, DefensivePlayCall, OffensivePersonnel, OffensivePlayCall,
    PlayType, RunDirection,
};
use crate::team::TeamGameState;
use crate::trace::{DecisionTrace, RollValue, WeightedCandidate};

/// Longest kick a coordinator attempts without being desperate.
const COMFORTABLE_KICK: i32 = FIELD_GOAL_MAX_DISTANCE - 10;

/// How a team's coordinators lean. All rates are probabilities in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorTendencies {
    pub pass_lean: f64,
    pub aggression: f64,
    pub deep_shot_rate: f64,
    pub play_action_rate: f64,
    pub blitz_rate: f64,
    pub man_coverage_rate: f64,
    pub fourth_down_aggression: f64,
}

impl Default for CoordinatorTendencies {
    fn default() -> Self {
        Self {
            pass_lean: 0.55,
            aggression: 0.5,
            deep_shot_rate: 0.15,
            play_action_rate: 0.12,
            blitz_rate: 0.25,
            man_coverage_rate: 0.3,
            fourth_down_aggression: 0.3,
        }
    }
}

impl CoordinatorTendencies {
    /// Default tendencies nudged toward a scheme's identity.
    #[must_use]
    pub fn for_schemes(offense: OffensiveScheme, defense: DefensiveScheme) -> Self {
        let mut tendencies = Self::default();
        match offense {
            OffensiveScheme::AirRaid => {
                tendencies.pass_lean = 0.68;
                tendencies.deep_shot_rate = 0.22;
            }
            OffensiveScheme::WestCoast => tendencies.pass_lean = 0.6,
            OffensiveScheme::PowerRun => {
                tendencies.pass_lean = 0.42;
                tendencies.play_action_rate = 0.2;
            }
            OffensiveScheme::SpreadOption => tendencies.pass_lean = 0.5,
            OffensiveScheme::ProStyle => {}
        }
        match defense {
            DefensiveScheme::BlitzHeavy => tendencies.blitz_rate = 0.45,
            DefensiveScheme::ManPress => tendencies.man_coverage_rate = 0.6,
            DefensiveScheme::Cover2Zone | DefensiveScheme::Tampa2 => tendencies.man_coverage_rate = 0.15,
            DefensiveScheme::Cover3Zone | DefensiveScheme::QuartersMatch => {}
        }
        tendencies
    }
}

/// What to do with a fourth down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FourthDownDecision {
    Go,
    Punt,
    FieldGoal,
}

/// Kick length from the line of scrimmage: end zone depth plus the snap and hold.
#[must_use]
pub fn field_goal_distance(ctx: &PlayCallContext) -> i32 {
    ctx.yards_to_endzone() + FIELD_GOAL_SNAP_OFFSET
}

/// Stateless coordinator logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayCaller;

impl PlayCaller {
    /// Chance the offense throws, in `[0.1, 0.9]`.
    #[must_use]
    pub fn pass_probability(team: &TeamGameState, ctx: &PlayCallContext) -> f64 {
        let tendencies = &team.tendencies;
        let mut p = tendencies.pass_lean;
        match team.offensive_scheme {
            OffensiveScheme::PowerRun => p -= 0.05,
            scheme if scheme.is_pass_first() => p += 0.05,
            _ => {}
        }
        if ctx.is_third_and_long() {
            p += 0.25;
        } else if ctx.is_short_yardage() {
            p -= 0.25;
        }
        if ctx.is_two_minute_drill() && ctx.score_differential <= 0 {
            p += 0.2;
        }
        if ctx.quarter >= 4 && ctx.score_differential > 0 && ctx.seconds_remaining <= 300 {
            p -= 0.2;
        }
        if ctx.quarter >= 4 && ctx.score_differential <= -9 {
            p += 0.15;
        }
        if ctx.is_blowout() && ctx.score_differential > 0 {
            p -= 0.15;
        }
        if ctx.is_goal_line() {
            p -= 0.1;
        }
        p.clamp(0.1, 0.9)
    }

    /// Offensive call for the snap, with the play-type selection trace.
    pub fn call_offense<R>(team: &TeamGameState, ctx: &PlayCallContext, rng: &mut R) -> (OffensivePlayCall, DecisionTrace)
    where
        R: Rng + ?Sized,
    {
        let pass_p = Self::pass_probability(team, ctx);
        let passing = rng.gen_bool(pass_p);
        let candidates = if passing {
            pass_weights(team, ctx)
        } else {
            run_weights(ctx)
        };
        let weights: Vec<f64> = candidates.iter().map(|(_, w)| *w).collect();
        let (index, roll) = weighted_index(&weights, rng).unwrap_or((0, 0.0));
        let play_type = candidates
            .get(index)
            .map_or(PlayType::ShortPass, |(play_type, _)| *play_type);
        let personnel = choose_personnel(team.offensive_scheme, play_type, ctx, rng);
        let mut call = OffensivePlayCall::new(play_type, personnel);
        call.direction = match play_type {
            PlayType::RunOutside => {
                if rng.gen_bool(0.5) {
                    RunDirection::Left
                } else {
                    RunDirection::Right
                }
            }
            _ => RunDirection::Middle,
        };
        let trace = DecisionTrace {
            pool_id: format!("call.{}", if passing { "pass" } else { "run" }),
            roll: RollValue::F64(roll),
            candidates: candidates
                .iter()
                .map(|(play_type, weight)| WeightedCandidate::plain(play_type.label(), *weight))
                .collect(),
            chosen_id: play_type.label().to_string(),
        };
        log::debug!(
            "{} calls {} from {} (pass p {pass_p:.2})",
            team.name,
            play_type.label(),
            personnel.label()
        );
        (call, trace)
    }

    /// Defensive answer to the offensive personnel on the field.
    pub fn call_defense<R>(
        team: &TeamGameState,
        ctx: &PlayCallContext,
        offense: OffensivePersonnel,
        rng: &mut R,
    ) -> DefensivePlayCall
    where
        R: Rng + ?Sized,
    {
        let tendencies = &team.tendencies;
        let scheme = team.defensive_scheme;
        let base = match scheme {
            DefensiveScheme::Cover2Zone | DefensiveScheme::Tampa2 | DefensiveScheme::Cover3Zone => {
                DefensivePersonnel::Base43
            }
            _ => DefensivePersonnel::Base34,
        };
        let personnel = if offense.is_heavy() && ctx.yards_to_endzone() <= 3 {
            DefensivePersonnel::GoalLine
        } else if offense.is_heavy() {
            base
        } else if ctx.quarter >= 4 && ctx.seconds_remaining <= 60 && ctx.score_differential < 0 {
            // Offense trails late; the defense here is protecting a lead.
            DefensivePersonnel::Quarter
        } else if offense.is_light() || (ctx.down == 3 && ctx.distance >= 10) {
            DefensivePersonnel::Dime
        } else if offense == OffensivePersonnel::P11 {
            DefensivePersonnel::Nickel
        } else {
            base
        };

        let coverage = if rng.gen_bool(tendencies.man_coverage_rate.clamp(0.0, 1.0)) {
            if personnel.is_pass_package() {
                Coverage::Man
            } else {
                Coverage::Cover1
            }
        } else {
            scheme.base_coverage()
        };

        let mut blitz_rate = tendencies.blitz_rate;
        if ctx.is_third_and_long() {
            blitz_rate += 0.1;
        }
        if personnel == DefensivePersonnel::Quarter {
            blitz_rate *= 0.3;
        }
        let blitz = if rng.gen_bool(blitz_rate.clamp(0.0, 0.9)) {
            let all_out = 0.2 * (0.5 + tendencies.aggression);
            weighted_choice(
                &[
                    (Blitz::Linebacker, 0.5),
                    (Blitz::DefensiveBack, 0.3),
                    (Blitz::AllOut, all_out),
                ],
                rng,
            )
            .unwrap_or(Blitz::Linebacker)
        } else {
            Blitz::None
        };
        // Cover 0 is the only shell behind an all-out pressure.
        let coverage = if blitz == Blitz::AllOut { Coverage::Cover0 } else { coverage };
        let call = DefensivePlayCall::new(personnel, coverage, blitz);
        log::debug!("{} answers {} with {call:?}", team.name, offense.label());
        call
    }

    /// Go, punt or kick on fourth down.
    #[must_use]
    pub fn fourth_down_decision(team: &TeamGameState, ctx: &PlayCallContext) -> FourthDownDecision {
        let tendencies = &team.tendencies;
        let kick = field_goal_distance(ctx);
        let in_range = kick <= FIELD_GOAL_MAX_DISTANCE;
        let comfortable = kick <= COMFORTABLE_KICK;
        let distance = i32::from(ctx.distance);
        let late = ctx.quarter >= 4 && ctx.seconds_remaining <= 120;

        if late && ctx.score_differential < 0 {
            if ctx.score_differential >= -3 && in_range {
                return FourthDownDecision::FieldGoal;
            }
            return FourthDownDecision::Go;
        }

        let go_limit = 1 + i32::from(round_f64_to_u8(tendencies.fourth_down_aggression.clamp(0.0, 1.0) * 3.0));
        let field = i32::from(ctx.field_position);
        if distance <= go_limit && field >= 40 {
            return FourthDownDecision::Go;
        }
        if comfortable {
            return FourthDownDecision::FieldGoal;
        }
        if field >= 60 && distance <= go_limit + 2 {
            return FourthDownDecision::Go;
        }
        if in_range && field >= 60 {
            return FourthDownDecision::FieldGoal;
        }
        FourthDownDecision::Punt
    }
}

fn run_weights(ctx: &PlayCallContext) -> Vec<(PlayType, f64)> {
    let sneak = if ctx.distance <= 1 { 0.35 } else { 0.0 };
    let draw = if ctx.is_third_and_long() { 0.3 } else { 0.15 };
    vec![
        (PlayType::RunInside, 0.45),
        (PlayType::RunOutside, 0.3),
        (PlayType::Draw, draw),
        (PlayType::QbSneak, sneak),
    ]
}

fn pass_weights(team: &TeamGameState, ctx: &PlayCallContext) -> Vec<(PlayType, f64)> {
    let tendencies = &team.tendencies;
    let mut screen = 0.12;
    let mut short = 0.38;
    let mut medium = 0.30;
    let mut deep = tendencies.deep_shot_rate * (0.5 + tendencies.aggression);
    let mut pa_short = tendencies.play_action_rate * 0.6;
    let mut pa_deep = tendencies.play_action_rate * 0.4;
    if ctx.is_third_and_long() {
        short *= 0.5;
        medium *= 1.5;
        deep *= 1.3;
        screen *= 0.6;
        pa_short *= 0.3;
        pa_deep *= 0.3;
    }
    if ctx.is_goal_line() {
        medium *= 0.5;
        deep = 0.0;
        pa_deep = 0.0;
        pa_short *= 1.5;
    } else if ctx.is_red_zone() {
        deep *= 0.3;
        pa_deep *= 0.3;
    }
    if ctx.is_two_minute_drill() {
        pa_short = 0.0;
        pa_deep = 0.0;
        screen *= 0.5;
    }
    vec![
        (PlayType::Screen, screen),
        (PlayType::ShortPass, short),
        (PlayType::MediumPass, medium),
        (PlayType::DeepPass, deep),
        (PlayType::PlayActionShort, pa_short),
        (PlayType::PlayActionDeep, pa_deep),
    ]
}

fn choose_personnel<R>(scheme: OffensiveScheme, play_type: PlayType, ctx: &PlayCallContext, rng: &mut R) -> OffensivePersonnel
where
    R: Rng + ?Sized,
{
    use OffensivePersonnel as P;
    let options: &[(OffensivePersonnel, f64)] = if ctx.is_goal_line() || (ctx.is_short_yardage() && play_type.is_run()) {
        &[(P::P22, 0.4), (P::P13, 0.3), (P::P12, 0.3)]
    } else if ctx.is_two_minute_drill() && play_type.is_pass() {
        &[(P::P11, 0.6), (P::P10, 0.3), (P::Empty, 0.1)]
    } else {
        match (scheme, play_type.is_run()) {
            (OffensiveScheme::PowerRun, true) => &[(P::P21, 0.45), (P::P12, 0.35), (P::P22, 0.2)],
            (OffensiveScheme::PowerRun, false) => &[(P::P12, 0.4), (P::P21, 0.3), (P::P11, 0.3)],
            (OffensiveScheme::AirRaid, _) => &[(P::P10, 0.45), (P::P11, 0.45), (P::Empty, 0.1)],
            (OffensiveScheme::SpreadOption, _) => &[(P::P11, 0.6), (P::P10, 0.4)],
            (_, true) => &[(P::P11, 0.45), (P::P12, 0.4), (P::P21, 0.15)],
            (_, false) => &[(P::P11, 0.7), (P::P12, 0.2), (P::P10, 0.1)],
        }
    };
    weighted_choice(options, rng).unwrap_or(P::P11)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn team(offense: OffensiveScheme, defense: DefensiveScheme) -> TeamGameState {
        let mut team = TeamGameState::new("Callers", offense, defense);
        team.tendencies = CoordinatorTendencies::for_schemes(offense, defense);
        team
    }

    #[test]
    fn third_and_long_throws_more() {
        let t = team(OffensiveScheme::ProStyle, DefensiveScheme::Cover3Zone);
        let base = PlayCallContext::default();
        let long = PlayCallContext {
            down: 3,
            distance: 9,
            ..base
        };
        let short = PlayCallContext {
            down: 3,
            distance: 1,
            ..base
        };
        assert!(PlayCaller::pass_probability(&t, &long) > PlayCaller::pass_probability(&t, &base));
        assert!(PlayCaller::pass_probability(&t, &short) < PlayCaller::pass_probability(&t, &base));
    }

    #[test]
    fn calls_are_consistent_with_their_family() {
        let t = team(OffensiveScheme::AirRaid, DefensiveScheme::BlitzHeavy);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let ctx = PlayCallContext::default();
        for _ in 0..200 {
            let (call, trace) = PlayCaller::call_offense(&t, &ctx, &mut rng);
            assert_eq!(trace.chosen_id, call.play_type.label());
            assert_ne!(call.play_type, PlayType::QbSneak, "sneaks need a yard or less");
            let defense = PlayCaller::call_defense(&t, &ctx, call.personnel, &mut rng);
            if defense.blitz == Blitz::AllOut {
                assert_eq!(defense.coverage, Coverage::Cover0);
            }
        }
    }

    #[test]
    fn heavy_personnel_at_the_goal_line_draws_goal_line_defense() {
        let t = team(OffensiveScheme::PowerRun, DefensiveScheme::Cover2Zone);
        let ctx = PlayCallContext::first_and_ten_at(98);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let call = PlayCaller::call_defense(&t, &ctx, OffensivePersonnel::P22, &mut rng);
        assert_eq!(call.personnel, DefensivePersonnel::GoalLine);
        let spread = PlayCaller::call_defense(&t, &PlayCallContext::default(), OffensivePersonnel::P10, &mut rng);
        assert_eq!(spread.personnel, DefensivePersonnel::Dime);
    }

    #[test]
    fn fourth_down_choices() {
        let t = team(OffensiveScheme::ProStyle, DefensiveScheme::Cover3Zone);
        let own_territory = PlayCallContext {
            down: 4,
            distance: 6,
            field_position: 30,
            ..PlayCallContext::default()
        };
        assert_eq!(PlayCaller::fourth_down_decision(&t, &own_territory), FourthDownDecision::Punt);
        let chip_shot = PlayCallContext {
            down: 4,
            distance: 8,
            field_position: 80,
            ..PlayCallContext::default()
        };
        assert_eq!(PlayCaller::fourth_down_decision(&t, &chip_shot), FourthDownDecision::FieldGoal);
        let inches = PlayCallContext {
            down: 4,
            distance: 1,
            field_position: 55,
            ..PlayCallContext::default()
        };
        assert_eq!(PlayCaller::fourth_down_decision(&t, &inches), FourthDownDecision::Go);
        let desperate = PlayCallContext {
            down: 4,
            distance: 12,
            field_position: 30,
            quarter: 4,
            seconds_remaining: 40,
            score_differential: -6,
            ..PlayCallContext::default()
        };
        assert_eq!(PlayCaller::fourth_down_decision(&t, &desperate), FourthDownDecision::Go);
    }

    #[test]
    fn empty_tendencies_deserialize_to_defaults() {
        let parsed: CoordinatorTendencies = serde_json::from_str("{}").expect("defaults");
        assert_eq!(parsed, CoordinatorTendencies::default());
    }
}
