//! Contextual per-skill rating for one player on one snap.
//!
//! The true skill value is shifted by additive context modifiers (scheme fit,
//! role fit, coach chemistry and quality, weather, clutch, weekly variance),
//! scaled by the injury multiplier, then nudged by fatigue, morale and effort
//! traits. Every input degrades to a neutral default, so the function is total.
use serde::{Deserialize, Serialize};

use crate::coach::{Coach, CoachPersonality};
use crate::constants::{
    CHEMISTRY_LIMIT, CLUTCH_LIMIT, CLUTCH_TRAIT_BONUS, COACH_QUALITY_DIVISOR, COACH_QUALITY_MAX,
    COACH_QUALITY_MIN, FATIGUE_PENALTY_STEP, IT_FACTOR_DIVISOR, LAZY_PENALTY, MORALE_DIVISOR,
    MOTOR_BONUS, ROLE_FIT_DIVISOR, ROLE_FIT_LIMIT, ROLE_MISMATCH_PENALTY, SCHEME_FIT_DIVISOR,
    SCHEME_FIT_LIMIT, SCHEME_FIT_PIVOT, SCHEME_TRANSITION_GAMES, SCHEME_TRANSITION_STEP,
    WEATHER_MODIFIER_MAX, WEATHER_MODIFIER_MIN,
};
use crate::context::{GameStakes, PlayCallContext, Precipitation, WeatherCondition};
use crate::matchup::scheme::{DefensiveScheme, OffensiveScheme};
use crate::numbers::{NEUTRAL_RATING, clamp_rating};
use crate::player::{HiddenTrait, Player, PlayerRole, Skill};
use crate::team::TeamGameState;

/// Scheme the player is executing on this snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "side", content = "scheme")]
pub enum SchemeAssignment {
    Offense(OffensiveScheme),
    Defense(DefensiveScheme),
}

/// Inputs for one rating lookup.
#[derive(Debug, Clone, Copy)]
pub struct RatingContext<'a> {
    pub coach: Option<&'a Coach>,
    pub scheme: Option<SchemeAssignment>,
    pub games_since_scheme_change: u8,
    /// Role the play asks of the player, if any.
    pub role: Option<PlayerRole>,
    pub weather: &'a WeatherCondition,
    pub stakes: GameStakes,
    pub weekly_variance: f64,
    pub fatigue: f64,
}

impl<'a> RatingContext<'a> {
    /// Context drawn from the player's team state and the play context.
    #[must_use]
    pub fn for_player(team: &'a TeamGameState, player: &Player, ctx: &'a PlayCallContext) -> Self {
        let scheme = if player.position.is_offense() {
            Some(SchemeAssignment::Offense(team.offensive_scheme))
        } else if player.position.is_defense() {
            Some(SchemeAssignment::Defense(team.defensive_scheme))
        } else {
            None
        };
        Self {
            coach: team.coach_for(player.position.group()),
            scheme,
            games_since_scheme_change: team.games_since_scheme_change,
            role: None,
            weather: &ctx.weather,
            stakes: ctx.stakes,
            weekly_variance: team.weekly_variance_for(player.id),
            fatigue: team.fatigue(player.id),
        }
    }

    /// Bare context with no staff, scheme or variance.
    #[must_use]
    pub const fn neutral(weather: &'a WeatherCondition) -> Self {
        Self {
            coach: None,
            scheme: None,
            games_since_scheme_change: SCHEME_TRANSITION_GAMES,
            role: None,
            weather,
            stakes: GameStakes::Regular,
            weekly_variance: 0.0,
            fatigue: 0.0,
        }
    }

    #[must_use]
    pub const fn with_role(mut self, role: PlayerRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// Every term of one rating calculation, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingBreakdown {
    pub base: f64,
    pub scheme_fit: f64,
    pub role_fit: f64,
    pub chemistry: f64,
    pub coach_quality: f64,
    pub weather: f64,
    pub clutch: f64,
    pub weekly_variance: f64,
    pub injury_multiplier: f64,
    pub fatigue_penalty: f64,
    pub morale: f64,
    pub effort: f64,
    pub effective: f64,
}

/// Converts hidden true skill into a contextual 1..=100 rating.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectiveRatingCalculator;

impl EffectiveRatingCalculator {
    #[must_use]
    pub fn effective_rating(player: &Player, skill: Skill, ctx: &RatingContext<'_>) -> f64 {
        Self::breakdown(player, skill, ctx).effective
    }

    #[must_use]
    pub fn breakdown(player: &Player, skill: Skill, ctx: &RatingContext<'_>) -> RatingBreakdown {
        let base = player.true_skill(skill);
        let scheme_fit = ctx.scheme.map_or(0.0, |scheme| {
            scheme_fit_modifier(player, scheme, ctx.games_since_scheme_change)
        });
        let role_fit = role_fit_modifier(player, ctx.role);
        let chemistry = ctx
            .coach
            .map_or(0.0, |coach| chemistry_modifier(player, coach, ctx.scheme));
        let coach_quality = ctx.coach.map_or(0.0, coach_quality_modifier);
        let weather = calculate_weather_modifier(ctx.weather, skill);
        let clutch = clutch_modifier(player, ctx.stakes);
        let weekly_variance = if ctx.weekly_variance.is_finite() {
            ctx.weekly_variance
        } else {
            0.0
        };

        let additive = base
            + scheme_fit
            + role_fit
            + chemistry
            + coach_quality
            + weather
            + clutch
            + weekly_variance;
        let injury_multiplier = player
            .injury
            .as_ref()
            .map_or(1.0, |status| status.severity.performance_multiplier());
        let fatigue_penalty = fatigue_penalty(ctx.fatigue);
        let morale = (player.morale.clamp(0.0, 100.0) - NEUTRAL_RATING) / MORALE_DIVISOR;
        let effort = effort_modifier(player);

        let effective = clamp_rating(
            (additive * injury_multiplier - fatigue_penalty + morale + effort).round(),
        );
        RatingBreakdown {
            base,
            scheme_fit,
            role_fit,
            chemistry,
            coach_quality,
            weather,
            clutch,
            weekly_variance,
            injury_multiplier,
            fatigue_penalty,
            morale,
            effort,
            effective,
        }
    }

    /// Weighted mean of several effective skills.
    #[must_use]
    pub fn blended_rating(player: &Player, mix: &[(Skill, f64)], ctx: &RatingContext<'_>) -> f64 {
        let total: f64 = mix.iter().map(|(_, weight)| weight).sum();
        if total <= 0.0 {
            return NEUTRAL_RATING;
        }
        let sum: f64 = mix
            .iter()
            .map(|(skill, weight)| Self::effective_rating(player, *skill, ctx) * weight)
            .sum();
        clamp_rating(sum / total)
    }
}

/// `floor(fatigue / 25)`: zero to four points.
#[must_use]
pub fn fatigue_penalty(fatigue: f64) -> f64 {
    if !fatigue.is_finite() {
        return 0.0;
    }
    (fatigue.clamp(0.0, 100.0) / FATIGUE_PENALTY_STEP).floor()
}

/// Fit between the player's skills and what the scheme asks of the position, ±10.
#[must_use]
pub fn scheme_fit_modifier(player: &Player, scheme: SchemeAssignment, games_since_change: u8) -> f64 {
    let group = player.position.group();
    let requirements = match scheme {
        SchemeAssignment::Offense(scheme) => scheme.skill_requirements(group),
        SchemeAssignment::Defense(scheme) => scheme.skill_requirements(group),
    };
    let total: f64 = requirements.iter().map(|(_, weight)| weight).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let fit = requirements
        .iter()
        .map(|(skill, weight)| player.true_skill(*skill) * weight)
        .sum::<f64>()
        / total;
    let raw = (fit - SCHEME_FIT_PIVOT) / SCHEME_FIT_DIVISOR;
    let transition = f64::from(SCHEME_TRANSITION_GAMES.saturating_sub(games_since_change)) * SCHEME_TRANSITION_STEP;
    (raw - transition).clamp(-SCHEME_FIT_LIMIT, SCHEME_FIT_LIMIT)
}

/// Role effectiveness, penalized when the play asks for a different role, ±10.
#[must_use]
pub fn role_fit_modifier(player: &Player, requested: Option<PlayerRole>) -> f64 {
    let effectiveness = if player.role_fit.effectiveness.is_finite() {
        player.role_fit.effectiveness.clamp(0.0, 100.0)
    } else {
        NEUTRAL_RATING
    };
    let mut modifier = (effectiveness - NEUTRAL_RATING) / ROLE_FIT_DIVISOR;
    if requested.is_some_and(|role| role != player.role_fit.role) {
        modifier -= ROLE_MISMATCH_PENALTY;
    }
    modifier.clamp(-ROLE_FIT_LIMIT, ROLE_FIT_LIMIT)
}

/// Coach-player chemistry from personality, scheme agreement and tenure, ±10.
#[must_use]
pub fn chemistry_modifier(player: &Player, coach: &Coach, scheme: Option<SchemeAssignment>) -> f64 {
    let morale_lean = (player.morale.clamp(0.0, 100.0) - NEUTRAL_RATING) / 10.0;
    let personality = match coach.personality {
        CoachPersonality::PlayersCoach => 2.0 + morale_lean,
        CoachPersonality::Disciplinarian => {
            let mut value = 1.0;
            if player.has_trait(HiddenTrait::Undisciplined) {
                value -= 4.0;
            }
            if player.has_trait(HiddenTrait::Lazy) {
                value -= 3.0;
            }
            if player.has_trait(HiddenTrait::FilmJunkie) {
                value += 2.0;
            }
            value
        }
        CoachPersonality::Innovator => {
            let aligned = match scheme {
                Some(SchemeAssignment::Offense(scheme)) => coach.preferred_offense == Some(scheme),
                Some(SchemeAssignment::Defense(scheme)) => coach.preferred_defense == Some(scheme),
                None => false,
            };
            if aligned { 3.0 } else { -1.0 }
        }
        CoachPersonality::Motivator => {
            let mut value = morale_lean;
            if player.has_trait(HiddenTrait::Motor) {
                value += 2.0;
            }
            if player.has_trait(HiddenTrait::Lazy) {
                value += 1.0;
            }
            value
        }
    };
    let tenure = f64::from(coach.tenure_years.min(6)) * 0.5;
    (personality + tenure).clamp(-CHEMISTRY_LIMIT, CHEMISTRY_LIMIT)
}

/// Teaching quality, −5..=+10.
#[must_use]
pub fn coach_quality_modifier(coach: &Coach) -> f64 {
    if !coach.quality.is_finite() {
        return 0.0;
    }
    ((coach.quality - NEUTRAL_RATING) / COACH_QUALITY_DIVISOR).clamp(COACH_QUALITY_MIN, COACH_QUALITY_MAX)
}

/// Weather effect on one skill, −10..=+2. Indoor games always return exactly zero.
#[must_use]
pub fn calculate_weather_modifier(weather: &WeatherCondition, skill: Skill) -> f64 {
    if weather.is_dome {
        return 0.0;
    }
    let ball = skill.is_ball_skill();
    let movement = skill.is_movement_skill() || matches!(skill, Skill::Stamina);
    let mut modifier = 0.0;

    let ideal = (60.0..=75.0).contains(&weather.temperature_f)
        && weather.wind_mph < 10.0
        && weather.precipitation == Precipitation::Clear;
    if ideal {
        modifier += 2.0;
    }

    if weather.temperature_f < 20.0 {
        modifier -= if ball { 4.0 } else { 2.0 };
    } else if weather.temperature_f < 32.0 {
        modifier -= if ball { 2.0 } else { 1.0 };
    } else if weather.temperature_f > 90.0 && movement {
        modifier -= 2.0;
    }

    let wind_sensitive = matches!(
        skill,
        Skill::ThrowPower
            | Skill::ThrowAccuracyMedium
            | Skill::ThrowAccuracyDeep
            | Skill::KickPower
            | Skill::KickAccuracy
    );
    if wind_sensitive && weather.wind_mph > 15.0 {
        modifier -= ((weather.wind_mph - 15.0) / 3.0).min(6.0);
    }

    match weather.precipitation {
        Precipitation::Clear => {}
        Precipitation::Rain => {
            if ball {
                modifier -= 3.0;
            } else if movement {
                modifier -= 1.0;
            }
        }
        Precipitation::Snow => {
            if ball {
                modifier -= 4.0;
            } else if movement {
                modifier -= 3.0;
            }
        }
    }

    if modifier.is_finite() {
        modifier.clamp(WEATHER_MODIFIER_MIN, WEATHER_MODIFIER_MAX)
    } else {
        0.0
    }
}

/// It-factor and clutch traits scaled by what the game is worth, ±15.
#[must_use]
pub fn clutch_modifier(player: &Player, stakes: GameStakes) -> f64 {
    let it_factor = if player.it_factor.is_finite() {
        player.it_factor.clamp(0.0, 100.0)
    } else {
        NEUTRAL_RATING
    };
    let mut raw = (it_factor - NEUTRAL_RATING) / IT_FACTOR_DIVISOR;
    if player.has_trait(HiddenTrait::Clutch) {
        raw += CLUTCH_TRAIT_BONUS;
    }
    if player.has_trait(HiddenTrait::Choker) {
        raw -= CLUTCH_TRAIT_BONUS;
    }
    (raw * stakes.clutch_multiplier()).clamp(-CLUTCH_LIMIT, CLUTCH_LIMIT)
}

fn effort_modifier(player: &Player) -> f64 {
    let mut effort = 0.0;
    if player.has_trait(HiddenTrait::Motor) {
        effort += MOTOR_BONUS;
    }
    if player.has_trait(HiddenTrait::Lazy) {
        effort -= LAZY_PENALTY;
    }
    effort
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injury::{InjurySeverity, InjuryType};
    use crate::player::{InjuryStatus, PlayerId, Position, PositionGroup};

    fn receiver(catching: f64) -> Player {
        Player::new(PlayerId(80), "Receiver", Position::Wr, PlayerRole::Possession)
            .with_skill(Skill::Catching, catching)
            .with_skill(Skill::RouteRunning, 70.0)
    }

    #[test]
    fn neutral_context_returns_true_value() {
        let weather = WeatherCondition::dome();
        let ctx = RatingContext::neutral(&weather);
        let player = receiver(77.0);
        let rating = EffectiveRatingCalculator::effective_rating(&player, Skill::Catching, &ctx);
        assert!((rating - 77.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dome_nullifies_weather() {
        let mut weather = WeatherCondition {
            temperature_f: -10.0,
            wind_mph: 45.0,
            precipitation: Precipitation::Snow,
            is_dome: true,
        };
        for skill in [Skill::Catching, Skill::Speed, Skill::ThrowAccuracyDeep, Skill::Tackling] {
            assert_eq!(calculate_weather_modifier(&weather, skill), 0.0);
        }
        weather.is_dome = false;
        assert!(calculate_weather_modifier(&weather, Skill::ThrowAccuracyDeep) < 0.0);
        assert!(calculate_weather_modifier(&weather, Skill::ThrowAccuracyDeep) >= WEATHER_MODIFIER_MIN);
    }

    #[test]
    fn injury_fatigue_and_effort_reduce_rating() {
        let weather = WeatherCondition::dome();
        let mut ctx = RatingContext::neutral(&weather);
        ctx.fatigue = 80.0;
        let mut player = receiver(80.0).with_trait(HiddenTrait::Lazy);
        player.injury = Some(InjuryStatus {
            injury_type: InjuryType::Hamstring,
            severity: InjurySeverity::Moderate,
            weeks_remaining: 1,
        });
        let breakdown = EffectiveRatingCalculator::breakdown(&player, Skill::Catching, &ctx);
        assert!((breakdown.fatigue_penalty - 3.0).abs() < f64::EPSILON);
        assert!((breakdown.effective - (80.0f64 * 0.88 - 3.0 - 3.0).round()).abs() < f64::EPSILON);
    }

    #[test]
    fn ratings_stay_bounded_at_extremes() {
        let weather = WeatherCondition {
            temperature_f: 5.0,
            wind_mph: 40.0,
            precipitation: Precipitation::Snow,
            is_dome: false,
        };
        let mut coach = Coach::new("Harsh", PositionGroup::Receiver, CoachPersonality::Disciplinarian);
        coach.quality = 0.0;
        let mut ctx = RatingContext::neutral(&weather);
        ctx.coach = Some(&coach);
        ctx.fatigue = 100.0;
        ctx.weekly_variance = -5.0;
        let mut low = receiver(1.0)
            .with_trait(HiddenTrait::Lazy)
            .with_trait(HiddenTrait::Undisciplined);
        low.morale = 0.0;
        let rating = EffectiveRatingCalculator::effective_rating(&low, Skill::Catching, &ctx);
        assert!((rating - 1.0).abs() < f64::EPSILON);

        let mut high = receiver(100.0).with_trait(HiddenTrait::Motor).with_trait(HiddenTrait::Clutch);
        high.morale = 100.0;
        high.it_factor = 100.0;
        let indoors = WeatherCondition::dome();
        let ctx = RatingContext {
            stakes: GameStakes::Championship,
            ..RatingContext::neutral(&indoors)
        };
        let rating = EffectiveRatingCalculator::effective_rating(&high, Skill::Catching, &ctx);
        assert!((rating - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn scheme_transition_penalizes_new_installs() {
        let player = receiver(90.0).with_skill(Skill::Agility, 90.0);
        let settled = scheme_fit_modifier(&player, SchemeAssignment::Offense(OffensiveScheme::WestCoast), 8);
        let fresh = scheme_fit_modifier(&player, SchemeAssignment::Offense(OffensiveScheme::WestCoast), 0);
        assert!(settled > fresh);
        assert!(settled <= SCHEME_FIT_LIMIT);
    }

    #[test]
    fn role_mismatch_costs_points() {
        let player = receiver(70.0);
        let matched = role_fit_modifier(&player, Some(PlayerRole::Possession));
        let mismatched = role_fit_modifier(&player, Some(PlayerRole::DeepThreat));
        assert!((matched - mismatched - ROLE_MISMATCH_PENALTY).abs() < f64::EPSILON);
    }

    #[test]
    fn clutch_scales_with_stakes() {
        let mut player = receiver(70.0).with_trait(HiddenTrait::Clutch);
        player.it_factor = 80.0;
        assert!(clutch_modifier(&player, GameStakes::Preseason).abs() < f64::EPSILON);
        assert!(clutch_modifier(&player, GameStakes::Championship) > clutch_modifier(&player, GameStakes::Regular));
        assert!(clutch_modifier(&player, GameStakes::Championship) <= CLUTCH_LIMIT);
    }
}
