//! Injury rolls: whether a snap injures someone and, if so, how badly.
//!
//! Each stage samples from an explicit static table. The type table is keyed
//! by position group, severity starts from a fixed five-tier split that hits,
//! fatigue and durability traits push toward the tail, and weeks out are
//! drawn uniformly from a per-type, per-severity range.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::InjuryTuning;
use crate::context::{Precipitation, WeatherCondition};
use crate::play::PlayOutcome;
use crate::player::{HiddenTrait, Player, PlayerId, PositionGroup, Skill};
use crate::trace::{DecisionTrace, RollValue, WeightFactor, WeightedCandidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryType {
    Concussion,
    Ankle,
    Knee,
    Acl,
    Achilles,
    Hamstring,
    Shoulder,
    Hand,
    Ribs,
    Back,
    Groin,
    Foot,
}

impl InjuryType {
    pub const ALL: [Self; 12] = [
        Self::Concussion,
        Self::Ankle,
        Self::Knee,
        Self::Acl,
        Self::Achilles,
        Self::Hamstring,
        Self::Shoulder,
        Self::Hand,
        Self::Ribs,
        Self::Back,
        Self::Groin,
        Self::Foot,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Concussion => "concussion",
            Self::Ankle => "ankle",
            Self::Knee => "knee",
            Self::Acl => "acl",
            Self::Achilles => "achilles",
            Self::Hamstring => "hamstring",
            Self::Shoulder => "shoulder",
            Self::Hand => "hand",
            Self::Ribs => "ribs",
            Self::Back => "back",
            Self::Groin => "groin",
            Self::Foot => "foot",
        }
    }

    /// Scales the base weeks-out window for this body part.
    const fn recovery_factor(self) -> f64 {
        match self {
            Self::Acl => 2.0,
            Self::Achilles => 1.8,
            Self::Knee => 1.3,
            Self::Back => 1.2,
            Self::Shoulder | Self::Foot => 1.1,
            Self::Ankle | Self::Hamstring => 1.0,
            Self::Groin | Self::Ribs => 0.9,
            Self::Hand | Self::Concussion => 0.8,
        }
    }

    /// Lingering skill losses this injury can leave behind.
    const fn lingering_skills(self) -> &'static [Skill] {
        match self {
            Self::Acl => &[Skill::Speed, Skill::Agility],
            Self::Achilles => &[Skill::Speed, Skill::Acceleration],
            Self::Knee | Self::Ankle => &[Skill::Agility],
            Self::Hamstring | Self::Foot => &[Skill::Speed],
            Self::Shoulder => &[Skill::Strength, Skill::ThrowPower],
            Self::Back => &[Skill::Strength],
            Self::Concussion => &[Skill::Awareness],
            Self::Hand => &[Skill::Catching],
            Self::Ribs | Self::Groin => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjurySeverity {
    Minor,
    Moderate,
    Major,
    Severe,
    SeasonEnding,
}

impl InjurySeverity {
    pub const ALL: [Self; 5] = [
        Self::Minor,
        Self::Moderate,
        Self::Major,
        Self::Severe,
        Self::SeasonEnding,
    ];

    /// Rating multiplier for a player who suits up while carrying this injury.
    #[must_use]
    pub const fn performance_multiplier(self) -> f64 {
        match self {
            Self::Minor => 0.95,
            Self::Moderate => 0.88,
            Self::Major => 0.80,
            Self::Severe => 0.70,
            Self::SeasonEnding => 0.50,
        }
    }

    #[must_use]
    pub const fn allows_permanent_effects(self) -> bool {
        matches!(self, Self::Severe | Self::SeasonEnding)
    }

    const fn base_weeks(self) -> (f64, f64) {
        match self {
            Self::Minor => (0.0, 1.0),
            Self::Moderate => (1.0, 3.0),
            Self::Major => (3.0, 6.0),
            Self::Severe => (6.0, 12.0),
            Self::SeasonEnding => (12.0, 20.0),
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Major => "major",
            Self::Severe => "severe",
            Self::SeasonEnding => "season_ending",
        }
    }
}

/// Inclusive range of weeks a player can miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeksRange {
    pub min: u8,
    pub max: u8,
}

impl WeeksRange {
    #[must_use]
    pub const fn contains(&self, weeks: u8) -> bool {
        weeks >= self.min && weeks <= self.max
    }
}

/// Declared weeks-out window for a type and severity.
#[must_use]
pub fn weeks_out_range(injury_type: InjuryType, severity: InjurySeverity) -> WeeksRange {
    let (base_min, base_max) = severity.base_weeks();
    let factor = injury_type.recovery_factor();
    let min = crate::numbers::round_f64_to_u8((base_min * factor).floor());
    let max = crate::numbers::round_f64_to_u8((base_max * factor).ceil()).max(min);
    WeeksRange { min, max }
}

/// Permanent skill loss left by a serious injury.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PermanentEffect {
    pub skill: Skill,
    pub penalty: f64,
}

/// A sampled injury.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injury {
    pub player: PlayerId,
    pub injury_type: InjuryType,
    pub severity: InjurySeverity,
    pub weeks_out: u8,
    #[serde(default)]
    pub permanent_effects: Vec<PermanentEffect>,
}

/// Everything the injury roll needs to know about one involved player.
#[derive(Debug, Clone, Copy)]
pub struct InjuryRiskInput<'a> {
    pub player: &'a Player,
    pub outcome: PlayOutcome,
    pub big_hit: bool,
    pub fatigue: f64,
    pub weather: &'a WeatherCondition,
    /// Risk multiplier derived from the player's usage curve.
    pub usage_risk: f64,
}

/// Base injury probability for an involved player by outcome.
#[must_use]
pub const fn base_injury_probability(outcome: PlayOutcome) -> f64 {
    match outcome {
        PlayOutcome::Incomplete => 0.002,
        PlayOutcome::ShortGain | PlayOutcome::Interception => 0.004,
        PlayOutcome::NoGain | PlayOutcome::GoodGain => 0.005,
        PlayOutcome::Loss | PlayOutcome::Scramble => 0.006,
        PlayOutcome::BigGain | PlayOutcome::FumbleRecovered => 0.008,
        PlayOutcome::Fumble => 0.010,
        PlayOutcome::Sack => 0.012,
    }
}

const fn fatigue_tier_multiplier(fatigue: f64) -> f64 {
    if fatigue >= 85.0 {
        2.0
    } else if fatigue >= 70.0 {
        1.5
    } else if fatigue >= 50.0 {
        1.2
    } else {
        1.0
    }
}

fn weather_multiplier(weather: &WeatherCondition) -> f64 {
    if weather.is_dome {
        return 1.0;
    }
    let mut multiplier = 1.0;
    if weather.temperature_f < 32.0 {
        multiplier *= 1.15;
    }
    if weather.precipitation != Precipitation::Clear {
        multiplier *= 1.1;
    }
    multiplier
}

fn type_weights(group: PositionGroup) -> &'static [(InjuryType, f64)] {
    use InjuryType::{
        Achilles, Acl, Ankle, Back, Concussion, Foot, Groin, Hamstring, Hand, Knee, Ribs,
        Shoulder,
    };
    match group {
        PositionGroup::Quarterback => &[
            (Shoulder, 25.0),
            (Concussion, 15.0),
            (Ankle, 15.0),
            (Knee, 12.0),
            (Hand, 10.0),
            (Ribs, 10.0),
            (Back, 5.0),
            (Acl, 3.0),
            (Hamstring, 3.0),
            (Achilles, 1.0),
            (Groin, 1.0),
        ],
        PositionGroup::RunningBack => &[
            (Ankle, 18.0),
            (Knee, 15.0),
            (Hamstring, 15.0),
            (Shoulder, 10.0),
            (Concussion, 8.0),
            (Ribs, 8.0),
            (Foot, 7.0),
            (Acl, 6.0),
            (Groin, 5.0),
            (Achilles, 3.0),
            (Back, 3.0),
            (Hand, 2.0),
        ],
        PositionGroup::Receiver => &[
            (Hamstring, 22.0),
            (Ankle, 16.0),
            (Knee, 10.0),
            (Concussion, 10.0),
            (Hand, 10.0),
            (Shoulder, 8.0),
            (Groin, 7.0),
            (Foot, 6.0),
            (Acl, 5.0),
            (Ribs, 4.0),
            (Achilles, 2.0),
        ],
        PositionGroup::TightEnd => &[
            (Ankle, 15.0),
            (Knee, 14.0),
            (Shoulder, 14.0),
            (Hamstring, 12.0),
            (Concussion, 10.0),
            (Back, 8.0),
            (Hand, 8.0),
            (Ribs, 8.0),
            (Acl, 5.0),
            (Foot, 4.0),
            (Achilles, 2.0),
        ],
        PositionGroup::OffensiveLine => &[
            (Knee, 20.0),
            (Ankle, 18.0),
            (Back, 14.0),
            (Shoulder, 14.0),
            (Hand, 10.0),
            (Foot, 8.0),
            (Concussion, 6.0),
            (Acl, 4.0),
            (Achilles, 3.0),
            (Groin, 3.0),
        ],
        PositionGroup::DefensiveLine => &[
            (Knee, 16.0),
            (Ankle, 16.0),
            (Shoulder, 16.0),
            (Hand, 12.0),
            (Back, 10.0),
            (Concussion, 7.0),
            (Groin, 6.0),
            (Foot, 6.0),
            (Acl, 4.0),
            (Achilles, 4.0),
            (Ribs, 3.0),
        ],
        PositionGroup::Linebacker => &[
            (Knee, 15.0),
            (Ankle, 14.0),
            (Shoulder, 14.0),
            (Concussion, 12.0),
            (Hamstring, 12.0),
            (Acl, 6.0),
            (Groin, 6.0),
            (Ribs, 5.0),
            (Back, 5.0),
            (Hand, 5.0),
            (Achilles, 4.0),
        ],
        PositionGroup::Secondary => &[
            (Hamstring, 20.0),
            (Ankle, 15.0),
            (Concussion, 12.0),
            (Knee, 12.0),
            (Groin, 9.0),
            (Shoulder, 8.0),
            (Acl, 6.0),
            (Foot, 6.0),
            (Hand, 5.0),
            (Ribs, 4.0),
            (Achilles, 3.0),
        ],
        PositionGroup::Specialist => &[
            (Groin, 30.0),
            (Hamstring, 25.0),
            (Back, 15.0),
            (Ankle, 15.0),
            (Knee, 10.0),
            (Foot, 5.0),
        ],
    }
}

fn base_severity_weights(injury_type: InjuryType) -> [f64; 5] {
    match injury_type {
        InjuryType::Acl => [0.0, 0.0, 10.0, 40.0, 50.0],
        InjuryType::Achilles => [0.0, 0.0, 15.0, 45.0, 40.0],
        InjuryType::Concussion => [40.0, 35.0, 17.0, 6.0, 2.0],
        InjuryType::Hand => [55.0, 30.0, 12.0, 3.0, 0.0],
        _ => [50.0, 28.0, 14.0, 6.0, 2.0],
    }
}

/// Injury state machine: probability, type, severity, duration, lingering effects.
#[derive(Debug, Clone, Copy)]
pub struct InjuryProcessor<'a> {
    tuning: &'a InjuryTuning,
}

impl<'a> InjuryProcessor<'a> {
    #[must_use]
    pub const fn new(tuning: &'a InjuryTuning) -> Self {
        Self { tuning }
    }

    /// Probability that this snap injures the player, capped by configuration.
    #[must_use]
    pub fn injury_probability(&self, input: &InjuryRiskInput<'_>) -> f64 {
        let probability = probability_factors(input)
            .iter()
            .fold(self.tuning.scale, |acc, factor| acc * factor.value);
        crate::numbers::clamp_probability(probability).min(self.tuning.probability_cap)
    }

    /// Roll for an injury and, on a hit, sample its full description.
    pub fn check<R>(&self, input: &InjuryRiskInput<'_>, rng: &mut R) -> Option<Injury>
    where
        R: Rng + ?Sized,
    {
        let probability = self.injury_probability(input);
        let roll = rng.r#gen::<f64>();
        if roll >= probability {
            return None;
        }
        let player = input.player;
        let (injury_type, trace) = sample_injury_type(player.position.group(), rng);
        log::trace!(
            "injury type pool {} picked {} for {}",
            trace.pool_id,
            trace.chosen_id,
            player.id
        );
        let severity = sample_severity(
            injury_type,
            &SeverityFactors {
                big_hit: input.big_hit,
                fatigue: input.fatigue,
                injury_prone: player.has_trait(HiddenTrait::InjuryProne),
                iron_man: player.has_trait(HiddenTrait::IronMan),
            },
            rng,
        );
        let weeks_out = sample_weeks_out(injury_type, severity, rng);
        let permanent_effects = sample_permanent_effects(injury_type, severity, rng);
        log::debug!(
            "injury: {} {} {} ({} weeks, p={probability:.4})",
            player.id,
            severity.key(),
            injury_type.key(),
            weeks_out
        );
        Some(Injury {
            player: player.id,
            injury_type,
            severity,
            weeks_out,
            permanent_effects,
        })
    }
}

/// Inputs that push severity toward the tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityFactors {
    pub big_hit: bool,
    pub fatigue: f64,
    pub injury_prone: bool,
    pub iron_man: bool,
}

impl SeverityFactors {
    fn shift(&self) -> f64 {
        let mut shift = 1.0;
        if self.big_hit {
            shift *= 1.3;
        }
        if self.fatigue >= 70.0 {
            shift *= 1.2;
        }
        if self.injury_prone {
            shift *= 1.3;
        }
        if self.iron_man {
            shift *= 0.8;
        }
        shift
    }
}

/// Pick an injury type from the position group's table.
pub fn sample_injury_type<R>(group: PositionGroup, rng: &mut R) -> (InjuryType, DecisionTrace)
where
    R: Rng + ?Sized,
{
    let weights = type_weights(group);
    let total: f64 = weights.iter().map(|(_, weight)| weight).sum();
    let roll = rng.r#gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut chosen = weights.last().map_or(InjuryType::Ankle, |(kind, _)| *kind);
    for (kind, weight) in weights {
        cumulative += weight;
        if roll < cumulative {
            chosen = *kind;
            break;
        }
    }
    let trace = DecisionTrace {
        pool_id: format!("injury.type.{group:?}"),
        roll: RollValue::F64(roll),
        candidates: weights
            .iter()
            .map(|(kind, weight)| WeightedCandidate::plain(kind.key(), *weight))
            .collect(),
        chosen_id: chosen.key().to_string(),
    };
    (chosen, trace)
}

/// Severity weights after applying hit, fatigue and durability shifts.
#[must_use]
pub fn severity_weights(injury_type: InjuryType, factors: &SeverityFactors) -> [f64; 5] {
    let mut weights = base_severity_weights(injury_type);
    let shift = factors.shift();
    weights[0] /= shift;
    for weight in &mut weights[2..] {
        *weight *= shift;
    }
    weights
}

pub fn sample_severity<R>(injury_type: InjuryType, factors: &SeverityFactors, rng: &mut R) -> InjurySeverity
where
    R: Rng + ?Sized,
{
    let weights = severity_weights(injury_type, factors);
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return InjurySeverity::Minor;
    }
    let roll = rng.r#gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (severity, weight) in InjurySeverity::ALL.iter().zip(weights) {
        cumulative += weight;
        if roll < cumulative {
            return *severity;
        }
    }
    InjurySeverity::SeasonEnding
}

pub fn sample_weeks_out<R>(injury_type: InjuryType, severity: InjurySeverity, rng: &mut R) -> u8
where
    R: Rng + ?Sized,
{
    let range = weeks_out_range(injury_type, severity);
    rng.gen_range(range.min..=range.max)
}

pub fn sample_permanent_effects<R>(
    injury_type: InjuryType,
    severity: InjurySeverity,
    rng: &mut R,
) -> Vec<PermanentEffect>
where
    R: Rng + ?Sized,
{
    if !severity.allows_permanent_effects() {
        return Vec::new();
    }
    let skills = injury_type.lingering_skills();
    let (chance, penalty_range) = match severity {
        InjurySeverity::SeasonEnding => (1.0, 4.0_f64..=8.0),
        _ => (0.5, 2.0_f64..=4.0),
    };
    let mut effects = Vec::new();
    for (index, skill) in skills.iter().enumerate() {
        let skill_chance = if index == 0 { chance } else { chance * 0.35 };
        if rng.r#gen::<f64>() < skill_chance {
            effects.push(PermanentEffect {
                skill: *skill,
                penalty: rng.gen_range(penalty_range.clone()).round(),
            });
        }
    }
    effects
}

/// Named multiplicative factors behind [`InjuryProcessor::injury_probability`],
/// starting with the outcome's base rate. Tuning scale and cap are applied after.
#[must_use]
pub fn probability_factors(input: &InjuryRiskInput<'_>) -> Vec<WeightFactor> {
    let player = input.player;
    let mut factors = vec![WeightFactor::new("base", base_injury_probability(input.outcome))];
    if input.big_hit {
        factors.push(WeightFactor::new("big_hit", 2.0));
    }
    factors.push(WeightFactor::new("fatigue", fatigue_tier_multiplier(input.fatigue)));
    factors.push(WeightFactor::new("weather", weather_multiplier(input.weather)));
    if player.has_trait(HiddenTrait::IronMan) {
        factors.push(WeightFactor::new("iron_man", 0.6));
    }
    if player.has_trait(HiddenTrait::InjuryProne) {
        factors.push(WeightFactor::new("injury_prone", 1.8));
    }
    if player.age > 30 {
        factors.push(WeightFactor::new("age", 0.05f64.mul_add(f64::from(player.age - 30), 1.0)));
    }
    if player.injury.is_some() {
        factors.push(WeightFactor::new("playing_hurt", 1.5));
    }
    if input.usage_risk.is_finite() {
        factors.push(WeightFactor::new("usage", input.usage_risk.max(1.0)));
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerRole, Position};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn runner() -> Player {
        Player::new(PlayerId(22), "Runner", Position::Rb, PlayerRole::FeatureBack)
    }

    #[test]
    fn weeks_out_respects_declared_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for injury_type in InjuryType::ALL {
            for severity in InjurySeverity::ALL {
                let range = weeks_out_range(injury_type, severity);
                assert!(range.min <= range.max);
                for _ in 0..50 {
                    let weeks = sample_weeks_out(injury_type, severity, &mut rng);
                    assert!(range.contains(weeks), "{injury_type:?} {severity:?} {weeks}");
                }
            }
        }
    }

    #[test]
    fn permanent_effects_only_for_serious_tiers() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            for severity in [InjurySeverity::Minor, InjurySeverity::Moderate, InjurySeverity::Major] {
                assert!(sample_permanent_effects(InjuryType::Acl, severity, &mut rng).is_empty());
            }
        }
        let season_ending = sample_permanent_effects(InjuryType::Acl, InjurySeverity::SeasonEnding, &mut rng);
        assert!(!season_ending.is_empty());
    }

    #[test]
    fn acl_skews_severe() {
        let weights = severity_weights(InjuryType::Acl, &SeverityFactors::default());
        assert!(weights[0].abs() < f64::EPSILON);
        assert!(weights[4] > weights[2]);
    }

    #[test]
    fn hits_and_fatigue_raise_probability_under_cap() {
        let tuning = InjuryTuning::default();
        let processor = InjuryProcessor::new(&tuning);
        let player = runner();
        let weather = WeatherCondition::fair();
        let calm = InjuryRiskInput {
            player: &player,
            outcome: PlayOutcome::ShortGain,
            big_hit: false,
            fatigue: 10.0,
            weather: &weather,
            usage_risk: 1.0,
        };
        let rough = InjuryRiskInput {
            big_hit: true,
            fatigue: 90.0,
            ..calm
        };
        let p_calm = processor.injury_probability(&calm);
        let p_rough = processor.injury_probability(&rough);
        assert!(p_rough > p_calm);
        assert!(p_rough <= tuning.probability_cap);
    }

    #[test]
    fn probability_is_the_product_of_named_factors() {
        let tuning = InjuryTuning::default();
        let processor = InjuryProcessor::new(&tuning);
        let weather = WeatherCondition::fair();
        let mut veteran = runner().with_trait(HiddenTrait::InjuryProne);
        veteran.age = 33;
        let input = InjuryRiskInput {
            player: &veteran,
            outcome: PlayOutcome::ShortGain,
            big_hit: true,
            fatigue: 40.0,
            weather: &weather,
            usage_risk: 1.2,
        };
        let factors = probability_factors(&input);
        let labels: Vec<&str> = factors.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["base", "big_hit", "fatigue", "weather", "injury_prone", "age", "usage"]);
        let product: f64 = factors.iter().map(|f| f.value).product::<f64>() * tuning.scale;
        let expected = product.min(tuning.probability_cap);
        assert!((processor.injury_probability(&input) - expected).abs() < 1e-12);
    }

    #[test]
    fn iron_man_lowers_probability() {
        let tuning = InjuryTuning::default();
        let processor = InjuryProcessor::new(&tuning);
        let weather = WeatherCondition::dome();
        let plain = runner();
        let durable = runner().with_trait(HiddenTrait::IronMan);
        let input = |player| InjuryRiskInput {
            player,
            outcome: PlayOutcome::Sack,
            big_hit: false,
            fatigue: 0.0,
            weather: &weather,
            usage_risk: 1.0,
        };
        assert!(processor.injury_probability(&input(&durable)) < processor.injury_probability(&input(&plain)));
    }

    #[test]
    fn forced_roll_produces_consistent_injury() {
        let tuning = InjuryTuning {
            scale: 10.0,
            probability_cap: 1.0,
        };
        let processor = InjuryProcessor::new(&tuning);
        let player = runner().with_trait(HiddenTrait::InjuryProne);
        let weather = WeatherCondition::fair();
        let input = InjuryRiskInput {
            player: &player,
            outcome: PlayOutcome::Sack,
            big_hit: true,
            fatigue: 95.0,
            weather: &weather,
            usage_risk: 3.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut seen = 0;
        for _ in 0..100 {
            if let Some(injury) = processor.check(&input, &mut rng) {
                seen += 1;
                assert_eq!(injury.player, PlayerId(22));
                let range = weeks_out_range(injury.injury_type, injury.severity);
                assert!(range.contains(injury.weeks_out));
                if !injury.severity.allows_permanent_effects() {
                    assert!(injury.permanent_effects.is_empty());
                }
            }
        }
        assert!(seen > 0);
    }
}
