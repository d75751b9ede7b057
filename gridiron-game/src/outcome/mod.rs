//! Outcome tables: the central sampler.
//!
//! A table starts from a per-play-type base distribution, is bent by the
//! matchup advantage, the scheme and pass-rush modifiers and the game
//! situation, and is then normalized. Rolling a table walks its cumulative
//! probabilities for a discrete outcome and draws yardage from that
//! outcome's profile on a separate stream.
pub mod yardage;

pub use yardage::{YardRange, YardageDraw, YardageProfile, sample_yardage, yardage_profile};

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::OutcomeTuning;
use crate::context::PlayCallContext;
use crate::matchup::SchemeEffect;
use crate::play::{OutcomeBucket, PlayOutcome, PlayType};
use crate::trace::{DecisionTrace, RollValue, WeightFactor, WeightedCandidate};

/// Follow-up processing an outcome requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryEffect {
    InjuryCheck,
    BigHit,
    FatigueHigh,
    HighlightPlay,
}

pub type SecondaryEffects = SmallVec<[SecondaryEffect; 4]>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeTableEntry {
    pub outcome: PlayOutcome,
    pub probability: f64,
    pub yards: YardRange,
    pub secondary_effects: SecondaryEffects,
}

impl OutcomeTableEntry {
    #[must_use]
    pub fn has_effect(&self, effect: SecondaryEffect) -> bool {
        self.secondary_effects.contains(&effect)
    }
}

/// Normalized distribution over outcomes for one snap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeTable {
    pub play_type: PlayType,
    /// Clamped advantage in `[-1, 1]` that shaped the table.
    pub advantage: f64,
    /// Scheme yardage shift carried to yardage sampling.
    pub yards_pct: f64,
    /// Cap applied to every positive yard range.
    pub yards_to_endzone: i32,
    pub entries: Vec<OutcomeTableEntry>,
    /// Weight telemetry for every candidate, in table order.
    pub candidates: Vec<WeightedCandidate>,
}

impl OutcomeTable {
    #[must_use]
    pub fn entry(&self, outcome: PlayOutcome) -> Option<&OutcomeTableEntry> {
        self.entries.iter().find(|entry| entry.outcome == outcome)
    }

    #[must_use]
    pub fn probability(&self, outcome: PlayOutcome) -> f64 {
        self.entry(outcome).map_or(0.0, |entry| entry.probability)
    }

    #[must_use]
    pub fn total_probability(&self) -> f64 {
        self.entries.iter().map(|entry| entry.probability).sum()
    }

    #[must_use]
    pub fn bucket_probability(&self, bucket: OutcomeBucket) -> f64 {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.bucket() == bucket)
            .map(|entry| entry.probability)
            .sum()
    }

    fn incomplete_only(play_type: PlayType, advantage: f64, yards_to_endzone: i32) -> Self {
        Self {
            play_type,
            advantage,
            yards_pct: 0.0,
            yards_to_endzone,
            entries: vec![OutcomeTableEntry {
                outcome: PlayOutcome::Incomplete,
                probability: 1.0,
                yards: YardRange::new(0, 0),
                secondary_effects: SecondaryEffects::new(),
            }],
            candidates: vec![WeightedCandidate::plain(PlayOutcome::Incomplete.label(), 1.0)],
        }
    }
}

/// Structural adjustments layered on top of the rating advantage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableModifiers {
    pub scheme: SchemeEffect,
    /// Probability moved from incompletions to completions (negative moves it back).
    pub completion_shift: f64,
    pub sack_multiplier: f64,
    /// Extra completion shift on deep shots, from a credible play fake.
    pub deep_completion_bonus: f64,
}

impl TableModifiers {
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            scheme: SchemeEffect::default(),
            completion_shift: 0.0,
            sack_multiplier: 1.0,
            deep_completion_bonus: 0.0,
        }
    }
}

impl Default for TableModifiers {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Result of rolling a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolledOutcome {
    pub outcome: PlayOutcome,
    pub yards: i32,
    pub secondary_effects: SecondaryEffects,
    pub trace: DecisionTrace,
}

impl RolledOutcome {
    #[must_use]
    pub fn has_effect(&self, effect: SecondaryEffect) -> bool {
        self.secondary_effects.contains(&effect)
    }
}

/// Base distribution per play type. Each row sums to one.
#[must_use]
pub const fn base_table(play_type: PlayType) -> &'static [(PlayOutcome, f64)] {
    use PlayOutcome as O;
    match play_type {
        PlayType::RunInside => &[
            (O::Loss, 0.08),
            (O::NoGain, 0.12),
            (O::ShortGain, 0.45),
            (O::GoodGain, 0.25),
            (O::BigGain, 0.07),
            (O::Fumble, 0.015),
            (O::FumbleRecovered, 0.015),
        ],
        PlayType::RunOutside => &[
            (O::Loss, 0.12),
            (O::NoGain, 0.10),
            (O::ShortGain, 0.36),
            (O::GoodGain, 0.26),
            (O::BigGain, 0.12),
            (O::Fumble, 0.02),
            (O::FumbleRecovered, 0.02),
        ],
        PlayType::Draw => &[
            (O::Loss, 0.08),
            (O::NoGain, 0.12),
            (O::ShortGain, 0.40),
            (O::GoodGain, 0.26),
            (O::BigGain, 0.10),
            (O::Fumble, 0.02),
            (O::FumbleRecovered, 0.02),
        ],
        PlayType::QbSneak => &[
            (O::Loss, 0.03),
            (O::NoGain, 0.20),
            (O::ShortGain, 0.70),
            (O::GoodGain, 0.05),
            (O::Fumble, 0.01),
            (O::FumbleRecovered, 0.01),
        ],
        PlayType::Screen => &[
            (O::Loss, 0.12),
            (O::NoGain, 0.10),
            (O::ShortGain, 0.30),
            (O::GoodGain, 0.20),
            (O::BigGain, 0.07),
            (O::Incomplete, 0.18),
            (O::Sack, 0.01),
            (O::Interception, 0.01),
            (O::Fumble, 0.01),
        ],
        PlayType::ShortPass => &[
            (O::NoGain, 0.05),
            (O::ShortGain, 0.32),
            (O::GoodGain, 0.20),
            (O::BigGain, 0.04),
            (O::Incomplete, 0.28),
            (O::Sack, 0.06),
            (O::Interception, 0.02),
            (O::Fumble, 0.01),
            (O::Scramble, 0.02),
        ],
        PlayType::MediumPass => &[
            (O::NoGain, 0.01),
            (O::ShortGain, 0.12),
            (O::GoodGain, 0.28),
            (O::BigGain, 0.08),
            (O::Incomplete, 0.36),
            (O::Sack, 0.08),
            (O::Interception, 0.03),
            (O::Fumble, 0.01),
            (O::Scramble, 0.03),
        ],
        PlayType::DeepPass => &[
            (O::ShortGain, 0.02),
            (O::GoodGain, 0.12),
            (O::BigGain, 0.16),
            (O::Incomplete, 0.50),
            (O::Sack, 0.10),
            (O::Interception, 0.05),
            (O::Fumble, 0.01),
            (O::Scramble, 0.04),
        ],
        PlayType::PlayActionShort => &[
            (O::NoGain, 0.02),
            (O::ShortGain, 0.30),
            (O::GoodGain, 0.24),
            (O::BigGain, 0.06),
            (O::Incomplete, 0.26),
            (O::Sack, 0.07),
            (O::Interception, 0.02),
            (O::Fumble, 0.01),
            (O::Scramble, 0.02),
        ],
        PlayType::PlayActionDeep => &[
            (O::ShortGain, 0.01),
            (O::GoodGain, 0.14),
            (O::BigGain, 0.20),
            (O::Incomplete, 0.46),
            (O::Sack, 0.11),
            (O::Interception, 0.04),
            (O::Fumble, 0.01),
            (O::Scramble, 0.03),
        ],
    }
}

/// Effects every occurrence of an outcome requests, before the ambient roll.
#[must_use]
pub fn static_effects(outcome: PlayOutcome) -> SecondaryEffects {
    let mut effects = SecondaryEffects::new();
    if is_contact(outcome) {
        effects.push(SecondaryEffect::InjuryCheck);
    }
    if matches!(outcome, PlayOutcome::Sack | PlayOutcome::Fumble) {
        effects.push(SecondaryEffect::BigHit);
    }
    if matches!(outcome, PlayOutcome::BigGain | PlayOutcome::Scramble) {
        effects.push(SecondaryEffect::FatigueHigh);
    }
    if matches!(outcome, PlayOutcome::BigGain | PlayOutcome::Interception) {
        effects.push(SecondaryEffect::HighlightPlay);
    }
    effects
}

const fn is_contact(outcome: PlayOutcome) -> bool {
    !matches!(
        outcome,
        PlayOutcome::Incomplete | PlayOutcome::Interception | PlayOutcome::Scramble
    )
}

struct Working {
    outcome: PlayOutcome,
    base: f64,
    weight: f64,
    factors: Vec<WeightFactor>,
}

impl Working {
    fn scale(&mut self, label: &str, factor: f64) {
        let factor = if factor.is_finite() { factor.max(0.0) } else { 1.0 };
        if (factor - 1.0).abs() <= f64::EPSILON || self.weight <= 0.0 {
            return;
        }
        self.weight *= factor;
        self.factors.push(WeightFactor::new(label, factor));
    }

    fn set(&mut self, label: &str, weight: f64) {
        let weight = weight.max(0.0);
        if self.weight > 0.0 {
            self.factors.push(WeightFactor::new(label, weight / self.weight));
        }
        self.weight = weight;
    }
}

const fn is_completion(outcome: PlayOutcome) -> bool {
    matches!(
        outcome,
        PlayOutcome::ShortGain | PlayOutcome::GoodGain | PlayOutcome::BigGain
    )
}

/// Move `shift` probability between incompletions and completed passes,
/// completions sharing the move in proportion to their weight.
fn shift_completions(work: &mut [Working], shift: f64) {
    if shift.abs() <= f64::EPSILON || !shift.is_finite() {
        return;
    }
    let completed: f64 = work
        .iter()
        .filter(|w| is_completion(w.outcome))
        .map(|w| w.weight)
        .sum();
    let Some(incomplete) = work
        .iter()
        .find(|w| w.outcome == PlayOutcome::Incomplete)
        .map(|w| w.weight)
    else {
        return;
    };
    if completed <= 0.0 {
        return;
    }
    let moved = if shift > 0.0 {
        shift.min(incomplete)
    } else {
        -(-shift).min(completed)
    };
    for w in work.iter_mut() {
        if is_completion(w.outcome) {
            let share = w.weight / completed;
            w.set("completion", moved.mul_add(share, w.weight));
        } else if w.outcome == PlayOutcome::Incomplete {
            w.set("completion", incomplete - moved);
        }
    }
}

/// Builds and samples outcome tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutcomeTables {
    tuning: OutcomeTuning,
}

impl OutcomeTables {
    #[must_use]
    pub fn new(tuning: &OutcomeTuning) -> Self {
        Self {
            tuning: tuning.clone(),
        }
    }

    /// `clamp((off - def) / scale, -1, 1)`.
    #[must_use]
    pub fn advantage(&self, off_rating: f64, def_rating: f64) -> f64 {
        let scale = self.tuning.advantage_scale.max(f64::EPSILON);
        let delta = off_rating - def_rating;
        if !delta.is_finite() {
            return 0.0;
        }
        (delta / scale).clamp(-1.0, 1.0)
    }

    /// Build the normalized table for one snap. `rng` drives the ambient
    /// injury-check roll on outcomes that would not otherwise request one.
    pub fn generate<R>(
        &self,
        off_rating: f64,
        def_rating: f64,
        play_type: PlayType,
        ctx: &PlayCallContext,
        modifiers: &TableModifiers,
        rng: &mut R,
    ) -> OutcomeTable
    where
        R: Rng + ?Sized,
    {
        let advantage = self.advantage(off_rating, def_rating);
        let mut work: Vec<Working> = base_table(play_type)
            .iter()
            .map(|&(outcome, base)| Working {
                outcome,
                base,
                weight: base,
                factors: Vec::new(),
            })
            .collect();

        self.apply_advantage(&mut work, advantage);
        apply_modifiers(&mut work, play_type, modifiers);
        apply_situation(&mut work, play_type, ctx);

        let to_endzone = ctx.yards_to_endzone().max(1);
        let total: f64 = work.iter().map(|w| w.weight).sum();
        if !total.is_finite() || total <= 0.0 {
            log::warn!(
                "outcome table for {} collapsed (sum {total}); forcing incomplete",
                play_type.label()
            );
            return OutcomeTable::incomplete_only(play_type, advantage, to_endzone);
        }

        let mut entries = Vec::with_capacity(work.len());
        let mut candidates = Vec::with_capacity(work.len());
        for w in work {
            let probability = w.weight / total;
            let mut secondary_effects = static_effects(w.outcome);
            if w.outcome != PlayOutcome::Incomplete
                && !secondary_effects.contains(&SecondaryEffect::InjuryCheck)
                && rng.gen_bool(self.tuning.ambient_injury_check.clamp(0.0, 1.0))
            {
                secondary_effects.push(SecondaryEffect::InjuryCheck);
            }
            entries.push(OutcomeTableEntry {
                outcome: w.outcome,
                probability,
                yards: yardage_profile(w.outcome).range.capped_at(to_endzone),
                secondary_effects,
            });
            candidates.push(WeightedCandidate {
                id: w.outcome.label().to_string(),
                base_weight: w.base,
                multipliers: w.factors,
                final_weight: probability,
            });
        }
        log::trace!(
            "outcome table {} adv {advantage:.2}: {:?}",
            play_type.label(),
            entries
                .iter()
                .map(|e| (e.outcome.label(), e.probability))
                .collect::<Vec<_>>()
        );
        OutcomeTable {
            play_type,
            advantage,
            yards_pct: modifiers.scheme.yards_pct,
            yards_to_endzone: to_endzone,
            entries,
            candidates,
        }
    }

    fn apply_advantage(&self, work: &mut [Working], advantage: f64) {
        let shift = self.tuning.bucket_shift * advantage;
        for w in work.iter_mut() {
            match w.outcome.bucket() {
                OutcomeBucket::Positive => w.scale("advantage", 1.0 + shift),
                OutcomeBucket::Negative => w.scale("advantage", 1.0 - shift),
                OutcomeBucket::Neutral => {}
            }
        }
    }

    /// Cumulative-probability walk; the last entry absorbs any rounding gap.
    pub fn roll_outcome<R>(&self, table: &OutcomeTable, rng: &mut R) -> (PlayOutcome, DecisionTrace)
    where
        R: Rng + ?Sized,
    {
        let roll: f64 = rng.r#gen::<f64>();
        let mut cumulative = 0.0;
        let mut chosen = None;
        for entry in &table.entries {
            cumulative += entry.probability;
            if roll < cumulative {
                chosen = Some(entry.outcome);
                break;
            }
        }
        let outcome = chosen.unwrap_or_else(|| {
            let last = table
                .entries
                .last()
                .map_or(PlayOutcome::Incomplete, |entry| entry.outcome);
            log::warn!("roll {roll:.6} past cumulative {cumulative:.6}; taking {}", last.label());
            last
        });
        let trace = DecisionTrace {
            pool_id: format!("outcome.{}", table.play_type.label()),
            roll: RollValue::F64(roll),
            candidates: table.candidates.clone(),
            chosen_id: outcome.label().to_string(),
        };
        (outcome, trace)
    }

    /// Yardage for `outcome` within its capped range. Outcomes the table does
    /// not list (a scramble converted from a sack) use their profile range.
    pub fn sample_yards<R>(&self, table: &OutcomeTable, outcome: PlayOutcome, rng: &mut R) -> i32
    where
        R: Rng + ?Sized,
    {
        let profile = yardage_profile(outcome);
        let range = table.entry(outcome).map_or_else(
            || profile.range.capped_at(table.yards_to_endzone),
            |entry| entry.yards,
        );
        let draw = YardageDraw {
            profile,
            range,
            advantage: table.advantage,
            yards_pct: table.yards_pct,
            attempts: self.tuning.yardage_resample_attempts,
        };
        sample_yardage(&draw, rng)
    }

    /// Roll the outcome on `outcome_rng`, then its yardage on `yardage_rng`.
    pub fn roll<R1, R2>(&self, table: &OutcomeTable, outcome_rng: &mut R1, yardage_rng: &mut R2) -> RolledOutcome
    where
        R1: Rng + ?Sized,
        R2: Rng + ?Sized,
    {
        let (outcome, trace) = self.roll_outcome(table, outcome_rng);
        let yards = self.sample_yards(table, outcome, yardage_rng);
        let secondary_effects = table
            .entry(outcome)
            .map(|entry| entry.secondary_effects.clone())
            .unwrap_or_default();
        RolledOutcome {
            outcome,
            yards,
            secondary_effects,
            trace,
        }
    }
}

fn apply_modifiers(work: &mut [Working], play_type: PlayType, modifiers: &TableModifiers) {
    let scheme = modifiers.scheme;
    if play_type.is_pass() {
        let mut shift = scheme.completion_pct / 100.0 + modifiers.completion_shift;
        if matches!(play_type, PlayType::DeepPass | PlayType::PlayActionDeep) {
            shift += modifiers.deep_completion_bonus;
        }
        shift_completions(work, shift);
    }
    for w in work.iter_mut() {
        match w.outcome {
            PlayOutcome::Sack => {
                w.scale("pressure", modifiers.sack_multiplier);
                w.scale("scheme", 1.0 + scheme.sack_pct / 100.0);
            }
            PlayOutcome::Interception => w.scale("scheme", 1.0 + scheme.interception_pct / 100.0),
            PlayOutcome::Fumble => w.scale("scheme", 1.0 + scheme.fumble_pct / 100.0),
            PlayOutcome::BigGain => w.scale("scheme", 1.0 + scheme.big_play_pct / 100.0),
            _ => {}
        }
    }
}

fn apply_situation(work: &mut [Working], play_type: PlayType, ctx: &PlayCallContext) {
    for w in work.iter_mut() {
        let outcome = w.outcome;
        if ctx.is_third_and_long() {
            match outcome {
                PlayOutcome::Sack => w.scale("third_and_long", 1.2),
                PlayOutcome::Interception => w.scale("third_and_long", 1.15),
                PlayOutcome::ShortGain if play_type.is_pass() => w.scale("third_and_long", 1.1),
                PlayOutcome::GoodGain => w.scale("third_and_long", 0.9),
                _ => {}
            }
        }
        if ctx.is_fourth_down() {
            match outcome {
                PlayOutcome::NoGain | PlayOutcome::Loss => w.scale("fourth_down", 1.1),
                PlayOutcome::Interception => w.scale("fourth_down", 1.1),
                _ => {}
            }
        }
        if ctx.is_goal_line() {
            match outcome {
                PlayOutcome::BigGain => w.scale("goal_line", 0.2),
                PlayOutcome::NoGain => w.scale("goal_line", 1.3),
                PlayOutcome::Loss => w.scale("goal_line", 1.1),
                PlayOutcome::Incomplete => w.scale("goal_line", 1.1),
                _ => {}
            }
        } else if ctx.is_red_zone() {
            match outcome {
                PlayOutcome::BigGain => w.scale("red_zone", 0.5),
                PlayOutcome::Interception => w.scale("red_zone", 1.2),
                PlayOutcome::Incomplete => w.scale("red_zone", 1.1),
                _ => {}
            }
        }
        if ctx.is_backed_up() {
            match outcome {
                PlayOutcome::Loss | PlayOutcome::Fumble => w.scale("backed_up", 1.2),
                PlayOutcome::Sack => w.scale("backed_up", 1.1),
                PlayOutcome::BigGain => w.scale("backed_up", 0.9),
                _ => {}
            }
        }
    }
}
