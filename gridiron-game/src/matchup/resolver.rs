//! Index-paired one-on-one matchups rolled into a weighted advantage.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    MATCHUP_JITTER, MATCHUP_PRIMARY_WEIGHT, MATCHUP_REMAINDER_WEIGHT, MATCHUP_SECONDARY_WEIGHT,
};
use crate::numbers::usize_to_f64;
use crate::player::{PlayerId, Position};

/// One participant in a pairing, already rated for the snap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchupSide {
    pub id: PlayerId,
    pub position: Position,
    pub rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    pub offense: MatchupSide,
    pub defense: MatchupSide,
    pub margin: f64,
    pub weight: f64,
}

/// The pairing that mattered most on the snap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMatchup {
    pub offense: PlayerId,
    pub defense: PlayerId,
    pub margin: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchupAggregate {
    pub advantage: f64,
    pub pairs: Vec<PairResult>,
    pub key: Option<KeyMatchup>,
}

/// Pair weights: 40% primary, 30% secondary, remaining 30% shared.
#[must_use]
pub fn matchup_weights(pairs: usize) -> Vec<f64> {
    match pairs {
        0 => Vec::new(),
        1 => vec![1.0],
        2 => {
            let total = MATCHUP_PRIMARY_WEIGHT + MATCHUP_SECONDARY_WEIGHT;
            vec![MATCHUP_PRIMARY_WEIGHT / total, MATCHUP_SECONDARY_WEIGHT / total]
        }
        n => {
            let share = MATCHUP_REMAINDER_WEIGHT / usize_to_f64(n - 2);
            let mut weights = vec![MATCHUP_PRIMARY_WEIGHT, MATCHUP_SECONDARY_WEIGHT];
            weights.extend(std::iter::repeat_n(share, n - 2));
            weights
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchupResolver;

impl MatchupResolver {
    /// Pair `offense[i]` with `defense[i]`; extra players on either side sit out.
    pub fn resolve<R>(offense: &[MatchupSide], defense: &[MatchupSide], rng: &mut R) -> MatchupAggregate
    where
        R: Rng + ?Sized,
    {
        let count = offense.len().min(defense.len());
        let weights = matchup_weights(count);
        let mut pairs = Vec::with_capacity(count);
        let mut advantage = 0.0;
        for ((off, def), weight) in offense.iter().zip(defense).zip(weights) {
            let jitter = rng.gen_range(-MATCHUP_JITTER..=MATCHUP_JITTER);
            let margin = off.rating - def.rating + jitter;
            advantage += margin * weight;
            pairs.push(PairResult {
                offense: *off,
                defense: *def,
                margin,
                weight,
            });
        }
        let key = pairs
            .iter()
            .max_by(|a, b| {
                (a.margin.abs() * a.weight)
                    .partial_cmp(&(b.margin.abs() * b.weight))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|pair| KeyMatchup {
                offense: pair.offense.id,
                defense: pair.defense.id,
                margin: pair.margin,
                description: describe(pair),
            });
        MatchupAggregate {
            advantage,
            pairs,
            key,
        }
    }
}

fn describe(pair: &PairResult) -> String {
    let winner = if pair.margin >= 0.0 { "beats" } else { "loses to" };
    format!(
        "{} {} {} {} {} ({:+.1})",
        pair.offense.position.abbreviation(),
        pair.offense.id,
        winner,
        pair.defense.position.abbreviation(),
        pair.defense.id,
        pair.margin
    )
}
