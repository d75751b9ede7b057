//! Unit-level aggregation with weak-link detection.
//!
//! A unit is only as strong as the player the opponent chooses to attack.
//! The weighted unit average is reduced by a tiered share of the gap down to
//! its weakest member, scaled per unit: coverage and run defense are punished
//! hardest, receiving corps least because the ball can go elsewhere.
use serde::{Deserialize, Serialize};

use crate::constants::{
    WEAK_LINK_MILD_RATE, WEAK_LINK_MODERATE_GAP, WEAK_LINK_MODERATE_RATE, WEAK_LINK_SEVERE_GAP,
    WEAK_LINK_SEVERE_RATE,
};
use crate::context::PlayCallContext;
use crate::lineup::Lineup;
use crate::numbers::{NEUTRAL_RATING, clamp_rating, usize_to_f64};
use crate::play::RunDirection;
use crate::player::{PlayerId, Position, PositionGroup, Skill};
use crate::ratings::effective::{EffectiveRatingCalculator, RatingContext};
use crate::ratings::weights::PositionWeightTables;
use crate::team::TeamGameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    PassProtection,
    RunBlocking,
    Receiving,
    Rushing,
    PassRush,
    RunStopping,
    PassCoverage,
}

impl UnitKind {
    pub const ALL: [Self; 7] = [
        Self::PassProtection,
        Self::RunBlocking,
        Self::Receiving,
        Self::Rushing,
        Self::PassRush,
        Self::RunStopping,
        Self::PassCoverage,
    ];

    /// Skills blended into each member's unit rating.
    #[must_use]
    pub const fn skill_mix(self) -> &'static [(Skill, f64)] {
        match self {
            Self::PassProtection => &[(Skill::PassBlock, 0.7), (Skill::Strength, 0.15), (Skill::Awareness, 0.15)],
            Self::RunBlocking => &[(Skill::RunBlock, 0.7), (Skill::Strength, 0.2), (Skill::Awareness, 0.1)],
            Self::Receiving => &[
                (Skill::Catching, 0.35),
                (Skill::RouteRunning, 0.35),
                (Skill::Release, 0.1),
                (Skill::Speed, 0.2),
            ],
            Self::Rushing => &[
                (Skill::BallCarrierVision, 0.25),
                (Skill::Elusiveness, 0.2),
                (Skill::BreakTackle, 0.2),
                (Skill::Speed, 0.2),
                (Skill::Carrying, 0.15),
            ],
            Self::PassRush => &[
                (Skill::PassRush, 0.6),
                (Skill::BlockShedding, 0.2),
                (Skill::Acceleration, 0.1),
                (Skill::Strength, 0.1),
            ],
            Self::RunStopping => &[
                (Skill::BlockShedding, 0.35),
                (Skill::Tackling, 0.35),
                (Skill::Pursuit, 0.15),
                (Skill::PlayRecognition, 0.15),
            ],
            Self::PassCoverage => &[
                (Skill::ManCoverage, 0.35),
                (Skill::ZoneCoverage, 0.35),
                (Skill::Speed, 0.15),
                (Skill::PlayRecognition, 0.15),
            ],
        }
    }

    /// Fewest members for a meaningful aggregate.
    #[must_use]
    pub const fn minimum_players(self) -> usize {
        match self {
            Self::PassProtection | Self::RunBlocking => 5,
            Self::Receiving => 2,
            Self::Rushing => 1,
            Self::PassRush => 3,
            Self::RunStopping | Self::PassCoverage => 4,
        }
    }

    /// How hard a weak member drags this unit down.
    #[must_use]
    pub const fn weak_link_multiplier(self) -> f64 {
        match self {
            Self::PassCoverage => 1.3,
            Self::RunStopping => 1.2,
            Self::PassProtection => 1.1,
            Self::RunBlocking => 1.0,
            Self::PassRush => 0.8,
            Self::Rushing => 0.7,
            Self::Receiving => 0.6,
        }
    }

    /// Positions that contribute to the unit.
    #[must_use]
    pub const fn includes(self, position: Position) -> bool {
        match self {
            Self::PassProtection => matches!(
                position.group(),
                PositionGroup::OffensiveLine | PositionGroup::TightEnd | PositionGroup::RunningBack
            ),
            Self::RunBlocking => {
                matches!(
                    position.group(),
                    PositionGroup::OffensiveLine | PositionGroup::TightEnd | PositionGroup::Receiver
                ) || matches!(position, Position::Fb)
            }
            Self::Receiving => matches!(
                position.group(),
                PositionGroup::Receiver | PositionGroup::TightEnd | PositionGroup::RunningBack
            ),
            Self::Rushing => matches!(position.group(), PositionGroup::RunningBack),
            Self::PassRush => {
                matches!(position.group(), PositionGroup::DefensiveLine) || matches!(position, Position::Olb)
            }
            Self::RunStopping => {
                matches!(position.group(), PositionGroup::DefensiveLine | PositionGroup::Linebacker)
                    || matches!(position, Position::Ss)
            }
            Self::PassCoverage => {
                matches!(position.group(), PositionGroup::Secondary | PositionGroup::Linebacker)
            }
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PassProtection => "pass_protection",
            Self::RunBlocking => "run_blocking",
            Self::Receiving => "receiving",
            Self::Rushing => "rushing",
            Self::PassRush => "pass_rush",
            Self::RunStopping => "run_stopping",
            Self::PassCoverage => "pass_coverage",
        }
    }
}

/// One member's contribution to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatedPlayer {
    pub id: PlayerId,
    pub position: Position,
    pub rating: f64,
}

/// Aggregated unit strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitRating {
    pub average: f64,
    pub weighted_average: f64,
    pub floor: f64,
    pub weak_link_position: Option<Position>,
    pub weak_link_player: Option<PlayerId>,
    pub weak_link_penalty: f64,
    pub effective: f64,
}

impl UnitRating {
    /// Neutral 50 with no penalty, used for degenerate units.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            average: NEUTRAL_RATING,
            weighted_average: NEUTRAL_RATING,
            floor: NEUTRAL_RATING,
            weak_link_position: None,
            weak_link_player: None,
            weak_link_penalty: 0.0,
            effective: NEUTRAL_RATING,
        }
    }
}

/// Share of the average-to-floor gap lost to the weak link, before the unit multiplier.
#[must_use]
pub fn weak_link_rate(gap: f64) -> f64 {
    if gap > WEAK_LINK_SEVERE_GAP {
        WEAK_LINK_SEVERE_RATE
    } else if gap > WEAK_LINK_MODERATE_GAP {
        WEAK_LINK_MODERATE_RATE
    } else {
        WEAK_LINK_MILD_RATE
    }
}

/// Penalty points for a gap between weighted average and floor.
#[must_use]
pub fn weak_link_penalty(unit: UnitKind, gap: f64) -> f64 {
    if !gap.is_finite() || gap <= 0.0 {
        return 0.0;
    }
    gap * weak_link_rate(gap) * unit.weak_link_multiplier()
}

/// Unit aggregator bound to a set of position weights.
#[derive(Debug, Clone, Copy)]
pub struct TeamCompositeRatings<'a> {
    weights: &'a PositionWeightTables,
}

impl<'a> TeamCompositeRatings<'a> {
    #[must_use]
    pub const fn new(weights: &'a PositionWeightTables) -> Self {
        Self { weights }
    }

    #[must_use]
    pub const fn weights(&self) -> &'a PositionWeightTables {
        self.weights
    }

    /// Aggregate with the unit's standard weights (direction-aware for run blocking).
    #[must_use]
    pub fn aggregate(&self, unit: UnitKind, players: &[RatedPlayer], direction: Option<RunDirection>) -> UnitRating {
        let weights = self.weights;
        match (unit, direction) {
            (UnitKind::RunBlocking, Some(direction)) => {
                aggregate_with(unit, players, |position| weights.run_blocking_weight(direction, position))
            }
            _ => aggregate_with(unit, players, |position| weights.unit_weight(unit, position)),
        }
    }

    /// Rate every lineup member belonging to `unit` and aggregate.
    #[must_use]
    pub fn rate_lineup(
        &self,
        unit: UnitKind,
        team: &TeamGameState,
        lineup: &Lineup,
        ctx: &PlayCallContext,
        direction: Option<RunDirection>,
    ) -> UnitRating {
        let members = rate_members(unit, team, lineup, ctx);
        self.aggregate(unit, &members, direction)
    }
}

/// Effective unit ratings for the lineup members that belong to `unit`.
#[must_use]
pub fn rate_members(unit: UnitKind, team: &TeamGameState, lineup: &Lineup, ctx: &PlayCallContext) -> Vec<RatedPlayer> {
    lineup
        .slots()
        .iter()
        .filter(|slot| unit.includes(slot.position))
        .filter_map(|slot| {
            let player = team.player(slot.player)?;
            let rating_ctx = RatingContext::for_player(team, player, ctx);
            Some(RatedPlayer {
                id: slot.player,
                position: slot.position,
                rating: EffectiveRatingCalculator::blended_rating(player, unit.skill_mix(), &rating_ctx),
            })
        })
        .collect()
}

/// Aggregate with an arbitrary position-weight function.
pub fn aggregate_with<F>(unit: UnitKind, players: &[RatedPlayer], weight_of: F) -> UnitRating
where
    F: Fn(Position) -> f64,
{
    if players.len() < unit.minimum_players() {
        log::warn!(
            "{} has {} of {} required players; using neutral rating",
            unit.key(),
            players.len(),
            unit.minimum_players()
        );
        return UnitRating::neutral();
    }

    let mut weight_total = 0.0;
    let mut weighted_sum = 0.0;
    let mut plain_sum = 0.0;
    let mut weakest: Option<(&RatedPlayer, f64)> = None;
    for member in players {
        let rating = clamp_rating(member.rating);
        let weight = weight_of(member.position).max(0.0);
        plain_sum += rating;
        weight_total += weight;
        weighted_sum += rating * weight;
        if weight <= 0.0 {
            continue;
        }
        let replace = match weakest {
            None => true,
            Some((current, current_weight)) => {
                let current_rating = clamp_rating(current.rating);
                rating < current_rating || (rating == current_rating && weight > current_weight)
            }
        };
        if replace {
            weakest = Some((member, weight));
        }
    }

    let average = plain_sum / usize_to_f64(players.len());
    let (Some((weak, _)), true) = (weakest, weight_total > 0.0) else {
        return UnitRating {
            average,
            ..UnitRating::neutral()
        };
    };
    let weighted_average = weighted_sum / weight_total;
    let floor = clamp_rating(weak.rating);
    let penalty = weak_link_penalty(unit, weighted_average - floor);
    let effective = clamp_rating(weighted_average - penalty);
    log::trace!(
        "{}: avg {average:.1} weighted {weighted_average:.1} floor {floor:.1} ({}) penalty {penalty:.2}",
        unit.key(),
        weak.position.abbreviation()
    );
    UnitRating {
        average,
        weighted_average,
        floor,
        weak_link_position: Some(weak.position),
        weak_link_player: Some(weak.id),
        weak_link_penalty: penalty,
        effective,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(ratings: [f64; 5]) -> Vec<RatedPlayer> {
        Position::OFFENSIVE_LINE
            .iter()
            .zip(ratings)
            .enumerate()
            .map(|(index, (position, rating))| RatedPlayer {
                id: PlayerId(60 + u32::try_from(index).unwrap()),
                position: *position,
                rating,
            })
            .collect()
    }

    #[test]
    fn too_few_players_is_neutral() {
        let tables = PositionWeightTables::flat();
        let composite = TeamCompositeRatings::new(&tables);
        let rating = composite.aggregate(UnitKind::PassProtection, &line([70.0; 5])[..3], None);
        assert_eq!(rating, UnitRating::neutral());
    }

    #[test]
    fn weak_left_tackle_is_flagged() {
        let tables = PositionWeightTables::embedded();
        let composite = TeamCompositeRatings::new(tables);
        let rating = composite.aggregate(UnitKind::PassProtection, &line([45.0, 80.0, 80.0, 80.0, 80.0]), None);
        assert_eq!(rating.weak_link_position, Some(Position::Lt));
        assert!((rating.floor - 45.0).abs() < f64::EPSILON);
        assert!(rating.weak_link_penalty > 0.0);
        assert!(rating.effective < rating.weighted_average);
    }

    #[test]
    fn uniform_unit_has_no_penalty() {
        let tables = PositionWeightTables::embedded();
        let composite = TeamCompositeRatings::new(tables);
        let rating = composite.aggregate(UnitKind::RunBlocking, &line([72.0; 5]), Some(RunDirection::Left));
        assert!(rating.weak_link_penalty.abs() < 1e-9);
        assert!((rating.effective - 72.0).abs() < 1e-9);
    }

    #[test]
    fn penalty_tiers_apply_per_gap() {
        assert!((weak_link_penalty(UnitKind::RunBlocking, 8.0) - 1.2).abs() < 1e-9);
        assert!((weak_link_penalty(UnitKind::RunBlocking, 15.0) - 4.5).abs() < 1e-9);
        assert!((weak_link_penalty(UnitKind::RunBlocking, 30.0) - 15.0).abs() < 1e-9);
        assert!(weak_link_penalty(UnitKind::PassCoverage, 15.0) > weak_link_penalty(UnitKind::Receiving, 15.0));
    }
}
