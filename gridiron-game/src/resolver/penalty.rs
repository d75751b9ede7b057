//! Flags: how often they fly, who commits them, what they cost.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PenaltyTuning;
use crate::constants::{GOAL_LINE, LAST_FIELD_SPOT};
use crate::context::PlayCallContext;
use crate::distribution::weighted_choice;
use crate::lineup::Lineup;
use crate::play::PlayType;
use crate::player::{HiddenTrait, PlayerId, PositionGroup};
use crate::team::TeamGameState;

/// Weight multiplier for an undisciplined player when picking the culprit.
const UNDISCIPLINED_CULPRIT_WEIGHT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltySide {
    Offense,
    Defense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    FalseStart,
    Offside,
    DelayOfGame,
    OffensiveHolding,
    DefensiveHolding,
    PassInterference,
    RoughingThePasser,
    FaceMask,
    UnnecessaryRoughness,
}

impl PenaltyKind {
    pub const ALL: [Self; 9] = [
        Self::FalseStart,
        Self::Offside,
        Self::DelayOfGame,
        Self::OffensiveHolding,
        Self::DefensiveHolding,
        Self::PassInterference,
        Self::RoughingThePasser,
        Self::FaceMask,
        Self::UnnecessaryRoughness,
    ];

    #[must_use]
    pub const fn side(self) -> PenaltySide {
        match self {
            Self::FalseStart | Self::DelayOfGame | Self::OffensiveHolding => PenaltySide::Offense,
            _ => PenaltySide::Defense,
        }
    }

    #[must_use]
    pub const fn base_yards(self) -> u8 {
        match self {
            Self::FalseStart | Self::Offside | Self::DelayOfGame | Self::DefensiveHolding => 5,
            Self::OffensiveHolding => 10,
            Self::PassInterference | Self::RoughingThePasser | Self::FaceMask | Self::UnnecessaryRoughness => 15,
        }
    }

    #[must_use]
    pub const fn automatic_first_down(self) -> bool {
        matches!(
            self,
            Self::DefensiveHolding
                | Self::PassInterference
                | Self::RoughingThePasser
                | Self::FaceMask
                | Self::UnnecessaryRoughness
        )
    }

    /// Dead-ball fouls: the snap never happens.
    #[must_use]
    pub const fn is_pre_snap(self) -> bool {
        matches!(self, Self::FalseStart | Self::Offside | Self::DelayOfGame)
    }

    #[must_use]
    pub const fn pass_only(self) -> bool {
        matches!(self, Self::PassInterference | Self::RoughingThePasser)
    }

    /// Relative frequency among flags.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::FalseStart | Self::OffensiveHolding => 0.22,
            Self::Offside => 0.12,
            Self::DefensiveHolding | Self::PassInterference => 0.10,
            Self::UnnecessaryRoughness => 0.09,
            Self::DelayOfGame => 0.06,
            Self::FaceMask => 0.05,
            Self::RoughingThePasser => 0.04,
        }
    }

    /// Position groups that commit this foul. Empty means anyone on the side.
    #[must_use]
    pub const fn culprit_groups(self) -> &'static [PositionGroup] {
        match self {
            Self::FalseStart | Self::OffensiveHolding => &[PositionGroup::OffensiveLine, PositionGroup::TightEnd],
            Self::DelayOfGame => &[PositionGroup::Quarterback],
            Self::Offside | Self::RoughingThePasser => &[PositionGroup::DefensiveLine, PositionGroup::Linebacker],
            Self::DefensiveHolding | Self::PassInterference => {
                &[PositionGroup::Secondary, PositionGroup::Linebacker]
            }
            Self::FaceMask | Self::UnnecessaryRoughness => &[],
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FalseStart => "false_start",
            Self::Offside => "offside",
            Self::DelayOfGame => "delay_of_game",
            Self::OffensiveHolding => "offensive_holding",
            Self::DefensiveHolding => "defensive_holding",
            Self::PassInterference => "pass_interference",
            Self::RoughingThePasser => "roughing_the_passer",
            Self::FaceMask => "face_mask",
            Self::UnnecessaryRoughness => "unnecessary_roughness",
        }
    }
}

/// A thrown flag and its enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub kind: PenaltyKind,
    pub against: PenaltySide,
    /// Yards walked off after half-the-distance and goal-line limits.
    pub yards: u8,
    pub player: Option<PlayerId>,
    pub accepted: bool,
    pub automatic_first_down: bool,
}

impl Penalty {
    /// Accepted flag with `yards` already enforced.
    #[must_use]
    pub const fn flagged(kind: PenaltyKind, yards: u8, player: Option<PlayerId>) -> Self {
        Self {
            kind,
            against: kind.side(),
            yards,
            player,
            accepted: true,
            automatic_first_down: kind.automatic_first_down(),
        }
    }

    #[must_use]
    pub const fn declined(mut self) -> Self {
        self.accepted = false;
        self
    }
}

/// Flag rate for a snap given the undisciplined share on each side.
#[must_use]
pub fn penalty_rate(tuning: &PenaltyTuning, offense_share: f64, defense_share: f64) -> f64 {
    if !tuning.enabled {
        return 0.0;
    }
    let rate = tuning.base_rate * tuning.undisciplined_scale.mul_add(offense_share + defense_share, 1.0);
    crate::numbers::clamp_probability(rate)
}

/// Roll for a flag on this snap and pick its kind.
pub fn roll_penalty_kind<R>(
    tuning: &PenaltyTuning,
    offense_share: f64,
    defense_share: f64,
    play_type: PlayType,
    rng: &mut R,
) -> Option<PenaltyKind>
where
    R: Rng + ?Sized,
{
    let rate = penalty_rate(tuning, offense_share, defense_share);
    if rate <= 0.0 || rng.r#gen::<f64>() >= rate {
        return None;
    }
    let options: Vec<(PenaltyKind, f64)> = PenaltyKind::ALL
        .iter()
        .filter(|kind| play_type.is_pass() || !kind.pass_only())
        .map(|kind| {
            let share = match kind.side() {
                PenaltySide::Offense => offense_share,
                PenaltySide::Defense => defense_share,
            };
            (*kind, kind.weight() * tuning.undisciplined_scale.mul_add(share, 1.0))
        })
        .collect();
    weighted_choice(&options, rng)
}

/// Player flagged for `kind`, favouring undisciplined players.
pub fn pick_culprit<R>(kind: PenaltyKind, team: &TeamGameState, lineup: &Lineup, rng: &mut R) -> Option<PlayerId>
where
    R: Rng + ?Sized,
{
    let groups = kind.culprit_groups();
    let options: Vec<(PlayerId, f64)> = lineup
        .slots()
        .iter()
        .filter(|slot| groups.is_empty() || groups.contains(&slot.position.group()))
        .map(|slot| {
            let undisciplined = team
                .player(slot.player)
                .is_some_and(|player| player.has_trait(HiddenTrait::Undisciplined));
            let weight = if undisciplined { UNDISCIPLINED_CULPRIT_WEIGHT } else { 1.0 };
            (slot.player, weight)
        })
        .collect();
    weighted_choice(&options, rng)
}

/// Yards actually walked off from the line of scrimmage.
///
/// Pass interference is a spot foul (at least 15, or the throw depth).
/// Everything else is capped at half the distance to the goal being
/// approached.
#[must_use]
pub fn enforced_yards(kind: PenaltyKind, play_type: PlayType, ctx: &PlayCallContext) -> u8 {
    let start = i32::from(ctx.field_position).clamp(1, LAST_FIELD_SPOT);
    let nominal = if kind == PenaltyKind::PassInterference {
        i32::from(kind.base_yards()).max(i32::from(play_type.air_yards()))
    } else {
        i32::from(kind.base_yards())
    };
    let room = match kind.side() {
        PenaltySide::Offense => start,
        PenaltySide::Defense => GOAL_LINE - start,
    };
    let yards = if kind == PenaltyKind::PassInterference {
        nominal.min(LAST_FIELD_SPOT - start)
    } else if nominal > room / 2 {
        room / 2
    } else {
        nominal
    };
    u8::try_from(yards.max(0)).unwrap_or(u8::MAX)
}

/// Whether the non-offending side takes the flag over the play's result.
#[must_use]
pub fn accepts(penalty: &Penalty, play_yards: i32, possession_changes: bool, touchdown: bool) -> bool {
    match penalty.against {
        PenaltySide::Defense => possession_changes || (!touchdown && play_yards <= i32::from(penalty.yards)),
        PenaltySide::Offense => !possession_changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn catalogue_matches_rulebook() {
        assert_eq!(PenaltyKind::OffensiveHolding.base_yards(), 10);
        assert!(PenaltyKind::DefensiveHolding.automatic_first_down());
        assert!(!PenaltyKind::Offside.automatic_first_down());
        assert!(PenaltyKind::FalseStart.is_pre_snap());
        let total: f64 = PenaltyKind::ALL.iter().map(|kind| kind.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn half_the_distance_near_own_goal() {
        let ctx = PlayCallContext::first_and_ten_at(8);
        assert_eq!(enforced_yards(PenaltyKind::OffensiveHolding, PlayType::RunInside, &ctx), 4);
        let ctx = PlayCallContext::first_and_ten_at(96);
        assert_eq!(enforced_yards(PenaltyKind::FaceMask, PlayType::RunInside, &ctx), 2);
    }

    #[test]
    fn interference_is_spotted_but_never_a_touchdown() {
        let ctx = PlayCallContext::first_and_ten_at(40);
        assert_eq!(enforced_yards(PenaltyKind::PassInterference, PlayType::DeepPass, &ctx), 30);
        assert_eq!(enforced_yards(PenaltyKind::PassInterference, PlayType::ShortPass, &ctx), 15);
        let ctx = PlayCallContext::first_and_ten_at(90);
        assert_eq!(enforced_yards(PenaltyKind::PassInterference, PlayType::DeepPass, &ctx), 9);
    }

    #[test]
    fn acceptance_rules() {
        let defensive = Penalty::flagged(PenaltyKind::DefensiveHolding, 5, None);
        assert!(!accepts(&defensive, 12, false, false));
        assert!(accepts(&defensive, 2, false, false));
        assert!(accepts(&defensive, 12, true, false));
        assert!(!accepts(&defensive, 1, false, true));
        let offensive = Penalty::flagged(PenaltyKind::OffensiveHolding, 10, None);
        assert!(accepts(&offensive, 12, false, true));
        assert!(!accepts(&offensive, 0, true, false));
    }

    #[test]
    fn disabled_tuning_never_flags() {
        let tuning = PenaltyTuning {
            enabled: false,
            ..PenaltyTuning::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            assert!(roll_penalty_kind(&tuning, 1.0, 1.0, PlayType::DeepPass, &mut rng).is_none());
        }
    }

    #[test]
    fn run_plays_draw_no_pass_fouls() {
        let tuning = PenaltyTuning {
            base_rate: 0.5,
            ..PenaltyTuning::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut flags = 0;
        for _ in 0..2_000 {
            if let Some(kind) = roll_penalty_kind(&tuning, 0.0, 0.0, PlayType::RunInside, &mut rng) {
                flags += 1;
                assert!(!kind.pass_only());
            }
        }
        assert!(flags > 800, "flags {flags}");
    }

    #[test]
    fn undisciplined_rosters_draw_more_flags() {
        let tuning = PenaltyTuning::default();
        assert!(penalty_rate(&tuning, 0.5, 0.5) > penalty_rate(&tuning, 0.0, 0.0));
    }
}
