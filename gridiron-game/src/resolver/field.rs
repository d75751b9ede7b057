//! Down, distance and field-position bookkeeping after a snap.
//!
//! Field position is always measured from the offense's own goal line
//! (1..=99). When possession changes the new position is reported from the
//! new offense's side.
use serde::{Deserialize, Serialize};

use super::penalty::{Penalty, PenaltySide};
use crate::constants::{GOAL_LINE, LAST_FIELD_SPOT};
use crate::context::PlayCallContext;
use crate::play::{PlayOutcome, PlayType};

const FIRST_DOWN_DISTANCE: i32 = 10;

/// New spot and series state produced by one snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOutcome {
    /// Yards credited to the play after goal-line capping.
    pub yards: i32,
    pub new_down: u8,
    pub new_distance: u8,
    pub new_field_position: u8,
    pub first_down: bool,
    pub touchdown: bool,
    pub safety: bool,
    pub turnover: bool,
    pub turnover_on_downs: bool,
}

impl FieldOutcome {
    /// Turnover or a failed fourth down: the other side has the ball next.
    #[must_use]
    pub const fn changes_possession(&self) -> bool {
        self.turnover || self.turnover_on_downs
    }
}

fn to_u8(value: i32) -> u8 {
    u8::try_from(value.clamp(0, i32::from(u8::MAX))).unwrap_or(u8::MAX)
}

fn clamp_spot(spot: i32) -> i32 {
    spot.clamp(1, LAST_FIELD_SPOT)
}

/// Fresh series for whoever has the ball at `spot`.
fn first_and_ten(spot: i32) -> (u8, u8) {
    (1, to_u8(FIRST_DOWN_DISTANCE.min(GOAL_LINE - spot).max(1)))
}

/// Field state after a sampled outcome gaining `yards`.
#[must_use]
pub fn advance(ctx: &PlayCallContext, play_type: PlayType, outcome: PlayOutcome, yards: i32) -> FieldOutcome {
    let start = i32::from(ctx.field_position).clamp(1, LAST_FIELD_SPOT);
    let yards = if outcome == PlayOutcome::Incomplete { 0 } else { yards };

    if outcome.is_turnover() {
        return change_of_possession(start, play_type, outcome, yards);
    }

    let raw_spot = start + yards;
    if raw_spot >= GOAL_LINE && outcome.can_score() {
        return FieldOutcome {
            yards: GOAL_LINE - start,
            new_down: 1,
            new_distance: to_u8(FIRST_DOWN_DISTANCE),
            new_field_position: to_u8(GOAL_LINE),
            first_down: true,
            touchdown: true,
            safety: false,
            turnover: false,
            turnover_on_downs: false,
        };
    }
    if raw_spot <= 0 {
        return FieldOutcome {
            yards: -start,
            new_down: 1,
            new_distance: to_u8(FIRST_DOWN_DISTANCE),
            new_field_position: 0,
            first_down: false,
            touchdown: false,
            safety: true,
            turnover: false,
            turnover_on_downs: false,
        };
    }

    let spot = raw_spot.min(LAST_FIELD_SPOT);
    let yards = spot - start;
    series_after_gain(ctx, start, spot, yards)
}

fn series_after_gain(ctx: &PlayCallContext, start: i32, spot: i32, yards: i32) -> FieldOutcome {
    let line_to_gain = start + i32::from(ctx.distance.max(1));
    if spot >= line_to_gain {
        let (new_down, new_distance) = first_and_ten(spot);
        return FieldOutcome {
            yards,
            new_down,
            new_distance,
            new_field_position: to_u8(spot),
            first_down: true,
            touchdown: false,
            safety: false,
            turnover: false,
            turnover_on_downs: false,
        };
    }
    if ctx.down >= 4 {
        let flipped = clamp_spot(GOAL_LINE - spot);
        let (new_down, new_distance) = first_and_ten(flipped);
        return FieldOutcome {
            yards,
            new_down,
            new_distance,
            new_field_position: to_u8(flipped),
            first_down: false,
            touchdown: false,
            safety: false,
            turnover: false,
            turnover_on_downs: true,
        };
    }
    FieldOutcome {
        yards,
        new_down: ctx.down.saturating_add(1),
        new_distance: to_u8((line_to_gain - spot).max(1)),
        new_field_position: to_u8(spot),
        first_down: false,
        touchdown: false,
        safety: false,
        turnover: false,
        turnover_on_downs: false,
    }
}

/// Interceptions are caught at the target depth and returned `yards`;
/// fumbles are lost at the end of the carry.
fn change_of_possession(start: i32, play_type: PlayType, outcome: PlayOutcome, yards: i32) -> FieldOutcome {
    let (credited, new_spot) = if outcome == PlayOutcome::Interception {
        let catch_spot = clamp_spot(start + i32::from(play_type.air_yards()));
        (0, clamp_spot(GOAL_LINE - catch_spot + yards.max(0)))
    } else {
        let fumble_spot = clamp_spot(start + yards);
        (fumble_spot - start, clamp_spot(GOAL_LINE - fumble_spot))
    };
    let (new_down, new_distance) = first_and_ten(new_spot);
    FieldOutcome {
        yards: credited,
        new_down,
        new_distance,
        new_field_position: to_u8(new_spot),
        first_down: false,
        touchdown: false,
        safety: false,
        turnover: true,
        turnover_on_downs: false,
    }
}

/// Field state after an accepted penalty; the snap's own result is void.
#[must_use]
pub fn enforce_penalty(ctx: &PlayCallContext, penalty: &Penalty) -> FieldOutcome {
    let start = i32::from(ctx.field_position).clamp(1, LAST_FIELD_SPOT);
    let yards = i32::from(penalty.yards);
    match penalty.against {
        PenaltySide::Offense => {
            let spot = clamp_spot(start - yards);
            let walked = start - spot;
            FieldOutcome {
                yards: -walked,
                new_down: ctx.down.max(1),
                new_distance: to_u8(i32::from(ctx.distance) + walked),
                new_field_position: to_u8(spot),
                first_down: false,
                touchdown: false,
                safety: false,
                turnover: false,
                turnover_on_downs: false,
            }
        }
        PenaltySide::Defense => {
            let spot = clamp_spot(start + yards);
            let walked = spot - start;
            let line_to_gain = start + i32::from(ctx.distance.max(1));
            if penalty.automatic_first_down || spot >= line_to_gain {
                let (new_down, new_distance) = first_and_ten(spot);
                FieldOutcome {
                    yards: walked,
                    new_down,
                    new_distance,
                    new_field_position: to_u8(spot),
                    first_down: true,
                    touchdown: false,
                    safety: false,
                    turnover: false,
                    turnover_on_downs: false,
                }
            } else {
                FieldOutcome {
                    yards: walked,
                    new_down: ctx.down.max(1),
                    new_distance: to_u8(line_to_gain - spot),
                    new_field_position: to_u8(spot),
                    first_down: false,
                    touchdown: false,
                    safety: false,
                    turnover: false,
                    turnover_on_downs: false,
                }
            }
        }
    }
}
