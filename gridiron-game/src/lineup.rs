//! On-field eleven for a personnel package, drawn from the depth chart.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::fatigue::{FatigueSystem, SubstitutionUrgency};
use crate::play::{DefensivePersonnel, OffensivePersonnel};
use crate::player::{PlayerId, Position};
use crate::team::TeamGameState;

/// One filled position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupSlot {
    pub position: Position,
    pub player: PlayerId,
}

/// Players on the field for one side of one snap, in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lineup {
    slots: Vec<LineupSlot>,
}

impl Lineup {
    /// Offensive eleven: quarterback, five linemen, then the personnel's skill players.
    #[must_use]
    pub fn offense(team: &TeamGameState, personnel: OffensivePersonnel, fatigue: &FatigueSystem) -> Self {
        Self::fill(team, &offensive_slots(personnel), fatigue)
    }

    /// Defensive eleven for the package.
    #[must_use]
    pub fn defense(team: &TeamGameState, personnel: DefensivePersonnel, fatigue: &FatigueSystem) -> Self {
        Self::fill(team, &defensive_slots(personnel), fatigue)
    }

    /// Build directly from slots; used for hand-set lineups.
    #[must_use]
    pub const fn from_slots(slots: Vec<LineupSlot>) -> Self {
        Self { slots }
    }

    fn fill(team: &TeamGameState, positions: &[Position], fatigue: &FatigueSystem) -> Self {
        let mut used = BTreeSet::new();
        let mut slots = Vec::with_capacity(positions.len());
        for position in positions {
            match pick_player(team, *position, &used, fatigue) {
                Some(player) => {
                    used.insert(player);
                    slots.push(LineupSlot {
                        position: *position,
                        player,
                    });
                }
                None => log::warn!("{}: no eligible player for {}", team.name, position.abbreviation()),
            }
        }
        Self { slots }
    }

    #[must_use]
    pub fn slots(&self) -> &[LineupSlot] {
        &self.slots
    }

    #[must_use]
    pub fn ids(&self) -> Vec<PlayerId> {
        self.slots.iter().map(|slot| slot.player).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: PlayerId) -> bool {
        self.slots.iter().any(|slot| slot.player == id)
    }

    /// Players lined up at `position`, in slot order.
    #[must_use]
    pub fn at(&self, position: Position) -> Vec<PlayerId> {
        self.slots
            .iter()
            .filter(|slot| slot.position == position)
            .map(|slot| slot.player)
            .collect()
    }

    /// First player at any of `positions`, checked in order.
    #[must_use]
    pub fn first_at(&self, positions: &[Position]) -> Option<PlayerId> {
        positions
            .iter()
            .find_map(|position| self.at(*position).first().copied())
    }

    #[must_use]
    pub fn quarterback(&self) -> Option<PlayerId> {
        self.first_at(&[Position::Qb])
    }

    /// Put `player` in the first slot at `position`. Returns the player sent
    /// off, or `None` when nothing changed.
    pub fn substitute(&mut self, position: Position, player: PlayerId) -> Option<PlayerId> {
        if self.contains(player) {
            return None;
        }
        let slot = self.slots.iter_mut().find(|slot| slot.position == position)?;
        Some(std::mem::replace(&mut slot.player, player))
    }
}

fn offensive_slots(personnel: OffensivePersonnel) -> Vec<Position> {
    let (backs, tight_ends, receivers) = personnel.skill_counts();
    let mut slots = vec![Position::Qb];
    slots.extend(Position::OFFENSIVE_LINE);
    for index in 0..backs {
        slots.push(if index == 0 { Position::Rb } else { Position::Fb });
    }
    slots.extend(std::iter::repeat_n(Position::Te, tight_ends));
    slots.extend(std::iter::repeat_n(Position::Wr, receivers));
    slots
}

fn defensive_slots(personnel: DefensivePersonnel) -> Vec<Position> {
    use Position::{Cb, De, Dt, Fs, Ilb, Mlb, Nt, Olb, Ss};
    match personnel {
        DefensivePersonnel::Base43 => vec![De, Dt, Dt, De, Olb, Mlb, Olb, Cb, Cb, Fs, Ss],
        DefensivePersonnel::Base34 => vec![De, Nt, De, Olb, Ilb, Ilb, Olb, Cb, Cb, Fs, Ss],
        DefensivePersonnel::Nickel => vec![De, Dt, Dt, De, Mlb, Olb, Cb, Cb, Cb, Fs, Ss],
        DefensivePersonnel::Dime => vec![De, Dt, Dt, De, Mlb, Cb, Cb, Cb, Cb, Fs, Ss],
        DefensivePersonnel::Quarter => vec![De, Dt, De, Mlb, Cb, Cb, Cb, Cb, Fs, Ss, Fs],
        DefensivePersonnel::GoalLine => vec![De, Dt, Nt, Dt, De, De, Olb, Mlb, Olb, Cb, Ss],
    }
}

/// Next healthy player for `position`, falling back through the position group.
///
/// Players listed at the position come before group fallbacks, and below
/// `Recommended` urgency comes before below `Required`; depth order breaks
/// ties. When everyone is at `Required` the least worn goes in.
fn pick_player(
    team: &TeamGameState,
    position: Position,
    used: &BTreeSet<PlayerId>,
    fatigue: &FatigueSystem,
) -> Option<PlayerId> {
    let group = position.group();
    let mut candidates: Vec<(PlayerId, bool)> = team.depth_at(position).iter().map(|id| (*id, true)).collect();
    for other in Position::ALL {
        if other != position && other.group() == group {
            candidates.extend(team.depth_at(other).iter().map(|id| (*id, false)));
        }
    }
    let eligible: Vec<Candidate> = candidates
        .into_iter()
        .filter(|(id, _)| !used.contains(id))
        .filter_map(|(id, native)| {
            let player = team.player(id).filter(|player| player.is_available())?;
            let usage = team.usage().get(id);
            Some(Candidate {
                id,
                native,
                urgency: fatigue.substitution_urgency(player, &usage),
                fatigue: usage.fatigue,
            })
        })
        .collect();

    let tiers = [
        (true, SubstitutionUrgency::Recommended),
        (true, SubstitutionUrgency::Required),
        (false, SubstitutionUrgency::Recommended),
        (false, SubstitutionUrgency::Required),
    ];
    tiers
        .iter()
        .find_map(|&(native, limit)| {
            eligible
                .iter()
                .find(|candidate| candidate.native == native && candidate.urgency < limit)
        })
        .or_else(|| {
            let worn = eligible
                .iter()
                .min_by(|a, b| a.fatigue.partial_cmp(&b.fatigue).unwrap_or(std::cmp::Ordering::Equal))?;
            log::debug!("{}: every {} option is worn, {} plays", team.name, position.abbreviation(), worn.id);
            Some(worn)
        })
        .map(|candidate| candidate.id)
}

struct Candidate {
    id: PlayerId,
    native: bool,
    urgency: SubstitutionUrgency,
    fatigue: f64,
}
