//! Deferred state changes produced by a resolved play.
//!
//! Resolution never writes to a team. It records what should happen here,
//! and [`apply_side_effects`] is the one place that touches the usage ledger
//! and injury status.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::fatigue::{FatigueSystem, clamp_fatigue};
use crate::injury::Injury;
use crate::numbers::clamp_rating;
use crate::player::{InjuryStatus, PlayerId};
use crate::team::TeamGameState;

/// Usage change for one player who took the snap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageDelta {
    pub player: PlayerId,
    pub fatigue_gain: f64,
    pub touch: bool,
    pub carry: bool,
    pub target: bool,
}

impl UsageDelta {
    #[must_use]
    pub const fn snap(player: PlayerId, fatigue_gain: f64) -> Self {
        Self {
            player,
            fatigue_gain,
            touch: false,
            carry: false,
            target: false,
        }
    }
}

/// Everything one team's ledger should absorb from the play.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SideEffects {
    pub on_field: Vec<UsageDelta>,
    pub injuries: Vec<Injury>,
}

impl SideEffects {
    pub fn delta_mut(&mut self, player: PlayerId) -> Option<&mut UsageDelta> {
        self.on_field.iter_mut().find(|delta| delta.player == player)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaySideEffects {
    pub offense: SideEffects,
    pub defense: SideEffects,
}

/// Write a play's effects into both teams.
///
/// On-field players gain fatigue and a snap; everyone else with a ledger
/// entry recovers on the bench. Injuries set the player's status and apply
/// lingering skill losses.
pub fn apply_side_effects(
    offense: &mut TeamGameState,
    defense: &mut TeamGameState,
    effects: &PlaySideEffects,
    fatigue: &FatigueSystem,
) {
    apply_to_team(offense, &effects.offense, fatigue);
    apply_to_team(defense, &effects.defense, fatigue);
}

fn apply_to_team(team: &mut TeamGameState, effects: &SideEffects, fatigue: &FatigueSystem) {
    let on_field: BTreeSet<PlayerId> = effects.on_field.iter().map(|delta| delta.player).collect();

    let ledger = team.usage_mut();
    for id in ledger.ids() {
        if !on_field.contains(&id) {
            let entry = ledger.entry_mut(id);
            entry.fatigue = fatigue.bench_recovery(entry.fatigue);
        }
    }
    for delta in &effects.on_field {
        let entry = ledger.entry_mut(delta.player);
        entry.fatigue = clamp_fatigue(entry.fatigue + delta.fatigue_gain);
        entry.snaps = entry.snaps.saturating_add(1);
        if delta.touch {
            entry.touches = entry.touches.saturating_add(1);
        }
        if delta.carry {
            entry.carries = entry.carries.saturating_add(1);
        }
        if delta.target {
            entry.targets = entry.targets.saturating_add(1);
        }
    }

    for injury in &effects.injuries {
        let Some(player) = team.players.get_mut(&injury.player) else {
            log::warn!("{}: injury for unknown player {}", team.name, injury.player);
            continue;
        };
        player.injury = Some(InjuryStatus {
            injury_type: injury.injury_type,
            severity: injury.severity,
            weeks_remaining: injury.weeks_out,
        });
        for effect in &injury.permanent_effects {
            if let Some(rating) = player.skills.get_mut(&effect.skill) {
                rating.true_value = clamp_rating(rating.true_value - effect.penalty);
            }
        }
    }
}

/// Drive-change recovery for every tracked player.
pub fn apply_drive_recovery(team: &mut TeamGameState, fatigue: &FatigueSystem) {
    let ledger = team.usage_mut();
    for id in ledger.ids() {
        let entry = ledger.entry_mut(id);
        entry.fatigue = fatigue.drive_recovery(entry.fatigue);
    }
}

/// Halftime recovery for every tracked player.
pub fn apply_halftime_recovery(team: &mut TeamGameState, fatigue: &FatigueSystem) {
    let ledger = team.usage_mut();
    for id in ledger.ids() {
        let entry = ledger.entry_mut(id);
        entry.fatigue = fatigue.halftime_recovery(entry.fatigue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FatigueTuning;
    use crate::injury::{InjurySeverity, InjuryType, PermanentEffect};
    use crate::matchup::scheme::{DefensiveScheme, OffensiveScheme};
    use crate::player::{Player, PlayerRole, Position, Skill};

    fn team(name: &str, first_id: u32) -> TeamGameState {
        let mut team = TeamGameState::new(name, OffensiveScheme::WestCoast, DefensiveScheme::Cover3Zone);
        team.add_player(
            Player::new(PlayerId(first_id), "Runner", Position::Rb, PlayerRole::FeatureBack).with_skill(Skill::Speed, 80.0),
        );
        team.add_player(Player::new(PlayerId(first_id + 1), "Reserve", Position::Rb, PlayerRole::PowerBack));
        team
    }

    #[test]
    fn on_field_players_tire_and_bench_recovers() {
        let mut offense = team("O", 1);
        let mut defense = team("D", 10);
        offense.usage_mut().entry_mut(PlayerId(2)).fatigue = 60.0;
        let fatigue = FatigueSystem::new(&FatigueTuning::default());
        let effects = PlaySideEffects {
            offense: SideEffects {
                on_field: vec![UsageDelta {
                    carry: true,
                    touch: true,
                    ..UsageDelta::snap(PlayerId(1), 3.0)
                }],
                injuries: Vec::new(),
            },
            defense: SideEffects::default(),
        };
        apply_side_effects(&mut offense, &mut defense, &effects, &fatigue);

        let runner = offense.usage().get(PlayerId(1));
        assert!((runner.fatigue - 3.0).abs() < 1e-9);
        assert_eq!((runner.snaps, runner.carries, runner.touches), (1, 1, 1));
        assert!((offense.fatigue(PlayerId(2)) - 56.5).abs() < 1e-9);
        assert_eq!(defense.usage().iter().count(), 0);
    }

    #[test]
    fn injuries_update_status_and_skills() {
        let mut offense = team("O", 1);
        let mut defense = team("D", 10);
        let fatigue = FatigueSystem::new(&FatigueTuning::default());
        let effects = PlaySideEffects {
            offense: SideEffects {
                on_field: Vec::new(),
                injuries: vec![Injury {
                    player: PlayerId(1),
                    injury_type: InjuryType::Acl,
                    severity: InjurySeverity::SeasonEnding,
                    weeks_out: 30,
                    permanent_effects: vec![PermanentEffect {
                        skill: Skill::Speed,
                        penalty: 5.0,
                    }],
                }],
            },
            defense: SideEffects::default(),
        };
        apply_side_effects(&mut offense, &mut defense, &effects, &fatigue);
        let runner = &offense.players[&PlayerId(1)];
        assert!(!runner.is_available());
        assert!((runner.true_skill(Skill::Speed) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn halftime_recovers_half() {
        let mut offense = team("O", 1);
        offense.usage_mut().entry_mut(PlayerId(1)).fatigue = 60.0;
        let fatigue = FatigueSystem::new(&FatigueTuning::default());
        apply_halftime_recovery(&mut offense, &fatigue);
        assert!((offense.fatigue(PlayerId(1)) - 30.0).abs() < 1e-9);
    }
}
