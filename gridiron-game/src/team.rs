//! Per-team game state and the usage arena mutated between snaps.
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::coach::Coach;
use crate::constants::{WEEKLY_VARIANCE_LIMIT, WEEKLY_VARIANCE_STDDEV};
use crate::matchup::scheme::{DefensiveScheme, OffensiveScheme};
use crate::play_caller::CoordinatorTendencies;
use crate::player::{Player, PlayerId, Position, PositionGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }
}

/// In-game usage for one player.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerUsage {
    pub fatigue: f64,
    pub snaps: u32,
    pub touches: u32,
    pub carries: u32,
    pub targets: u32,
}

/// Arena of per-player usage keyed by id.
///
/// Resolution helpers only read from the ledger; writes happen when a
/// resolved play's side effects are applied or when recovery runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageLedger {
    entries: BTreeMap<PlayerId, PlayerUsage>,
}

impl UsageLedger {
    #[must_use]
    pub fn get(&self, id: PlayerId) -> PlayerUsage {
        self.entries.get(&id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn fatigue(&self, id: PlayerId) -> f64 {
        self.get(id).fatigue
    }

    #[must_use]
    pub fn snaps(&self, id: PlayerId) -> u32 {
        self.get(id).snaps
    }

    #[must_use]
    pub fn carries(&self, id: PlayerId) -> u32 {
        self.get(id).carries
    }

    #[must_use]
    pub fn touches(&self, id: PlayerId) -> u32 {
        self.get(id).touches
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &PlayerUsage)> {
        self.entries.iter()
    }

    pub(crate) fn entry_mut(&mut self, id: PlayerId) -> &mut PlayerUsage {
        self.entries.entry(id).or_default()
    }

    pub(crate) fn ids(&self) -> Vec<PlayerId> {
        self.entries.keys().copied().collect()
    }
}

/// Mutable per-game view of one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGameState {
    pub name: String,
    pub players: BTreeMap<PlayerId, Player>,
    pub depth_chart: BTreeMap<Position, Vec<PlayerId>>,
    pub offensive_scheme: OffensiveScheme,
    pub defensive_scheme: DefensiveScheme,
    /// Games played since the current schemes were installed.
    #[serde(default = "TeamGameState::default_games_since_scheme_change")]
    pub games_since_scheme_change: u8,
    #[serde(default)]
    pub tendencies: CoordinatorTendencies,
    #[serde(default)]
    pub coaches: BTreeMap<PositionGroup, Coach>,
    #[serde(default)]
    pub weekly_variance: BTreeMap<PlayerId, f64>,
    #[serde(default)]
    usage: UsageLedger,
}

impl TeamGameState {
    const fn default_games_since_scheme_change() -> u8 {
        8
    }

    #[must_use]
    pub fn new(
        name: impl Into<String>,
        offensive_scheme: OffensiveScheme,
        defensive_scheme: DefensiveScheme,
    ) -> Self {
        Self {
            name: name.into(),
            players: BTreeMap::new(),
            depth_chart: BTreeMap::new(),
            offensive_scheme,
            defensive_scheme,
            games_since_scheme_change: Self::default_games_since_scheme_change(),
            tendencies: CoordinatorTendencies::default(),
            coaches: BTreeMap::new(),
            weekly_variance: BTreeMap::new(),
            usage: UsageLedger::default(),
        }
    }

    /// Add a player at the bottom of the depth chart for their position.
    pub fn add_player(&mut self, player: Player) {
        let id = player.id;
        self.usage.entry_mut(id).fatigue = player.fatigue.clamp(0.0, 100.0);
        self.depth_chart.entry(player.position).or_default().push(id);
        self.players.insert(id, player);
    }

    pub fn add_coach(&mut self, coach: Coach) {
        self.coaches.insert(coach.group, coach);
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    #[must_use]
    pub fn coach_for(&self, group: PositionGroup) -> Option<&Coach> {
        self.coaches.get(&group)
    }

    #[must_use]
    pub fn weekly_variance_for(&self, id: PlayerId) -> f64 {
        self.weekly_variance.get(&id).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub const fn usage(&self) -> &UsageLedger {
        &self.usage
    }

    pub(crate) const fn usage_mut(&mut self) -> &mut UsageLedger {
        &mut self.usage
    }

    #[must_use]
    pub fn fatigue(&self, id: PlayerId) -> f64 {
        self.usage.fatigue(id)
    }

    /// Depth chart entries for `position`, starters first.
    #[must_use]
    pub fn depth_at(&self, position: Position) -> &[PlayerId] {
        self.depth_chart.get(&position).map_or(&[], Vec::as_slice)
    }

    /// Pre-roll the weekly performance swing for every rostered player.
    pub fn roll_weekly_variance<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.weekly_variance.clear();
        for id in self.players.keys() {
            let z: f64 = StandardNormal.sample(rng);
            let swing = (z * WEEKLY_VARIANCE_STDDEV).clamp(-WEEKLY_VARIANCE_LIMIT, WEEKLY_VARIANCE_LIMIT);
            self.weekly_variance.insert(*id, swing);
        }
    }

    /// Share of `ids` carrying the undisciplined trait.
    #[must_use]
    pub fn undisciplined_share(&self, ids: &[PlayerId]) -> f64 {
        if ids.is_empty() {
            return 0.0;
        }
        let count = ids
            .iter()
            .filter_map(|id| self.players.get(id))
            .filter(|player| player.has_trait(crate::player::HiddenTrait::Undisciplined))
            .count();
        crate::numbers::usize_to_f64(count) / crate::numbers::usize_to_f64(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerRole;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn team() -> TeamGameState {
        let mut team = TeamGameState::new("Test", OffensiveScheme::ProStyle, DefensiveScheme::Cover3Zone);
        let mut tired = Player::new(PlayerId(1), "One", Position::Rb, PlayerRole::FeatureBack);
        tired.fatigue = 40.0;
        team.add_player(tired);
        team.add_player(Player::new(PlayerId(2), "Two", Position::Rb, PlayerRole::PowerBack));
        team
    }

    #[test]
    fn add_player_seeds_depth_and_ledger() {
        let team = team();
        assert_eq!(team.depth_at(Position::Rb), &[PlayerId(1), PlayerId(2)]);
        assert!((team.fatigue(PlayerId(1)) - 40.0).abs() < f64::EPSILON);
        assert_eq!(team.usage().snaps(PlayerId(2)), 0);
        assert!(team.depth_at(Position::Qb).is_empty());
    }

    #[test]
    fn weekly_variance_stays_bounded() {
        let mut team = team();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..200 {
            team.roll_weekly_variance(&mut rng);
            for value in team.weekly_variance.values() {
                assert!(value.abs() <= WEEKLY_VARIANCE_LIMIT);
            }
        }
        assert_eq!(team.weekly_variance.len(), 2);
    }
}
