//! Structural matchup modifiers and per-player matchup resolution.
pub mod pass_rush;
pub mod personnel;
pub mod play_action;
pub mod presnap;
pub mod resolver;
pub mod scheme;
pub mod situational;

pub use pass_rush::{PassRushResult, PressureTier, RushPhase};
pub use personnel::{PersonnelMismatch, personnel_advantage};
pub use play_action::{PlayActionBonus, PlayActionTier, RunGameTracker, play_action_effectiveness};
pub use presnap::{Audible, PresnapRead, QbMentals};
pub use resolver::{KeyMatchup, MatchupAggregate, MatchupResolver};
pub use scheme::{DefensiveScheme, OffensiveScheme, SchemeEffect};
pub use situational::{Situation, SituationalModifier, evaluate_situation};
