//! Gridiron Play Resolution Engine
//!
//! Platform-agnostic core that turns hidden player ratings, team schemes,
//! play calls and game situation into one plausible play result.
//! This crate has no UI, storage or season logic; the franchise layer owns
//! rosters between games and reads back results and usage.

pub mod coach;
pub mod config;
pub mod constants;
pub mod context;
pub mod distribution;
pub mod fatigue;
pub mod injury;
pub mod lineup;
pub mod matchup;
pub mod numbers;
pub mod outcome;
pub mod play;
pub mod play_caller;
pub mod player;
pub mod ratings;
pub mod resolver;
pub mod rng;
pub mod roster;
pub mod session;
pub mod team;
pub mod trace;

// Re-export commonly used types
pub use coach::{Coach, CoachPersonality};
pub use config::{ConfigError, EngineConfig, FatigueTuning, InjuryTuning, OutcomeTuning, PenaltyTuning};
pub use context::{GameStakes, PlayCallContext, Precipitation, WeatherCondition};
pub use fatigue::{CurveArchetype, FatigueCurve, FatigueSystem, PlayIntensity, SubstitutionUrgency};
pub use injury::{Injury, InjuryProcessor, InjurySeverity, InjuryType, PermanentEffect, weeks_out_range};
pub use lineup::{Lineup, LineupSlot};
pub use matchup::{
    DefensiveScheme, OffensiveScheme, PassRushResult, PersonnelMismatch, PlayActionBonus, PresnapRead,
    PressureTier, RunGameTracker, SchemeEffect, SituationalModifier,
};
pub use outcome::{OutcomeTable, OutcomeTableEntry, OutcomeTables, RolledOutcome, TableModifiers, base_table};
pub use play::{
    Blitz, Coverage, DefensivePersonnel, DefensivePlayCall, OffensivePersonnel, OffensivePlayCall, PlayCategory,
    PlayOutcome, PlayType, RunDirection,
};
pub use play_caller::{CoordinatorTendencies, FourthDownDecision, PlayCaller};
pub use player::{HiddenTrait, InjuryStatus, Player, PlayerId, PlayerRole, Position, PositionGroup, Skill, SkillRating};
pub use ratings::{
    EffectiveRatingCalculator, PositionWeightTables, RatingContext, TeamCompositeRatings, UnitKind, UnitRating,
};
pub use resolver::{
    EnhancedPlayResolver, EnhancedPlayResult, Penalty, PenaltyKind, PlayResolver, PlayResult, PlaySideEffects,
    Resolution, apply_side_effects,
};
pub use rng::{CountingRng, RngBundle};
pub use roster::{stock_team, stock_team_with};
pub use session::{GameSession, GameSummary, Scoreboard, SessionSnap, SnapKind};
pub use team::{TeamGameState, TeamSide, UsageLedger};
pub use trace::{DecisionTrace, RollValue, WeightedCandidate};
