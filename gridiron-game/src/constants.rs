//! Centralized balance constants for play resolution.
//!
//! Values that tuners are expected to adjust live in `EngineConfig` and the
//! position-weight asset. Everything here is structural balance that only
//! changes through reviewed code.

// Weekly variance ------------------------------------------------------------
pub(crate) const WEEKLY_VARIANCE_STDDEV: f64 = 2.0;
pub(crate) const WEEKLY_VARIANCE_LIMIT: f64 = 5.0;

// Effective rating modifiers -------------------------------------------------
pub(crate) const SCHEME_FIT_LIMIT: f64 = 10.0;
pub(crate) const SCHEME_FIT_PIVOT: f64 = 60.0;
pub(crate) const SCHEME_FIT_DIVISOR: f64 = 4.0;
pub(crate) const SCHEME_TRANSITION_GAMES: u8 = 4;
pub(crate) const SCHEME_TRANSITION_STEP: f64 = 1.5;
pub(crate) const ROLE_FIT_LIMIT: f64 = 10.0;
pub(crate) const ROLE_FIT_DIVISOR: f64 = 5.0;
pub(crate) const ROLE_MISMATCH_PENALTY: f64 = 4.0;
pub(crate) const CHEMISTRY_LIMIT: f64 = 10.0;
pub(crate) const COACH_QUALITY_MIN: f64 = -5.0;
pub(crate) const COACH_QUALITY_MAX: f64 = 10.0;
pub(crate) const COACH_QUALITY_DIVISOR: f64 = 5.0;
pub(crate) const WEATHER_MODIFIER_MIN: f64 = -10.0;
pub(crate) const WEATHER_MODIFIER_MAX: f64 = 2.0;
pub(crate) const CLUTCH_LIMIT: f64 = 15.0;
pub(crate) const CLUTCH_TRAIT_BONUS: f64 = 5.0;
pub(crate) const IT_FACTOR_DIVISOR: f64 = 5.0;
pub(crate) const FATIGUE_PENALTY_STEP: f64 = 25.0;
pub(crate) const MORALE_DIVISOR: f64 = 25.0;
pub(crate) const MOTOR_BONUS: f64 = 2.0;
pub(crate) const LAZY_PENALTY: f64 = 3.0;

// Unit aggregation -----------------------------------------------------------
pub(crate) const WEAK_LINK_SEVERE_GAP: f64 = 20.0;
pub(crate) const WEAK_LINK_MODERATE_GAP: f64 = 10.0;
pub(crate) const WEAK_LINK_SEVERE_RATE: f64 = 0.5;
pub(crate) const WEAK_LINK_MODERATE_RATE: f64 = 0.3;
pub(crate) const WEAK_LINK_MILD_RATE: f64 = 0.15;
/// Penalty points above which the defense is said to have exploited a weak link.
pub(crate) const WEAK_LINK_EXPLOIT_THRESHOLD: f64 = 6.0;

// Matchups --------------------------------------------------------------------
pub(crate) const MATCHUP_JITTER: f64 = 5.0;
pub(crate) const MATCHUP_PRIMARY_WEIGHT: f64 = 0.4;
pub(crate) const MATCHUP_SECONDARY_WEIGHT: f64 = 0.3;
pub(crate) const MATCHUP_REMAINDER_WEIGHT: f64 = 0.3;
pub(crate) const PERSONNEL_LIMIT: f64 = 20.0;
pub(crate) const RUSH_JITTER: f64 = 6.0;

// Play-action ----------------------------------------------------------------
pub(crate) const RUN_WINDOW: usize = 10;
pub(crate) const BIG_RUN_YARDS: i32 = 15;
pub(crate) const SUCCESS_YARDS_CAP: i32 = 4;
pub(crate) const BIG_RUN_MULTIPLIER: f64 = 1.1;
pub(crate) const PLAY_ACTION_MIN_MULTIPLIER: f64 = 0.7;
pub(crate) const PLAY_ACTION_MAX_MULTIPLIER: f64 = 1.5;

// Stat distribution -----------------------------------------------------------
pub(crate) const RB_DEPTH_WEIGHTS: [f64; 3] = [0.70, 0.25, 0.05];
pub(crate) const RB_CARRY_SOFT_LIMIT: u32 = 15;
pub(crate) const RB_CARRY_HARD_LIMIT: u32 = 20;
pub(crate) const RB_CARRY_SOFT_MULTIPLIER: f64 = 0.8;
pub(crate) const RB_CARRY_HARD_MULTIPLIER: f64 = 0.75;
pub(crate) const RB_FATIGUE_SOFT_LIMIT: f64 = 70.0;
pub(crate) const RB_FATIGUE_HARD_LIMIT: f64 = 85.0;
pub(crate) const RB_FATIGUE_SOFT_MULTIPLIER: f64 = 0.7;
pub(crate) const RB_FATIGUE_HARD_MULTIPLIER: f64 = 0.4;

// Field and scoring ----------------------------------------------------------
pub(crate) const GOAL_LINE: i32 = 100;
pub(crate) const LAST_FIELD_SPOT: i32 = 99;
pub(crate) const TOUCHBACK_SPOT: u8 = 20;
pub(crate) const DRIVE_START_SPOT: u8 = 25;
pub(crate) const TOUCHDOWN_POINTS: u16 = 7;
pub(crate) const FIELD_GOAL_POINTS: u16 = 3;
pub(crate) const SAFETY_POINTS: u16 = 2;
pub(crate) const PUNT_NET_YARDS: i32 = 40;
/// Snap and hold depth added to the line of scrimmage for kick distance.
pub(crate) const FIELD_GOAL_SNAP_OFFSET: i32 = 17;
pub(crate) const FIELD_GOAL_MAX_DISTANCE: i32 = 62;
pub(crate) const FIELD_GOAL_CHIP_SHOT: i32 = 30;
/// Kick spot behind the line of scrimmage.
pub(crate) const FIELD_GOAL_HOLD_YARDS: i32 = 7;
pub(crate) const FIELD_GOAL_CHIP_SHOT_CHANCE: f64 = 0.95;
pub(crate) const FIELD_GOAL_MAX_DISTANCE_CHANCE: f64 = 0.40;
/// Make-chance shift per kick-accuracy point away from neutral.
pub(crate) const KICK_ACCURACY_SCALE: f64 = 0.002;

// Clock ------------------------------------------------------------------------
pub(crate) const QUARTER_SECONDS: u16 = 900;
pub(crate) const QUARTERS: u8 = 4;
pub(crate) const RUNNING_CLOCK_SECONDS: u16 = 38;
pub(crate) const HURRY_UP_SECONDS: u16 = 16;
pub(crate) const STOPPED_CLOCK_SECONDS: u16 = 6;
pub(crate) const SPECIAL_TEAMS_SECONDS: u16 = 8;
/// Hard stop for a session that never runs out its clock.
pub(crate) const MAX_SNAPS_PER_GAME: u32 = 400;
