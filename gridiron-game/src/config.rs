//! Tunable engine configuration.
//!
//! Every field carries a serde default, so an empty JSON object yields the
//! shipped balance. `validate` reports the first out-of-range value;
//! `sanitize` clamps instead of failing.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ratings::weights::PositionWeightTables;

/// Errors raised when configuration or data tables are unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be at least {min:.3} (got {value:.3})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.3} and {max:.3} (got {value:.3})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("weight table {table} has invalid weight {value} for {position}")]
    InvalidWeight {
        table: String,
        position: &'static str,
        value: f64,
    },
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(min..=max).contains(&value) {
        return Err(ConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub position_weights: PositionWeightTables,
    #[serde(default)]
    pub outcome: OutcomeTuning,
    #[serde(default)]
    pub penalty: PenaltyTuning,
    #[serde(default)]
    pub injury: InjuryTuning,
    #[serde(default)]
    pub fatigue: FatigueTuning,
}

impl EngineConfig {
    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` when the document is malformed and any
    /// validation error raised by [`EngineConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants before sanitization.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.position_weights.validate()?;
        self.outcome.validate()?;
        self.penalty.validate()?;
        self.injury.validate()?;
        self.fatigue.validate()?;
        Ok(())
    }

    /// Clamp every tunable into its supported range.
    pub fn sanitize(&mut self) {
        self.outcome.sanitize();
        self.penalty.sanitize();
        self.injury.sanitize();
        self.fatigue.sanitize();
    }
}

/// Outcome-table and yardage sampling knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeTuning {
    /// Rating points that make up one unit of advantage.
    #[serde(default = "OutcomeTuning::default_advantage_scale")]
    pub advantage_scale: f64,
    /// Fraction by which a full advantage scales each outcome bucket.
    #[serde(default = "OutcomeTuning::default_bucket_shift")]
    pub bucket_shift: f64,
    /// Chance that an outcome without an injury check gets one anyway.
    #[serde(default = "OutcomeTuning::default_ambient_injury_check")]
    pub ambient_injury_check: f64,
    #[serde(default = "OutcomeTuning::default_yardage_resample_attempts")]
    pub yardage_resample_attempts: u8,
}

impl OutcomeTuning {
    const fn default_advantage_scale() -> f64 {
        25.0
    }

    const fn default_bucket_shift() -> f64 {
        0.5
    }

    const fn default_ambient_injury_check() -> f64 {
        0.05
    }

    const fn default_yardage_resample_attempts() -> u8 {
        8
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range("outcome.advantage_scale", self.advantage_scale, 5.0, 100.0)?;
        check_range("outcome.bucket_shift", self.bucket_shift, 0.0, 0.9)?;
        check_range(
            "outcome.ambient_injury_check",
            self.ambient_injury_check,
            0.0,
            1.0,
        )?;
        if self.yardage_resample_attempts == 0 {
            return Err(ConfigError::MinViolation {
                field: "outcome.yardage_resample_attempts",
                min: 1.0,
                value: 0.0,
            });
        }
        Ok(())
    }

    fn sanitize(&mut self) {
        self.advantage_scale = clamp_or(
            self.advantage_scale,
            5.0,
            100.0,
            Self::default_advantage_scale(),
        );
        self.bucket_shift = clamp_or(self.bucket_shift, 0.0, 0.9, Self::default_bucket_shift());
        self.ambient_injury_check = clamp_or(
            self.ambient_injury_check,
            0.0,
            1.0,
            Self::default_ambient_injury_check(),
        );
        self.yardage_resample_attempts = self.yardage_resample_attempts.max(1);
    }
}

impl Default for OutcomeTuning {
    fn default() -> Self {
        Self {
            advantage_scale: Self::default_advantage_scale(),
            bucket_shift: Self::default_bucket_shift(),
            ambient_injury_check: Self::default_ambient_injury_check(),
            yardage_resample_attempts: Self::default_yardage_resample_attempts(),
        }
    }
}

/// Penalty frequency knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyTuning {
    #[serde(default = "PenaltyTuning::default_enabled")]
    pub enabled: bool,
    /// Flags per snap before discipline adjustments.
    #[serde(default = "PenaltyTuning::default_base_rate")]
    pub base_rate: f64,
    /// Extra rate per unit share of undisciplined players on a side.
    #[serde(default = "PenaltyTuning::default_undisciplined_scale")]
    pub undisciplined_scale: f64,
}

impl PenaltyTuning {
    const fn default_enabled() -> bool {
        true
    }

    const fn default_base_rate() -> f64 {
        0.055
    }

    const fn default_undisciplined_scale() -> f64 {
        0.5
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range("penalty.base_rate", self.base_rate, 0.0, 0.5)?;
        check_range(
            "penalty.undisciplined_scale",
            self.undisciplined_scale,
            0.0,
            5.0,
        )
    }

    fn sanitize(&mut self) {
        self.base_rate = clamp_or(self.base_rate, 0.0, 0.5, Self::default_base_rate());
        self.undisciplined_scale = clamp_or(
            self.undisciplined_scale,
            0.0,
            5.0,
            Self::default_undisciplined_scale(),
        );
    }
}

impl Default for PenaltyTuning {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            base_rate: Self::default_base_rate(),
            undisciplined_scale: Self::default_undisciplined_scale(),
        }
    }
}

/// Injury frequency knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryTuning {
    #[serde(default = "InjuryTuning::default_scale")]
    pub scale: f64,
    /// Hard ceiling on any single injury roll.
    #[serde(default = "InjuryTuning::default_probability_cap")]
    pub probability_cap: f64,
}

impl InjuryTuning {
    const fn default_scale() -> f64 {
        1.0
    }

    const fn default_probability_cap() -> f64 {
        0.25
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range("injury.scale", self.scale, 0.0, 10.0)?;
        check_range("injury.probability_cap", self.probability_cap, 0.0, 1.0)
    }

    fn sanitize(&mut self) {
        self.scale = clamp_or(self.scale, 0.0, 10.0, Self::default_scale());
        self.probability_cap = clamp_or(
            self.probability_cap,
            0.0,
            1.0,
            Self::default_probability_cap(),
        );
    }
}

impl Default for InjuryTuning {
    fn default() -> Self {
        Self {
            scale: Self::default_scale(),
            probability_cap: Self::default_probability_cap(),
        }
    }
}

/// Fatigue recovery knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueTuning {
    #[serde(default = "FatigueTuning::default_bench_recovery_pct")]
    pub bench_recovery_pct: f64,
    #[serde(default = "FatigueTuning::default_bench_recovery_flat")]
    pub bench_recovery_flat: f64,
    #[serde(default = "FatigueTuning::default_drive_recovery_pct")]
    pub drive_recovery_pct: f64,
    #[serde(default = "FatigueTuning::default_drive_recovery_flat")]
    pub drive_recovery_flat: f64,
    #[serde(default = "FatigueTuning::default_halftime_recovery_pct")]
    pub halftime_recovery_pct: f64,
    /// Fatigue at which the lineup rotates to the next player on the depth chart.
    #[serde(default = "FatigueTuning::default_rotation_threshold")]
    pub rotation_threshold: f64,
}

impl FatigueTuning {
    const fn default_bench_recovery_pct() -> f64 {
        0.05
    }

    const fn default_bench_recovery_flat() -> f64 {
        0.5
    }

    const fn default_drive_recovery_pct() -> f64 {
        0.20
    }

    const fn default_drive_recovery_flat() -> f64 {
        2.0
    }

    const fn default_halftime_recovery_pct() -> f64 {
        0.50
    }

    const fn default_rotation_threshold() -> f64 {
        90.0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range("fatigue.bench_recovery_pct", self.bench_recovery_pct, 0.0, 1.0)?;
        check_range("fatigue.bench_recovery_flat", self.bench_recovery_flat, 0.0, 20.0)?;
        check_range("fatigue.drive_recovery_pct", self.drive_recovery_pct, 0.0, 1.0)?;
        check_range("fatigue.drive_recovery_flat", self.drive_recovery_flat, 0.0, 20.0)?;
        check_range(
            "fatigue.halftime_recovery_pct",
            self.halftime_recovery_pct,
            0.0,
            1.0,
        )?;
        check_range(
            "fatigue.rotation_threshold",
            self.rotation_threshold,
            50.0,
            100.0,
        )
    }

    fn sanitize(&mut self) {
        self.bench_recovery_pct = clamp_or(
            self.bench_recovery_pct,
            0.0,
            1.0,
            Self::default_bench_recovery_pct(),
        );
        self.bench_recovery_flat = clamp_or(
            self.bench_recovery_flat,
            0.0,
            20.0,
            Self::default_bench_recovery_flat(),
        );
        self.drive_recovery_pct = clamp_or(
            self.drive_recovery_pct,
            0.0,
            1.0,
            Self::default_drive_recovery_pct(),
        );
        self.drive_recovery_flat = clamp_or(
            self.drive_recovery_flat,
            0.0,
            20.0,
            Self::default_drive_recovery_flat(),
        );
        self.halftime_recovery_pct = clamp_or(
            self.halftime_recovery_pct,
            0.0,
            1.0,
            Self::default_halftime_recovery_pct(),
        );
        self.rotation_threshold = clamp_or(
            self.rotation_threshold,
            50.0,
            100.0,
            Self::default_rotation_threshold(),
        );
    }
}

impl Default for FatigueTuning {
    fn default() -> Self {
        Self {
            bench_recovery_pct: Self::default_bench_recovery_pct(),
            bench_recovery_flat: Self::default_bench_recovery_flat(),
            drive_recovery_pct: Self::default_drive_recovery_pct(),
            drive_recovery_flat: Self::default_drive_recovery_flat(),
            halftime_recovery_pct: Self::default_halftime_recovery_pct(),
            rotation_threshold: Self::default_rotation_threshold(),
        }
    }
}
