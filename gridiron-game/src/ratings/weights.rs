//! Versioned position-weight matrices used by unit aggregation and pass-rush phases.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::config::ConfigError;
use crate::matchup::pass_rush::RushPhase;
use crate::play::RunDirection;
use crate::player::Position;
use crate::ratings::composite::UnitKind;

const DEFAULT_POSITION_WEIGHTS: &str = include_str!("../../assets/position_weights.json");

/// Weight applied to positions a table does not mention.
pub const DEFAULT_POSITION_WEIGHT: f64 = 1.0;

pub type WeightRow = BTreeMap<Position, f64>;

/// Named, versioned set of positional importance tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionWeightTables {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub units: BTreeMap<UnitKind, WeightRow>,
    #[serde(default)]
    pub run_blocking: BTreeMap<RunDirection, WeightRow>,
    #[serde(default)]
    pub pass_rush_phases: BTreeMap<RushPhase, WeightRow>,
    #[serde(default)]
    pub pass_protection_phases: BTreeMap<RushPhase, WeightRow>,
}

impl PositionWeightTables {
    /// Tables compiled into the crate.
    #[must_use]
    pub fn embedded() -> &'static Self {
        static TABLES: OnceLock<PositionWeightTables> = OnceLock::new();
        TABLES.get_or_init(|| Self::from_json(DEFAULT_POSITION_WEIGHTS).unwrap_or_else(|_| Self::flat()))
    }

    /// Every position weighted equally; used when the embedded asset is unusable.
    #[must_use]
    pub fn flat() -> Self {
        Self {
            version: 0,
            name: "flat".to_string(),
            units: BTreeMap::new(),
            run_blocking: BTreeMap::new(),
            pass_rush_phases: BTreeMap::new(),
            pass_protection_phases: BTreeMap::new(),
        }
    }

    /// Parse and validate a weight document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` for malformed input and
    /// `ConfigError::InvalidWeight` for negative or non-finite weights.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tables: Self = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidWeight` for the first negative or non-finite entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rows = self
            .units
            .values()
            .chain(self.run_blocking.values())
            .chain(self.pass_rush_phases.values())
            .chain(self.pass_protection_phases.values());
        for row in rows {
            for (position, weight) in row {
                if !weight.is_finite() || *weight < 0.0 {
                    return Err(ConfigError::InvalidWeight {
                        table: self.name.clone(),
                        position: position.abbreviation(),
                        value: *weight,
                    });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn unit_weight(&self, unit: UnitKind, position: Position) -> f64 {
        lookup(self.units.get(&unit), position)
    }

    /// Direction-specific run-blocking weight, falling back to the unit table.
    #[must_use]
    pub fn run_blocking_weight(&self, direction: RunDirection, position: Position) -> f64 {
        match self.run_blocking.get(&direction) {
            Some(row) => lookup(Some(row), position),
            None => self.unit_weight(UnitKind::RunBlocking, position),
        }
    }

    #[must_use]
    pub fn rush_phase_weight(&self, phase: RushPhase, position: Position) -> f64 {
        match self.pass_rush_phases.get(&phase) {
            Some(row) => lookup(Some(row), position),
            None => self.unit_weight(UnitKind::PassRush, position),
        }
    }

    #[must_use]
    pub fn protection_phase_weight(&self, phase: RushPhase, position: Position) -> f64 {
        match self.pass_protection_phases.get(&phase) {
            Some(row) => lookup(Some(row), position),
            None => self.unit_weight(UnitKind::PassProtection, position),
        }
    }
}

impl Default for PositionWeightTables {
    fn default() -> Self {
        Self::embedded().clone()
    }
}

fn lookup(row: Option<&WeightRow>, position: Position) -> f64 {
    row.and_then(|row| row.get(&position).copied())
        .unwrap_or(DEFAULT_POSITION_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_parse_and_rank_left_tackle() {
        let tables = PositionWeightTables::embedded();
        assert_eq!(tables.name, "league_default");
        assert!(
            tables.unit_weight(UnitKind::PassProtection, Position::Lt)
                > tables.unit_weight(UnitKind::PassProtection, Position::Lg)
        );
        assert!(
            tables.rush_phase_weight(RushPhase::Extended, Position::De)
                > tables.rush_phase_weight(RushPhase::Quick, Position::De)
        );
    }

    #[test]
    fn unknown_positions_default_to_unit_weight() {
        let tables = PositionWeightTables::flat();
        assert!((tables.unit_weight(UnitKind::Receiving, Position::K) - 1.0).abs() < f64::EPSILON);
        assert!(
            (tables.run_blocking_weight(RunDirection::Left, Position::C) - 1.0).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn negative_weight_is_rejected() {
        let json = r#"{"version":1,"name":"bad","units":{"receiving":{"WR":-1.0}}}"#;
        let err = PositionWeightTables::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeight { position: "WR", .. }));
    }
}
