//! Personnel-package mismatch table.
use serde::{Deserialize, Serialize};

use crate::constants::PERSONNEL_LIMIT;
use crate::play::{DefensivePersonnel, OffensivePersonnel, PlayCategory};

// Rows follow `OffensivePersonnel::index`, columns `DefensivePersonnel::index`.
const RUN_ADVANTAGE: [[f64; 6]; 7] = [
    [-6.0, -6.0, -2.0, 3.0, 5.0, -12.0],
    [-3.0, -3.0, 1.0, 5.0, 7.0, -8.0],
    [1.0, 0.0, 5.0, 9.0, 11.0, -4.0],
    [3.0, 2.0, 7.0, 11.0, 13.0, -2.0],
    [2.0, 1.0, 6.0, 10.0, 12.0, -3.0],
    [4.0, 3.0, 8.0, 12.0, 14.0, -1.0],
    [-8.0, -8.0, -4.0, 1.0, 3.0, -14.0],
];

const PASS_ADVANTAGE: [[f64; 6]; 7] = [
    [8.0, 8.0, 2.0, -2.0, -4.0, 12.0],
    [4.0, 4.0, 0.0, -3.0, -5.0, 9.0],
    [1.0, 1.0, -1.0, -4.0, -6.0, 5.0],
    [-3.0, -3.0, -4.0, -6.0, -8.0, 2.0],
    [-1.0, -1.0, -2.0, -5.0, -7.0, 3.0],
    [-4.0, -4.0, -5.0, -7.0, -9.0, 1.0],
    [10.0, 10.0, 4.0, 0.0, -2.0, 14.0],
];

const HEAVY_VS_SUB_PACKAGE_RUN_BONUS: f64 = 12.0;
const LIGHT_VS_BASE_PASS_BONUS: f64 = 8.0;

/// Signed personnel advantage for the offense, in rating points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonnelMismatch {
    pub offense: OffensivePersonnel,
    pub defense: DefensivePersonnel,
    pub advantage: f64,
    #[serde(default)]
    pub rule: Option<String>,
}

impl PersonnelMismatch {
    #[must_use]
    pub fn is_significant(&self) -> bool {
        self.advantage.abs() >= 8.0
    }
}

/// Table lookup plus the heavy-versus-light override rules, clamped to ±20.
#[must_use]
pub fn personnel_advantage(
    offense: OffensivePersonnel,
    defense: DefensivePersonnel,
    category: PlayCategory,
) -> PersonnelMismatch {
    let row = offense.index();
    let col = defense.index();
    let mut advantage = match category {
        PlayCategory::Run => RUN_ADVANTAGE[row][col],
        PlayCategory::Pass => PASS_ADVANTAGE[row][col],
    };
    let mut rule = None;
    if category == PlayCategory::Run && offense.is_heavy() && defense.is_pass_package() {
        advantage += HEAVY_VS_SUB_PACKAGE_RUN_BONUS;
        rule = Some(format!("heavy {} run into {:?}", offense.label(), defense));
    }
    if category == PlayCategory::Pass && offense.is_light() && defense.is_base() {
        advantage += LIGHT_VS_BASE_PASS_BONUS;
        rule = Some(format!("spread {} pass against {:?}", offense.label(), defense));
    }
    PersonnelMismatch {
        offense,
        defense,
        advantage: advantage.clamp(-PERSONNEL_LIMIT, PERSONNEL_LIMIT),
        rule,
    }
}
