//! Explainability telemetry for weighted random selections.
//!
//! Outcome tables, injury rolls and stat attribution record which candidates
//! were considered, the weights they carried and the draw that picked one.
//! Traces never feed back into resolution.
use serde::{Deserialize, Serialize};

/// Record of one weighted selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTrace {
    /// Identifier for the selection pool (e.g., `outcome.run_inside`).
    pub pool_id: String,
    /// Random draw used to select from the weighted pool.
    pub roll: RollValue,
    /// Candidate weights considered during selection.
    pub candidates: Vec<WeightedCandidate>,
    /// Identifier of the selected candidate.
    pub chosen_id: String,
}

/// Candidate weight telemetry captured during a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedCandidate {
    pub id: String,
    pub base_weight: f64,
    /// Multipliers applied in order.
    pub multipliers: Vec<WeightFactor>,
    pub final_weight: f64,
}

impl WeightedCandidate {
    /// Candidate whose final weight equals its base weight.
    #[must_use]
    pub fn plain(id: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            base_weight: weight,
            multipliers: Vec::new(),
            final_weight: weight,
        }
    }
}

/// Random roll value used by weighted selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RollValue {
    U32(u32),
    F64(f64),
}

/// Single multiplicative weight factor used in a selection trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightFactor {
    pub label: String,
    pub value: f64,
}

impl WeightFactor {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_roundtrips_through_json() {
        let trace = DecisionTrace {
            pool_id: String::from("outcome.run_inside"),
            roll: RollValue::F64(0.42),
            candidates: vec![WeightedCandidate {
                id: String::from("good_gain"),
                base_weight: 0.3,
                multipliers: vec![WeightFactor::new("advantage", 1.2)],
                final_weight: 0.36,
            }],
            chosen_id: String::from("good_gain"),
        };
        let json = serde_json::to_string(&trace).expect("serialize");
        assert!(json.contains("\"kind\":\"f64\""));
        let restored: DecisionTrace = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, trace);
    }
}
