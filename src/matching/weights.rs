use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::comparisons::FieldAgreement;

/// Relative weight of each field when combining agreement levels into a
/// match probability.
///
/// The defaults stand in for externally estimated model parameters: email
/// agreement is close to decisive, the name and birth-date fields carry most
/// of the remaining evidence, city is a weak signal. Serializable so a
/// caller can load weights fitted elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub first_name: f64,
    pub surname: f64,
    pub dob: f64,
    pub city: f64,
    pub email: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            first_name: 0.22,
            surname: 0.24,
            dob: 0.22,
            city: 0.07,
            email: 0.25,
        }
    }
}

impl MatchWeights {
    /// Load weights from a JSON file; missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read match weights from {}", path.display()))?;
        let weights = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse match weights in {}", path.display()))?;
        Ok(weights)
    }

    /// Combine per-field agreement levels into a match probability.
    ///
    /// Weighted mean of agreement factors over the fields present on both
    /// records; a pair with no comparable fields scores zero.
    pub fn combine(&self, fields: &[(f64, FieldAgreement)]) -> f64 {
        let mut evidence = 0.0;
        let mut total_weight = 0.0;
        for &(weight, agreement) in fields {
            if agreement == FieldAgreement::Missing {
                continue;
            }
            evidence += weight * agreement.factor();
            total_weight += weight;
        }

        if total_weight == 0.0 {
            0.0
        } else {
            evidence / total_weight
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::comparisons::FieldAgreement;

    #[test]
    fn full_agreement_scores_one() {
        let weights = MatchWeights::default();
        let fields = [
            (weights.first_name, FieldAgreement::Exact),
            (weights.surname, FieldAgreement::Exact),
            (weights.email, FieldAgreement::Exact),
        ];
        assert!((weights.combine(&fields) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_fields_are_excluded_from_the_denominator() {
        let weights = MatchWeights::default();
        let with_missing = [
            (weights.first_name, FieldAgreement::Exact),
            (weights.email, FieldAgreement::Missing),
        ];
        let without = [(weights.first_name, FieldAgreement::Exact)];
        assert_eq!(weights.combine(&with_missing), weights.combine(&without));
    }

    #[test]
    fn no_comparable_fields_scores_zero() {
        let weights = MatchWeights::default();
        let fields = [(weights.email, FieldAgreement::Missing)];
        assert_eq!(weights.combine(&fields), 0.0);
    }

    #[test]
    fn partial_json_overrides_merge_with_defaults() {
        let weights: MatchWeights = serde_json::from_str(r#"{"email": 0.5}"#).unwrap();
        assert_eq!(weights.email, 0.5);
        assert_eq!(weights.city, MatchWeights::default().city);
    }
}
