//! Factor weight configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Allowed deviation of the weight total from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorWeight {
    pub factor: String,
    pub weight: f64,
}

impl FactorWeight {
    pub fn new(factor: impl Into<String>, weight: f64) -> Self {
        Self {
            factor: factor.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationIssue {
    #[error("no factor weights configured")]
    Empty,
    #[error("malformed weight entry '{0}', expected name=weight")]
    Malformed(String),
    #[error("weight for '{factor}' is not numeric: '{value}'")]
    NonNumeric { factor: String, value: String },
    #[error("weight for '{factor}' is not finite")]
    NonFinite { factor: String },
    #[error("weight for '{factor}' is negative ({weight})")]
    Negative { factor: String, weight: f64 },
    #[error("factor '{0}' is weighted more than once")]
    DuplicateFactor(String),
    #[error("weights sum to {sum}, expected 1.0 within {tolerance}")]
    WeightSum { sum: f64, tolerance: f64 },
    #[error("factor '{0}' is not declared in the dataset schema")]
    UnknownFactor(String),
}

/// Validated weights in declaration order; the order fixes contribution order in reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightConfig {
    weights: Vec<FactorWeight>,
}

impl WeightConfig {
    pub fn new(weights: Vec<FactorWeight>) -> Result<Self, ConfigurationIssue> {
        if weights.is_empty() {
            return Err(ConfigurationIssue::Empty);
        }

        let mut seen = HashSet::with_capacity(weights.len());
        for entry in &weights {
            if !seen.insert(entry.factor.as_str()) {
                return Err(ConfigurationIssue::DuplicateFactor(entry.factor.clone()));
            }
            if !entry.weight.is_finite() {
                return Err(ConfigurationIssue::NonFinite {
                    factor: entry.factor.clone(),
                });
            }
            if entry.weight < 0.0 {
                return Err(ConfigurationIssue::Negative {
                    factor: entry.factor.clone(),
                    weight: entry.weight,
                });
            }
        }

        let sum: f64 = weights.iter().map(|entry| entry.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigurationIssue::WeightSum {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        Ok(Self { weights })
    }

    /// Urgency 0.5, survival probability 0.3, age 0.2.
    pub fn patient_triage() -> Self {
        Self {
            weights: vec![
                FactorWeight::new("urgency", 0.5),
                FactorWeight::new("survival", 0.3),
                FactorWeight::new("age", 0.2),
            ],
        }
    }

    /// Parses `name=weight` pairs separated by commas, e.g. `urgency=0.5,survival=0.3,age=0.2`.
    pub fn parse(raw: &str) -> Result<Self, ConfigurationIssue> {
        let mut weights = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (factor, value) = entry
                .split_once('=')
                .map(|(factor, value)| (factor.trim(), value.trim()))
                .filter(|(factor, _)| !factor.is_empty())
                .ok_or_else(|| ConfigurationIssue::Malformed(entry.to_string()))?;

            let weight = value
                .parse::<f64>()
                .map_err(|_| ConfigurationIssue::NonNumeric {
                    factor: factor.to_string(),
                    value: value.to_string(),
                })?;
            weights.push(FactorWeight::new(factor, weight));
        }

        Self::new(weights)
    }

    pub fn weights(&self) -> &[FactorWeight] {
        &self.weights
    }

    pub fn weight_for(&self, factor: &str) -> Option<f64> {
        self.weights
            .iter()
            .find(|entry| entry.factor == factor)
            .map(|entry| entry.weight)
    }

    pub fn factor_names(&self) -> impl Iterator<Item = &str> {
        self.weights.iter().map(|entry| entry.factor.as_str())
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().map(|entry| entry.weight).sum()
    }
}

impl FromStr for WeightConfig {
    type Err = ConfigurationIssue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let weights = WeightConfig::patient_triage();
        assert!((weights.total() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
        assert_eq!(
            WeightConfig::new(weights.weights().to_vec()).expect("defaults validate"),
            weights
        );
    }

    #[test]
    fn parse_keeps_declaration_order() {
        let weights = WeightConfig::parse(" age=0.2, urgency = 0.5 ,survival=0.3").expect("parse");
        let names: Vec<&str> = weights.factor_names().collect();
        assert_eq!(names, ["age", "urgency", "survival"]);
        assert_eq!(weights.weight_for("urgency"), Some(0.5));
        assert_eq!(weights.weight_for("bmi"), None);
    }

    #[test]
    fn sum_outside_tolerance_is_rejected() {
        let error = WeightConfig::parse("urgency=0.5,survival=0.2,age=0.2").expect_err("sum 0.9");
        match error {
            ConfigurationIssue::WeightSum { sum, .. } => assert!((sum - 0.9).abs() < 1e-9),
            other => panic!("expected weight sum error, got {other:?}"),
        }
    }

    #[test]
    fn sum_within_tolerance_is_accepted() {
        let weights = vec![
            FactorWeight::new("urgency", 0.5 + 5e-7),
            FactorWeight::new("age", 0.5),
        ];
        assert!(WeightConfig::new(weights).is_ok());
    }

    #[test]
    fn negative_weights_are_rejected() {
        let error = WeightConfig::parse("urgency=1.2,age=-0.2").expect_err("negative");
        assert_eq!(
            error,
            ConfigurationIssue::Negative {
                factor: "age".to_string(),
                weight: -0.2,
            }
        );
    }

    #[test]
    fn non_numeric_and_malformed_entries_are_rejected() {
        assert_eq!(
            WeightConfig::parse("urgency=half").expect_err("non numeric"),
            ConfigurationIssue::NonNumeric {
                factor: "urgency".to_string(),
                value: "half".to_string(),
            }
        );
        assert_eq!(
            WeightConfig::parse("urgency").expect_err("malformed"),
            ConfigurationIssue::Malformed("urgency".to_string())
        );
        assert_eq!(
            WeightConfig::parse("=1.0").expect_err("missing name"),
            ConfigurationIssue::Malformed("=1.0".to_string())
        );
    }

    #[test]
    fn duplicate_and_empty_configurations_are_rejected() {
        assert_eq!(
            WeightConfig::parse("age=0.5,age=0.5").expect_err("duplicate"),
            ConfigurationIssue::DuplicateFactor("age".to_string())
        );
        assert_eq!(WeightConfig::parse(" , ").expect_err("empty"), ConfigurationIssue::Empty);
    }

    #[test]
    fn non_finite_weights_are_rejected() {
        let error = WeightConfig::new(vec![FactorWeight::new("age", f64::NAN)]).expect_err("nan");
        assert!(matches!(error, ConfigurationIssue::NonFinite { .. }));
    }
}
