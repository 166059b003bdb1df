//! Min-max feature scaling over a whole dataset.
//!
//! Scaling runs in two passes: every feature's range is computed across all entities
//! first, then each entity's raw value is mapped through that shared range.

use super::domain::Dataset;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Observed minimum and maximum of one raw feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub fn observe<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().fold(None, |range, value| match range {
            None => Some(Self {
                min: value,
                max: value,
            }),
            Some(Self { min, max }) => Some(Self {
                min: min.min(value),
                max: max.max(value),
            }),
        })
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Maps `value` onto [0, 1]. A degenerate range maps every value to 0.0, so a feature
    /// shared by all entities adds nothing to any score.
    pub fn scale(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let span = self.max - self.min;
        let scaled = if span.is_finite() {
            (value - self.min) / span
        } else {
            // The range is wider than f64::MAX; halving keeps every term finite.
            (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        };
        scaled.clamp(0.0, 1.0)
    }
}

/// Normalized feature values, row-aligned with the dataset they were derived from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedDataset {
    ranges: BTreeMap<String, FeatureRange>,
    rows: Vec<BTreeMap<String, f64>>,
}

impl NormalizedDataset {
    pub fn range(&self, feature: &str) -> Option<FeatureRange> {
        self.ranges.get(feature).copied()
    }

    pub fn features_at(&self, position: usize) -> Option<&BTreeMap<String, f64>> {
        self.rows.get(position)
    }

    pub fn value(&self, position: usize, feature: &str) -> Option<f64> {
        self.rows
            .get(position)
            .and_then(|features| features.get(feature))
            .copied()
    }

    pub fn degenerate_features(&self) -> Vec<&str> {
        self.ranges
            .iter()
            .filter(|(_, range)| range.is_degenerate())
            .map(|(feature, _)| feature.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Range of `feature` across every entity that has a value for it.
pub fn feature_range(dataset: &Dataset, feature: &str) -> Option<FeatureRange> {
    FeatureRange::observe(dataset.records().iter().filter_map(|record| record.raw(feature)))
}

/// Normalized values of one feature in dataset order; `None` where the entity has no value.
pub fn normalize_feature(dataset: &Dataset, feature: &str) -> Vec<Option<f64>> {
    let range = feature_range(dataset, feature);
    dataset
        .records()
        .iter()
        .map(|record| {
            let value = record.raw(feature)?;
            range.map(|range| range.scale(value))
        })
        .collect()
}

/// Normalizes every raw feature the dataset schema declares.
pub fn normalize_dataset(dataset: &Dataset) -> NormalizedDataset {
    let ranges: BTreeMap<String, FeatureRange> = dataset
        .schema()
        .raw_feature_names()
        .filter_map(|feature| {
            feature_range(dataset, feature).map(|range| (feature.to_string(), range))
        })
        .collect();

    for (feature, range) in &ranges {
        if range.is_degenerate() {
            warn!(
                feature = %feature,
                value = range.min,
                "feature is identical for every entity; normalizing to 0.0"
            );
        }
    }

    let rows: Vec<BTreeMap<String, f64>> = dataset
        .records()
        .iter()
        .map(|record| {
            ranges
                .iter()
                .filter_map(|(feature, range)| {
                    record
                        .raw(feature)
                        .map(|value| (feature.clone(), range.scale(value)))
                })
                .collect()
        })
        .collect();

    debug!(
        entities = dataset.len(),
        features = ranges.len(),
        "normalized raw features"
    );

    NormalizedDataset { ranges, rows }
}
