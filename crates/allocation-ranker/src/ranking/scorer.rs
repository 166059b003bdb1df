//! Weighted combination of normalized and bounded factors into an allocation score.
//!
//! allocation_score = Σ weight[factor] × value[factor], accumulated in weight declaration
//! order so the stored score is exactly the sum of the stored contributions.

use super::domain::{
    Contribution, Dataset, DatasetSchema, EntityId, EntityRecord, FactorKind, RankingError,
};
use super::normalizer::NormalizedDataset;
use super::weights::{ConfigurationIssue, WeightConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A weighted factor joined with its schema declaration.
#[derive(Debug, Clone, PartialEq)]
struct ResolvedFactor {
    name: String,
    label: String,
    kind: FactorKind,
    weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntity {
    /// Index of the entity in the input dataset.
    pub position: usize,
    pub id: EntityId,
    pub allocation_score: f64,
    pub contributions: Vec<Contribution>,
}

impl ScoredEntity {
    pub fn contribution_sum(&self) -> f64 {
        self.contributions
            .iter()
            .map(|contribution| contribution.contribution)
            .sum()
    }
}

/// Stateless calculator applying one weight configuration to any number of entities.
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    factors: Vec<ResolvedFactor>,
}

impl ScoreCalculator {
    pub fn new(schema: &DatasetSchema, weights: &WeightConfig) -> Result<Self, ConfigurationIssue> {
        let factors = weights
            .weights()
            .iter()
            .map(|entry| {
                let column = schema
                    .factor(&entry.factor)
                    .ok_or_else(|| ConfigurationIssue::UnknownFactor(entry.factor.clone()))?;
                Ok(ResolvedFactor {
                    name: entry.factor.clone(),
                    label: column.label.clone(),
                    kind: column.kind,
                    weight: entry.weight,
                })
            })
            .collect::<Result<Vec<_>, ConfigurationIssue>>()?;

        Ok(Self { factors })
    }

    pub fn score_entity(
        &self,
        position: usize,
        record: &EntityRecord,
        normalized: Option<&BTreeMap<String, f64>>,
    ) -> Result<ScoredEntity, RankingError> {
        let mut contributions = Vec::with_capacity(self.factors.len());
        let mut allocation_score = 0.0;

        for factor in &self.factors {
            let value = match factor.kind {
                FactorKind::Normalized => {
                    normalized.and_then(|features| features.get(&factor.name).copied())
                }
                FactorKind::Bounded => record.bounded(&factor.name),
            }
            .ok_or_else(|| RankingError::MissingFeature {
                entity_id: record.id.clone(),
                factor: factor.name.clone(),
            })?;

            let contribution = factor.weight * value;
            allocation_score += contribution;
            contributions.push(Contribution {
                factor: factor.name.clone(),
                label: factor.label.clone(),
                weight: factor.weight,
                value,
                contribution,
            });
        }

        Ok(ScoredEntity {
            position,
            id: record.id.clone(),
            allocation_score,
            contributions,
        })
    }

    /// Scores every entity in dataset order. The first entity lacking a configured factor
    /// aborts the whole batch.
    pub fn score_dataset(
        &self,
        dataset: &Dataset,
        normalized: &NormalizedDataset,
    ) -> Result<Vec<ScoredEntity>, RankingError> {
        let scored = dataset
            .records()
            .iter()
            .enumerate()
            .map(|(position, record)| {
                self.score_entity(position, record, normalized.features_at(position))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(entities = scored.len(), factors = self.factors.len(), "scored entities");
        Ok(scored)
    }
}
