//! Scoring, normalization, ranking and explainability for scarce-resource allocation.
//!
//! Data moves one way through the stages, each returning a new owned view:
//! [`Dataset`] → [`NormalizedDataset`] → [`ScoredEntity`] → [`Ranking`] →
//! [`ExplainabilityReport`]. [`AllocationPipeline`] wires them together.

pub mod domain;
pub mod normalizer;
mod pipeline;
pub mod ranker;
pub mod report;
pub mod scorer;
pub mod weights;

#[cfg(test)]
mod tests;

pub use domain::{
    ColumnSpec, Contribution, Dataset, DatasetSchema, EntityId, EntityRecord, FactorColumn,
    FactorKind, RankingError,
};
pub use normalizer::{FeatureRange, NormalizedDataset};
pub use pipeline::{AllocationPipeline, PipelineOutcome};
pub use ranker::{RankedEntity, Ranking};
pub use report::{EntityExplanation, ExplainabilityReport, ExplainabilityReporter, ReportSummary};
pub use scorer::{ScoreCalculator, ScoredEntity};
pub use weights::{ConfigurationIssue, FactorWeight, WeightConfig};
