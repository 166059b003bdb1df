use super::domain::{Dataset, DatasetSchema, RankingError};
use super::normalizer::{normalize_dataset, NormalizedDataset};
use super::ranker::{rank, Ranking};
use super::report::{ExplainabilityReport, ExplainabilityReporter};
use super::scorer::ScoreCalculator;
use super::weights::WeightConfig;
use crate::dataset::DataTable;
use tracing::{debug, info};

/// Everything one run produced, stage by stage.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub dataset: Dataset,
    pub normalized: NormalizedDataset,
    pub ranking: Ranking,
    pub report: ExplainabilityReport,
}

/// Normalize, score, rank and explain, in that order, over one in-memory dataset.
#[derive(Debug, Clone)]
pub struct AllocationPipeline {
    schema: DatasetSchema,
    weights: WeightConfig,
    calculator: ScoreCalculator,
    reporter: ExplainabilityReporter,
}

impl AllocationPipeline {
    /// Resolves every weighted factor against the schema before any data is seen.
    pub fn new(schema: DatasetSchema, weights: WeightConfig) -> Result<Self, RankingError> {
        let calculator = ScoreCalculator::new(&schema, &weights)?;
        let reporter = ExplainabilityReporter::new(schema.entity_label.clone());

        Ok(Self {
            schema,
            weights,
            calculator,
            reporter,
        })
    }

    pub fn patient_triage() -> Result<Self, RankingError> {
        Self::new(DatasetSchema::patient_triage(), WeightConfig::patient_triage())
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn weights(&self) -> &WeightConfig {
        &self.weights
    }

    /// Applies the schema to `table`, requiring a column for every weighted factor.
    pub fn load(&self, table: &DataTable) -> Result<Dataset, RankingError> {
        let required: Vec<&str> = self.weights.factor_names().collect();
        Dataset::from_table(&self.schema, &required, table)
    }

    pub fn run(&self, table: &DataTable) -> Result<PipelineOutcome, RankingError> {
        let dataset = self.load(table)?;
        self.run_dataset(dataset)
    }

    pub fn run_dataset(&self, dataset: Dataset) -> Result<PipelineOutcome, RankingError> {
        debug!(entities = dataset.len(), "starting allocation ranking");

        let normalized = normalize_dataset(&dataset);
        let scored = self.calculator.score_dataset(&dataset, &normalized)?;
        let ranking = rank(scored);
        let report = self.reporter.report(&ranking)?;

        if let Some(top) = ranking.top() {
            info!(
                entities = ranking.len(),
                top = %top.entity.id,
                score = top.entity.allocation_score,
                "allocation ranking complete"
            );
        }

        Ok(PipelineOutcome {
            dataset,
            normalized,
            ranking,
            report,
        })
    }
}
