use crate::dataset::{DataTable, DatasetLoader, SampleDatasetLoader};
use crate::ranking::{AllocationPipeline, DatasetSchema, EntityId, Ranking, WeightConfig};

pub(super) fn triage_pipeline() -> AllocationPipeline {
    AllocationPipeline::patient_triage().expect("default pipeline builds")
}

pub(super) fn pipeline_with_weights(raw: &str) -> AllocationPipeline {
    let weights = WeightConfig::parse(raw).expect("weights parse");
    AllocationPipeline::new(DatasetSchema::patient_triage(), weights).expect("pipeline builds")
}

pub(super) fn sample_table() -> DataTable {
    SampleDatasetLoader.load().expect("sample dataset loads")
}

pub(super) fn table(rows: &[[&str; 4]]) -> DataTable {
    rows.iter().fold(
        DataTable::new(["PatientId", "UrgencyScore", "Age", "SurvivalProbability"]),
        |table, row| table.with_row(row.iter().copied()),
    )
}

pub(super) fn ranked_ids(ranking: &Ranking) -> Vec<&str> {
    ranking.ids().map(EntityId::as_str).collect()
}

pub(super) fn score_of(ranking: &Ranking, id: &str) -> f64 {
    ranking
        .entries()
        .iter()
        .find(|entry| entry.entity.id.as_str() == id)
        .map(|entry| entry.entity.allocation_score)
        .expect("entity ranked")
}
