use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScoreView {
    pub rank: usize,
    pub entity_id: String,
    pub allocation_score: f64,
    pub display_score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionView {
    pub factor: String,
    pub label: String,
    pub weight: f64,
    pub value: f64,
    pub contribution: f64,
    pub display_contribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationView {
    pub rank: usize,
    pub entity_id: String,
    pub contributions: Vec<ContributionView>,
    pub allocation_score: f64,
    pub display_total: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub entity_label: String,
    pub ranking: Vec<RankedScoreView>,
    pub explanations: Vec<ExplanationView>,
    pub disclosures: Vec<&'static str>,
}
