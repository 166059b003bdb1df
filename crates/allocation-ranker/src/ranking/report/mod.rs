mod disclosures;
mod summary;
pub mod views;

pub use disclosures::ETHICAL_SAFEGUARDS;
pub use summary::{
    EntityExplanation, ExplainabilityReport, ExplainabilityReporter, DISPLAY_PRECISION,
    RECONCILIATION_TOLERANCE,
};
pub use views::{ContributionView, ExplanationView, RankedScoreView, ReportSummary};
