use super::disclosures::ETHICAL_SAFEGUARDS;
use super::views::{ContributionView, ExplanationView, RankedScoreView, ReportSummary};
use crate::ranking::domain::{Contribution, EntityId, RankingError};
use crate::ranking::ranker::{RankedEntity, Ranking};
use std::fmt::Write as _;

/// Decimal places used for every score rendered for people.
pub const DISPLAY_PRECISION: usize = 2;

/// Maximum gap between an entity's score and the sum of its contributions.
pub const RECONCILIATION_TOLERANCE: f64 = 1e-9;

pub(crate) fn display_value(value: f64) -> String {
    // Avoid rendering "-0.00".
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", DISPLAY_PRECISION, value)
}

/// Builds explanations from ranked entities. Holds no state besides the entity noun.
#[derive(Debug, Clone)]
pub struct ExplainabilityReporter {
    entity_label: String,
}

impl ExplainabilityReporter {
    pub fn new(entity_label: impl Into<String>) -> Self {
        Self {
            entity_label: entity_label.into(),
        }
    }

    /// Decomposes one entity's score. Fails if the full-precision contributions do not
    /// add up to the stored score, or if either is NaN.
    pub fn explain(&self, ranked: &RankedEntity) -> Result<EntityExplanation, RankingError> {
        let entity = &ranked.entity;
        let contributions = entity.contribution_sum();
        let gap = (contributions - entity.allocation_score).abs();
        if gap.is_nan() || gap > RECONCILIATION_TOLERANCE {
            return Err(RankingError::Unreconciled {
                entity_id: entity.id.clone(),
                score: entity.allocation_score,
                contributions,
            });
        }

        Ok(EntityExplanation {
            rank: ranked.rank,
            entity_label: self.entity_label.clone(),
            entity_id: entity.id.clone(),
            contributions: entity.contributions.clone(),
            allocation_score: entity.allocation_score,
        })
    }

    pub fn report(&self, ranking: &Ranking) -> Result<ExplainabilityReport, RankingError> {
        let explanations = ranking
            .entries()
            .iter()
            .map(|ranked| self.explain(ranked))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ExplainabilityReport {
            entity_label: self.entity_label.clone(),
            explanations,
            disclosures: ETHICAL_SAFEGUARDS,
        })
    }
}

/// Additive decomposition of one entity's allocation score.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityExplanation {
    pub rank: usize,
    pub entity_label: String,
    pub entity_id: EntityId,
    pub contributions: Vec<Contribution>,
    pub allocation_score: f64,
}

impl EntityExplanation {
    /// `(factor, contribution)` pairs rounded for display; stored values are untouched.
    pub fn display_lines(&self) -> Vec<(&str, String)> {
        self.contributions
            .iter()
            .map(|contribution| {
                (
                    contribution.factor.as_str(),
                    display_value(contribution.contribution),
                )
            })
            .collect()
    }

    pub fn display_total(&self) -> String {
        display_value(self.allocation_score)
    }

    pub fn text(&self) -> String {
        let mut text = format!("{} {}:\n", self.entity_label, self.entity_id);
        for contribution in &self.contributions {
            let _ = writeln!(
                text,
                "  {} Contribution: {}",
                contribution.label,
                display_value(contribution.contribution)
            );
        }
        let _ = writeln!(text, "  Total Allocation Score: {}", self.display_total());
        text
    }

    pub fn to_view(&self) -> ExplanationView {
        ExplanationView {
            rank: self.rank,
            entity_id: self.entity_id.to_string(),
            contributions: self
                .contributions
                .iter()
                .map(|contribution| ContributionView {
                    factor: contribution.factor.clone(),
                    label: contribution.label.clone(),
                    weight: contribution.weight,
                    value: contribution.value,
                    contribution: contribution.contribution,
                    display_contribution: display_value(contribution.contribution),
                })
                .collect(),
            allocation_score: self.allocation_score,
            display_total: self.display_total(),
            text: self.text(),
        }
    }
}

/// Ranked scores, per-entity explanations, and the closing disclosures.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainabilityReport {
    pub entity_label: String,
    pub explanations: Vec<EntityExplanation>,
    pub disclosures: &'static [&'static str],
}

impl ExplainabilityReport {
    pub fn render(&self) -> String {
        let mut out = String::from("Ranking by allocation score\n");
        let id_width = self
            .explanations
            .iter()
            .map(|explanation| explanation.entity_id.as_str().chars().count())
            .max()
            .unwrap_or(0);
        for explanation in &self.explanations {
            let _ = writeln!(
                out,
                "{:>4}. {:<width$}  {}",
                explanation.rank,
                explanation.entity_id.as_str(),
                explanation.display_total(),
                width = id_width
            );
        }

        out.push_str("\nExplainability reports\n");
        for explanation in &self.explanations {
            out.push_str(&explanation.text());
            out.push('\n');
        }

        out.push_str("Ethical safeguards\n");
        for disclosure in self.disclosures {
            let _ = writeln!(out, "- {disclosure}");
        }
        out
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            entity_label: self.entity_label.clone(),
            ranking: self
                .explanations
                .iter()
                .map(|explanation| RankedScoreView {
                    rank: explanation.rank,
                    entity_id: explanation.entity_id.to_string(),
                    allocation_score: explanation.allocation_score,
                    display_score: explanation.display_total(),
                })
                .collect(),
            explanations: self
                .explanations
                .iter()
                .map(EntityExplanation::to_view)
                .collect(),
            disclosures: self.disclosures.to_vec(),
        }
    }
}
