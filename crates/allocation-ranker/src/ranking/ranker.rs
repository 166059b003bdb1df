use super::domain::EntityId;
use super::scorer::ScoredEntity;
use serde::Serialize;

/// Width of the grid scores are rounded onto before comparison. Scores that round to the
/// same grid point are tied; two scores straddling a half-step fall into neighbouring
/// points and are ordered by score even when they are closer than this.
pub const SCORE_TIE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntity {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub entity: ScoredEntity,
}

/// Entities ordered by allocation score, highest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Ranking {
    entries: Vec<RankedEntity>,
}

impl Ranking {
    pub fn entries(&self) -> &[RankedEntity] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&RankedEntity> {
        self.entries.first()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entries.iter().map(|entry| &entry.entity.id)
    }

    /// `(id, score)` pairs in ranked order, at full precision.
    pub fn scores(&self) -> Vec<(EntityId, f64)> {
        self.entries
            .iter()
            .map(|entry| (entry.entity.id.clone(), entry.entity.allocation_score))
            .collect()
    }
}

/// Sorts descending by score rounded to the [`SCORE_TIE_TOLERANCE`] grid. Scores on the same
/// grid point fall back to input position, so they keep their original relative order no
/// matter how `scored` arrives.
pub fn rank(mut scored: Vec<ScoredEntity>) -> Ranking {
    scored.sort_by(|a, b| {
        tie_key(b.allocation_score)
            .cmp(&tie_key(a.allocation_score))
            .then(a.position.cmp(&b.position))
    });

    let entries = scored
        .into_iter()
        .enumerate()
        .map(|(index, entity)| RankedEntity {
            rank: index + 1,
            entity,
        })
        .collect();

    Ranking { entries }
}

// Quantizing onto the tolerance grid keeps the comparison a total order.
fn tie_key(score: f64) -> i64 {
    (score / SCORE_TIE_TOLERANCE).round() as i64
}
