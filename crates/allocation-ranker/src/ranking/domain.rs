use super::weights::ConfigurationIssue;
use crate::dataset::DataTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Opaque identifier of a ranked entity, unique within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a factor's value reaches the score calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    /// Raw feature, min-max scaled across the dataset before weighting.
    Normalized,
    /// Already expressed on [0, 1] by its source and used as-is.
    Bounded,
}

/// Canonical column name plus the header spellings accepted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub aliases: Vec<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn accepted_headers(&self) -> Vec<String> {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .cloned()
            .collect()
    }

    pub fn locate(&self, table: &DataTable) -> Option<usize> {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .find_map(|candidate| table.column_index(candidate))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorColumn {
    pub column: ColumnSpec,
    pub label: String,
    pub kind: FactorKind,
}

impl FactorColumn {
    pub fn normalized(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FactorKind::Normalized)
    }

    pub fn bounded(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FactorKind::Bounded)
    }

    fn new(name: impl Into<String>, label: impl Into<String>, kind: FactorKind) -> Self {
        Self {
            column: ColumnSpec::new(name),
            label: label.into(),
            kind,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.column = self.column.with_alias(alias);
        self
    }

    pub fn name(&self) -> &str {
        &self.column.name
    }
}

/// Expected shape of the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    /// Noun used for each entity in rendered reports, e.g. "Patient".
    pub entity_label: String,
    pub id_column: ColumnSpec,
    pub factors: Vec<FactorColumn>,
}

impl DatasetSchema {
    pub fn new(entity_label: impl Into<String>, id_column: ColumnSpec) -> Self {
        Self {
            entity_label: entity_label.into(),
            id_column,
            factors: Vec::new(),
        }
    }

    pub fn with_factor(mut self, factor: FactorColumn) -> Self {
        self.factors.push(factor);
        self
    }

    /// Patients competing for a scarce treatment slot.
    pub fn patient_triage() -> Self {
        Self::new(
            "Patient",
            ColumnSpec::new("PatientId")
                .with_alias("patient")
                .with_alias("id"),
        )
        .with_factor(
            FactorColumn::normalized("urgency", "Urgency Score")
                .with_alias("UrgencyScore")
                .with_alias("urgency_level"),
        )
        .with_factor(
            FactorColumn::bounded("survival", "Survival Probability")
                .with_alias("SurvivalProbability")
                .with_alias("survival_prob"),
        )
        .with_factor(FactorColumn::normalized("age", "Age Factor").with_alias("AgeFactor"))
    }

    pub fn factor(&self, name: &str) -> Option<&FactorColumn> {
        self.factors.iter().find(|factor| factor.name() == name)
    }

    pub fn raw_feature_names(&self) -> impl Iterator<Item = &str> {
        self.factors
            .iter()
            .filter(|factor| factor.kind == FactorKind::Normalized)
            .map(FactorColumn::name)
    }
}

/// One candidate as loaded; immutable once the dataset is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub raw_features: BTreeMap<String, f64>,
    pub bounded_features: BTreeMap<String, f64>,
}

impl EntityRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(id),
            raw_features: BTreeMap::new(),
            bounded_features: BTreeMap::new(),
        }
    }

    pub fn with_raw(mut self, feature: impl Into<String>, value: f64) -> Self {
        self.raw_features.insert(feature.into(), value);
        self
    }

    pub fn with_bounded(mut self, feature: impl Into<String>, value: f64) -> Self {
        self.bounded_features.insert(feature.into(), value);
        self
    }

    pub fn raw(&self, feature: &str) -> Option<f64> {
        self.raw_features.get(feature).copied()
    }

    pub fn bounded(&self, feature: &str) -> Option<f64> {
        self.bounded_features.get(feature).copied()
    }
}

/// Portion of an allocation score attributable to one weighted factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub factor: String,
    pub label: String,
    pub weight: f64,
    /// Normalized or bounded input the weight was applied to.
    pub value: f64,
    pub contribution: f64,
}

/// Ordered, read-only collection of entity records.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: DatasetSchema,
    records: Vec<EntityRecord>,
}

impl Dataset {
    pub fn new(schema: DatasetSchema, records: Vec<EntityRecord>) -> Result<Self, RankingError> {
        validate_records(&records)?;
        Ok(Self { schema, records })
    }

    /// Applies `schema` to a loaded table.
    ///
    /// The id column and the column of every factor in `required` must be present; other
    /// schema factors are read when their column exists. Empty cells leave the feature unset.
    pub fn from_table(
        schema: &DatasetSchema,
        required: &[&str],
        table: &DataTable,
    ) -> Result<Self, RankingError> {
        let id_index = schema
            .id_column
            .locate(table)
            .ok_or_else(|| RankingError::missing_column(&schema.id_column))?;

        for name in required {
            if schema.factor(name).is_none() {
                return Err(ConfigurationIssue::UnknownFactor((*name).to_string()).into());
            }
        }

        let mut columns = Vec::with_capacity(schema.factors.len());
        for factor in &schema.factors {
            match factor.column.locate(table) {
                Some(index) => columns.push((factor, index)),
                None if required.contains(&factor.name()) => {
                    return Err(RankingError::missing_column(&factor.column));
                }
                None => {}
            }
        }

        let mut records = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let row_number = row + 1;
            let id = table.cell(row, id_index);
            if id.is_empty() {
                return Err(RankingError::InvalidValue {
                    row: row_number,
                    column: schema.id_column.name.clone(),
                    value: String::new(),
                });
            }

            let mut record = EntityRecord::new(id);
            for (factor, index) in &columns {
                let cell = table.cell(row, *index);
                if cell.is_empty() {
                    continue;
                }

                let value = parse_number(cell).ok_or_else(|| RankingError::InvalidValue {
                    row: row_number,
                    column: table.headers()[*index].clone(),
                    value: cell.to_string(),
                })?;

                let features = match factor.kind {
                    FactorKind::Normalized => &mut record.raw_features,
                    FactorKind::Bounded => &mut record.bounded_features,
                };
                features.insert(factor.name().to_string(), value);
            }
            records.push(record);
        }

        Self::new(schema.clone(), records)
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.records.iter().map(|record| &record.id)
    }
}

fn validate_records(records: &[EntityRecord]) -> Result<(), RankingError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(&record.id) {
            return Err(RankingError::DuplicateEntity(record.id.clone()));
        }

        if let Some((feature, _)) = record
            .raw_features
            .iter()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(RankingError::NonFinite {
                entity_id: record.id.clone(),
                factor: feature.clone(),
            });
        }

        if let Some((feature, value)) = record
            .bounded_features
            .iter()
            .find(|(_, value)| !(0.0..=1.0).contains(*value))
        {
            return Err(RankingError::OutOfBounds {
                entity_id: record.id.clone(),
                factor: feature.clone(),
                value: *value,
            });
        }
    }
    Ok(())
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Failures of the load, scoring and reporting stages. Every variant aborts the batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingError {
    #[error(
        "schema error: missing required column '{column}' (accepted headers: {})",
        .accepted.join(", ")
    )]
    Schema {
        column: String,
        accepted: Vec<String>,
    },
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationIssue),
    #[error("missing feature '{factor}' for entity {entity_id}")]
    MissingFeature { entity_id: EntityId, factor: String },
    #[error("entity id {0} appears more than once")]
    DuplicateEntity(EntityId),
    #[error("invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error("feature '{factor}' for entity {entity_id} is not a finite number")]
    NonFinite { entity_id: EntityId, factor: String },
    #[error("bounded feature '{factor}' for entity {entity_id} is outside [0, 1]: {value}")]
    OutOfBounds {
        entity_id: EntityId,
        factor: String,
        value: f64,
    },
    #[error(
        "contributions for entity {entity_id} sum to {contributions} but its score is {score}"
    )]
    Unreconciled {
        entity_id: EntityId,
        score: f64,
        contributions: f64,
    },
}

impl RankingError {
    fn missing_column(column: &ColumnSpec) -> Self {
        Self::Schema {
            column: column.name.clone(),
            accepted: column.accepted_headers(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triage_table() -> DataTable {
        DataTable::new(["PatientId", "UrgencyScore", "Age", "SurvivalProbability"])
            .with_row(["P1", "9", "65", "0.8"])
            .with_row(["P2", "5", "30", "0.9"])
    }

    #[test]
    fn from_table_routes_columns_by_factor_kind() {
        let schema = DatasetSchema::patient_triage();
        let dataset = Dataset::from_table(&schema, &["urgency", "survival", "age"], &triage_table())
            .expect("dataset builds");

        assert_eq!(dataset.len(), 2);
        let first = &dataset.records()[0];
        assert_eq!(first.id, EntityId::new("P1"));
        assert_eq!(first.raw("urgency"), Some(9.0));
        assert_eq!(first.raw("age"), Some(65.0));
        assert_eq!(first.bounded("survival"), Some(0.8));
        assert_eq!(first.raw("survival"), None);
    }

    #[test]
    fn missing_required_column_names_the_factor() {
        let table = DataTable::new(["PatientId", "Age", "SurvivalProbability"])
            .with_row(["P1", "65", "0.8"]);
        let error = Dataset::from_table(
            &DatasetSchema::patient_triage(),
            &["urgency", "survival", "age"],
            &table,
        )
        .expect_err("urgency column missing");

        match &error {
            RankingError::Schema { column, .. } => assert_eq!(column, "urgency"),
            other => panic!("expected schema error, got {other:?}"),
        }
        assert!(error.to_string().contains("urgency"));
    }

    #[test]
    fn optional_factor_columns_may_be_absent() {
        let table = DataTable::new(["PatientId", "UrgencyScore"]).with_row(["P1", "4"]);
        let dataset = Dataset::from_table(&DatasetSchema::patient_triage(), &["urgency"], &table)
            .expect("only urgency required");
        assert_eq!(dataset.records()[0].raw("age"), None);
    }

    #[test]
    fn empty_cells_leave_features_unset() {
        let table = DataTable::new(["PatientId", "UrgencyScore"])
            .with_row(["P1", ""])
            .with_row(["P2", "3"]);
        let dataset = Dataset::from_table(&DatasetSchema::patient_triage(), &["urgency"], &table)
            .expect("dataset builds");
        assert_eq!(dataset.records()[0].raw("urgency"), None);
        assert_eq!(dataset.records()[1].raw("urgency"), Some(3.0));
    }

    #[test]
    fn non_numeric_cells_are_rejected_with_location() {
        let table = DataTable::new(["PatientId", "UrgencyScore"])
            .with_row(["P1", "4"])
            .with_row(["P2", "high"]);
        let error = Dataset::from_table(&DatasetSchema::patient_triage(), &["urgency"], &table)
            .expect_err("non-numeric urgency");

        assert_eq!(
            error,
            RankingError::InvalidValue {
                row: 2,
                column: "UrgencyScore".to_string(),
                value: "high".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let records = vec![
            EntityRecord::new("P1").with_raw("urgency", 1.0),
            EntityRecord::new("P1").with_raw("urgency", 2.0),
        ];
        let error = Dataset::new(DatasetSchema::patient_triage(), records).expect_err("duplicate");
        assert_eq!(error, RankingError::DuplicateEntity(EntityId::new("P1")));
    }

    #[test]
    fn bounded_values_outside_unit_interval_are_rejected() {
        let records = vec![EntityRecord::new("P1").with_bounded("survival", 1.2)];
        let error = Dataset::new(DatasetSchema::patient_triage(), records).expect_err("bounds");
        assert!(matches!(error, RankingError::OutOfBounds { .. }));
    }

    #[test]
    fn weighted_factor_missing_from_schema_is_a_configuration_error() {
        let error = Dataset::from_table(&DatasetSchema::patient_triage(), &["bmi"], &triage_table())
            .expect_err("unknown factor");
        assert_eq!(
            error,
            RankingError::Configuration(ConfigurationIssue::UnknownFactor("bmi".to_string()))
        );
    }
}
