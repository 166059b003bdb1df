use super::normalizer::normalize_header;

/// Untyped rows handed over by a dataset loader, before any schema is applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row<I, S>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header matching `name` after header normalisation.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.headers
            .iter()
            .position(|header| normalize_header(header) == wanted)
    }

    /// Trimmed cell contents; cells past the end of a short row read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(|cell| cell.trim())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup_ignores_header_formatting() {
        let table = DataTable::new(["Patient ID", "UrgencyScore"]);
        assert_eq!(table.column_index("patient_id"), Some(0));
        assert_eq!(table.column_index("urgency score"), Some(1));
        assert_eq!(table.column_index("age"), None);
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let table = DataTable::new(["id", "age"]).with_row(["P1"]);
        assert_eq!(table.cell(0, 0), "P1");
        assert_eq!(table.cell(0, 1), "");
        assert_eq!(table.cell(5, 0), "");
    }
}
