use super::table::DataTable;

const SAMPLE_HEADERS: [&str; 4] = ["PatientId", "Age", "UrgencyScore", "SurvivalProbability"];

const SAMPLE_ROWS: [[&str; 4]; 6] = [
    ["P001", "65", "9", "0.8"],
    ["P002", "50", "7", "0.6"],
    ["P003", "80", "10", "0.3"],
    ["P004", "45", "6", "0.7"],
    ["P005", "30", "5", "0.9"],
    ["P010", "80", "10", "1.0"],
];

/// Six simulated patients used by demos and documentation examples.
pub(crate) fn sample_table() -> DataTable {
    SAMPLE_ROWS
        .iter()
        .fold(DataTable::new(SAMPLE_HEADERS), |table, row| {
            table.with_row(row.iter().copied())
        })
}
