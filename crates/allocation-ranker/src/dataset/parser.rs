use super::table::DataTable;
use super::DatasetImportError;
use std::io::Read;

pub(crate) fn read_table<R: Read>(reader: R) -> Result<DataTable, DatasetImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.iter().all(|header| header.is_empty()) {
        return Err(DatasetImportError::EmptyHeader);
    }

    let mut table = DataTable::new(headers.iter());
    for record in csv_reader.records() {
        let record = record?;
        table.push_row(record.iter().map(str::to_string).collect());
    }

    Ok(table)
}
