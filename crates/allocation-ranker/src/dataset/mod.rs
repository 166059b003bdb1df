//! Dataset loaders feeding the ranking pipeline.
//!
//! Loaders only produce an untyped [`DataTable`]; column resolution, numeric parsing and
//! schema checks happen in [`crate::ranking::Dataset::from_table`].

mod normalizer;
mod parser;
mod sample;
mod table;

pub use table::DataTable;

use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum DatasetImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    EmptyHeader,
}

impl std::fmt::Display for DatasetImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetImportError::Io(err) => write!(f, "failed to read dataset: {}", err),
            DatasetImportError::Csv(err) => write!(f, "invalid dataset CSV data: {}", err),
            DatasetImportError::EmptyHeader => write!(f, "dataset CSV has no header row"),
        }
    }
}

impl std::error::Error for DatasetImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetImportError::Io(err) => Some(err),
            DatasetImportError::Csv(err) => Some(err),
            DatasetImportError::EmptyHeader => None,
        }
    }
}

impl From<std::io::Error> for DatasetImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DatasetImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Source of the table the pipeline ranks.
pub trait DatasetLoader {
    fn load(&self) -> Result<DataTable, DatasetImportError>;
}

/// Reads a headered CSV file from disk.
#[derive(Debug, Clone)]
pub struct CsvDatasetLoader {
    path: PathBuf,
}

impl CsvDatasetLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_table<R: Read>(reader: R) -> Result<DataTable, DatasetImportError> {
        parser::read_table(reader)
    }
}

impl DatasetLoader for CsvDatasetLoader {
    fn load(&self) -> Result<DataTable, DatasetImportError> {
        let file = std::fs::File::open(&self.path)?;
        Self::read_table(file)
    }
}

/// Built-in simulated patient table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleDatasetLoader;

impl DatasetLoader for SampleDatasetLoader {
    fn load(&self) -> Result<DataTable, DatasetImportError> {
        Ok(sample::sample_table())
    }
}
