use std::path::{Path, PathBuf};

use crate::app::ports::TableSource;
use crate::domain::{Dataset, Table};
use crate::error::Result;

/// Reads the Orbis and Kununu tables from CSV files with a header row
pub struct CsvTableSource {
    orbis_path: PathBuf,
    kununu_path: PathBuf,
    delimiter: u8,
}

impl CsvTableSource {
    pub fn new(orbis_path: impl Into<PathBuf>, kununu_path: impl Into<PathBuf>) -> Self {
        Self {
            orbis_path: orbis_path.into(),
            kununu_path: kununu_path.into(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn path_for(&self, dataset: Dataset) -> &Path {
        match dataset {
            Dataset::Orbis => &self.orbis_path,
            Dataset::Kununu => &self.kununu_path,
        }
    }
}

impl TableSource for CsvTableSource {
    fn load_table(&self, dataset: Dataset) -> anyhow::Result<Table> {
        Ok(read_table(self.path_for(dataset), dataset, self.delimiter)?)
    }
}

/// Read one CSV file into a table, checking the dataset's required columns
pub fn read_table(path: &Path, dataset: Dataset, delimiter: u8) -> Result<Table> {
    // flexible so short rows surface as MalformedRow with a row number
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Table::from_rows(dataset, headers, rows)
}
