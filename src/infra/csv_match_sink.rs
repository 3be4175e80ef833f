use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::ports::MatchSink;
use crate::constants::{KUNUNU_UNMATCHED_FILE, MATCHES_FILE, ORBIS_UNMATCHED_FILE};
use crate::domain::{MatchTable, Table};
use crate::pipeline::SequenceOutcome;

/// Writes matches and both residual tables as CSV files into one directory
pub struct CsvMatchSink {
    output_dir: PathBuf,
}

impl CsvMatchSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn writer(&self, file_name: &str) -> Result<csv::Writer<fs::File>> {
        let path = self.output_dir.join(file_name);
        csv::WriterBuilder::new()
            .has_headers(true)
            .quote_style(csv::QuoteStyle::Necessary)
            .from_path(&path)
            .with_context(|| format!("Failed to create {}", path.display()))
    }

    fn write_matches(&self, matches: &MatchTable) -> Result<()> {
        let mut writer = self.writer(MATCHES_FILE)?;
        writer.write_record(matches.headers())?;
        for row in matches.iter() {
            writer.write_record(matches.row_values(row))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_table(&self, file_name: &str, table: &Table) -> Result<()> {
        let mut writer = self.writer(file_name)?;
        writer.write_record(table.columns())?;
        for record in table.iter() {
            writer.write_record(table.row_values(record))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl MatchSink for CsvMatchSink {
    fn write_outcome(&self, outcome: &SequenceOutcome) -> Result<()> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create output directory {}", self.output_dir.display()))?;

        self.write_matches(&outcome.matches)?;
        self.write_table(ORBIS_UNMATCHED_FILE, &outcome.orbis)?;
        self.write_table(KUNUNU_UNMATCHED_FILE, &outcome.kununu)?;

        info!(
            "Wrote {} matches and {}/{} unmatched Orbis/Kununu records to {}",
            outcome.matches.len(),
            outcome.orbis.len(),
            outcome.kununu.len(),
            self.output_dir.display()
        );
        Ok(())
    }
}
