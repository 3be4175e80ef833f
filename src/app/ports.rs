use anyhow::Result;

use crate::domain::{Dataset, Table};
use crate::pipeline::SequenceOutcome;

/// Loads one of the source tables
pub trait TableSource: Send + Sync {
    fn load_table(&self, dataset: Dataset) -> Result<Table>;
}

/// Persists the outcome of a matching run
pub trait MatchSink: Send + Sync {
    fn write_outcome(&self, outcome: &SequenceOutcome) -> Result<()>;
}

/// Translates German text. Failures are reported as `None`, never raised.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, target_language: &str) -> Option<String>;
}
