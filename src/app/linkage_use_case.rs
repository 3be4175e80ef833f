use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::app::ports::{MatchSink, TableSource};
use crate::config::Config;
use crate::domain::{Dataset, Table};
use crate::observability::metrics::{emit_gauge, MetricName};
use crate::pipeline::processing::normalize::{preprocess_name, TransformRegistry};
use crate::pipeline::processing::word_frequency::most_common_words;
use crate::pipeline::{match_firms_in_sequence, SequenceOutcome};

/// Use case for linking the Orbis and Kununu tables end to end
pub struct LinkageUseCase {
    config: Config,
    source: Arc<dyn TableSource>,
    sink: Arc<dyn MatchSink>,
}

impl LinkageUseCase {
    pub fn new(config: Config, source: Arc<dyn TableSource>, sink: Arc<dyn MatchSink>) -> Self {
        Self { config, source, sink }
    }

    /// Load, match and persist. Returns the outcome that was written.
    pub fn run(&self) -> Result<SequenceOutcome> {
        let orbis = self.load(Dataset::Orbis, self.config.input.orbis_sort_column.as_deref())?;
        let kununu = self.load(Dataset::Kununu, self.config.input.kununu_sort_column.as_deref())?;

        let outcome = self.match_tables(orbis, kununu)?;

        self.sink
            .write_outcome(&outcome)
            .context("Failed to write match results")?;
        Ok(outcome)
    }

    /// Preprocess both tables, derive the common words, and run every
    /// configured step. Tables must already be in priority order.
    pub fn match_tables(&self, orbis: Table, kununu: Table) -> Result<SequenceOutcome> {
        let orbis = orbis.map_names(preprocess_name);
        let kununu = kununu.map_names(preprocess_name);

        let common_words = most_common_words(
            orbis.names().chain(kununu.names()),
            self.config.normalizer.common_word_percentile,
        )
        .context("Failed to compute common words")?;
        info!("Detected {} common words", common_words.len());
        debug!("Common words: {:?}", common_words);
        emit_gauge(MetricName::CommonWordsDetected, common_words.len() as f64);

        let registry = TransformRegistry::new(&self.config.normalizer, common_words);
        let steps = registry
            .build_steps(&self.config.steps)
            .context("Failed to build matching steps")?;

        info!(
            "Matching {} Orbis against {} Kununu firms in {} steps",
            orbis.len(),
            kununu.len(),
            steps.len()
        );
        let outcome = match_firms_in_sequence(orbis, kununu, &steps).context("Matching run failed")?;
        Ok(outcome)
    }

    fn load(&self, dataset: Dataset, sort_column: Option<&str>) -> Result<Table> {
        let mut table = self
            .source
            .load_table(dataset)
            .with_context(|| format!("Failed to load {} table", dataset))?;

        if let Some(column) = sort_column {
            table
                .sort_by_numeric_desc(column)
                .with_context(|| format!("Failed to sort {} table by '{}'", dataset, column))?;
        }

        info!("Loaded {} {} records", table.len(), dataset);
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StepConfig;
    use crate::domain::Record;
    use std::sync::Mutex;

    struct MockTableSource {
        orbis: Table,
        kununu: Table,
    }

    impl TableSource for MockTableSource {
        fn load_table(&self, dataset: Dataset) -> Result<Table> {
            Ok(match dataset {
                Dataset::Orbis => self.orbis.clone(),
                Dataset::Kununu => self.kununu.clone(),
            })
        }
    }

    struct MockMatchSink {
        written: Mutex<Vec<usize>>,
    }

    impl MatchSink for MockMatchSink {
        fn write_outcome(&self, outcome: &SequenceOutcome) -> Result<()> {
            self.written.lock().unwrap().push(outcome.matches.len());
            Ok(())
        }
    }

    fn fixtures() -> (Table, Table) {
        let mut orbis = Table::new(Dataset::Orbis);
        orbis.push(Record::new("1", "Müller Bäckerei GmbH"));
        orbis.push(Record::new("2", "Acme Aktiengesellschaft"));
        orbis.push(Record::new("3", "Zeta Werke"));

        let mut kununu = Table::new(Dataset::Kununu);
        kununu.push(Record::new("k1", "Acme AG").with_field("reviews", "3"));
        kununu.push(Record::new("k2", "acme ag").with_field("reviews", "120"));
        kununu.push(Record::new("k3", "Mller Bckerei").with_field("reviews", "n.a."));
        (orbis, kununu)
    }

    fn use_case(config: Config) -> (LinkageUseCase, Arc<MockMatchSink>) {
        let (orbis, kununu) = fixtures();
        let sink = Arc::new(MockMatchSink {
            written: Mutex::new(Vec::new()),
        });
        let use_case = LinkageUseCase::new(config, Arc::new(MockTableSource { orbis, kununu }), sink.clone());
        (use_case, sink)
    }

    #[test]
    fn test_run_with_default_steps() {
        let mut config = Config::default();
        config.input.kununu_sort_column = Some("reviews".to_string());
        let (use_case, sink) = use_case(config);

        let outcome = use_case.run().unwrap();

        // "acme aktiengesellschaft" meets "acme ag" at the abbreviation step;
        // the better-reviewed duplicate wins after sorting
        let acme = outcome.matches.iter().find(|m| m.orbis.id == "2").unwrap();
        assert_eq!(acme.kununu.id, "k2");
        assert_eq!(acme.match_type, "abbreviations");

        // preprocessing drops umlauts, the suffix step removes "gmbh"
        let mueller = outcome.matches.iter().find(|m| m.orbis.id == "1").unwrap();
        assert_eq!(mueller.kununu.id, "k3");
        assert_eq!(mueller.match_type, "suffixes");

        assert_eq!(outcome.orbis.len(), 1);
        assert_eq!(outcome.orbis.records()[0].id, "3");
        assert_eq!(outcome.kununu.len(), 1);
        assert_eq!(outcome.kununu.records()[0].id, "k1");
        assert_eq!(*sink.written.lock().unwrap(), vec![2]);
    }

    #[test]
    fn test_run_without_sort_keeps_source_order() {
        let mut config = Config::default();
        config.steps = vec![StepConfig {
            label: "abbreviations".to_string(),
            transforms: vec!["standardize_abbreviations".to_string()],
        }];
        let (use_case, _sink) = use_case(config);

        let outcome = use_case.run().unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches.rows()[0].kununu.id, "k1");
    }

    #[test]
    fn test_run_fails_on_missing_sort_column() {
        let mut config = Config::default();
        config.input.orbis_sort_column = Some("employees".to_string());
        let (use_case, sink) = use_case(config);

        let err = use_case.run().unwrap_err();
        assert!(err.to_string().contains("Failed to sort Orbis table"));
        assert!(sink.written.lock().unwrap().is_empty());
    }
}
