use serde::Serialize;
use tracing::{info, info_span};

use super::matcher::match_firms;
use crate::domain::{MatchTable, MatchedIds, Table};
use crate::error::Result;
use crate::observability::metrics::{emit_counter, emit_gauge, MetricName};
use crate::pipeline::processing::normalize::NameTransform;

/// A labelled normalization applied before one exact-match join
pub struct MatchStep {
    label: String,
    transform: Box<dyn NameTransform>,
}

impl MatchStep {
    pub fn new(label: impl Into<String>, transform: impl NameTransform + 'static) -> Self {
        Self {
            label: label.into(),
            transform: Box::new(transform),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn transform(&self) -> &dyn NameTransform {
        self.transform.as_ref()
    }
}

impl std::fmt::Debug for MatchStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchStep").field("label", &self.label).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub label: String,
    pub matches: usize,
    pub cumulative_matches: usize,
}

/// Diagnostic counts for a full run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    /// Kununu rows before any step ran
    pub initial_kununu_rows: usize,
    pub steps: Vec<StepReport>,
}

impl MatchReport {
    pub fn total_matches(&self) -> usize {
        self.steps.last().map(|s| s.cumulative_matches).unwrap_or(0)
    }

    /// Share of the original Kununu rows that were matched, in percent
    pub fn coverage_pct(&self) -> f64 {
        if self.initial_kununu_rows == 0 {
            return 0.0;
        }
        100.0 * self.total_matches() as f64 / self.initial_kununu_rows as f64
    }
}

#[derive(Debug, Clone)]
pub struct SequenceOutcome {
    /// Orbis rows that were never matched
    pub orbis: Table,
    /// Kununu rows that were never matched
    pub kununu: Table,
    /// Matches from every step, in step order
    pub matches: MatchTable,
    pub matched_ids: MatchedIds,
    pub report: MatchReport,
}

/// Run the matcher once per step, in order, threading the shrinking tables
/// and the growing id set from one step into the next.
pub fn match_firms_in_sequence(orbis: Table, kununu: Table, steps: &[MatchStep]) -> Result<SequenceOutcome> {
    let initial_kununu_rows = kununu.len();
    let mut orbis = orbis;
    let mut kununu = kununu;
    let mut matched_ids = MatchedIds::new();
    let mut step_matches = Vec::with_capacity(steps.len());
    let mut report = MatchReport {
        initial_kununu_rows,
        steps: Vec::with_capacity(steps.len()),
    };

    for step in steps {
        let span = info_span!("match_step", label = %step.label());
        let _enter = span.enter();

        let out = match_firms(&orbis, &kununu, &matched_ids, step.transform(), step.label())?;
        let cumulative_matches = report.total_matches() + out.matches.len();
        report.steps.push(StepReport {
            label: step.label().to_string(),
            matches: out.matches.len(),
            cumulative_matches,
        });

        orbis = out.orbis;
        kununu = out.kununu;
        matched_ids = out.matched_ids;
        step_matches.push(out.matches);
    }

    let matches = MatchTable::concat(step_matches);
    let orbis = orbis.without_ids(&matched_ids);
    let kununu = kununu.without_ids(&matched_ids);

    info!("Matched {:.2}% of Kununu firms.", report.coverage_pct());
    emit_gauge(MetricName::MatchCoveragePercent, report.coverage_pct());
    emit_counter(MetricName::MatchSequencesRun, 1.0);

    Ok(SequenceOutcome {
        orbis,
        kununu,
        matches,
        matched_ids,
        report,
    })
}
