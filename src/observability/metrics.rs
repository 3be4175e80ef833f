//! Metric names and recording helpers for the linkage pipeline.
//!
//! Values go through the `metrics` facade; without an installed recorder
//! they are dropped.

use std::fmt;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Matching
    MatchStepsRun,
    MatchRecordsMatched,
    MatchSequencesRun,
    MatchCoveragePercent,

    // Word frequency
    CommonWordsDetected,

    // Translation collaborator
    TranslationRequestsSuccess,
    TranslationRequestsError,
}

impl MetricName {
    /// Get the metric name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::MatchStepsRun => "linkage_match_steps_total",
            MetricName::MatchRecordsMatched => "linkage_records_matched_total",
            MetricName::MatchSequencesRun => "linkage_match_sequences_total",
            MetricName::MatchCoveragePercent => "linkage_kununu_coverage_percent",
            MetricName::CommonWordsDetected => "linkage_common_words_detected",
            MetricName::TranslationRequestsSuccess => "linkage_translation_requests_success_total",
            MetricName::TranslationRequestsError => "linkage_translation_requests_error_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn emit_counter(name: MetricName, value: f64) {
    ::metrics::counter!(name.as_str()).increment(value as u64);
}

pub fn emit_gauge(name: MetricName, value: f64) {
    ::metrics::gauge!(name.as_str()).set(value);
}
