// Matching pipeline: name normalization, word statistics, and the step-wise matcher

pub mod processing;

pub use processing::matcher::{match_firms, StepOutput};
pub use processing::sequence::{match_firms_in_sequence, MatchReport, MatchStep, SequenceOutcome, StepReport};
