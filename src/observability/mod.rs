// Observability: metrics emitted by the matching pipeline

pub mod metrics;

pub use metrics::{emit_counter, emit_gauge, MetricName};
