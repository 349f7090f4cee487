//! Observability: runtime telemetry and the sink abstraction.
//!
//! Engine code never touches metrics state directly; all instrumentation
//! flows through `MetricsEvent` and `MetricsSink` in `sink`.

pub(crate) mod metrics;
pub mod sink;

pub use metrics::MetricsReport;
pub use sink::{ExecKind, MetricsEvent, MetricsSink, metrics_report, metrics_reset};
