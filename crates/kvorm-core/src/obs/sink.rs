//! Metrics sink boundary.
//!
//! Core engine logic MUST NOT depend on `obs::metrics` directly.
//! All instrumentation flows through `MetricsEvent` and `MetricsSink`;
//! this module is the only bridge between execution logic and the global
//! metrics state.

use crate::obs::metrics::{self, MetricsReport, STATE};
use std::sync::atomic::Ordering;

///
/// ExecKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecKind {
    Load,
    Save,
    Delete,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    ExecStart { kind: ExecKind },
    ExecFinish { kind: ExecKind, rows: u64 },
    UniqueViolation,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-local sink writing into the global counters.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ExecStart { kind } => {
                let counter = match kind {
                    ExecKind::Load => &STATE.load_calls,
                    ExecKind::Save => &STATE.save_calls,
                    ExecKind::Delete => &STATE.delete_calls,
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }
            MetricsEvent::ExecFinish { kind, rows } => {
                if kind == ExecKind::Load {
                    STATE.rows_fetched.fetch_add(rows, Ordering::Relaxed);
                }
            }
            MetricsEvent::UniqueViolation => {
                STATE.unique_violations.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Record one event through the process sink.
pub(crate) fn emit(event: MetricsEvent) {
    GlobalMetricsSink.record(event);
}

/// Snapshot the global counters.
#[must_use]
pub fn metrics_report() -> MetricsReport {
    metrics::report()
}

/// Zero the global counters.
pub fn metrics_reset() {
    metrics::reset();
}
