use std::sync::atomic::{AtomicU64, Ordering};

///
/// MetricsState
///
/// Process-wide execution counters. Atomics keep recording lock-free so
/// concurrent query materialization never serializes on telemetry.
///

#[derive(Debug, Default)]
pub(crate) struct MetricsState {
    pub load_calls: AtomicU64,
    pub save_calls: AtomicU64,
    pub delete_calls: AtomicU64,
    pub rows_fetched: AtomicU64,
    pub unique_violations: AtomicU64,
}

pub(crate) static STATE: MetricsState = MetricsState {
    load_calls: AtomicU64::new(0),
    save_calls: AtomicU64::new(0),
    delete_calls: AtomicU64::new(0),
    rows_fetched: AtomicU64::new(0),
    unique_violations: AtomicU64::new(0),
};

///
/// MetricsReport
///
/// Point-in-time copy of the counters, for observability surfaces.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MetricsReport {
    pub load_calls: u64,
    pub save_calls: u64,
    pub delete_calls: u64,
    pub rows_fetched: u64,
    pub unique_violations: u64,
}

pub(crate) fn report() -> MetricsReport {
    MetricsReport {
        load_calls: STATE.load_calls.load(Ordering::Relaxed),
        save_calls: STATE.save_calls.load(Ordering::Relaxed),
        delete_calls: STATE.delete_calls.load(Ordering::Relaxed),
        rows_fetched: STATE.rows_fetched.load(Ordering::Relaxed),
        unique_violations: STATE.unique_violations.load(Ordering::Relaxed),
    }
}

pub(crate) fn reset() {
    STATE.load_calls.store(0, Ordering::Relaxed);
    STATE.save_calls.store(0, Ordering::Relaxed);
    STATE.delete_calls.store(0, Ordering::Relaxed);
    STATE.rows_fetched.store(0, Ordering::Relaxed);
    STATE.unique_violations.store(0, Ordering::Relaxed);
}
