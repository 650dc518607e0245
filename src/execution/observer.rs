use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::processing::SortStats;

use super::Operation;

/// Execution events emitted by the engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { operation: Operation, field: String },
    SortFinished { stats: SortStats },
    FilterFinished { matched: usize },
    AggregateFinished { ok: bool },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Logs execution events through `tracing` at debug level.
#[derive(Debug, Default)]
pub struct TracingExecutionObserver;

impl ExecutionObserver for TracingExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::RunFinished { elapsed, metrics } => {
                tracing::debug!(?elapsed, %metrics, "run finished");
            }
            other => tracing::debug!(event = ?other, "execution event"),
        }
    }
}

/// Counters for engine runs.
///
/// The engine updates these during execution; callers can snapshot them at any time. Counters
/// accumulate across runs except `elapsed`, which holds the last run's duration.
pub struct ExecutionMetrics {
    runs: AtomicU64,
    rows_processed: AtomicU64,
    comparisons: AtomicU64,
    swaps: AtomicU64,
    elapsed_ns: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            rows_processed: AtomicU64::new(0),
            comparisons: AtomicU64::new(0),
            swaps: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
        }
    }

    pub fn begin_run(&self, rows: usize) {
        let _ = self.runs.fetch_add(1, Ordering::SeqCst);
        let _ = self.rows_processed.fetch_add(rows as u64, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
    }

    pub fn on_sort(&self, stats: &SortStats) {
        let _ = self
            .comparisons
            .fetch_add(stats.comparisons as u64, Ordering::SeqCst);
        let _ = self.swaps.fetch_add(stats.swaps as u64, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns
            .store(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        ExecutionMetricsSnapshot {
            runs: self.runs.load(Ordering::SeqCst),
            rows_processed: self.rows_processed.load(Ordering::SeqCst),
            comparisons: self.comparisons.load(Ordering::SeqCst),
            swaps: self.swaps.load(Ordering::SeqCst),
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
        }
    }
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub runs: u64,
    pub rows_processed: u64,
    pub comparisons: u64,
    pub swaps: u64,
    pub elapsed: Option<Duration>,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "runs={}, rows_processed={}, comparisons={}, swaps={}, elapsed={:?}",
            self.runs, self.rows_processed, self.comparisons, self.swaps, self.elapsed
        )
    }
}
