//! Observer hooks for session events.
//!
//! A [`SessionObserver`] is told when a file is loaded, when an operation completes and when
//! anything fails. [`crate::session::SessionOptions`] carries an optional observer and an alert
//! threshold; failures at or above the threshold are also passed to [`SessionObserver::on_alert`].

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::error::{ErrorClass, ExplorerError};
use crate::execution::Operation;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational event.
    Info,
    /// Bad user input that was re-prompted.
    Warning,
    /// An operation produced no result.
    Error,
    /// The session is stopping.
    Critical,
}

/// Map an error to the severity reported to observers.
pub fn severity_for_error(e: &ExplorerError) -> Severity {
    match e.class() {
        ErrorClass::Recoverable => Severity::Warning,
        ErrorClass::Data => Severity::Error,
        ErrorClass::Fatal => Severity::Critical,
    }
}

/// Context for a successful load.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// Path the records were read from.
    pub path: PathBuf,
}

/// Stats reported on a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    /// Number of fields in the first record.
    pub fields: usize,
}

/// Context for a completed operation.
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub operation: Operation,
    pub field: String,
}

/// Stats reported for a completed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationStats {
    /// Records in the session when the operation ran.
    pub input_rows: usize,
    /// Records printed; `None` for aggregations.
    pub output_rows: Option<usize>,
    pub elapsed: Duration,
}

/// Observer interface for session outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait SessionObserver: Send + Sync {
    /// Called when the record file is loaded.
    fn on_loaded(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    /// Called when an operation completes and its result has been printed.
    fn on_operation(&self, _ctx: &OperationContext, _stats: OperationStats) {}

    /// Called when input is rejected, an operation fails, or the session aborts.
    fn on_failure(&self, _severity: Severity, _error: &ExplorerError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, severity: Severity, error: &ExplorerError) {
        self.on_failure(severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn SessionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl SessionObserver for CompositeObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_loaded(ctx, stats);
        }
    }

    fn on_operation(&self, ctx: &OperationContext, stats: OperationStats) {
        for o in &self.observers {
            o.on_operation(ctx, stats);
        }
    }

    fn on_failure(&self, severity: Severity, error: &ExplorerError) {
        for o in &self.observers {
            o.on_failure(severity, error);
        }
    }

    fn on_alert(&self, severity: Severity, error: &ExplorerError) {
        for o in &self.observers {
            o.on_alert(severity, error);
        }
    }
}

/// Forwards session events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats) {
        tracing::info!(
            path = %ctx.path.display(),
            rows = stats.rows,
            fields = stats.fields,
            "records loaded"
        );
    }

    fn on_operation(&self, ctx: &OperationContext, stats: OperationStats) {
        tracing::info!(
            operation = %ctx.operation,
            field = %ctx.field,
            input_rows = stats.input_rows,
            output_rows = ?stats.output_rows,
            elapsed = ?stats.elapsed,
            "operation finished"
        );
    }

    fn on_failure(&self, severity: Severity, error: &ExplorerError) {
        match severity {
            Severity::Info => tracing::info!(%error, "operation failed"),
            Severity::Warning => tracing::warn!(%error, "input rejected"),
            Severity::Error | Severity::Critical => tracing::error!(?severity, %error, "operation failed"),
        }
    }

    fn on_alert(&self, severity: Severity, error: &ExplorerError) {
        tracing::error!(alert = true, ?severity, %error, "session alert");
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum EventLine<'a> {
    Loaded {
        ts: u64,
        path: String,
        rows: usize,
        fields: usize,
    },
    Operation {
        ts: u64,
        operation: Operation,
        field: &'a str,
        input_rows: usize,
        output_rows: Option<usize>,
        elapsed_us: u128,
    },
    Failure {
        ts: u64,
        severity: Severity,
        alert: bool,
        error: String,
    },
}

/// Appends session events to a local file, one JSON object per line.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, event: &EventLine<'_>) {
        let Ok(line) = serde_json::to_string(event) else {
            return;
        };
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl SessionObserver for FileObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats) {
        self.append(&EventLine::Loaded {
            ts: unix_ts(),
            path: ctx.path.display().to_string(),
            rows: stats.rows,
            fields: stats.fields,
        });
    }

    fn on_operation(&self, ctx: &OperationContext, stats: OperationStats) {
        self.append(&EventLine::Operation {
            ts: unix_ts(),
            operation: ctx.operation,
            field: &ctx.field,
            input_rows: stats.input_rows,
            output_rows: stats.output_rows,
            elapsed_us: stats.elapsed.as_micros(),
        });
    }

    fn on_failure(&self, severity: Severity, error: &ExplorerError) {
        self.append(&EventLine::Failure {
            ts: unix_ts(),
            severity,
            alert: false,
            error: error.to_string(),
        });
    }

    fn on_alert(&self, severity: Severity, error: &ExplorerError) {
        self.append(&EventLine::Failure {
            ts: unix_ts(),
            severity,
            alert: true,
            error: error.to_string(),
        });
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::{
        severity_for_error, FileObserver, LoadContext, LoadStats, OperationContext, OperationStats,
        SessionObserver, Severity,
    };
    use crate::error::ExplorerError;
    use crate::execution::Operation;

    #[test]
    fn severity_follows_error_class() {
        let bad = ExplorerError::InvalidField {
            token: "x".to_string(),
        };
        assert_eq!(severity_for_error(&bad), Severity::Warning);
        assert_eq!(severity_for_error(&ExplorerError::NoData), Severity::Error);
        assert_eq!(severity_for_error(&ExplorerError::EmptyDataSet), Severity::Critical);
        assert!(Severity::Critical > Severity::Error);
    }

    #[test]
    fn file_observer_writes_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let obs = FileObserver::new(&path);

        obs.on_loaded(
            &LoadContext {
                path: PathBuf::from("people.json"),
            },
            LoadStats { rows: 2, fields: 3 },
        );
        obs.on_operation(
            &OperationContext {
                operation: Operation::Filter,
                field: "name".to_string(),
            },
            OperationStats {
                input_rows: 2,
                output_rows: Some(1),
                elapsed: Duration::from_micros(15),
            },
        );
        obs.on_alert(Severity::Critical, &ExplorerError::EmptyDataSet);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "loaded");
        assert_eq!(lines[0]["rows"], 2);
        assert_eq!(lines[1]["operation"], "filtering");
        assert_eq!(lines[1]["output_rows"], 1);
        assert_eq!(lines[2]["severity"], "critical");
        assert_eq!(lines[2]["alert"], true);
    }
}
