//! Execution engine for one interactive request.
//!
//! This module sits "above" [`crate::processing`]. Every run first sorts the whole
//! [`RecordSet`] ascending by the requested field, in place, and then applies the requested
//! operation to that baseline ordering. The engine also keeps metrics and reports
//! [`ExecutionEvent`]s to an optional observer.

mod observer;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::error::ExplorerResult;
use crate::processing::{aggregate, bubble_sort, filter, reverse, AggregateOptions, Aggregation, SortOrder};
use crate::types::{FieldSelector, Record, RecordSet};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, TracingExecutionObserver,
};

/// The three operations a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    #[serde(rename = "sorting")]
    Sort,
    #[serde(rename = "filtering")]
    Filter,
    #[serde(rename = "aggregation")]
    Aggregate,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Sort, Operation::Filter, Operation::Aggregate];

    /// Resolve a menu token: `1`/`2`/`3` or the operation name, case-insensitive.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "1" | "sorting" => Some(Operation::Sort),
            "2" | "filtering" => Some(Operation::Filter),
            "3" | "aggregation" => Some(Operation::Aggregate),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Sort => "sorting",
            Operation::Filter => "filtering",
            Operation::Aggregate => "aggregation",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operation together with its collected parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationParams {
    Sort { order: SortOrder },
    Filter { value: String },
    Aggregate,
}

impl OperationParams {
    pub fn operation(&self) -> Operation {
        match self {
            OperationParams::Sort { .. } => Operation::Sort,
            OperationParams::Filter { .. } => Operation::Filter,
            OperationParams::Aggregate => Operation::Aggregate,
        }
    }
}

/// A fully collected request: which field, which operation, which parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub field: FieldSelector,
    pub params: OperationParams,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Sorted or filtered records, in output order.
    Records(Vec<Record>),
    Aggregation(Aggregation),
}

/// Runs [`Request`]s against a [`RecordSet`].
pub struct ExecutionEngine {
    aggregate: AggregateOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("aggregate", &self.aggregate)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new(AggregateOptions::default())
    }
}

impl ExecutionEngine {
    pub fn new(aggregate: AggregateOptions) -> Self {
        Self {
            aggregate,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        }
    }

    /// Attach an observer for execution events.
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to the engine's metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Execute `request`.
    ///
    /// `dataset` is left sorted ascending by the request's field. Sort requests return that
    /// order (reversed into a copy for descending); filter and aggregate requests work on it.
    pub fn run(&self, dataset: &mut RecordSet, request: &Request) -> ExplorerResult<Outcome> {
        let start = Instant::now();
        let field = request.field.as_str();
        self.metrics.begin_run(dataset.row_count());
        self.emit(ExecutionEvent::RunStarted {
            operation: request.params.operation(),
            field: field.to_string(),
        });

        let stats = bubble_sort(dataset.records_mut(), field)?;
        self.metrics.on_sort(&stats);
        self.emit(ExecutionEvent::SortFinished { stats });

        let sorted = dataset.records();
        let outcome = match &request.params {
            OperationParams::Sort { order } => Outcome::Records(match order {
                SortOrder::Ascending => sorted.to_vec(),
                SortOrder::Descending => reverse(sorted),
            }),
            OperationParams::Filter { value } => {
                let matched = filter(sorted, field, value)?;
                self.emit(ExecutionEvent::FilterFinished {
                    matched: matched.len(),
                });
                Outcome::Records(matched)
            }
            OperationParams::Aggregate => {
                let result = aggregate(sorted, field, &self.aggregate);
                self.emit(ExecutionEvent::AggregateFinished { ok: result.is_ok() });
                Outcome::Aggregation(result?)
            }
        };

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        Ok(outcome)
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(o) = &self.observer {
            o.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{
        ExecutionEngine, ExecutionEvent, ExecutionObserver, Operation, OperationParams, Outcome, Request,
    };
    use crate::error::ExplorerError;
    use crate::processing::{Aggregation, SortOrder};
    use crate::types::{Record, RecordSet, Value};

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ExecutionObserver for Recorder {
        fn on_event(&self, event: &ExecutionEvent) {
            let name = match event {
                ExecutionEvent::RunStarted { .. } => "run_started",
                ExecutionEvent::SortFinished { .. } => "sort_finished",
                ExecutionEvent::FilterFinished { .. } => "filter_finished",
                ExecutionEvent::AggregateFinished { .. } => "aggregate_finished",
                ExecutionEvent::RunFinished { .. } => "run_finished",
            };
            self.events.lock().unwrap().push(name.to_string());
        }
    }

    fn people() -> RecordSet {
        RecordSet::new(vec![
            Record::from_iter([("name", Value::from("Bob")), ("age", Value::from(30))]),
            Record::from_iter([("name", Value::from("Amy")), ("age", Value::from(25))]),
            Record::from_iter([("name", Value::from("Cid")), ("age", Value::from(25))]),
        ])
        .unwrap()
    }

    fn names(records: &[Record]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.get("name").map(|v| v.to_string()).unwrap_or_default())
            .collect()
    }

    fn request(ds: &RecordSet, field: &str, params: OperationParams) -> Request {
        Request {
            field: ds.field(field).unwrap(),
            params,
        }
    }

    #[test]
    fn operation_tokens() {
        assert_eq!(Operation::parse("1"), Some(Operation::Sort));
        assert_eq!(Operation::parse(" Filtering "), Some(Operation::Filter));
        assert_eq!(Operation::parse("AGGREGATION"), Some(Operation::Aggregate));
        assert_eq!(Operation::parse("sort"), None);
        assert_eq!(Operation::parse("4"), None);
        assert_eq!(Operation::ALL.len(), 3);
    }

    #[test]
    fn baseline_sort_persists_in_dataset() {
        let engine = ExecutionEngine::default();
        let mut ds = people();
        let req = request(&ds, "age", OperationParams::Aggregate);
        engine.run(&mut ds, &req).unwrap();
        assert_eq!(names(ds.records()), vec!["Amy", "Cid", "Bob"]);
    }

    #[test]
    fn descending_sort_reverses_baseline_but_dataset_stays_ascending() {
        let engine = ExecutionEngine::default();
        let mut ds = people();
        let req = request(
            &ds,
            "age",
            OperationParams::Sort {
                order: SortOrder::Descending,
            },
        );
        let Outcome::Records(out) = engine.run(&mut ds, &req).unwrap() else {
            panic!("expected records");
        };
        assert_eq!(names(&out), vec!["Bob", "Cid", "Amy"]);
        assert_eq!(names(ds.records()), vec!["Amy", "Cid", "Bob"]);
    }

    #[test]
    fn filter_runs_on_sorted_records() {
        let engine = ExecutionEngine::default();
        let mut ds = people();
        let req = request(
            &ds,
            "age",
            OperationParams::Filter {
                value: "25".to_string(),
            },
        );
        let Outcome::Records(out) = engine.run(&mut ds, &req).unwrap() else {
            panic!("expected records");
        };
        assert_eq!(names(&out), vec!["Amy", "Cid"]);
    }

    #[test]
    fn aggregation_outcome_and_events() {
        let recorder = Arc::new(Recorder::default());
        let engine = ExecutionEngine::default().with_observer(recorder.clone());
        let mut ds = people();
        let req = request(&ds, "age", OperationParams::Aggregate);
        let Outcome::Aggregation(Aggregation::Numeric(s)) = engine.run(&mut ds, &req).unwrap() else {
            panic!("expected numeric aggregation");
        };
        assert_eq!(s.average, 26.67);
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["run_started", "sort_finished", "aggregate_finished", "run_finished"]
        );

        let snap = engine.metrics().snapshot();
        assert_eq!(snap.runs, 1);
        assert_eq!(snap.rows_processed, 3);
        assert!(snap.swaps > 0);
    }

    #[test]
    fn missing_field_in_later_record_aborts_run() {
        let engine = ExecutionEngine::default();
        let mut ds = RecordSet::new(vec![
            Record::from_iter([("name", "Bob"), ("team", "red")]),
            Record::from_iter([("name", "Amy")]),
        ])
        .unwrap();
        let req = request(&ds, "team", OperationParams::Aggregate);
        let err = engine.run(&mut ds, &req).unwrap_err();
        assert!(matches!(err, ExplorerError::MissingField { row: 2, .. }));
    }
}
