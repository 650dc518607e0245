//! Interactive prompt loop.
//!
//! A [`Session`] owns the loaded [`RecordSet`] and drives one cycle per operation:
//!
//! 1. select an operation (`1`/`2`/`3` or `sorting`/`filtering`/`aggregation`)
//! 2. select a field (1-based menu index or exact name)
//! 3. collect the operation's parameter
//! 4. execute (always sorting the record set by the field first)
//! 5. print the result
//! 6. ask whether to continue
//!
//! An invalid operation or field restarts the cycle from step 1. The session ends only when the
//! user declines to continue and then confirms the exit; any other answer continues.
//!
//! Input and output are generic so tests can script a whole session over in-memory buffers.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{ErrorClass, ExplorerError, ExplorerResult};
use crate::execution::{ExecutionEngine, ExecutionObserver, Operation, OperationParams, Outcome, Request};
use crate::ingestion::{load_json_from_path, normalize_filename, DEFAULT_FILENAME};
use crate::observability::{
    severity_for_error, LoadContext, LoadStats, OperationContext, OperationStats, SessionObserver, Severity,
};
use crate::processing::{AggregateOptions, SortOrder};
use crate::report;
use crate::types::{FieldSelector, RecordSet};

/// Tokens accepted as "yes".
pub const APPROVE: [&str; 3] = ["y", "yes", "1"];
/// Tokens accepted as "no".
pub const DISAPPROVE: [&str; 3] = ["n", "no", "2"];

/// A yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Approve,
    Disapprove,
    /// Anything outside both token sets.
    Other,
}

impl Answer {
    /// Classify a raw answer, trimmed and case-insensitive.
    pub fn parse(input: &str) -> Self {
        let token = input.trim().to_lowercase();
        if APPROVE.contains(&token.as_str()) {
            Answer::Approve
        } else if DISAPPROVE.contains(&token.as_str()) {
            Answer::Disapprove
        } else {
            Answer::Other
        }
    }
}

/// Options controlling a session.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct SessionOptions {
    /// Filename used when the filename prompt is answered with an empty line.
    pub default_filename: String,
    /// If set, used as the first answer to the filename prompt.
    pub initial_filename: Option<String>,
    /// Options passed to the aggregator.
    pub aggregate: AggregateOptions,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn SessionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
    /// Optional observer for per-run execution events.
    pub execution_observer: Option<Arc<dyn ExecutionObserver>>,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("default_filename", &self.default_filename)
            .field("initial_filename", &self.initial_filename)
            .field("aggregate", &self.aggregate)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("execution_observer_set", &self.execution_observer.is_some())
            .finish()
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            default_filename: DEFAULT_FILENAME.to_string(),
            initial_filename: None,
            aggregate: AggregateOptions::default(),
            observer: None,
            alert_at_or_above: Severity::Critical,
            execution_observer: None,
        }
    }
}

impl SessionOptions {
    fn notify_failure(&self, severity: Severity, error: &ExplorerError) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_failure(severity, error);
            if severity >= self.alert_at_or_above {
                obs.on_alert(severity, error);
            }
        }
    }
}

/// Read one line after printing `prompt`. Returns the line without its line ending.
fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    label: &str,
) -> ExplorerResult<String> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ExplorerError::InputClosed {
            prompt: label.to_string(),
        });
    }
    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(line)
}

/// Prompt for a filename until a file loads.
///
/// A missing file is reported and the prompt repeats with no retry limit. Any other failure
/// (unreadable file, malformed JSON, empty array, nested values) is returned.
pub fn load_interactive<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    options: &SessionOptions,
) -> ExplorerResult<(PathBuf, RecordSet)> {
    let mut preset = options.initial_filename.clone();
    loop {
        let answer = match preset.take() {
            Some(name) => name,
            None => prompt_line(
                input,
                output,
                &format!("Enter JSON filename (default: {}): ", options.default_filename),
                "filename",
            )?,
        };
        let path = normalize_filename(&answer, &options.default_filename);

        match load_json_from_path(&path) {
            Ok(dataset) => {
                writeln!(
                    output,
                    "Your data has been loaded successfully from {}.",
                    path.display()
                )?;
                if let Some(obs) = options.observer.as_ref() {
                    obs.on_loaded(
                        &LoadContext { path: path.clone() },
                        LoadStats {
                            rows: dataset.row_count(),
                            fields: dataset.field_names().len(),
                        },
                    );
                }
                return Ok((path, dataset));
            }
            Err(ExplorerError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                writeln!(
                    output,
                    "Error: Could not find the file '{}'. Please try again.",
                    path.display()
                )?;
                options.notify_failure(Severity::Warning, &ExplorerError::Io(e));
            }
            Err(e) => {
                options.notify_failure(Severity::Critical, &e);
                return Err(e);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive session over a loaded record set.
pub struct Session<R, W> {
    input: R,
    output: W,
    dataset: RecordSet,
    engine: ExecutionEngine,
    options: SessionOptions,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, dataset: RecordSet, options: SessionOptions) -> Self {
        let mut engine = ExecutionEngine::new(options.aggregate);
        if let Some(obs) = options.execution_observer.clone() {
            engine = engine.with_observer(obs);
        }
        Self {
            input,
            output,
            dataset,
            engine,
            options,
        }
    }

    /// The record set in its current order.
    pub fn dataset(&self) -> &RecordSet {
        &self.dataset
    }

    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    /// Split the session back into its parts.
    pub fn into_parts(self) -> (R, W, RecordSet) {
        (self.input, self.output, self.dataset)
    }

    /// Run cycles until the user confirms exit.
    ///
    /// Returns `Ok(())` on a confirmed exit and `Err` on a fatal error.
    pub fn run(&mut self) -> ExplorerResult<()> {
        loop {
            match self.run_cycle() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(e) => {
                    self.options.notify_failure(severity_for_error(&e), &e);
                    return Err(e);
                }
            }
        }
    }

    fn run_cycle(&mut self) -> ExplorerResult<Flow> {
        let Some(operation) = self.select_operation()? else {
            writeln!(self.output, "Invalid operation, please try again")?;
            return Ok(Flow::Continue);
        };

        let Some(field) = self.select_field()? else {
            writeln!(self.output, "Invalid primary key, please try again")?;
            return Ok(Flow::Continue);
        };

        let params = self.collect_params(operation, &field)?;
        let request = Request { field, params };
        self.execute_and_present(&request)?;

        self.continue_or_exit()
    }

    fn prompt(&mut self, prompt: &str, label: &str) -> ExplorerResult<String> {
        prompt_line(&mut self.input, &mut self.output, prompt, label)
    }

    fn select_operation(&mut self) -> ExplorerResult<Option<Operation>> {
        writeln!(self.output)?;
        writeln!(self.output, "Available operations:")?;
        for (i, op) in Operation::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}/{} algorithm", i + 1, op.name(), op.name())?;
        }
        let token = self.prompt("Enter operation (number or name): ", "operation")?;

        let operation = Operation::parse(&token);
        if operation.is_none() {
            self.options.notify_failure(
                Severity::Warning,
                &ExplorerError::InvalidOperation {
                    token: token.trim().to_string(),
                },
            );
        }
        Ok(operation)
    }

    fn select_field(&mut self) -> ExplorerResult<Option<FieldSelector>> {
        writeln!(self.output)?;
        writeln!(self.output, "Available keys:")?;
        let names: Vec<String> = self
            .dataset
            .field_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        for (i, name) in names.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, name)?;
        }
        writeln!(
            self.output,
            "Enter the number corresponding to the key, or the exact key (case-sensitive):"
        )?;
        let token = self.prompt("Enter your choice: ", "field")?;

        let field = self.dataset.resolve_field(&token);
        if field.is_none() {
            let err = ExplorerError::InvalidField {
                token: token.trim().to_string(),
            };
            writeln!(self.output, "{err}")?;
            self.options.notify_failure(Severity::Warning, &err);
        }
        Ok(field)
    }

    fn collect_params(&mut self, operation: Operation, field: &FieldSelector) -> ExplorerResult<OperationParams> {
        Ok(match operation {
            Operation::Sort => {
                let answer = self.prompt(
                    "Would you like to sort in descending order? (y/n): ",
                    "sort order",
                )?;
                let order = match Answer::parse(&answer) {
                    Answer::Approve => SortOrder::Descending,
                    Answer::Disapprove | Answer::Other => SortOrder::Ascending,
                };
                OperationParams::Sort { order }
            }
            Operation::Filter => {
                let value = self.prompt(&format!("Enter value to filter by for {field}: "), "filter value")?;
                OperationParams::Filter {
                    value: value.trim().to_string(),
                }
            }
            Operation::Aggregate => OperationParams::Aggregate,
        })
    }

    fn execute_and_present(&mut self, request: &Request) -> ExplorerResult<()> {
        let start = Instant::now();
        let input_rows = self.dataset.row_count();

        let output_rows = match self.engine.run(&mut self.dataset, request) {
            Ok(outcome) => {
                report::render_outcome(&outcome, &mut self.output)?;
                match outcome {
                    Outcome::Records(records) => Some(records.len()),
                    Outcome::Aggregation(_) => None,
                }
            }
            Err(e) if e.class() == ErrorClass::Data => {
                report::render_aggregation_failure(&e, &mut self.output)?;
                self.options.notify_failure(severity_for_error(&e), &e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if let Some(obs) = self.options.observer.as_ref() {
            obs.on_operation(
                &OperationContext {
                    operation: request.params.operation(),
                    field: request.field.to_string(),
                },
                OperationStats {
                    input_rows,
                    output_rows,
                    elapsed: start.elapsed(),
                },
            );
        }
        Ok(())
    }

    fn continue_or_exit(&mut self) -> ExplorerResult<Flow> {
        let answer = self.prompt(
            "\nWould you like to perform another operation? (y/n): ",
            "continue confirmation",
        )?;
        if Answer::parse(&answer) != Answer::Disapprove {
            return Ok(Flow::Continue);
        }

        let confirm = self.prompt("Are you sure you want to exit? (y/n): ", "exit confirmation")?;
        Ok(match Answer::parse(&confirm) {
            Answer::Approve => Flow::Exit,
            Answer::Disapprove | Answer::Other => Flow::Continue,
        })
    }
}
