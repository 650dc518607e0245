use thiserror::Error;

/// Convenience result type used across loading, processing and the interactive session.
pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Coarse classification of an [`ExplorerError`].
///
/// The session uses this to decide whether to re-prompt, report and continue, or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad user input; the interaction cycle restarts.
    Recoverable,
    /// The operation produced no result; the session continues.
    Data,
    /// The session cannot continue.
    Fatal,
}

/// Error type returned by loading, processing and session functions.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Underlying I/O error (permission denied, broken pipe, ...).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The input file is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level JSON value is not an array of records.
    #[error("json must be an array of objects, found {found}")]
    NotAnArray { found: String },

    /// An element of the top-level array is not an object.
    #[error("record {row} is not a json object")]
    RecordNotObject { row: usize },

    /// A record holds a nested or multi-valued field.
    #[error("record {row} field '{field}' holds an unsupported value (raw='{raw}')")]
    UnsupportedValue {
        row: usize,
        field: String,
        raw: String,
    },

    /// A record set must hold at least one record.
    #[error("record set is empty")]
    EmptyDataSet,

    /// A record lacks the field an operation was asked to read.
    #[error("record {row} is missing field '{field}'")]
    MissingField { row: usize, field: String },

    /// Operation token did not resolve.
    #[error("Invalid operation '{token}'.")]
    InvalidOperation { token: String },

    /// Field token did not resolve.
    #[error("Invalid choice '{token}'. Please select a valid number or key.")]
    InvalidField { token: String },

    /// Aggregation was asked to run over zero records.
    #[error("No data to aggregate.")]
    NoData,

    /// Every value at the field was null or absent.
    #[error("No valid data found for key '{field}'.")]
    NoValidData { field: String },

    /// Numeric branch chosen but no numeric values remained.
    #[error("No numeric data found for key '{field}'.")]
    NoNumericData { field: String },

    /// Categorical branch chosen but no text values remained.
    #[error("No valid string data found for key '{field}'.")]
    NoTextData { field: String },

    /// The detected value kind cannot be aggregated.
    #[error("Cannot aggregate data of type '{kind}' for key '{field}'.")]
    UnsupportedType { field: String, kind: String },

    /// Standard input closed while a prompt was waiting.
    #[error("input closed while waiting for {prompt}")]
    InputClosed { prompt: String },
}

impl ExplorerError {
    /// Classify this error for the interaction loop.
    pub fn class(&self) -> ErrorClass {
        match self {
            ExplorerError::InvalidOperation { .. } | ExplorerError::InvalidField { .. } => {
                ErrorClass::Recoverable
            }
            ExplorerError::NoData
            | ExplorerError::NoValidData { .. }
            | ExplorerError::NoNumericData { .. }
            | ExplorerError::NoTextData { .. }
            | ExplorerError::UnsupportedType { .. } => ErrorClass::Data,
            ExplorerError::Io(_)
            | ExplorerError::Json(_)
            | ExplorerError::NotAnArray { .. }
            | ExplorerError::RecordNotObject { .. }
            | ExplorerError::UnsupportedValue { .. }
            | ExplorerError::EmptyDataSet
            | ExplorerError::MissingField { .. }
            | ExplorerError::InputClosed { .. } => ErrorClass::Fatal,
        }
    }

    /// `true` when the session must stop.
    pub fn is_fatal(&self) -> bool {
        self.class() == ErrorClass::Fatal
    }

    /// Process exit code for a fatal error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExplorerError::InputClosed { .. } => 2,
            _ => 1,
        }
    }
}
