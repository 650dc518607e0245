use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use record_explorer::execution::TracingExecutionObserver;
use record_explorer::ingestion::DEFAULT_FILENAME;
use record_explorer::logging::{init_logging, LogFormat, LoggingConfig};
use record_explorer::observability::{CompositeObserver, FileObserver, SessionObserver, TracingObserver};
use record_explorer::processing::{AggregateOptions, KindDetection};
use record_explorer::session::{load_interactive, Session, SessionOptions};
use record_explorer::ExplorerResult;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DetectionArg {
    /// Branch on the first non-null value's kind.
    First,
    /// Branch on the most common kind.
    Majority,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Compact,
    Pretty,
}

/// Sort, filter and aggregate the records of a JSON file interactively.
#[derive(Debug, Parser)]
#[command(name = "record-explorer", version, about)]
struct Cli {
    /// JSON file to load instead of asking for one first.
    #[arg(short, long)]
    file: Option<String>,

    /// File loaded when the filename prompt is left empty.
    #[arg(long, default_value = DEFAULT_FILENAME)]
    default_file: String,

    /// How aggregation decides between numeric and text summaries.
    #[arg(long, value_enum, default_value_t = DetectionArg::First)]
    kind_detection: DetectionArg,

    /// Log filter for stderr diagnostics (overridden by RUST_LOG).
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormatArg::Compact)]
    log_format: LogFormatArg,

    /// Append JSON event lines (loads, operations, failures) to this file.
    #[arg(long)]
    event_log: Option<PathBuf>,
}

impl Cli {
    fn session_options(&self) -> SessionOptions {
        let mut observers: Vec<Arc<dyn SessionObserver>> = Vec::new();
        observers.push(Arc::new(TracingObserver));
        if let Some(path) = &self.event_log {
            observers.push(Arc::new(FileObserver::new(path)));
        }

        SessionOptions {
            default_filename: self.default_file.clone(),
            initial_filename: self.file.clone(),
            aggregate: AggregateOptions {
                detection: match self.kind_detection {
                    DetectionArg::First => KindDetection::FirstValue,
                    DetectionArg::Majority => KindDetection::Majority,
                },
            },
            observer: Some(Arc::new(CompositeObserver::new(observers))),
            execution_observer: Some(Arc::new(TracingExecutionObserver)),
            ..Default::default()
        }
    }
}

fn run(options: SessionOptions) -> ExplorerResult<()> {
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();

    let (path, dataset) = load_interactive(&mut input, &mut output, &options)?;
    tracing::debug!(path = %path.display(), ?options, "starting session");

    let mut session = Session::new(input, output, dataset, options);
    session.run()?;
    tracing::debug!(metrics = %session.engine().metrics().snapshot(), "session finished");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        format: match cli.log_format {
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Pretty => LogFormat::Pretty,
        },
    });

    match run(cli.session_options()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
