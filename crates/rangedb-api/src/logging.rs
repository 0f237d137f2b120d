//! Logging configuration for RangeDB
//!
//! Sets up a `tracing` subscriber for the store's prune and write-path
//! events, with level filtering, stdout or daily-rotated file output.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Level used when neither `RUST_LOG` nor the configured level parses
const DEFAULT_LEVEL: &str = "info";
/// File name used when the configured path has none
const DEFAULT_LOG_FILE: &str = "rangedb.log";

/// Log output destination
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a file with rotation
    File(PathBuf),
    /// Output to both stdout and file
    Both(PathBuf),
}

/// Log format style
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level filter
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Format style
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            output: LogOutput::Stdout,
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Info level, pretty output to stdout
    pub fn info() -> Self {
        Self::default()
    }

    /// Debug level; shows writes dropped below the prune floor
    pub fn debug() -> Self {
        Self::default().with_level("debug")
    }

    /// Set log output to file with rotation
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Set log output to both stdout and file
    pub fn with_both<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set log level filter
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Initialize global logging with this configuration
    ///
    /// Returns a guard that must be kept alive for file logging to work.
    /// When the guard is dropped, the logging worker thread is shutdown.
    /// If a global subscriber is already installed it is left in place.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use rangedb::logging::LogConfig;
    ///
    /// // Keep the guard alive for the lifetime of your application
    /// let _guard = LogConfig::info().init();
    /// ```
    pub fn init(self) -> Option<WorkerGuard> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if matches!(self.output, LogOutput::Stdout | LogOutput::Both(_)) {
            layers.push(format_layer(std::io::stdout, self.format, true));
        }
        if let LogOutput::File(path) | LogOutput::Both(path) = &self.output {
            let (writer, file_guard) = tracing_appender::non_blocking(rolling_appender(path));
            layers.push(format_layer(writer, self.format, false));
            guard = Some(file_guard);
        }

        let _ = tracing_subscriber::registry()
            .with(layers)
            .with(env_filter)
            .try_init();

        guard
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn format_layer<W>(writer: W, format: LogFormat, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    match format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

fn rolling_appender(path: &Path) -> RollingFileAppender {
    tracing_appender::rolling::daily(
        path.parent().unwrap_or_else(|| Path::new(".")),
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_LOG_FILE),
    )
}
