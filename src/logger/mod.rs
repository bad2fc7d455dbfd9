//! Logger Module
//!
//! A logging system based on `tracing-subscriber` with support for:
//! - Console output with color control
//! - File output with multiple formats (Full, Compact, JSON)
//! - Time-based file rotation through `tracing-appender`
//! - Changing the filter at runtime through [`LoggerHandle`]

pub mod config;
pub mod error;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, reload};

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync + 'static>;

/// Keeps the file writer flushing and allows changing the filter later.
///
/// Dropping the handle flushes and stops the background file writer, so it
/// must live as long as the process logs.
pub struct LoggerHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    _guard: Option<WorkerGuard>,
}

impl LoggerHandle {
    /// Replace the active filter, e.g. `"debug"` or `"jobly=trace,info"`.
    pub fn set_level(&self, level: &str) -> Result<(), LoggerError> {
        let filter = EnvFilter::try_new(level)
            .map_err(|e| LoggerError::config(format!("Invalid log level '{}': {}", level, e)))?;
        self.filter.reload(filter)?;
        Ok(())
    }

    /// The active filter rendered as a directive string.
    pub fn current_level(&self) -> Option<String> {
        self.filter.with_current(|filter| filter.to_string()).ok()
    }
}

impl std::fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("level", &self.current_level())
            .field("file_output", &self._guard.is_some())
            .finish()
    }
}

/// Initialize the global subscriber with the given configuration
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<LoggerHandle> {
    config.validate()?;

    let (filter_layer, filter) = reload::Layer::new(config.env_filter()?);

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    // The file layer goes first so console ANSI settings don't leak into
    // span fields written to the file.
    if config.file.enabled {
        let (layer, file_guard) = file_layer(&config.file)?;
        layers.push(layer);
        guard = Some(file_guard);
    }

    if config.console.enabled {
        layers.push(console_layer(&config.console));
    }

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(layers)
        .try_init()?;

    Ok(LoggerHandle {
        filter,
        _guard: guard,
    })
}

fn console_layer(config: &ConsoleConfig) -> BoxedLayer {
    let use_ansi = config.colored && std::io::stdout().is_terminal();

    fmt::layer()
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true)
        .boxed()
}

fn file_layer(config: &FileConfig) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    let directory = config.directory();
    std::fs::create_dir_all(directory)?;

    let appender = RollingFileAppender::builder()
        .rotation(config.rotation.as_rotation())
        .filename_prefix(config.file_name())
        .build(directory)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = match config.format {
        LogFormat::Full => fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .compact()
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_ansi(false)
            .json()
            .with_writer(writer)
            .boxed(),
    };

    Ok((layer, guard))
}
