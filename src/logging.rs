//! Logging setup
//!
//! Installs a `tracing-subscriber` registry from [`LoggingConfig`]. `RUST_LOG`
//! wins over the configured level. The terminal dashboard owns the screen,
//! so in [`LogTarget::FileOnly`] mode nothing is written to the console.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Where log lines may go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// stderr, plus the log file when configured
    Console,
    /// Only the log file when configured, otherwise nowhere
    FileOnly,
}

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to open log file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Default filter directive for a configured level
pub fn filter_directive(level: &str) -> String {
    format!("thermodash={}", level.trim().to_lowercase())
}

/// Initialize the global tracing subscriber
pub fn init_logging(config: &LoggingConfig, target: LogTarget) -> Result<(), LoggingError> {
    let format = LogFormat::parse(&config.format);
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if target == LogTarget::Console {
        layers.push(fmt_layer(format, std::io::stderr, true));
    }

    if let Some(path) = &config.file {
        let file = open_log_file(Path::new(path))?;
        layers.push(fmt_layer(format, Mutex::new(file), false));
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&config.level)));

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);

    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty => layer.boxed(),
    }
}

fn open_log_file(path: &Path) -> Result<std::fs::File, LoggingError> {
    let io_err = |e: std::io::Error| LoggingError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("info"), "thermodash=info");
        assert_eq!(filter_directive(" DEBUG "), "thermodash=debug");
    }

    #[test]
    fn test_open_log_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("thermodash.log");

        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
