pub mod config;
pub mod error;
pub mod model;

use error::{CollapseToolError, ErrorCode};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot read log configuration {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("logging already initialized: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

impl CollapseToolError for LoggingError {
    fn error_code(&self) -> ErrorCode {
        match self {
            LoggingError::Read { .. } | LoggingError::Filter(_) => ErrorCode::InvalidArgument,
            LoggingError::Init(_) => ErrorCode::Internal,
        }
    }
}

/// Level directive for a `-v` count: none is off, then error, warn, info, debug, trace.
pub fn verbosity_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "off",
        1 => "error",
        2 => "warn",
        3 => "info",
        4 => "debug",
        _ => "trace",
    }
}

/// Build the filter: a log configuration file wins over `-v`, and `RUST_LOG` is
/// only consulted when neither asks for output.
pub fn build_filter(verbose: u8, log_conf: Option<&Path>) -> Result<EnvFilter, LoggingError> {
    if let Some(path) = log_conf {
        let raw = std::fs::read_to_string(path).map_err(|source| LoggingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(EnvFilter::try_new(parse_log_conf(&raw))?);
    }

    if verbose == 0 {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
    }

    Ok(EnvFilter::try_new(verbosity_directive(verbose))?)
}

/// Joins the non-comment lines of a log configuration file into one directive string.
fn parse_log_conf(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn init_tracing(verbose: u8, log_conf: Option<&Path>) -> Result<(), LoggingError> {
    let filter_layer = build_filter(verbose, log_conf)?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}
