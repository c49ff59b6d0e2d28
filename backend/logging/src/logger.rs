//! Structured Logger
//!
//! Wraps `tracing` to provide console output, optional file rotation (NDJSON),
//! and environment-based level control.

use std::path::Path;
use std::str::FromStr;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Console output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Initialize the global structured logger.
///
/// `RUST_LOG` wins over `level` when set. With `log_dir`, every event is also
/// written as NDJSON to `pinyinlens.log.YYYY-MM-DD` in that directory.
pub fn init_logger(level: &str, format: LogFormat, log_dir: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
            .boxed(),
    };

    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "pinyinlens.log");
        fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false)
    });

    let file_logging = file_layer.is_some();
    if tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!(?format, file_logging, "Logger initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_log_format() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" Pretty ".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn init_is_idempotent() {
        init_logger("debug", LogFormat::Pretty, None);
        init_logger("info", LogFormat::Json, None);
    }
}
