use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger};

use crate::config::{Config, LogLevel};

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Critical => Level::Critical,
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

pub fn configure_logger(config: &Config) -> spdlog::Result<()> {
    let log = match config.log {
        Some(ref log) => log,
        None => return Ok(()),
    };

    let mut builder = Logger::builder();

    if let Some(ref location) = log.location {
        let daily_sink = Arc::new(
            RotatingFileSink::builder()
                .base_path(location)
                .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
                .rotate_on_open(false)
                .build()?,
        );
        builder.sink(daily_sink);
    }

    if log.log_to_console || log.location.is_none() {
        let stdout = Arc::new(
            StdStreamSink::builder()
                .std_stream(StdStream::Stdout)
                .level_filter(LevelFilter::MoreVerbose(Level::Warn))
                .build()?,
        );
        let stderr = Arc::new(
            StdStreamSink::builder()
                .std_stream(StdStream::Stderr)
                .level_filter(LevelFilter::MoreSevereEqual(Level::Warn))
                .build()?,
        );
        builder.sink(stdout).sink(stderr);
    }

    let logger = Arc::new(builder.build()?);
    logger.set_level_filter(LevelFilter::MoreSevereEqual(log.level.into()));
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Warn));
    logger.set_flush_period(Some(Duration::from_secs(2)));

    spdlog::set_default_logger(logger);

    Ok(())
}
