use clap::ValueEnum;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use anyhow::Result;
use crate::config::ServiceConfig;
use crate::config::settings::{LogFormat, LoggingConfig};
use crate::utils::constants::DEFAULT_LOG_LEVEL;

/// Production mode silences the debug sink. Set once from configuration.
static PRODUCTION: AtomicBool = AtomicBool::new(false);

pub fn set_production(production: bool) {
    PRODUCTION.store(production, Ordering::Relaxed);
}

pub fn is_production() -> bool {
    PRODUCTION.load(Ordering::Relaxed)
}

/// Debug print that is a no-op in production mode.
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        if !$crate::utils::logging::is_production() {
            ::tracing::debug!($($arg)*);
        }
    }};
}
pub(crate) use debug_log;


#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LogLevel::TRACE => "TRACE",
            LogLevel::DEBUG => "DEBUG",
            LogLevel::INFO => "INFO",
            LogLevel::WARN => "WARN",
            LogLevel::ERROR => "ERROR",
        }
    }
}


/// Resolve the logging config (CLI level wins over the file), apply the
/// production flag and install the subscriber.
pub fn run(service_config: &ServiceConfig, arg_log_level: Option<LogLevel>) -> Result<()> {
    let logging_config = resolve_logging_config(service_config, arg_log_level);
    set_production(service_config.settings.production);
    init_logging(&logging_config);
    Ok(())
}

pub fn resolve_logging_config(service_config: &ServiceConfig, arg_log_level: Option<LogLevel>) -> LoggingConfig {
    let configured = service_config.settings.logging.as_ref();
    let level = arg_log_level
        .map(|level| level.as_str().to_lowercase())
        .or_else(|| configured.map(|config| config.level.to_owned()))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());
    let format = configured
        .map(|config| config.format.to_owned())
        .unwrap_or_else(LogFormat::from_env);

    LoggingConfig::new(level, format)
}


/// Initialize tracing with the desired config.
pub fn init_logging(cfg: &LoggingConfig) {
    let env_filter = EnvFilter::try_new(&cfg.level)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    // Base layer: filter + writer
    let registry = tracing_subscriber::registry().with(env_filter);

    // Choose format layer
    match cfg.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .flatten_event(true) // flattens fields, good for CRI log parsers
                .with_ansi(false); // CRI parsers dislike ANSI color codes

            let _ = registry.with(layer).try_init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_timer(UtcTime::rfc_3339())
                .with_ansi(true);

            let _ = registry.with(layer).try_init();
        }
    };
}
