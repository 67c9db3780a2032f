//! Logger bootstrap.
//!
//! Records go to stderr and carry metadata only (`event=... module=...`),
//! never task text. Initialization is idempotent for the same level and never
//! panics.

use crate::error::AppError;
use flexi_logger::{Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;

pub const LOG_ENV_VAR: &str = "TODOLIST_LOG";
const DEFAULT_LEVEL: &str = "off";

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Picks the level from `TODOLIST_LOG`, then the configured level, then off.
pub fn resolve_level(configured: Option<&str>) -> Result<&'static str, AppError> {
    if let Ok(value) = std::env::var(LOG_ENV_VAR)
        && !value.trim().is_empty()
    {
        return normalize_level(&value);
    }

    match configured {
        Some(level) => normalize_level(level),
        None => Ok(DEFAULT_LEVEL),
    }
}

/// Starts the stderr logger.
///
/// `off` installs nothing. A second call with the same level is a no-op, a
/// second call with another level is rejected.
pub fn init_logging(level: &str) -> Result<(), AppError> {
    let normalized = normalize_level(level)?;
    if normalized == DEFAULT_LEVEL {
        return Ok(());
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, AppError> {
        let logger = Logger::try_with_str(normalized)
            .map_err(|err| {
                AppError::invalid_input(format!("invalid log level `{normalized}`: {err}"))
            })?
            .log_to_stderr()
            .format_for_stderr(flexi_logger::detailed_format)
            .start()
            .map_err(|err| AppError::io(format!("failed to start logger: {err}")))?;

        info!(
            "event=app_start module=core status=ok platform={} version={} level={}",
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION"),
            normalized
        );

        Ok(LoggingState {
            level: normalized,
            _logger: logger,
        })
    })?;

    if state.level != normalized {
        return Err(AppError::invalid_input(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, normalized
        )));
    }

    Ok(())
}

/// Active level, or `None` before a successful [`init_logging`].
pub fn logging_level() -> Option<&'static str> {
    LOGGING_STATE.get().map(|state| state.level)
}

pub fn normalize_level(level: &str) -> Result<&'static str, AppError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" | "none" => Ok("off"),
        other => Err(AppError::invalid_input(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        ))),
    }
}
