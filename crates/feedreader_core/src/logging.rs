//! Rolling file logging for the entry store.
//!
//! # Responsibility
//! - Start one size-rotated file logger per process.
//! - Capture panics as sanitized log events.
//!
//! # Invariants
//! - Re-initializing with the same level and directory is a no-op.
//! - Re-initializing with a different level or directory is rejected.
//! - Initialization never panics.
//! - Log lines carry metadata only; entry titles never reach the log.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "feedreader";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

/// Supported log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `debug` in debug builds, `info` in release builds.
    pub fn default_for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unsupported log level `{other}`; expected trace|debug|info|warn|error"
            )),
        }
    }
}

struct LoggingState {
    level: LogLevel,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

impl LoggingState {
    fn check_matches(&self, level: LogLevel, log_dir: &Path) -> Result<(), String> {
        if self.log_dir != log_dir {
            return Err(format!(
                "logging already initialized at `{}`; refusing to switch to `{}`",
                self.log_dir.display(),
                log_dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                self.level, level
            ));
        }
        Ok(())
    }
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - Unsupported `level`.
/// - Empty or relative `log_dir`, or a directory that cannot be created.
/// - A conflicting earlier initialization, or a logger backend failure.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = level.parse::<LogLevel>()?;
    let log_dir = normalize_log_dir(log_dir)?;

    if let Some(state) = LOGGING_STATE.get() {
        return state.check_matches(level, &log_dir);
    }

    LOGGING_STATE
        .get_or_try_init(|| start_logger(level, log_dir.clone()))?
        .check_matches(level, &log_dir)
}

/// Returns `(level, log_dir)` of the active logger, if any.
pub fn logging_status() -> Option<(LogLevel, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

fn start_logger(level: LogLevel, log_dir: PathBuf) -> Result<LoggingState, String> {
    std::fs::create_dir_all(&log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let handle = Logger::try_with_str(level.as_str())
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();

    info!(
        "event=logging_init module=logging status=ok level={} log_dir={} version={}",
        level,
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        log_dir,
        _handle: handle,
    })
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=logging status=error location={} payload={}",
            location,
            sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, normalize_log_dir, sanitize_message, LogLevel};

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!(" INFO ".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = normalize_log_dir("logs/dev").unwrap_err();
        assert!(err.contains("absolute"));
        assert!(normalize_log_dir("  ").is_err());
    }

    #[test]
    fn sanitize_message_strips_newlines_and_truncates() {
        let sanitized = sanitize_message("line1\nline2\rline3", 8);
        assert!(!sanitized.contains('\n'));
        assert!(!sanitized.contains('\r'));
        assert!(sanitized.ends_with("..."));
    }

    // Only test in this binary that starts the global logger.
    #[test]
    fn init_logging_is_idempotent_and_rejects_reconfiguration() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();
        let other_str = other.path().to_str().unwrap();

        init_logging("info", dir_str).unwrap();
        init_logging("INFO", dir_str).unwrap();

        let level_err = init_logging("debug", dir_str).unwrap_err();
        assert!(level_err.contains("refusing to switch"));
        let dir_err = init_logging("info", other_str).unwrap_err();
        assert!(dir_err.contains("refusing to switch"));

        let (level, active_dir) = logging_status().unwrap();
        assert_eq!(level, LogLevel::Info);
        assert_eq!(active_dir, dir.path());
    }
}
