//! Logging bootstrap for hosts embedding the core.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend once per process, writing either to
//!   stderr or to size-rotated files.
//! - Keep core log lines metadata-only (`event=... module=... status=...`).
//!
//! # Invariants
//! - Initialization is idempotent for an identical configuration.
//! - Re-initialization with a different level or target is rejected.
//! - Initialization never panics.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::info;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "eventline";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

pub type LoggingResult<T> = Result<T, LoggingError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    UnsupportedLevel(String),
    #[error("log_dir must be an absolute path, got `{}`", .0.display())]
    RelativeLogDir(PathBuf),
    #[error("failed to create log directory `{}`: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to start logger: {0}")]
    Backend(#[from] FlexiLoggerError),
    #[error("logging already initialized with {active}; refusing to switch to {requested}")]
    AlreadyInitialized { active: String, requested: String },
}

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Rotated files under an absolute directory.
    Directory(PathBuf),
}

impl std::fmt::Display for LogTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => f.write_str("stderr"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// `[logging]` section of the settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rotated log files; stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    fn target(&self) -> LoggingResult<LogTarget> {
        match &self.log_dir {
            None => Ok(LogTarget::Stderr),
            Some(dir) if dir.is_absolute() => Ok(LogTarget::Directory(dir.clone())),
            Some(dir) => Err(LoggingError::RelativeLogDir(dir.clone())),
        }
    }
}

struct LoggingState {
    level: &'static str,
    target: LogTarget,
    _logger: LoggerHandle,
}

/// Starts the logging backend.
///
/// # Errors
/// - `UnsupportedLevel` / `RelativeLogDir` for invalid configuration.
/// - `CreateDir` / `Backend` when the backend cannot start.
/// - `AlreadyInitialized` when a different configuration is already active.
pub fn init_logging(config: &LoggingConfig) -> LoggingResult<()> {
    let level = normalize_level(&config.level)?;
    let target = config.target()?;

    let state = LOGGING_STATE.get_or_try_init(|| start_backend(level, &target))?;
    if state.level != level || state.target != target {
        return Err(LoggingError::AlreadyInitialized {
            active: format!("level `{}` target `{}`", state.level, state.target),
            requested: format!("level `{level}` target `{target}`"),
        });
    }
    Ok(())
}

fn start_backend(level: &'static str, target: &LogTarget) -> LoggingResult<LoggingState> {
    let logger = Logger::try_with_str(level)?;
    let logger = match target {
        LogTarget::Stderr => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format),
        LogTarget::Directory(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
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
        }
    };
    let handle = logger.start()?;

    info!(
        "event=core_init module=logging status=ok level={level} target={target} version={}",
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        target: target.clone(),
        _logger: handle,
    })
}

/// Active `(level, target)`, or `None` before initialization.
pub fn logging_status() -> Option<(&'static str, LogTarget)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.target.clone()))
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> LoggingResult<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_level, LogTarget, LoggingConfig, LoggingError,
    };

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
        assert!(matches!(
            normalize_level("loud"),
            Err(LoggingError::UnsupportedLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let config = LoggingConfig::default().with_log_dir("logs/dev");
        assert!(matches!(
            init_logging(&config),
            Err(LoggingError::RelativeLogDir(_))
        ));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: LoggingConfig = toml::from_str("level = \"warn\"").unwrap();
        assert_eq!(config.level, "warn");
        assert_eq!(config.log_dir, None);
    }

    // The only test in this binary that starts the backend.
    #[test]
    fn init_is_idempotent_and_rejects_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig::default()
            .with_level("info")
            .with_log_dir(dir.path());

        init_logging(&config).unwrap();
        init_logging(&config).unwrap();

        let level_conflict = init_logging(&config.clone().with_level("debug")).unwrap_err();
        assert!(matches!(level_conflict, LoggingError::AlreadyInitialized { .. }));
        assert!(level_conflict.to_string().contains("refusing to switch"));

        let stderr = LoggingConfig::default().with_level("info");
        assert!(matches!(
            init_logging(&stderr),
            Err(LoggingError::AlreadyInitialized { .. })
        ));

        let (level, target) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(target, LogTarget::Directory(dir.path().to_path_buf()));
    }
}
