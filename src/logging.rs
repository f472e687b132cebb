use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for console output
    pub console_level: Level,
    /// Log level for file output
    pub file_level: Level,
    /// Directory where log files should be written
    pub log_dir: Option<PathBuf>,
    /// Whether to enable JSON formatted logs for structured output
    pub json_format: bool,
    /// Whether to mirror logs to stderr
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: Level::WARN,
            file_level: Level::DEBUG,
            log_dir: Some(Self::default_log_dir()),
            json_format: false,
            console: false,
        }
    }
}

impl LoggingConfig {
    /// Get the OS-appropriate default log directory
    pub fn default_log_dir() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "bento") {
            // ~/.cache/bento on Linux, ~/Library/Caches/bento on macOS
            proj_dirs.cache_dir().to_path_buf()
        } else {
            PathBuf::from("bento-logs")
        }
    }

    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = var("BENTO_LOG_LEVEL") {
            self = self.with_level(&level);
        }

        if let Some(log_dir) = var("BENTO_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(log_dir));
        }

        if var("BENTO_NO_FILE_LOGS").is_some() {
            self.log_dir = None;
        }

        if var("BENTO_JSON_LOGS").is_some() {
            self.json_format = true;
        }

        if var("BENTO_CONSOLE_LOGS").is_some() {
            self.console = true;
        }

        self
    }

    /// Apply a level name; "off" disables file logging, unknown names are ignored
    pub fn with_level(mut self, level: &str) -> Self {
        if level.eq_ignore_ascii_case("off") {
            self.log_dir = None;
        } else if let Ok(level) = level.parse::<Level>() {
            self.console_level = level;
            self.file_level = level;
        }

        self
    }
}

/// Initialize the logging system with the given configuration
///
/// The returned guard flushes the file appender when dropped.
pub fn init_logging(
    config: LoggingConfig,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let mut layers = vec![];
    let mut guard = None;

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "bento.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let filter = EnvFilter::builder()
            .with_default_directive(config.file_level.into())
            .from_env_lossy();

        let file_layer = if config.json_format {
            fmt::layer().json().with_writer(non_blocking).with_filter(filter).boxed()
        } else {
            fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(filter)
                .boxed()
        };

        layers.push(file_layer);
    }

    // stdout carries command output, so console logs go to stderr
    if config.console {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_filter(
                EnvFilter::builder()
                    .with_default_directive(config.console_level.into())
                    .from_env_lossy(),
            )
            .boxed();

        layers.push(console_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_override() {
        let config = LoggingConfig::default().with_level("trace");
        assert_eq!(config.console_level, Level::TRACE);
        assert_eq!(config.file_level, Level::TRACE);

        let config = LoggingConfig::default().with_level("loud");
        assert_eq!(config.file_level, Level::DEBUG);
    }

    #[test]
    fn test_off_disables_file_logs() {
        let config = LoggingConfig::default().with_level("Off");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = LoggingConfig::default().with_overrides(|name| match name {
            "BENTO_LOG_DIR" => Some("/tmp/bento-test-logs".to_string()),
            "BENTO_JSON_LOGS" | "BENTO_CONSOLE_LOGS" => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/bento-test-logs")));
        assert!(config.json_format);
        assert!(config.console);

        let config = LoggingConfig::default().with_overrides(|name| {
            (name == "BENTO_NO_FILE_LOGS").then(String::new)
        });
        assert!(config.log_dir.is_none());
    }
}
