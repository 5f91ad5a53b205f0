//! Logging setup shared by the ConnectIdade binaries
//!
//! Diagnostics go to stderr so they never mix with command output. The
//! format and level come from `CONNECTIDADE_LOG_FORMAT` /
//! `CONNECTIDADE_LOG_LEVEL` unless the caller overrides them; `RUST_LOG`
//! always wins over the level.
//!
//! ```no_run
//! use libconnectidade::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::from_env(false).init();
//! LoggingConfig::new(LogFormat::Json, "debug".to_string(), false).init();
//! ```

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain lines without target or colors
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line colored output for development
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                other
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    /// Build from the `CONNECTIDADE_LOG_*` variables (text / warn by default)
    pub fn from_env(verbose: bool) -> Self {
        let format = std::env::var("CONNECTIDADE_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(LogFormat::Text);
        let level = std::env::var("CONNECTIDADE_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Self::new(format, level, verbose)
    }

    /// Level directive used when `RUST_LOG` is not set
    pub fn effective_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.level
        }
    }

    /// Install the global subscriber
    ///
    /// A second call is a no-op (the first subscriber stays active), which
    /// keeps tests that each initialise logging from failing.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.effective_level()));

        let installed = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .flatten_event(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_file(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init(),
        };

        if installed.is_err() {
            tracing::debug!("Logging already initialised, keeping existing subscriber");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);

        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("Invalid log format: 'xml'"));
    }

    #[test]
    fn test_log_format_display_roundtrips_names() {
        for format in [LogFormat::Text, LogFormat::Json, LogFormat::Pretty] {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_verbose_forces_debug() {
        let config = LoggingConfig::new(LogFormat::Text, "error".to_string(), true);
        assert_eq!(config.effective_level(), "debug");

        let quiet = LoggingConfig::new(LogFormat::Text, "error".to_string(), false);
        assert_eq!(quiet.effective_level(), "error");
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("CONNECTIDADE_LOG_FORMAT", "json");
        std::env::set_var("CONNECTIDADE_LOG_LEVEL", "info");
        let config = LoggingConfig::from_env(false);
        std::env::remove_var("CONNECTIDADE_LOG_FORMAT");
        std::env::remove_var("CONNECTIDADE_LOG_LEVEL");

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var("CONNECTIDADE_LOG_FORMAT");
        std::env::remove_var("CONNECTIDADE_LOG_LEVEL");
        let config = LoggingConfig::from_env(false);

        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.level, "warn");
    }
}
