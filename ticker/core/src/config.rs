//! Ticker Configuration
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the binary after loading)
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! The configuration file follows the XDG Base Directory specification:
//! `$XDG_CONFIG_HOME/ageticker/config.toml`.
//!
//! # Example Configuration
//!
//! ```toml
//! precision = "millis"
//! tick_interval_ms = 50
//! record_path = "/home/me/.local/share/ageticker/lastdob.txt"
//! max_consecutive_failures = 5
//! snapshot_on_exit = true
//! ```
//!
//! # Environment Variables
//!
//! - `AGETICKER_PRECISION`: "seconds" or "millis"
//! - `AGETICKER_TICK_MS`: Tick interval in milliseconds
//! - `AGETICKER_RECORD`: Path of the last-used birth record
//! - `AGETICKER_MAX_FAILURES`: Consecutive failed frames before giving up

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest allowed tick interval
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Longest allowed tick interval (keeps the display "near real time")
pub const MAX_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// File name of the persisted birth record
pub const RECORD_FILE_NAME: &str = "lastdob.txt";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Precision
// =============================================================================

/// Smallest unit shown by the ticker
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Years down to seconds
    #[default]
    Seconds,
    /// Years down to milliseconds
    Millis,
}

impl Precision {
    /// Whether the milliseconds unit is displayed
    pub fn includes_millis(&self) -> bool {
        matches!(self, Self::Millis)
    }
}

impl FromStr for Precision {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seconds" | "s" | "sec" => Ok(Self::Seconds),
            "millis" | "ms" | "milliseconds" => Ok(Self::Millis),
            other => Err(ConfigError::ValidationError(format!(
                "unknown precision '{other}' (expected 'seconds' or 'millis')"
            ))),
        }
    }
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration
// =============================================================================

/// On-disk form of the configuration; every field is optional
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerToml {
    /// "seconds" or "millis"
    pub precision: Option<Precision>,

    /// Tick interval in milliseconds
    pub tick_interval_ms: Option<u64>,

    /// Path of the last-used birth record
    pub record_path: Option<PathBuf>,

    /// Consecutive failed frames before the ticker gives up
    pub max_consecutive_failures: Option<u32>,

    /// Print a plain-text snapshot after leaving the full-screen display
    pub snapshot_on_exit: Option<bool>,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved ticker configuration
#[derive(Clone, Debug)]
pub struct TickerConfig {
    /// Smallest displayed unit
    pub precision: Precision,

    /// Time between repaints; also the exit-key responsiveness bound
    pub tick_interval: Duration,

    /// Where the last-used birth record lives
    pub record_path: PathBuf,

    /// Consecutive skipped frames tolerated before escalating to fatal
    pub max_consecutive_failures: u32,

    /// Print a plain-text snapshot after the display closes
    pub snapshot_on_exit: bool,

    /// Config file the values were read from, if any
    pub config_file_path: Option<PathBuf>,

    source: ConfigSource,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            precision: Precision::Seconds,
            tick_interval: Duration::from_millis(100),
            record_path: default_record_path(),
            max_consecutive_failures: 5,
            snapshot_on_exit: true,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl TickerConfig {
    /// Get the highest-priority source that contributed a value
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Clamp the tick interval into range and reject unusable values
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.max_consecutive_failures == 0 {
            return Err(ConfigError::ValidationError(
                "max_consecutive_failures must be at least 1".to_string(),
            ));
        }

        let clamped = self
            .tick_interval
            .clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL);
        if clamped != self.tick_interval {
            tracing::warn!(
                requested_ms = self.tick_interval.as_millis() as u64,
                clamped_ms = clamped.as_millis() as u64,
                "Tick interval out of range, clamping"
            );
            self.tick_interval = clamped;
        }

        Ok(())
    }

    /// Apply TOML values over the current ones
    pub fn apply_toml(&mut self, toml: &TickerToml) {
        if let Some(precision) = toml.precision {
            self.precision = precision;
        }
        if let Some(ms) = toml.tick_interval_ms {
            self.tick_interval = Duration::from_millis(ms);
        }
        if let Some(ref path) = toml.record_path {
            self.record_path = path.clone();
        }
        if let Some(max) = toml.max_consecutive_failures {
            self.max_consecutive_failures = max;
        }
        if let Some(snapshot) = toml.snapshot_on_exit {
            self.snapshot_on_exit = snapshot;
        }
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut touched = false;

        if let Some(raw) = lookup("AGETICKER_PRECISION") {
            match raw.parse::<Precision>() {
                Ok(precision) => {
                    self.precision = precision;
                    touched = true;
                }
                Err(e) => tracing::warn!(error = %e, "Ignoring AGETICKER_PRECISION"),
            }
        }
        if let Some(raw) = lookup("AGETICKER_TICK_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => {
                    self.tick_interval = Duration::from_millis(ms);
                    touched = true;
                }
                Err(e) => tracing::warn!(error = %e, value = %raw, "Ignoring AGETICKER_TICK_MS"),
            }
        }
        if let Some(raw) = lookup("AGETICKER_RECORD") {
            if !raw.trim().is_empty() {
                self.record_path = PathBuf::from(raw.trim());
                touched = true;
            }
        }
        if let Some(raw) = lookup("AGETICKER_MAX_FAILURES") {
            match raw.trim().parse::<u32>() {
                Ok(max) => {
                    self.max_consecutive_failures = max;
                    touched = true;
                }
                Err(e) => {
                    tracing::warn!(error = %e, value = %raw, "Ignoring AGETICKER_MAX_FAILURES")
                }
            }
        }

        if touched {
            self.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/ageticker/config.toml` or
/// `~/.config/ageticker/config.toml` if `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ageticker").join("config.toml"))
}

/// Get the default birth record path
///
/// Uses `$XDG_DATA_HOME/ageticker/lastdob.txt`, falling back to
/// `./lastdob.txt` when no data directory is known.
pub fn default_record_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("ageticker").join(RECORD_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(RECORD_FILE_NAME))
}

/// Load configuration from the default file and the process environment
pub fn load_config() -> Result<TickerConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the process environment
///
/// A missing config file is not an error (defaults are used).
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<TickerConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
pub fn load_config_with_env<F>(path: Option<PathBuf>, lookup: F) -> Result<TickerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = TickerConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: TickerToml = toml::from_str(&toml_content)?;
            config.apply_toml(&toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    config.apply_env(lookup);
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = TickerConfig::default();
        assert_eq!(config.precision, Precision::Seconds);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.max_consecutive_failures, 5);
        assert!(config.snapshot_on_exit);
        assert!(config.record_path.ends_with(RECORD_FILE_NAME));
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("ageticker"));
            assert!(p.to_string_lossy().ends_with("config.toml"));
        }
    }

    #[test]
    fn test_precision_parse() {
        assert_eq!("millis".parse::<Precision>().unwrap(), Precision::Millis);
        assert_eq!(" MS ".parse::<Precision>().unwrap(), Precision::Millis);
        assert_eq!("seconds".parse::<Precision>().unwrap(), Precision::Seconds);
        assert!("fortnights".parse::<Precision>().is_err());
        assert!(Precision::Millis.includes_millis());
        assert!(!Precision::Seconds.includes_millis());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            load_config_with_env(Some(PathBuf::from("/nonexistent/ageticker.toml")), no_env)
                .unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_parse_valid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
precision = "millis"
tick_interval_ms = 40
record_path = "/tmp/ageticker-test/lastdob.txt"
max_consecutive_failures = 3
snapshot_on_exit = false
"#
        )
        .unwrap();

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.precision, Precision::Millis);
        assert_eq!(config.tick_interval, Duration::from_millis(40));
        assert_eq!(
            config.record_path,
            PathBuf::from("/tmp/ageticker-test/lastdob.txt")
        );
        assert_eq!(config.max_consecutive_failures, 3);
        assert!(!config.snapshot_on_exit);
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "tick_interval_ms = 250").unwrap();

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.precision, Precision::Seconds);
        assert_eq!(config.max_consecutive_failures, 5);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "precision = [not valid").unwrap();

        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "precision = \"seconds\"\ntick_interval_ms = 500").unwrap();

        let env = env_from(&[
            ("AGETICKER_PRECISION", "millis"),
            ("AGETICKER_TICK_MS", "20"),
            ("AGETICKER_RECORD", "/tmp/elsewhere.txt"),
        ]);
        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();
        assert_eq!(config.precision, Precision::Millis);
        assert_eq!(config.tick_interval, Duration::from_millis(20));
        assert_eq!(config.record_path, PathBuf::from("/tmp/elsewhere.txt"));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let env = env_from(&[
            ("AGETICKER_PRECISION", "weeks"),
            ("AGETICKER_TICK_MS", "soon"),
        ]);
        let config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.precision, Precision::Seconds);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_tick_interval_is_clamped() {
        let config = load_config_with_env(None, env_from(&[("AGETICKER_TICK_MS", "1")])).unwrap();
        assert_eq!(config.tick_interval, MIN_TICK_INTERVAL);

        let config =
            load_config_with_env(None, env_from(&[("AGETICKER_TICK_MS", "60000")])).unwrap();
        assert_eq!(config.tick_interval, MAX_TICK_INTERVAL);
    }

    #[test]
    fn test_zero_failures_rejected() {
        let result = load_config_with_env(None, env_from(&[("AGETICKER_MAX_FAILURES", "0")]));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
