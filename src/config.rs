use std::env;
use std::path::PathBuf;

/// Tuning knobs for one analysis pass, loaded from environment variables.
///
/// All durations are stored in seconds; the minute-granularity variables
/// are converted on load.
#[derive(Debug, Clone)]
pub struct Config {
    pub window_threshold_secs: i64,
    pub bucket_duration_secs: i64,
    pub watched_resource: String,
    pub block_duration_secs: i64,
    pub failure_window_secs: i64,
    pub failure_threshold: usize,
    pub time_format: String,
    pub top_n: usize,
    /// Optional JSONL audit stream of suppressed records.
    pub audit_jsonl: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// documented defaults. Fails fast on values that cannot be honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            window_threshold_secs: env_i64("WINDOW_THRESHOLD_MINS", 60)? * 60,
            bucket_duration_secs: env_i64("BUCKET_DURATION_MINS", 60)? * 60,
            watched_resource: env::var("WATCHED_RESOURCE").unwrap_or_else(|_| "/login".to_string()),
            block_duration_secs: env_i64("BLOCK_DURATION_MINS", 5)? * 60,
            failure_window_secs: env_i64("FAILURE_WINDOW_SECS", 20)?,
            failure_threshold: env_usize("FAILURE_THRESHOLD", 3)?,
            time_format: env::var("TIME_FORMAT")
                .unwrap_or_else(|_| "%d/%b/%Y:%H:%M:%S -0400".to_string()),
            top_n: env_usize("TOP_N", 10)?,
            audit_jsonl: env::var("AUDIT_JSONL").ok().map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_threshold_secs <= 0 {
            return Err(ConfigError::InvalidValue(format!(
                "window threshold must be positive, got {}s",
                self.window_threshold_secs
            )));
        }
        if self.bucket_duration_secs <= 0 {
            return Err(ConfigError::InvalidValue(format!(
                "bucket duration must be positive, got {}s",
                self.bucket_duration_secs
            )));
        }
        if self.block_duration_secs <= 0 {
            return Err(ConfigError::InvalidValue(format!(
                "block duration must be positive, got {}s",
                self.block_duration_secs
            )));
        }
        if self.failure_window_secs <= 0 {
            return Err(ConfigError::InvalidValue(format!(
                "failure window must be positive, got {}s",
                self.failure_window_secs
            )));
        }
        if self.failure_threshold == 0 {
            return Err(ConfigError::InvalidValue(
                "failure threshold must be at least 1".to_string(),
            ));
        }
        if self.watched_resource.is_empty() {
            return Err(ConfigError::InvalidValue(
                "watched resource cannot be empty".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(ConfigError::InvalidValue(
                "top-N depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_i64(name: &str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<i64>().map_err(|_| {
            ConfigError::InvalidValue(format!("{} must be an integer, got '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

fn env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<usize>().map_err(|_| {
            ConfigError::InvalidValue(format!(
                "{} must be a non-negative integer, got '{}'",
                name, raw
            ))
        }),
        Err(_) => Ok(default),
    }
}
