//! Configuration management for the `HazardWatch` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::HazardWatchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `HazardWatch` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HazardWatchConfig {
    /// Event feed configuration
    #[serde(default)]
    pub feed: FeedConfig,
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Refresh schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Rendered artifacts
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Event feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Events endpoint of the feed
    #[serde(default = "default_feed_url")]
    pub url: String,
    /// Value of the `status` query parameter
    #[serde(default = "default_feed_status")]
    pub status: String,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Current-weather endpoint
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// OpenWeatherMap API key, sent as `appid`
    #[serde(default = "default_weather_api_key")]
    pub api_key: String,
    /// Unit system requested from the API
    #[serde(default = "default_weather_units")]
    pub units: String,
}

/// HTTP client settings shared by both upstream clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds, 0 leaves the client default
    #[serde(default)]
    pub timeout_seconds: u32,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Refresh schedule settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes between two cycles
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u32,
    /// Seconds between two scheduler checks
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u32,
}

/// Output artifact settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Map document, overwritten every cycle
    #[serde(default = "default_map_file")]
    pub map_file: PathBuf,
    /// Open the scatter map in the browser after each cycle
    #[serde(default = "default_show_scatter")]
    pub show_scatter: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_feed_url() -> String {
    "https://eonet.gsfc.nasa.gov/api/v3/events".to_string()
}

fn default_feed_status() -> String {
    "open".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_weather_api_key() -> String {
    "YOUR_OPENWEATHERMAP_API_KEY".to_string()
}

fn default_weather_units() -> String {
    "metric".to_string()
}

fn default_user_agent() -> String {
    format!("hazard-watch/{}", crate::VERSION)
}

fn default_refresh_minutes() -> u32 {
    30
}

fn default_tick_seconds() -> u32 {
    1
}

fn default_map_file() -> PathBuf {
    PathBuf::from("enhanced_satellite_map.html")
}

fn default_show_scatter() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            status: default_feed_status(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: default_weather_api_key(),
            units: default_weather_units(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 0,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            refresh_minutes: default_refresh_minutes(),
            tick_seconds: default_tick_seconds(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            map_file: default_map_file(),
            show_scatter: default_show_scatter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ScheduleConfig {
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.refresh_minutes) * 60)
    }

    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_secs(u64::from(self.tick_seconds))
    }
}

impl HttpConfig {
    /// Explicit request timeout, if one is configured
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(u64::from(self.timeout_seconds)))
    }
}

impl HazardWatchConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        Self::load_with_environment(config_path, Self::environment(None))
    }

    /// `HAZARDWATCH_WEATHER__API_KEY` overrides `weather.api_key`.
    /// `vars` replaces the process environment when given.
    fn environment(vars: Option<Map<String, String>>) -> Environment {
        Environment::with_prefix("HAZARDWATCH")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(vars)
    }

    fn load_with_environment(config_path: Option<PathBuf>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(Self::default_config_file);

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(environment);

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: HazardWatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hazard-watch").join("config.toml"))
    }

    fn default_config_file() -> PathBuf {
        Self::get_config_path()
            .filter(|path| path.exists())
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Apply default values to fields left empty by a config file
    pub fn apply_defaults(&mut self) {
        if self.feed.url.is_empty() {
            self.feed.url = default_feed_url();
        }
        if self.feed.status.is_empty() {
            self.feed.status = default_feed_status();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.units.is_empty() {
            self.weather.units = default_weather_units();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the weather API credential
    pub fn validate_api_key(&self) -> Result<()> {
        if self.weather.api_key.trim().is_empty() {
            return Err(HazardWatchError::config(
                "Weather API key cannot be empty. Set weather.api_key or HAZARDWATCH_WEATHER__API_KEY.",
            )
            .into());
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.schedule.refresh_minutes == 0 {
            return Err(
                HazardWatchError::config("Refresh interval must be at least 1 minute").into(),
            );
        }

        if self.schedule.tick_seconds == 0 {
            return Err(HazardWatchError::config("Scheduler tick must be at least 1 second").into());
        }

        if self.schedule.refresh_minutes > 1440 {
            return Err(
                HazardWatchError::config("Refresh interval cannot exceed 1440 minutes").into(),
            );
        }

        if self.schedule.tick_seconds > 60 {
            return Err(HazardWatchError::config("Scheduler tick cannot exceed 60 seconds").into());
        }

        if self.schedule.tick() > self.schedule.refresh_interval() {
            return Err(HazardWatchError::config(
                "Scheduler tick cannot be longer than the refresh interval",
            )
            .into());
        }

        if self.http.timeout_seconds > 300 {
            return Err(HazardWatchError::config("HTTP timeout cannot exceed 300 seconds").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(HazardWatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(HazardWatchError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Event feed URL", &self.feed.url),
            ("Weather API base URL", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(HazardWatchError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.output.map_file.as_os_str().is_empty() {
            return Err(HazardWatchError::config("Map output file cannot be empty").into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = HazardWatchConfig::default();
        assert_eq!(config.feed.url, "https://eonet.gsfc.nasa.gov/api/v3/events");
        assert_eq!(config.feed.status, "open");
        assert_eq!(
            config.weather.base_url,
            "https://api.openweathermap.org/data/2.5/weather"
        );
        assert_eq!(config.weather.units, "metric");
        assert_eq!(config.schedule.refresh_interval(), Duration::from_secs(1800));
        assert_eq!(config.schedule.tick(), Duration::from_secs(1));
        assert_eq!(
            config.output.map_file,
            PathBuf::from("enhanced_satellite_map.html")
        );
        assert!(config.http.timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = HazardWatchConfig::default();
        config.weather.api_key = "   ".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key cannot be empty"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = HazardWatchConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[rstest]
    #[case::refresh_zero(|c: &mut HazardWatchConfig| c.schedule.refresh_minutes = 0, "at least 1 minute")]
    #[case::tick_zero(|c: &mut HazardWatchConfig| c.schedule.tick_seconds = 0, "at least 1 second")]
    #[case::refresh_too_long(|c: &mut HazardWatchConfig| c.schedule.refresh_minutes = 2000, "1440 minutes")]
    #[case::tick_too_long(|c: &mut HazardWatchConfig| c.schedule.tick_seconds = 90, "60 seconds")]
    #[case::timeout_too_long(|c: &mut HazardWatchConfig| c.http.timeout_seconds = 500, "300 seconds")]
    #[case::feed_not_http(|c: &mut HazardWatchConfig| c.feed.url = "ftp://feed".into(), "Event feed URL")]
    #[case::weather_not_http(|c: &mut HazardWatchConfig| c.weather.base_url = "weather".into(), "Weather API base URL")]
    fn test_config_validation_rejects(
        #[case] mutate: fn(&mut HazardWatchConfig),
        #[case] expected: &str,
    ) {
        let mut config = HazardWatchConfig::default();
        mutate(&mut config);
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains(expected), "unexpected message: {message}");
    }

    #[test]
    fn test_apply_defaults_fills_empty_strings() {
        let mut config = HazardWatchConfig::default();
        config.feed.status = String::new();
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.feed.status, "open");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_zero_refresh_in_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[schedule]\nrefresh_minutes = 0").unwrap();

        let result = HazardWatchConfig::load_with_environment(
            Some(file.path().to_path_buf()),
            HazardWatchConfig::environment(Some(Map::new())),
        );
        assert!(result.unwrap_err().to_string().contains("at least 1 minute"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[weather]\napi_key = \"from-file\"\n\n[schedule]\nrefresh_minutes = 5").unwrap();

        let vars = Map::from([
            ("HAZARDWATCH_WEATHER__API_KEY".to_string(), "from-env".to_string()),
            ("HAZARDWATCH_SCHEDULE__REFRESH_MINUTES".to_string(), "7".to_string()),
        ]);
        let config = HazardWatchConfig::load_with_environment(
            Some(file.path().to_path_buf()),
            HazardWatchConfig::environment(Some(vars)),
        )
        .unwrap();

        assert_eq!(config.weather.api_key, "from-env");
        assert_eq!(config.schedule.refresh_minutes, 7);
        assert_eq!(config.weather.units, "metric");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[weather]
api_key = "abc123def"

[schedule]
refresh_minutes = 5

[output]
map_file = "events.html"
show_scatter = false
"#
        )
        .unwrap();

        let config = HazardWatchConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.weather.api_key, "abc123def");
        assert_eq!(config.weather.units, "metric");
        assert_eq!(config.schedule.refresh_minutes, 5);
        assert_eq!(config.output.map_file, PathBuf::from("events.html"));
        assert!(!config.output.show_scatter);
        assert_eq!(config.feed.status, "open");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = HazardWatchConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("hazard-watch"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
