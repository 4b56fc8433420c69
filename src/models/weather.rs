//! Weather sample model and display methods

use serde::{Deserialize, Serialize};

/// Current weather at an event location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSample {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: i64,
    /// Human-readable description of weather conditions
    pub description: String,
}

impl WeatherSample {
    #[must_use]
    pub fn new(temperature: f64, humidity: i64, description: impl Into<String>) -> Self {
        Self {
            temperature,
            humidity,
            description: description.into(),
        }
    }

    /// Format temperature with unit, keeping the value as reported
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature)
    }

    /// Format humidity with unit
    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{}%", self.humidity)
    }

    /// Popup fragment shown under the event title
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Temp: {}, Humidity: {}",
            self.format_temperature(),
            self.format_humidity()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let sample = WeatherSample::new(21.5, 40, "clear sky");
        assert_eq!(sample.summary(), "Temp: 21.5°C, Humidity: 40%");
    }

    #[test]
    fn test_temperature_is_not_rounded() {
        let sample = WeatherSample::new(-3.27, 88, "light snow");
        assert_eq!(sample.format_temperature(), "-3.27°C");
        assert_eq!(sample.format_humidity(), "88%");
    }
}
