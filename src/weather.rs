//! OpenWeatherMap current-weather client
//!
//! One request per coordinate, no batching and no caching. Failures are
//! reported as [`FetchOutcome`] and collapsed to "no weather" by
//! [`WeatherClient::lookup`].

use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::WeatherConfig;
use crate::http;
use crate::models::{FetchOutcome, WeatherSample};

/// Weather API client
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl WeatherClient {
    /// Create a new client sharing the given HTTP client
    #[must_use]
    pub fn new(client: Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
        }
    }

    /// Get current weather for a coordinate
    #[instrument(name = "fetch_weather", level = "debug", skip(self))]
    pub async fn current_weather(&self, latitude: f64, longitude: f64) -> FetchOutcome<WeatherSample> {
        debug!(
            "GET {}?lat={latitude}&lon={longitude}&appid=<redacted>&units={}",
            self.base_url, self.units
        );

        let sent = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", self.units.clone()),
            ])
            .send()
            .await;

        match http::read_body(sent).await {
            FetchOutcome::Success(body) => match parse_weather(&body) {
                Ok(sample) => FetchOutcome::Success(sample),
                Err(e) => FetchOutcome::MalformedResponse(e.to_string()),
            },
            FetchOutcome::UpstreamUnavailable(reason) => FetchOutcome::UpstreamUnavailable(reason),
            FetchOutcome::MalformedResponse(reason) => FetchOutcome::MalformedResponse(reason),
        }
    }

    /// Weather for a coordinate, or `None` on any failure.
    /// Failures only show up at debug level.
    pub async fn lookup(&self, latitude: f64, longitude: f64) -> Option<WeatherSample> {
        let outcome = self.current_weather(latitude, longitude).await;
        if let Some(reason) = outcome.failure() {
            debug!("No weather for ({latitude}, {longitude}): {reason}");
        }
        outcome.ok()
    }
}

/// Decode a current-weather response body
pub fn parse_weather(body: &[u8]) -> serde_json::Result<WeatherSample> {
    let response: openweathermap::CurrentWeatherResponse = serde_json::from_slice(body)?;
    Ok(response.into())
}

/// OpenWeatherMap response structures
mod openweathermap {
    use serde::Deserialize;

    use crate::models::WeatherSample;

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeatherResponse {
        pub main: MainReadings,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainReadings {
        pub temp: f64,
        pub humidity: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }

    impl From<CurrentWeatherResponse> for WeatherSample {
        fn from(response: CurrentWeatherResponse) -> Self {
            let description = response
                .weather
                .into_iter()
                .next()
                .map(|condition| condition.description)
                .unwrap_or_default();

            WeatherSample {
                temperature: response.main.temp,
                humidity: response.main.humidity,
                description,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weather() {
        let body = br#"{
            "coord": {"lon": -120.12, "lat": 38.5},
            "weather": [
                {"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"},
                {"id": 701, "main": "Mist", "description": "mist", "icon": "50d"}
            ],
            "main": {"temp": 24.31, "feels_like": 23.9, "pressure": 1012, "humidity": 31},
            "name": "Somewhere"
        }"#;

        let sample = parse_weather(body).unwrap();
        assert_eq!(sample, WeatherSample::new(24.31, 31, "clear sky"));
    }

    #[test]
    fn test_parse_weather_without_conditions() {
        let body = br#"{"main": {"temp": -2.0, "humidity": 90}}"#;
        let sample = parse_weather(body).unwrap();
        assert_eq!(sample.description, "");
        assert_eq!(sample.humidity, 90);
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_leak_api_key() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = WeatherConfig {
            base_url: format!("http://{addr}/data/2.5/weather"),
            api_key: "SECRET-KEY-123".to_string(),
            ..WeatherConfig::default()
        };
        let client = WeatherClient::new(Client::new(), &config);

        let outcome = client.current_weather(1.0, 2.0).await;
        let reason = outcome.failure().unwrap();
        assert!(matches!(outcome, FetchOutcome::UpstreamUnavailable(_)));
        assert!(!reason.contains("SECRET-KEY-123"), "key leaked: {reason}");
        assert!(!reason.contains("appid"), "query leaked: {reason}");
    }

    #[test]
    fn test_parse_weather_error_payload() {
        let body = br#"{"cod": 401, "message": "Invalid API key."}"#;
        assert!(parse_weather(body).is_err());
    }
}
