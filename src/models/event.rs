//! Normalized disaster event model

use serde::{Deserialize, Serialize};

use super::WeatherSample;

/// One open event, flattened from the upstream feed
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Event {
    /// Event title as published by the feed
    pub title: String,
    /// Title of the first listed category
    pub category: String,
    /// Longitude of the first geometry entry, verbatim
    pub longitude: f64,
    /// Latitude of the first geometry entry, verbatim
    pub latitude: f64,
}

/// Events of one cycle, in feed order
pub type EventCollection = Vec<Event>;

impl Event {
    /// Create a new event
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        longitude: f64,
        latitude: f64,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            longitude,
            latitude,
        }
    }
}

/// An event paired with the weather observed at its location, if any
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EnrichedEvent {
    pub event: Event,
    pub weather: Option<WeatherSample>,
}

impl EnrichedEvent {
    #[must_use]
    pub fn new(event: Event, weather: Option<WeatherSample>) -> Self {
        Self { event, weather }
    }

    #[must_use]
    pub fn is_enriched(&self) -> bool {
        self.weather.is_some()
    }
}
