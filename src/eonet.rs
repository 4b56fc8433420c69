//! NASA EONET event feed client
//!
//! Fetches currently open natural events and flattens each one into an
//! [`Event`]. Only the first geometry and the first category of a record are
//! kept; records without geometry are dropped.

use reqwest::Client;
use tracing::{debug, error, info, instrument};

use crate::config::FeedConfig;
use crate::http;
use crate::models::{Event, EventCollection, FetchOutcome};

/// Client for the event feed
pub struct EonetClient {
    client: Client,
    url: String,
    status: String,
}

impl EonetClient {
    /// Create a new client sharing the given HTTP client
    #[must_use]
    pub fn new(client: Client, config: &FeedConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            status: config.status.clone(),
        }
    }

    /// Fetch all events matching the configured status filter
    #[instrument(name = "fetch_events", skip(self), fields(url = %self.url, status = %self.status))]
    pub async fn fetch_open_events(&self) -> FetchOutcome<EventCollection> {
        let sent = self
            .client
            .get(&self.url)
            .query(&[("status", self.status.as_str())])
            .send()
            .await;

        let body = match http::read_body(sent).await {
            FetchOutcome::Success(body) => body,
            FetchOutcome::UpstreamUnavailable(reason) => {
                error!("Error fetching event data: {reason}");
                return FetchOutcome::UpstreamUnavailable(reason);
            }
            FetchOutcome::MalformedResponse(reason) => {
                error!("Error fetching event data: {reason}");
                return FetchOutcome::MalformedResponse(reason);
            }
        };

        match parse_events(&body) {
            Ok(events) => {
                info!("Fetched {} open events", events.len());
                FetchOutcome::Success(events)
            }
            Err(e) => {
                error!("Error decoding event data: {e}");
                FetchOutcome::MalformedResponse(e.to_string())
            }
        }
    }
}

/// Decode a raw feed body and normalize its records
pub fn parse_events(body: &[u8]) -> serde_json::Result<EventCollection> {
    let response: eonet_api::EventsResponse = serde_json::from_slice(body)?;
    Ok(normalize_events(response))
}

/// Flatten feed records into events, skipping records without usable geometry
#[must_use]
pub fn normalize_events(response: eonet_api::EventsResponse) -> EventCollection {
    let total = response.events.len();

    let events: EventCollection = response
        .events
        .into_iter()
        .filter_map(|source| source.into_event())
        .collect();

    if events.len() < total {
        debug!(
            "Dropped {} of {} records without a point geometry",
            total - events.len(),
            total
        );
    }

    events
}

/// EONET v3 response structures
pub mod eonet_api {
    use serde::Deserialize;
    use serde_json::Value;

    use crate::models::Event;

    #[derive(Debug, Deserialize)]
    pub struct EventsResponse {
        pub events: Vec<SourceEvent>,
    }

    #[derive(Debug, Deserialize)]
    pub struct SourceEvent {
        pub title: String,
        #[serde(default)]
        pub categories: Vec<SourceCategory>,
        /// v3 calls this `geometry`, older payloads `geometries`
        #[serde(default, alias = "geometries")]
        pub geometry: Option<Vec<SourceGeometry>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct SourceCategory {
        pub title: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct SourceGeometry {
        #[serde(rename = "type", default)]
        pub kind: Option<String>,
        pub coordinates: Value,
    }

    impl SourceGeometry {
        /// `(longitude, latitude)` when the coordinates are a numeric point
        #[must_use]
        pub fn point(&self) -> Option<(f64, f64)> {
            let pair = self.coordinates.as_array()?;
            let longitude = pair.first()?.as_f64()?;
            let latitude = pair.get(1)?.as_f64()?;
            Some((longitude, latitude))
        }
    }

    impl SourceEvent {
        pub fn into_event(self) -> Option<Event> {
            let first = self.geometry.as_ref()?.first()?;
            let Some((longitude, latitude)) = first.point() else {
                tracing::debug!(
                    "Skipping '{}': first geometry is not a point ({:?})",
                    self.title,
                    first.kind
                );
                return None;
            };

            let category = self
                .categories
                .into_iter()
                .next()
                .map(|category| category.title)
                .unwrap_or_default();

            Some(Event {
                title: self.title,
                category,
                longitude,
                latitude,
            })
        }
    }
}
