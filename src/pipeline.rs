//! One fetch → enrich → render cycle

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::HazardWatchConfig;
use crate::eonet::EonetClient;
use crate::models::{EnrichedEvent, EventCollection, FetchOutcome};
use crate::render::{RenderReport, Renderer};
use crate::scheduler::Job;
use crate::weather::WeatherClient;
use crate::{Result, http};

/// How a cycle ended
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Both artifacts were produced
    Rendered(RenderReport),
    /// The feed answered with no open events
    NoActiveEvents,
    /// The feed could not be reached or answered with an error status
    FeedUnavailable(String),
    /// The feed answered with a body we could not decode
    FeedMalformed(String),
    /// Events were fetched but the map could not be written
    RenderFailed(String),
}

/// Summary of one cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    /// Events in the normalized collection
    pub events: usize,
    /// Events that got a weather sample
    pub enriched: usize,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    #[must_use]
    pub fn rendered(&self) -> bool {
        matches!(self.outcome, CycleOutcome::Rendered(_))
    }
}

/// The ingestion-and-render pipeline
pub struct Pipeline {
    events: EonetClient,
    weather: WeatherClient,
    renderer: Renderer,
}

impl Pipeline {
    pub fn new(events: EonetClient, weather: WeatherClient, renderer: Renderer) -> Self {
        Self {
            events,
            weather,
            renderer,
        }
    }

    /// Pipeline wired from configuration, with the renderer chosen by the caller
    pub fn with_renderer(config: &HazardWatchConfig, renderer: Renderer) -> Result<Self> {
        let client = http::build_client(&config.http)?;
        Ok(Self::new(
            EonetClient::new(client.clone(), &config.feed),
            WeatherClient::new(client, &config.weather),
            renderer,
        ))
    }

    /// Pipeline wired entirely from configuration
    pub fn from_config(config: &HazardWatchConfig) -> Result<Self> {
        Self::with_renderer(config, Renderer::from_config(&config.output))
    }

    /// Attach weather to every event, one request at a time
    pub async fn enrich(&self, events: EventCollection) -> Vec<EnrichedEvent> {
        let mut enriched = Vec::with_capacity(events.len());
        for event in events {
            let weather = self.weather.lookup(event.latitude, event.longitude).await;
            enriched.push(EnrichedEvent::new(event, weather));
        }
        enriched
    }

    /// Run a full cycle. Never fails: every problem ends up in the report.
    pub async fn run_cycle(&self) -> CycleReport {
        let started_at = Utc::now();
        info!("Fetching updated event data...");

        let events = match self.events.fetch_open_events().await {
            FetchOutcome::Success(events) => events,
            FetchOutcome::UpstreamUnavailable(reason) => {
                warn!("No events to render: event feed unavailable");
                return CycleReport {
                    started_at,
                    events: 0,
                    enriched: 0,
                    outcome: CycleOutcome::FeedUnavailable(reason),
                };
            }
            FetchOutcome::MalformedResponse(reason) => {
                warn!("No events to render: event feed returned malformed data");
                return CycleReport {
                    started_at,
                    events: 0,
                    enriched: 0,
                    outcome: CycleOutcome::FeedMalformed(reason),
                };
            }
        };

        if events.is_empty() {
            info!("No active events found.");
            return CycleReport {
                started_at,
                events: 0,
                enriched: 0,
                outcome: CycleOutcome::NoActiveEvents,
            };
        }

        let total = events.len();
        let enriched = self.enrich(events).await;
        let with_weather = enriched.iter().filter(|e| e.is_enriched()).count();
        debug!("Weather available for {with_weather} of {total} events");

        let outcome = match self.renderer.render(&enriched) {
            Ok(report) => CycleOutcome::Rendered(report),
            Err(e) => {
                warn!("Rendering failed: {e}");
                CycleOutcome::RenderFailed(e.to_string())
            }
        };

        CycleReport {
            started_at,
            events: total,
            enriched: with_weather,
            outcome,
        }
    }
}

impl Job for Pipeline {
    type Output = CycleReport;

    async fn run(&mut self) -> CycleReport {
        self.run_cycle().await
    }
}
