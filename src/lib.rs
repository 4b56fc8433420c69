//! `HazardWatch` - live map of active natural-disaster events
//!
//! This library polls the NASA EONET event feed for open events, looks up
//! the current weather at each event location and renders the result as a
//! saved interactive map and an on-screen scatter map, on a fixed schedule.

pub mod config;
pub mod eonet;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod scheduler;
pub mod weather;

// Re-export core types for public API
pub use config::HazardWatchConfig;
pub use eonet::EonetClient;
pub use error::HazardWatchError;
pub use models::{EnrichedEvent, Event, EventCollection, FetchOutcome, WeatherSample};
pub use pipeline::{CycleOutcome, CycleReport, Pipeline};
pub use render::{RenderReport, Renderer};
pub use scheduler::{Clock, ManualClock, PeriodicTask, SystemClock};
pub use weather::WeatherClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, HazardWatchError>;
