//! Data models for the HazardWatch application
//!
//! This module contains the core domain models organized by concern:
//! - Event: normalized disaster events and their enriched form
//! - Weather: current weather samples for an event location
//! - Outcome: the result of talking to an upstream service

pub mod event;
pub mod outcome;
pub mod weather;

// Re-export all public types for convenient access
pub use event::{EnrichedEvent, Event, EventCollection};
pub use outcome::FetchOutcome;
pub use weather::WeatherSample;
