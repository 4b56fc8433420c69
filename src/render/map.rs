//! Interactive map document
//!
//! A self-contained Leaflet page with one marker per event. The file is
//! written in one go and replaces whatever the previous cycle left behind.

use std::fs;
use std::path::Path;

use askama::Template;
use serde::Serialize;

use crate::Result;
use crate::models::EnrichedEvent;

/// Every marker shares this color
pub const MARKER_COLOR: &str = "red";

/// Map view on load
pub const MAP_CENTER: [f64; 2] = [0.0, 0.0];
pub const MAP_ZOOM: u8 = 2;

/// A single event marker
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    /// Popup content, one entry per line
    pub popup: Vec<String>,
    pub color: &'static str,
}

impl Marker {
    #[must_use]
    pub fn from_enriched(enriched: &EnrichedEvent) -> Self {
        let event = &enriched.event;
        let mut popup = vec![format!("{} ({})", event.title, event.category)];
        if let Some(weather) = &enriched.weather {
            popup.push(weather.summary());
        }

        Self {
            latitude: event.latitude,
            longitude: event.longitude,
            popup,
            color: MARKER_COLOR,
        }
    }

    /// Popup lines joined the way they are shown
    #[must_use]
    pub fn popup_text(&self) -> String {
        self.popup.join("\n")
    }
}

/// The full map artifact
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    pub markers: Vec<Marker>,
}

#[derive(Template)]
#[template(path = "map.html")]
struct MapTemplate<'a> {
    title: &'a str,
    center_lat: f64,
    center_lon: f64,
    zoom: u8,
    markers_json: String,
}

impl MapDocument {
    #[must_use]
    pub fn from_events(events: &[EnrichedEvent]) -> Self {
        Self {
            markers: events.iter().map(Marker::from_enriched).collect(),
        }
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Render the HTML page
    pub fn to_html(&self) -> Result<String> {
        let template = MapTemplate {
            title: "Active Natural Events",
            center_lat: MAP_CENTER[0],
            center_lon: MAP_CENTER[1],
            zoom: MAP_ZOOM,
            markers_json: super::script_json(&self.markers)?,
        };
        Ok(template.render()?)
    }

    /// Write the page to `path`, replacing any previous file
    pub fn save(&self, path: &Path) -> Result<()> {
        let html = self.to_html()?;
        fs::write(path, html)?;
        Ok(())
    }
}
