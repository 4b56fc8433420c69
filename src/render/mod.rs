//! Rendering of enriched events into the two artifacts
//!
//! - Map: a Leaflet page saved to a fixed file, overwritten every cycle
//! - Scatter: a Plotly geo figure handed to a [`ScatterDisplay`]

pub mod display;
pub mod map;
pub mod scatter;

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::Result;
use crate::config::OutputConfig;
use crate::models::EnrichedEvent;

pub use display::{BrowserDisplay, NoDisplay, ScatterDisplay};
pub use map::{MapDocument, Marker};
pub use scatter::{ScatterPlot, ScatterTrace};

/// What one render pass produced
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub map_file: PathBuf,
    pub markers: usize,
    pub points: usize,
    /// `false` when the display surface failed
    pub displayed: bool,
}

/// Produces both artifacts for a cycle
pub struct Renderer {
    map_file: PathBuf,
    display: Box<dyn ScatterDisplay>,
}

impl Renderer {
    pub fn new(map_file: impl Into<PathBuf>, display: Box<dyn ScatterDisplay>) -> Self {
        Self {
            map_file: map_file.into(),
            display,
        }
    }

    /// Renderer writing to the configured map file, showing the scatter map
    /// in the browser unless disabled
    #[must_use]
    pub fn from_config(output: &OutputConfig) -> Self {
        let display: Box<dyn ScatterDisplay> = if output.show_scatter {
            Box::new(BrowserDisplay::new())
        } else {
            Box::new(NoDisplay)
        };
        Self::new(output.map_file.clone(), display)
    }

    /// Save the map and show the scatter figure.
    ///
    /// A failing display is logged and reported, it never fails the pass.
    pub fn render(&self, events: &[EnrichedEvent]) -> Result<RenderReport> {
        let map = MapDocument::from_events(events);
        map.save(&self.map_file)?;
        info!("Map saved as '{}'.", self.map_file.display());

        let plot = ScatterPlot::from_events(events.iter().map(|e| &e.event));
        let displayed = match self.display.show(&plot) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not display scatter map: {e}");
                false
            }
        };

        Ok(RenderReport {
            map_file: self.map_file.clone(),
            markers: map.marker_count(),
            points: plot.point_count(),
            displayed,
        })
    }
}

/// JSON for embedding inside a `<script>` block
pub(crate) fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", r"<\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HazardWatchError;
    use crate::models::{Event, WeatherSample};
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct RecordingDisplay {
        shown: Arc<Mutex<Vec<ScatterPlot>>>,
    }

    impl ScatterDisplay for RecordingDisplay {
        fn show(&self, plot: &ScatterPlot) -> Result<()> {
            self.shown.lock().unwrap().push(plot.clone());
            Ok(())
        }
    }

    struct BrokenDisplay;

    impl ScatterDisplay for BrokenDisplay {
        fn show(&self, _plot: &ScatterPlot) -> Result<()> {
            Err(HazardWatchError::display("no browser"))
        }
    }

    fn three_events() -> Vec<EnrichedEvent> {
        vec![
            EnrichedEvent::new(
                Event::new("Wildfire A", "Wildfires", -120.0, 38.0),
                Some(WeatherSample::new(30.0, 10, "clear sky")),
            ),
            EnrichedEvent::new(Event::new("Flood B", "Floods", 90.0, 23.0), None),
            EnrichedEvent::new(
                Event::new("Storm C", "Severe Storms", -75.0, 25.0),
                Some(WeatherSample::new(27.5, 85, "heavy rain")),
            ),
        ]
    }

    #[test]
    fn test_three_events_give_three_markers_and_points() {
        let dir = TempDir::new().unwrap();
        let display = RecordingDisplay::default();
        let renderer = Renderer::new(dir.path().join("map.html"), Box::new(display.clone()));

        let report = renderer.render(&three_events()).unwrap();
        assert_eq!(report.markers, 3);
        assert_eq!(report.points, 3);
        assert!(report.displayed);

        let shown = display.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        let plot = &shown[0];
        assert_eq!(plot.traces.len(), 3);
        for trace in &plot.traces {
            assert_eq!(trace.len(), 1);
        }
        assert_ne!(plot.color_of("Wildfires"), plot.color_of("Floods"));
        assert_ne!(plot.color_of("Floods"), plot.color_of("Severe Storms"));

        let html = fs::read_to_string(report.map_file).unwrap();
        assert_eq!(html.matches(r#""latitude":"#).count(), 3);
        assert!(html.contains("Temp: 27.5°C, Humidity: 85%"));
    }

    #[test]
    fn test_map_is_overwritten_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.html");
        let renderer = Renderer::new(&path, Box::new(NoDisplay));

        renderer.render(&three_events()).unwrap();
        renderer.render(&three_events()[..1]).unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert_eq!(html.matches(r#""latitude":"#).count(), 1);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_display_failure_does_not_fail_render() {
        let dir = TempDir::new().unwrap();
        let renderer = Renderer::new(dir.path().join("map.html"), Box::new(BrokenDisplay));

        let report = renderer.render(&three_events()).unwrap();
        assert!(!report.displayed);
        assert!(report.map_file.exists());
    }

    #[test]
    fn test_unwritable_map_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let renderer = Renderer::new(dir.path().join("missing").join("map.html"), Box::new(NoDisplay));
        let err = renderer.render(&three_events()).unwrap_err();
        assert!(matches!(err, HazardWatchError::Io { .. }));
    }
}
