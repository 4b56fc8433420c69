//! Geographic scatter figure, one trace per event category

use askama::Template;
use serde::Serialize;
use serde_json::{Value, json};

use crate::Result;
use crate::models::Event;

pub const FIGURE_TITLE: &str = "Enhanced Real-Time Satellite Event Visualization";

/// Plotly's default qualitative colorway, assigned to categories in order of appearance
pub const PALETTE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Fixed dark look, matching Plotly's `plotly_dark` template
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: &'static str,
    pub font_color: &'static str,
    pub land_color: &'static str,
    pub border_color: &'static str,
}

pub const DARK_THEME: Theme = Theme {
    name: "plotly_dark",
    background: "rgb(17,17,17)",
    font_color: "#f2f5fa",
    land_color: "rgb(40,40,40)",
    border_color: "#506784",
};

/// Points sharing one category
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScatterTrace {
    pub category: String,
    pub color: &'static str,
    pub longitudes: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub labels: Vec<String>,
}

impl ScatterTrace {
    fn new(category: &str, color: &'static str) -> Self {
        Self {
            category: category.to_string(),
            color,
            longitudes: Vec::new(),
            latitudes: Vec::new(),
            labels: Vec::new(),
        }
    }

    fn push(&mut self, event: &Event) {
        self.longitudes.push(event.longitude);
        self.latitudes.push(event.latitude);
        self.labels.push(event.title.clone());
    }

    pub(crate) fn len(&self) -> usize {
        self.labels.len()
    }
}

/// The full scatter artifact
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    pub title: String,
    pub theme: Theme,
    pub traces: Vec<ScatterTrace>,
}

#[derive(Template)]
#[template(path = "scatter.html")]
struct ScatterTemplate<'a> {
    title: &'a str,
    figure_json: String,
}

impl ScatterPlot {
    #[must_use]
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> Self {
        let mut traces: Vec<ScatterTrace> = Vec::new();

        for event in events {
            match traces.iter_mut().find(|t| t.category == event.category) {
                Some(trace) => trace.push(event),
                None => {
                    let color = PALETTE[traces.len() % PALETTE.len()];
                    let mut trace = ScatterTrace::new(&event.category, color);
                    trace.push(event);
                    traces.push(trace);
                }
            }
        }

        Self {
            title: FIGURE_TITLE.to_string(),
            theme: DARK_THEME,
            traces,
        }
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.traces.iter().map(ScatterTrace::len).sum()
    }

    /// Color assigned to a category, if it is on the plot
    #[must_use]
    pub fn color_of(&self, category: &str) -> Option<&'static str> {
        self.traces
            .iter()
            .find(|t| t.category == category)
            .map(|t| t.color)
    }

    /// Plotly figure (`data` + `layout`)
    #[must_use]
    pub fn figure(&self) -> Value {
        let data: Vec<Value> = self
            .traces
            .iter()
            .map(|trace| {
                json!({
                    "type": "scattergeo",
                    "mode": "markers+text",
                    "name": trace.category,
                    "legendgroup": trace.category,
                    "lon": trace.longitudes,
                    "lat": trace.latitudes,
                    "text": trace.labels,
                    "textposition": "top center",
                    "marker": { "color": trace.color },
                })
            })
            .collect();

        let theme = &self.theme;
        json!({
            "data": data,
            "layout": {
                "title": { "text": self.title },
                "legend": { "title": { "text": "category" } },
                "paper_bgcolor": theme.background,
                "plot_bgcolor": theme.background,
                "font": { "color": theme.font_color },
                "geo": {
                    "showland": true,
                    "landcolor": theme.land_color,
                    "bgcolor": theme.background,
                    "lakecolor": theme.background,
                    "subunitcolor": theme.border_color,
                    "countrycolor": theme.border_color,
                },
            },
        })
    }

    /// Render the HTML page
    pub fn to_html(&self) -> Result<String> {
        let template = ScatterTemplate {
            title: &self.title,
            figure_json: super::script_json(&self.figure())?,
        };
        Ok(template.render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Vec<Event> {
        vec![
            Event::new("Wildfire A", "Wildfires", -120.0, 38.0),
            Event::new("Flood B", "Floods", 90.5, 23.7),
            Event::new("Wildfire D", "Wildfires", 150.0, -33.0),
        ]
    }

    #[test]
    fn test_points_grouped_by_category_in_order_of_appearance() {
        let plot = ScatterPlot::from_events(&events());
        assert_eq!(plot.point_count(), 3);
        assert_eq!(plot.traces.len(), 2);
        assert_eq!(plot.traces[0].category, "Wildfires");
        assert_eq!(plot.traces[0].labels, vec!["Wildfire A", "Wildfire D"]);
        assert_eq!(plot.traces[0].longitudes, vec![-120.0, 150.0]);
        assert_eq!(plot.traces[1].latitudes, vec![23.7]);
        assert_eq!(plot.color_of("Wildfires"), Some(PALETTE[0]));
        assert_eq!(plot.color_of("Floods"), Some(PALETTE[1]));
        assert_eq!(plot.color_of("Volcanoes"), None);
    }

    #[test]
    fn test_palette_wraps_around() {
        let many: Vec<Event> = (0..12)
            .map(|i| Event::new(format!("E{i}"), format!("C{i}"), 0.0, 0.0))
            .collect();
        let plot = ScatterPlot::from_events(&many);
        assert_eq!(plot.traces.len(), 12);
        assert_eq!(plot.traces[10].color, PALETTE[0]);
    }

    #[test]
    fn test_figure_uses_dark_theme() {
        let plot = ScatterPlot::from_events(&events());
        let figure = plot.figure();
        assert_eq!(figure["data"].as_array().unwrap().len(), 2);
        assert_eq!(figure["data"][0]["type"], "scattergeo");
        assert_eq!(figure["layout"]["paper_bgcolor"], DARK_THEME.background);
        assert_eq!(figure["layout"]["geo"]["showland"], true);
        assert_eq!(figure["layout"]["title"]["text"], FIGURE_TITLE);
    }

    #[test]
    fn test_html_loads_plotly() {
        let html = ScatterPlot::from_events(&events()).to_html().unwrap();
        assert!(html.contains("plotly"));
        assert!(html.contains("Flood B"));
    }
}
