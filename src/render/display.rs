//! Surfaces the scatter figure can be shown on

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::ScatterPlot;
use crate::{HazardWatchError, Result};

/// Something that can put a scatter figure in front of the user
pub trait ScatterDisplay: Send + Sync {
    fn show(&self, plot: &ScatterPlot) -> Result<()>;
}

/// Opens the figure in the default web browser.
///
/// The page is staged at one fixed path in the OS temp directory, so each
/// cycle replaces the last one instead of piling up files.
pub struct BrowserDisplay {
    staging_file: PathBuf,
}

impl BrowserDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self {
            staging_file: std::env::temp_dir().join("hazard-watch-scatter.html"),
        }
    }
}

impl Default for BrowserDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatterDisplay for BrowserDisplay {
    fn show(&self, plot: &ScatterPlot) -> Result<()> {
        let html = plot.to_html()?;
        fs::write(&self.staging_file, html)?;

        let target = self.staging_file.to_string_lossy();
        webbrowser::open(&target).map_err(|e| {
            HazardWatchError::display(format!("failed to open browser for {target}: {e}"))
        })?;

        debug!("Opened scatter map from {}", target);
        Ok(())
    }
}

/// Discards the figure; used for headless runs
pub struct NoDisplay;

impl ScatterDisplay for NoDisplay {
    fn show(&self, plot: &ScatterPlot) -> Result<()> {
        debug!(
            "Scatter display disabled, skipping {} points",
            plot.point_count()
        );
        Ok(())
    }
}
