//! Error types and handling for the `HazardWatch` application
//!
//! Upstream fetch failures are not errors here: they are reported as
//! [`FetchOutcome`](crate::models::FetchOutcome) values. This type covers
//! everything else that can go wrong around a cycle.

use thiserror::Error;

/// Main error type for the `HazardWatch` application
#[derive(Error, Debug)]
pub enum HazardWatchError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTTP client construction errors
    #[error("HTTP client error: {message}")]
    Http { message: String },

    /// Template rendering errors
    #[error("Render error: {message}")]
    Render { message: String },

    /// Errors while handing the scatter figure to a display surface
    #[error("Display error: {message}")]
    Display { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl HazardWatchError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new HTTP client error
    pub fn http<S: Into<String>>(message: S) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a new display error
    pub fn display<S: Into<String>>(message: S) -> Self {
        Self::Display {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            HazardWatchError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            HazardWatchError::Http { .. } => {
                "Unable to set up the HTTP client. Please check your TLS setup.".to_string()
            }
            HazardWatchError::Render { message } => format!("Could not render map: {message}"),
            HazardWatchError::Display { .. } => {
                "Could not open the scatter map. Is a browser available?".to_string()
            }
            HazardWatchError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<askama::Error> for HazardWatchError {
    fn from(err: askama::Error) -> Self {
        HazardWatchError::render(err.to_string())
    }
}

impl From<serde_json::Error> for HazardWatchError {
    fn from(err: serde_json::Error) -> Self {
        HazardWatchError::render(format!("failed to serialize figure data: {err}"))
    }
}
