//! Shared HTTP plumbing for the upstream clients

use reqwest::{Client, Response};

use crate::config::HttpConfig;
use crate::models::FetchOutcome;
use crate::{HazardWatchError, Result};

/// Build the client used by both the event feed and the weather lookups
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());

    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| HazardWatchError::http(format!("Failed to create HTTP client: {e}")))
}

/// Turn a sent request into its body bytes, classifying transport and status failures
pub(crate) async fn read_body(
    sent: reqwest::Result<Response>,
) -> FetchOutcome<Vec<u8>> {
    let response = match sent {
        Ok(response) => response,
        // Query strings can carry credentials, so the URL never enters the reason
        Err(e) => {
            return FetchOutcome::UpstreamUnavailable(format!("request failed: {}", e.without_url()));
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::UpstreamUnavailable(format!("HTTP {status}"));
    }

    match response.bytes().await {
        Ok(body) => FetchOutcome::Success(body.to_vec()),
        Err(e) => {
            FetchOutcome::UpstreamUnavailable(format!("failed to read body: {}", e.without_url()))
        }
    }
}
