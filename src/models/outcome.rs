//! Result of a single call to an upstream service

use std::fmt;

/// What came back from an upstream fetch.
///
/// `Success(vec![])` means the service answered and had nothing to report,
/// which callers can tell apart from the service being unreachable.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// The service answered with a well-formed body
    Success(T),
    /// Network failure or a non-success HTTP status
    UpstreamUnavailable(String),
    /// The body could not be decoded into the expected shape
    MalformedResponse(String),
}

impl<T> FetchOutcome<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Drops the failure reason
    pub fn ok(self) -> Option<T> {
        match self {
            FetchOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Failure reason, if any
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::UpstreamUnavailable(reason) | FetchOutcome::MalformedResponse(reason) => {
                Some(reason)
            }
        }
    }
}

impl<T> fmt::Display for FetchOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Success(_) => write!(f, "success"),
            FetchOutcome::UpstreamUnavailable(reason) => write!(f, "upstream unavailable: {reason}"),
            FetchOutcome::MalformedResponse(reason) => write!(f, "malformed response: {reason}"),
        }
    }
}
