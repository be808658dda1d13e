//! Typed errors for the fetch and layout layers.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to retrieve a page. Always fatal for the extraction.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A configured selector that `scraper` refuses to compile.
#[derive(Debug, Error)]
#[error("invalid {field} selector {selector:?}: {message}")]
pub struct LayoutError {
    pub field: &'static str,
    pub selector: String,
    pub message: String,
}
