//! HTTP transport used by the mirror and resolver lookups
//!
//! Lookups talk to a [`HttpTransport`] rather than to reqwest directly so the
//! fallback chain can be exercised without a network.

pub mod blocking;

pub use blocking::BlockingHttpClient;

use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HttpError {
    #[error("Request failed: {message}")]
    RequestFailed { message: String },
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
    #[error("Timeout")]
    Timeout,
    #[error("Rate limited")]
    RateLimited,
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Parse error: {message}")]
    ParseError { message: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`HttpError::Status`]
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(HttpError::Status {
                status: self.status,
                url: self.url,
            })
        }
    }
}

/// Blocking GET with an optional `Accept` header
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse, HttpError>;
}
