//! Blocking HTTP client using reqwest

use super::{HttpError, HttpResponse, HttpTransport};
use crate::config::PotentialsConfig;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use std::time::Duration;

pub struct BlockingHttpClient {
    client: Client,
    user_agent: String,
}

impl BlockingHttpClient {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| HttpError::RequestFailed {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    pub fn from_config(config: &PotentialsConfig) -> Result<Self, HttpError> {
        Self::new(&config.user_agent, config.timeout())
    }
}

impl HttpTransport for BlockingHttpClient {
    fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse, HttpError> {
        let parsed = reqwest::Url::parse(url).map_err(|_| HttpError::InvalidUrl {
            url: url.to_string(),
        })?;

        let mut request = self.client.get(parsed).header(USER_AGENT, &self.user_agent);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::RequestFailed {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(HttpError::RateLimited);
        }

        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();

        let body = response.text().map_err(|e| HttpError::ParseError {
            message: e.to_string(),
        })?;

        Ok(HttpResponse {
            url: final_url,
            status,
            body,
            headers,
        })
    }
}
