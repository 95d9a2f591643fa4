//! Shared helpers for integration tests

pub mod fixtures;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use potentials_core::{HttpError, HttpResponse, HttpTransport, LookupChain, PotentialsConfig};
use tempfile::TempDir;

pub const MIRROR: &str = "https://mirror.test/data";
pub const RESOLVER: &str = "https://resolver.test";

/// Canned responses keyed by URL; anything else is a 404
#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<String, String>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.routes.insert(url.into(), body.into());
        self
    }

    /// URLs requested so far, in order
    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Accept header of every request, in order
    pub fn accepts(&self) -> Vec<Option<String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, accept)| accept.clone())
            .collect()
    }
}

impl HttpTransport for MockTransport {
    fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse, HttpError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), accept.map(str::to_string)));

        let (status, body) = match self.routes.get(url) {
            Some(body) => (200, body.clone()),
            None => (404, "Not Found".to_string()),
        };
        Ok(HttpResponse {
            url: url.to_string(),
            status,
            body,
            headers: HashMap::new(),
        })
    }
}

/// Config rooted in a fresh temporary directory pointing at the mock hosts
pub fn test_config() -> (TempDir, PotentialsConfig) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = PotentialsConfig::with_data_root(dir.path());
    config.mirror_base_url = MIRROR.to_string();
    config.resolver_base_url = RESOLVER.to_string();
    (dir, config)
}

/// Lookup chain that routes all HTTP through `transport`
pub fn lookup_with(transport: &Arc<MockTransport>) -> (TempDir, LookupChain) {
    let (dir, config) = test_config();
    let lookup = LookupChain::with_transport(config, transport.clone());
    (dir, lookup)
}
