//! Ordered record lookup with fallback
//!
//! Each tier is a [`RecordSource`] that either returns the raw record text or
//! a [`LookupError`]. A [`SourceChain`] tries its fallible tiers in order and
//! stops at the first success; their errors are logged and discarded. The
//! optional terminal tier is tried last and its error is returned as-is.

mod sources;

pub use sources::{DoiResolver, GithubMirror, LocalCache, RecordKind};

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::PotentialsConfig;
use crate::http::{BlockingHttpClient, HttpError, HttpTransport};

/// Failure of a single lookup tier
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("not cached at {}", .0.display())]
    NotCached(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
    #[error("all lookup tiers failed")]
    Exhausted,
}

/// One tier of a lookup chain
pub trait RecordSource: Send + Sync {
    /// Short label used in log messages ("localdir", "github", ...)
    fn name(&self) -> &str;

    /// Fetch the raw record text for `key`
    fn lookup(&self, key: &str) -> Result<String, LookupError>;
}

/// Record text together with the tier that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    pub source: String,
}

/// Fallible tiers tried in order, then an optional terminal tier
#[derive(Default)]
pub struct SourceChain {
    tiers: Vec<Box<dyn RecordSource>>,
    terminal: Option<Box<dyn RecordSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tier whose failure falls through to the next one
    pub fn then(mut self, source: impl RecordSource + 'static) -> Self {
        self.tiers.push(Box::new(source));
        self
    }

    /// Set the last tier, whose failure is returned to the caller
    pub fn finally(mut self, source: impl RecordSource + 'static) -> Self {
        self.terminal = Some(Box::new(source));
        self
    }

    /// Names of all tiers in the order they are tried
    pub fn names(&self) -> Vec<&str> {
        self.tiers
            .iter()
            .chain(self.terminal.iter())
            .map(|source| source.name())
            .collect()
    }

    pub fn resolve(&self, key: &str) -> Result<Resolved, LookupError> {
        for source in &self.tiers {
            match source.lookup(key) {
                Ok(text) => {
                    return Ok(Resolved {
                        text,
                        source: source.name().to_string(),
                    })
                }
                Err(e) => debug!("{} lookup for {} failed: {}", source.name(), key, e),
            }
        }

        match &self.terminal {
            Some(source) => source.lookup(key).map(|text| Resolved {
                text,
                source: source.name().to_string(),
            }),
            None => Err(LookupError::Exhausted),
        }
    }
}

/// Lookup chains for citations and potentials sharing one configuration
///
/// Citations are resolved local cache, then mirror, then DOI resolver.
/// Potentials are resolved local cache, then mirror.
pub struct LookupChain {
    config: PotentialsConfig,
    bibtex: SourceChain,
    potential: SourceChain,
}

impl LookupChain {
    /// Chains backed by a blocking reqwest client built from `config`
    pub fn new(config: PotentialsConfig) -> Result<Self, HttpError> {
        let transport = Arc::new(BlockingHttpClient::from_config(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Chains that send every request through `transport`
    pub fn with_transport(config: PotentialsConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let bibtex = SourceChain::new()
            .then(LocalCache::new(RecordKind::Bibtex, &config.bibtex_dir))
            .then(GithubMirror::new(
                RecordKind::Bibtex,
                &config.mirror_base_url,
                transport.clone(),
            ))
            .finally(DoiResolver::new(&config.resolver_base_url, transport.clone()));

        let potential = SourceChain::new()
            .then(LocalCache::new(RecordKind::Potential, &config.potential_dir))
            .then(GithubMirror::new(
                RecordKind::Potential,
                &config.mirror_base_url,
                transport,
            ));

        Self::from_chains(config, bibtex, potential)
    }

    /// Chains that only read the local caches
    pub fn offline(config: PotentialsConfig) -> Self {
        let bibtex = SourceChain::new().then(LocalCache::new(RecordKind::Bibtex, &config.bibtex_dir));
        let potential =
            SourceChain::new().then(LocalCache::new(RecordKind::Potential, &config.potential_dir));
        Self::from_chains(config, bibtex, potential)
    }

    /// Fully custom chains
    pub fn from_chains(config: PotentialsConfig, bibtex: SourceChain, potential: SourceChain) -> Self {
        Self {
            config,
            bibtex,
            potential,
        }
    }

    pub fn config(&self) -> &PotentialsConfig {
        &self.config
    }

    /// Resolve BibTeX text for a DOI
    pub fn resolve_bibtex(&self, doi: &str) -> Result<Resolved, LookupError> {
        let resolved = self.bibtex.resolve(doi)?;
        if self.config.verbose {
            info!("bibtex {} {} from {}", verb(&resolved), doi, resolved.source);
        }
        Ok(resolved)
    }

    /// Resolve potential JSON text for a record key
    pub fn resolve_potential(&self, key: &str) -> Result<Resolved, LookupError> {
        let resolved = self.potential.resolve(key)?;
        if self.config.verbose {
            info!("potential {} {} from {}", verb(&resolved), key, resolved.source);
        }
        Ok(resolved)
    }
}

fn verb(resolved: &Resolved) -> &'static str {
    if resolved.source == LocalCache::NAME {
        "loaded"
    } else {
        "downloaded"
    }
}
