//! potentials-core: citation and interatomic-potential metadata records
//!
//! This library provides:
//! - Citations resolved by DOI through a local cache, the GitHub mirror and
//!   DOI content negotiation, in that order
//! - Author name parsing and HTML reference rendering
//! - Potential records with a derived human-readable id, stored as JSON
//! - File/env configuration and tracing-based logging

pub mod citation;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod lookup;
pub mod potential;

pub use citation::{AuthorName, Citation};
pub use config::{ConfigError, PotentialsConfig};
pub use error::{PotentialsError, Result};
pub use http::{BlockingHttpClient, HttpError, HttpResponse, HttpTransport};
pub use lookup::{LookupChain, LookupError, RecordKind, RecordSource, Resolved, SourceChain};
pub use potential::{Potential, PotentialBuilder, PotentialModel};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
