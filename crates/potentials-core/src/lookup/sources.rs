//! Concrete lookup tiers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{LookupError, RecordSource};
use crate::http::HttpTransport;

/// Media type requested from the DOI resolver
const BIBTEX_MEDIA_TYPE: &str = "application/x-bibtex";

/// Which kind of record a cache or mirror holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// `.bib` files named after the DOI
    Bibtex,
    /// `.json` potential records named after the record key
    Potential,
}

impl RecordKind {
    /// File name of the record for `key`
    ///
    /// DOIs contain `/`, which is replaced by `_` so every record is a
    /// single file inside its directory.
    pub fn file_name(&self, key: &str) -> String {
        match self {
            RecordKind::Bibtex => format!("{}.bib", key.replace('/', "_")),
            RecordKind::Potential => format!("{}.json", key),
        }
    }

    /// Directory name used on the mirror
    pub fn mirror_dir(&self) -> &'static str {
        match self {
            RecordKind::Bibtex => "bibtex",
            RecordKind::Potential => "potential",
        }
    }
}

/// Records stored in a local directory
pub struct LocalCache {
    kind: RecordKind,
    dir: PathBuf,
}

impl LocalCache {
    pub const NAME: &'static str = "localdir";

    pub fn new(kind: RecordKind, dir: impl AsRef<Path>) -> Self {
        Self {
            kind,
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(self.kind.file_name(key))
    }
}

impl RecordSource for LocalCache {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn lookup(&self, key: &str) -> Result<String, LookupError> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Err(LookupError::NotCached(path));
        }
        Ok(std::fs::read_to_string(&path)?)
    }
}

/// Raw files served from the GitHub copy of the data directory
pub struct GithubMirror {
    kind: RecordKind,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl GithubMirror {
    pub const NAME: &'static str = "github";

    pub fn new(kind: RecordKind, base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            kind,
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn url_for(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            self.kind.mirror_dir(),
            self.kind.file_name(key)
        )
    }
}

impl RecordSource for GithubMirror {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn lookup(&self, key: &str) -> Result<String, LookupError> {
        let response = self.transport.get(&self.url_for(key), None)?;
        Ok(response.error_for_status()?.body)
    }
}

/// DOI content negotiation returning BibTeX
pub struct DoiResolver {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl DoiResolver {
    pub const NAME: &'static str = "doi.org";

    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Resolver URL for `doi`; each `/`-separated part is percent-encoded
    /// so `#` and `?` stay in the path
    pub fn url_for(&self, doi: &str) -> String {
        match url::Url::parse(&self.base_url) {
            Ok(mut url) if !url.cannot_be_a_base() => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().extend(doi.split('/'));
                }
                url.into()
            }
            _ => format!("{}/{}", self.base_url, doi),
        }
    }
}

impl RecordSource for DoiResolver {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn lookup(&self, doi: &str) -> Result<String, LookupError> {
        let response = self
            .transport
            .get(&self.url_for(doi), Some(BIBTEX_MEDIA_TYPE))?;
        Ok(response.error_for_status()?.body)
    }
}
