//! Bibliographic citation records
//!
//! A [`Citation`] wraps one parsed BibTeX entry identified by its DOI. It is
//! built either from a local `.bib` file or by resolving the DOI through a
//! [`LookupChain`], and can be written back to the citation cache.

pub mod author;
mod html;

pub use author::{initials, parse_author, parse_authors, split_authors, AuthorName};

use std::fmt;
use std::path::{Path, PathBuf};

use potentials_bibtex::{decode_entry, format_entry, parse_entry, BibTeXEntry};
use tracing::warn;

use crate::error::{PotentialsError, Result};
use crate::lookup::{LookupChain, RecordKind};

/// One bibliographic entry and the DOI it was resolved for
#[derive(Debug, Clone, PartialEq)]
pub struct Citation {
    doi: String,
    content: BibTeXEntry,
}

impl Citation {
    /// Load from a file when `doi_or_path` names one, otherwise fetch by DOI
    pub fn new(doi_or_path: &str, lookup: &LookupChain) -> Result<Self> {
        if Path::new(doi_or_path).is_file() {
            Self::load(doi_or_path)
        } else {
            Self::fetch(doi_or_path, lookup)
        }
    }

    /// Parse a local BibTeX file, taking the DOI from its `doi` field
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_bibtex(&text)
    }

    /// Parse BibTeX text, taking the DOI from its `doi` field
    pub fn from_bibtex(text: &str) -> Result<Self> {
        let content = parse_content(text)?;
        let doi = content
            .doi()
            .ok_or_else(|| PotentialsError::MissingField("doi".to_string()))?
            .to_string();
        Ok(Self { doi, content })
    }

    /// Resolve `doi` through the citation lookup chain
    ///
    /// Local cache and mirror failures fall through; a resolver failure is
    /// returned as [`PotentialsError::NotFound`].
    pub fn fetch(doi: &str, lookup: &LookupChain) -> Result<Self> {
        let resolved = lookup.resolve_bibtex(doi).map_err(|e| {
            warn!("bibtex lookup for {} failed: {}", doi, e);
            PotentialsError::NotFound(format!("bibtex for doi {}: {}", doi, e))
        })?;

        Ok(Self {
            doi: doi.to_string(),
            content: parse_content(&resolved.text)?,
        })
    }

    pub fn doi(&self) -> &str {
        &self.doi
    }

    /// The parsed BibTeX entry
    pub fn content(&self) -> &BibTeXEntry {
        &self.content
    }

    /// Field value by name (case-insensitive)
    pub fn get(&self, field: &str) -> Option<&str> {
        self.content.get_field(field)
    }

    /// Cache path of this citation inside `bibtex_dir`
    pub fn local_file_path(&self, bibtex_dir: impl AsRef<Path>) -> PathBuf {
        bibtex_dir
            .as_ref()
            .join(RecordKind::Bibtex.file_name(&self.doi))
    }

    /// Write the entry to its cache path, replacing any existing file
    pub fn save(&self, bibtex_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let bibtex_dir = bibtex_dir.as_ref();
        std::fs::create_dir_all(bibtex_dir)?;
        let path = self.local_file_path(bibtex_dir);
        std::fs::write(&path, format!("{}\n", format_entry(&self.content)))?;
        Ok(path)
    }

    /// Authors split into given name and surname
    ///
    /// Returns an empty list when the entry has no author field.
    pub fn author_dicts(&self, initials: bool) -> Vec<AuthorName> {
        self.content
            .author()
            .map(|field| parse_authors(field, initials))
            .unwrap_or_default()
    }

    /// HTML reference line; fields missing from the entry are omitted
    pub fn html(&self) -> String {
        html::render(&self.content, &self.author_dicts(true), &self.doi)
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Citation doi:{}", self.doi)
    }
}

/// File name of the cached `.bib` for a DOI
pub fn bibtex_file_name(doi: &str) -> String {
    RecordKind::Bibtex.file_name(doi)
}

fn parse_content(text: &str) -> Result<BibTeXEntry> {
    let entry = parse_entry(text)?;
    Ok(decode_entry(&entry))
}
