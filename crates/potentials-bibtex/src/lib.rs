//! BibTeX parsing and formatting for citation records
//!
//! This crate provides the BibTeX layer used by the potentials database:
//! - Nom-based parser for the entries served by CrossRef and the GitHub mirror
//! - LaTeX special character decoding to Unicode
//! - Formatting entries back to `.bib` text for the local cache

mod entry;
mod formatter;
mod latex_decoder;
pub mod parser;

pub use entry::{BibTeXEntry, BibTeXEntryType, BibTeXField};
pub use formatter::{format_entries, format_entry};
pub use latex_decoder::{decode_entry, decode_latex};
pub use parser::{parse, parse_entry, BibTeXParseError, BibTeXParseResult, ParseError};
