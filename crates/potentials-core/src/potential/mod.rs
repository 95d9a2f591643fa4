//! Interatomic-potential metadata records
//!
//! A [`Potential`] describes one interatomic potential: the elements it
//! models, the DOIs of the papers that published it and a few naming
//! options. Its human-readable id is derived from the first citation and
//! the element data every time it is requested.

mod id;
pub mod model;

pub use id::sanitize as sanitize_id;
pub use model::PotentialModel;

use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::citation::Citation;
use crate::error::{PotentialsError, Result};
use crate::lookup::{LookupChain, RecordKind};
use id::{potential_id, IdParts};

/// Metadata for one interatomic potential
#[derive(Debug, Clone)]
pub struct Potential {
    key: String,
    date: NaiveDate,
    dois: Option<Vec<String>>,
    citations: Vec<Citation>,
    elements: Vec<String>,
    fictional: bool,
    othername: Option<String>,
    modelname: Option<String>,
    notes: Option<String>,
}

impl Potential {
    /// Start a new record, or a load when [`PotentialBuilder::model`] is set
    pub fn builder() -> PotentialBuilder {
        PotentialBuilder::default()
    }

    /// Load a stored record
    pub fn from_model(model: impl Into<PotentialModel>, lookup: &LookupChain) -> Result<Self> {
        let mut potential = Self::empty();
        potential.read_model(model.into(), lookup)?;
        Ok(potential)
    }

    /// Find a stored record by key in the local cache, then on the mirror
    pub fn fetch(key: &str, lookup: &LookupChain) -> Result<Self> {
        let resolved = lookup
            .resolve_potential(key)
            .map_err(|_| PotentialsError::NotFound(format!("no potential with key {} found", key)))?;
        Self::from_model(PotentialModel::Json(resolved.text), lookup)
    }

    fn empty() -> Self {
        Self {
            key: new_key(),
            date: today(),
            dois: None,
            citations: Vec::new(),
            elements: Vec::new(),
            fictional: false,
            othername: None,
            modelname: None,
            notes: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replace the key; `None` generates a fresh one
    pub fn set_key(&mut self, key: Option<String>) {
        self.key = key.unwrap_or_else(new_key);
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Replace the date; `None` means today
    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date.unwrap_or_else(today);
    }

    /// Set the date from an ISO `YYYY-MM-DD` string
    pub fn set_date_str(&mut self, date: &str) -> Result<()> {
        self.date = parse_date(date)?;
        Ok(())
    }

    pub fn dois(&self) -> Option<&[String]> {
        self.dois.as_deref()
    }

    /// Replace the DOI list and fetch one citation per DOI
    ///
    /// This performs lookups for every DOI. An empty list is stored as no
    /// DOIs. On error the previous DOIs and citations are kept.
    pub fn set_dois(&mut self, dois: Option<Vec<String>>, lookup: &LookupChain) -> Result<()> {
        let dois = dois.filter(|dois| !dois.is_empty());
        let citations = match &dois {
            Some(dois) => dois
                .iter()
                .map(|doi| Citation::fetch(doi, lookup))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        self.dois = dois;
        self.citations = citations;
        Ok(())
    }

    /// Citations in DOI order
    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn set_elements(&mut self, elements: Vec<String>) {
        self.elements = elements;
    }

    pub fn fictional(&self) -> bool {
        self.fictional
    }

    pub fn set_fictional(&mut self, fictional: bool) {
        self.fictional = fictional;
    }

    pub fn othername(&self) -> Option<&str> {
        self.othername.as_deref()
    }

    pub fn set_othername(&mut self, othername: Option<String>) {
        self.othername = othername;
    }

    pub fn modelname(&self) -> Option<&str> {
        self.modelname.as_deref()
    }

    pub fn set_modelname(&mut self, modelname: Option<String>) {
        self.modelname = modelname;
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    /// Human-readable id derived from the first citation and element data
    ///
    /// Recomputed on every call. `None` when there is no citation, or the
    /// first citation has no year or authors.
    pub fn id(&self) -> Option<String> {
        let citation = self.citations.first()?;
        potential_id(IdParts {
            citation,
            fictional: self.fictional,
            othername: self.othername.as_deref(),
            elements: &self.elements,
            modelname: self.modelname.as_deref(),
        })
    }

    /// Project the current state onto the stored record layout
    pub fn build_model(&self) -> Value {
        let mut potential = Map::new();
        potential.insert(model::KEY.to_string(), json!(self.key));
        potential.insert(model::ID.to_string(), json!(self.id()));
        potential.insert(
            model::RECORD_VERSION.to_string(),
            json!(self.date.format("%Y-%m-%d").to_string()),
        );

        let mut description = Map::new();
        for doi in self.dois.iter().flatten() {
            let citation = model::single(model::DOI, json!(doi));
            model::append(&mut description, model::CITATION, citation);
        }
        if let Some(notes) = &self.notes {
            let notes = model::single(model::TEXT, json!(notes));
            description.insert(model::NOTES.to_string(), notes);
        }
        potential.insert(model::DESCRIPTION.to_string(), Value::Object(description));

        let element_key = if self.fictional {
            model::FICTIONAL_ELEMENT
        } else {
            model::ELEMENT
        };
        for element in &self.elements {
            model::append(&mut potential, element_key, json!(element));
        }
        if let Some(othername) = &self.othername {
            potential.insert(model::OTHER_ELEMENT.to_string(), json!(othername));
        }

        model::single(model::ROOT, Value::Object(potential))
    }

    /// Replace the state with a stored record
    ///
    /// Citations are fetched for the stored DOIs. When the computed id
    /// differs from the stored one, the last hyphen-separated token of the
    /// stored id is taken as the model name; if the ids still differ the
    /// record cannot be reproduced and loading fails.
    ///
    /// On error `self` is left unchanged.
    pub fn load(&mut self, model: PotentialModel, lookup: &LookupChain) -> Result<()> {
        let mut loaded = Self::empty();
        loaded.read_model(model, lookup)?;
        *self = loaded;
        Ok(())
    }

    fn read_model(&mut self, model: PotentialModel, lookup: &LookupChain) -> Result<()> {
        let value = model.into_value()?;
        let root = value
            .as_object()
            .ok_or_else(|| PotentialsError::MissingField(model::ROOT.to_string()))?;
        let potential = model::object(root, model::ROOT)?;

        self.key = model::string(potential, model::KEY)?;
        self.set_date_str(&model::string(potential, model::RECORD_VERSION)?)?;

        let description = model::object(potential, model::DESCRIPTION)?;
        let dois = model::as_list(description, model::CITATION)
            .into_iter()
            .map(|citation| {
                citation
                    .as_object()
                    .and_then(|c| c.get(model::DOI))
                    .and_then(model::scalar_to_string)
                    .ok_or_else(|| PotentialsError::MissingField(model::DOI.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.set_dois(Some(dois), lookup)?;

        self.notes = match description.get(model::NOTES) {
            Some(notes) => notes
                .as_object()
                .and_then(|n| n.get(model::TEXT))
                .and_then(model::scalar_to_string),
            None => None,
        };

        let fictional_elements = model::strings(potential, model::FICTIONAL_ELEMENT)?;
        let elements = model::strings(potential, model::ELEMENT)?;
        let other_elements = model::strings(potential, model::OTHER_ELEMENT)?;

        if !fictional_elements.is_empty() {
            if !elements.is_empty() {
                return Err(PotentialsError::Validation(
                    "element and fictional-element cannot both be given".to_string(),
                ));
            }
            self.fictional = true;
            self.elements = fictional_elements;
        } else {
            if elements.is_empty() {
                return Err(PotentialsError::Validation(
                    "no element or fictional-element given".to_string(),
                ));
            }
            self.fictional = false;
            self.elements = elements;
        }

        self.othername = match other_elements.len() {
            0 => None,
            1 => other_elements.into_iter().next(),
            n => {
                return Err(PotentialsError::Validation(format!(
                    "only one other-element allowed, found {}",
                    n
                )))
            }
        };

        let stored_id = potential.get(model::ID).and_then(model::scalar_to_string);
        self.modelname = None;
        if self.id() != stored_id {
            if let Some(stored) = &stored_id {
                self.modelname = stored.rsplit('-').next().map(str::to_string);
            }
            if self.id() != stored_id {
                return Err(PotentialsError::IdMismatch {
                    computed: self.id().unwrap_or_else(|| "None".to_string()),
                    stored: stored_id.unwrap_or_else(|| "None".to_string()),
                });
            }
        }

        Ok(())
    }

    /// Cache path of this record inside `potential_dir`
    pub fn local_file_path(&self, potential_dir: impl AsRef<Path>) -> PathBuf {
        potential_dir
            .as_ref()
            .join(RecordKind::Potential.file_name(&self.key))
    }

    /// Write the record as 4-space indented JSON to its cache path
    pub fn save(&self, potential_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let potential_dir = potential_dir.as_ref();
        std::fs::create_dir_all(potential_dir)?;
        let path = self.local_file_path(potential_dir);
        std::fs::write(&path, to_indented_json(&self.build_model())?)?;
        Ok(path)
    }
}

impl fmt::Display for Potential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "Potential {}", id),
            None => write!(f, "Potential {}", self.key),
        }
    }
}

/// Field-by-field construction of a [`Potential`]
///
/// Setting [`model`](PotentialBuilder::model) loads a stored record instead;
/// it cannot be combined with any other field.
#[derive(Debug, Clone, Default)]
pub struct PotentialBuilder {
    model: Option<PotentialModel>,
    dois: Option<Vec<String>>,
    elements: Option<Vec<String>>,
    key: Option<String>,
    othername: Option<String>,
    fictional: bool,
    modelname: Option<String>,
    notes: Option<String>,
    date: Option<NaiveDate>,
    record_version: Option<String>,
}

impl PotentialBuilder {
    pub fn model(mut self, model: impl Into<PotentialModel>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn dois<I, S>(mut self, dois: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dois = Some(dois.into_iter().map(Into::into).collect());
        self
    }

    pub fn elements<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements = Some(elements.into_iter().map(Into::into).collect());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn othername(mut self, othername: impl Into<String>) -> Self {
        self.othername = Some(othername.into());
        self
    }

    pub fn fictional(mut self, fictional: bool) -> Self {
        self.fictional = fictional;
        self
    }

    pub fn modelname(mut self, modelname: impl Into<String>) -> Self {
        self.modelname = Some(modelname.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Date as an ISO `YYYY-MM-DD` string, checked by [`build`](Self::build)
    pub fn record_version(mut self, date: impl Into<String>) -> Self {
        self.record_version = Some(date.into());
        self
    }

    fn has_fields(&self) -> bool {
        self.dois.is_some()
            || self.elements.is_some()
            || self.key.is_some()
            || self.othername.is_some()
            || self.fictional
            || self.modelname.is_some()
            || self.notes.is_some()
            || self.date.is_some()
            || self.record_version.is_some()
    }

    pub fn build(self, lookup: &LookupChain) -> Result<Potential> {
        if self.model.is_some() && self.has_fields() {
            return Err(PotentialsError::ConstructionConflict);
        }
        if let Some(model) = self.model {
            return Potential::from_model(model, lookup);
        }

        let elements = self.elements.unwrap_or_default();
        if elements.is_empty() {
            return Err(PotentialsError::Validation(
                "at least one element is required".to_string(),
            ));
        }

        let date = match (self.date, self.record_version) {
            (Some(date), _) => date,
            (None, Some(text)) => parse_date(&text)?,
            (None, None) => today(),
        };

        let mut potential = Potential {
            key: self.key.unwrap_or_else(new_key),
            date,
            dois: None,
            citations: Vec::new(),
            elements,
            fictional: self.fictional,
            othername: self.othername,
            modelname: self.modelname,
            notes: self.notes,
        };
        potential.set_dois(self.dois, lookup)?;
        Ok(potential)
    }
}

fn new_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| PotentialsError::InvalidDate(text.to_string()))
}

fn to_indented_json(value: &Value) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    serde::Serialize::serialize(value, &mut serializer)?;
    Ok(buffer)
}
