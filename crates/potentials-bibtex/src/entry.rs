//! Entry model shared by the parser, decoder and formatter

/// The `@type` of an entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BibTeXEntryType {
    Article,
    Book,
    InBook,
    InCollection,
    InProceedings,
    Misc,
    PhdThesis,
    TechReport,
    Unpublished,
    Dataset,
    Software,
    /// Unrecognized type, stored lowercased so it is written back unchanged
    Other(String),
}

/// Recognized `@` names; the first name listed for a type is the one written
const TYPE_NAMES: &[(&str, BibTeXEntryType)] = &[
    ("article", BibTeXEntryType::Article),
    ("book", BibTeXEntryType::Book),
    ("inbook", BibTeXEntryType::InBook),
    ("incollection", BibTeXEntryType::InCollection),
    ("inproceedings", BibTeXEntryType::InProceedings),
    ("conference", BibTeXEntryType::InProceedings),
    ("misc", BibTeXEntryType::Misc),
    ("phdthesis", BibTeXEntryType::PhdThesis),
    ("techreport", BibTeXEntryType::TechReport),
    ("unpublished", BibTeXEntryType::Unpublished),
    ("dataset", BibTeXEntryType::Dataset),
    ("software", BibTeXEntryType::Software),
];

impl BibTeXEntryType {
    /// Look up a type name, ignoring case
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Self {
        let name = name.to_lowercase();
        TYPE_NAMES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, kind)| kind.clone())
            .unwrap_or(Self::Other(name))
    }

    pub fn as_str(&self) -> &str {
        if let Self::Other(name) = self {
            return name;
        }
        TYPE_NAMES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("misc")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXField {
    pub key: String,
    pub value: String,
}

/// One `@type{key, field = value, ...}` record
///
/// Fields keep their source order. Lookups ignore key case, since CrossRef
/// writes `DOI` and `ISSN` while hand-written entries use `doi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXEntry {
    pub cite_key: String,
    pub entry_type: BibTeXEntryType,
    pub fields: Vec<BibTeXField>,
    /// Source text the entry was parsed from, when known
    pub raw_bibtex: Option<String>,
}

macro_rules! field_accessors {
    ($($name:ident => $field:literal),* $(,)?) => {
        $(
            #[doc = concat!("The `", $field, "` field")]
            pub fn $name(&self) -> Option<&str> {
                self.get_field($field)
            }
        )*
    };
}

impl BibTeXEntry {
    pub fn new(cite_key: impl Into<String>, entry_type: BibTeXEntryType) -> Self {
        Self {
            cite_key: cite_key.into(),
            entry_type,
            fields: Vec::new(),
            raw_bibtex: None,
        }
    }

    /// Append a field; an existing field of the same name is not replaced
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.fields.push(BibTeXField { key, value });
    }

    /// First value stored under `key`, ignoring case
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.key.eq_ignore_ascii_case(key))
            .map(|field| field.value.as_str())
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.fields
            .iter()
            .any(|field| field.key.eq_ignore_ascii_case(key))
    }

    /// `(lowercased key, value)` pairs in source order
    pub fn iter(&self) -> impl Iterator<Item = (String, &str)> {
        self.fields
            .iter()
            .map(|field| (field.key.to_lowercase(), field.value.as_str()))
    }

    field_accessors! {
        title => "title",
        author => "author",
        year => "year",
        doi => "doi",
        journal => "journal",
        volume => "volume",
        number => "number",
        pages => "pages",
        abstract_text => "abstract",
    }
}
