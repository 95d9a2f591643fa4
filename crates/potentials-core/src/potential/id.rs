//! Potential id derivation
//!
//! Ids read `{year}--{Surname}-{I-N}...--{elements}` and are rebuilt from the
//! current record state on every request.

use crate::citation::Citation;

/// Above this many authors only the first three are named, then `et-al`
const MAX_NAMED_AUTHORS: usize = 4;
const TRUNCATED_AUTHORS: usize = 3;

/// Characters rewritten so ids stay ASCII and hyphen-delimited
const REPLACEMENTS: [(char, &str); 12] = [
    ('\'', ""),
    ('á', "a"),
    ('ä', "a"),
    ('ö', "o"),
    ('ø', "o"),
    (' ', "-"),
    ('č', "c"),
    ('ğ', "g"),
    ('ü', "u"),
    ('é', "e"),
    ('Ç', "C"),
    ('ı', "i"),
];

/// Record state that the id is computed from
pub(crate) struct IdParts<'a> {
    pub citation: &'a Citation,
    pub fictional: bool,
    pub othername: Option<&'a str>,
    pub elements: &'a [String],
    pub modelname: Option<&'a str>,
}

/// Assemble the id, or `None` when the citation lacks a year or authors
pub(crate) fn potential_id(parts: IdParts<'_>) -> Option<String> {
    let year = parts.citation.get("year")?;
    let authors = parts.citation.author_dicts(true);
    if authors.is_empty() {
        return None;
    }

    let mut id = format!("{}-", year);

    let named = if authors.len() <= MAX_NAMED_AUTHORS {
        &authors[..]
    } else {
        &authors[..TRUNCATED_AUTHORS]
    };
    for author in named {
        id.push('-');
        id.push_str(&author.surname);
        id.push('-');
        id.push_str(&author.id_initials());
    }
    if authors.len() > MAX_NAMED_AUTHORS {
        id.push_str("-et-al");
    }
    id.push('-');

    if parts.fictional {
        id.push_str("-fictional");
    }

    match parts.othername {
        Some(othername) => {
            id.push('-');
            id.push_str(othername);
        }
        None => {
            for element in parts.elements {
                id.push('-');
                id.push_str(element);
            }
        }
    }

    if let Some(modelname) = parts.modelname {
        id.push('-');
        id.push_str(modelname);
    }

    Some(sanitize(&id))
}

/// Apply the fixed character substitutions
pub fn sanitize(id: &str) -> String {
    let mut result = String::with_capacity(id.len());
    for c in id.chars() {
        match REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => result.push_str(to),
            None => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation(author: &str, year: &str) -> Citation {
        Citation::from_bibtex(&format!(
            "@article{{k, author = {{{}}}, year = {{{}}}, doi = {{10.1/x}}}}",
            author, year
        ))
        .unwrap()
    }

    fn id_for(citation: &Citation, elements: &[&str]) -> Option<String> {
        let elements: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
        potential_id(IdParts {
            citation,
            fictional: false,
            othername: None,
            elements: &elements,
            modelname: None,
        })
    }

    #[test]
    fn test_single_author() {
        let c = citation("Smith, John", "2020");
        assert_eq!(id_for(&c, &["Cu"]).as_deref(), Some("2020--Smith-J--Cu"));
    }

    #[test]
    fn test_four_authors_are_all_named() {
        let c = citation("A. Aa and B. Bb and C. Cc and D. Dd", "1999");
        assert_eq!(
            id_for(&c, &["Ni", "Al"]).as_deref(),
            Some("1999--Aa-A-Bb-B-Cc-C-Dd-D--Ni-Al")
        );
    }

    #[test]
    fn test_five_authors_truncate() {
        let c = citation("A. Aa and B. Bb and C. Cc and D. Dd and E. Ee", "1999");
        assert_eq!(
            id_for(&c, &["Fe"]).as_deref(),
            Some("1999--Aa-A-Bb-B-Cc-C-et-al--Fe")
        );
    }

    #[test]
    fn test_fictional_othername_modelname() {
        let c = citation("Jean-Paul Sartre", "1943");
        let elements = vec!["X".to_string()];
        let id = potential_id(IdParts {
            citation: &c,
            fictional: true,
            othername: Some("Existential Alloy"),
            elements: &elements,
            modelname: Some("v2"),
        });
        assert_eq!(
            id.as_deref(),
            Some("1943--Sartre-J-P--fictional-Existential-Alloy-v2")
        );
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Koçer"), "Koçer");
        assert_eq!(sanitize("Çağın O'Brien"), "Cagin-OBrien");
        assert_eq!(sanitize("Jørgensen-Müller-Erdős"), "Jorgensen-Muller-Erdős");
    }

    #[test]
    fn test_missing_year_or_author() {
        let no_year = Citation::from_bibtex("@article{k, author = {A. B}, doi = {10.1/x}}").unwrap();
        assert_eq!(id_for(&no_year, &["Cu"]), None);

        let no_author = Citation::from_bibtex("@article{k, year = 2000, doi = {10.1/x}}").unwrap();
        assert_eq!(id_for(&no_author, &["Cu"]), None);
    }
}
