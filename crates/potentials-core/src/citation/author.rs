//! Author field parsing
//!
//! BibTeX author fields are split on `" and "`. Each name is then split into
//! given name and surname by the first rule that applies:
//!
//! 1. a comma: split at the last comma, `Surname, Given`
//! 2. a period: split after the last period, `G. R. Surname`
//! 3. otherwise split at the last space, `Given Surname`
//!
//! Given names can be collapsed to initials, where `Jean-Paul` becomes
//! `J.-P.`.

/// One author's name split into given name and surname
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorName {
    pub givenname: String,
    pub surname: String,
}

impl AuthorName {
    /// Initials in id form: `J.-P.` becomes `J-P`, `M. J.` becomes `M-J`
    pub fn id_initials(&self) -> String {
        self.givenname
            .replace('-', "")
            .replace('.', "-")
            .trim_matches('-')
            .to_string()
    }
}

/// Split a raw author field into one name per author
pub fn split_authors(field: &str) -> Vec<String> {
    let normalized = field.split_whitespace().collect::<Vec<_>>().join(" ");
    normalized.split(" and ").map(str::to_string).collect()
}

/// Split one author name into given name and surname
pub fn parse_author(author: &str) -> AuthorName {
    let author = author.trim();

    let (givenname, surname) = if let Some(index) = author.rfind(',') {
        (&author[index + 1..], &author[..index])
    } else if let Some(index) = author.rfind('.') {
        (&author[..index + 1], &author[index + 1..])
    } else if let Some(index) = author.rfind(' ') {
        (&author[..index + 1], &author[index + 1..])
    } else {
        ("", author)
    };

    AuthorName {
        givenname: givenname.trim().to_string(),
        surname: surname.trim().to_string(),
    }
}

/// Collapse a given name to capital initials
///
/// Every uppercase ASCII letter becomes `X.` and hyphens are kept, so
/// compound names keep their separator. Everything else is dropped.
pub fn initials(givenname: &str) -> String {
    let mut result = String::new();
    for c in givenname.chars() {
        if c.is_ascii_uppercase() {
            result.push(c);
            result.push('.');
        } else if c == '-' {
            result.push(c);
        }
    }
    result
}

/// Parse a raw author field, optionally reducing given names to initials
pub fn parse_authors(field: &str, with_initials: bool) -> Vec<AuthorName> {
    split_authors(field)
        .iter()
        .map(|author| {
            let mut name = parse_author(author);
            if with_initials {
                name.givenname = initials(&name.givenname);
            }
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn name(givenname: &str, surname: &str) -> AuthorName {
        AuthorName {
            givenname: givenname.to_string(),
            surname: surname.to_string(),
        }
    }

    #[rstest]
    #[case("Smith, John", "John", "Smith")]
    #[case("Smith, J. R.", "J. R.", "Smith")]
    #[case("van der Berg, Anna", "Anna", "van der Berg")]
    #[case("Smith, Jr., John", "John", "Smith, Jr.")]
    #[case("J. R. Smith", "J. R.", "Smith")]
    #[case("M.J. Mehl", "M.J.", "Mehl")]
    #[case("John Smith", "John", "Smith")]
    #[case("Anna van Berg", "Anna van", "Berg")]
    #[case("Plato", "", "Plato")]
    fn test_parse_author(#[case] input: &str, #[case] given: &str, #[case] surname: &str) {
        assert_eq!(parse_author(input), name(given, surname));
    }

    #[rstest]
    #[case("John", "J.")]
    #[case("Jean-Paul", "J.-P.")]
    #[case("J. R.", "J.R.")]
    #[case("Ümit", "")]
    #[case("", "")]
    fn test_initials(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(initials(input), expected);
    }

    #[test]
    fn test_split_authors_normalizes_whitespace() {
        let field = "Mishin, Y. and\n    Mehl, M. J.  and Voter, A. F.";
        assert_eq!(
            split_authors(field),
            vec!["Mishin, Y.", "Mehl, M. J.", "Voter, A. F."]
        );
    }

    #[test]
    fn test_parse_authors_with_initials() {
        let authors = parse_authors("Jean-Paul Sartre and Mehl, Michael J.", true);
        assert_eq!(authors, vec![name("J.-P.", "Sartre"), name("M.J.", "Mehl")]);

        let authors = parse_authors("Jean-Paul Sartre", false);
        assert_eq!(authors, vec![name("Jean-Paul", "Sartre")]);
    }

    #[rstest]
    #[case("J.-P.", "J-P")]
    #[case("M.J.", "M-J")]
    #[case("Y.", "Y")]
    #[case("", "")]
    fn test_id_initials(#[case] given: &str, #[case] expected: &str) {
        assert_eq!(name(given, "X").id_initials(), expected);
    }
}
