//! nom parser for the BibTeX served by DOI content negotiation and stored in
//! the potentials data repository
//!
//! Supported:
//! - @string definitions (the standard month macros are predefined)
//! - @preamble declarations
//! - @comment sections
//! - Braced, quoted and bare numeric field values
//! - String concatenation with #
//! - Nested braces in field values

use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while1},
    character::complete::{alphanumeric1, char, digit1, multispace0},
    combinator::{map, opt},
    error::{Error, ErrorKind},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};
use std::collections::HashMap;

use super::entry::{BibTeXEntry, BibTeXEntryType};

const MONTHS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// A block that was skipped while scanning a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXParseError {
    pub line: u32,
    pub message: String,
}

/// Everything found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXParseResult {
    pub entries: Vec<BibTeXEntry>,
    pub preambles: Vec<String>,
    pub strings: HashMap<String, String>,
    pub errors: Vec<BibTeXParseError>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no BibTeX entries found")]
    NoEntries,
    #[error("malformed BibTeX at line {line}: {message}")]
    Malformed { line: u32, message: String },
}

/// Parse a BibTeX document
///
/// Blocks that fail to parse are recorded in `errors` and skipped, so a
/// single bad record does not hide the rest of the file.
pub fn parse(input: &str) -> Result<BibTeXParseResult, ParseError> {
    let mut result = BibTeXParseResult {
        entries: Vec::new(),
        preambles: Vec::new(),
        strings: MONTHS
            .iter()
            .map(|(name, month)| (name.to_string(), month.to_string()))
            .collect(),
        errors: Vec::new(),
    };
    let mut scanner = Scanner {
        rest: input,
        line: 1,
    };

    loop {
        scanner.skip_trivia();
        // Text outside @ blocks is ignored
        match scanner.rest.find('@') {
            None => break,
            Some(0) => {}
            Some(offset) => {
                scanner.advance(offset);
                continue;
            }
        }

        let current = scanner.rest;
        match block(current, &result.strings) {
            Ok((rest, parsed)) => {
                let used = current.len() - rest.len();
                match parsed {
                    Block::Entry(mut entry) => {
                        entry.raw_bibtex = Some(current[..used].trim().to_string());
                        result.entries.push(entry);
                    }
                    Block::Macro(name, value) => {
                        result.strings.insert(name.to_lowercase(), value);
                    }
                    Block::Preamble(text) => result.preambles.push(text),
                    Block::Comment => {}
                }
                scanner.advance(used);
            }
            Err(_) => {
                result.errors.push(BibTeXParseError {
                    line: scanner.line,
                    message: format!("unparseable block starting {:?}", head(current)),
                });
                scanner.advance(1);
            }
        }
    }

    Ok(result)
}

/// Parse the first BibTeX entry of a document
///
/// Fails with [`ParseError::Malformed`] when the document has no usable
/// entry but did contain unparseable `@` blocks, and with
/// [`ParseError::NoEntries`] when there was nothing to parse at all.
pub fn parse_entry(input: &str) -> Result<BibTeXEntry, ParseError> {
    let result = parse(input)?;
    if let Some(entry) = result.entries.into_iter().next() {
        return Ok(entry);
    }
    match result.errors.into_iter().next() {
        Some(BibTeXParseError { line, message }) => Err(ParseError::Malformed { line, message }),
        None => Err(ParseError::NoEntries),
    }
}

type Macros = HashMap<String, String>;

/// Position in the document with its line number
struct Scanner<'a> {
    rest: &'a str,
    line: u32,
}

impl<'a> Scanner<'a> {
    fn advance(&mut self, bytes: usize) {
        self.line += self.rest[..bytes].matches('\n').count() as u32;
        self.rest = &self.rest[bytes..];
    }

    /// Skip whitespace and `%` line comments
    fn skip_trivia(&mut self) {
        loop {
            let trimmed = self.rest.trim_start();
            self.advance(self.rest.len() - trimmed.len());
            if !self.rest.starts_with('%') {
                return;
            }
            let end = self.rest.find('\n').unwrap_or(self.rest.len());
            self.advance(end);
        }
    }
}

fn head(text: &str) -> &str {
    let end = text
        .char_indices()
        .nth(24)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    text[..end].lines().next().unwrap_or("")
}

enum Block {
    Entry(BibTeXEntry),
    Macro(String, String),
    Preamble(String),
    Comment,
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// `{ inner }` with optional whitespace inside the braces
fn braced_body<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(ws(char('{')), inner, preceded(multispace0, char('}')))
}

fn mismatch<T>(input: &str) -> IResult<&str, T> {
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

fn is_cite_key_char(c: char) -> bool {
    !c.is_whitespace() && !",{}\"=#".contains(c)
}

fn is_field_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-:.".contains(c)
}

fn is_macro_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// One `@kind{...}` block
fn block<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, Block> {
    let (rest, kind) = preceded(char('@'), ws(alphanumeric1))(input)?;
    match kind.to_ascii_lowercase().as_str() {
        "comment" => map(comment_body, |_| Block::Comment)(rest),
        "string" => map(braced_body(|i| field(i, macros)), |(name, value)| {
            Block::Macro(name, value)
        })(rest),
        "preamble" => map(braced_body(|i| value(i, macros)), Block::Preamble)(rest),
        _ => map(braced_body(|i| entry_body(i, kind, macros)), Block::Entry)(rest),
    }
}

/// A braced @comment body, or the rest of the line
fn comment_body(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, alt((balanced_braces, take_till(|c| c == '\n'))))(input)
}

fn entry_body<'a>(input: &'a str, kind: &str, macros: &Macros) -> IResult<&'a str, BibTeXEntry> {
    let (rest, cite_key) = terminated(take_while1(is_cite_key_char), ws(char(',')))(input)?;
    let (rest, fields) = terminated(
        separated_list0(ws(char(',')), |i| field(i, macros)),
        opt(ws(char(','))),
    )(rest)?;

    let mut entry = BibTeXEntry::new(cite_key, BibTeXEntryType::from_str(kind));
    for (name, value) in fields {
        entry.add_field(name, value);
    }
    Ok((rest, entry))
}

/// `name = value`
fn field<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, (String, String)> {
    map(
        separated_pair(ws(take_while1(is_field_name_char)), char('='), |i| {
            value(i, macros)
        }),
        |(name, value): (&str, String)| (name.to_string(), value),
    )(input)
}

/// Pieces joined with `#`
fn value<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, String> {
    map(
        separated_list1(ws(char('#')), ws(|i| piece(i, macros))),
        |pieces: Vec<String>| pieces.concat(),
    )(input)
}

/// Braced text, quoted text, a bare number or a macro name
fn piece<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, String> {
    alt((
        map(balanced_braces, |text: &str| text[1..text.len() - 1].to_string()),
        quoted,
        map(digit1, |digits: &str| digits.to_string()),
        map(take_while1(is_macro_char), |name: &str| {
            macros
                .get(&name.to_lowercase())
                .cloned()
                .unwrap_or_else(|| name.to_string())
        }),
    ))(input)
}

/// `{...}` including nested braces; returns the text with its outer braces
fn balanced_braces(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return mismatch(input);
    }

    let mut depth = 0usize;
    let mut chars = input.char_indices();
    while let Some((index, c)) = chars.next() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[index + 1..], &input[..index + 1]));
                }
            }
            // \{ and \} do not nest
            '\\' => {
                chars.next();
            }
            _ => {}
        }
    }
    mismatch(input)
}

/// `"..."`; quotes inside braces do not terminate the value
fn quoted(input: &str) -> IResult<&str, String> {
    if !input.starts_with('"') {
        return mismatch(input);
    }

    let mut text = String::new();
    let mut depth = 0usize;
    let mut chars = input.char_indices().skip(1);
    while let Some((index, c)) = chars.next() {
        match c {
            '"' if depth == 0 => return Ok((&input[index + 1..], text)),
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '\\' => {
                text.push(c);
                if let Some((_, escaped)) = chars.next() {
                    text.push(escaped);
                }
                continue;
            }
            _ => {}
        }
        text.push(c);
    }
    mismatch(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crossref_entry() {
        let input = "@article{Mishin_2001, title={Structural stability and lattice defects in copper}, volume={63}, DOI={10.1103/physrevb.63.224106}, number={22}, journal={Physical Review B}, author={Mishin, Y. and Mehl, M. J.}, year={2001}, month=may, pages={224106} }";
        let result = parse(input).unwrap();
        assert_eq!(result.entries.len(), 1);
        assert!(result.errors.is_empty());

        let entry = &result.entries[0];
        assert_eq!(entry.cite_key, "Mishin_2001");
        assert_eq!(entry.entry_type, BibTeXEntryType::Article);
        assert_eq!(entry.doi(), Some("10.1103/physrevb.63.224106"));
        assert_eq!(entry.author(), Some("Mishin, Y. and Mehl, M. J."));
        assert_eq!(entry.get_field("month"), Some("May"));
        assert_eq!(entry.pages(), Some("224106"));
    }

    #[test]
    fn test_parse_quoted_values_keep_unicode() {
        let input = r#"
@article{Test2024,
    author = "Jürgen Müller",
    title = "Testing \"Quotes\"",
}
"#;
        let result = parse(input).unwrap();
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].author(), Some("Jürgen Müller"));
    }

    #[test]
    fn test_parse_nested_braces() {
        let input = "@article{Test, title = {An {EAM} potential for {Al}}}";
        let result = parse(input).unwrap();
        assert_eq!(
            result.entries[0].title(),
            Some("An {EAM} potential for {Al}")
        );
    }

    #[test]
    fn test_parse_string_definitions_and_concatenation() {
        let input = r#"
@string{prb = "Physical Review B"}
@article{Test2024,
    journal = PRB,
    note = "Vol. " # 63,
}
"#;
        let result = parse(input).unwrap();
        assert_eq!(result.entries[0].journal(), Some("Physical Review B"));
        assert_eq!(result.entries[0].get_field("note"), Some("Vol. 63"));
    }

    #[test]
    fn test_parse_skips_comments_and_preambles() {
        let input = r#"
% generated by hand
@comment{ignore me}
@preamble{"\newcommand{\noop}[1]{}"}
@misc{Only, year = 2020}
"#;
        let result = parse(input).unwrap();
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.preambles.len(), 1);
    }

    #[test]
    fn test_parse_entry_without_entries() {
        assert_eq!(parse_entry("just some text"), Err(ParseError::NoEntries));
        assert_eq!(parse_entry(""), Err(ParseError::NoEntries));
    }

    #[test]
    fn test_parse_entry_malformed() {
        let input = "\n\n@article{Broken, title = {never closed";
        match parse_entry(input) {
            Err(ParseError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_recovers_after_bad_entry() {
        let input = r#"
@article{Bad title = {x}}
@article{Good, title = {Fine}}
"#;
        let result = parse(input).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].cite_key, "Good");
    }
}
