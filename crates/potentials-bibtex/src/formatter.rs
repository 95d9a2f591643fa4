//! `.bib` writer for the local citation cache
//!
//! Output is one field per line with a four-space indent. Numbers are written
//! bare and every other value is braced, so the parser reads it back
//! unchanged.

use std::borrow::Cow;
use std::fmt::Write;

use super::entry::BibTeXEntry;

pub fn format_entry(entry: &BibTeXEntry) -> String {
    let mut out = format!("@{}{{{},\n", entry.entry_type.as_str(), entry.cite_key);
    for field in &entry.fields {
        let _ = writeln!(out, "    {} = {},", field.key, FieldValue(&field.value));
    }
    out.push('}');
    out
}

/// Entries separated by a blank line
pub fn format_entries(entries: &[BibTeXEntry]) -> String {
    let formatted: Vec<String> = entries.iter().map(format_entry).collect();
    formatted.join("\n\n")
}

struct FieldValue<'a>(&'a str);

impl std::fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bare = !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit());
        if bare {
            f.write_str(self.0)
        } else {
            write!(f, "{{{}}}", escape_unbalanced(self.0))
        }
    }
}

/// Backslash-escape braces without a partner so the braced value stays
/// balanced; already escaped braces are left alone
fn escape_unbalanced(value: &str) -> Cow<'_, str> {
    let chars: Vec<char> = value.chars().collect();
    let mut open = Vec::new();
    let mut unmatched = Vec::new();
    let mut index = 0;
    while index < chars.len() {
        match chars[index] {
            '\\' => index += 1,
            '{' => open.push(index),
            '}' => {
                if open.pop().is_none() {
                    unmatched.push(index);
                }
            }
            _ => {}
        }
        index += 1;
    }
    unmatched.extend(open);
    if unmatched.is_empty() {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + unmatched.len());
    for (index, c) in chars.into_iter().enumerate() {
        if unmatched.contains(&index) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::BibTeXEntryType;
    use crate::parser::parse_entry;

    #[test]
    fn test_format_simple_entry() {
        let mut entry = BibTeXEntry::new("Smith_2020", BibTeXEntryType::Article);
        entry.add_field("author", "Smith, John");
        entry.add_field("title", "A {Cu} potential");
        entry.add_field("year", "2020");
        entry.add_field("note", "");

        let formatted = format_entry(&entry);
        assert!(formatted.starts_with("@article{Smith_2020,\n"));
        assert!(formatted.contains("    author = {Smith, John},\n"));
        assert!(formatted.contains("    title = {A {Cu} potential},\n"));
        assert!(formatted.contains("    year = 2020,\n"));
        assert!(formatted.contains("    note = {},\n"));
        assert!(formatted.ends_with('}'));
    }

    #[test]
    fn test_formatted_entry_parses_back() {
        let mut entry = BibTeXEntry::new("Koçer_2020", BibTeXEntryType::Article);
        entry.add_field("author", "Koçer, C. and Smith, J.");
        entry.add_field("doi", "10.1000/xyz");
        entry.add_field("year", "2020");

        let reparsed = parse_entry(&format_entry(&entry)).unwrap();
        assert_eq!(reparsed.cite_key, entry.cite_key);
        assert_eq!(reparsed.fields, entry.fields);
    }

    #[test]
    fn test_format_entries_separator() {
        let a = BibTeXEntry::new("A", BibTeXEntryType::Misc);
        let b = BibTeXEntry::new("B", BibTeXEntryType::Misc);
        let text = format_entries(&[a, b]);
        assert_eq!(text, "@misc{A,\n}\n\n@misc{B,\n}");
    }

    #[test]
    fn test_unbalanced_braces_are_escaped() {
        assert_eq!(escape_unbalanced("A {Cu} potential"), "A {Cu} potential");
        assert_eq!(escape_unbalanced("Sets } and { braces"), "Sets \\} and \\{ braces");
        assert_eq!(escape_unbalanced("open {{Cu}"), "open \\{{Cu}");
        assert_eq!(escape_unbalanced("kept \\} as is"), "kept \\} as is");
    }

    #[test]
    fn test_unbalanced_braces_parse_back() {
        let mut entry = BibTeXEntry::new("a", BibTeXEntryType::Article);
        entry.add_field("title", "Sets } and { braces");
        entry.add_field("year", "2020");

        let reparsed = parse_entry(&format_entry(&entry)).unwrap();
        assert_eq!(reparsed.title(), Some("Sets \\} and \\{ braces"));
        assert_eq!(reparsed.year(), Some("2020"));
    }
}
