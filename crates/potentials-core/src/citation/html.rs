//! HTML rendering of a citation

use potentials_bibtex::BibTeXEntry;

use super::author::AuthorName;

/// Render `Given Surname, Given Surname and Given Surname (Year), "Title",
/// <i>Journal</i>, <b>Volume(Number)</b>, Pages. DOI: <a ...>doi</a>`
/// followed by the abstract when present
pub(crate) fn render(entry: &BibTeXEntry, authors: &[AuthorName], doi: &str) -> String {
    let mut html = String::new();

    let count = authors.len();
    for (i, author) in authors.iter().enumerate() {
        html.push_str(&author.givenname);
        html.push(' ');
        html.push_str(&author.surname);
        if count >= 3 && i < count - 2 {
            html.push(',');
        }
        if count >= 2 && i == count - 2 {
            html.push_str(" and");
        }
        html.push(' ');
    }

    if let Some(year) = entry.year() {
        html.push_str(&format!("({}), ", year));
    }
    if let Some(title) = entry.title() {
        html.push_str(&format!("\"{}\", ", title));
    }
    if let Some(journal) = entry.journal() {
        html.push_str(&format!("<i>{}</i>, ", journal));
    }
    if let Some(volume) = entry.volume() {
        let number = entry
            .number()
            .map(|number| format!("({})", number))
            .unwrap_or_default();
        html.push_str(&format!("<b>{}{}</b>, ", volume, number));
    }
    if let Some(pages) = entry.pages() {
        html.push_str(&format!("{} ", pages));
    }

    // No dangling separator when the last fragment was not pages
    let mut html = html.trim().trim_end_matches(',').to_string();
    html.push_str(". ");
    html.push_str(&format!(
        "DOI: <a href=\"https://doi.org/{doi}\">{doi}</a>",
        doi = doi
    ));

    if let Some(abstract_text) = entry.abstract_text() {
        html.push_str(&format!("<br/><b>Abstract:</b> {}", abstract_text));
    }

    html
}
