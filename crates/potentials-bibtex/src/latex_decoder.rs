//! LaTeX character decoding
//!
//! Converts the LaTeX escapes found in CrossRef and hand-written BibTeX into
//! Unicode so author names and titles can be compared and rendered directly.

use lazy_static::lazy_static;
use regex::Regex;

use crate::entry::BibTeXEntry;

/// Decode LaTeX accents, symbols and formatting commands to Unicode
pub fn decode_latex(input: &str) -> String {
    let mut result = input.to_string();

    for (pattern, replacement) in ALL_PATTERNS.iter() {
        if result.contains(pattern) {
            result = result.replace(pattern, replacement);
        }
    }

    result = remove_tex_commands(&result);
    clean_braces(&result)
}

/// Return a copy of `entry` with every field value decoded
///
/// The cite key, entry type and raw source text are left untouched, as are
/// `doi` and `url` values, which are identifiers rather than prose.
pub fn decode_entry(entry: &BibTeXEntry) -> BibTeXEntry {
    let mut decoded = BibTeXEntry::new(entry.cite_key.clone(), entry.entry_type.clone());
    decoded.raw_bibtex = entry.raw_bibtex.clone();
    for field in &entry.fields {
        let value = if is_identifier_field(&field.key) {
            field.value.clone()
        } else {
            decode_latex(&field.value)
        };
        decoded.add_field(field.key.clone(), value);
    }
    decoded
}

fn is_identifier_field(key: &str) -> bool {
    key.eq_ignore_ascii_case("doi") || key.eq_ignore_ascii_case("url")
}

lazy_static! {
    static ref ACCENT_PATTERNS: Vec<(&'static str, &'static str)> = vec![
        // Umlaut
        ("\\\"a", "ä"), ("\\\"A", "Ä"),
        ("\\\"e", "ë"), ("\\\"E", "Ë"),
        ("\\\"i", "ï"), ("\\\"I", "Ï"),
        ("\\\"o", "ö"), ("\\\"O", "Ö"),
        ("\\\"u", "ü"), ("\\\"U", "Ü"),
        ("\\\"{a}", "ä"), ("\\\"{A}", "Ä"),
        ("\\\"{e}", "ë"), ("\\\"{E}", "Ë"),
        ("\\\"{i}", "ï"), ("\\\"{I}", "Ï"),
        ("\\\"{o}", "ö"), ("\\\"{O}", "Ö"),
        ("\\\"{u}", "ü"), ("\\\"{U}", "Ü"),

        // Acute
        ("\\'a", "á"), ("\\'A", "Á"),
        ("\\'e", "é"), ("\\'E", "É"),
        ("\\'i", "í"), ("\\'I", "Í"),
        ("\\'o", "ó"), ("\\'O", "Ó"),
        ("\\'u", "ú"), ("\\'U", "Ú"),
        ("\\'y", "ý"),
        ("\\'c", "ć"), ("\\'n", "ń"), ("\\'s", "ś"),
        ("\\'{a}", "á"), ("\\'{A}", "Á"),
        ("\\'{e}", "é"), ("\\'{E}", "É"),
        ("\\'{i}", "í"), ("\\'{I}", "Í"),
        ("\\'{\\i}", "í"),
        ("\\'{o}", "ó"), ("\\'{O}", "Ó"),
        ("\\'{u}", "ú"), ("\\'{U}", "Ú"),
        ("\\'{y}", "ý"),
        ("\\'{c}", "ć"), ("\\'{n}", "ń"), ("\\'{s}", "ś"),

        // Grave
        ("\\`a", "à"), ("\\`A", "À"),
        ("\\`e", "è"), ("\\`E", "È"),
        ("\\`o", "ò"), ("\\`u", "ù"),
        ("\\`{a}", "à"), ("\\`{e}", "è"),
        ("\\`{o}", "ò"), ("\\`{u}", "ù"),

        // Circumflex
        ("\\^a", "â"), ("\\^e", "ê"), ("\\^i", "î"),
        ("\\^o", "ô"), ("\\^u", "û"),
        ("\\^{a}", "â"), ("\\^{e}", "ê"), ("\\^{\\i}", "î"),
        ("\\^{o}", "ô"), ("\\^{u}", "û"),

        // Tilde
        ("\\~a", "ã"), ("\\~n", "ñ"), ("\\~N", "Ñ"), ("\\~o", "õ"),
        ("\\~{a}", "ã"), ("\\~{n}", "ñ"), ("\\~{N}", "Ñ"), ("\\~{o}", "õ"),

        // Cedilla
        ("\\c c", "ç"), ("\\c C", "Ç"),
        ("\\c{c}", "ç"), ("\\c{C}", "Ç"),
        ("\\c s", "ş"), ("\\c{s}", "ş"), ("\\c{S}", "Ş"),

        // Ring
        ("\\r a", "å"), ("\\r{a}", "å"), ("\\r{A}", "Å"),
        ("\\aa", "å"), ("\\AA", "Å"),

        // Caron
        ("\\v c", "č"), ("\\v C", "Č"),
        ("\\v s", "š"), ("\\v S", "Š"),
        ("\\v z", "ž"), ("\\v Z", "Ž"),
        ("\\v{c}", "č"), ("\\v{C}", "Č"),
        ("\\v{e}", "ě"), ("\\v{r}", "ř"),
        ("\\v{s}", "š"), ("\\v{S}", "Š"),
        ("\\v{z}", "ž"), ("\\v{Z}", "Ž"),

        // Breve
        ("\\u g", "ğ"), ("\\u{g}", "ğ"),
        ("\\u a", "ă"), ("\\u{a}", "ă"),

        // Double acute
        ("\\H{o}", "ő"), ("\\H{u}", "ű"),

        // Dot above
        ("\\.z", "ż"), ("\\.{z}", "ż"), ("\\.{Z}", "Ż"),
        ("\\.I", "İ"), ("\\.{I}", "İ"),

        // Ogonek
        ("\\k a", "ą"), ("\\k e", "ę"),
        ("\\k{a}", "ą"), ("\\k{e}", "ę"),

        // Stroke
        ("\\l", "ł"), ("\\L", "Ł"),
        ("\\o", "ø"), ("\\O", "Ø"),

        // Dotless i
        ("{\\i}", "ı"),
        ("\\i", "ı"),
    ];

    static ref SPECIAL_CHARACTERS: Vec<(&'static str, &'static str)> = vec![
        // Ligatures
        ("{\\ae}", "æ"), ("{\\AE}", "Æ"),
        ("{\\oe}", "œ"), ("{\\OE}", "Œ"),
        ("{\\ss}", "ß"),
        ("\\ae", "æ"), ("\\AE", "Æ"),
        ("\\oe", "œ"), ("\\OE", "Œ"),
        ("\\ss", "ß"),

        // Punctuation
        ("---", "—"),
        ("--", "–"),
        ("``", "\u{201C}"),
        ("''", "\u{201D}"),
        ("~", " "),

        // Escaped symbols
        ("\\&", "&"),
        ("\\%", "%"),
        ("\\$", "$"),
        ("\\#", "#"),
        ("\\_", "_"),
        ("\\{", "{"),
        ("\\}", "}"),
        ("\\textendash", "–"),
        ("\\textemdash", "—"),
        ("\\ldots", "…"),
        ("\\textdegree", "°"),
    ];

    static ref MATH_SYMBOLS: Vec<(&'static str, &'static str)> = vec![
        ("\\alpha", "α"), ("\\beta", "β"), ("\\gamma", "γ"),
        ("\\delta", "δ"), ("\\epsilon", "ε"), ("\\theta", "θ"),
        ("\\lambda", "λ"), ("\\mu", "μ"), ("\\pi", "π"),
        ("\\sigma", "σ"), ("\\tau", "τ"), ("\\phi", "φ"),
        ("\\chi", "χ"), ("\\omega", "ω"),
        ("\\Gamma", "Γ"), ("\\Delta", "Δ"), ("\\Sigma", "Σ"), ("\\Omega", "Ω"),
        ("\\times", "×"), ("\\pm", "±"), ("\\cdot", "·"),
        ("\\leq", "≤"), ("\\geq", "≥"), ("\\approx", "≈"), ("\\sim", "∼"),
        ("\\infty", "∞"), ("\\circ", "∘"),
    ];

    /// Every replacement, longest pattern first so `\leq` wins over `\l`
    /// and `\'{\i}` over `\i`
    static ref ALL_PATTERNS: Vec<(&'static str, &'static str)> = {
        let mut patterns: Vec<(&str, &str)> = Vec::new();
        patterns.extend(ACCENT_PATTERNS.iter().copied());
        patterns.extend(SPECIAL_CHARACTERS.iter().copied());
        patterns.extend(MATH_SYMBOLS.iter().copied());
        patterns.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        patterns
    };

    static ref FORMATTING_COMMAND: Regex =
        Regex::new(r"\\(?:textbf|textit|textrm|texttt|textsc|textsubscript|textsuperscript|emph|mbox|mathrm|mathit|mathbf|text)\{([^{}]*)\}").unwrap();
    static ref GENERIC_COMMAND: Regex = Regex::new(r"\\[a-zA-Z]+\{([^{}]*)\}").unwrap();
    static ref INLINE_MATH: Regex = Regex::new(r"\$([^$]*)\$").unwrap();
    static ref SUBSCRIPT: Regex = Regex::new(r"_\{?([0-9A-Za-z]+)\}?").unwrap();

    static ref EMPTY_BRACES: Regex = Regex::new(r"\{\}").unwrap();
    static ref SINGLE_CHAR_BRACES: Regex = Regex::new(r"\{([^{}])\}").unwrap();
}

fn remove_tex_commands(input: &str) -> String {
    let mut result = FORMATTING_COMMAND.replace_all(input, "$1").to_string();
    result = GENERIC_COMMAND.replace_all(&result, "$1").to_string();
    // Chemical formulas in titles: $_{3}$ -> 3
    INLINE_MATH
        .replace_all(&result, |caps: &regex::Captures| {
            SUBSCRIPT.replace_all(&caps[1], "$1").to_string()
        })
        .to_string()
}

fn clean_braces(input: &str) -> String {
    let result = EMPTY_BRACES.replace_all(input, "");
    SINGLE_CHAR_BRACES.replace_all(&result, "$1").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::BibTeXEntryType;
    use rstest::rstest;

    #[rstest]
    #[case(r#"M\"uller"#, "Müller")]
    #[case(r#"M{\"u}ller"#, "Müller")]
    #[case(r#"M\"{u}ller"#, "Müller")]
    #[case(r#"Ko\c{c}er"#, "Koçer")]
    #[case(r#"Ba\u{g}c{\i}"#, "Bağcı")]
    #[case(r#"{\v{C}}ern\'y"#, "Černý")]
    #[case(r#"J{\o}rgensen"#, "Jørgensen")]
    #[case(r#"Garc\'{\i}a"#, "García")]
    fn test_author_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decode_latex(input), expected);
    }

    #[rstest]
    #[case("224106--224122", "224106–224122")]
    #[case(r#"Smith \& Jones"#, "Smith & Jones")]
    #[case(r#"Sets \} and \{"#, "Sets } and {")]
    #[case(r#"\textit{Ab initio} study"#, "Ab initio study")]
    #[case(r#"Ni$_{3}$Al alloys"#, "Ni3Al alloys")]
    #[case(r#"$\alpha$-Fe"#, "α-Fe")]
    fn test_escapes_formatting_and_math(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decode_latex(input), expected);
    }

    #[test]
    fn test_brace_cleaning() {
        assert_eq!(decode_latex("{EAM}"), "{EAM}");
        assert_eq!(decode_latex("{a}"), "a");
        assert_eq!(decode_latex("test{}"), "test");
    }

    #[test]
    fn test_decode_entry_keeps_keys() {
        let mut entry = BibTeXEntry::new("K".to_string(), BibTeXEntryType::Article);
        entry.add_field("Author", r#"Ko\c{c}er, C."#);
        entry.add_field("year", "2020");
        entry.add_field("DOI", "10.1000/a--b_c");

        let decoded = decode_entry(&entry);
        assert_eq!(decoded.cite_key, "K");
        assert_eq!(decoded.fields[0].key, "Author");
        assert_eq!(decoded.author(), Some("Koçer, C."));
        assert_eq!(decoded.year(), Some("2020"));
        assert_eq!(decoded.doi(), Some("10.1000/a--b_c"));
    }
}
