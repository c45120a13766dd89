//! Surface-form canonicalisation used before two words are compared.
//!
//! Two steps, applied in this order by the similarity scorer:
//! - [`normalize`] folds typographic quotation marks to their straight ASCII
//!   forms so that `“Tirana”` and `"Tirana"` compare equal.
//! - [`strip_edges`] drops leading and trailing non-word characters. It is a
//!   comparison aid only; output records always carry the original word.

use once_cell::sync::Lazy;
use regex::Regex;

static EDGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\W+|\W+$").expect("compile edge pattern"));

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("compile whitespace pattern"));

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Replace every left/right double and single quotation mark variant with
/// `"` and `'` respectively. All other characters pass through unchanged.
pub fn normalize(word: &str) -> String {
    word.chars().map(fold_quote).collect()
}

/// Remove any run of non-word characters from both ends of `text`.
///
/// A string made only of punctuation strips to the empty string.
pub fn strip_edges(text: &str) -> String {
    EDGE_RE.replace_all(text, "").into_owned()
}

/// Join trimmed words with single spaces and collapse any remaining
/// whitespace runs. Used to build the candidate string for a span of tokens.
pub fn join_words<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = words
        .into_iter()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");
    WHITESPACE_RE.replace_all(&joined, " ").trim().to_string()
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn fold_quote(ch: char) -> char {
    match ch {
        '\u{201C}' // left double quotation mark
        | '\u{201D}' // right double quotation mark
        | '\u{201E}' // double low-9 quotation mark
        | '\u{201F}' // double high-reversed-9 quotation mark
            => '"',
        '\u{2018}' // left single quotation mark
        | '\u{2019}' // right single quotation mark
        | '\u{201A}' // single low-9 quotation mark
        | '\u{201B}' // single high-reversed-9 quotation mark
            => '\'',
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
