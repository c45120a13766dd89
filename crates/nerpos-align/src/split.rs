//! Punctuation splitter.
//!
//! Breaks a token whose word mixes word characters and punctuation into one
//! sub-token per run, so that `"08:00"` becomes `[08][:][00]` and `"word,"`
//! becomes `[word][,]`. Each sub-token is a shallow copy of its parent: every
//! attribute is duplicated, only the word changes. Sub-tokens are never merged
//! back here; re-grouping is the span aligner's job.

use once_cell::sync::Lazy;
use regex::Regex;

use nerpos_core::Token;

/// A maximal word-character run, or a single non-word, non-space character.
static RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[^\w\s]").expect("compile run pattern"));

/// Split every token of `tokens` along word/punctuation boundaries.
///
/// Tokens that decompose into a single run are passed through unchanged; any
/// other token is replaced by one copy per run, so tokens with no run at all
/// (empty or whitespace-only words) are dropped. Order is preserved, both
/// across tokens and among the sub-tokens of one token.
pub fn split_punctuation<T: Token>(tokens: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        let runs = split_word(token.word());
        if runs.len() == 1 {
            out.push(token.clone());
            continue;
        }
        out.extend(runs.into_iter().map(|run| token.with_word(run.to_string())));
    }
    out
}

/// The runs a single word decomposes into.
pub fn split_word(word: &str) -> Vec<&str> {
    RUN_RE.find_iter(word).map(|m| m.as_str()).collect()
}
