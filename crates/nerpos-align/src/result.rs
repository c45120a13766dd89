//! Alignment result types.
//!
//! Results refer to tokens by index into the sequences that were aligned
//! (after any punctuation splitting), so they serialise compactly and can be
//! resolved against either token type.

use std::ops::Range;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AlignedPair
// ---------------------------------------------------------------------------

/// One NER token associated with a run of one or more POS tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    /// Index of the NER token.
    pub ner_index: usize,
    /// Index of the first POS token of the run.
    pub pos_start: usize,
    /// Number of POS tokens in the run; always at least 1.
    pub pos_len: usize,
    /// Similarity that cleared the threshold, in [0.0, 1.0].
    pub similarity: f64,
}

impl AlignedPair {
    pub fn pos_range(&self) -> Range<usize> {
        self.pos_start..self.pos_start + self.pos_len
    }

    /// Index of the last POS token of the run; `pos_start` for an empty run.
    pub fn pos_last(&self) -> usize {
        self.pos_start + self.pos_len.saturating_sub(1)
    }

    pub fn is_span(&self) -> bool {
        self.pos_len > 1
    }
}

// ---------------------------------------------------------------------------
// UnmatchedToken
// ---------------------------------------------------------------------------

/// A NER token that found no counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedToken {
    pub ner_index: usize,
    pub word: String,
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Output of one alignment call.
///
/// `pairs` is in sequence order: NER indices strictly increase, and each
/// pair's POS run starts no earlier than the previous run's last token.
/// `unmatched` is ordered by NER index. Every NER token appears exactly once
/// across the two lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub pairs: Vec<AlignedPair>,
    pub unmatched: Vec<UnmatchedToken>,
}

impl Alignment {
    pub fn match_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn unmatched_words(&self) -> Vec<&str> {
        self.unmatched.iter().map(|u| u.word.as_str()).collect()
    }

    /// `true` when pairs and unmatched tokens together cover exactly
    /// `ner_len` distinct NER indices.
    pub fn is_conserved(&self, ner_len: usize) -> bool {
        let mut seen = vec![false; ner_len];
        let indices = self
            .pairs
            .iter()
            .map(|p| p.ner_index)
            .chain(self.unmatched.iter().map(|u| u.ner_index));
        let mut count = 0usize;
        for idx in indices {
            if idx >= ner_len || seen[idx] {
                return false;
            }
            seen[idx] = true;
            count += 1;
        }
        count == ner_len
    }

    /// `true` when pairs respect sequence order on both sides.
    pub fn is_monotonic(&self) -> bool {
        self.pairs.windows(2).all(|w| {
            w[0].ner_index < w[1].ner_index && w[0].pos_last() <= w[1].pos_start
        })
    }

    /// Resolve a pair's POS run against the aligned sequence.
    pub fn pos_tokens<'a, T>(&self, pair: &AlignedPair, pos: &'a [T]) -> &'a [T] {
        &pos[pair.pos_range()]
    }
}
