//! Merged output records.
//!
//! A [`MergedRecord`] is one row of the combined annotation: the POS-side
//! surface form and attributes plus the NER tag of the token it aligned with.
//! Absent attributes are written as [`NULL_MARKER`].

use serde::{Deserialize, Serialize};

use nerpos_core::{NerToken, PosToken};

/// Written in place of any absent attribute.
pub const NULL_MARKER: &str = "_";

// ---------------------------------------------------------------------------
// MergedRecord
// ---------------------------------------------------------------------------

/// One aligned token with both annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MergedRecord {
    pub sentence_id: String,
    pub word: String,
    pub ner_tag: String,
    #[serde(rename = "POS_TAG")]
    pub upos: String,
    pub lemma: String,
    pub feats: String,
    pub head: String,
    pub deprel: String,
    pub deps: String,
    pub misc: String,
}

impl MergedRecord {
    /// Column order of a tabular rendering; matches [`MergedRecord::fields`].
    pub const COLUMNS: [&'static str; 10] = [
        "SENTENCE_ID",
        "WORD",
        "NER_TAG",
        "POS_TAG",
        "LEMMA",
        "FEATS",
        "HEAD",
        "DEPREL",
        "DEPS",
        "MISC",
    ];

    /// Combine a NER token with the run of POS tokens it aligned with.
    ///
    /// The word is the concatenation of the POS words (so `8`, `:`, `00`
    /// reads `8:00` again); every attribute is the single-space join of the
    /// per-token values, each absent value written as [`NULL_MARKER`].
    pub fn from_pair(sentence_id: Option<&str>, ner: &NerToken, pos: &[PosToken]) -> Self {
        Self {
            sentence_id: sentence_id.unwrap_or(NULL_MARKER).to_string(),
            word: pos.iter().map(|t| t.word.as_str()).collect(),
            ner_tag: ner.tag.clone(),
            upos: join_attr(pos, |t| t.upos.as_deref()),
            lemma: join_attr(pos, |t| t.lemma.as_deref()),
            feats: join_attr(pos, |t| t.feats.as_deref()),
            head: join_attr(pos, |t| t.head.as_deref()),
            deprel: join_attr(pos, |t| t.deprel.as_deref()),
            deps: join_attr(pos, |t| t.deps.as_deref()),
            misc: join_attr(pos, |t| t.misc.as_deref()),
        }
    }

    /// Values in [`MergedRecord::COLUMNS`] order.
    pub fn fields(&self) -> [&str; 10] {
        [
            self.sentence_id.as_str(),
            self.word.as_str(),
            self.ner_tag.as_str(),
            self.upos.as_str(),
            self.lemma.as_str(),
            self.feats.as_str(),
            self.head.as_str(),
            self.deprel.as_str(),
            self.deps.as_str(),
            self.misc.as_str(),
        ]
    }
}

// ---------------------------------------------------------------------------
// UnmatchedRecord
// ---------------------------------------------------------------------------

/// A NER token that found no POS counterpart, kept for separate accounting.
///
/// A missing sentence id is written as [`NULL_MARKER`], as in [`MergedRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct UnmatchedRecord {
    pub sentence_id: String,
    pub word: String,
    pub ner_tag: String,
}

impl UnmatchedRecord {
    pub fn from_token(sentence_id: Option<&str>, ner: &NerToken) -> Self {
        Self {
            sentence_id: sentence_id.unwrap_or(NULL_MARKER).to_string(),
            word: ner.word.clone(),
            ner_tag: ner.tag.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn join_attr<F>(pos: &[PosToken], get: F) -> String
where
    F: Fn(&PosToken) -> Option<&str>,
{
    pos.iter()
        .map(|t| get(t).unwrap_or(NULL_MARKER))
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
