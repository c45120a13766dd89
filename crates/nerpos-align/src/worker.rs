//! Parallel sentence-batch engine using rayon.
//!
//! [`AlignEngine`] is the primary entry point. It applies the configured
//! punctuation-split policy to each [`SentencePair`], aligns it with an
//! [`Aligner`], and keeps the aligned token sequences next to the index-based
//! [`Alignment`] so that the record assembler can resolve every pair.
//! Sentences are independent, so a batch is fanned out with `par_iter` and
//! gathered back in input order.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nerpos_core::{NerToken, PosToken, Result, SentencePair};

use crate::align::Aligner;
use crate::config::AlignConfig;
use crate::result::Alignment;
use crate::split::split_punctuation;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One sentence after alignment.
///
/// `ner` and `pos` are the sequences the aligner actually saw (after any
/// splitting); all indices in `alignment` refer to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceAlignment {
    pub sentence_id: Option<String>,
    pub ner: Vec<NerToken>,
    pub pos: Vec<PosToken>,
    pub alignment: Alignment,
}

/// Aggregate counts over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignStats {
    pub sentences: usize,
    /// NER tokens seen by the aligner, after splitting.
    pub ner_tokens: usize,
    /// POS tokens seen by the aligner, after splitting.
    pub pos_tokens: usize,
    pub matched: usize,
    pub unmatched: usize,
}

impl AlignStats {
    /// Fraction of NER tokens that found a counterpart; 0.0 for an empty batch.
    pub fn match_rate(&self) -> f64 {
        if self.ner_tokens == 0 {
            0.0
        } else {
            self.matched as f64 / self.ner_tokens as f64
        }
    }

    fn add(&mut self, sentence: &SentenceAlignment) {
        self.sentences += 1;
        self.ner_tokens += sentence.ner.len();
        self.pos_tokens += sentence.pos.len();
        self.matched += sentence.alignment.pairs.len();
        self.unmatched += sentence.alignment.unmatched.len();
    }
}

/// The output of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAlignment {
    /// Unique identifier for this run (UUIDv4).
    pub run_id: Uuid,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
    pub stats: AlignStats,
    /// Per-sentence results in input order.
    pub sentences: Vec<SentenceAlignment>,
}

// ---------------------------------------------------------------------------
// AlignEngine
// ---------------------------------------------------------------------------

/// Deterministic, parallel alignment engine.
#[derive(Debug, Clone)]
pub struct AlignEngine {
    config: AlignConfig,
    aligner: Aligner,
}

impl AlignEngine {
    /// Create an engine; fails when `config` does not validate.
    pub fn new(config: AlignConfig) -> Result<Self> {
        let aligner = Aligner::new(&config)?;
        Ok(Self { config, aligner })
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Split (per policy) and align a single sentence.
    pub fn align_sentence(&self, sentence: &SentencePair) -> SentenceAlignment {
        let ner = if self.config.split_ner {
            split_punctuation(&sentence.ner)
        } else {
            sentence.ner.clone()
        };
        let pos = if self.config.split_pos {
            split_punctuation(&sentence.pos)
        } else {
            sentence.pos.clone()
        };

        let alignment = self.aligner.align(&ner, &pos);

        tracing::debug!(
            sentence = sentence.id.as_deref().unwrap_or("-"),
            ner = ner.len(),
            pos = pos.len(),
            matched = alignment.pairs.len(),
            unmatched = alignment.unmatched.len(),
            "aligned sentence"
        );
        if !alignment.unmatched.is_empty() {
            tracing::warn!(
                sentence = sentence.id.as_deref().unwrap_or("-"),
                count = alignment.unmatched.len(),
                words = ?alignment.unmatched_words(),
                "unmatched NER tokens"
            );
        }

        SentenceAlignment {
            sentence_id: sentence.id.clone(),
            ner,
            pos,
            alignment,
        }
    }

    /// Align every sentence of `sentences` in parallel.
    ///
    /// # Steps
    /// 1. `par_iter` over sentences, aligning each independently.
    /// 2. Restore input order.
    /// 3. Compute aggregate stats.
    /// 4. Record elapsed wall-clock time in milliseconds.
    pub fn align_batch(&self, sentences: &[SentencePair]) -> BatchAlignment {
        let start = Instant::now();

        let mut indexed: Vec<(usize, SentenceAlignment)> = sentences
            .par_iter()
            .enumerate()
            .map(|(idx, sentence)| (idx, self.align_sentence(sentence)))
            .collect();
        indexed.sort_by_key(|(i, _)| *i);
        let sentences: Vec<SentenceAlignment> = indexed.into_iter().map(|(_, s)| s).collect();

        let mut stats = AlignStats::default();
        for sentence in &sentences {
            stats.add(sentence);
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let run_id = Uuid::new_v4();

        tracing::info!(
            %run_id,
            sentences = stats.sentences,
            matched = stats.matched,
            unmatched = stats.unmatched,
            match_rate = stats.match_rate(),
            elapsed_ms,
            "batch aligned"
        );

        BatchAlignment {
            run_id,
            elapsed_ms,
            stats,
            sentences,
        }
    }
}

impl Default for AlignEngine {
    fn default() -> Self {
        Self {
            config: AlignConfig::default(),
            aligner: Aligner::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
