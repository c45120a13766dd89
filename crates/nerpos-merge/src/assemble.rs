//! Record assembler.
//!
//! Turns aligned sentences into [`MergedRecord`] rows, one per aligned pair
//! and in traceback (i.e. sentence) order, and collects every unmatched NER
//! token as an [`UnmatchedRecord`] so it can be accounted for separately.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nerpos_align::{BatchAlignment, SentenceAlignment};

use crate::record::{MergedRecord, UnmatchedRecord};

/// Rows and unmatched tokens produced from one sentence or one batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assembly {
    /// The batch run these rows came from, if assembled from a batch.
    pub run_id: Option<Uuid>,
    pub records: Vec<MergedRecord>,
    pub unmatched: Vec<UnmatchedRecord>,
}

impl Assembly {
    /// Fraction of NER tokens that produced a record; 0.0 when empty.
    pub fn match_rate(&self) -> f64 {
        let total = self.records.len() + self.unmatched.len();
        if total == 0 {
            0.0
        } else {
            self.records.len() as f64 / total as f64
        }
    }

    fn extend_from(&mut self, sentence: &SentenceAlignment) {
        let id = sentence.sentence_id.as_deref();
        let alignment = &sentence.alignment;

        self.records.extend(alignment.pairs.iter().map(|pair| {
            MergedRecord::from_pair(
                id,
                &sentence.ner[pair.ner_index],
                alignment.pos_tokens(pair, &sentence.pos),
            )
        }));
        self.unmatched.extend(
            alignment
                .unmatched
                .iter()
                .map(|u| UnmatchedRecord::from_token(id, &sentence.ner[u.ner_index])),
        );
    }
}

/// Assemble the rows of a single aligned sentence.
pub fn assemble(sentence: &SentenceAlignment) -> Assembly {
    let mut out = Assembly::default();
    out.extend_from(sentence);
    out
}

/// Assemble a whole batch, sentence by sentence in batch order.
pub fn assemble_batch(batch: &BatchAlignment) -> Assembly {
    let mut out = Assembly {
        run_id: Some(batch.run_id),
        ..Assembly::default()
    };
    for sentence in &batch.sentences {
        out.extend_from(sentence);
    }

    tracing::debug!(
        run_id = %batch.run_id,
        records = out.records.len(),
        unmatched = out.unmatched.len(),
        "assembled batch"
    );
    out
}
