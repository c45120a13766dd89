//! Monotonic token alignment engine.
//!
//! Aligns a NER token sequence `A` (length `n`) against a POS token sequence
//! `B` (length `m`) with a single forward dynamic program followed by one
//! backward traceback. `score[i][j]` is the best number of accepted matches
//! using the first `i` tokens of `A` and the first `j` tokens of `B`; it never
//! decreases when either prefix grows.
//!
//! Two transition sets share the table and the traceback:
//!
//! - **One-to-one.** Each cell first takes the diagonal `score[i-1][j-1] + hit`
//!   (`hit` is 1 when the two words are similar enough), then a skip of the
//!   NER token or of the POS token replaces it only on a strict improvement.
//!   Ties therefore resolve to the diagonal.
//! - **Span.** Each cell first takes the better skip (again strict), then for
//!   every span length `1..=max_span` the NER word `A[i-1]` is compared with
//!   the space-joined words `B[j..j+span]`; a hit proposes
//!   `score[i-1][j] + 1` for cell `(i, j + span - 1)`, accepted only on a
//!   strict improvement.
//!
//! Traceback starts at `(n, m)` and walks until every NER token has been
//! consumed. A matching diagonal or span step emits an [`AlignedPair`]; every
//! other NER-consuming step records the token in `unmatched`.

use nerpos_core::{Result, Token};

use crate::config::{AlignConfig, AlignMode};
use crate::normalize::join_words;
use crate::result::{AlignedPair, Alignment, UnmatchedToken};
use crate::similarity::{comparable, ratio, DEFAULT_THRESHOLD};

// ---------------------------------------------------------------------------
// Aligner
// ---------------------------------------------------------------------------

/// A validated, reusable alignment strategy.
///
/// `Aligner` holds no scratch state: every [`Aligner::align`] call allocates
/// its own tables, so one instance can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aligner {
    mode: AlignMode,
    threshold: f64,
    max_span: usize,
}

impl Aligner {
    /// Build an aligner from the mode, threshold and span settings of
    /// `config`. Fails when the configuration does not validate.
    pub fn new(config: &AlignConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mode: config.mode,
            threshold: config.effective_threshold(),
            max_span: config.max_span,
        })
    }

    /// One-to-one aligner with the given threshold.
    pub fn one_to_one(threshold: f64) -> Result<Self> {
        Self::new(&AlignConfig::one_to_one().with_threshold(threshold))
    }

    /// Span aligner with the given threshold and maximum span.
    pub fn span(threshold: f64, max_span: usize) -> Result<Self> {
        Self::new(&AlignConfig::span(max_span).with_span_threshold(threshold))
    }

    pub fn mode(&self) -> AlignMode {
        self.mode
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn max_span(&self) -> usize {
        self.max_span
    }

    /// Align `ner` against `pos`.
    ///
    /// Total over its inputs: empty sequences and inputs with no similar
    /// words at all produce an empty pair list, with every NER token
    /// reported as unmatched.
    pub fn align<A: Token, B: Token>(&self, ner: &[A], pos: &[B]) -> Alignment {
        tracing::trace!(
            ner = ner.len(),
            pos = pos.len(),
            mode = ?self.mode,
            "filling alignment table"
        );

        let ner_keys: Vec<String> = ner.iter().map(|t| comparable(t.word())).collect();
        let table = match self.mode {
            AlignMode::OneToOne => {
                let pos_keys: Vec<String> = pos.iter().map(|t| comparable(t.word())).collect();
                self.fill_one_to_one(&ner_keys, &pos_keys)
            }
            AlignMode::Span => self.fill_span(&ner_keys, pos),
        };

        traceback(&table, ner)
    }

    // -----------------------------------------------------------------------
    // Forward passes
    // -----------------------------------------------------------------------

    fn fill_one_to_one(&self, ner_keys: &[String], pos_keys: &[String]) -> Table {
        let n = ner_keys.len();
        let m = pos_keys.len();
        let mut table = Table::new(n, m);

        for i in 0..=n {
            for j in 0..=m {
                if i > 0 && j > 0 {
                    let similarity = ratio(&ner_keys[i - 1], &pos_keys[j - 1]);
                    let hit = similarity >= self.threshold;
                    let score = table.score(i - 1, j - 1) + u32::from(hit);
                    table.set(i, j, score, Step::Diagonal { similarity, hit });
                }
                table.relax_skips(i, j);
            }
        }
        table
    }

    fn fill_span<B: Token>(&self, ner_keys: &[String], pos: &[B]) -> Table {
        let n = ner_keys.len();
        let m = pos.len();
        let mut table = Table::new(n, m);

        for i in 0..=n {
            for j in 0..=m {
                table.relax_skips(i, j);
                if i == 0 || j >= m {
                    continue;
                }
                let base = table.score(i - 1, j);
                for span in 1..=self.max_span {
                    if j + span > m {
                        break;
                    }
                    let joined = join_words(pos[j..j + span].iter().map(|t| t.word()));
                    let candidate = comparable(&joined);
                    let similarity = ratio(&ner_keys[i - 1], &candidate);
                    if similarity < self.threshold {
                        continue;
                    }
                    let target = j + span - 1;
                    if base + 1 > table.score(i, target) {
                        table.set(i, target, base + 1, Step::Span { len: span, similarity });
                    }
                }
            }
        }
        table
    }
}

/// One-to-one at the default threshold; matches `AlignConfig::default()`.
impl Default for Aligner {
    fn default() -> Self {
        Self {
            mode: AlignMode::OneToOne,
            threshold: DEFAULT_THRESHOLD,
            max_span: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Predecessor of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// No transition improved on the initial zero.
    Origin,
    /// From `(i-1, j-1)`; `hit` records whether the pair cleared the threshold.
    Diagonal { similarity: f64, hit: bool },
    /// From `(i-1, j)`: the NER token is left without a counterpart.
    SkipNer,
    /// From `(i, j-1)`: the POS token is left without a counterpart.
    SkipPos,
    /// From `(i-1, j + 1 - len)`: the NER token matched `len` POS tokens.
    Span { len: usize, similarity: f64 },
}

/// Score and backpointer grids, stored row-major in flat vectors.
struct Table {
    width: usize,
    score: Vec<u32>,
    back: Vec<Step>,
}

impl Table {
    fn new(n: usize, m: usize) -> Self {
        let width = m + 1;
        let cells = (n + 1) * width;
        Self {
            width,
            score: vec![0; cells],
            back: vec![Step::Origin; cells],
        }
    }

    #[inline]
    fn score(&self, i: usize, j: usize) -> u32 {
        self.score[i * self.width + j]
    }

    #[inline]
    fn step(&self, i: usize, j: usize) -> Step {
        self.back[i * self.width + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, score: u32, step: Step) {
        let idx = i * self.width + j;
        self.score[idx] = score;
        self.back[idx] = step;
    }

    /// Apply the skip transitions to `(i, j)`, each only on strict improvement.
    fn relax_skips(&mut self, i: usize, j: usize) {
        if i > 0 && self.score(i, j) < self.score(i - 1, j) {
            let up = self.score(i - 1, j);
            self.set(i, j, up, Step::SkipNer);
        }
        if j > 0 && self.score(i, j) < self.score(i, j - 1) {
            let left = self.score(i, j - 1);
            self.set(i, j, left, Step::SkipPos);
        }
    }
}

// ---------------------------------------------------------------------------
// Traceback
// ---------------------------------------------------------------------------

fn traceback<A: Token>(table: &Table, ner: &[A]) -> Alignment {
    let mut pairs = Vec::new();
    let mut unmatched = Vec::new();
    let unmatched_at = |idx: usize| UnmatchedToken {
        ner_index: idx,
        word: ner[idx].word().to_string(),
    };

    let mut i = ner.len();
    let mut j = table.width - 1;
    while i > 0 {
        match table.step(i, j) {
            Step::Diagonal { similarity, hit } => {
                if hit {
                    pairs.push(AlignedPair {
                        ner_index: i - 1,
                        pos_start: j - 1,
                        pos_len: 1,
                        similarity,
                    });
                } else {
                    unmatched.push(unmatched_at(i - 1));
                }
                i -= 1;
                j -= 1;
            }
            Step::Span { len, similarity } => {
                let start = j + 1 - len;
                pairs.push(AlignedPair {
                    ner_index: i - 1,
                    pos_start: start,
                    pos_len: len,
                    similarity,
                });
                i -= 1;
                j = start;
            }
            Step::SkipPos => j -= 1,
            // An origin cell below row 0 scores 0, as does the cell above it,
            // so skipping the NER token is an equally good predecessor.
            Step::SkipNer | Step::Origin => {
                unmatched.push(unmatched_at(i - 1));
                i -= 1;
            }
        }
    }

    pairs.reverse();
    unmatched.reverse();
    Alignment { pairs, unmatched }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nerpos_core::{NerToken, PosToken};

    fn ner(words: &[&str]) -> Vec<NerToken> {
        words.iter().map(|w| NerToken::outside(*w)).collect()
    }

    fn pos(words: &[&str]) -> Vec<PosToken> {
        words.iter().map(|w| PosToken::new(*w)).collect()
    }

    fn spans(a: &Alignment) -> Vec<(usize, usize, usize)> {
        a.pairs
            .iter()
            .map(|p| (p.ner_index, p.pos_start, p.pos_len))
            .collect()
    }

    fn one_to_one() -> Aligner {
        Aligner::one_to_one(0.8).expect("valid aligner")
    }

    fn span(max_span: usize) -> Aligner {
        Aligner::span(0.8, max_span).expect("valid aligner")
    }

    // -- one-to-one ---------------------------------------------------------

    #[test]
    fn longest_block_ratio_decides_matches() {
        // "mama" shares a three-letter subsequence with "mma" but only a
        // two-letter block, which scores 4/7.
        let a = one_to_one().align(&ner(&["mama"]), &pos(&["mma"]));
        assert!(a.pairs.is_empty());
        assert_eq!(a.unmatched_words(), vec!["mama"]);
    }

    #[test]
    fn identical_sequences_match_everything() {
        let words = ["Presidenti", "vizitoi", "Tiranën", "të", "hënën", "."];
        for threshold in [0.0, 0.5, 0.8, 1.0] {
            let aligner = Aligner::one_to_one(threshold).expect("valid");
            let a = aligner.align(&ner(&words), &pos(&words));
            assert_eq!(a.match_count(), words.len(), "threshold {}", threshold);
            assert!(a.unmatched.is_empty());
            for (k, p) in a.pairs.iter().enumerate() {
                assert_eq!((p.ner_index, p.pos_start, p.pos_len), (k, k, 1));
                assert_eq!(p.similarity, 1.0);
            }
        }
    }

    #[test]
    fn fuzzy_match_within_threshold() {
        let a = one_to_one().align(
            &ner(&["colour", "of", "Tirana,"]),
            &pos(&["color", "of", "Tirana"]),
        );
        assert_eq!(spans(&a), vec![(0, 0, 1), (1, 1, 1), (2, 2, 1)]);
        assert!(a.pairs[0].similarity < 1.0);
    }

    #[test]
    fn extra_pos_tokens_are_skipped() {
        let a = one_to_one().align(
            &ner(&["Ai", "erdhi", "sot"]),
            &pos(&["Ai", "po", "erdhi", "edhe", "sot"]),
        );
        assert_eq!(spans(&a), vec![(0, 0, 1), (1, 2, 1), (2, 4, 1)]);
        assert!(a.unmatched.is_empty());
    }

    #[test]
    fn extra_ner_token_is_unmatched() {
        let a = one_to_one().align(&ner(&["Ai", "XYZ", "erdhi"]), &pos(&["Ai", "erdhi"]));
        assert_eq!(spans(&a), vec![(0, 0, 1), (2, 1, 1)]);
        assert_eq!(a.unmatched_words(), vec!["XYZ"]);
        assert_eq!(a.unmatched[0].ner_index, 1);
    }

    #[test]
    fn no_match_reports_every_ner_token() {
        let a = one_to_one().align(&ner(&["xyz123"]), &pos(&["completely", "different"]));
        assert!(a.pairs.is_empty());
        assert_eq!(a.unmatched_words(), vec!["xyz123"]);
    }

    #[test]
    fn ties_prefer_the_diagonal() {
        // Both POS tokens match; the diagonal into the last cell wins the tie
        // against skipping the trailing POS token.
        let a = one_to_one().align(&ner(&["Tirana"]), &pos(&["Tirana", "Tirana"]));
        assert_eq!(spans(&a), vec![(0, 1, 1)]);
    }

    #[test]
    fn unmatched_diagonal_marks_ner_unmatched() {
        let a = one_to_one().align(&ner(&["alpha", "beta"]), &pos(&["qqq", "beta"]));
        assert_eq!(spans(&a), vec![(1, 1, 1)]);
        assert_eq!(a.unmatched_words(), vec!["alpha"]);
    }

    // -- degenerate inputs --------------------------------------------------

    #[test]
    fn empty_ner_gives_empty_result() {
        for aligner in [one_to_one(), span(3)] {
            let a = aligner.align(&ner(&[]), &pos(&["a", "b"]));
            assert!(a.pairs.is_empty());
            assert!(a.unmatched.is_empty());
        }
    }

    #[test]
    fn empty_pos_leaves_every_ner_unmatched() {
        for aligner in [one_to_one(), span(3)] {
            let a = aligner.align(&ner(&["a", "b", "c"]), &pos(&[]));
            assert!(a.pairs.is_empty());
            assert_eq!(a.unmatched_words(), vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn both_empty() {
        let a = span(2).align(&ner(&[]), &pos(&[]));
        assert_eq!(a, Alignment::default());
    }

    // -- span ---------------------------------------------------------------

    #[test]
    fn time_claims_three_pos_tokens() {
        let a = span(3).align(&ner(&["8:00"]), &pos(&["8", ":", "00"]));
        assert_eq!(spans(&a), vec![(0, 0, 3)]);
        assert!(a.unmatched.is_empty());
        assert!((a.pairs[0].similarity - 0.8).abs() < 1e-12);
    }

    #[test]
    fn span_of_two_written_ahead_of_its_cell() {
        let a = span(2).align(&ner(&["ab"]), &pos(&["a", "b"]));
        assert_eq!(spans(&a), vec![(0, 0, 2)]);
    }

    #[test]
    fn span_mode_matches_first_column() {
        let a = span(1).align(&ner(&["a"]), &pos(&["a"]));
        assert_eq!(spans(&a), vec![(0, 0, 1)]);
        assert!(a.unmatched.is_empty());
    }

    #[test]
    fn span_sentence_with_split_time() {
        let a = span(3).align(
            &ner(&["Meeting", "at", "08:00", "in", "New", "York", "."]),
            &pos(&["Meeting", "at", "08", ":", "00", "in", "New", "York", "."]),
        );
        // "Meeting" vs "Meeting at" scores 14/17 and "York" vs "York ." scores
        // 1.0, so both claim two POS tokens and share the second one with the
        // next pair.
        assert_eq!(
            spans(&a),
            vec![
                (0, 0, 2),
                (1, 1, 1),
                (2, 2, 3),
                (3, 5, 1),
                (4, 6, 1),
                (5, 7, 2),
                (6, 8, 1)
            ]
        );
        assert!(a.unmatched.is_empty());
        assert!(a.is_monotonic());
    }

    #[test]
    fn span_pairs_may_share_boundary_token() {
        // Cells are addressed at (i, j + span - 1), so two NER tokens can
        // both land on the same single POS token.
        let a = span(1).align(&ner(&["a", "a"]), &pos(&["a"]));
        assert_eq!(spans(&a), vec![(0, 0, 1), (1, 0, 1)]);
        assert!(a.is_monotonic());
        assert!(a.is_conserved(2));
    }

    #[test]
    fn span_no_match() {
        let a = span(3).align(&ner(&["xyz123"]), &pos(&["completely", "different"]));
        assert!(a.pairs.is_empty());
        assert_eq!(a.unmatched_words(), vec!["xyz123"]);
    }

    #[test]
    fn span_skipped_ner_recorded() {
        let a = span(2).align(&ner(&["Ai", "qqqq", "erdhi"]), &pos(&["Ai", "erdhi"]));
        let ner_indices: Vec<usize> = a.pairs.iter().map(|p| p.ner_index).collect();
        assert_eq!(ner_indices, vec![0, 2]);
        assert_eq!(a.unmatched_words(), vec!["qqqq"]);
    }

    // -- properties ---------------------------------------------------------

    fn fixtures() -> Vec<(Vec<NerToken>, Vec<PosToken>)> {
        vec![
            (
                ner(&["Ai", "erdhi", "në", "08:00", "."]),
                pos(&["Ai", "erdhi", "në", "08", ":", "00", "."]),
            ),
            (ner(&["colour", "x", "of", "the", "sea"]), pos(&["the", "color", "of", "sea", "y"])),
            (ner(&["a", "a", "b", "a"]), pos(&["a", "b", "a", "a", "b"])),
            (ner(&["New", "York", "City"]), pos(&["New York", "City"])),
            (ner(&["\u{201C}Po\u{201D}", "tha", "ai"]), pos(&["\"", "Po", "\"", "tha", "ai"])),
        ]
    }

    fn aligners() -> Vec<Aligner> {
        vec![one_to_one(), span(1), span(2), span(3)]
    }

    #[test]
    fn every_ner_token_accounted_for_once() {
        for (a_seq, b_seq) in fixtures() {
            for aligner in aligners() {
                let a = aligner.align(&a_seq, &b_seq);
                assert!(a.is_conserved(a_seq.len()), "{:?} {:?}", aligner, a);
                assert_eq!(a.pairs.len() + a.unmatched.len(), a_seq.len());
            }
        }
    }

    #[test]
    fn pairs_are_order_preserving() {
        for (a_seq, b_seq) in fixtures() {
            for aligner in aligners() {
                let a = aligner.align(&a_seq, &b_seq);
                assert!(a.is_monotonic(), "{:?} {:?}", aligner, a);
                for p in &a.pairs {
                    assert!(p.pos_len >= 1);
                    assert!(p.pos_range().end <= b_seq.len());
                }
                let idx: Vec<usize> = a.unmatched.iter().map(|u| u.ner_index).collect();
                assert!(idx.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn one_to_one_pos_indices_strictly_increase() {
        for (a_seq, b_seq) in fixtures() {
            let a = one_to_one().align(&a_seq, &b_seq);
            assert!(a.pairs.windows(2).all(|w| w[0].pos_start < w[1].pos_start));
        }
    }

    #[test]
    fn raising_threshold_never_adds_matches() {
        let thresholds = [0.0, 0.3, 0.6, 0.8, 0.9, 1.0];
        for (a_seq, b_seq) in fixtures() {
            let makers: [fn(f64) -> Result<Aligner>; 2] =
                [Aligner::one_to_one, |t| Aligner::span(t, 3)];
            for make in makers {
                let counts: Vec<usize> = thresholds
                    .iter()
                    .map(|&t| make(t).expect("valid").align(&a_seq, &b_seq).match_count())
                    .collect();
                assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{:?}", counts);
            }
        }
    }

    #[test]
    fn threshold_above_pair_similarity_removes_pair() {
        let a_seq = ner(&["colour"]);
        let b_seq = pos(&["color"]);
        let matched = one_to_one().align(&a_seq, &b_seq);
        assert_eq!(matched.match_count(), 1);
        let sim = matched.pairs[0].similarity;

        let stricter = Aligner::one_to_one((sim + 0.01).min(1.0)).expect("valid");
        let a = stricter.align(&a_seq, &b_seq);
        assert!(a.pairs.is_empty());
        assert_eq!(a.unmatched_words(), vec!["colour"]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        for (a_seq, b_seq) in fixtures() {
            for aligner in aligners() {
                assert_eq!(aligner.align(&a_seq, &b_seq), aligner.align(&a_seq, &b_seq));
            }
        }
    }

    #[test]
    fn default_matches_default_config() {
        assert_eq!(
            Aligner::default(),
            Aligner::new(&AlignConfig::default()).expect("valid")
        );
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(Aligner::one_to_one(1.2).is_err());
        assert!(Aligner::span(0.8, 0).is_err());
    }

    #[test]
    fn new_takes_mode_specific_threshold() {
        let cfg = AlignConfig::span(2).with_threshold(0.1).with_span_threshold(0.95);
        let aligner = Aligner::new(&cfg).expect("valid");
        assert_eq!(aligner.mode(), AlignMode::Span);
        assert_eq!(aligner.threshold(), 0.95);
        assert_eq!(aligner.max_span(), 2);
    }
}
