//! Character-level similarity ratio between two words.
//!
//! The ratio is `2 * M / (len(a) + len(b))` where `M` is the number of
//! characters covered by the matching blocks of a Ratcliff/Obershelp
//! decomposition: take the longest common contiguous block, then recurse on
//! the pieces to its left and to its right. Ties between equally long blocks
//! go to the one starting earliest in `a`, then earliest in `b`. `M` can be
//! smaller than the longest common subsequence (`"mama"` vs `"mma"` scores
//! 4/7, not 6/7). Identical strings score 1.0, strings sharing no character
//! score 0.0, and two empty strings score 1.0.

use std::collections::HashMap;

use crate::normalize::{normalize, strip_edges};

/// Default acceptance threshold for a match.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Second sequences at least this long ignore characters that make up more
/// than 1% of them when searching for blocks.
const POPULAR_MIN_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Similarity of two surface words as used by the aligner.
///
/// Both sides are quote-normalised and edge-stripped before the ratio is
/// computed, so `"Tirana,"` and `“Tirana”` score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    ratio(&comparable(a), &comparable(b))
}

/// `similarity(a, b) >= threshold`.
pub fn is_match(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) >= threshold
}

/// Raw sequence-similarity ratio of two strings, without any normalisation.
pub fn ratio(a: &str, b: &str) -> f64 {
    let left: Vec<char> = a.chars().collect();
    let right: Vec<char> = b.chars().collect();

    let total = left.len() + right.len();
    if total == 0 {
        return 1.0;
    }

    let matches = BlockMatcher::new(&left, &right).matching_chars();
    2.0 * matches as f64 / total as f64
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Quote-normalised, edge-stripped form of a word, ready for [`ratio`].
pub(crate) fn comparable(word: &str) -> String {
    strip_edges(&normalize(word))
}

/// Longest-block matcher over two character slices.
struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character of `b`, ascending.
    b_index: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b_index.entry(c).or_default().push(j);
        }
        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b_index.retain(|_, positions| positions.len() <= limit);
        }
        Self { a, b, b_index }
    }

    /// Total length of all matching blocks.
    fn matching_chars(&self) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, size) = self.longest_match(alo, ahi, blo, bhi);
            if size == 0 {
                continue;
            }
            total += size;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + size < ahi && j + size < bhi {
                pending.push((i + size, ahi, j + size, bhi));
            }
        }
        total
    }

    /// Longest block `a[i..i+size] == b[j..j+size]` inside the given window,
    /// as `(i, j, size)`; `size` is 0 when the window shares nothing.
    fn longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // run_len[j] is the length of the block ending at (i - 1, j).
        let mut run_len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = j.checked_sub(1).and_then(|p| run_len.get(&p)).copied();
                    let k = prev.unwrap_or(0) + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_len = next;
        }

        // Popular characters are left out of the index; grow over them.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
