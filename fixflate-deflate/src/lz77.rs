//! Greedy LZ77 match finding for DEFLATE.
//!
//! The finder walks the input once. At each position it looks for the
//! longest earlier run of bytes (within a 32 KiB window) that repeats the
//! bytes starting there. A match of at least [`MIN_MATCH`] bytes becomes a
//! back-reference and the cursor jumps past it; otherwise one literal byte is
//! emitted.
//!
//! # Search
//!
//! Candidates are found through hash chains keyed on the next three bytes.
//! Every position of the input is linked into its chain, and chains are
//! walked from the nearest position outward without a depth limit, so the
//! longest match found is the same one an exhaustive scan of the window
//! would find. Among equally long matches the nearest one wins.

use crate::tables::{MAX_DISTANCE, MAX_MATCH, MIN_MATCH};

/// Number of hash bits.
const HASH_BITS: u32 = 15;

/// Size of the hash head table.
const HASH_SIZE: usize = 1 << HASH_BITS;

/// Empty chain link.
const NIL: usize = usize::MAX;

/// A token produced by the match finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A literal byte.
    Literal(u8),
    /// A back-reference into already emitted data.
    Match {
        /// Number of bytes to copy (3-258).
        length: u16,
        /// Distance back from the current position (1-32768).
        distance: u16,
    },
}

impl Token {
    /// Number of uncompressed bytes this token stands for.
    #[inline]
    pub fn literal_len(&self) -> usize {
        match *self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => length as usize,
        }
    }

    /// Check whether this token is a back-reference.
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, Token::Match { .. })
    }
}

/// Greedy LZ77 match finder.
///
/// The hash tables are kept between calls so one finder can be reused for
/// several inputs without reallocating.
#[derive(Debug)]
pub struct MatchFinder {
    /// Most recent position for each hash value.
    head: Vec<usize>,
    /// Previous position with the same hash, indexed by position.
    prev: Vec<usize>,
}

impl MatchFinder {
    /// Create a new match finder.
    pub fn new() -> Self {
        Self {
            head: vec![NIL; HASH_SIZE],
            prev: Vec::new(),
        }
    }

    #[inline(always)]
    fn hash(b0: u8, b1: u8, b2: u8) -> usize {
        let h = ((b0 as u32) << 16) | ((b1 as u32) << 8) | b2 as u32;
        (h.wrapping_mul(2654435761) >> (32 - HASH_BITS)) as usize
    }

    /// Link `pos` into its hash chain.
    #[inline]
    fn insert(&mut self, input: &[u8], pos: usize) {
        if pos + MIN_MATCH > input.len() {
            return;
        }
        let h = Self::hash(input[pos], input[pos + 1], input[pos + 2]);
        self.prev[pos] = self.head[h];
        self.head[h] = pos;
    }

    /// Find the longest match for `pos`, returning `(length, distance)`.
    fn longest_match(&self, input: &[u8], pos: usize) -> Option<(usize, usize)> {
        let max_len = MAX_MATCH.min(input.len() - pos);
        if max_len < MIN_MATCH {
            return None;
        }

        let h = Self::hash(input[pos], input[pos + 1], input[pos + 2]);
        let mut candidate = self.head[h];
        let mut best_len = MIN_MATCH - 1;
        let mut best_dist = 0;

        // Chains are ordered from the nearest position outward.
        while candidate != NIL {
            let dist = pos - candidate;
            if dist > MAX_DISTANCE {
                break;
            }

            // A longer match must also differ from the best one at best_len.
            if input[candidate + best_len] == input[pos + best_len] {
                let len = input[candidate..]
                    .iter()
                    .zip(&input[pos..pos + max_len])
                    .take_while(|(a, b)| a == b)
                    .count();

                if len > best_len {
                    best_len = len;
                    best_dist = dist;
                    if len == max_len {
                        break;
                    }
                }
            }

            candidate = self.prev[candidate];
        }

        (best_len >= MIN_MATCH).then_some((best_len, best_dist))
    }

    /// Split `input` into literal and back-reference tokens.
    pub fn find_tokens(&mut self, input: &[u8]) -> Vec<Token> {
        self.head.fill(NIL);
        self.prev.clear();
        self.prev.resize(input.len(), NIL);

        let mut tokens = Vec::with_capacity(input.len() / 2 + 1);
        let mut pos = 0;

        while pos < input.len() {
            match self.longest_match(input, pos) {
                Some((length, distance)) => {
                    tokens.push(Token::Match {
                        length: length as u16,
                        distance: distance as u16,
                    });
                    for p in pos..pos + length {
                        self.insert(input, p);
                    }
                    pos += length;
                }
                None => {
                    tokens.push(Token::Literal(input[pos]));
                    self.insert(input, pos);
                    pos += 1;
                }
            }
        }

        tokens
    }
}

impl Default for MatchFinder {
    fn default() -> Self {
        Self::new()
    }
}
