//! Fuzzy string similarity metrics used by the education comparator

use std::collections::BTreeSet;
use strsim::normalized_levenshtein;
use unicode_segmentation::UnicodeSegmentation;

/// A string similarity in `[0, 1]`, where 1 means identical
pub trait SimilarityMetric: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;

    fn name(&self) -> &'static str;
}

/// Best alignment of the shorter string against equally long windows of the
/// longer one, scored with normalized Levenshtein. Windows are anchored where
/// a word of the shorter string occurs in the longer one, plus both ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialRatio;

/// Characters of each side considered by [`PartialRatio`]
pub const MAX_PARTIAL_CHARS: usize = 256;

/// Word tokens are lowercased and sorted before comparison, so word order
/// does not matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl SimilarityMetric for PartialRatio {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let a_chars: Vec<char> = a.chars().take(MAX_PARTIAL_CHARS).collect();
        let b_chars: Vec<char> = b.chars().take(MAX_PARTIAL_CHARS).collect();
        let (shorter, longer) = if a_chars.len() <= b_chars.len() {
            (&a_chars, &b_chars)
        } else {
            (&b_chars, &a_chars)
        };

        let needle: String = shorter.iter().collect();
        let mut best = 0.0_f64;

        for start in window_starts(shorter, longer) {
            let candidate: String = longer[start..start + shorter.len()].iter().collect();
            let score = normalized_levenshtein(&needle, &candidate);
            if score > best {
                best = score;
                if best >= 1.0 {
                    break;
                }
            }
        }

        best.clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "partial_ratio"
    }
}

/// Start offsets in `longer` that line a word of `shorter` up with one of its
/// occurrences in `longer`. Always contains both ends.
fn window_starts(shorter: &[char], longer: &[char]) -> BTreeSet<usize> {
    let last = longer.len() - shorter.len();
    let mut starts = BTreeSet::from([0, last]);

    for (offset, word) in word_spans(shorter) {
        for (position, window) in longer.windows(word.len()).enumerate() {
            if window == word {
                starts.insert(position.saturating_sub(offset).min(last));
            }
        }
    }

    starts
}

fn word_spans(chars: &[char]) -> Vec<(usize, &[char])> {
    let mut spans = Vec::new();
    let mut start = None;

    for (i, c) in chars.iter().enumerate() {
        match (c.is_alphanumeric(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, &chars[s..i]));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, &chars[s..]));
    }

    spans
}

impl SimilarityMetric for TokenSortRatio {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let a_sorted = sorted_tokens(a);
        let b_sorted = sorted_tokens(b);

        if a_sorted.is_empty() || b_sorted.is_empty() {
            return 0.0;
        }

        normalized_levenshtein(&a_sorted, &b_sorted).clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "token_sort_ratio"
    }
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<String> = text.unicode_words().map(|w| w.to_lowercase()).collect();
    tokens.sort();
    tokens.join(" ")
}
