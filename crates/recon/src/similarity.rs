//! Name similarity scoring on a 0-100 scale.
//!
//! The linker only needs the [`Similarity`] trait; [`TokenSortRatio`] is the
//! scorer the CLI uses. Any `Fn(&str, &str) -> f64` also works, which is how
//! tests plug in fixed score tables.

/// A similarity score between two names, 0 (unrelated) to 100 (identical).
pub trait Similarity {
    fn score(&self, a: &str, b: &str) -> f64;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> f64,
{
    fn score(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// Word-order-insensitive similarity: tokens are sorted before comparison,
/// so "Smith Jon" and "Jon Smith" score 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl Similarity for TokenSortRatio {
    fn score(&self, a: &str, b: &str) -> f64 {
        token_sort_ratio(a, b)
    }
}

/// Sort whitespace-separated tokens and rejoin them with single spaces.
pub fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    indel_ratio(&sort_tokens(a), &sort_tokens(b))
}

/// Normalized indel similarity: `100 * 2 * lcs / (len_a + len_b)`.
///
/// Only insertions and deletions count as edits, so a substitution costs 2.
/// Two empty strings are identical (100).
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 100.0;
    }
    let lcs = lcs_len(&a_chars, &b_chars);
    100.0 * (2 * lcs) as f64 / total as f64
}

/// Longest common subsequence length, keeping two rows of the DP table.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    // Shorter sequence on the inner loop
    if a.len() > b.len() {
        return lcs_len(b, a);
    }

    let m = a.len();
    let mut prev = vec![0usize; m + 1];
    let mut curr = vec![0usize; m + 1];

    for bc in b {
        for i in 1..=m {
            curr[i] = if a[i - 1] == *bc {
                prev[i - 1] + 1
            } else {
                prev[i].max(curr[i - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_names_score_100() {
        assert_eq!(token_sort_ratio("Jon Smith", "Jon Smith"), 100.0);
    }

    #[test]
    fn word_order_ignored() {
        assert_eq!(token_sort_ratio("Smith Jon", "Jon Smith"), 100.0);
        assert_eq!(token_sort_ratio("  Jon   Smith ", "Smith Jon"), 100.0);
    }

    #[test]
    fn punctuation_still_counts() {
        // "Jon Smith," vs "Jon Smith": lcs 9, total 19
        let score = token_sort_ratio("Smith, Jon", "Jon Smith");
        assert!((score - 1800.0 / 19.0).abs() < 1e-9, "got {score}");
        assert!(score > 85.0);
    }

    #[test]
    fn case_sensitive() {
        assert!(token_sort_ratio("jon smith", "Jon Smith") < 100.0);
    }

    #[test]
    fn unrelated_names_score_low() {
        assert!(token_sort_ratio("Alice Lee", "Bob Chan") < 50.0);
    }

    #[test]
    fn indel_counts_substitution_twice() {
        // "cat" vs "hat": lcs 2, total 6
        let score = indel_ratio("cat", "hat");
        assert!((score - 400.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(indel_ratio("", ""), 100.0);
        assert_eq!(indel_ratio("abc", ""), 0.0);
    }

    #[test]
    fn unicode_counts_chars_not_bytes() {
        assert_eq!(indel_ratio("José", "José"), 100.0);
        // lcs "Jos" = 3, total 8
        let score = indel_ratio("José", "Jose");
        assert!((score - 75.0).abs() < 1e-9);
    }

    #[test]
    fn closures_are_scorers() {
        let fixed = |_: &str, _: &str| 42.0;
        assert_eq!(fixed.score("a", "b"), 42.0);
    }
}
