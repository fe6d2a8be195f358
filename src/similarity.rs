//! Document-level token overlap scoring.
//!
//! Tokenizes case-folded text into a set of word-like terms and scores a
//! document pair with Jaccard overlap (intersection over union) as a
//! percentage. Deliberately order-insensitive; the order-sensitive
//! counterpart lives in [`crate::seqmatch`].

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Tokens must be strictly longer than this to count.
pub const MIN_TOKEN_LEN: usize = 3;

/// Overlap percentages at or below this are suppressed as noise.
pub const REPORT_THRESHOLD: f64 = 5.0;

/// Deduplicated word tokens (length > 3) of the case-folded text.
pub fn tokens(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .filter(|m| m.as_str().chars().count() > MIN_TOKEN_LEN)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Jaccard overlap between two token sets as a percentage, rounded to one
/// decimal. Callers exclude empty sets before scoring; an empty union
/// scores 0 rather than dividing by zero.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    round1(intersection as f64 / union as f64 * 100.0)
}

/// Round to one decimal place, the precision all reported scores carry.
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
