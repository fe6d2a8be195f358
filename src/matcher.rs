//! Keyword matching over extracted text.
//!
//! Two modes share one outcome shape: literal phrases are case-folded and
//! whitespace-compressed before the substring test, regex patterns run
//! against the case-folded text as-is. Neither mode can abort a scan: an
//! invalid pattern simply never matches.

use regex::Regex;

/// Characters of context kept on each side of a located match.
const SNIPPET_RADIUS: usize = 40;

/// Outcome of testing one document against a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub found: bool,
    pub snippet: String,
}

impl MatchOutcome {
    fn none() -> MatchOutcome {
        MatchOutcome {
            found: false,
            snippet: String::new(),
        }
    }
}

/// A query prepared once and applied to many documents.
#[derive(Debug, Clone)]
pub enum KeywordQuery {
    /// Case-folded, whitespace-compressed phrase plus its character
    /// reversal. The reversed candidate is a heuristic carried over for
    /// text that upstream formatting may present mirrored; it is tested
    /// only when the forward form misses.
    Literal { compressed: String, reversed: String },
    /// `None` means the pattern failed to compile; the query then matches
    /// nothing rather than erroring.
    Pattern { regex: Option<Regex> },
}

impl KeywordQuery {
    pub fn new(raw: &str, use_regex: bool) -> KeywordQuery {
        if use_regex {
            KeywordQuery::Pattern {
                regex: Regex::new(raw).ok(),
            }
        } else {
            let compressed = compress(&raw.to_lowercase());
            let reversed = compressed.chars().rev().collect();
            KeywordQuery::Literal {
                compressed,
                reversed,
            }
        }
    }

    /// Test a raw text blob. The snippet windows the located term in the
    /// original-case text with embedded newlines collapsed to spaces.
    pub fn check(&self, raw_text: &str) -> MatchOutcome {
        if raw_text.is_empty() {
            return MatchOutcome::none();
        }
        let text_lower = raw_text.to_lowercase();

        match self {
            KeywordQuery::Pattern { regex } => {
                let Some(term) = regex
                    .as_ref()
                    .and_then(|re| re.find(&text_lower))
                    .map(|m| m.as_str().to_string())
                else {
                    return MatchOutcome::none();
                };
                // a found match whose start cannot be located falls back
                // to offset 0 instead of raising
                let start = text_lower.find(&term).unwrap_or(0);
                MatchOutcome {
                    found: true,
                    snippet: snippet_at(raw_text, &text_lower, start),
                }
            }
            KeywordQuery::Literal {
                compressed,
                reversed,
            } => {
                if compressed.is_empty() {
                    return MatchOutcome::none();
                }
                let text_compressed = compress(&text_lower);
                let term = if text_compressed.contains(compressed.as_str()) {
                    compressed
                } else if text_compressed.contains(reversed.as_str()) {
                    reversed
                } else {
                    return MatchOutcome::none();
                };
                match text_lower.find(term.as_str()) {
                    Some(start) => MatchOutcome {
                        found: true,
                        snippet: snippet_at(raw_text, &text_lower, start),
                    },
                    // the term only exists once whitespace is stripped,
                    // so there is nothing to window
                    None => MatchOutcome {
                        found: true,
                        snippet: "Match found".to_string(),
                    },
                }
            }
        }
    }
}

/// Remove the whitespace set the matcher compresses on: space, tab,
/// newline, carriage return.
pub(crate) fn compress(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\r'))
        .collect()
}

/// Window `SNIPPET_RADIUS` characters around `start` (a byte offset into
/// the case-folded text). The original-case text is used when its byte
/// layout matches; otherwise the case-folded text is the only safe base.
fn snippet_at(raw: &str, lower: &str, start: usize) -> String {
    let base = if raw.len() == lower.len() && raw.is_char_boundary(start) {
        raw
    } else {
        lower
    };
    let s = base[..start]
        .char_indices()
        .rev()
        .nth(SNIPPET_RADIUS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let e = base[start..]
        .char_indices()
        .nth(SNIPPET_RADIUS)
        .map(|(i, _)| start + i)
        .unwrap_or(base.len());
    format!("...{}...", base[s..e].replace('\n', " ").trim())
}
