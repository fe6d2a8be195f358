//! Paragraph-level structural comparison between two documents.
//!
//! Splits each document into page-attributed chunks on blank-line
//! boundaries and pairs every reference chunk with its best-aligned target
//! chunk by sequence similarity. Runs synchronously on exactly one
//! document pair, so the O(R x T) chunk scan is acceptable.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract;
use crate::matcher::compress;
use crate::models::{Chunk, Comparison};
use crate::seqmatch;
use crate::similarity::round1;

static PARA_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Chunks at or below this trimmed length are discarded at parse time.
pub const MIN_CHUNK_LEN: usize = 10;

/// Chunks below this length are too short to score reliably and are
/// excluded from structural comparison.
pub const MIN_COMPARE_LEN: usize = 50;

/// Alignments at or below this score are not reported.
pub const REPORT_THRESHOLD: f64 = 15.0;

const PREVIEW_LEN: usize = 100;

/// Split a document into paragraph chunks with page attribution.
///
/// Ids are 1-based and increase across the whole document. A chunk is
/// attributed to the page its text started on.
pub fn parse_chunks(path: &Path) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut id: u32 = 1;
    for page in extract::extract_pages(path) {
        for piece in PARA_BREAK.split(page.text.trim()) {
            let text = piece.trim();
            if text.chars().count() > MIN_CHUNK_LEN {
                chunks.push(Chunk {
                    id,
                    page: page.label.clone(),
                    text: text.to_string(),
                });
                id += 1;
            }
        }
    }
    chunks
}

/// For every comparable reference chunk, find the single best-aligned
/// target chunk. Results carry only alignments scoring above
/// [`REPORT_THRESHOLD`], sorted by score descending.
pub fn compare_documents(reference: &Path, target: &Path) -> Vec<Comparison> {
    let ref_chunks = parse_chunks(reference);
    let tgt_chunks = parse_chunks(target);

    // normalize each target chunk once; the pair scan below revisits them
    // for every reference chunk
    let targets: Vec<(&Chunk, String)> = tgt_chunks
        .iter()
        .filter(|c| c.text.chars().count() >= MIN_COMPARE_LEN)
        .map(|c| (c, compress(&c.text.to_lowercase())))
        .collect();

    let mut results = Vec::new();
    for ref_chunk in ref_chunks
        .iter()
        .filter(|c| c.text.chars().count() >= MIN_COMPARE_LEN)
    {
        let ref_clean = compress(&ref_chunk.text.to_lowercase());
        let mut best_score = 0.0_f64;
        let mut best_page = "-".to_string();
        for (tgt_chunk, tgt_clean) in &targets {
            let score = seqmatch::ratio(&ref_clean, tgt_clean) * 100.0;
            // strict improvement only: ties keep the first target found
            if score > best_score {
                best_score = score;
                best_page = tgt_chunk.page.clone();
            }
        }
        if best_score > REPORT_THRESHOLD {
            results.push(Comparison {
                ref_page: ref_chunk.page.clone(),
                target_page: best_page,
                score: round1(best_score),
                preview: preview(&ref_chunk.text),
            });
        }
    }

    results.sort_by(|x, y| {
        y.score
            .partial_cmp(&x.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

fn preview(text: &str) -> String {
    let head: String = text.chars().take(PREVIEW_LEN).collect();
    format!("{}...", head.replace('\n', " "))
}
