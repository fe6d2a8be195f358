//! Core data types used throughout deep-scan.
//!
//! These types represent the documents, pages, chunks, and hits that flow
//! through the scanning and comparison engines.

use std::fmt;
use std::path::{Path, PathBuf};

/// Document kind, resolved once from the file extension (case-insensitive).
///
/// `None` from [`DocKind::from_path`] means the file is not a recognized
/// archive member; the enumerator simply skips it, extraction never errors
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Pdf,
    Word,
    Text,
}

impl DocKind {
    pub fn from_path(path: &Path) -> Option<DocKind> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocKind::Pdf),
            "docx" | "doc" => Some(DocKind::Word),
            "txt" | "py" | "c" | "cpp" | "h" | "java" | "md" | "json" | "xml" | "csv" => {
                Some(DocKind::Text)
            }
            _ => None,
        }
    }
}

/// One extracted page: label plus raw text.
///
/// PDF documents yield one page per physical page, labeled "1", "2", ...
/// in document order. Word-processor and plain-text documents have no
/// native pagination and yield exactly one page labeled "1".
#[derive(Debug, Clone)]
pub struct Page {
    pub label: String,
    pub text: String,
}

/// A paragraph-scale unit of a document, bounded by blank-line breaks.
///
/// `id` is 1-based and monotonically increasing across the whole document,
/// not per page. `page` is the label of the page the chunk's text started
/// on and never changes after parsing.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub id: u32,
    pub page: String,
    pub text: String,
}

/// Location column of a scan hit. Keyword hits point at the text layer;
/// similarity hits carry the overlap percentage.
#[derive(Debug, Clone, PartialEq)]
pub enum HitLocation {
    Text,
    Score(f64),
}

impl HitLocation {
    /// The overlap percentage, when this hit came from a similarity scan.
    pub fn score(&self) -> Option<f64> {
        match self {
            HitLocation::Text => None,
            HitLocation::Score(s) => Some(*s),
        }
    }
}

impl fmt::Display for HitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HitLocation::Text => write!(f, "Text"),
            HitLocation::Score(s) => write!(f, "{:.1}%", s),
        }
    }
}

/// A matching file reported by a scan.
#[derive(Debug, Clone)]
pub struct ScanHit {
    pub path: PathBuf,
    pub location: HitLocation,
    pub context: String,
}

/// Best structural alignment found for one reference chunk.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub ref_page: String,
    pub target_page: String,
    /// Sequence similarity, 0-100, rounded to one decimal.
    pub score: f64,
    /// First 100 characters of the reference chunk, newlines collapsed.
    pub preview: String,
}
