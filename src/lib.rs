//! # deep-scan
//!
//! A parallel content scanner for mixed-format document archives.
//!
//! deep-scan locates content across a folder of PDF, word-processor, and
//! plain-text/code files three ways: by literal or pattern keyword, by
//! document-level token overlap against a reference file, and by
//! paragraph-level structural alignment between two specific documents.
//! There is no persistent index; every search re-scans the archive.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌─────────────┐   ┌───────────────┐
//! │ Enumerate │──▶│ Worker pool  │──▶│ Extract+Match │
//! │ (walkdir) │   │ (rayon)      │   │ per file      │
//! └───────────┘   └──────┬──────┘   └───────────────┘
//!                        │ completion channel
//!                        ▼
//!                 ┌─────────────┐
//!                 │  Observer    │  on_match / on_progress / on_done
//!                 └─────────────┘
//! ```
//!
//! Extraction failures degrade to empty text, invalid patterns match
//! nothing, and per-job failures count as non-matches: no single file can
//! abort a scan.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`extract`] | Multi-format text and page extraction |
//! | [`matcher`] | Literal and regex keyword matching |
//! | [`similarity`] | Token-set Jaccard overlap scoring |
//! | [`seqmatch`] | Character-sequence similarity primitive |
//! | [`compare`] | Paragraph-level structural comparison |
//! | [`scan`] | Parallel scan orchestration and cancellation |
//! | [`progress`] | Observer trait and stderr/JSON reporters |
//! | [`report`] | Delimited report export |

pub mod compare;
pub mod config;
pub mod extract;
pub mod matcher;
pub mod models;
pub mod progress;
pub mod report;
pub mod scan;
pub mod seqmatch;
pub mod similarity;
