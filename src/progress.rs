//! Scan result and progress reporting.
//!
//! The engine reports through an observer so the front end stays out of
//! the scanning path. All three callbacks are optional: the trait defaults
//! to silence and implementations override what they care about. Progress
//! is emitted on **stderr** so stdout remains parseable for scripts.

use std::io::Write;

use crate::models::ScanHit;

/// Receives scan events. Matches arrive in completion order, which is not
/// submission order; percent is monotone and reaches exactly 100 on the
/// final completion; `on_done` fires exactly once per scan, cancelled or
/// not.
pub trait ScanObserver: Send + Sync {
    /// A file matched the query.
    fn on_match(&self, _hit: &ScanHit) {}
    /// Percent complete plus the short name of the file just processed.
    /// Called every 5th completion and unconditionally on the last.
    fn on_progress(&self, _percent: u32, _current: &str) {}
    /// The scan drained or was cancelled; `matches` counts hits reported.
    fn on_done(&self, _matches: usize) {}
}

/// Silent observer for embedding the engine without reporting.
pub struct NoProgress;

impl ScanObserver for NoProgress {}

/// Human-friendly progress on stderr: "scan   40%  report.pdf".
pub struct StderrProgress;

impl ScanObserver for StderrProgress {
    fn on_progress(&self, percent: u32, current: &str) {
        let line = format!("scan  {:>3}%  {}\n", percent, current);
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }

    fn on_done(&self, matches: usize) {
        let _ = writeln!(std::io::stderr().lock(), "scan complete: {} matches", matches);
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ScanObserver for JsonProgress {
    fn on_match(&self, hit: &ScanHit) {
        let obj = serde_json::json!({
            "event": "match",
            "path": hit.path.display().to_string(),
            "location": hit.location.to_string(),
            "context": hit.context,
        });
        emit(&obj);
    }

    fn on_progress(&self, percent: u32, current: &str) {
        let obj = serde_json::json!({
            "event": "progress",
            "percent": percent,
            "file": current,
        });
        emit(&obj);
    }

    fn on_done(&self, matches: usize) {
        let obj = serde_json::json!({
            "event": "done",
            "matches": matches,
        });
        emit(&obj);
    }
}

fn emit(obj: &serde_json::Value) {
    if let Ok(line) = serde_json::to_string(obj) {
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
        let _ = std::io::stderr().lock().flush();
    }
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Build an observer for this mode.
    pub fn observer(&self) -> Box<dyn ScanObserver> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
