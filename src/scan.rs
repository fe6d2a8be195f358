//! Scan orchestration: candidate enumeration, parallel job execution,
//! cooperative cancellation, and batched progress reporting.
//!
//! One synchronous caller submits one job per candidate file to a
//! fixed-size worker pool and drains results in completion order. Jobs
//! carry their full input by value and return self-contained results, so
//! workers share no mutable state. A failed or panicking job counts as a
//! non-match and the scan continues; nothing a single file does can abort
//! the run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::config::Config;
use crate::extract;
use crate::matcher::KeywordQuery;
use crate::models::{DocKind, HitLocation, ScanHit};
use crate::progress::ScanObserver;
use crate::similarity;

/// Progress fires every Nth completion, and always on the last.
const PROGRESS_EVERY: usize = 5;

/// Cooperative cancellation flag, polled after each completed job and by
/// workers before starting one. Clonable so a front end can keep one end
/// while the scan holds the other.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Enumerate candidate files under `root`, recursively.
///
/// Keeps only recognized extensions, skips configured exclude globs, and
/// never schedules the running executable's own file. Unreadable directory
/// entries are skipped, not fatal.
pub fn collect_files(root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let exclude = build_globset(&config.scan.exclude_globs)?;
    let own_exe = std::env::current_exe()
        .ok()
        .and_then(|p| p.canonicalize().ok());

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(config.scan.follow_symlinks) {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if DocKind::from_path(path).is_none() {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if exclude.is_match(relative) {
            continue;
        }
        if let Some(own) = &own_exe {
            if path.canonicalize().map(|p| &p == own).unwrap_or(false) {
                continue;
            }
        }
        files.push(path.to_path_buf());
    }
    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// One unit of work: a file plus everything needed to test it.
enum ScanJob {
    Keyword {
        path: PathBuf,
        query: Arc<KeywordQuery>,
    },
    Similarity {
        path: PathBuf,
        ref_tokens: Arc<HashSet<String>>,
    },
}

impl ScanJob {
    fn path(&self) -> &Path {
        match self {
            ScanJob::Keyword { path, .. } => path,
            ScanJob::Similarity { path, .. } => path,
        }
    }
}

fn run_job(job: &ScanJob) -> Option<ScanHit> {
    match job {
        ScanJob::Keyword { path, query } => {
            let text = extract::extract_text(path);
            let outcome = query.check(&text);
            if !outcome.found {
                return None;
            }
            Some(ScanHit {
                path: path.clone(),
                location: HitLocation::Text,
                context: outcome.snippet,
            })
        }
        ScanJob::Similarity { path, ref_tokens } => {
            let text = extract::extract_text(path);
            if text.is_empty() {
                return None;
            }
            let target_tokens = similarity::tokens(&text);
            if target_tokens.is_empty() {
                return None;
            }
            let score = similarity::jaccard(ref_tokens, &target_tokens);
            if score <= similarity::REPORT_THRESHOLD {
                return None;
            }
            Some(ScanHit {
                path: path.clone(),
                location: HitLocation::Score(score),
                context: "Content Overlap".to_string(),
            })
        }
    }
}

/// Search every file for a literal phrase or regex pattern.
///
/// Returns the number of matches reported through the observer.
pub fn run_keyword_scan(
    config: &Config,
    files: Vec<PathBuf>,
    query: &str,
    use_regex: bool,
    cancel: &CancelToken,
    observer: &dyn ScanObserver,
) -> Result<usize> {
    let query = Arc::new(KeywordQuery::new(query, use_regex));
    let jobs = files
        .into_iter()
        .map(|path| ScanJob::Keyword {
            path,
            query: Arc::clone(&query),
        })
        .collect();
    run_pool(config, jobs, cancel, observer)
}

/// Score every file's token overlap against a reference file.
///
/// The reference file itself is excluded from the candidates by canonical
/// path. A reference that yields no tokens produces an empty scan (done
/// fires with zero matches).
pub fn run_similarity_scan(
    config: &Config,
    files: Vec<PathBuf>,
    reference: &Path,
    cancel: &CancelToken,
    observer: &dyn ScanObserver,
) -> Result<usize> {
    let ref_tokens = similarity::tokens(&extract::extract_text(reference));
    if ref_tokens.is_empty() {
        observer.on_done(0);
        return Ok(0);
    }
    let ref_abs = reference
        .canonicalize()
        .unwrap_or_else(|_| reference.to_path_buf());
    let ref_tokens = Arc::new(ref_tokens);
    let jobs = files
        .into_iter()
        .filter(|p| p.canonicalize().map(|c| c != ref_abs).unwrap_or(true))
        .map(|path| ScanJob::Similarity {
            path,
            ref_tokens: Arc::clone(&ref_tokens),
        })
        .collect();
    run_pool(config, jobs, cancel, observer)
}

fn run_pool(
    config: &Config,
    jobs: Vec<ScanJob>,
    cancel: &CancelToken,
    observer: &dyn ScanObserver,
) -> Result<usize> {
    let total = jobs.len();
    if total == 0 {
        observer.on_done(0);
        return Ok(0);
    }

    let workers = config.scan.workers.unwrap_or_else(num_cpus::get).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;
    let (tx, rx) = mpsc::channel::<(String, Option<ScanHit>)>();

    for job in jobs {
        let tx = tx.clone();
        let cancel = cancel.clone();
        pool.spawn(move || {
            // jobs still queued when cancellation lands finish silently
            if cancel.is_cancelled() {
                return;
            }
            let name = short_name(job.path());
            // a panicking extraction library counts as a non-match
            let hit = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| run_job(&job)))
                .unwrap_or(None);
            let _ = tx.send((name, hit));
        });
    }
    drop(tx);

    let mut processed = 0usize;
    let mut matches = 0usize;
    for (name, hit) in rx {
        if cancel.is_cancelled() {
            break;
        }
        processed += 1;
        if let Some(hit) = hit {
            matches += 1;
            observer.on_match(&hit);
        }
        if processed % PROGRESS_EVERY == 0 || processed == total {
            observer.on_progress((processed * 100 / total) as u32, &name);
        }
    }
    observer.on_done(matches);
    Ok(matches)
}

fn short_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        hits: Mutex<Vec<ScanHit>>,
        progress: Mutex<Vec<(u32, String)>>,
        done: Mutex<Vec<usize>>,
    }

    impl ScanObserver for Recording {
        fn on_match(&self, hit: &ScanHit) {
            self.hits.lock().unwrap().push(hit.clone());
        }
        fn on_progress(&self, percent: u32, current: &str) {
            self.progress
                .lock()
                .unwrap()
                .push((percent, current.to_string()));
        }
        fn on_done(&self, matches: usize) {
            self.done.lock().unwrap().push(matches);
        }
    }

    fn write_txt(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.scan.workers = Some(2);
        config
    }

    #[test]
    fn collect_files_keeps_recognized_extensions_only() {
        let dir = tempfile::TempDir::new().unwrap();
        write_txt(&dir, "a.txt", "x");
        write_txt(&dir, "b.py", "x");
        write_txt(&dir, "c.exe", "x");
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        write_txt(&dir, "sub/d.md", "x");
        let mut files = collect_files(dir.path(), &Config::default()).unwrap();
        files.sort();
        let names: Vec<String> = files.iter().map(|p| short_name(p)).collect();
        assert_eq!(names, ["a.txt", "b.py", "d.md"]);
    }

    #[test]
    fn collect_files_honors_exclude_globs() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("node_modules")).unwrap();
        write_txt(&dir, "node_modules/dep.txt", "x");
        write_txt(&dir, "kept.txt", "x");
        let files = collect_files(dir.path(), &Config::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("kept.txt"));
    }

    #[test]
    fn keyword_scan_finds_exactly_the_matching_file() {
        let dir = tempfile::TempDir::new().unwrap();
        write_txt(&dir, "a.txt", "hello world");
        write_txt(&dir, "b.txt", "goodbye");
        let files = collect_files(dir.path(), &test_config()).unwrap();

        let observer = Recording::default();
        let matches = run_keyword_scan(
            &test_config(),
            files,
            "hello",
            false,
            &CancelToken::new(),
            &observer,
        )
        .unwrap();

        assert_eq!(matches, 1);
        let hits = observer.hits.lock().unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].path.ends_with("a.txt"));
        assert_eq!(hits[0].location, HitLocation::Text);
        assert!(hits[0].context.contains("hello world"));
        assert_eq!(*observer.done.lock().unwrap(), vec![1]);
    }

    #[test]
    fn invalid_regex_completes_with_zero_matches() {
        let dir = tempfile::TempDir::new().unwrap();
        write_txt(&dir, "a.txt", "some content here");
        let files = collect_files(dir.path(), &test_config()).unwrap();

        let observer = Recording::default();
        let matches = run_keyword_scan(
            &test_config(),
            files,
            "([unclosed",
            true,
            &CancelToken::new(),
            &observer,
        )
        .unwrap();

        assert_eq!(matches, 0);
        assert_eq!(*observer.done.lock().unwrap(), vec![0]);
    }

    #[test]
    fn similarity_scan_scores_overlap_and_skips_the_reference() {
        let dir = tempfile::TempDir::new().unwrap();
        let reference = write_txt(&dir, "ref.txt", "alpha beta gamma delta");
        write_txt(&dir, "target.txt", "alpha beta epsilon");
        write_txt(&dir, "unrelated.txt", "omicron sigma upsilon omega");
        let files = collect_files(dir.path(), &test_config()).unwrap();

        let observer = Recording::default();
        let matches = run_similarity_scan(
            &test_config(),
            files,
            &reference,
            &CancelToken::new(),
            &observer,
        )
        .unwrap();

        assert_eq!(matches, 1);
        let hits = observer.hits.lock().unwrap();
        assert!(hits[0].path.ends_with("target.txt"));
        assert_eq!(hits[0].location, HitLocation::Score(40.0));
        assert_eq!(hits[0].context, "Content Overlap");
    }

    #[test]
    fn similarity_scan_with_empty_reference_fires_done_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let reference = write_txt(&dir, "ref.txt", "a an it of");
        write_txt(&dir, "target.txt", "alpha beta epsilon");
        let files = collect_files(dir.path(), &test_config()).unwrap();

        let observer = Recording::default();
        let matches = run_similarity_scan(
            &test_config(),
            files,
            &reference,
            &CancelToken::new(),
            &observer,
        )
        .unwrap();

        assert_eq!(matches, 0);
        assert_eq!(*observer.done.lock().unwrap(), vec![0]);
    }

    #[test]
    fn progress_reaches_exactly_one_hundred_and_is_monotone() {
        let dir = tempfile::TempDir::new().unwrap();
        // 7 files: cadence fires at 5 and at the final 7th completion
        for i in 0..7 {
            write_txt(&dir, &format!("f{}.txt", i), "hello content");
        }
        let files = collect_files(dir.path(), &test_config()).unwrap();

        let observer = Recording::default();
        run_keyword_scan(
            &test_config(),
            files,
            "hello",
            false,
            &CancelToken::new(),
            &observer,
        )
        .unwrap();

        let progress = observer.progress.lock().unwrap();
        assert!(!progress.is_empty());
        assert_eq!(progress.last().unwrap().0, 100);
        let mut prev = 0;
        for (p, _) in progress.iter() {
            assert!(*p >= prev);
            prev = *p;
        }
    }

    #[test]
    fn empty_file_list_fires_done_immediately() {
        let observer = Recording::default();
        let matches = run_keyword_scan(
            &test_config(),
            Vec::new(),
            "anything",
            false,
            &CancelToken::new(),
            &observer,
        )
        .unwrap();
        assert_eq!(matches, 0);
        assert_eq!(*observer.done.lock().unwrap(), vec![0]);
        assert!(observer.progress.lock().unwrap().is_empty());
    }

    #[test]
    fn cancelled_scan_reports_no_matches_and_fires_done_once() {
        let dir = tempfile::TempDir::new().unwrap();
        for i in 0..20 {
            write_txt(&dir, &format!("f{}.txt", i), "hello content");
        }
        let files = collect_files(dir.path(), &test_config()).unwrap();

        let cancel = CancelToken::new();
        cancel.cancel();
        let observer = Recording::default();
        let matches =
            run_keyword_scan(&test_config(), files, "hello", false, &cancel, &observer).unwrap();

        assert_eq!(matches, 0);
        assert!(observer.hits.lock().unwrap().is_empty());
        assert_eq!(observer.done.lock().unwrap().len(), 1);
    }
}
