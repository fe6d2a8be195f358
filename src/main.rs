//! # deep-scan CLI (`dscan`)
//!
//! The `dscan` binary drives the scanning engine from the command line.
//! Result rows stream to stdout as files complete; progress goes to
//! stderr.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dscan search "<query>" --root <dir>` | Keyword search (literal or `--regex`) |
//! | `dscan similar <file> --root <dir>` | Rank files by token overlap with a reference |
//! | `dscan inspect <ref> <target>` | Paragraph-level comparison of two documents |
//!
//! ## Examples
//!
//! ```bash
//! # Literal phrase across an archive
//! dscan search "liability clause" --root ~/archive
//!
//! # Regex pattern, report exported for the spreadsheet crowd
//! dscan search "inv-[0-9]+" --regex --root ~/archive --export hits.csv
//!
//! # Which files reuse content from this report?
//! dscan similar ~/archive/report.pdf --root ~/archive
//!
//! # Where exactly does the reuse sit, page by page?
//! dscan inspect ~/archive/report.pdf ~/archive/thesis.docx
//! ```

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};

use deep_scan::compare;
use deep_scan::config;
use deep_scan::models::ScanHit;
use deep_scan::progress::{ProgressMode, ScanObserver};
use deep_scan::report::{self, ReportMeta};
use deep_scan::scan::{self, CancelToken};

/// deep-scan — locate content across a mixed-format document archive.
#[derive(Parser)]
#[command(
    name = "dscan",
    about = "Parallel content scanner for mixed-format document archives",
    version,
    long_about = "deep-scan searches folders of PDF, word-processor, and plain-text/code \
    files by keyword or pattern, finds files that reuse a reference file's content, and \
    aligns two documents paragraph by paragraph with page attribution. No index is built; \
    every search re-scans the archive."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Optional; defaults apply when omitted. See `config/dscan.example.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Progress reporting on stderr: off, human, or json.
    ///
    /// Defaults to human when stderr is a terminal, otherwise off.
    #[arg(long, global = true)]
    progress: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the archive for a literal phrase or a regex pattern.
    ///
    /// Literal queries are case-folded and matched across whitespace;
    /// regex queries run against the case-folded text. Matching files
    /// stream to stdout with a context snippet.
    Search {
        /// The phrase or pattern to look for.
        query: String,

        /// Root folder of the archive (scanned recursively).
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Treat the query as a regular expression.
        #[arg(long)]
        regex: bool,

        /// Write a delimited report of the results to this file.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Rank archive files by word-token overlap with a reference file.
    ///
    /// Reports each file whose Jaccard overlap with the reference exceeds
    /// the noise threshold, highest overlap first.
    Similar {
        /// The reference file whose content reuse to look for.
        reference: PathBuf,

        /// Root folder of the archive (scanned recursively).
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Write a delimited report of the results to this file.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Align two documents paragraph by paragraph.
    ///
    /// Prints, for each reference paragraph, the best-matching target
    /// paragraph with both page labels and a similarity score.
    Inspect {
        /// The reference document.
        reference: PathBuf,

        /// The document to compare it against.
        target: PathBuf,
    },
}

/// Streams result rows to stdout as they arrive, collects hits for the
/// report, and forwards everything to the progress reporter.
struct CliObserver {
    inner: Box<dyn ScanObserver>,
    root: PathBuf,
    hits: Mutex<Vec<ScanHit>>,
}

impl CliObserver {
    fn new(inner: Box<dyn ScanObserver>, root: PathBuf) -> CliObserver {
        CliObserver {
            inner,
            root,
            hits: Mutex::new(Vec::new()),
        }
    }

    fn into_hits(self) -> Vec<ScanHit> {
        match self.hits.into_inner() {
            Ok(hits) => hits,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ScanObserver for CliObserver {
    fn on_match(&self, hit: &ScanHit) {
        let name = hit
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let dir = report::relative_dir(&hit.path, &self.root);
        println!("{}\t{}\t{}\t{}", name, dir, hit.location, hit.context);
        let mut hits = match self.hits.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        hits.push(hit.clone());
        self.inner.on_match(hit);
    }

    fn on_progress(&self, percent: u32, current: &str) {
        self.inner.on_progress(percent, current);
    }

    fn on_done(&self, matches: usize) {
        self.inner.on_done(matches);
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;
    let mode = match cli.progress.as_deref() {
        None => ProgressMode::default_for_tty(),
        Some("off") => ProgressMode::Off,
        Some("human") => ProgressMode::Human,
        Some("json") => ProgressMode::Json,
        Some(other) => anyhow::bail!("Unknown progress mode: {}. Use off, human, or json.", other),
    };

    match cli.command {
        Commands::Search {
            query,
            root,
            regex,
            export,
        } => {
            let files = scan::collect_files(&root, &config)?;
            let observer = CliObserver::new(mode.observer(), root.clone());
            let matches = scan::run_keyword_scan(
                &config,
                files,
                &query,
                regex,
                &CancelToken::new(),
                &observer,
            )?;
            println!("Found {} matches.", matches);
            if let Some(output) = export {
                let meta = ReportMeta {
                    root: &root,
                    search_type: "Keyword",
                    query: &query,
                };
                export_report(&output, &meta, observer.into_hits())?;
            }
        }

        Commands::Similar {
            reference,
            root,
            export,
        } => {
            let files = scan::collect_files(&root, &config)?;
            let observer = CliObserver::new(mode.observer(), root.clone());
            let matches = scan::run_similarity_scan(
                &config,
                files,
                &reference,
                &CancelToken::new(),
                &observer,
            )?;
            println!("Found {} matches.", matches);
            if let Some(output) = export {
                let query = reference.display().to_string();
                let meta = ReportMeta {
                    root: &root,
                    search_type: "Similarity",
                    query: &query,
                };
                let mut hits = observer.into_hits();
                // the report lists strongest overlap first
                hits.sort_by(|a, b| {
                    let sa = a.location.score().unwrap_or(0.0);
                    let sb = b.location.score().unwrap_or(0.0);
                    sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
                });
                export_report(&output, &meta, hits)?;
            }
        }

        Commands::Inspect { reference, target } => {
            let results = compare::compare_documents(&reference, &target);
            println!("Ref Page\tTarget Page\tScore\tPreview");
            for r in &results {
                println!(
                    "{}\t{}\t{:.1}%\t{}",
                    r.ref_page, r.target_page, r.score, r.preview
                );
            }
            println!("Analysis complete. Found {} comparisons.", results.len());
        }
    }
    Ok(())
}

fn export_report(output: &Path, meta: &ReportMeta<'_>, hits: Vec<ScanHit>) -> Result<()> {
    report::write_report(output, meta, &hits)?;
    eprintln!("Exported {} rows to {}", hits.len(), output.display());
    Ok(())
}
