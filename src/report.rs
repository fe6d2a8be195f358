//! Delimited report export.
//!
//! Writes the result table the front end would export: a header block
//! (timestamp, root folder, search type, query) followed by one row per
//! hit (file name, relative directory, location-or-score, context, full
//! path). This is the only durable artifact a scan produces.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use crate::models::ScanHit;

/// Context for the report header block.
pub struct ReportMeta<'a> {
    pub root: &'a Path,
    pub search_type: &'a str,
    pub query: &'a str,
}

pub fn write_report(output: &Path, meta: &ReportMeta<'_>, hits: &[ScanHit]) -> Result<()> {
    let mut out = String::new();
    out.push_str(&row(&[
        "Report:",
        &Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "Root:",
        &meta.root.display().to_string(),
    ]));
    out.push_str(&row(&["Type:", meta.search_type, "Query:", meta.query, ""]));
    out.push_str(&row(&["File", "Dir", "Loc/Score", "Context", "Path"]));
    for hit in hits {
        let name = hit
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let dir = relative_dir(&hit.path, meta.root);
        out.push_str(&row(&[
            &name,
            &dir,
            &hit.location.to_string(),
            &hit.context,
            &hit.path.display().to_string(),
        ]));
    }
    std::fs::write(output, out)
        .with_context(|| format!("Failed to write report: {}", output.display()))?;
    Ok(())
}

/// The hit's directory relative to the scan root, or the absolute parent
/// when the hit lies outside the root.
pub fn relative_dir(path: &Path, root: &Path) -> String {
    let parent = path.parent().unwrap_or(path);
    parent
        .strip_prefix(root)
        .unwrap_or(parent)
        .display()
        .to_string()
}

fn row(fields: &[&str]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&quote(field));
    }
    line.push('\n');
    line
}

fn quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HitLocation;
    use std::path::PathBuf;

    #[test]
    fn report_has_header_block_and_one_row_per_hit() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("report.csv");
        let hits = vec![ScanHit {
            path: PathBuf::from("/archive/sub/a.txt"),
            location: HitLocation::Text,
            context: "...hello world...".to_string(),
        }];
        let meta = ReportMeta {
            root: Path::new("/archive"),
            search_type: "Keyword",
            query: "hello",
        };
        write_report(&out, &meta, &hits).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Report:,"));
        assert!(lines[1].contains("Keyword"));
        assert!(lines[1].contains("hello"));
        assert_eq!(lines[2], "File,Dir,Loc/Score,Context,Path");
        assert!(lines[3].starts_with("a.txt,sub,Text,"));
        assert!(lines[3].ends_with("/archive/sub/a.txt"));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("report.csv");
        let hits = vec![ScanHit {
            path: PathBuf::from("/archive/a.txt"),
            location: HitLocation::Score(40.0),
            context: "one, two, three".to_string(),
        }];
        let meta = ReportMeta {
            root: Path::new("/archive"),
            search_type: "Similarity",
            query: "/archive/ref.txt",
        };
        write_report(&out, &meta, &hits).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.contains("\"one, two, three\""));
        assert!(content.contains("40.0%"));
    }

    #[test]
    fn relative_dir_falls_back_to_absolute_outside_the_root() {
        assert_eq!(
            relative_dir(Path::new("/archive/x/a.txt"), Path::new("/archive")),
            "x"
        );
        assert_eq!(
            relative_dir(Path::new("/elsewhere/a.txt"), Path::new("/archive")),
            "/elsewhere"
        );
    }
}
