//! Multi-format text extraction (PDF, OOXML word-processor, plain text).
//!
//! Extraction never fails outward: a corrupt, unreadable, or unsupported
//! file degrades to empty text so that one bad file can never abort a
//! multi-thousand-file scan. The fallible paths are `Result`-typed
//! internally; the empty-on-failure contract is applied at the public
//! boundary.

use std::io::Read;
use std::path::Path;

use anyhow::Result;

use crate::models::{DocKind, Page};

/// Maximum decompressed bytes to read from a single ZIP entry (zip-bomb
/// protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Extract the full concatenated text of a document.
///
/// Unrecognized extensions are treated as plain text; upstream enumeration
/// is what gates the candidate set, not the extractor.
pub fn extract_text(path: &Path) -> String {
    match DocKind::from_path(path) {
        Some(DocKind::Pdf) => pdf_text(path).unwrap_or_default(),
        Some(DocKind::Word) => docx_text(path).unwrap_or_default(),
        Some(DocKind::Text) | None => plain_text(path).unwrap_or_default(),
    }
}

/// Extract a document as an ordered sequence of labeled pages.
///
/// Only PDFs carry native pagination; other kinds produce a single page
/// labeled "1". Extraction failure yields an empty page list.
pub fn extract_pages(path: &Path) -> Vec<Page> {
    match DocKind::from_path(path) {
        Some(DocKind::Pdf) => pdf_pages(path).unwrap_or_default(),
        Some(DocKind::Word) => single_page(docx_text(path)),
        Some(DocKind::Text) | None => single_page(plain_text(path)),
    }
}

fn single_page(text: Result<String>) -> Vec<Page> {
    match text {
        Ok(text) => vec![Page {
            label: "1".to_string(),
            text,
        }],
        Err(_) => Vec::new(),
    }
}

fn pdf_text(path: &Path) -> Result<String> {
    let pages =
        pdf_extract::extract_text_by_pages(path).map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(pages.join("\n"))
}

fn pdf_pages(path: &Path) -> Result<Vec<Page>> {
    let pages =
        pdf_extract::extract_text_by_pages(path).map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(pages
        .into_iter()
        .enumerate()
        .map(|(i, text)| Page {
            label: (i + 1).to_string(),
            text,
        })
        .collect())
}

/// Read `word/document.xml` out of the OOXML container and join the `<w:t>`
/// runs, one line per `<w:p>` paragraph. Legacy binary `.doc` files have no
/// OOXML container, so they fall out here as an error and degrade to empty.
fn docx_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes.as_slice()))?;
    let mut doc_xml = Vec::new();
    {
        let entry = archive.by_name("word/document.xml")?;
        entry.take(MAX_XML_ENTRY_BYTES).read_to_end(&mut doc_xml)?;
        if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
            anyhow::bail!("word/document.xml exceeds size limit");
        }
    }
    paragraphs_from_document_xml(&doc_xml)
}

fn paragraphs_from_document_xml(xml: &[u8]) -> Result<String> {
    let mut out = String::new();
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    if let Ok(quick_xml::events::Event::Text(te)) = reader.read_event_into(&mut buf)
                    {
                        out.push_str(te.unescape().unwrap_or_default().as_ref());
                    }
                }
            }
            Ok(quick_xml::events::Event::End(e)) => {
                // paragraphs joined by newline, matching document order
                if e.local_name().as_ref() == b"p" {
                    out.push('\n');
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Plain-text read: any byte sequence is accepted, invalid sequences are
/// replaced rather than raised. CRLF is normalized so paragraph splitting
/// sees uniform newlines.
fn plain_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).replace("\r\n", "\n"))
}
