use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use std::path::{Component, Path};
use tokio::fs;

use crate::error::{Error, ReadError, Result};
use crate::{FENCE, PATH_MARKER};

static FORBIDDEN_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"|?*]"#).expect("valid regex"));

/// Extensions a restored record may carry. Anything else is rejected so a
/// malformed bundle cannot scatter arbitrary files around.
const ALLOWED_EXTENSIONS: [&str; 10] = [
    "go", "py", "js", "ts", "json", "md", "txt", "yml", "yaml", "sql",
];

/// One file parsed back out of a bundle: its relative path and its raw
/// content lines, before any trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub path: String,
    pub lines: Vec<String>,
}

/// Line-by-line bundle parser.
///
/// A `// ` marker line opens a record and names its file. The first fence
/// line after the marker starts the content; every later fence line is kept
/// verbatim so fenced blocks inside a bundled file survive. Only the next
/// marker ends a record, meaning stray lines after the closing fence still
/// belong to the open record, exactly as this format has always been read.
#[derive(Debug, Default)]
pub struct RecordParser {
    current_path: Option<String>,
    buffer: Vec<String>,
    in_fence: bool,
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line, returning the previous record when `line` closes it.
    ///
    /// A marker line wins over every other interpretation, even inside a
    /// fence; a content line that itself starts with `// ` cannot be told
    /// apart from a marker.
    pub fn feed(&mut self, line: &str) -> Option<Record> {
        if let Some(rest) = line.strip_prefix(PATH_MARKER) {
            let finished = self.take_record();
            let path = rest.trim();
            self.current_path = if path.is_empty() {
                None
            } else {
                Some(path.to_string())
            };
            self.in_fence = false;
            return finished;
        }

        if line.starts_with(FENCE) {
            if !self.in_fence {
                self.in_fence = true;
            } else if self.current_path.is_some() {
                self.buffer.push(line.to_string());
            }
            return None;
        }

        if self.in_fence && self.current_path.is_some() {
            self.buffer.push(line.to_string());
        }
        None
    }

    /// Flushes the record still open at end of input.
    pub fn finish(&mut self) -> Option<Record> {
        self.take_record()
    }

    fn take_record(&mut self) -> Option<Record> {
        let path = self.current_path.as_ref()?;
        if self.buffer.is_empty() {
            return None;
        }
        Some(Record {
            path: path.clone(),
            lines: std::mem::take(&mut self.buffer),
        })
    }
}

/// What a restore run did: files written and records turned away.
#[derive(Debug, Default)]
pub struct RestoreSummary {
    pub written: Vec<String>,
    pub rejected: Vec<Error>,
}

/// Parses `input` and materializes every record under `dest_root`.
///
/// A record with an unusable path is logged, recorded in the summary and
/// skipped; the remaining records are still written. I/O failures while
/// creating directories or files abort the run.
pub async fn restore_files(input: &Path, dest_root: &Path) -> Result<RestoreSummary> {
    let content = match fs::read_to_string(input).await {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(Error::MissingInput(input.to_path_buf()));
        }
        Err(err) => {
            return Err(Error::Read {
                path: input.to_path_buf(),
                source: ReadError::Io(err),
            });
        }
    };

    let mut parser = RecordParser::new();
    let mut summary = RestoreSummary::default();

    for line in content.lines() {
        if let Some(record) = parser.feed(line) {
            save_and_tally(dest_root, record, &mut summary).await?;
        }
    }
    if let Some(record) = parser.finish() {
        save_and_tally(dest_root, record, &mut summary).await?;
    }

    Ok(summary)
}

async fn save_and_tally(
    dest_root: &Path,
    record: Record,
    summary: &mut RestoreSummary,
) -> Result<()> {
    match save_record(dest_root, record).await {
        Ok(path) => summary.written.push(path),
        Err(err @ Error::InvalidPath { .. }) => {
            warn!("skipping record: {err}");
            summary.rejected.push(err);
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

/// Validates and writes one record relative to `dest_root`, creating parent
/// directories as needed. Returns the record's relative path.
async fn save_record(dest_root: &Path, record: Record) -> Result<String> {
    validate_record_path(&record.path)?;

    let target = dest_root.join(&record.path);
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| Error::write(parent, source))?;
        }
    }

    let mut lines = record.lines;
    trim_record_lines(&mut lines);

    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }

    fs::write(&target, text)
        .await
        .map_err(|source| Error::write(&target, source))?;

    info!("created file: {}", record.path);
    Ok(record.path)
}

fn validate_record_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::invalid_path(path, "path is empty"));
    }
    if FORBIDDEN_CHARS_RE.is_match(path) {
        return Err(Error::invalid_path(path, "forbidden character"));
    }

    let as_path = Path::new(path);
    if as_path.is_absolute() || as_path.has_root() {
        return Err(Error::invalid_path(path, "absolute path"));
    }
    if as_path
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(Error::invalid_path(path, "path escapes the destination"));
    }

    let allowed = as_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .map_or(false, |ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    if !allowed {
        return Err(Error::invalid_path(path, "extension not allowed"));
    }

    Ok(())
}

/// Strips blank lines from both ends, then the single leftover closing
/// fence. No second blank pass: blanks that sat above the fence survive.
fn trim_record_lines(lines: &mut Vec<String>) {
    let keep_from = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    lines.drain(..keep_from);

    while lines.last().map_or(false, |l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.last().map_or(false, |l| l.trim() == FENCE) {
        lines.pop();
    }
}
