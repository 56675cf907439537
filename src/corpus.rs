//! Loading prompt collections and generator corpora from CSV.
//!
//! Two layouts are understood:
//! - prompts: `act,prompt,for_devs`
//! - vibe prompts: `app,prompt,contributor,techstack`
//!
//! The first row is always a header. Rows with too few cells are skipped
//! with a warning rather than failing the whole file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CorpusError, Result};

const GITHUB_BASE: &str = "https://github.com/";
const PROJECT_URL: &str = "https://github.com/banghuazhao/ai-prompts";
const GENERATED_APP_NAME: &str = "AI Generated App";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptRecord {
    pub act: String,
    pub prompt: String,
    pub for_devs: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VibePromptRecord {
    pub app: String,
    pub prompt: String,
    pub contributor: String,
    pub techstack: String,
}

impl VibePromptRecord {
    /// Draft for freshly generated prompt text, ready to be edited.
    pub fn generated(prompt: impl Into<String>) -> Self {
        Self {
            app: GENERATED_APP_NAME.to_string(),
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn techstack_list(&self) -> Vec<&str> {
        self.techstack
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Profile URL for the contributor handle, with one leading '@' dropped.
    /// Handles that cannot form a URL path point at the project instead.
    pub fn contributor_github_url(&self) -> String {
        let user = self
            .contributor
            .strip_prefix('@')
            .unwrap_or(&self.contributor);
        if user.contains(char::is_whitespace) {
            return PROJECT_URL.to_string();
        }
        format!("{GITHUB_BASE}{user}")
    }
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| CorpusError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn cell(record: &csv::StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or_default().trim().to_string()
}

/// Read rows with at least `min_cells` cells, mapping each through `f`.
fn read_rows<R, T, F>(reader: R, min_cells: usize, kind: &str, f: F) -> Result<Vec<T>>
where
    R: Read,
    F: Fn(&csv::StringRecord) -> T,
{
    let mut rdr = csv_reader(reader);
    let mut out = Vec::new();
    let mut skipped = 0usize;

    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        if row.len() < min_cells {
            // +2: one for the header, one for 1-based lines
            warn!(line = i + 2, cells = row.len(), "skipping short {kind} row");
            skipped += 1;
            continue;
        }
        out.push(f(&row));
    }

    debug!(rows = out.len(), skipped, "loaded {kind} records");
    Ok(out)
}

pub fn read_prompts<R: Read>(reader: R) -> Result<Vec<PromptRecord>> {
    read_rows(reader, 3, "prompt", |row| PromptRecord {
        act: cell(row, 0),
        prompt: cell(row, 1),
        for_devs: cell(row, 2).eq_ignore_ascii_case("true"),
    })
}

pub fn read_vibe_prompts<R: Read>(reader: R) -> Result<Vec<VibePromptRecord>> {
    read_rows(reader, 4, "vibe prompt", |row| VibePromptRecord {
        app: cell(row, 0),
        prompt: cell(row, 1),
        contributor: cell(row, 2),
        techstack: cell(row, 3),
    })
}

/// Collect the non-empty, trimmed cells of the column named `column`.
pub fn corpus_column<R: Read>(reader: R, column: &str) -> Result<Vec<String>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    let idx = headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| CorpusError::MissingColumn {
            column: column.to_string(),
            available: headers.iter().map(str::to_string).collect(),
        })?;

    let mut corpus = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let text = cell(&row, idx);
        if !text.is_empty() {
            corpus.push(text);
        }
    }

    debug!(column, entries = corpus.len(), "loaded corpus");
    Ok(corpus)
}

pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<Vec<PromptRecord>> {
    read_prompts(open(path.as_ref())?)
}

pub fn load_vibe_prompts<P: AsRef<Path>>(path: P) -> Result<Vec<VibePromptRecord>> {
    read_vibe_prompts(open(path.as_ref())?)
}

pub fn load_corpus<P: AsRef<Path>>(path: P, column: &str) -> Result<Vec<String>> {
    corpus_column(open(path.as_ref())?, column)
}
