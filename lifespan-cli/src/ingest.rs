//! CSV ingestion
//!
//! Reads `name,birth[,death]` lines into raw rows for the sweep library.
//! Year parsing is left to the library so that every rejection carries the
//! same line-numbered error.

use anyhow::{Context, Result};
use lifespan_sweep::RawRecord;
use rayon::prelude::*;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// Problems with a single CSV line (logged, never fatal)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("line {line}: expected at least name and birth year, found {found} field(s)")]
    MissingFields { line: usize, found: usize },
}

/// Rows read from one input file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub rows: Vec<RawRecord>,
    pub skipped: Vec<IngestError>,
}

/// Split CSV text into raw rows
///
/// Blank lines are ignored. A third field that is missing or blank means the
/// person is still alive; anything past the third field is ignored.
pub fn parse_csv(text: &str) -> (Vec<RawRecord>, Vec<IngestError>) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut skipped = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 2 {
            let error = IngestError::MissingFields {
                line: line_no,
                found: fields.len(),
            };
            log::warn!("{}", error);
            skipped.push(error);
            continue;
        }

        let death = fields
            .get(2)
            .filter(|death| !death.is_empty())
            .map(|death| death.to_string());
        rows.push(RawRecord::new(line_no, fields[0], fields[1], death));
    }

    (rows, skipped)
}

/// Read and split a single CSV file
///
/// Bytes that are not valid UTF-8 are replaced, so they only spoil the line
/// they sit on.
pub fn read_source(path: &Path) -> Result<SourceFile> {
    log::info!("Reading {:?}", path);
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read input file: {:?}", path))?;
    let text = String::from_utf8_lossy(&bytes);
    if matches!(text, Cow::Owned(_)) {
        log::warn!("{:?} is not valid UTF-8; invalid bytes replaced", path);
    }

    let (rows, skipped) = parse_csv(&text);
    log::debug!("{:?}: {} rows, {} lines skipped", path, rows.len(), skipped.len());

    Ok(SourceFile {
        path: path.to_path_buf(),
        rows,
        skipped,
    })
}

/// Read several files in parallel, keeping the order they were given in
pub fn read_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths.par_iter().map(|path| read_source(path)).collect()
}
