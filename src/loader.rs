//! Trial record loader
//!
//! Each input file holds one participant's full experiment log: instruction
//! screens, fixation crosses, and the keyboard responses recorded during the
//! search display. Only the response rows are trials. The participant
//! identifier comes from the file name stem, never from the file contents.

use crate::config::ColumnMap;
use crate::trial::TrialRecord;
use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading a participant file
///
/// Any of these aborts the file; rows are never silently skipped.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error(
        "{}:{line}: column '{column}' has invalid {expected} value '{value}'",
        path.display()
    )]
    InvalidValue {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
        expected: &'static str,
    },
}

/// List participant files in `dir` with the given extension, sorted by path
///
/// A missing directory is not an error: it yields no files.
pub fn discover_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        warn!("Data directory {} not found; no participants loaded", dir.display());
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let matches = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == extension);
        if matches {
            files.push(path);
        }
    }

    files.sort();
    debug!("Discovered {} participant files in {}", files.len(), dir.display());
    Ok(files)
}

/// Participant identifier encoded in a file name stem
///
/// Placeholder files (`template.csv`, `pilot.csv`) map to 0 so the corpus
/// assembler drops them.
pub fn participant_from_path(path: &Path) -> i64 {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

/// Load one participant file
pub fn load_participant_file(
    path: &Path,
    columns: &ColumnMap,
) -> Result<Vec<TrialRecord>, LoadError> {
    let file = fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let participant = participant_from_path(path);
    let trials = parse_trials(file, participant, columns, path)?;
    debug!(
        "Loaded {} trials for participant {} from {}",
        trials.len(),
        participant,
        path.display()
    );
    Ok(trials)
}

/// Column positions resolved from the header row
struct ColumnIndex {
    trial_type: usize,
    present: usize,
    set_size: usize,
    conjunction: usize,
    correct: usize,
    rt: usize,
}

impl ColumnIndex {
    fn resolve(
        headers: &StringRecord,
        columns: &ColumnMap,
        path: &Path,
    ) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
        };

        // Canonical name wins when a file carries both
        let set_size = match find(&columns.set_size).or_else(|| find(&columns.set_size_legacy)) {
            Some(index) => index,
            None => {
                return Err(LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: columns.set_size.clone(),
                })
            }
        };

        Ok(Self {
            trial_type: require(&columns.trial_type)?,
            present: require(&columns.present)?,
            set_size,
            conjunction: require(&columns.conjunction)?,
            correct: require(&columns.correct)?,
            rt: require(&columns.rt)?,
        })
    }
}

/// Parse trial records from CSV content
///
/// `source` only labels errors; `participant` tags every record.
pub fn parse_trials<R: Read>(
    reader: R,
    participant: i64,
    columns: &ColumnMap,
    source: &Path,
) -> Result<Vec<TrialRecord>, LoadError> {
    let csv_error = |error: csv::Error| LoadError::Csv {
        path: source.to_path_buf(),
        source: error,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let index = ColumnIndex::resolve(&headers, columns, source)?;

    let mut trials = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;

        if record.get(index.trial_type).map(str::trim) != Some(columns.response_marker.as_str()) {
            continue;
        }

        let line = record.position().map_or(0, |p| p.line());
        trials.push(TrialRecord {
            participant,
            present: CellRef::new(&record, index.present, &columns.present, line, source)
                .to_bool()?,
            set_size: CellRef::new(&record, index.set_size, &columns.set_size, line, source)
                .to_set_size()?,
            conjunction: CellRef::new(
                &record,
                index.conjunction,
                &columns.conjunction,
                line,
                source,
            )
            .to_bool()?,
            correct: CellRef::new(&record, index.correct, &columns.correct, line, source)
                .to_bool()?,
            rt: CellRef::new(&record, index.rt, &columns.rt, line, source).to_int()?,
        });
    }

    Ok(trials)
}

/// A single cell plus the location needed to report a coercion failure
struct CellRef<'a> {
    value: &'a str,
    column: &'a str,
    line: u64,
    path: &'a Path,
}

impl<'a> CellRef<'a> {
    fn new(
        record: &'a StringRecord,
        column: usize,
        name: &'a str,
        line: u64,
        path: &'a Path,
    ) -> Self {
        Self {
            value: record.get(column).unwrap_or(""),
            column: name,
            line,
            path,
        }
    }

    fn invalid(&self, expected: &'static str) -> LoadError {
        LoadError::InvalidValue {
            path: self.path.to_path_buf(),
            line: self.line,
            column: self.column.to_string(),
            value: self.value.to_string(),
            expected,
        }
    }

    fn to_bool(&self) -> Result<bool, LoadError> {
        parse_bool(self.value).ok_or_else(|| self.invalid("boolean"))
    }

    fn to_int(&self) -> Result<i64, LoadError> {
        parse_int(self.value).ok_or_else(|| self.invalid("integer"))
    }

    fn to_set_size(&self) -> Result<i64, LoadError> {
        parse_set_size(self.value).ok_or_else(|| self.invalid("positive integer"))
    }
}

/// Parse the boolean spellings experiment runners emit
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "True" | "TRUE" | "1" => Some(true),
        "false" | "False" | "FALSE" | "0" => Some(false),
        _ => None,
    }
}

/// Parse an integer cell, truncating fractional milliseconds toward zero
pub fn parse_int(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(int) = value.parse::<i64>() {
        return Some(int);
    }
    match value.parse::<f64>() {
        Ok(float) if float.is_finite() && float.abs() < i64::MAX as f64 => {
            Some(float.trunc() as i64)
        }
        _ => None,
    }
}

/// Parse a display set size: a whole number of items, at least one
pub fn parse_set_size(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|&size| size > 0)
}
