//! Trial record ingestion
//!
//! Scans a folder for per-participant CSV outcome logs and normalizes them
//! into a single ordered table of [`TrialRecord`]s. Participant IDs are
//! assigned by file index over the sorted listing, so two runs over the same
//! folder produce identical IDs. A malformed source is logged and skipped;
//! only zero valid sources is fatal.

use crate::error::{AnalysisError, Result};
use crate::record::{Condition, TrialRecord, TrialType};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Per-source parse failures. These never abort ingestion; they become
/// [`SkippedSource`] entries in the result.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required column '{0}' in header")]
    MissingColumn(String),

    #[error("Empty file (no header row)")]
    Empty,

    #[error("Line {line}: expected {expected} fields, got {actual}")]
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Line {line}: bad value '{value}' for column '{column}'")]
    BadValue {
        line: usize,
        column: String,
        value: String,
    },
}

/// A source that failed to parse, kept for the audit report
#[derive(Debug)]
pub struct SkippedSource {
    pub file: String,
    pub reason: String,
}

/// Result of ingesting one folder
#[derive(Debug)]
pub struct Ingestion {
    /// All rows from valid sources, in source order then row order
    pub records: Vec<TrialRecord>,
    /// Sources that failed to parse
    pub skipped: Vec<SkippedSource>,
    /// Number of sources that parsed successfully
    pub valid_sources: usize,
}

/// Columns every source must carry
const REQUIRED_COLUMNS: [&str; 4] = ["left_image", "right_image", "encoding_duration", "correct"];

/// Ingest every `*.csv` file in `folder`.
///
/// Returns `AnalysisError::NoData` when no source parses; partial failures
/// are reported in `Ingestion::skipped`.
pub fn ingest_folder(folder: &Path) -> Result<Ingestion> {
    let files = list_csv_files(folder)?;
    let mut ingestion = Ingestion {
        records: Vec::new(),
        skipped: Vec::new(),
        valid_sources: 0,
    };

    for (index, path) in files.iter().enumerate() {
        // Participant IDs follow the file index, so a skipped source still
        // consumes its slot and later IDs stay stable.
        let participant_id = format!("participant_{}", index + 1);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match parse_file(path, &participant_id, &file_name) {
            Ok(rows) => {
                debug!(file = %file_name, rows = rows.len(), "ingested source");
                ingestion.records.extend(rows);
                ingestion.valid_sources += 1;
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "skipping unreadable source");
                ingestion.skipped.push(SkippedSource {
                    file: file_name,
                    reason: e.to_string(),
                });
            }
        }
    }

    if ingestion.valid_sources == 0 {
        return Err(AnalysisError::NoData {
            folder: folder.display().to_string(),
        });
    }

    Ok(ingestion)
}

/// List `*.csv` files in sorted filename order for deterministic IDs.
fn list_csv_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(folder).map_err(|e| AnalysisError::FolderRead {
        folder: folder.display().to_string(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn parse_file(
    path: &Path,
    participant_id: &str,
    source_file: &str,
) -> std::result::Result<Vec<TrialRecord>, SourceError> {
    let reader = BufReader::new(File::open(path)?);
    parse_source(reader, participant_id, source_file)
}

/// Parse one already-opened source into trial records.
///
/// Generic over the reader so tests can feed in-memory CSV text.
pub fn parse_source<R: BufRead>(
    reader: R,
    participant_id: &str,
    source_file: &str,
) -> std::result::Result<Vec<TrialRecord>, SourceError> {
    let mut lines = reader.lines();

    let header_line = match lines.next() {
        Some(line) => line?,
        None => return Err(SourceError::Empty),
    };
    let header = split_csv_line(&header_line);
    let columns = ColumnIndex::from_header(&header)?;

    let mut records = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_csv_line(&line);
        if fields.len() != header.len() {
            return Err(SourceError::FieldCount {
                line: line_no + 2,
                expected: header.len(),
                actual: fields.len(),
            });
        }
        records.push(columns.build_record(&fields, line_no + 2, participant_id, source_file)?);
    }

    Ok(records)
}

/// Resolved positions of the required columns within one source's header
struct ColumnIndex {
    left_image: usize,
    right_image: usize,
    encoding_duration: usize,
    correct: usize,
}

impl ColumnIndex {
    fn from_header(header: &[String]) -> std::result::Result<Self, SourceError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| SourceError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            left_image: find(REQUIRED_COLUMNS[0])?,
            right_image: find(REQUIRED_COLUMNS[1])?,
            encoding_duration: find(REQUIRED_COLUMNS[2])?,
            correct: find(REQUIRED_COLUMNS[3])?,
        })
    }

    fn build_record(
        &self,
        fields: &[String],
        line: usize,
        participant_id: &str,
        source_file: &str,
    ) -> std::result::Result<TrialRecord, SourceError> {
        let left_image = fields[self.left_image].trim().to_string();
        let right_image = fields[self.right_image].trim().to_string();

        let duration_raw = fields[self.encoding_duration].trim();
        let encoding_duration: f64 =
            duration_raw
                .parse()
                .map_err(|_| SourceError::BadValue {
                    line,
                    column: "encoding_duration".to_string(),
                    value: duration_raw.to_string(),
                })?;

        let correct_raw = fields[self.correct].trim();
        let correct = parse_correct(correct_raw).ok_or_else(|| SourceError::BadValue {
            line,
            column: "correct".to_string(),
            value: correct_raw.to_string(),
        })?;

        let trial_type = TrialType::classify(&left_image, &right_image);
        let condition = Condition::from_duration(encoding_duration);

        Ok(TrialRecord {
            participant_id: participant_id.to_string(),
            source_file: source_file.to_string(),
            left_image,
            right_image,
            encoding_duration,
            condition,
            trial_type,
            correct,
        })
    }
}

/// Accept the boolean spellings experiment frameworks emit: 0/1, true/false,
/// and float-formatted 0.0/1.0.
fn parse_correct(value: &str) -> Option<bool> {
    match value {
        "1" | "1.0" => Some(true),
        "0" | "0.0" => Some(false),
        _ => match value.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
    }
}

/// Split one CSV line into fields, honoring double-quoted fields with
/// doubled-quote escapes (the inverse of the writer's `escape_field`).
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
