//! Combined-table CSV export
//!
//! Writes the audit export: every ingested row annotated with its assigned
//! participant, source file, condition, and trial type (the original
//! pipeline's `eyewitnesstotal.csv`).

use crate::record::TrialRecord;
use std::io::Write;
use std::path::Path;

const HEADER: &str =
    "participant_id,source_file,left_image,right_image,encoding_duration,condition,trial_type,correct";

/// Combined-table CSV formatter
#[derive(Debug, Default)]
pub struct CombinedTableCsv;

impl CombinedTableCsv {
    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_record(record: &TrialRecord) -> String {
        [
            Self::escape_field(&record.participant_id),
            Self::escape_field(&record.source_file),
            Self::escape_field(&record.left_image),
            Self::escape_field(&record.right_image),
            record.encoding_duration.to_string(),
            record.condition.to_string(),
            record.trial_type.to_string(),
            if record.correct { "1" } else { "0" }.to_string(),
        ]
        .join(",")
    }

    /// Generate the full export as a string
    pub fn to_csv(records: &[TrialRecord]) -> String {
        let mut output = String::new();
        output.push_str(HEADER);
        output.push('\n');
        for record in records {
            output.push_str(&Self::format_record(record));
            output.push('\n');
        }
        output
    }

    /// Write the export to a file
    pub fn write_to(records: &[TrialRecord], path: &Path) -> std::io::Result<()> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(Self::to_csv(records).as_bytes())
    }
}
