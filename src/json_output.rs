//! JSON output format for analysis runs
//!
//! `--format json` serializes the whole run: ingestion audit (valid and
//! skipped sources) plus the full analysis report.

use crate::analysis::AnalysisReport;
use crate::ingest::Ingestion;
use serde::Serialize;

/// A source that failed to parse
#[derive(Debug, Clone, Serialize)]
pub struct JsonSkippedSource {
    pub file: String,
    pub reason: String,
}

/// Top-level JSON document for one analysis run
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Folder that was scanned
    pub folder: String,
    /// Number of sources that parsed
    pub valid_sources: usize,
    /// Sources skipped with their parse errors
    pub skipped_sources: Vec<JsonSkippedSource>,
    /// Full aggregation output
    pub analysis: &'a AnalysisReport,
}

impl<'a> JsonReport<'a> {
    pub fn new(folder: &str, ingestion: &Ingestion, analysis: &'a AnalysisReport) -> Self {
        Self {
            folder: folder.to_string(),
            valid_sources: ingestion.valid_sources,
            skipped_sources: ingestion
                .skipped
                .iter()
                .map(|s| JsonSkippedSource {
                    file: s.file.clone(),
                    reason: s.reason.clone(),
                })
                .collect(),
            analysis,
        }
    }

    /// Render as pretty-printed JSON
    pub fn to_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    #[test]
    fn test_json_report_structure() {
        let ingestion = Ingestion {
            records: Vec::new(),
            skipped: vec![crate::ingest::SkippedSource {
                file: "bad.csv".to_string(),
                reason: "Empty file (no header row)".to_string(),
            }],
            valid_sources: 1,
        };
        let analysis = analyze(&ingestion.records);
        let report = JsonReport::new("class_data", &ingestion, &analysis);
        let json = report.to_string_pretty().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["folder"], "class_data");
        assert_eq!(value["valid_sources"], 1);
        assert_eq!(value["skipped_sources"][0]["file"], "bad.csv");
        assert_eq!(value["analysis"]["total_trials"], 0);
        assert_eq!(
            value["analysis"]["d_prime_test"]["outcome"],
            "insufficient_data"
        );
    }
}
