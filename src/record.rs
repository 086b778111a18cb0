//! Trial record model and classifier
//!
//! One `TrialRecord` per two-alternative forced-choice trial. Records are
//! created once at ingestion and read-only afterwards; everything downstream
//! (proportions, SDT metrics) is derived per analysis run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding-duration condition. Durations under one second are Short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Short,
    Long,
}

impl Condition {
    /// Derive the condition from the encoding duration in seconds.
    pub fn from_duration(seconds: f64) -> Self {
        if seconds < 1.0 {
            Condition::Short
        } else {
            Condition::Long
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Short => write!(f, "short"),
            Condition::Long => write!(f, "long"),
        }
    }
}

/// Which slot held the target stimulus.
///
/// SN (signal-noise): target on the left. NS (noise-signal): target on the
/// right. Unknown marks a labeling defect in the upstream stimulus files; it
/// is a legitimate bucket surfaced in the report, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrialType {
    #[serde(rename = "SN")]
    Sn,
    #[serde(rename = "NS")]
    Ns,
    Unknown,
}

impl TrialType {
    /// Classify a trial from its two stimulus filenames.
    ///
    /// Applied independently per row; no cross-row state. The check runs on
    /// the basename, so a directory-qualified path like `stim/target_03.png`
    /// classifies the same as `target_03.png`.
    pub fn classify(left_image: &str, right_image: &str) -> Self {
        if basename(left_image).starts_with("target") {
            TrialType::Sn
        } else if basename(right_image).starts_with("target") {
            TrialType::Ns
        } else {
            TrialType::Unknown
        }
    }
}

impl fmt::Display for TrialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialType::Sn => write!(f, "SN"),
            TrialType::Ns => write!(f, "NS"),
            TrialType::Unknown => write!(f, "Unknown"),
        }
    }
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// A single trial outcome, annotated at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Assigned per source file at ingestion (`participant_1`, ...)
    pub participant_id: String,
    /// Source file the row came from
    pub source_file: String,
    /// Left-slot stimulus filename
    pub left_image: String,
    /// Right-slot stimulus filename
    pub right_image: String,
    /// Encoding duration in seconds
    pub encoding_duration: f64,
    /// Derived from `encoding_duration`
    pub condition: Condition,
    /// Derived from the stimulus filenames
    pub trial_type: TrialType,
    /// Whether the participant chose the target
    pub correct: bool,
}
