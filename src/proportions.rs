//! Boundary-corrected proportion calculator
//!
//! One pass over the record table builds success/total counts per explicit
//! composite key; the corrected proportion is a single parametrized function
//! applied at whichever granularity the caller needs (pooled condition or
//! participant-within-condition).

use crate::record::{Condition, TrialRecord, TrialType};
use std::collections::BTreeMap;

/// Success/total counts for one bucket of trials
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialCounts {
    pub successes: usize,
    pub total: usize,
}

impl TrialCounts {
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.successes += 1;
        }
    }

    /// Raw proportion correct, `None` for an empty bucket.
    pub fn raw_proportion(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.successes as f64 / self.total as f64)
        }
    }

    /// Boundary-corrected proportion correct, `None` for an empty bucket.
    pub fn corrected_proportion(&self) -> Option<f64> {
        corrected_proportion(self.successes, self.total)
    }
}

/// Compute `successes / n` with the SDT boundary correction.
///
/// An exact 1 becomes `1 - 0.5/n` and an exact 0 becomes `0.5/n`, keeping
/// the proportion in the open interval (0,1) so its z-score stays finite.
/// `n == 0` yields `None`; the caller must exclude and flag that group
/// rather than substitute a default.
pub fn corrected_proportion(successes: usize, n: usize) -> Option<f64> {
    if n == 0 {
        return None;
    }
    let p = successes as f64 / n as f64;
    if p == 1.0 {
        Some(1.0 - 0.5 / n as f64)
    } else if p == 0.0 {
        Some(0.5 / n as f64)
    } else {
        Some(p)
    }
}

/// Counts for one group, split by trial type
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupCounts {
    /// Target-left trials
    pub sn: TrialCounts,
    /// Target-right trials
    pub ns: TrialCounts,
    /// All trials regardless of type (for overall accuracy)
    pub overall: TrialCounts,
    /// Rows whose filenames carried no target tag
    pub unknown: usize,
}

impl GroupCounts {
    fn record(&mut self, record: &TrialRecord) {
        self.overall.record(record.correct);
        match record.trial_type {
            TrialType::Sn => self.sn.record(record.correct),
            TrialType::Ns => self.ns.record(record.correct),
            TrialType::Unknown => self.unknown += 1,
        }
    }
}

/// Pool all records of each condition (population level).
///
/// BTreeMap keys keep iteration order stable so output is reproducible
/// across runs.
pub fn pool_by_condition(records: &[TrialRecord]) -> BTreeMap<Condition, GroupCounts> {
    let mut groups: BTreeMap<Condition, GroupCounts> = BTreeMap::new();
    for record in records {
        groups.entry(record.condition).or_default().record(record);
    }
    groups
}

/// Group records by (participant, condition).
pub fn group_by_participant(
    records: &[TrialRecord],
) -> BTreeMap<(String, Condition), GroupCounts> {
    let mut groups: BTreeMap<(String, Condition), GroupCounts> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.participant_id.clone(), record.condition))
            .or_default()
            .record(record);
    }
    groups
}
