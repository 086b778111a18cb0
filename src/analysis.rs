//! Aggregation and significance testing
//!
//! Rolls trial records up to two independent levels: pooled per-condition
//! metrics (population) and per-(participant, condition) metrics, each with
//! its own boundary correction. Participant-level d' and lambda fuel paired
//! t-tests between the Short and Long conditions, matched by participant.

use crate::proportions::{group_by_participant, pool_by_condition, GroupCounts};
use crate::record::{Condition, TrialRecord, TrialType};
use crate::sdt::SdtMetrics;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;

/// Pooled metrics for one condition
#[derive(Debug, Clone, Serialize)]
pub struct ConditionSummary {
    pub condition: Condition,
    /// Overall proportion correct across all trials of the condition
    pub overall_accuracy: f64,
    /// `1 - overall_accuracy`
    pub error_rate: f64,
    /// Corrected SN proportion
    pub p_sn: f64,
    /// Corrected NS proportion
    pub p_ns: f64,
    pub metrics: SdtMetrics,
    pub trials: usize,
}

/// Metrics for one (participant, condition) pair
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantMetrics {
    pub participant_id: String,
    pub condition: Condition,
    pub p_sn: f64,
    pub p_ns: f64,
    pub metrics: SdtMetrics,
    /// Proportion correct over every trial of the pair, Unknown rows included
    pub proportion_correct: f64,
}

/// A (group, trial type) partition with zero records, excluded from SDT
/// output and surfaced in the report.
#[derive(Debug, Clone, Serialize)]
pub struct DegenerateGroup {
    pub group: String,
    pub trial_type: TrialType,
}

/// Result of one paired two-tailed t-test
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PairedTestOutcome {
    Computed(PairedTest),
    /// Fewer than 2 matched participants across conditions
    InsufficientData { pairs: usize },
}

/// t-statistic and two-tailed p-value over matched participant pairs
#[derive(Debug, Clone, Serialize)]
pub struct PairedTest {
    pub statistic: f64,
    pub pvalue: f64,
    pub df: f64,
    pub pairs: usize,
}

/// Min/max of one participant-level distribution, for outlier sanity checks
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    fn of(values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let mut range = MinMax {
            min: first,
            max: first,
        };
        for &v in &values[1..] {
            range.min = range.min.min(v);
            range.max = range.max.max(v);
        }
        Some(range)
    }
}

/// Per-condition diagnostics across participant-level results
#[derive(Debug, Clone, Serialize)]
pub struct ConditionDiagnostics {
    pub condition: Condition,
    pub d_prime: Option<MinMax>,
    pub proportion_correct: Option<MinMax>,
}

/// The two per-participant proportion-correct distributions, ordered for
/// boxplot rendering by an external collaborator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoxplotData {
    pub short: Vec<f64>,
    pub long: Vec<f64>,
}

/// Full analysis output for one run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub total_trials: usize,
    /// Rows with no target tag in either slot
    pub unknown_trials: usize,
    pub population: Vec<ConditionSummary>,
    pub participants: Vec<ParticipantMetrics>,
    pub degenerate_groups: Vec<DegenerateGroup>,
    pub d_prime_test: PairedTestOutcome,
    pub lambda_test: PairedTestOutcome,
    pub diagnostics: Vec<ConditionDiagnostics>,
    pub boxplot: BoxplotData,
}

/// Run the full aggregation over an ingested record table.
///
/// Deterministic: grouping uses ordered maps and all math is closed-form
/// f64, so identical inputs reproduce identical output bit-for-bit.
pub fn analyze(records: &[TrialRecord]) -> AnalysisReport {
    let mut degenerate_groups = Vec::new();

    // Population level: pool per condition, correct once at that granularity
    let mut population = Vec::new();
    for (condition, counts) in pool_by_condition(records) {
        let group = format!("condition {condition}");
        match sdt_from_counts(&counts, &group, &mut degenerate_groups) {
            Some((p_sn, p_ns, metrics)) => {
                // overall is non-empty whenever the condition has any rows
                let overall = counts.overall.raw_proportion().unwrap_or(0.0);
                population.push(ConditionSummary {
                    condition,
                    overall_accuracy: overall,
                    error_rate: 1.0 - overall,
                    p_sn,
                    p_ns,
                    metrics,
                    trials: counts.overall.total,
                });
            }
            None => debug!(%condition, "condition excluded from population metrics"),
        }
    }

    // Participant level: own correction per (participant, condition)
    let mut participants = Vec::new();
    for ((participant_id, condition), counts) in group_by_participant(records) {
        let group = format!("{participant_id} / {condition}");
        if let Some((p_sn, p_ns, metrics)) = sdt_from_counts(&counts, &group, &mut degenerate_groups)
        {
            participants.push(ParticipantMetrics {
                participant_id,
                condition,
                p_sn,
                p_ns,
                metrics,
                proportion_correct: counts.overall.raw_proportion().unwrap_or(0.0),
            });
        }
    }

    // Matched pairs: a participant contributes only with valid metrics in
    // both conditions.
    let pairs = matched_pairs(&participants);
    let d_prime_test = paired_t_test(
        &pairs
            .iter()
            .map(|(s, l)| (s.metrics.d_prime, l.metrics.d_prime))
            .collect::<Vec<_>>(),
    );
    let lambda_test = paired_t_test(
        &pairs
            .iter()
            .map(|(s, l)| (s.metrics.lambda, l.metrics.lambda))
            .collect::<Vec<_>>(),
    );

    let diagnostics = [Condition::Short, Condition::Long]
        .into_iter()
        .map(|condition| {
            let of_condition: Vec<&ParticipantMetrics> = participants
                .iter()
                .filter(|p| p.condition == condition)
                .collect();
            ConditionDiagnostics {
                condition,
                d_prime: MinMax::of(
                    &of_condition
                        .iter()
                        .map(|p| p.metrics.d_prime)
                        .collect::<Vec<_>>(),
                ),
                proportion_correct: MinMax::of(
                    &of_condition
                        .iter()
                        .map(|p| p.proportion_correct)
                        .collect::<Vec<_>>(),
                ),
            }
        })
        .collect();

    let mut boxplot = BoxplotData::default();
    for p in &participants {
        match p.condition {
            Condition::Short => boxplot.short.push(p.proportion_correct),
            Condition::Long => boxplot.long.push(p.proportion_correct),
        }
    }

    AnalysisReport {
        total_trials: records.len(),
        unknown_trials: records
            .iter()
            .filter(|r| r.trial_type == TrialType::Unknown)
            .count(),
        population,
        participants,
        degenerate_groups,
        d_prime_test,
        lambda_test,
        diagnostics,
        boxplot,
    }
}

/// Corrected proportions plus metrics for one group, or `None` (with the
/// empty partitions flagged) when either SDT bucket has no records.
fn sdt_from_counts(
    counts: &GroupCounts,
    group: &str,
    degenerate: &mut Vec<DegenerateGroup>,
) -> Option<(f64, f64, SdtMetrics)> {
    let p_sn = counts.sn.corrected_proportion();
    let p_ns = counts.ns.corrected_proportion();

    if p_sn.is_none() {
        degenerate.push(DegenerateGroup {
            group: group.to_string(),
            trial_type: TrialType::Sn,
        });
    }
    if p_ns.is_none() {
        degenerate.push(DegenerateGroup {
            group: group.to_string(),
            trial_type: TrialType::Ns,
        });
    }

    let (p_sn, p_ns) = (p_sn?, p_ns?);
    Some((p_sn, p_ns, SdtMetrics::from_proportions(p_sn, p_ns)))
}

/// Collect (short, long) metric pairs matched by participant id.
fn matched_pairs(
    participants: &[ParticipantMetrics],
) -> Vec<(&ParticipantMetrics, &ParticipantMetrics)> {
    participants
        .iter()
        .filter(|p| p.condition == Condition::Short)
        .filter_map(|short| {
            participants
                .iter()
                .find(|p| {
                    p.condition == Condition::Long && p.participant_id == short.participant_id
                })
                .map(|long| (short, long))
        })
        .collect()
}

/// Paired two-tailed t-test over (short, long) value pairs.
///
/// Closed form on the within-pair differences; p-value from the Student's t
/// CDF with n-1 degrees of freedom. Needs at least 2 pairs.
pub fn paired_t_test(pairs: &[(f64, f64)]) -> PairedTestOutcome {
    if pairs.len() < 2 {
        return PairedTestOutcome::InsufficientData { pairs: pairs.len() };
    }

    let n = pairs.len() as f64;
    let diffs: Vec<f64> = pairs.iter().map(|(a, b)| a - b).collect();
    let mean = diffs.iter().sum::<f64>() / n;
    let var = diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let df = n - 1.0;

    let se = (var / n).sqrt();
    let statistic = if se > 0.0 {
        mean / se
    } else if mean == 0.0 {
        // All differences identical and zero: no evidence either way
        0.0
    } else {
        f64::INFINITY.copysign(mean)
    };

    let pvalue = if statistic.is_finite() {
        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => 2.0 * (1.0 - dist.cdf(statistic.abs())),
            Err(_) => f64::NAN,
        }
    } else {
        0.0
    };

    PairedTestOutcome::Computed(PairedTest {
        statistic,
        pvalue,
        df,
        pairs: pairs.len(),
    })
}
