//! Testigo - Signal-detection-theory scoring engine
//!
//! This library scores two-alternative forced-choice eyewitness experiments:
//! it ingests per-participant trial logs, classifies trials by target slot,
//! computes boundary-corrected proportions and SDT metrics (d', lambda,
//! log beta) at population and participant level, and runs paired t-tests
//! between the short and long encoding conditions.

pub mod analysis;
pub mod cli;
pub mod csv_output;
pub mod error;
pub mod ingest;
pub mod json_output;
pub mod proportions;
pub mod record;
pub mod report;
pub mod sdt;
