//! Signal-detection metric engine
//!
//! Converts a pair of boundary-corrected proportions into z-scores and the
//! derived forced-choice statistics. Pure functions of the two inputs, f64
//! throughout:
//!
//! - `d' = z_SN + z_NS`
//! - `lambda = 0.5 * (z_NS - z_SN)`
//! - `log beta = 0.5 * (z_NS^2 - z_SN^2)`

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Derived SDT statistics for one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SdtMetrics {
    /// z-score of the corrected SN proportion
    pub z_sn: f64,
    /// z-score of the corrected NS proportion
    pub z_ns: f64,
    /// Sensitivity (forced-choice d')
    pub d_prime: f64,
    /// Bias criterion
    pub lambda: f64,
    /// Log likelihood-ratio criterion
    pub log_beta: f64,
}

impl SdtMetrics {
    /// Derive the metrics from corrected proportions, both in (0,1).
    pub fn from_proportions(p_sn: f64, p_ns: f64) -> Self {
        let z_sn = z_score(p_sn);
        let z_ns = z_score(p_ns);
        Self {
            z_sn,
            z_ns,
            d_prime: z_sn + z_ns,
            lambda: 0.5 * (z_ns - z_sn),
            log_beta: 0.5 * (z_ns * z_ns - z_sn * z_sn),
        }
    }
}

/// Inverse standard normal CDF.
pub fn z_score(p: f64) -> f64 {
    // Constant parameters; construction cannot fail.
    let standard = Normal::new(0.0, 1.0).unwrap();
    standard.inverse_cdf(p)
}
