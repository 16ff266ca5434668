//! # Qualitative Tiers
//!
//! Maps metric results onto a three-tier good / warn / risk scale.
//!
//! The cut-offs are configuration, not engine constants: the host loads
//! overrides from its config file and passes a [`MetricThresholds`] in. The
//! direction of each metric is fixed; only the numbers are configurable.
//!
//! | Metric | Good | Warn | Direction |
//! |--------|------|------|-----------|
//! | Service GM % | >= 65 | >= 60 | higher is better |
//! | LTV/CAC | >= 3.0 | >= 2.5 | higher is better |
//! | DSO | < 35 | <= 45 | lower is better |
//! | Utilization % | >= 70 | >= 65 | higher is better |

use crate::metrics::MetricResults;
use serde::{Deserialize, Serialize};

/// Qualitative band for a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Warn,
    Risk,
}

impl Tier {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Good => "good",
            Tier::Warn => "warn",
            Tier::Risk => "risk",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which way a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Cut-offs for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThreshold {
    pub good: f64,
    pub warn: f64,
}

impl TierThreshold {
    #[must_use]
    pub const fn new(good: f64, warn: f64) -> Self {
        Self { good, warn }
    }

    /// Classify a value.
    ///
    /// Higher-is-better: `>= good` is Good, `>= warn` is Warn.
    /// Lower-is-better: `< good` is Good, `<= warn` is Warn.
    #[must_use]
    pub fn tier(&self, value: f64, direction: Direction) -> Tier {
        match direction {
            Direction::HigherIsBetter => {
                if value >= self.good {
                    Tier::Good
                } else if value >= self.warn {
                    Tier::Warn
                } else {
                    Tier::Risk
                }
            }
            Direction::LowerIsBetter => {
                if value < self.good {
                    Tier::Good
                } else if value <= self.warn {
                    Tier::Warn
                } else {
                    Tier::Risk
                }
            }
        }
    }
}

/// Threshold set for the four banded metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricThresholds {
    pub service_gm: TierThreshold,
    pub ltv_cac: TierThreshold,
    pub dso: TierThreshold,
    pub utilization: TierThreshold,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            service_gm: TierThreshold::new(65.0, 60.0),
            ltv_cac: TierThreshold::new(3.0, 2.5),
            dso: TierThreshold::new(35.0, 45.0),
            utilization: TierThreshold::new(70.0, 65.0),
        }
    }
}

impl MetricThresholds {
    /// Tier every banded metric.
    #[must_use]
    pub fn evaluate(&self, results: &MetricResults) -> MetricTiers {
        MetricTiers {
            service_gm: self
                .service_gm
                .tier(results.service_gm_percent, Direction::HigherIsBetter),
            ltv_cac: self
                .ltv_cac
                .tier(results.ltv_cac_ratio, Direction::HigherIsBetter),
            dso: self.dso.tier(results.dso, Direction::LowerIsBetter),
            utilization: self
                .utilization
                .tier(results.utilization_percent, Direction::HigherIsBetter),
        }
    }
}

/// Tiers for the banded metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTiers {
    pub service_gm: Tier,
    pub ltv_cac: Tier,
    pub dso: Tier,
    pub utilization: Tier,
}
