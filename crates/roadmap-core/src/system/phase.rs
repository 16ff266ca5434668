//! # Phase Assessment
//!
//! Classifies an MSP into one of five maturity phases from its revenue band
//! and the number of missing operational systems (red flags).
//!
//! ## Rule Table
//!
//! Rules are evaluated top-down; the first match wins.
//!
//! | Band | Red flags | Phase | Pages |
//! |------|-----------|-------|-------|
//! | <1M | any | 1 | 5-6 |
//! | 1–3M | any | 2 | 7-8 |
//! | 3–5M | any | 3 | 9-10 |
//! | ~5M plateau | >= 2 | 4 | 11-13 |
//! | ~5M plateau | any | 3 | 9-10 |
//! | 5–10M | >= 2 | 4 | 11-13 |
//! | 5–10M | any | 5 | 14-15 |
//!
//! A healthy plateau drops back to Phase 3 rather than being treated as a
//! failure. Phase is informational: checklist completion never moves it.

use crate::{Phase, RevenueBand, RiskLevel, RoadmapError, SystemsChecklist};
use serde::{Deserialize, Serialize};

/// Red flags at which a plateaued or 5–10M business is held in Phase 4.
pub const PLATEAU_RED_FLAG_THRESHOLD: u8 = 2;

// =============================================================================
// RULES
// =============================================================================

/// One row of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseRule {
    pub band: RevenueBand,
    pub min_red_flags: u8,
    pub phase: Phase,
}

impl PhaseRule {
    const fn new(band: RevenueBand, min_red_flags: u8, phase: Phase) -> Self {
        Self {
            band,
            min_red_flags,
            phase,
        }
    }

    /// Whether this rule applies.
    #[must_use]
    pub fn matches(&self, band: RevenueBand, red_flags: u8) -> bool {
        self.band == band && red_flags >= self.min_red_flags
    }
}

/// The ordered decision table.
pub const PHASE_RULES: [PhaseRule; 7] = [
    PhaseRule::new(RevenueBand::UnderOneMillion, 0, Phase::One),
    PhaseRule::new(RevenueBand::OneToThreeMillion, 0, Phase::Two),
    PhaseRule::new(RevenueBand::ThreeToFiveMillion, 0, Phase::Three),
    PhaseRule::new(
        RevenueBand::FiveMillionPlateau,
        PLATEAU_RED_FLAG_THRESHOLD,
        Phase::Four,
    ),
    PhaseRule::new(RevenueBand::FiveMillionPlateau, 0, Phase::Three),
    PhaseRule::new(
        RevenueBand::FiveToTenMillion,
        PLATEAU_RED_FLAG_THRESHOLD,
        Phase::Four,
    ),
    PhaseRule::new(RevenueBand::FiveToTenMillion, 0, Phase::Five),
];

// =============================================================================
// RECOMMENDATIONS
// =============================================================================

/// The four fixed recommendations for a phase.
#[must_use]
pub fn phase_recommendations(phase: Phase) -> [&'static str; 4] {
    match phase {
        Phase::One => [
            "Define your service offerings with clear scope and pricing",
            "Document SOPs for top 10 ticket types",
            "Implement basic time tracking and billing",
            "Calculate your current CAC and benchmark against industry",
        ],
        Phase::Two => [
            "Define your Ideal Customer Profile (ICP)",
            "Productize your services into packages",
            "Implement CRM with sales pipeline",
            "Start quarterly TBRs with key clients",
        ],
        Phase::Three => [
            "Hire operations and finance roles",
            "Implement AR automation",
            "Build financial dashboard with GM by service",
            "Standardize and automate processes",
        ],
        Phase::Four => [
            "Conduct immediate billing audit and price increases",
            "Implement weekly cash meetings",
            "Enforce ICP and exit non-ideal clients",
            "Build AM pipeline for expansion",
        ],
        Phase::Five => [
            "Set BHAG and Financial Freedom Number",
            "Align compensation to margin and growth",
            "Implement quarterly board-style reviews",
            "Ensure no client >10% of revenue",
        ],
    }
}

/// Corrective recommendations, one per missing system, in flag order.
const SYSTEM_RECOMMENDATIONS: [&str; 5] = [
    "Implement PSA system immediately",
    "Document core operational procedures",
    "Set up automated billing and collections",
    "Establish quarterly business reviews",
    "Hire finance controller or outsource",
];

/// Corrective recommendations for the missing systems.
#[must_use]
pub fn system_recommendations(systems: &SystemsChecklist) -> Vec<&'static str> {
    systems
        .flags()
        .iter()
        .zip(SYSTEM_RECOMMENDATIONS)
        .filter(|(present, _)| !**present)
        .map(|(_, rec)| rec)
        .collect()
}

// =============================================================================
// INPUT / RESULT
// =============================================================================

/// A submitted assessment form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentInput {
    /// Raw band label as submitted; validated by the classifier.
    pub revenue_band: String,
    pub client_count: u32,
    #[serde(rename = "avgMRR")]
    pub avg_mrr: u64,
    pub systems: SystemsChecklist,
}

/// Outcome of a successful classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub revenue_band: RevenueBand,
    pub client_count: u32,
    #[serde(rename = "avgMRR")]
    pub avg_mrr: u64,
    pub phase: Phase,
    pub page_range: String,
    pub risk: RiskLevel,
    pub red_flags: u8,
    pub systems: SystemsChecklist,
    pub recommendations: Vec<String>,
}

// =============================================================================
// PHASE CLASSIFIER
// =============================================================================

/// Phase Classifier - pure function from band and systems to a phase.
#[derive(Debug, Clone)]
pub struct PhaseClassifier {
    rules: Vec<PhaseRule>,
}

impl Default for PhaseClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseClassifier {
    /// Create a classifier over the standard rule table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: PHASE_RULES.to_vec(),
        }
    }

    /// Create a classifier over a custom rule table.
    #[must_use]
    pub fn with_rules(rules: Vec<PhaseRule>) -> Self {
        Self { rules }
    }

    /// First matching phase, or `None` if no rule applies.
    #[must_use]
    pub fn decide(&self, band: RevenueBand, red_flags: u8) -> Option<Phase> {
        self.rules
            .iter()
            .find(|rule| rule.matches(band, red_flags))
            .map(|rule| rule.phase)
    }

    /// Classify a submitted assessment.
    ///
    /// # Errors
    ///
    /// Returns `RoadmapError::Unclassified` if the band is not recognized or no
    /// rule matches it.
    pub fn classify(&self, input: &AssessmentInput) -> Result<AssessmentResult, RoadmapError> {
        let band: RevenueBand = input.revenue_band.parse()?;
        self.classify_band(band, input.client_count, input.avg_mrr, input.systems)
    }

    /// Classify an already-validated band.
    pub fn classify_band(
        &self,
        band: RevenueBand,
        client_count: u32,
        avg_mrr: u64,
        systems: SystemsChecklist,
    ) -> Result<AssessmentResult, RoadmapError> {
        let red_flags = systems.red_flags();
        let phase = self
            .decide(band, red_flags)
            .ok_or_else(|| RoadmapError::Unclassified {
                revenue_band: band.label().to_string(),
            })?;

        let recommendations = phase_recommendations(phase)
            .into_iter()
            .chain(system_recommendations(&systems))
            .map(str::to_string)
            .collect();

        Ok(AssessmentResult {
            revenue_band: band,
            client_count,
            avg_mrr,
            phase,
            page_range: phase.page_range().to_string(),
            risk: RiskLevel::from_red_flags(red_flags),
            red_flags,
            systems,
            recommendations,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
