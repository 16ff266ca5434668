//! # Core Type Definitions
//!
//! This module contains the value types shared by every component:
//! - Classification inputs (`RevenueBand`, `SystemsChecklist`)
//! - Classification outputs (`Phase`, `RiskLevel`)
//! - Error types (`RoadmapError`)
//!
//! Phases, risk levels and revenue bands serialize as the literal labels the
//! host renders ("Phase 3", "High Risk", "~5M plateau"), so stored records stay
//! readable by any consumer of the key-value store.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// REVENUE BAND
// =============================================================================

/// Annual revenue band selected by the owner.
///
/// The middle bands use an EN DASH (`–`), matching the companion spreadsheet's
/// data-validation list. Any other spelling is rejected by [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RevenueBand {
    /// "<1M"
    UnderOneMillion,
    /// "1–3M"
    OneToThreeMillion,
    /// "3–5M"
    ThreeToFiveMillion,
    /// "~5M plateau"
    FiveMillionPlateau,
    /// "5–10M"
    FiveToTenMillion,
}

impl RevenueBand {
    /// All bands in ascending order.
    pub const ALL: [RevenueBand; 5] = [
        RevenueBand::UnderOneMillion,
        RevenueBand::OneToThreeMillion,
        RevenueBand::ThreeToFiveMillion,
        RevenueBand::FiveMillionPlateau,
        RevenueBand::FiveToTenMillion,
    ];

    /// The literal label used in forms and stored records.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RevenueBand::UnderOneMillion => "<1M",
            RevenueBand::OneToThreeMillion => "1–3M",
            RevenueBand::ThreeToFiveMillion => "3–5M",
            RevenueBand::FiveMillionPlateau => "~5M plateau",
            RevenueBand::FiveToTenMillion => "5–10M",
        }
    }
}

impl std::fmt::Display for RevenueBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RevenueBand {
    type Err = RoadmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RevenueBand::ALL
            .into_iter()
            .find(|band| band.label() == s)
            .ok_or_else(|| RoadmapError::Unclassified {
                revenue_band: s.to_string(),
            })
    }
}

impl TryFrom<String> for RevenueBand {
    type Error = RoadmapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RevenueBand> for String {
    fn from(band: RevenueBand) -> Self {
        band.label().to_string()
    }
}

// =============================================================================
// PHASE
// =============================================================================

/// MSP maturity phase, ordered from earliest to latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Phase {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl Phase {
    /// All phases in order.
    pub const ALL: [Phase; 5] = [Phase::One, Phase::Two, Phase::Three, Phase::Four, Phase::Five];

    /// Phase number, 1 through 5.
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
            Phase::Three => 3,
            Phase::Four => 4,
            Phase::Five => 5,
        }
    }

    /// Look up a phase by number.
    pub fn from_number(n: u8) -> Result<Self, RoadmapError> {
        match n {
            1 => Ok(Phase::One),
            2 => Ok(Phase::Two),
            3 => Ok(Phase::Three),
            4 => Ok(Phase::Four),
            5 => Ok(Phase::Five),
            other => Err(RoadmapError::InvalidPhase(other)),
        }
    }

    /// Display label, e.g. "Phase 4".
    #[must_use]
    pub fn label(&self) -> String {
        format!("Phase {}", self.number())
    }

    /// Recommended reading range in the roadmap guide.
    #[must_use]
    pub fn page_range(&self) -> &'static str {
        match self {
            Phase::One => "5-6",
            Phase::Two => "7-8",
            Phase::Three => "9-10",
            Phase::Four => "11-13",
            Phase::Five => "14-15",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Phase {}", self.number())
    }
}

impl TryFrom<String> for Phase {
    type Error = RoadmapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let number = value
            .strip_prefix("Phase ")
            .and_then(|n| n.trim().parse::<u8>().ok())
            .ok_or_else(|| RoadmapError::DeserializationError(format!("Invalid phase '{}'", value)))?;
        Phase::from_number(number)
    }
}

impl From<Phase> for String {
    fn from(phase: Phase) -> Self {
        phase.label()
    }
}

// =============================================================================
// RISK LEVEL
// =============================================================================

/// Operational risk derived from the red-flag count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskLevel {
    /// 3+ red flags is High, exactly 2 is Medium, anything else is Low.
    #[must_use]
    pub fn from_red_flags(red_flags: u8) -> Self {
        if red_flags >= 3 {
            RiskLevel::High
        } else if red_flags == 2 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Display label, e.g. "High Risk".
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }

    /// One-line guidance shown next to the badge.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Good system foundation - focus on optimization",
            RiskLevel::Medium => "Some system gaps identified - prioritize improvements",
            RiskLevel::High => "Multiple system gaps detected - immediate attention needed",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// SYSTEMS CHECKLIST
// =============================================================================

/// The five core operational systems. A `false` flag is a red flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemsChecklist {
    /// PSA in place.
    pub psa: bool,
    /// SOPs documented.
    pub sops: bool,
    /// AR automation live.
    pub ar_auto: bool,
    /// AM/TBR cadence running.
    pub am_tbr: bool,
    /// Finance controller in seat.
    pub finance: bool,
}

impl SystemsChecklist {
    /// A checklist with every system in place.
    #[must_use]
    pub fn all_present() -> Self {
        Self {
            psa: true,
            sops: true,
            ar_auto: true,
            am_tbr: true,
            finance: true,
        }
    }

    /// Flags in fixed order: PSA, SOPs, AR automation, AM/TBR, finance.
    #[must_use]
    pub fn flags(&self) -> [bool; 5] {
        [self.psa, self.sops, self.ar_auto, self.am_tbr, self.finance]
    }

    /// Number of missing systems (0..=5).
    #[must_use]
    pub fn red_flags(&self) -> u8 {
        self.flags().iter().filter(|present| !**present).count() as u8
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the roadmap core.
///
/// Arithmetic never produces an error: every division is guarded.
#[derive(Debug, Error)]
pub enum RoadmapError {
    /// The revenue band matched none of the known bands.
    #[error("Review inputs: unrecognized revenue band '{revenue_band}'")]
    Unclassified { revenue_band: String },

    /// A phase number outside 1..=5.
    #[error("Invalid phase: {0} (expected 1-5)")]
    InvalidPhase(u8),

    /// A checklist toggle referenced an item that is not in the phase catalog.
    #[error("Unknown checklist item '{item_id}' for {phase}")]
    UnknownChecklistItem { phase: Phase, item_id: String },

    /// The backing store failed or is unavailable.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// The host configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// =============================================================================
// TESTS
// =============================================================================
