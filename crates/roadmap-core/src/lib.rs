//! # roadmap-core
//!
//! The calculation core for the MSP Revenue Roadmap - THE LOGIC.
//!
//! This crate turns an MSP owner's figures into the numbers and guidance the
//! roadmap is built on:
//! - `metrics`: CAC, LTV, DSO, utilization and gross margin from raw inputs
//! - `thresholds`: good / warn / risk tiers for the headline metrics
//! - `system`: phase, reading range, risk level and recommendations
//! - `checklist`: per-phase action catalog and completion tracking
//! - `storage` / `repository`: the key-value store seam and its record layout
//! - `session`: restore, classify, compute and persist for one owner
//!
//! ## Architectural Constraints
//!
//! - Calculation and classification are pure and synchronous
//! - Every division is guarded; results are never NaN or infinite
//! - Has NO async, NO network dependencies, NO presentation logic
//! - Persistence goes through the [`KeyValueStore`] trait only

// =============================================================================
// MODULES
// =============================================================================

pub mod checklist;
pub mod metrics;
pub mod repository;
pub mod session;
pub mod storage;
pub mod system;
pub mod thresholds;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Phase, RevenueBand, RiskLevel, RoadmapError, SystemsChecklist};

// =============================================================================
// RE-EXPORTS: Engines
// =============================================================================

pub use checklist::{ChecklistItem, ChecklistProgress, ChecklistTracker};
pub use metrics::{MetricInputs, MetricResults, MetricsSnapshot, compute_metrics};
pub use repository::{Repository, StorageKey};
pub use session::Session;
pub use storage::{KeyValueStore, MemoryStore, RedbStore};
pub use system::{AssessmentInput, AssessmentResult, PhaseClassifier};
pub use thresholds::{Direction, MetricThresholds, MetricTiers, Tier, TierThreshold};
