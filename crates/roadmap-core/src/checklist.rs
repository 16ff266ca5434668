//! # Checklists
//!
//! The static per-phase action catalog and the tracker that records which
//! items are done.
//!
//! Item flags are persisted one key per item (`phase{N}_{itemId}`) and a
//! `phase{N}Progress` summary is rewritten after every toggle. Completion is
//! informational: it never changes the assessed phase.

use crate::repository::{Repository, StorageKey};
use crate::storage::KeyValueStore;
use crate::{Phase, RoadmapError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// CATALOG
// =============================================================================

/// A single catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub text: &'static str,
}

const fn item(id: &'static str, text: &'static str) -> ChecklistItem {
    ChecklistItem { id, text }
}

const PHASE_1: [ChecklistItem; 8] = [
    item("services", "Define services with scope, exclusions, SLAs, pricing, profit per service"),
    item("sops", "Document SOPs for top 10 tickets and onboarding"),
    item("profit", "Track profit per client and reprice/exit low-margin accounts"),
    item("cac", "Calculate CAC and benchmark vs industry standards"),
    item("stack", "Build technology stack on value lenses"),
    item("ar", "Implement basic AR workflow and payment terms"),
    item("psa", "Deploy PSA lite or CRM system"),
    item("tracking", "Set up time tracking for all billable activities"),
];

const PHASE_2: [ChecklistItem; 10] = [
    item("icp", "Define ICP with seats, industries, compliance, budget, tech profile"),
    item("packages", "Productize services into Good/Better/Best packages"),
    item("pricing", "Set tiered pricing, SLAs, minimums, and rate cards"),
    item("crm", "Implement CRM with sales pipeline and exit criteria"),
    item("proposals", "Create proposal templates and MSAs"),
    item("followup", "Set up automated follow-up sequences"),
    item("tbr", "Launch quarterly TBRs for every MRR client"),
    item("amrole", "Define account manager role and responsibilities"),
    item("pruning", "Audit and prune non-ICP clients"),
    item("leadership", "Establish weekly ops, monthly metrics, quarterly planning"),
];

const PHASE_3: [ChecklistItem; 10] = [
    item("orgchart", "Create org chart and role scorecards for key positions"),
    item("psa", "Full PSA adoption with >95% time tracking compliance"),
    item("arauto", "Implement AR automation and payments on file system"),
    item("dashboard", "Build financial dashboard with weekly GM by service"),
    item("playbooks", "Create standardization playbooks for all processes"),
    item("automations", "Deploy automations for provisioning, licensing, monitoring"),
    item("dataflows", "Map and optimize all data flows between systems"),
    item("capacity", "Define utilization targets and capacity planning process"),
    item("qbr", "Build QBR engine with project forecasting capabilities"),
    item("integration", "Create unified customer view across all platforms"),
];

const PHASE_4: [ChecklistItem; 12] = [
    item("billing_audit", "Conduct emergency billing audit and identify issues"),
    item("price_increases", "Issue price increases for underpriced services"),
    item("ar_live", "Get AR automation system live immediately"),
    item("payment_terms", "Tighten payment terms and policies"),
    item("headcount_plan", "Create headcount plan tied to pipeline and utilization"),
    item("freeze_hires", "Freeze non-critical hiring until stabilized"),
    item("quality_gates", "Implement quality gates and problem management"),
    item("post_incident", "Establish post-incident review process"),
    item("icp_enforcement", "Strictly enforce ICP and exit non-ideal clients"),
    item("weekly_cash", "Start weekly cash flow and margin tracking meetings"),
    item("am_pipeline", "Build AM pipeline >20% of MRR"),
    item("project_recovery", "Recover delayed or over-budget projects"),
];

const PHASE_5: [ChecklistItem; 10] = [
    item("bhag", "Set BHAG and Financial Freedom Number"),
    item("backward", "Create backward plan to exit metrics"),
    item("targets", "Define quarterly targets and milestones"),
    item("compensation", "Align compensation to margin and growth metrics"),
    item("churn_analysis", "Implement quarterly churn analysis and save plays"),
    item("client_concentration", "Ensure no client >10% of revenue"),
    item("board_reviews", "Establish quarterly board-style reviews"),
    item("documentation", "Document all processes for handover"),
    item("management_team", "Build management team that can run without you"),
    item("exit_prep", "Prepare financial and legal documentation"),
];

/// The ordered checklist for a phase.
#[must_use]
pub fn catalog(phase: Phase) -> &'static [ChecklistItem] {
    match phase {
        Phase::One => &PHASE_1,
        Phase::Two => &PHASE_2,
        Phase::Three => &PHASE_3,
        Phase::Four => &PHASE_4,
        Phase::Five => &PHASE_5,
    }
}

/// Find an item in a phase's catalog.
#[must_use]
pub fn find_item(phase: Phase, item_id: &str) -> Option<&'static ChecklistItem> {
    catalog(phase).iter().find(|item| item.id == item_id)
}

// =============================================================================
// PROGRESS
// =============================================================================

/// Completion summary for one phase. Stored as `phase{N}Progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistProgress {
    pub completed: usize,
    pub total: usize,
}

impl ChecklistProgress {
    /// Completion as a whole percentage, 0-100. An empty checklist is 0.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.completed.saturating_mul(100) / self.total).min(100) as u8
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

// =============================================================================
// TRACKER
// =============================================================================

/// Per-phase completion state.
///
/// Only completed items are held, and only catalog IDs of the matching phase
/// ever enter the set; everything else is incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistTracker {
    completed: BTreeMap<Phase, BTreeSet<&'static str>>,
}

impl ChecklistTracker {
    /// Create a tracker with every item incomplete.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every item flag from the repository.
    ///
    /// Unreadable or malformed flags load as incomplete.
    pub fn load<S: KeyValueStore>(repo: &Repository<S>) -> Self {
        let mut tracker = Self::new();
        for phase in Phase::ALL {
            for item in catalog(phase) {
                if repo.load_flag(StorageKey::PhaseItem(phase, item.id)) {
                    tracker.set(phase, item.id, true);
                }
            }
        }
        tracker
    }

    fn set(&mut self, phase: Phase, item_id: &'static str, done: bool) {
        let items = self.completed.entry(phase).or_default();
        if done {
            items.insert(item_id);
        } else {
            items.remove(item_id);
            if items.is_empty() {
                self.completed.remove(&phase);
            }
        }
    }

    /// Whether an item is done. Unknown items are never done.
    #[must_use]
    pub fn is_complete(&self, phase: Phase, item_id: &str) -> bool {
        self.completed
            .get(&phase)
            .is_some_and(|items| items.contains(item_id))
    }

    /// Catalog items for a phase with their completion state.
    #[must_use]
    pub fn items(&self, phase: Phase) -> Vec<(ChecklistItem, bool)> {
        catalog(phase)
            .iter()
            .map(|item| (*item, self.is_complete(phase, item.id)))
            .collect()
    }

    /// Completion summary for a phase.
    #[must_use]
    pub fn progress(&self, phase: Phase) -> ChecklistProgress {
        let completed = self
            .completed
            .get(&phase)
            .map(BTreeSet::len)
            .unwrap_or(0);
        ChecklistProgress {
            completed,
            total: catalog(phase).len(),
        }
    }

    /// Flip an item and return its new state. Memory only.
    ///
    /// # Errors
    ///
    /// Returns `RoadmapError::UnknownChecklistItem` if the item is not in the
    /// phase catalog; state is left untouched.
    pub fn toggle(&mut self, phase: Phase, item_id: &str) -> Result<bool, RoadmapError> {
        let item = find_item(phase, item_id).ok_or_else(|| {
            tracing::warn!(phase = phase.number(), item_id, "toggle for item outside catalog");
            RoadmapError::UnknownChecklistItem {
                phase,
                item_id: item_id.to_string(),
            }
        })?;

        let done = !self.is_complete(phase, item.id);
        self.set(phase, item.id, done);
        Ok(done)
    }

    /// Flip an item, then persist the item flag and the phase summary.
    ///
    /// A failed write is logged and does not undo the in-memory toggle; the
    /// next successful write brings the store back in line.
    pub fn toggle_item<S: KeyValueStore>(
        &mut self,
        repo: &mut Repository<S>,
        phase: Phase,
        item_id: &str,
    ) -> Result<bool, RoadmapError> {
        let done = self.toggle(phase, item_id)?;

        if let Err(e) = repo.save_flag(StorageKey::PhaseItem(phase, item_id), done) {
            tracing::warn!(phase = phase.number(), item_id, error = %e, "checklist flag not persisted");
        }
        if let Err(e) = repo.save(StorageKey::PhaseProgress(phase), &self.progress(phase)) {
            tracing::warn!(phase = phase.number(), error = %e, "checklist progress not persisted");
        }

        Ok(done)
    }
}

// =============================================================================
// TESTS
// =============================================================================
