//! # Session Module
//!
//! One owner's working state bound to one store.
//!
//! A session restores the last saved assessment, metrics snapshot and
//! checklist flags on open, and writes each new result through to the store.
//! A new assessment or metrics snapshot fully replaces the previous one; no
//! history is kept.

use crate::checklist::{ChecklistProgress, ChecklistTracker};
use crate::metrics::{MetricInputs, MetricResults, MetricsSnapshot, compute_metrics};
use crate::repository::{Repository, StorageKey};
use crate::storage::KeyValueStore;
use crate::system::{AssessmentInput, AssessmentResult, PhaseClassifier};
use crate::{Phase, RoadmapError};

/// A session over a key-value store.
#[derive(Debug)]
pub struct Session<S> {
    repo: Repository<S>,
    classifier: PhaseClassifier,
    checklist: ChecklistTracker,
    assessment: Option<AssessmentResult>,
    metrics: Option<MetricsSnapshot>,
}

impl<S: KeyValueStore> Session<S> {
    /// Open a session, restoring whatever the store holds.
    ///
    /// Missing or malformed records are skipped; the session starts empty for
    /// them.
    pub fn open(store: S) -> Self {
        let repo = Repository::new(store);
        let assessment = repo.load(StorageKey::AssessmentData);
        let metrics = repo.load(StorageKey::MetricsData);
        let checklist = ChecklistTracker::load(&repo);

        Self {
            repo,
            classifier: PhaseClassifier::new(),
            checklist,
            assessment,
            metrics,
        }
    }

    /// Classify a submitted assessment and save it.
    ///
    /// An unrecognized band leaves the previous assessment in place. A failed
    /// write is returned after the in-memory result has been replaced.
    pub fn submit_assessment(
        &mut self,
        input: &AssessmentInput,
    ) -> Result<AssessmentResult, RoadmapError> {
        let result = self.classifier.classify(input)?;
        tracing::info!(
            band = %result.revenue_band,
            phase = result.phase.number(),
            red_flags = result.red_flags,
            "assessment classified"
        );

        self.assessment = Some(result.clone());
        self.repo.save(StorageKey::AssessmentData, &result)?;
        Ok(result)
    }

    /// Compute metrics and save the snapshot.
    pub fn update_metrics(&mut self, inputs: &MetricInputs) -> Result<MetricResults, RoadmapError> {
        let results = compute_metrics(inputs);
        let snapshot = MetricsSnapshot::new(inputs, &results);

        self.metrics = Some(snapshot);
        self.repo.save(StorageKey::MetricsData, &snapshot)?;
        Ok(results)
    }

    /// Flip a checklist item and persist it.
    pub fn toggle_item(&mut self, phase: Phase, item_id: &str) -> Result<bool, RoadmapError> {
        self.checklist.toggle_item(&mut self.repo, phase, item_id)
    }

    /// Progress for a phase.
    #[must_use]
    pub fn progress(&self, phase: Phase) -> ChecklistProgress {
        self.checklist.progress(phase)
    }

    /// The last saved assessment.
    #[must_use]
    pub fn assessment(&self) -> Option<&AssessmentResult> {
        self.assessment.as_ref()
    }

    /// The last saved metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> Option<&MetricsSnapshot> {
        self.metrics.as_ref()
    }

    #[must_use]
    pub fn checklist(&self) -> &ChecklistTracker {
        &self.checklist
    }

    /// Phase to show checklists for: the assessed phase, else Phase 1.
    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.assessment
            .as_ref()
            .map(|a| a.phase)
            .unwrap_or(Phase::One)
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        self.repo.store()
    }

    /// Close the session and give back the store.
    pub fn into_store(self) -> S {
        self.repo.into_inner()
    }
}

// =============================================================================
// TESTS
// =============================================================================
