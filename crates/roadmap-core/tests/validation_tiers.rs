//! # Validation Tier Tests (T0-T3)
//!
//! ## Tiers
//! - T0: Metric arithmetic (worked example, guards)
//! - T1: Phase decision table
//! - T2: Checklist tracking
//! - T3: Persistence through the redb store

use roadmap_core::checklist::catalog;
use roadmap_core::{
    AssessmentInput, MetricInputs, MetricThresholds, Phase, PhaseClassifier, RedbStore,
    RiskLevel, RoadmapError, Session, SystemsChecklist, Tier, compute_metrics,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn systems_with_red_flags(n: usize) -> SystemsChecklist {
    let flags: Vec<bool> = (0..5).map(|i| i >= n).collect();
    SystemsChecklist {
        psa: flags[0],
        sops: flags[1],
        ar_auto: flags[2],
        am_tbr: flags[3],
        finance: flags[4],
    }
}

fn assess(band: &str, red_flags: usize) -> Result<roadmap_core::AssessmentResult, RoadmapError> {
    PhaseClassifier::new().classify(&AssessmentInput {
        revenue_band: band.to_string(),
        client_count: 25,
        avg_mrr: 1800,
        systems: systems_with_red_flags(red_flags),
    })
}

// =============================================================================
// TIER T0: METRIC ARITHMETIC
// =============================================================================

mod t0_metric_arithmetic {
    use super::*;

    /// T0.1: The worked example produces the documented figures.
    #[test]
    fn worked_example() {
        let inputs = MetricInputs {
            mrr: 100_000.0,
            mrr_clients: 50.0,
            service_revenue: 80_000.0,
            service_cogs: 28_000.0,
            marketing_spend: 20_000.0,
            new_clients: 10.0,
            retention_months: 24.0,
            ar_balance: 150_000.0,
            revenue_90d: 450_000.0,
            ..MetricInputs::default()
        };
        let r = compute_metrics(&inputs);

        assert!(close(r.avg_mrr_per_client, 2000.0));
        assert!(close(r.service_gm_percent, 65.0));
        assert!(close(r.cac, 2000.0));
        assert!(close(r.monthly_gross_margin_per_client, 1300.0));
        assert!(close(r.ltv, 31_200.0));
        assert!(close(r.ltv_cac_ratio, 15.6));
        assert!(close(r.dso, 30.0));
        assert_eq!(r.staff_to_revenue_ratio, 0.0);
        assert_eq!(r.utilization_percent, 0.0);
    }

    /// T0.2: LTV/CAC is zero when no clients were acquired.
    #[test]
    fn no_new_clients_means_zero_ratio() {
        let inputs = MetricInputs {
            mrr: 10_000.0,
            mrr_clients: 5.0,
            service_revenue: 10_000.0,
            retention_months: 12.0,
            marketing_spend: 5_000.0,
            new_clients: 0.0,
            ..MetricInputs::default()
        };
        let r = compute_metrics(&inputs);
        assert_eq!(r.cac, 0.0);
        assert_eq!(r.ltv_cac_ratio, 0.0);
        assert!(r.ltv > 0.0);
    }

    /// T0.3: The worked example tiers as expected under default thresholds.
    #[test]
    fn worked_example_tiers() {
        let inputs = MetricInputs {
            service_revenue: 80_000.0,
            service_cogs: 28_000.0,
            ar_balance: 150_000.0,
            revenue_90d: 450_000.0,
            ..MetricInputs::default()
        };
        let tiers = MetricThresholds::default().evaluate(&compute_metrics(&inputs));
        assert_eq!(tiers.service_gm, Tier::Good);
        assert_eq!(tiers.dso, Tier::Good);
        assert_eq!(tiers.ltv_cac, Tier::Risk);
    }
}

// =============================================================================
// TIER T1: PHASE DECISION TABLE
// =============================================================================

mod t1_phase_table {
    use super::*;

    /// T1.1: Under 1M is Phase 1 whatever the systems.
    #[test]
    fn under_one_million() {
        for flags in 0..=5 {
            let r = assess("<1M", flags).expect("classify");
            assert_eq!(r.phase, Phase::One);
            assert_eq!(r.page_range, "5-6");
        }
    }

    /// T1.2: Fixed bands map straight to their phase.
    #[test]
    fn fixed_bands() {
        let r = assess("1–3M", 4).expect("classify");
        assert_eq!((r.phase, r.page_range.as_str()), (Phase::Two, "7-8"));

        let r = assess("3–5M", 0).expect("classify");
        assert_eq!((r.phase, r.page_range.as_str()), (Phase::Three, "9-10"));
    }

    /// T1.3: A plateau with two gaps is Phase 4; with one it drops back to Phase 3.
    #[test]
    fn plateau() {
        let r = assess("~5M plateau", 2).expect("classify");
        assert_eq!((r.phase, r.page_range.as_str()), (Phase::Four, "11-13"));

        let r = assess("~5M plateau", 1).expect("classify");
        assert_eq!((r.phase, r.page_range.as_str()), (Phase::Three, "9-10"));
    }

    /// T1.4: 5–10M is Phase 5 when healthy and Phase 4 with gaps.
    #[test]
    fn five_to_ten() {
        let r = assess("5–10M", 0).expect("classify");
        assert_eq!((r.phase, r.page_range.as_str()), (Phase::Five, "14-15"));
        assert_eq!(r.risk, RiskLevel::Low);
        assert_eq!(r.risk.label(), "Low Risk");

        let r = assess("5–10M", 3).expect("classify");
        assert_eq!((r.phase, r.page_range.as_str()), (Phase::Four, "11-13"));
        assert_eq!(r.risk.label(), "High Risk");
    }

    /// T1.5: Risk follows red flags only.
    #[test]
    fn risk_levels() {
        assert_eq!(assess("<1M", 1).expect("classify").risk, RiskLevel::Low);
        assert_eq!(assess("<1M", 2).expect("classify").risk, RiskLevel::Medium);
        assert_eq!(assess("<1M", 5).expect("classify").risk, RiskLevel::High);
    }

    /// T1.6: Unknown bands are an explicit error.
    #[test]
    fn unknown_band() {
        assert!(matches!(
            assess("", 0),
            Err(RoadmapError::Unclassified { .. })
        ));
        assert!(matches!(
            assess("5-10M", 0),
            Err(RoadmapError::Unclassified { .. })
        ));
    }
}

// =============================================================================
// TIER T2: CHECKLIST TRACKING
// =============================================================================

mod t2_checklist {
    use super::*;
    use roadmap_core::MemoryStore;

    /// T2.1: Completing every item gives completed == total.
    #[test]
    fn complete_every_phase() {
        let mut session = Session::open(MemoryStore::new());
        for phase in Phase::ALL {
            for item in catalog(phase) {
                assert!(session.toggle_item(phase, item.id).expect("toggle"));
            }
            let progress = session.progress(phase);
            assert_eq!(progress.completed, progress.total);
            assert!(progress.is_complete());
            assert_eq!(progress.percent(), 100);
        }
    }

    /// T2.2: Unknown items are rejected and write nothing.
    #[test]
    fn unknown_item_writes_nothing() {
        let mut session = Session::open(MemoryStore::new());
        let result = session.toggle_item(Phase::Two, "not_an_item");
        assert!(matches!(
            result,
            Err(RoadmapError::UnknownChecklistItem { .. })
        ));
        assert!(session.store().is_empty());
        assert_eq!(session.progress(Phase::Two).completed, 0);
    }

    /// T2.3: Checklist completion never changes the assessed phase.
    #[test]
    fn completion_does_not_move_phase() {
        let mut session = Session::open(MemoryStore::new());
        session
            .submit_assessment(&AssessmentInput {
                revenue_band: "<1M".to_string(),
                client_count: 3,
                avg_mrr: 900,
                systems: SystemsChecklist::default(),
            })
            .expect("submit");

        for item in catalog(Phase::One) {
            session.toggle_item(Phase::One, item.id).expect("toggle");
        }
        assert_eq!(session.current_phase(), Phase::One);
    }
}

// =============================================================================
// TIER T3: PERSISTENCE
// =============================================================================

mod t3_persistence {
    use super::*;
    use roadmap_core::KeyValueStore;
    use tempfile::tempdir;

    /// T3.1: A redb-backed session restores everything after reopen.
    #[test]
    fn redb_session_roundtrip() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("roadmap.redb");

        {
            let mut session = Session::open(RedbStore::open(&path).expect("open"));
            session
                .submit_assessment(&AssessmentInput {
                    revenue_band: "5–10M".to_string(),
                    client_count: 80,
                    avg_mrr: 5200,
                    systems: SystemsChecklist::all_present(),
                })
                .expect("submit");
            session
                .update_metrics(&MetricInputs {
                    arr: 6_000_000.0,
                    fte_count: 30.0,
                    ..MetricInputs::default()
                })
                .expect("metrics");
            session.toggle_item(Phase::Five, "bhag").expect("toggle");
        }

        let store = RedbStore::open(&path).expect("reopen");
        assert_eq!(
            store.get("phase5Progress").expect("get").as_deref(),
            Some(r#"{"completed":1,"total":10}"#)
        );
        assert_eq!(
            store.get("phase5_bhag").expect("get").as_deref(),
            Some("true")
        );

        let session = Session::open(store);
        let assessment = session.assessment().expect("assessment");
        assert_eq!(assessment.phase, Phase::Five);
        assert_eq!(assessment.client_count, 80);
        let metrics = session.metrics().expect("metrics");
        assert!(close(metrics.staff_revenue_ratio, 200_000.0));
        assert!(session.checklist().is_complete(Phase::Five, "bhag"));
    }
}
