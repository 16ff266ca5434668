//! # CLI Command Implementations
//!
//! Each command runs against a [`Session`] and returns a [`CommandOutput`]
//! holding both the JSON document and the human-readable text, so the caller
//! decides which one to print.

use crate::config::AppConfig;
use crate::display::{
    format_currency, format_days, format_percent, format_ratio, progress_bar, tier_marker,
};
use roadmap_core::{
    AssessmentInput, ChecklistProgress, KeyValueStore, MetricInputs, MetricResults, MetricTiers,
    MetricsSnapshot, Phase, RevenueBand, RoadmapError, Session, SystemsChecklist,
};
use serde_json::{Value, json};
use std::collections::BTreeMap;

use super::MetricFields;

/// Width of the checklist progress bar.
const PROGRESS_BAR_WIDTH: usize = 20;

/// Result of a command: a JSON document and its text rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub json: Value,
    pub text: String,
}

impl CommandOutput {
    /// Print to stdout in the requested mode.
    pub fn print(&self, json_mode: bool) {
        if json_mode {
            match serde_json::to_string_pretty(&self.json) {
                Ok(s) => println!("{}", s),
                Err(_) => println!("{}", self.json),
            }
        } else {
            print!("{}", self.text);
        }
    }
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<Value, RoadmapError> {
    serde_json::to_value(value).map_err(|e| RoadmapError::SerializationError(e.to_string()))
}

// =============================================================================
// METRICS
// =============================================================================

impl MetricFields {
    /// The fields keyed by their form names. Flags left off are absent.
    #[must_use]
    pub fn to_form(&self) -> BTreeMap<String, String> {
        let pairs = [
            ("arr", &self.arr),
            ("mrr", &self.mrr),
            ("mrrClients", &self.mrr_clients),
            ("serviceRevenue", &self.service_revenue),
            ("serviceCogs", &self.service_cogs),
            ("marketingSpend", &self.marketing_spend),
            ("newClients", &self.new_clients),
            ("retentionMonths", &self.retention_months),
            ("arBalance", &self.ar_balance),
            ("revenue90d", &self.revenue_90d),
            ("fteCount", &self.fte_count),
            ("availableHours", &self.available_hours),
            ("billableHours", &self.billable_hours),
        ];
        pairs
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
            .collect()
    }
}

/// Tier a stored snapshot.
fn snapshot_tiers(config: &AppConfig, snapshot: &MetricsSnapshot) -> MetricTiers {
    let results = MetricResults {
        service_gm_percent: snapshot.service_gm,
        ltv_cac_ratio: snapshot.ltv_cac_ratio,
        dso: snapshot.dso,
        utilization_percent: snapshot.utilization_rate,
        ..MetricResults::default()
    };
    config.thresholds.evaluate(&results)
}

fn write_snapshot(text: &mut String, snapshot: &MetricsSnapshot, tiers: &MetricTiers) {
    text.push_str(&format!("  ARR:                  {}\n", format_currency(snapshot.arr)));
    text.push_str(&format!("  MRR:                  {}\n", format_currency(snapshot.mrr)));
    text.push_str(&format!(
        "  Avg MRR per client:   {}\n",
        format_currency(snapshot.avg_mrr_per_client),
    ));
    text.push_str(&format!(
        "  Service GM:           {} {}\n",
        format_percent(snapshot.service_gm),
        tier_marker(tiers.service_gm),
    ));
    text.push_str(&format!("  CAC:                  {}\n", format_currency(snapshot.cac)));
    text.push_str(&format!("  LTV:                  {}\n", format_currency(snapshot.ltv)));
    text.push_str(&format!(
        "  LTV/CAC:              {} {}\n",
        format_ratio(snapshot.ltv_cac_ratio),
        tier_marker(tiers.ltv_cac),
    ));
    text.push_str(&format!(
        "  DSO:                  {} {}\n",
        format_days(snapshot.dso),
        tier_marker(tiers.dso),
    ));
    text.push_str(&format!(
        "  Revenue per FTE:      {}\n",
        format_currency(snapshot.staff_revenue_ratio),
    ));
    text.push_str(&format!(
        "  Utilization:          {} {}\n",
        format_percent(snapshot.utilization_rate),
        tier_marker(tiers.utilization),
    ));
}

/// Compute metrics from raw fields and save the snapshot.
pub fn cmd_metrics<S: KeyValueStore>(
    session: &mut Session<S>,
    config: &AppConfig,
    fields: &MetricFields,
) -> Result<CommandOutput, RoadmapError> {
    let inputs = MetricInputs::from_fields(&fields.to_form());
    let results = session.update_metrics(&inputs)?;
    let snapshot = MetricsSnapshot::new(&inputs, &results);
    let tiers = config.thresholds.evaluate(&results);

    let mut text = String::from("MSP Snapshot Metrics\n====================\n");
    write_snapshot(&mut text, &snapshot, &tiers);
    text.push_str(&format!(
        "  Monthly GM per client: {}\n",
        format_currency(results.monthly_gross_margin_per_client),
    ));

    Ok(CommandOutput {
        json: json!({
            "inputs": serialize(&inputs)?,
            "results": serialize(&results)?,
            "tiers": serialize(&tiers)?,
        }),
        text,
    })
}

// =============================================================================
// ASSESSMENT
// =============================================================================

/// Classify the business and save the assessment.
pub fn cmd_assess<S: KeyValueStore>(
    session: &mut Session<S>,
    band: &str,
    client_count: u32,
    avg_mrr: u64,
    systems: SystemsChecklist,
) -> Result<CommandOutput, RoadmapError> {
    let input = AssessmentInput {
        revenue_band: band.to_string(),
        client_count,
        avg_mrr,
        systems,
    };
    let result = session.submit_assessment(&input)?;

    let mut text = String::from("MSP Phase Assessment\n====================\n");
    text.push_str(&format!("Revenue band:   {}\n", result.revenue_band));
    text.push_str(&format!("Clients:        {}\n", result.client_count));
    text.push_str(&format!(
        "Avg MRR:        {}\n",
        format_currency(result.avg_mrr as f64),
    ));
    text.push('\n');
    text.push_str(&format!(
        "Recommended:    {} (pages {})\n",
        result.phase,
        result.page_range,
    ));
    text.push_str(&format!(
        "Risk:           {} ({} red flags)\n",
        result.risk,
        result.red_flags,
    ));
    text.push_str(&format!("                {}\n", result.risk.description()));
    text.push('\n');
    text.push_str("Next moves:\n");
    for rec in &result.recommendations {
        text.push_str(&format!("  - {}\n", rec));
    }

    Ok(CommandOutput {
        json: serialize(&result)?,
        text,
    })
}

// =============================================================================
// CHECKLIST
// =============================================================================

/// `[####----] 3/8 (37%)`
fn progress_line(progress: &ChecklistProgress) -> String {
    format!(
        "{} {}/{} ({}%)\n",
        progress_bar(progress.percent(), PROGRESS_BAR_WIDTH),
        progress.completed,
        progress.total,
        progress.percent()
    )
}

/// Show a phase checklist with completion state.
pub fn cmd_checklist_show<S: KeyValueStore>(session: &Session<S>, phase: Phase) -> CommandOutput {
    let items = session.checklist().items(phase);
    let progress = session.progress(phase);

    let mut text = format!("{} Action Checklist\n", phase);
    for (item, done) in &items {
        let mark = if *done { "x" } else { " " };
        text.push_str(&format!("  [{}] {:<12} {}\n", mark, item.id, item.text));
    }
    text.push_str(&progress_line(&progress));

    let json_items: Vec<Value> = items
        .iter()
        .map(|(item, done)| json!({ "id": item.id, "text": item.text, "completed": done }))
        .collect();

    CommandOutput {
        json: json!({
            "phase": phase,
            "items": json_items,
            "completed": progress.completed,
            "total": progress.total,
            "percent": progress.percent(),
        }),
        text,
    }
}

/// Toggle one checklist item and report the new state.
pub fn cmd_checklist_toggle<S: KeyValueStore>(
    session: &mut Session<S>,
    phase: Phase,
    item_id: &str,
) -> Result<CommandOutput, RoadmapError> {
    let done = session.toggle_item(phase, item_id)?;
    let progress = session.progress(phase);

    let state = if done { "done" } else { "not done" };
    let mut text = format!("{} / {}: {}\n", phase, item_id, state);
    text.push_str(&progress_line(&progress));
    if progress.is_complete() {
        text.push_str("Checklist complete.\n");
    }

    Ok(CommandOutput {
        json: json!({
            "phase": phase,
            "item": item_id,
            "completed": done,
            "progress": serialize(&progress)?,
        }),
        text,
    })
}

// =============================================================================
// STATUS / BANDS
// =============================================================================

/// Saved assessment, metrics and per-phase progress.
pub fn cmd_status<S: KeyValueStore>(session: &Session<S>, config: &AppConfig) -> CommandOutput {
    let mut text = String::from("MSP Roadmap Status\n==================\n");

    match session.assessment() {
        Some(a) => {
            text.push_str(&format!(
                "Assessment: {} ({}), {}, pages {}\n",
                a.phase,
                a.revenue_band,
                a.risk,
                a.page_range,
            ));
        }
        None => {
            text.push_str("Assessment: none yet (run `msp-roadmap assess`)\n");
        }
    }

    let tiers = session.metrics().map(|m| snapshot_tiers(config, m));
    match (session.metrics(), &tiers) {
        (Some(snapshot), Some(tiers)) => {
            text.push_str("Metrics:\n");
            write_snapshot(&mut text, snapshot, tiers);
        }
        _ => {
            text.push_str("Metrics: none yet (run `msp-roadmap metrics`)\n");
        }
    }

    text.push_str("Checklists:\n");
    let current = session.current_phase();
    let mut progress_json = Vec::with_capacity(Phase::ALL.len());
    for phase in Phase::ALL {
        let progress = session.progress(phase);
        let marker = if phase == current { "*" } else { " " };
        text.push_str(&format!(
            " {}{} {} {}/{}\n",
            marker,
            phase,
            progress_bar(progress.percent(), PROGRESS_BAR_WIDTH),
            progress.completed,
            progress.total,
        ));
        progress_json.push(json!({
            "phase": phase,
            "completed": progress.completed,
            "total": progress.total,
        }));
    }

    CommandOutput {
        json: json!({
            "assessment": session.assessment(),
            "metrics": session.metrics(),
            "tiers": tiers,
            "currentPhase": current,
            "progress": progress_json,
        }),
        text,
    }
}

/// The accepted revenue bands, in phase-table order.
pub fn cmd_bands() -> CommandOutput {
    let mut text = String::from("Revenue bands:\n");
    for band in RevenueBand::ALL {
        text.push_str(&format!("  {}\n", band));
    }
    CommandOutput {
        json: json!(RevenueBand::ALL.iter().map(RevenueBand::label).collect::<Vec<_>>()),
        text,
    }
}
