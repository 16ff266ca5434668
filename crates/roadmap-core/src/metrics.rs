//! # Metrics Engine
//!
//! Pure calculation of the snapshot ratios from owner-entered figures.
//!
//! ## Guarantees
//!
//! - Total: no input produces an error.
//! - Every division is guarded. A zero or negative denominator yields 0, and
//!   so does a result that overflows, so NaN and infinity cannot appear in
//!   [`MetricResults`].
//! - Stateless: identical inputs give bit-identical outputs.
//!
//! | Metric | Formula |
//! |--------|---------|
//! | Avg MRR per client | MRR / MRR clients |
//! | Service GM % | (service revenue - service COGS) / service revenue x 100 |
//! | CAC | marketing spend / new clients |
//! | Monthly GM per client | avg MRR per client x GM % / 100 |
//! | LTV | monthly GM per client x retention months |
//! | LTV/CAC | LTV / CAC |
//! | DSO | AR balance / (revenue last 90 days / 90) |
//! | Staff-to-revenue | ARR / FTE count |
//! | Utilization % | billable hours / (FTEs x available hours) x 100 |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Days in the trailing revenue window used for DSO.
pub const DSO_WINDOW_DAYS: f64 = 90.0;

/// Available hours per FTE per week when the field is left blank.
pub const DEFAULT_AVAILABLE_HOURS_PER_FTE: f64 = 40.0;

// =============================================================================
// INPUTS
// =============================================================================

/// Owner-entered figures. Absent fields are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricInputs {
    pub arr: f64,
    pub mrr: f64,
    pub mrr_clients: f64,
    pub service_revenue: f64,
    pub service_cogs: f64,
    pub marketing_spend: f64,
    pub new_clients: f64,
    pub retention_months: f64,
    pub ar_balance: f64,
    pub revenue_90d: f64,
    pub fte_count: f64,
    pub available_hours: f64,
    pub billable_hours: f64,
}

impl MetricInputs {
    /// Build inputs from raw form fields keyed by their form names
    /// (`arr`, `mrrClients`, `revenue90d`, ...).
    ///
    /// Missing, empty, unparseable, negative and non-finite values become 0.
    /// `availableHours` falls back to [`DEFAULT_AVAILABLE_HOURS_PER_FTE`] when
    /// missing or unparseable.
    #[must_use]
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Self {
        let field = |name: &str| fields.get(name).map(String::as_str);

        Self {
            arr: coerce_field(field("arr")),
            mrr: coerce_field(field("mrr")),
            mrr_clients: coerce_field(field("mrrClients")),
            service_revenue: coerce_field(field("serviceRevenue")),
            service_cogs: coerce_field(field("serviceCogs")),
            marketing_spend: coerce_field(field("marketingSpend")),
            new_clients: coerce_field(field("newClients")),
            retention_months: coerce_field(field("retentionMonths")),
            ar_balance: coerce_field(field("arBalance")),
            revenue_90d: coerce_field(field("revenue90d")),
            fte_count: coerce_field(field("fteCount")),
            available_hours: parse_field(field("availableHours"))
                .map(clamp_non_negative)
                .unwrap_or(DEFAULT_AVAILABLE_HOURS_PER_FTE),
            billable_hours: coerce_field(field("billableHours")),
        }
    }

    /// Copy with every negative or non-finite field replaced by 0.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            arr: clamp_non_negative(self.arr),
            mrr: clamp_non_negative(self.mrr),
            mrr_clients: clamp_non_negative(self.mrr_clients),
            service_revenue: clamp_non_negative(self.service_revenue),
            service_cogs: clamp_non_negative(self.service_cogs),
            marketing_spend: clamp_non_negative(self.marketing_spend),
            new_clients: clamp_non_negative(self.new_clients),
            retention_months: clamp_non_negative(self.retention_months),
            ar_balance: clamp_non_negative(self.ar_balance),
            revenue_90d: clamp_non_negative(self.revenue_90d),
            fte_count: clamp_non_negative(self.fte_count),
            available_hours: clamp_non_negative(self.available_hours),
            billable_hours: clamp_non_negative(self.billable_hours),
        }
    }
}

/// Parse a raw field; `None` when absent or not a finite number.
fn parse_field(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            tracing::debug!(field = raw, "non-numeric metric field coerced to 0");
            None
        }
    }
}

/// Coerce a raw field to a non-negative number, defaulting to 0.
#[must_use]
pub fn coerce_field(raw: Option<&str>) -> f64 {
    parse_field(raw).map(clamp_non_negative).unwrap_or(0.0)
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// `numerator / denominator`, or 0 when the denominator is not positive.
fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        finite_or_zero(numerator / denominator)
    } else {
        0.0
    }
}

/// Overflow to infinity resolves to 0 like any other undefined ratio.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Derived metrics. Recomputed from [`MetricInputs`] on every call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResults {
    pub avg_mrr_per_client: f64,
    /// Percentage, 0-100 scale.
    pub service_gm_percent: f64,
    pub cac: f64,
    pub monthly_gross_margin_per_client: f64,
    pub ltv: f64,
    pub ltv_cac_ratio: f64,
    /// Days.
    pub dso: f64,
    pub staff_to_revenue_ratio: f64,
    /// Percentage, 0-100 scale.
    pub utilization_percent: f64,
}

/// Compute every derived metric.
#[must_use]
pub fn compute_metrics(inputs: &MetricInputs) -> MetricResults {
    let i = inputs.sanitized();

    let avg_mrr_per_client = guarded_div(i.mrr, i.mrr_clients);
    let service_gm_percent =
        finite_or_zero(guarded_div(i.service_revenue - i.service_cogs, i.service_revenue) * 100.0);
    let cac = guarded_div(i.marketing_spend, i.new_clients);
    let monthly_gross_margin_per_client =
        finite_or_zero(avg_mrr_per_client * (service_gm_percent / 100.0));
    let ltv = finite_or_zero(monthly_gross_margin_per_client * i.retention_months);
    let ltv_cac_ratio = guarded_div(ltv, cac);
    let dso = guarded_div(i.ar_balance, i.revenue_90d / DSO_WINDOW_DAYS);
    let staff_to_revenue_ratio = guarded_div(i.arr, i.fte_count);
    let utilization_percent =
        finite_or_zero(guarded_div(i.billable_hours, i.fte_count * i.available_hours) * 100.0);

    MetricResults {
        avg_mrr_per_client,
        service_gm_percent,
        cac,
        monthly_gross_margin_per_client,
        ltv,
        ltv_cac_ratio,
        dso,
        staff_to_revenue_ratio,
        utilization_percent,
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// The record stored under `metricsData`: headline inputs plus results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub arr: f64,
    pub mrr: f64,
    pub mrr_clients: f64,
    pub avg_mrr_per_client: f64,
    #[serde(rename = "serviceGM")]
    pub service_gm: f64,
    pub cac: f64,
    pub ltv: f64,
    pub ltv_cac_ratio: f64,
    pub dso: f64,
    pub staff_revenue_ratio: f64,
    pub utilization_rate: f64,
}

impl MetricsSnapshot {
    /// Combine the inputs and the results computed from them.
    #[must_use]
    pub fn new(inputs: &MetricInputs, results: &MetricResults) -> Self {
        let inputs = inputs.sanitized();
        Self {
            arr: inputs.arr,
            mrr: inputs.mrr,
            mrr_clients: inputs.mrr_clients,
            avg_mrr_per_client: results.avg_mrr_per_client,
            service_gm: results.service_gm_percent,
            cac: results.cac,
            ltv: results.ltv,
            ltv_cac_ratio: results.ltv_cac_ratio,
            dso: results.dso,
            staff_revenue_ratio: results.staff_to_revenue_ratio,
            utilization_rate: results.utilization_percent,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn zero_inputs_give_zero_results() {
        let results = compute_metrics(&MetricInputs::default());
        assert_eq!(results, MetricResults::default());
    }

    #[test]
    fn negative_cogs_above_revenue_gives_negative_margin() {
        let inputs = MetricInputs {
            service_revenue: 100.0,
            service_cogs: 150.0,
            ..MetricInputs::default()
        };
        assert!(close(compute_metrics(&inputs).service_gm_percent, -50.0));
    }

    #[test]
    fn negative_inputs_are_clamped() {
        let inputs = MetricInputs {
            mrr: 1000.0,
            mrr_clients: -4.0,
            ..MetricInputs::default()
        };
        assert_eq!(compute_metrics(&inputs).avg_mrr_per_client, 0.0);
    }

    #[test]
    fn utilization_uses_total_available_hours() {
        let inputs = MetricInputs {
            fte_count: 5.0,
            available_hours: 40.0,
            billable_hours: 140.0,
            ..MetricInputs::default()
        };
        assert!(close(compute_metrics(&inputs).utilization_percent, 70.0));
    }

    #[test]
    fn staff_to_revenue_ratio() {
        let inputs = MetricInputs {
            arr: 1_200_000.0,
            fte_count: 8.0,
            ..MetricInputs::default()
        };
        assert!(close(compute_metrics(&inputs).staff_to_revenue_ratio, 150_000.0));
    }

    #[test]
    fn from_fields_coerces_garbage_to_zero() {
        let inputs = MetricInputs::from_fields(&fields(&[
            ("mrr", "abc"),
            ("arr", "-10"),
            ("fteCount", " 3 "),
            ("billableHours", "NaN"),
        ]));
        assert_eq!(inputs.mrr, 0.0);
        assert_eq!(inputs.arr, 0.0);
        assert_eq!(inputs.fte_count, 3.0);
        assert_eq!(inputs.billable_hours, 0.0);
    }

    #[test]
    fn from_fields_defaults_available_hours() {
        let blank = MetricInputs::from_fields(&fields(&[("availableHours", "")]));
        assert_eq!(blank.available_hours, DEFAULT_AVAILABLE_HOURS_PER_FTE);

        let explicit = MetricInputs::from_fields(&fields(&[("availableHours", "32")]));
        assert_eq!(explicit.available_hours, 32.0);
    }

    #[test]
    fn explicit_zero_available_hours_stays_zero() {
        let inputs = MetricInputs::from_fields(&fields(&[
            ("availableHours", "0"),
            ("fteCount", "4"),
            ("billableHours", "120"),
        ]));
        assert_eq!(inputs.available_hours, 0.0);
        assert_eq!(compute_metrics(&inputs).utilization_percent, 0.0);
    }

    #[test]
    fn snapshot_uses_stored_field_names() {
        let inputs = MetricInputs {
            mrr: 10.0,
            ..MetricInputs::default()
        };
        let snapshot = MetricsSnapshot::new(&inputs, &compute_metrics(&inputs));
        let json = serde_json::to_string(&snapshot).expect("serialize");
        assert!(json.contains("\"serviceGM\":"));
        assert!(json.contains("\"staffRevenueRatio\":"));
        assert!(json.contains("\"utilizationRate\":"));
        assert!(json.contains("\"mrrClients\":"));
    }
}
