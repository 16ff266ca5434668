//! # Display Formatting
//!
//! Currency, percentage and day-count rendering for the host output. The
//! core returns raw numbers; everything user-facing is shaped here.

use roadmap_core::Tier;

/// Insert thousands separators into a run of digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format with a fixed number of decimals and thousands separators.
#[must_use]
pub fn format_number(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (fixed.as_str(), None),
    };
    let grouped = group_thousands(whole);
    let sign = if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Whole-dollar currency, e.g. `$31,200`.
#[must_use]
pub fn format_currency(value: f64) -> String {
    let number = format_number(value, 0);
    match number.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", number),
    }
}

/// One-decimal percentage of a 0-100 value, e.g. `65.0%`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value, 1))
}

/// Whole days, e.g. `30 days`.
#[must_use]
pub fn format_days(value: f64) -> String {
    format!("{} days", format_number(value, 0))
}

/// One-decimal ratio, e.g. `15.6`.
#[must_use]
pub fn format_ratio(value: f64) -> String {
    format_number(value, 1)
}

/// Tier marker for text output.
#[must_use]
pub fn tier_marker(tier: Tier) -> &'static str {
    match tier {
        Tier::Good => "[good]",
        Tier::Warn => "[warn]",
        Tier::Risk => "[risk]",
    }
}

/// Text progress bar, e.g. `[#####-----]`.
#[must_use]
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
