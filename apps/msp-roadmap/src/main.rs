//! # MSP Roadmap
//!
//! The main binary for the MSP Revenue Roadmap.
//!
//! ## Usage
//!
//! ```bash
//! # Snapshot metrics
//! msp-roadmap metrics --mrr 100000 --mrr-clients 50 --service-revenue 80000 --service-cogs 28000
//!
//! # Phase assessment
//! msp-roadmap assess --band "~5M plateau" --clients 120 --avg-mrr 3500 --psa --sops
//!
//! # Checklists
//! msp-roadmap checklist show --phase 4
//! msp-roadmap checklist toggle --phase 4 --item dashboard
//!
//! # Everything saved so far
//! msp-roadmap status
//! ```

use clap::Parser;
use msp_roadmap::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // MSP_ROADMAP_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("MSP_ROADMAP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "msp_roadmap=info,roadmap_core=warn".into());

    // Logs go to stderr; stdout carries command output.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
