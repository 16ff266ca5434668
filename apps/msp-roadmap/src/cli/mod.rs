//! # MSP Roadmap CLI Module
//!
//! This module implements the CLI interface for the roadmap.
//!
//! ## Available Commands
//!
//! - `metrics` - Compute snapshot metrics from raw figures
//! - `assess` - Classify the business into a phase
//! - `checklist show` / `checklist toggle` - Phase action checklists
//! - `status` - Show the saved assessment, metrics and progress
//! - `bands` - List the accepted revenue bands

mod commands;

use clap::{Args, Parser, Subcommand};
use roadmap_core::{Phase, RedbStore, RoadmapError, Session};
use std::path::PathBuf;

use crate::config::AppConfig;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// MSP Revenue Roadmap
///
/// Metrics calculator, phase assessment and action checklists for MSP owners.
#[derive(Parser, Debug)]
#[command(name = "msp-roadmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the roadmap database
    #[arg(short = 'D', long, global = true, default_value = "msp-roadmap.redb")]
    pub database: PathBuf,

    /// Path to a TOML config file with threshold overrides
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Raw metric fields. Values are passed through as text and coerced by the
/// core, so blanks and typos count as zero.
#[derive(Args, Debug, Default, Clone)]
pub struct MetricFields {
    /// Annual recurring revenue
    #[arg(long)]
    pub arr: Option<String>,
    /// Monthly recurring revenue
    #[arg(long)]
    pub mrr: Option<String>,
    /// Clients paying MRR
    #[arg(long)]
    pub mrr_clients: Option<String>,
    /// Monthly service revenue
    #[arg(long)]
    pub service_revenue: Option<String>,
    /// Monthly service COGS
    #[arg(long)]
    pub service_cogs: Option<String>,
    /// Sales and marketing spend this period
    #[arg(long)]
    pub marketing_spend: Option<String>,
    /// New clients this period
    #[arg(long)]
    pub new_clients: Option<String>,
    /// Average retention in months
    #[arg(long)]
    pub retention_months: Option<String>,
    /// AR balance today
    #[arg(long)]
    pub ar_balance: Option<String>,
    /// Revenue over the last 90 days
    #[arg(long)]
    pub revenue_90d: Option<String>,
    /// Full-time equivalents
    #[arg(long)]
    pub fte_count: Option<String>,
    /// Available hours per FTE per week (default 40)
    #[arg(long)]
    pub available_hours: Option<String>,
    /// Billable hours logged last week
    #[arg(long)]
    pub billable_hours: Option<String>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute snapshot metrics and save them
    Metrics(MetricFields),

    /// Classify the business into a phase and save the assessment
    Assess {
        /// Revenue band: "<1M", "1–3M", "3–5M", "~5M plateau" or "5–10M"
        #[arg(short, long)]
        band: String,

        /// Number of clients
        #[arg(long, default_value = "0")]
        clients: u32,

        /// Average MRR per client
        #[arg(long, default_value = "0")]
        avg_mrr: u64,

        /// PSA in place
        #[arg(long)]
        psa: bool,

        /// SOPs documented
        #[arg(long)]
        sops: bool,

        /// AR automation live
        #[arg(long)]
        ar_auto: bool,

        /// AM/TBR cadence running
        #[arg(long)]
        am_tbr: bool,

        /// Finance controller in seat
        #[arg(long)]
        finance: bool,
    },

    /// Phase action checklists
    #[command(subcommand)]
    Checklist(ChecklistCommand),

    /// Show saved assessment, metrics and checklist progress
    Status,

    /// List the accepted revenue bands
    Bands,
}

/// Checklist subcommands.
#[derive(Subcommand, Debug)]
pub enum ChecklistCommand {
    /// Show a phase checklist (defaults to the assessed phase)
    Show {
        /// Phase number, 1-5
        #[arg(short, long)]
        phase: Option<u8>,
    },

    /// Toggle a checklist item
    Toggle {
        /// Phase number, 1-5
        #[arg(short, long)]
        phase: u8,

        /// Item ID, e.g. "sops"
        #[arg(short, long)]
        item: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), RoadmapError> {
    let config = AppConfig::load(cli.config.as_deref())?;

    let output = match cli.command {
        Some(Commands::Bands) => cmd_bands(),
        command => {
            let store = RedbStore::open(&cli.database)?;
            if cli.verbose {
                tracing::info!("Opened roadmap database {:?}", cli.database);
            }
            let mut session = Session::open(store);
            dispatch(&mut session, &config, command)?
        }
    };

    output.print(cli.json_mode);
    Ok(())
}

/// Run a command against an open session.
pub fn dispatch<S: roadmap_core::KeyValueStore>(
    session: &mut Session<S>,
    config: &AppConfig,
    command: Option<Commands>,
) -> Result<CommandOutput, RoadmapError> {
    match command {
        Some(Commands::Metrics(fields)) => cmd_metrics(session, config, &fields),
        Some(Commands::Assess {
            band,
            clients,
            avg_mrr,
            psa,
            sops,
            ar_auto,
            am_tbr,
            finance,
        }) => {
            let systems = roadmap_core::SystemsChecklist {
                psa,
                sops,
                ar_auto,
                am_tbr,
                finance,
            };
            cmd_assess(session, &band, clients, avg_mrr, systems)
        }
        Some(Commands::Checklist(ChecklistCommand::Show { phase })) => {
            let phase = match phase {
                Some(n) => Phase::from_number(n)?,
                None => session.current_phase(),
            };
            Ok(cmd_checklist_show(session, phase))
        }
        Some(Commands::Checklist(ChecklistCommand::Toggle { phase, item })) => {
            cmd_checklist_toggle(session, Phase::from_number(phase)?, &item)
        }
        Some(Commands::Bands) => Ok(cmd_bands()),
        // No subcommand - show status by default
        Some(Commands::Status) | None => Ok(cmd_status(session, config)),
    }
}
