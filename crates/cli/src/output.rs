//! Report rendering for the sweep CLI

use clap::ValueEnum;
use colored::Colorize;
use janitor_lib::{DeleteOutcome, SweepReport};
use tabled::{settings::Style, Table, Tabled};

/// Output format for the sweep report
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for the swept-pods table
#[derive(Tabled)]
struct PodRow {
    #[tabled(rename = "Pod")]
    name: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
}

/// Print the sweep report in the selected format
pub fn print_report(report: &SweepReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(report) {
                println!("{}", json);
            }
        }
        OutputFormat::Table => {
            println!("{}", "Sweep Report".bold());
            println!("{}", "=".repeat(50));
            println!("Namespace:    {}", report.namespace.cyan());
            println!("Scanned:      {}", report.scanned);
            println!("Deleted:      {}", report.deleted);
            println!("Already gone: {}", report.already_gone);
            println!("Failed:       {}", report.failed);
            println!();

            if report.pods.is_empty() {
                println!("{}", "No pods matched the cleanup rules".yellow());
                return;
            }

            let rows: Vec<PodRow> = report
                .pods
                .iter()
                .map(|p| PodRow {
                    name: p.name.clone(),
                    reason: p.reason.to_string(),
                    outcome: render_outcome(&p.outcome),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
    }
}

fn render_outcome(outcome: &DeleteOutcome) -> String {
    match outcome {
        DeleteOutcome::Deleted => "deleted".green().to_string(),
        DeleteOutcome::AlreadyGone => "already gone".yellow().to_string(),
        DeleteOutcome::WouldDelete => "would delete".cyan().to_string(),
        DeleteOutcome::Failed(message) => format!("{}: {}", "failed".red(), message),
    }
}
