//! Pod janitor CLI
//!
//! One-shot cleanup pass over a namespace: list the pods, delete the
//! ones that are finished (succeeded, or failed with no restart ahead)
//! or stuck (evicted, or not-ready past a threshold), and report what
//! happened.

mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use janitor_lib::{KubePodApi, Sweeper};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Clean up pods in evicted, failed, or succeeded states
#[derive(Parser)]
#[command(name = "pod-janitor")]
#[command(author, version, about = "Sweep terminal and stuck pods out of a namespace", long_about = None)]
struct Cli {
    /// Namespace to sweep
    #[arg(long, env = "POD_JANITOR_NAMESPACE", default_value = "default")]
    namespace: String,

    /// Minutes a not-ready pod may sit before it counts as stuck
    #[arg(long, env = "POD_JANITOR_STUCK_THRESHOLD", default_value_t = 15)]
    stuck_threshold: i64,

    /// Path to kubeconfig file (uses in-cluster or default config if not specified)
    #[arg(long, env = "KUBECONFIG")]
    kubeconfig: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    format: output::OutputFormat,

    /// Classify and report without deleting anything
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer())
        .init();

    let api = match &cli.kubeconfig {
        Some(path) => KubePodApi::from_kubeconfig(path).await?,
        None => KubePodApi::try_default().await?,
    };

    info!(namespace = %cli.namespace, dry_run = cli.dry_run, "starting sweep");
    let sweeper = Sweeper::new(Arc::new(api), cli.stuck_threshold).dry_run(cli.dry_run);
    let report = sweeper.sweep(&cli.namespace).await?;

    output::print_report(&report, cli.format);
    Ok(())
}
