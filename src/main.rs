use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{error, info};
use windfarm_logistics::{telemetry, Config, Planner};

/// Plan offshore wind component production and shipping for one twelve-month horizon
#[derive(Debug, Parser)]
#[command(name = "windfarm-logistics", version, about)]
struct Cli {
    /// Facility table (CSV, one row per location)
    #[arg(short, long)]
    facilities: PathBuf,

    /// Route table (CSV, one row per shipping lane)
    #[arg(short, long)]
    routes: PathBuf,

    /// Configuration file; defaults to config/default.toml when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    telemetry::init_tracing(&cfg.logging);

    let facilities = File::open(&cli.facilities)
        .with_context(|| format!("cannot open facility table {}", cli.facilities.display()))?;
    let routes = File::open(&cli.routes)
        .with_context(|| format!("cannot open route table {}", cli.routes.display()))?;

    info!(
        facilities = %cli.facilities.display(),
        routes = %cli.routes.display(),
        "planning"
    );

    let planner = Planner::new(cfg.clone());
    let solved = match planner.plan_from_readers(BufReader::new(facilities), BufReader::new(routes))
    {
        Ok(solved) => solved,
        Err(e) if e.is_not_optimal() => {
            error!(error = %e, "no optimal plan");
            anyhow::bail!("no optimal plan: {e}");
        }
        Err(e) => return Err(e).context("planning failed"),
    };

    let report = solved.report(&cfg.report);
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("cannot create report {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    serde_json::to_writer_pretty(&mut out, &report).context("failed to write report")?;
    writeln!(out)?;
    out.flush()?;

    info!(total_cost = report.total_cost, "plan written");
    Ok(())
}
