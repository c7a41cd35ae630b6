mod export;
mod render;
mod report;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};

use shrink_ledger::cancellations::load_cancellations_file;
use shrink_ledger::filter::{available_periods, filter_rows, store_list};
use shrink_ledger::{load_ledger_file, LedgerRow, LedgerStore, Scope};
use shrink_pipeline::detectors::check_cash_register_products;
use shrink_pipeline::region::{aggregate_by_group, executive_summary, GroupBy};
use shrink_pipeline::{
    analyze_store, load_cash_codes, load_risk_config, AnalysisQuery, CandidatePipeline, RegionDigestPipeline,
};

use crate::report::{RegionReport, StoreReport};

#[derive(Parser)]
#[command(name = "shrink-sentinel")]
#[command(version, about = "Inventory shrink and theft-risk reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single store
    Store(StoreArgs),

    /// Rank the stores of a region by risk
    Region(RegionArgs),

    /// Add an inventory export to the local ledger store
    Ingest {
        /// Inventory export (CSV, `,` or `;` separated)
        csv: PathBuf,

        /// Ledger store file
        #[arg(long)]
        db: PathBuf,
    },
}

/// Where the ledger rows come from.
#[derive(Args)]
struct Input {
    /// Inventory export (CSV, `,` or `;` separated)
    #[arg(required_unless_present = "db")]
    csv: Option<PathBuf>,

    /// Read from the local ledger store instead of a CSV
    #[arg(long, conflicts_with = "csv")]
    db: Option<PathBuf>,

    /// Inventory period to include; repeat for several
    #[arg(long = "period")]
    periods: Vec<String>,

    /// Cash-register product codes (JSON array or one per line)
    #[arg(long)]
    cash_codes: Option<PathBuf>,

    /// Risk weights file (defaults to weights.json or config/weights.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print JSON instead of the formatted digest
    #[arg(long)]
    json: bool,

    /// Write one CSV per report sheet into this directory
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Args)]
struct StoreArgs {
    #[command(flatten)]
    input: Input,

    /// Store code; defaults to the first store in the data
    #[arg(long)]
    store: Option<String>,

    /// Cancelled sale lines export, for camera-check hints
    #[arg(long)]
    cancellations: Option<PathBuf>,
}

#[derive(Args)]
struct RegionArgs {
    #[command(flatten)]
    input: Input,

    /// Sales manager to restrict to
    #[arg(long)]
    manager: Option<String>,

    /// Roll stores up by sales manager or region manager
    #[arg(long, value_enum, default_value_t = GroupArg::Manager)]
    group_by: GroupArg,

    /// Show only the N riskiest stores
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupArg {
    Manager,
    Region,
}

impl From<GroupArg> for GroupBy {
    fn from(arg: GroupArg) -> Self {
        match arg {
            GroupArg::Manager => GroupBy::SalesManager,
            GroupArg::Region => GroupBy::RegionManager,
        }
    }
}

fn load_rows(input: &Input) -> anyhow::Result<Vec<LedgerRow>> {
    let rows = match (&input.csv, &input.db) {
        (_, Some(db)) => LedgerStore::open(db)
            .and_then(|store| store.rows())
            .with_context(|| format!("reading ledger store {}", db.display()))?,
        (Some(csv), None) => {
            load_ledger_file(csv)
                .with_context(|| format!("loading {}", csv.display()))?
                .rows
        }
        (None, None) => bail!("either a CSV file or --db is required"),
    };
    log::info!("Loaded {} ledger rows", rows.len());
    Ok(rows)
}

fn load_codes(path: Option<&Path>) -> anyhow::Result<HashSet<String>> {
    match path {
        Some(path) => Ok(load_cash_codes(path)?),
        None => Ok(HashSet::new()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_store(args: StoreArgs) -> anyhow::Result<()> {
    let input = &args.input;
    let rows = load_rows(input)?;
    let config = load_risk_config(input.config.as_deref())?;
    let cash_codes = load_codes(input.cash_codes.as_deref())?;
    let cancellations = match &args.cancellations {
        Some(path) => load_cancellations_file(path)
            .with_context(|| format!("loading cancellations {}", path.display()))?,
        None => Vec::new(),
    };

    let in_periods = filter_rows(
        &rows,
        &Scope {
            periods: input.periods.clone(),
            ..Default::default()
        },
    );
    let store_code = match &args.store {
        Some(code) => code.clone(),
        None => {
            let first = in_periods
                .first()
                .map(|r| r.store_code.clone())
                .context("no rows in the selected periods")?;
            let stores = store_list(&in_periods);
            if stores.len() > 1 {
                log::warn!(
                    "{} stores in the data, analyzing {}; pass --store to choose",
                    stores.len(),
                    first
                );
            }
            first
        }
    };

    let scoped = filter_rows(
        &in_periods,
        &Scope {
            store_code: Some(store_code.clone()),
            ..Default::default()
        },
    );
    if scoped.is_empty() {
        bail!("no rows for store {}", store_code);
    }

    let started = Instant::now();
    let analysis = analyze_store(&scoped, &config, &cash_codes, &cancellations).await;
    let report = StoreReport::new(
        analysis,
        available_periods(&scoped),
        scoped.len(),
        started.elapsed().as_millis(),
    );

    if let Some(dir) = &input.export {
        export::export_store(&report, dir)?;
    }
    if input.json {
        print_json(&report)
    } else {
        render::print_store(&report);
        Ok(())
    }
}

async fn run_region(args: RegionArgs) -> anyhow::Result<()> {
    let input = &args.input;
    let rows = load_rows(input)?;
    let config = load_risk_config(input.config.as_deref())?;
    let cash_codes = load_codes(input.cash_codes.as_deref())?;

    let scope = Scope {
        sales_manager: args.manager.clone(),
        store_code: None,
        periods: input.periods.clone(),
    };
    let query = AnalysisQuery::new(format!("region-{}", chrono::Utc::now().timestamp()), scope);

    let started = Instant::now();
    // Every store is ranked; `--top` only trims the listing so group
    // roll-ups and totals still cover the whole scope.
    let pipeline = RegionDigestPipeline::new(rows.clone(), cash_codes.clone(), config, None);
    let result = pipeline.execute(query).await;
    let pipeline_ms = started.elapsed().as_millis();

    let scoped = filter_rows(&rows, &result.query.scope);
    let cash = check_cash_register_products(&scoped, &cash_codes);
    let summary = executive_summary(&scoped, Some(&cash));
    let group_by = GroupBy::from(args.group_by);
    let groups = aggregate_by_group(&result.selected_candidates, group_by);

    let report = RegionReport::new(
        result.query.scope.periods.clone(),
        args.manager.clone(),
        group_by,
        pipeline_ms,
        result.selected_candidates,
        groups,
        summary,
        args.top,
    );

    if let Some(dir) = &input.export {
        export::export_region(&report, dir)?;
    }
    if input.json {
        print_json(&report)
    } else {
        render::print_region(&report);
        Ok(())
    }
}

fn run_ingest(csv: &Path, db: &Path) -> anyhow::Result<()> {
    let ledger = load_ledger_file(csv).with_context(|| format!("loading {}", csv.display()))?;
    let store = LedgerStore::open(db).with_context(|| format!("opening {}", db.display()))?;
    let outcome = store.insert(&ledger)?;

    println!("{}", outcome.message);
    println!("  inserted {} rows, skipped {}", outcome.inserted, outcome.skipped);

    let all = store.rows()?;
    println!(
        "  store now holds {} rows, {} stores, periods: {}",
        all.len(),
        store_list(&all).len(),
        available_periods(&all).join(", ")
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shrink=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Store(args) => run_store(args).await,
        Commands::Region(args) => run_region(args).await,
        Commands::Ingest { csv, db } => run_ingest(&csv, &db),
    }
}
