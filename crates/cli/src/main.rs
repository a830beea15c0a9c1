use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use marketsim_core::{CustomerId, DomainError};
use marketsim_infra::{JsonOrderStore, SimulationConfig, StoreError};
use marketsim_reporting::{DEFAULT_TOP_N, MonthDomain, SalesQueries, TracingObserver};

mod render;

const DEFAULT_DATA: &str = "sample.json";

#[derive(Parser)]
#[command(name = "marketsim")]
#[command(about = "Synthetic sales generator and sales reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a catalog, generate orders, and save them
    Generate {
        /// JSON simulation config; defaults apply to anything it omits
        #[arg(long)]
        config: Option<PathBuf>,

        /// RNG seed (overrides the config file and MARKETSIM_SEED)
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value = DEFAULT_DATA)]
        out: PathBuf,
    },

    /// Best sellers with their sales and purchases per month
    Report {
        #[arg(long, default_value = DEFAULT_DATA)]
        data: PathBuf,

        /// Number of best sellers
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Sales and mean price per month for one item
    Item {
        title: String,

        #[arg(long, default_value = DEFAULT_DATA)]
        data: PathBuf,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Orders and amounts per month, and amount per item, for one customer
    Customer {
        id: u32,

        #[arg(long, default_value = DEFAULT_DATA)]
        data: PathBuf,

        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(clap::Args)]
struct ViewArgs {
    /// Report all twelve months, not just months with orders
    #[arg(long, default_value_t = false)]
    calendar: bool,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl ViewArgs {
    fn domain(&self) -> MonthDomain {
        if self.calendar {
            MonthDomain::Calendar
        } else {
            MonthDomain::Observed
        }
    }
}

fn main() -> ExitCode {
    marketsim_observability::init();

    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(DomainError::NotFound(what)) = err.downcast_ref::<DomainError>() {
                eprintln!("not found: {what}");
                return ExitCode::from(2);
            }
            if let Some(StoreError::NotFound(path)) = err.downcast_ref::<StoreError>() {
                eprintln!("no data at {}; run `marketsim generate` first", path.display());
                return ExitCode::from(2);
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.cmd {
        Commands::Generate { config, seed, out: path } => {
            let mut config = SimulationConfig::load(config.as_deref()).context("load config")?;
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            let run = marketsim_infra::run(&config)?;
            JsonOrderStore::new(&path).save(&run.log)?;
            writeln!(
                out,
                "generated {} orders over {} listings (seed {}, run {}) -> {}",
                run.log.len(),
                run.catalog.len(),
                run.seed,
                run.run_id,
                path.display()
            )?;
        }

        Commands::Report { data, top, view } => {
            let log = JsonOrderStore::new(data).load()?;
            let queries = SalesQueries::new(&log, TracingObserver)?;
            let report = queries.best_seller_report(top, &view.domain())?;
            if view.json {
                print_json(&mut out, &report)?;
            } else {
                render::best_sellers(&mut out, &report)?;
            }
        }

        Commands::Item { title, data, view } => {
            let log = JsonOrderStore::new(data).load()?;
            let queries = SalesQueries::new(&log, TracingObserver)?;
            let report = queries.item_report(&title, &view.domain())?;
            if view.json {
                print_json(&mut out, &report)?;
            } else {
                render::item(&mut out, &report)?;
            }
        }

        Commands::Customer { id, data, view } => {
            let log = JsonOrderStore::new(data).load()?;
            let queries = SalesQueries::new(&log, TracingObserver)?;
            let report = queries.customer_report(CustomerId::new(id), &view.domain())?;
            if view.json {
                print_json(&mut out, &report)?;
            } else {
                render::customer(&mut out, &report)?;
            }
        }
    }

    Ok(())
}

fn print_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
