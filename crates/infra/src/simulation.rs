//! One end-to-end simulation run: seed a catalog, then generate orders
//! against it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use marketsim_catalog::Catalog;
use marketsim_core::{DomainResult, RunId};
use marketsim_sales::{OrderGenerator, OrderLog};

use crate::config::SimulationConfig;

/// Output of a run. The catalog carries the stock left after generation.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub run_id: RunId,
    /// Seed the run's `StdRng` started from; feeding it back replays the run.
    pub seed: u64,
    pub catalog: Catalog,
    pub log: OrderLog,
}

/// Run with a `StdRng` seeded from `config.seed`, or from entropy when unset.
pub fn run(config: &SimulationConfig) -> DomainResult<SimulationRun> {
    let seed = config.seed.unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        tracing::info!(seed, "no seed configured; drew one");
        seed
    });
    let run_id = RunId::new();
    let span = tracing::info_span!("simulation", %run_id, seed);
    let _guard = span.enter();

    let mut rng = StdRng::seed_from_u64(seed);
    let (catalog, log) = run_with_rng(config, &mut rng)?;
    tracing::info!(orders = log.len(), "simulation finished");
    Ok(SimulationRun {
        run_id,
        seed,
        catalog,
        log,
    })
}

/// Run with a caller-provided generator.
pub fn run_with_rng<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> DomainResult<(Catalog, OrderLog)> {
    let mut catalog = Catalog::create(&config.catalog, rng)?;
    let generator = OrderGenerator::new(config.orders.clone())?;
    let log = generator.generate_configured(&mut catalog, rng)?;
    Ok((catalog, log))
}
