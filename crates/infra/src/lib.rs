//! Infrastructure layer: configuration, simulation runs, JSON persistence.

pub mod columnar;
pub mod config;
pub mod simulation;
pub mod store;


pub use columnar::{ColumnarError, empty_columns, from_columns, to_columns};
pub use config::{ConfigError, SEED_ENV, SimulationConfig};
pub use simulation::{SimulationRun, run, run_with_rng};
pub use store::{JsonOrderStore, StoreError, StoreResult};
