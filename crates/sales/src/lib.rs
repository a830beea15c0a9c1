//! Sales domain module.
//!
//! Purchase records, the append-only order log, and the seeded order generator
//! that draws orders against a catalog's remaining stock.

pub mod generator;
pub mod log;
pub mod order;

pub use generator::{GeneratorConfig, OrderGenerator, OrderVolume};
pub use log::{LogPhase, OrderLog};
pub use order::Order;
