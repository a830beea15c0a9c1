//! `marketsim-core`: shared building blocks for the marketplace simulation.
//!
//! This crate contains **pure domain** primitives (no IO, no randomness).

pub mod entity;
pub mod error;
pub mod id;
pub mod record;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, RunId};
pub use record::Record;
pub use value_object::{Bounds, Month, ValueObject};
