//! Catalog domain module.
//!
//! Sellable listings and their live inventory, seeded from a generation recipe.
//! Pure domain logic: randomness is always injected by the caller.

pub mod catalog;
pub mod item;

pub use catalog::{Catalog, CatalogConfig};
pub use item::{Item, ItemId, MAX_PRICE, NewItem, StockChange};
