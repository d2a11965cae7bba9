//! # pantry-shared
//!
//! Domain model and the pure status engine for the Pantry food tracker.
//!
//! Nothing in this crate reads the clock: every operation that depends on the
//! current date takes `today` as an argument so it can be driven from tests
//! and from the HTTP layer alike.

pub mod auth;
pub mod constants;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod lifecycle;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod memory;

pub use error::{PantryError, Result};
pub use inventory::Inventory;
pub use store::{InventoryStore, ItemFilter, ItemOrder};
pub use types::*;
