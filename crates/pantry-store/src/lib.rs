//! # pantry-store
//!
//! SQLite storage for the Pantry food tracker.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection`. It implements
//! [`pantry_shared::InventoryStore`] for food items and adds the user and
//! session tables the auth layer needs.

pub mod database;
pub mod items;
pub mod migrations;
pub mod models;
pub mod sessions;
pub mod users;

mod error;
mod inventory;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
