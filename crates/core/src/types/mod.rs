//! Domain types for MediaShelf
//!
//! - `item`: persisted catalog items and their creation payloads
//! - `book`: book records reported by an external catalog, and dedup keys
//! - `stats`: catalog statistics
//! - `common`: shared traits and utilities

mod book;
mod common;
mod item;
mod stats;

pub use book::{BookRecord, DedupKey, DEDUP_KEY_SEPARATOR};
pub use common::{Timestamp, Validator};
pub use item::{Item, ItemFilter, ItemId, MediaType, NewItem};
pub use stats::CatalogStats;
