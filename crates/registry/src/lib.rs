//! In-memory entity registry with bounded per-entity change history.

pub mod history;
pub mod store;

pub use history::{BoundedHistory, HistoryEntry};
pub use store::{EntityStore, DEFAULT_HISTORY_CAP};
