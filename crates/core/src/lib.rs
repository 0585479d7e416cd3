//! Pure domain logic for the network management hub: entity kinds and
//! validation, alert rules, and the network overview aggregation. No I/O
//! and no locking lives here; the registry and job crates layer state on
//! top of these types.

pub mod alert;
pub mod entity;
pub mod error;
pub mod overview;
pub mod types;

pub use error::CoreError;
pub use types::{new_id, EntityId, JobId, Timestamp};
