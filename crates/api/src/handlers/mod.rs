//! Request handlers, grouped by resource.

pub mod configs;
pub mod devices;
pub mod entities;
pub mod jobs;
pub mod network;
pub mod repositories;
