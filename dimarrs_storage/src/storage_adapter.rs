//! Storage adapters.
//!
//! Storage adapters can be layered on storage.
//! An adapter owns the storage it wraps and forwards every storage call to it.

pub mod performance_metrics;
pub mod usage_log;
