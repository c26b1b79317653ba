//! Core types shared across the MDES crates
//!
//! Holds the canonical field keys and event names used by the logging
//! facility, the warning sinks and the store, so every crate emits the
//! same structured shape.

pub mod schema;
