//! Outbound adapters implementing domain ports.
//!
//! - **api**: reqwest-backed gateway to the Compass REST API
//! - **flags**: JSON document flag store written through `cap-std`
//! - **analytics**: content view sink emitting `tracing` events
//!
//! Adapters translate between domain types and infrastructure; they hold no
//! presentation logic.

pub mod analytics;
pub mod api;
pub mod flags;
