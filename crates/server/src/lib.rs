//! HTTP surface for the armory catalog service.
//!
//! Exposed as a library so integration tests can build the router with mock
//! sources injected; the `armory` binary wires it to real adapters.

pub mod api;
pub mod metrics;
pub mod state;
