//! Administration of a hierarchical category catalog.
//!
//! The server side lives in [`features::categories`] (store, service, HTTP
//! resource) and [`core`] (config, errors, router). [`client`] is the typed
//! consumer of that HTTP API and [`contract`] holds the interactions the
//! client relies on, with a mock provider and a live-provider verifier.

pub mod client;
pub mod contract;
pub mod core;
pub mod features;
pub mod shared;
