//! Service order lifecycle management.
//!
//! Orders move through a closed set of statuses. Every status change is
//! recorded in an append-only history and the first entry into a terminal
//! status stamps the completion time. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
