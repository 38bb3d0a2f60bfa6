//! Pedidos: service-order lifecycle and production analytics.
//!
//! This crate tracks hardware assembly orders through their lifecycle and
//! derives the production board, throughput metrics and activity reports
//! from order snapshots.
//!
//! # Architecture
//!
//! Pedidos follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`order`]: Order model, status transitions and persistence
//! - [`production`]: Ranking, board, metrics and report generation
//! - [`config`]: Layered service configuration

pub mod config;
pub mod order;
pub mod production;
