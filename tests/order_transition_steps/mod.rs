//! Step definitions for order transition scenarios.

mod then;
pub mod world;
