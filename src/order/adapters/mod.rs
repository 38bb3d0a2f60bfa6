//! Adapter implementations of the order ports.

pub mod memory;
pub mod postgres;
