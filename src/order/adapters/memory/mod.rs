//! In-memory adapters for order lifecycle storage.

mod order;

pub use order::InMemoryOrderRepository;
