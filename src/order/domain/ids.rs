//! Identifier and validated scalar types for the order domain.

use super::OrderDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a service order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new random order identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an order identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for OrderId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = OrderDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| OrderDomainError::InvalidOrderId(value.to_owned()))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of machines requested by an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// Largest quantity representable in the current `PostgreSQL` schema.
    const MAX_PERSISTED_VALUE: u32 = i32::MAX.unsigned_abs();

    /// Creates a validated intake quantity.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::InvalidQuantity`] when the value is not
    /// positive or exceeds the schema-backed maximum (`i32::MAX`).
    pub fn new(value: i64) -> Result<Self, OrderDomainError> {
        match u32::try_from(value) {
            Ok(count) if count > 0 && count <= Self::MAX_PERSISTED_VALUE => Ok(Self(count)),
            _ => Err(OrderDomainError::InvalidQuantity(value)),
        }
    }

    /// Rebuilds a stored quantity without the intake positivity check.
    ///
    /// Legacy rows may carry zero; negative values are clamped to zero.
    #[must_use]
    pub fn from_persisted(value: i32) -> Self {
        Self(u32::try_from(value).unwrap_or(0))
    }

    /// Returns the machine count.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted work-order priority; lower values are served first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(i32);

impl Priority {
    /// Wraps a raw priority value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the priority handed to a newly created order.
    ///
    /// The result is `max(existing, 0) + 1`, so an empty store starts at 1.
    #[must_use]
    pub fn next_after(existing: impl IntoIterator<Item = Self>) -> Self {
        let highest = existing
            .into_iter()
            .map(Self::value)
            .max()
            .unwrap_or(0)
            .max(0);
        Self(highest.saturating_add(1))
    }

    /// Returns the raw priority value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of whoever performed a change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    /// Fallback identity used when the caller is unknown.
    pub const UNKNOWN: &'static str = "Desconhecido";

    /// Creates an actor from a caller identity, falling back to
    /// [`Actor::UNKNOWN`] for blank input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self(Self::UNKNOWN.to_owned());
        }
        Self(trimmed.to_owned())
    }

    /// Returns the actor identity as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Actor {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
