//! Production status enumeration and its stable lookup codes.

use super::ParseOrderStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Production status of a service order.
///
/// Any status may follow any other; the enumeration is closed so ranking and
/// metrics can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Parts or machines have not arrived yet.
    AwaitingArrival,
    /// Ready to be assembled.
    Backlog,
    /// Currently on the assembly bench.
    InAssembly,
    /// Finished and delivered.
    Completed,
    /// Registered but blocked on an external decision.
    Pending,
    /// Withdrawn before completion.
    Cancelled,
}

impl OrderStatus {
    /// Every status in lookup-code order.
    pub const ALL: [Self; 6] = [
        Self::AwaitingArrival,
        Self::Backlog,
        Self::InAssembly,
        Self::Completed,
        Self::Pending,
        Self::Cancelled,
    ];

    /// Statuses that close an order.
    pub const TERMINAL: [Self; 2] = [Self::Completed, Self::Cancelled];

    /// Statuses counted as backlog in activity reports.
    pub const BACKLOG: [Self; 2] = [Self::Backlog, Self::InAssembly];

    /// Returns the stable numeric code stored in the `order_statuses` table.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::AwaitingArrival => 1,
            Self::Backlog => 2,
            Self::InAssembly => 3,
            Self::Completed => 4,
            Self::Pending => 5,
            Self::Cancelled => 6,
        }
    }

    /// Resolves a lookup code.
    ///
    /// # Errors
    ///
    /// Returns [`ParseOrderStatusError`] for codes outside the lookup table.
    pub fn from_code(code: i16) -> Result<Self, ParseOrderStatusError> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or_else(|| ParseOrderStatusError(code.to_string()))
    }

    /// Returns the canonical machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingArrival => "awaiting_arrival",
            Self::Backlog => "backlog",
            Self::InAssembly => "in_assembly",
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the label shown to operators.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AwaitingArrival => "Aguardando Chegada",
            Self::Backlog => "Backlog",
            Self::InAssembly => "Em Montagem",
            Self::Completed => "Concluído",
            Self::Pending => "Pendente",
            Self::Cancelled => "Cancelado",
        }
    }

    /// Returns `true` for Completed and Cancelled.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns `true` for statuses eligible for the active work set.
    #[must_use]
    pub const fn is_workable(self) -> bool {
        matches!(self, Self::Backlog | Self::InAssembly)
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = ParseOrderStatusError;

    /// Accepts a lookup code, canonical name, or operator label.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase();
        if let Ok(code) = normalized.parse::<i16>() {
            return Self::from_code(code).map_err(|_| ParseOrderStatusError(value.to_owned()));
        }
        Self::ALL
            .into_iter()
            .find(|status| {
                status.as_str() == normalized || status.label().to_lowercase() == normalized
            })
            .ok_or_else(|| ParseOrderStatusError(value.to_owned()))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
