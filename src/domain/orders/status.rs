//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its fulfillment lifecycle.
///
/// Transitions:
/// ```text
/// Cart ──► Pending ──► Confirmed ──► Preparation ──► Shipped ──► Delivered
///             │            │             │              │
///             └────────────┴─────────────┴──────────────┴──► Cancelled
/// ```
///
/// The primary sequence is monotonic; moving backwards is never legal. A
/// cart that is never checked out simply stays a cart, so `Cancelled` is
/// reachable from `Pending` onwards only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Open basket; lines can still be added and removed.
    #[default]
    Cart,

    /// Checked out, awaiting confirmation.
    Pending,

    /// Confirmed; payment can be recorded from here on.
    Confirmed,

    /// Fulfillment has started.
    Preparation,

    /// Handed to the carrier.
    Shipped,

    /// Received by the customer (terminal).
    Delivered,

    /// Cancelled before delivery (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if `next` is a legal transition from this status.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Cart, Self::Pending)
                | (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Preparation)
                | (Self::Preparation, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
        ) || (matches!(next, Self::Cancelled) && self.can_cancel())
    }

    /// Returns true if the order can be cancelled in this status.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Confirmed | Self::Preparation | Self::Shipped
        )
    }

    /// Returns true if lines can be modified in this status.
    #[must_use]
    pub const fn can_modify_lines(self) -> bool {
        matches!(self, Self::Cart)
    }

    /// Returns true if this is a terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Returns the status name as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "Cart",
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Preparation => "Preparation",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
