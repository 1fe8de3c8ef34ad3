//! Order Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::catalog::models::{CustomerUuid, ItemUuid},
    domain::orders::{errors::OrdersError, status::OrderStatus},
    prices::Price,
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Payment UUID
pub type PaymentUuid = TypedUuid<Payment>;

/// Payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
    Card,
    ApplePay,
    GooglePay,
    Blik,
}

impl PaymentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::ApplePay => "ApplePay",
            Self::GooglePay => "GooglePay",
            Self::Blik => "Blik",
        }
    }
}

/// Payment Model
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub uuid: PaymentUuid,
    pub kind: PaymentKind,
    pub paid_at: Timestamp,
    pub amount: Price,
}

/// Order line, identified by `(order, item)`.
///
/// The line carries no price: the order total is always derived from the
/// item's current price at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub item_uuid: ItemUuid,
    pub quantity: u32,
}

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub confirmed_at: Option<Timestamp>,
    pub preparation_started_at: Option<Timestamp>,
    pub shipped_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub lines: Vec<OrderLine>,
    pub payment: Option<Payment>,
}

impl Order {
    /// Opens a fresh cart for a customer.
    #[must_use]
    pub fn new_cart(customer_uuid: CustomerUuid, created_at: Timestamp) -> Self {
        Self {
            uuid: OrderUuid::new(),
            customer_uuid,
            status: OrderStatus::Cart,
            created_at,
            confirmed_at: None,
            preparation_started_at: None,
            shipped_at: None,
            delivered_at: None,
            cancelled_at: None,
            lines: Vec::new(),
            payment: None,
        }
    }

    /// Moves the order to `next`, stamping the matching status timestamp.
    ///
    /// A rejected transition leaves the order completely unchanged, so
    /// calling this with an illegal `next` any number of times is harmless.
    ///
    /// # Errors
    ///
    /// - [`OrdersError::InvalidTransition`]: `next` is not reachable from the
    ///   current status.
    pub fn apply_transition(&mut self, next: OrderStatus, at: Timestamp) -> Result<(), OrdersError> {
        if !self.status.can_transition_to(next) {
            return Err(OrdersError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        match next {
            OrderStatus::Confirmed => self.confirmed_at = Some(at),
            OrderStatus::Preparation => self.preparation_started_at = Some(at),
            OrderStatus::Shipped => self.shipped_at = Some(at),
            OrderStatus::Delivered => self.delivered_at = Some(at),
            OrderStatus::Cancelled => self.cancelled_at = Some(at),
            // Pending and Cart carry no timestamp column.
            OrderStatus::Pending | OrderStatus::Cart => {}
        }

        self.status = next;

        Ok(())
    }

    /// Returns when the order last changed status.
    ///
    /// Precedence runs backwards through the lifecycle: cancelled, delivered,
    /// shipped, preparation started, confirmed, falling back to the creation
    /// instant. Pure and total.
    #[must_use]
    pub fn last_updated_at(&self) -> Timestamp {
        self.cancelled_at
            .or(self.delivered_at)
            .or(self.shipped_at)
            .or(self.preparation_started_at)
            .or(self.confirmed_at)
            .unwrap_or(self.created_at)
    }

    /// Merges `quantity` of an item into the cart, extending an existing
    /// line when one is present.
    pub fn merge_line(&mut self, item_uuid: ItemUuid, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_uuid == item_uuid) {
            line.quantity += quantity;
        } else {
            self.lines.push(OrderLine {
                item_uuid,
                quantity,
            });
        }
    }

    /// Removes the line for an item, returning false when none existed.
    pub fn remove_line(&mut self, item_uuid: ItemUuid) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.item_uuid != item_uuid);

        self.lines.len() < before
    }

    /// Returns the line for an item, if any.
    #[must_use]
    pub fn line(&self, item_uuid: ItemUuid) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.item_uuid == item_uuid)
    }
}
