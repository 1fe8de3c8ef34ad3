//! Order read-side views.

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    domain::catalog::models::{CustomerUuid, ItemUuid},
    domain::orders::{
        models::{OrderUuid, PaymentKind, PaymentUuid},
        status::OrderStatus,
    },
    prices::{Price, fixed2},
};

/// Order as it appears in listings.
///
/// `total_price` is recomputed from current item prices on every read;
/// `last_updated_at` is the derived status timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub uuid: OrderUuid,
    pub status: OrderStatus,
    #[serde(with = "fixed2")]
    pub total_price: Decimal,
    pub last_updated_at: DateTime,
    pub customer_uuid: CustomerUuid,
}

/// A single order line with its item resolved.
///
/// `name` and `unit_price` are absent when the item has since been removed
/// from the catalog; such lines no longer contribute to the total.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineView {
    pub item_uuid: ItemUuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Price>,
}

/// Payment as shown on an order.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentView {
    pub uuid: PaymentUuid,
    pub kind: PaymentKind,
    pub paid_at: DateTime,
    pub amount: Price,
}

/// Full order detail view.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,
    pub status: OrderStatus,
    pub created_at: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_started_at: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime>,
    pub lines: Vec<OrderLineView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentView>,
    #[serde(with = "fixed2")]
    pub total_price: Decimal,
    pub last_updated_at: DateTime,
}
