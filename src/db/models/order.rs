//! Order Model
//!
//! Orders embed their line items as denormalized snapshots taken at order
//! time; a line item's `id` is a weak reference to a product that may later
//! be deleted or repriced without affecting the placed order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use super::serde_thing;

pub type OrderId = Thing;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }
}

/// Line item embedded in an order
///
/// Fields default when absent so that orders whose items were replaced by a
/// partial update (which may carry incomplete item objects) still read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product reference (string id, no ownership)
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
    /// Unit price snapshot at order time
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub size: String,
}

impl LineItem {
    fn from_draft(draft: &LineItemDraft) -> Option<Self> {
        Some(Self {
            id: draft.id.clone()?,
            name: draft.name.clone()?,
            quantity: draft.quantity?,
            price: draft.price?,
            size: draft.size.clone()?,
        })
    }
}

/// Order model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(
        with = "serde_thing::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<OrderId>,
    /// Caller-supplied, globally unique
    pub order_number: String,
    pub customer_name: String,
    pub email: String,
    pub items: Vec<LineItem>,
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    /// Order date (YYYY-MM-DD string)
    pub date: String,
    pub shipping_address: String,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub item_count: i64,
    #[serde(default)]
    pub discount_amount: f64,
    #[serde(default)]
    pub shipped: bool,
    #[serde(default)]
    pub delivered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Incoming line item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItemDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Incoming order payload (create and partial update)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDraft {
    pub order_number: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub shipping_address: Option<String>,
    pub date: Option<String>,
    pub subtotal: Option<f64>,
    pub tax: Option<f64>,
    pub shipping: Option<f64>,
    pub item_count: Option<i64>,
    pub discount_amount: Option<f64>,
    pub total: Option<f64>,
    pub items: Option<Vec<LineItemDraft>>,
    pub status: Option<String>,
    pub shipped: Option<bool>,
    pub delivered: Option<bool>,
}

/// Insert document for a new order (ids are assigned by the database)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub order_number: String,
    pub customer_name: String,
    pub email: String,
    pub items: Vec<LineItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub date: String,
    pub shipping_address: String,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub item_count: i64,
    pub discount_amount: f64,
    pub shipped: bool,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
}

impl OrderCreate {
    /// Build the insert document from a draft that already passed new-order
    /// validation. Returns `None` when a required field is missing (the
    /// validator reports those individually).
    pub fn from_draft(draft: &OrderDraft) -> Option<Self> {
        let items = draft
            .items
            .as_ref()?
            .iter()
            .map(LineItem::from_draft)
            .collect::<Option<Vec<_>>>()?;
        let status = match draft.status.as_deref() {
            None => OrderStatus::Pending,
            Some(s) => OrderStatus::parse(s)?,
        };
        Some(Self {
            order_number: draft.order_number.clone()?,
            customer_name: draft.customer_name.clone()?,
            email: draft.email.clone()?,
            items,
            total: draft.total?,
            status,
            date: draft.date.clone()?,
            shipping_address: draft.shipping_address.clone()?,
            subtotal: draft.subtotal?,
            tax: draft.tax?,
            shipping: draft.shipping?,
            item_count: draft.item_count?,
            discount_amount: draft.discount_amount?,
            shipped: draft.shipped.unwrap_or(false),
            delivered: draft.delivered.unwrap_or(false),
            created_at: Utc::now(),
        })
    }
}
