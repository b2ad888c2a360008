//! Product Model
//!
//! Products are schemaless documents with a dynamic per-size stock map.
//! `in_stock` is derived state: true iff at least one size has stock > 0.
//! It is recomputed whenever `size_stocks` changes and never taken from
//! client input.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use super::serde_thing;

pub type ProductId = Thing;

/// Fragrance note pyramid (top / heart / base)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScentNotes {
    #[serde(default)]
    pub top: Vec<String>,
    #[serde(default)]
    pub heart: Vec<String>,
    #[serde(default)]
    pub base: Vec<String>,
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(
        with = "serde_thing::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ProductId>,
    pub name: String,
    pub category: String,
    /// Smallest size price or default
    pub price: f64,
    pub price_per_10_ml: f64,
    /// Price per size label, e.g. {"30ml": 50.0, "50ml": 80.0}
    #[serde(default)]
    pub calculated_prices: BTreeMap<String, f64>,
    /// Quantity on hand per size label; keys are dynamic, values never
    /// persisted negative. An absent key means zero stock.
    #[serde(default)]
    pub size_stocks: BTreeMap<String, i64>,
    /// Derived: any size with stock > 0
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: ScentNotes,
    #[serde(default)]
    pub reviews: i64,
    /// Offered size labels, e.g. ["30ml", "50ml", "100ml"]
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_visible_in_collection: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// True iff any size in the map has stock > 0
pub fn stocks_have_units(size_stocks: &BTreeMap<String, i64>) -> bool {
    size_stocks.values().any(|&qty| qty > 0)
}

impl Product {
    /// Build a new product document from a validated create payload.
    ///
    /// Returns `None` when a required field is missing; the validator
    /// reports those to the caller before this is reached.
    pub fn from_draft(draft: &ProductDraft) -> Option<Self> {
        let size_stocks = draft.size_stocks.clone().unwrap_or_default();
        Some(Self {
            id: None,
            name: draft.name.clone()?,
            category: draft.category.clone()?,
            price: draft.price?,
            price_per_10_ml: draft.price_per_10_ml?,
            calculated_prices: draft.calculated_prices.clone().unwrap_or_default(),
            in_stock: stocks_have_units(&size_stocks),
            size_stocks,
            description: draft.description.clone().unwrap_or_default(),
            notes: draft.notes.clone().unwrap_or_default(),
            reviews: draft.reviews.unwrap_or(0),
            sizes: draft.sizes.clone().unwrap_or_default(),
            images: draft.images.clone().unwrap_or_default(),
            is_featured: draft.is_featured.unwrap_or(false),
            is_visible_in_collection: draft.is_visible_in_collection.unwrap_or(true),
            created_at: Some(Utc::now()),
            updated_at: None,
        })
    }
}

/// Incoming product payload (create and partial update)
///
/// `in_stock` is intentionally absent: it is derived from `size_stocks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub price_per_10_ml: Option<f64>,
    pub calculated_prices: Option<BTreeMap<String, f64>>,
    pub size_stocks: Option<BTreeMap<String, i64>>,
    pub description: Option<String>,
    pub notes: Option<ScentNotes>,
    pub reviews: Option<i64>,
    pub sizes: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub is_visible_in_collection: Option<bool>,
}
