//! Order Placement Transaction
//!
//! Places an order as one atomic unit: duplicate order-number check, order
//! insert, and a per-size stock decrement for every line item, executed as a
//! single BEGIN/COMMIT script against the embedded database. A THROW from
//! any statement rolls back everything; no partial order or stock state is
//! ever visible to other readers.
//!
//! Business failures travel out of the script as sentinel strings carried by
//! THROW and are mapped back to typed errors here. Commit conflicts between
//! concurrent placements touching the same product are retried a bounded
//! number of times before surfacing as [`PlacementError::TransactionAborted`].

use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::db::models::{Order, OrderCreate, OrderDraft};
use crate::db::repository::order::{ORDER_NUMBER_INDEX, SENTINEL_DUPLICATE_ORDER};
use crate::db::repository::product::{
    SENTINEL_INSUFFICIENT_STOCK, SENTINEL_PRODUCT_NOT_FOUND,
};
use crate::db::repository::{OrderRepository, ProductRepository, strip_table_prefix};
use crate::orders::validation::validate_order_input;

/// Upper bound on commit-conflict retries for one placement call
const MAX_COMMIT_ATTEMPTS: u32 = 8;

/// Placement failure kinds
#[derive(Debug, Error)]
pub enum PlacementError {
    /// Payload rejected before any write; every violation listed
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("Order with this number already exists")]
    DuplicateOrderNumber,

    #[error("Product {0} not found")]
    ProductNotFound(String),

    #[error(
        "Insufficient stock for {product} ({size}): available {available}, requested {requested}"
    )]
    InsufficientStock {
        product: String,
        size: String,
        available: i64,
        requested: i64,
    },

    /// Backing-store failure during the transaction
    #[error("Order transaction aborted: {0}")]
    TransactionAborted(String),
}

/// Classification of one error string from a failed script run
enum Classified {
    /// Sentinel or unique-index failure; the placement is rejected
    Business(PlacementError),
    /// Optimistic commit conflict; the script can be re-run as-is
    Conflict(String),
    /// Anything else, including the generic aborted-statement error that
    /// every sibling of a THROWing statement reports
    Other(String),
}

enum ScriptFailure {
    Business(PlacementError),
    Conflict(String),
}

#[derive(Clone)]
pub struct PlacementService {
    db: Surreal<Db>,
    orders: OrderRepository,
}

impl PlacementService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            db,
        }
    }

    /// Place an order: validate, then run the placement script until it
    /// commits, hits a business failure, or exhausts its conflict retries.
    pub async fn place_order(&self, draft: &OrderDraft) -> Result<Order, PlacementError> {
        let errors = validate_order_input(draft, true);
        if !errors.is_empty() {
            return Err(PlacementError::Validation(errors));
        }

        let order = OrderCreate::from_draft(draft).ok_or_else(|| {
            PlacementError::TransactionAborted("order payload incomplete after validation".into())
        })?;

        let script = Self::build_script(&order);

        let mut attempt = 1;
        loop {
            match self.run_script(&script, &order).await {
                Ok(()) => break,
                Err(ScriptFailure::Business(err)) => return Err(err),
                Err(ScriptFailure::Conflict(detail)) => {
                    if attempt >= MAX_COMMIT_ATTEMPTS {
                        return Err(PlacementError::TransactionAborted(detail));
                    }
                    tracing::debug!(
                        attempt,
                        order_number = %order.order_number,
                        "Placement commit conflict, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(10 * u64::from(attempt))).await;
                    attempt += 1;
                }
            }
        }

        // The script committed; read the persisted order back
        self.orders
            .find_by_order_number(&order.order_number)
            .await
            .map_err(|e| PlacementError::TransactionAborted(e.to_string()))?
            .ok_or_else(|| {
                PlacementError::TransactionAborted(
                    "placed order not readable after commit".into(),
                )
            })
    }

    /// Assemble the transaction script: duplicate guard and order insert
    /// first, then one reservation block per line item in payload order.
    fn build_script(order: &OrderCreate) -> String {
        let mut script = String::from("BEGIN TRANSACTION;\n");
        script.push_str(&OrderRepository::insert_guarded_statements());
        for idx in 0..order.items.len() {
            script.push_str(&ProductRepository::reserve_stock_statements(idx));
        }
        script.push_str("COMMIT TRANSACTION;\n");
        script
    }

    async fn run_script(&self, script: &str, order: &OrderCreate) -> Result<(), ScriptFailure> {
        let mut query = self
            .db
            .query(script.to_string())
            .bind(("order_number", order.order_number.clone()))
            .bind(("order_doc", order.clone()));

        for (idx, item) in order.items.iter().enumerate() {
            let pid = strip_table_prefix("product", &item.id).to_string();
            query = query
                .bind((format!("pid{idx}"), pid))
                .bind((format!("size{idx}"), item.size.clone()))
                .bind((format!("qty{idx}"), item.quantity));
        }

        let mut response = query.await.map_err(|e| match Self::classify(&e.to_string()) {
            Classified::Business(err) => ScriptFailure::Business(err),
            Classified::Conflict(detail) => ScriptFailure::Conflict(detail),
            Classified::Other(detail) => {
                ScriptFailure::Business(PlacementError::TransactionAborted(detail))
            }
        })?;

        let errors = response.take_errors();
        if errors.is_empty() {
            return Ok(());
        }

        // A THROW fails its own statement with the sentinel and every other
        // statement with a generic aborted error, so scan all of them and
        // let the sentinel win over the noise.
        let mut conflict: Option<String> = None;
        let mut other: Option<String> = None;
        for err in errors.values() {
            match Self::classify(&err.to_string()) {
                Classified::Business(business) => return Err(ScriptFailure::Business(business)),
                Classified::Conflict(detail) => conflict = Some(detail),
                Classified::Other(detail) => other = Some(detail),
            }
        }
        if let Some(detail) = conflict {
            return Err(ScriptFailure::Conflict(detail));
        }
        Err(ScriptFailure::Business(PlacementError::TransactionAborted(
            other.unwrap_or_else(|| "transaction failed".to_string()),
        )))
    }

    /// Map an error string to a business failure, a retryable conflict, or
    /// an unrecognized failure
    fn classify(text: &str) -> Classified {
        if let Some(sentinel) = Self::sentinel_payload(text, SENTINEL_INSUFFICIENT_STOCK) {
            let mut parts = sentinel.split('|');
            return Classified::Business(PlacementError::InsufficientStock {
                product: parts.next().unwrap_or_default().to_string(),
                size: parts.next().unwrap_or_default().to_string(),
                available: parts.next().and_then(|s| s.parse().ok()).unwrap_or(0),
                requested: parts.next().and_then(|s| s.parse().ok()).unwrap_or(0),
            });
        }
        if let Some(id) = Self::sentinel_payload(text, SENTINEL_PRODUCT_NOT_FOUND) {
            return Classified::Business(PlacementError::ProductNotFound(id.to_string()));
        }
        if text.contains(SENTINEL_DUPLICATE_ORDER) || text.contains(ORDER_NUMBER_INDEX) {
            // Pre-check sentinel or commit-time unique index violation
            return Classified::Business(PlacementError::DuplicateOrderNumber);
        }
        if text.contains("read or write conflict") {
            return Classified::Conflict(text.to_string());
        }
        Classified::Other(text.to_string())
    }

    /// Payload after a `PREFIX|` sentinel, if present
    fn sentinel_payload<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
        let start = text.find(prefix)? + prefix.len();
        text[start..].strip_prefix('|')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_parses_insufficient_stock_sentinel() {
        let text = "An error occurred: INSUFFICIENT_STOCK|Noir|30ml|0|1";
        match PlacementService::classify(text) {
            Classified::Business(PlacementError::InsufficientStock {
                product,
                size,
                available,
                requested,
            }) => {
                assert_eq!(product, "Noir");
                assert_eq!(size, "30ml");
                assert_eq!(available, 0);
                assert_eq!(requested, 1);
            }
            _ => panic!("expected InsufficientStock"),
        }
    }

    #[test]
    fn classify_parses_missing_product_sentinel() {
        let text = "An error occurred: PRODUCT_NOT_FOUND|ghost";
        match PlacementService::classify(text) {
            Classified::Business(PlacementError::ProductNotFound(id)) => assert_eq!(id, "ghost"),
            _ => panic!("expected ProductNotFound"),
        }
    }

    #[test]
    fn classify_treats_index_violation_as_duplicate() {
        let text = "Database index `order_number_unique` already contains 'X1'";
        assert!(matches!(
            PlacementService::classify(text),
            Classified::Business(PlacementError::DuplicateOrderNumber)
        ));
    }

    #[test]
    fn classify_marks_commit_conflicts_retryable() {
        let text = "Failed to commit transaction due to a read or write conflict";
        assert!(matches!(
            PlacementService::classify(text),
            Classified::Conflict(_)
        ));
    }
}
