//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Order, OrderDraft};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

/// Sentinel thrown when the in-transaction duplicate pre-check fires
pub const SENTINEL_DUPLICATE_ORDER: &str = "DUPLICATE_ORDER_NUMBER";

/// Name of the unique index guarding `orderNumber` at commit time
pub const ORDER_NUMBER_INDEX: &str = "order_number_unique";

// =============================================================================
// Order Repository
// =============================================================================

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let pure_id = strip_table_prefix(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select((ORDER_TABLE, pure_id)).await?;
        Ok(order)
    }

    pub async fn find_by_order_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE orderNumber = $order_number LIMIT 1")
            .bind(("order_number", order_number.to_string()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Statements inserting the order inside a BEGIN/COMMIT script. The
    /// duplicate pre-check closes the common path; the unique index on
    /// `orderNumber` closes the race window between two concurrent scripts
    /// that both pass the pre-check. Expects `$order_number` and `$order_doc`
    /// bound by the caller.
    pub fn insert_guarded_statements() -> String {
        format!(
            "LET $dup = (SELECT id FROM order WHERE orderNumber = $order_number);\n\
             IF array::len($dup) > 0 {{ THROW '{dup}' }};\n\
             CREATE order CONTENT $order_doc;\n",
            dup = SENTINEL_DUPLICATE_ORDER,
        )
    }

    /// Partial update; only fields present in the draft are written
    pub async fn update(&self, id: &str, draft: OrderDraft) -> RepoResult<Order> {
        let pure_id = strip_table_prefix(ORDER_TABLE, id).to_string();

        let mut set_parts: Vec<&str> = vec!["updatedAt = time::now()"];
        if draft.order_number.is_some() {
            set_parts.push("orderNumber = $order_number");
        }
        if draft.customer_name.is_some() {
            set_parts.push("customerName = $customer_name");
        }
        if draft.email.is_some() {
            set_parts.push("email = $email");
        }
        if draft.shipping_address.is_some() {
            set_parts.push("shippingAddress = $shipping_address");
        }
        if draft.date.is_some() {
            set_parts.push("date = $date");
        }
        if draft.subtotal.is_some() {
            set_parts.push("subtotal = $subtotal");
        }
        if draft.tax.is_some() {
            set_parts.push("tax = $tax");
        }
        if draft.shipping.is_some() {
            set_parts.push("shipping = $shipping");
        }
        if draft.item_count.is_some() {
            set_parts.push("itemCount = $item_count");
        }
        if draft.discount_amount.is_some() {
            set_parts.push("discountAmount = $discount_amount");
        }
        if draft.total.is_some() {
            set_parts.push("total = $total");
        }
        if draft.items.is_some() {
            set_parts.push("items = $items");
        }
        if draft.status.is_some() {
            set_parts.push("status = $status");
        }
        if draft.shipped.is_some() {
            set_parts.push("shipped = $shipped");
        }
        if draft.delivered.is_some() {
            set_parts.push("delivered = $delivered");
        }

        let query_str = format!(
            "UPDATE type::thing('order', $id) SET {} RETURN AFTER",
            set_parts.join(", ")
        );

        let mut query = self.base.db().query(query_str).bind(("id", pure_id));
        if let Some(v) = draft.order_number {
            query = query.bind(("order_number", v));
        }
        if let Some(v) = draft.customer_name {
            query = query.bind(("customer_name", v));
        }
        if let Some(v) = draft.email {
            query = query.bind(("email", v));
        }
        if let Some(v) = draft.shipping_address {
            query = query.bind(("shipping_address", v));
        }
        if let Some(v) = draft.date {
            query = query.bind(("date", v));
        }
        if let Some(v) = draft.subtotal {
            query = query.bind(("subtotal", v));
        }
        if let Some(v) = draft.tax {
            query = query.bind(("tax", v));
        }
        if let Some(v) = draft.shipping {
            query = query.bind(("shipping", v));
        }
        if let Some(v) = draft.item_count {
            query = query.bind(("item_count", v));
        }
        if let Some(v) = draft.discount_amount {
            query = query.bind(("discount_amount", v));
        }
        if let Some(v) = draft.total {
            query = query.bind(("total", v));
        }
        if let Some(v) = draft.items {
            query = query.bind(("items", v));
        }
        if let Some(v) = draft.status {
            query = query.bind(("status", v));
        }
        if let Some(v) = draft.shipped {
            query = query.bind(("shipped", v));
        }
        if let Some(v) = draft.delivered {
            query = query.bind(("delivered", v));
        }

        let mut result = query.await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(ORDER_TABLE, id);
        let deleted: Option<Order> = self.base.db().delete((ORDER_TABLE, pure_id)).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Order {} not found", id)));
        }
        Ok(())
    }
}
