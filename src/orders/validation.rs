//! Order Payload Validation
//!
//! Pure field checks over an [`OrderDraft`], run before any database write.
//! Violations are accumulated so one response reports every problem at once.
//! JSON type mismatches are rejected earlier by deserialization; these rules
//! cover presence, emptiness and value ranges.

use crate::db::models::{LineItemDraft, OrderDraft, OrderStatus};

/// Validate an order payload.
///
/// `is_new` selects the rule-set: a new order requires every field, a
/// partial update checks only the fields the payload supplies.
pub fn validate_order_input(draft: &OrderDraft, is_new: bool) -> Vec<String> {
    let mut errors = Vec::new();

    if is_new {
        if !has_text(&draft.order_number) {
            errors.push("Order number is required and must be a non-empty string.".to_string());
        }
        if !has_text(&draft.customer_name) {
            errors.push("Customer name is required and must be a non-empty string.".to_string());
        }
        if !draft.email.as_deref().is_some_and(|e| e.contains('@')) {
            errors.push("A valid customer email is required.".to_string());
        }
        if !has_text(&draft.shipping_address) {
            errors.push("Shipping address is required.".to_string());
        }
        if !has_text(&draft.date) {
            errors.push("Order date is required.".to_string());
        }
        if !is_non_negative(&draft.subtotal) {
            errors.push("Subtotal is required and must be a non-negative number.".to_string());
        }
        if !is_non_negative(&draft.tax) {
            errors.push("Tax is required and must be a non-negative number.".to_string());
        }
        if !is_non_negative(&draft.shipping) {
            errors.push("Shipping cost is required and must be a non-negative number.".to_string());
        }
        if !draft.item_count.is_some_and(|n| n >= 0) {
            errors.push("Item count is required and must be a non-negative number.".to_string());
        }
        if !is_non_negative(&draft.discount_amount) {
            errors.push(
                "Discount amount is required and must be a non-negative number.".to_string(),
            );
        }
        if !is_non_negative(&draft.total) {
            errors.push("Total amount is required and must be a non-negative number.".to_string());
        }

        match draft.items.as_deref() {
            None | Some([]) => {
                errors.push("Order must contain at least one item.".to_string());
            }
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    validate_new_item(index, item, &mut errors);
                }
            }
        }
    } else {
        if let Some(total) = draft.total
            && total < 0.0
        {
            errors.push("Total amount must be a non-negative number.".to_string());
        }

        match draft.items.as_deref() {
            None => {}
            Some([]) => {
                errors.push("If provided, order must contain at least one item.".to_string());
            }
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    validate_updated_item(index, item, &mut errors);
                }
            }
        }
    }

    if let Some(status) = draft.status.as_deref()
        && OrderStatus::parse(status).is_none()
    {
        errors.push(
            "Invalid order status. Must be pending, confirmed, cancelled, shipped, or delivered."
                .to_string(),
        );
    }

    errors
}

fn validate_new_item(index: usize, item: &LineItemDraft, errors: &mut Vec<String>) {
    let n = index + 1;
    if !has_text(&item.id) {
        errors.push(format!("Item {n}: Product ID (id) is required."));
    }
    if !has_text(&item.name) {
        errors.push(format!("Item {n}: Item name is required."));
    }
    if !item.quantity.is_some_and(|q| q > 0) {
        errors.push(format!("Item {n}: Quantity must be a positive number."));
    }
    if !is_non_negative(&item.price) {
        errors.push(format!("Item {n}: Price must be a non-negative number."));
    }
    if !has_text(&item.size) {
        errors.push(format!("Item {n}: Size is required."));
    }
}

fn validate_updated_item(index: usize, item: &LineItemDraft, errors: &mut Vec<String>) {
    let n = index + 1;
    if item.id.as_deref().is_some_and(|s| s.trim().is_empty()) {
        errors.push(format!("Item {n}: Product ID (id) must be a non-empty string."));
    }
    if item.name.as_deref().is_some_and(|s| s.trim().is_empty()) {
        errors.push(format!("Item {n}: Item name must be a non-empty string."));
    }
    if item.quantity.is_some_and(|q| q <= 0) {
        errors.push(format!("Item {n}: Quantity must be a positive number."));
    }
    if item.price.is_some_and(|p| p < 0.0) {
        errors.push(format!("Item {n}: Price must be a non-negative number."));
    }
    if item.size.as_deref().is_some_and(|s| s.trim().is_empty()) {
        errors.push(format!("Item {n}: Size must be a non-empty string."));
    }
}

fn has_text(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn is_non_negative(field: &Option<f64>) -> bool {
    field.is_some_and(|n| n >= 0.0)
}
