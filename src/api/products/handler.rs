//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::db::models::{Product, ProductDraft, stocks_have_units};
use crate::db::repository::ProductRepository;
use crate::utils::{AppError, AppResult};

// =============================================================================
// Validation
// =============================================================================

/// Validate a product payload; `is_new` requires the core fields, a partial
/// update checks only the fields supplied. All violations are accumulated.
pub fn validate_product_input(draft: &ProductDraft, is_new: bool) -> Vec<String> {
    let mut errors = Vec::new();

    if is_new || draft.name.is_some() {
        if !draft.name.as_deref().is_some_and(|s| !s.trim().is_empty()) {
            errors.push("Product name is required and must be a non-empty string.".to_string());
        }
    }
    if is_new || draft.category.is_some() {
        if !draft
            .category
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
        {
            errors.push("Category is required and must be a non-empty string.".to_string());
        }
    }
    if (is_new || draft.price.is_some()) && !draft.price.is_some_and(|p| p >= 0.0) {
        errors.push("Price is required and must be a non-negative number.".to_string());
    }
    if (is_new || draft.price_per_10_ml.is_some())
        && !draft.price_per_10_ml.is_some_and(|p| p >= 0.0)
    {
        errors.push("Price Per 10ML is required and must be a non-negative number.".to_string());
    }
    if draft.reviews.is_some_and(|r| r < 0) {
        errors.push("Reviews must be a non-negative number.".to_string());
    }
    if let Some(images) = &draft.images
        && images.iter().any(|img| img.trim().is_empty())
    {
        errors.push("Images must be an array of non-empty strings (URLs).".to_string());
    }
    if let Some(stocks) = &draft.size_stocks {
        for (size, qty) in stocks {
            if *qty < 0 {
                errors.push(format!(
                    "Stock for size \"{size}\" must be a non-negative number."
                ));
            }
        }
    }

    errors
}

/// Apply a partial-update draft onto an existing product. `in_stock` is
/// recomputed whenever the stock map changes; it is never taken from input.
fn apply_draft(product: &mut Product, draft: ProductDraft) {
    if let Some(name) = draft.name {
        product.name = name;
    }
    if let Some(category) = draft.category {
        product.category = category;
    }
    if let Some(price) = draft.price {
        product.price = price;
    }
    if let Some(price_per_10_ml) = draft.price_per_10_ml {
        product.price_per_10_ml = price_per_10_ml;
    }
    if let Some(calculated_prices) = draft.calculated_prices {
        product.calculated_prices = calculated_prices;
    }
    if let Some(size_stocks) = draft.size_stocks {
        product.in_stock = stocks_have_units(&size_stocks);
        product.size_stocks = size_stocks;
    }
    if let Some(description) = draft.description {
        product.description = description;
    }
    if let Some(notes) = draft.notes {
        product.notes = notes;
    }
    if let Some(reviews) = draft.reviews {
        product.reviews = reviews;
    }
    if let Some(sizes) = draft.sizes {
        product.sizes = sizes;
    }
    if let Some(images) = draft.images {
        product.images = images;
    }
    if let Some(is_featured) = draft.is_featured {
        product.is_featured = is_featured;
    }
    if let Some(is_visible) = draft.is_visible_in_collection {
        product.is_visible_in_collection = is_visible;
    }
    product.updated_at = Some(chrono::Utc::now());
}

// =============================================================================
// Product Handlers
// =============================================================================

/// GET /api/products/test
pub async fn test() -> &'static str {
    "Products route is working!"
}

/// GET /api/products
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all().await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found."))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(draft): Json<ProductDraft>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let errors = validate_product_input(&draft, true);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let product = Product::from_draft(&draft)
        .ok_or_else(|| AppError::internal("product payload incomplete after validation"))?;

    let repo = ProductRepository::new(state.db.clone());
    let created = repo.create(product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/products/{id} - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> AppResult<Json<Product>> {
    let errors = validate_product_input(&draft, false);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let repo = ProductRepository::new(state.db.clone());
    let mut product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found."))?;

    apply_draft(&mut product, draft);
    let updated = repo.update(&id, product).await?;
    Ok(Json(updated))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = ProductRepository::new(state.db.clone());
    match repo.delete(&id).await {
        Ok(()) => Ok(Json(json!({
            "success": true,
            "message": "Product deleted successfully."
        }))),
        Err(crate::db::repository::RepoError::NotFound(_)) => {
            Err(AppError::not_found("Product not found."))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn new_product_requires_core_fields() {
        let errors = validate_product_input(&ProductDraft::default(), true);
        assert!(errors.contains(&"Product name is required and must be a non-empty string.".to_string()));
        assert!(errors.contains(&"Category is required and must be a non-empty string.".to_string()));
        assert!(errors.contains(&"Price is required and must be a non-negative number.".to_string()));
        assert!(errors.contains(&"Price Per 10ML is required and must be a non-negative number.".to_string()));
    }

    #[test]
    fn partial_update_checks_supplied_fields_only() {
        let draft = ProductDraft {
            reviews: Some(-1),
            ..Default::default()
        };
        let errors = validate_product_input(&draft, false);
        assert_eq!(errors, vec!["Reviews must be a non-negative number.".to_string()]);
    }

    #[test]
    fn negative_stock_names_the_size() {
        let mut stocks = BTreeMap::new();
        stocks.insert("30ml".to_string(), -2);
        let draft = ProductDraft {
            size_stocks: Some(stocks),
            ..Default::default()
        };
        let errors = validate_product_input(&draft, false);
        assert_eq!(
            errors,
            vec!["Stock for size \"30ml\" must be a non-negative number.".to_string()]
        );
    }

    #[test]
    fn apply_draft_recomputes_in_stock() {
        let create = ProductDraft {
            name: Some("Noir".to_string()),
            category: Some("floral".to_string()),
            price: Some(50.0),
            price_per_10_ml: Some(10.0),
            size_stocks: Some(BTreeMap::from([("30ml".to_string(), 2)])),
            ..Default::default()
        };
        let mut product = Product::from_draft(&create).unwrap();
        assert!(product.in_stock);

        let update = ProductDraft {
            size_stocks: Some(BTreeMap::from([("30ml".to_string(), 0)])),
            ..Default::default()
        };
        apply_draft(&mut product, update);
        assert!(!product.in_stock);
    }
}
