//! Product Repository
//!
//! Catalog CRUD plus the per-item stock reservation statements used by the
//! order placement transaction. Reservation never runs standalone: it is
//! spliced into a BEGIN/COMMIT script so that a failure on any item rolls
//! back every reservation already applied.

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::Product;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

/// Sentinel prefix thrown when a line item references a missing product
pub const SENTINEL_PRODUCT_NOT_FOUND: &str = "PRODUCT_NOT_FOUND";
/// Sentinel prefix thrown when requested quantity exceeds available stock
pub const SENTINEL_INSUFFICIENT_STOCK: &str = "INSUFFICIENT_STOCK";

// =============================================================================
// Product Repository
// =============================================================================

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Create a new product; `in_stock` is already derived by the caller
    pub async fn create(&self, product: Product) -> RepoResult<Product> {
        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product from a full replacement document
    pub async fn update(&self, id: &str, mut product: Product) -> RepoResult<Product> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        // The record key comes from the update target; a replacement
        // document carrying its own id is rejected by the store.
        product.id = None;
        let updated: Option<Product> = self
            .base
            .db()
            .update((PRODUCT_TABLE, pure_id))
            .content(product)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let deleted: Option<Product> = self.base.db().delete((PRODUCT_TABLE, pure_id)).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }

    /// Reservation statements for line item `idx`, to be spliced into a
    /// BEGIN/COMMIT script. Expects `$pid{idx}`, `$size{idx}` and `$qty{idx}`
    /// bound by the caller.
    ///
    /// The stock map has dynamic keys, so the read and the decrement both go
    /// through parameter indexing (`sizeStocks[$size]`); an absent size key
    /// reads as zero available. No closures: a SurrealQL closure body cannot
    /// see outer parameters or LET variables, so `inStock` is rederived from
    /// the stored map with `math::max` in a follow-up UPDATE. Later reads
    /// inside the same transaction observe earlier UPDATEs, so two line
    /// items hitting the same product and size are checked against the
    /// cumulative decrement.
    pub fn reserve_stock_statements(idx: usize) -> String {
        format!(
            "LET $found{i} = (SELECT * FROM type::thing('product', $pid{i}));\n\
             IF array::len($found{i}) == 0 {{ THROW '{not_found}|' + $pid{i} }};\n\
             LET $prod{i} = $found{i}[0];\n\
             LET $avail{i} = $prod{i}.sizeStocks[$size{i}] ?? 0;\n\
             IF $avail{i} < $qty{i} {{ THROW '{insufficient}|' + $prod{i}.name + '|' + $size{i} + '|' + <string>$avail{i} + '|' + <string>$qty{i} }};\n\
             UPDATE type::thing('product', $pid{i}) SET \
             sizeStocks[$size{i}] = $avail{i} - $qty{i}, \
             updatedAt = time::now();\n\
             UPDATE type::thing('product', $pid{i}) SET \
             inStock = (math::max(object::values(sizeStocks)) ?? 0) > 0;\n",
            i = idx,
            not_found = SENTINEL_PRODUCT_NOT_FOUND,
            insufficient = SENTINEL_INSUFFICIENT_STOCK,
        )
    }
}
