//! Database Module
//!
//! Embedded SurrealDB over RocksDB. Tables stay schemaless; the only
//! definition applied at startup is the unique index on `order.orderNumber`,
//! which closes the race window the in-transaction duplicate pre-check
//! leaves open between two concurrent placements.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub client: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `db_path` and apply definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let client: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        client
            .use_ns("shop")
            .use_db("shop")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Self::define_schema(&client).await?;

        tracing::info!("Database connection established (SurrealDB RocksDB)");

        Ok(Self { client })
    }

    async fn define_schema(client: &Surreal<Db>) -> Result<(), AppError> {
        client
            .query(
                "DEFINE INDEX IF NOT EXISTS order_number_unique \
                 ON TABLE order COLUMNS orderNumber UNIQUE",
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define index: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Failed to define index: {e}")))?;
        Ok(())
    }
}
