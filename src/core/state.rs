//! Server state
//!
//! [`ServerState`] holds the shared handles every request needs: the config,
//! the embedded database, the placement service and the optional payment
//! client. Cloning is shallow.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::orders::PlacementService;
use crate::services::PaymentClient;
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Order placement transaction service
    pub placement: PlacementService,
    /// Payment-intent client; None when no secret key is configured
    pub payments: Option<PaymentClient>,
}

impl ServerState {
    /// Initialize the state: work dir, database, services
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let db = db_service.client;

        let payments = config
            .stripe_secret_key
            .clone()
            .map(PaymentClient::new);
        if payments.is_none() {
            tracing::warn!("STRIPE_SECRET_KEY not set, payment intents disabled");
        }

        Ok(Self {
            config: config.clone(),
            placement: PlacementService::new(db.clone()),
            db,
            payments,
        })
    }
}
