//! Essence Server - perfume shop backend
//!
//! REST backend for products, orders, users and payment intents over an
//! embedded SurrealDB store. The one non-trivial piece is order placement:
//! validation, duplicate order-number check, per-size stock reservation
//! across every referenced product and the order insert all commit (or roll
//! back) as a single transaction, so inventory is never oversold and no
//! partial order state is ever visible.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # config, state, HTTP server
//! ├── api/           # routes and handlers
//! ├── db/            # embedded database, models, repositories
//! ├── orders/        # placement transaction and payload validation
//! ├── services/      # payment-intent client
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

pub use crate::core::{Config, Server, ServerState, build_app};
pub use crate::orders::{PlacementError, PlacementService};
pub use crate::utils::logger::init_logger;
pub use crate::utils::{AppError, AppResult};
