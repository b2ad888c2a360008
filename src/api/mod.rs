//! API route modules
//!
//! - [`health`] - liveness checks
//! - [`products`] - product catalog CRUD
//! - [`orders`] - order CRUD and atomic placement
//! - [`users`] - push-token registration
//! - [`payment`] - payment-intent proxy

pub mod health;
pub mod orders;
pub mod payment;
pub mod products;
pub mod users;

pub use crate::utils::{AppError, AppResult};
