//! Utility module
//!
//! - [`AppError`] / [`AppResult`] - application error type and handler result
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;

pub use error::{AppError, AppResult};
