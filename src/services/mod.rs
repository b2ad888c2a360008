//! External Service Clients

pub mod payment;

pub use payment::PaymentClient;
